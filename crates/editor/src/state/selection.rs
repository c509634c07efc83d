use shared::ElementId;

/// Element selection state (supports multi-select)
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Selected element IDs (in order of selection)
    selected: Vec<ElementId>,
    /// Element last reported as selected by the scene (single-click selection)
    active: Option<ElementId>,
}

impl SelectionState {
    /// All selected elements
    pub fn all(&self) -> &[ElementId] {
        &self.selected
    }

    /// Check if an element is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Select a single element (clears previous selection)
    pub fn select(&mut self, id: ElementId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Add to the selection if not already there
    pub fn add(&mut self, id: ElementId) {
        if !self.is_selected(&id) {
            self.selected.push(id);
        }
    }

    /// Drop an element from the selection and from the active slot
    pub fn remove(&mut self, id: &str) {
        self.selected.retain(|s| s != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    /// Replace the multi-selection, keeping the given order
    pub fn replace(&mut self, ids: Vec<ElementId>) {
        self.selected = ids;
    }

    /// Keep only elements for which `exists` returns true
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        self.selected.retain(|id| exists(id));
        if self.active.as_deref().is_some_and(|id| !exists(id)) {
            self.active = None;
        }
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
    }

    /// Number of selected elements
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn active(&self) -> Option<&ElementId> {
        self.active.as_ref()
    }

    pub fn set_active(&mut self, id: ElementId) {
        self.active = Some(id);
    }

    /// Elements an edit command acts on: the multi-selection, or else the active element
    pub fn sources(&self) -> Vec<ElementId> {
        if !self.selected.is_empty() {
            self.selected.clone()
        } else {
            self.active.iter().cloned().collect()
        }
    }

    /// Anything to act on at all
    pub fn has_sources(&self) -> bool {
        !self.selected.is_empty() || self.active.is_some()
    }
}
