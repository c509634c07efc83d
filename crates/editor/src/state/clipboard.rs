//! Copy / cut / paste / duplicate of selected elements.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{ElementId, WallElement};

use super::guard::Cooldown;
use super::history::UndoRedoController;
use super::placement::{bounding_footprint, PasteOffsetResolver, PlacementOffset};
use super::selection::SelectionState;
use super::settings::ClipboardSettings;
use crate::error::{EditError, SceneError};
use crate::ports::Services;

static NEXT_ELEMENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Fresh element id, unique for the lifetime of the process.
///
/// The sequence number alone guarantees uniqueness; the time and random
/// suffix keep ids distinct from those of earlier sessions in saved scenes.
pub fn generate_element_id(now_ms: u64) -> ElementId {
    let seq = NEXT_ELEMENT_SEQ.fetch_add(1, Ordering::Relaxed);
    let suffix: u32 = rand::rng().random();
    format!("element_{now_ms}_{seq}_{suffix:08x}")
}

/// What the clipboard holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardKind {
    #[default]
    Elements,
}

/// Copied element records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardState {
    /// Serialized records in selection order
    pub elements: Vec<serde_json::Value>,
    pub kind: ClipboardKind,
    /// Capture time in milliseconds
    pub captured_at: u64,
}

/// Result of a cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutOutcome {
    pub copied: usize,
    pub removed: usize,
}

/// Result of a paste
#[derive(Debug, Clone, PartialEq)]
pub struct PasteOutcome {
    pub ids: Vec<ElementId>,
    pub offset: PlacementOffset,
}

/// Clipboard controller
pub struct ClipboardController {
    clipboard: Option<ClipboardState>,
    copy_cooldown: Cooldown,
    safety_margin: f64,
}

impl Default for ClipboardController {
    fn default() -> Self {
        Self::new(&ClipboardSettings::default())
    }
}

impl ClipboardController {
    pub fn new(settings: &ClipboardSettings) -> Self {
        Self {
            clipboard: None,
            copy_cooldown: Cooldown::new(settings.copy_cooldown_ms),
            safety_margin: settings.safety_margin,
        }
    }

    pub fn contents(&self) -> Option<&ClipboardState> {
        self.clipboard.as_ref()
    }

    pub fn has_contents(&self) -> bool {
        self.clipboard.as_ref().is_some_and(|c| !c.elements.is_empty())
    }

    pub fn clear(&mut self) {
        self.clipboard = None;
    }

    /// Copy the selection (or the active element). Debounced.
    pub fn copy(&mut self, svc: &Services, selection: &SelectionState) -> Result<usize, EditError> {
        let now = svc.now();
        if !self.copy_cooldown.is_open(now) {
            tracing::debug!("copy debounced");
            return Err(EditError::Debounced);
        }
        let copied = self.copy_selection(svc, selection)?;
        self.copy_cooldown.stamp(now);
        Ok(copied)
    }

    /// Copy without the repeat guard; used by cut and duplicate
    fn copy_selection(&mut self, svc: &Services, selection: &SelectionState) -> Result<usize, EditError> {
        let sources = selection.sources();
        if sources.is_empty() {
            return Err(EditError::NothingSelected);
        }
        let scene = svc.scene()?;
        let elements: Vec<serde_json::Value> = sources
            .iter()
            .filter_map(|id| scene.serialize_element(id))
            .collect();
        if elements.is_empty() {
            return Err(EditError::NothingSelected);
        }

        let count = elements.len();
        self.clipboard = Some(ClipboardState {
            elements,
            kind: ClipboardKind::Elements,
            captured_at: svc.now(),
        });
        tracing::info!(count, "copied to clipboard");
        Ok(count)
    }

    /// Copy the selection, then remove it from the scene under a single "cut" checkpoint
    pub fn cut(
        &mut self,
        history: &mut UndoRedoController,
        svc: &mut Services,
        selection: &mut SelectionState,
    ) -> Result<CutOutcome, EditError> {
        let sources = selection.sources();
        if sources.is_empty() {
            return Err(EditError::NothingSelected);
        }
        let copied = self.copy_selection(svc, selection)?;
        let removed = remove_elements(svc, selection, &sources)?;
        if removed > 0 {
            history.record_state(svc, selection, "cut", None);
        }
        tracing::info!(copied, removed, "cut");
        Ok(CutOutcome { copied, removed })
    }

    /// Add a copy of the clipboard to the scene at a free offset. The clipboard is kept.
    pub fn paste(
        &mut self,
        history: &mut UndoRedoController,
        svc: &mut Services,
        selection: &mut SelectionState,
    ) -> Result<PasteOutcome, EditError> {
        let Some(clipboard) = self.clipboard.as_ref().filter(|c| !c.elements.is_empty()) else {
            return Err(EditError::ClipboardEmpty);
        };
        let records = clipboard
            .elements
            .iter()
            .map(WallElement::from_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(SceneError::InvalidElement)?;
        let Some(bbox) = bounding_footprint(&records) else {
            return Err(EditError::ClipboardEmpty);
        };

        let now = svc.now();
        let scene = svc.scene_mut()?;
        let offset = PasteOffsetResolver::new(scene.grid_spacing())
            .with_margin(self.safety_margin)
            .resolve(&bbox, &scene.footprints());

        selection.clear();
        let mut ids = Vec::with_capacity(records.len());
        for mut element in records {
            element.position = element.position.offset_by(offset.x, offset.y, offset.z);
            element.id = generate_element_id(now);
            match scene.add_element(element) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    // Scene must stay equal to the last checkpoint
                    for id in &ids {
                        scene.remove_element(id);
                    }
                    tracing::warn!(added = ids.len(), error = %e, "paste rolled back");
                    return Err(e.into());
                }
            }
        }

        svc.recalculate_quantities();
        history.record_state(svc, selection, "paste", None);
        tracing::info!(count = ids.len(), dx = offset.x, dz = offset.z, "pasted");
        Ok(PasteOutcome { ids, offset })
    }

    /// Copy the multi-selection and paste it right away
    pub fn duplicate(
        &mut self,
        history: &mut UndoRedoController,
        svc: &mut Services,
        selection: &mut SelectionState,
    ) -> Result<PasteOutcome, EditError> {
        if selection.is_empty() {
            return Err(EditError::NothingSelected);
        }
        self.copy_selection(svc, selection)?;
        self.paste(history, svc, selection)
    }
}

/// Remove the given elements, clear the selection and refresh quantities.
/// Returns how many elements were actually removed.
pub(crate) fn remove_elements(
    svc: &mut Services,
    selection: &mut SelectionState,
    ids: &[ElementId],
) -> Result<usize, EditError> {
    let scene = svc.scene_mut()?;
    let removed = ids.iter().filter(|id| scene.remove_element(id)).count();
    selection.clear();
    svc.recalculate_quantities();
    Ok(removed)
}
