//! The edit core: history, clipboard and selection wired to injected collaborators.
//!
//! Every command goes through [`Editor`]. Controller results are turned into
//! user notices here, and the UI affordances are refreshed after each command,
//! so the controllers themselves stay free of presentation concerns.

use serde::{Deserialize, Serialize};
use shared::{ElementId, WallElement};

use crate::error::EditError;
use crate::notify::{EditAffordances, Severity};
use crate::ports::{SceneService, Services};
use crate::state::clipboard::{remove_elements, ClipboardController, CutOutcome, PasteOutcome};
use crate::state::guard::Cooldown;
use crate::state::history::{SceneSnapshot, UndoRedoController};
use crate::state::selection::SelectionState;
use crate::state::settings::AppSettings;

/// Checkpoint labels produced by the editor itself. Scene events carrying one
/// of these are echoes of our own edits and are not recorded again.
const OWN_ACTIONS: &[&str] = &[
    "initial_state",
    "undo",
    "redo",
    "restore",
    "copy",
    "cut",
    "paste",
    "duplicate",
    "delete",
    "add_element",
    "remove_element",
    "clear_scene",
];

/// Events published by the scene and the construction tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum SceneEvent {
    ElementSelected {
        id: ElementId,
    },
    ElementDeselected {
        id: ElementId,
    },
    SceneModified {
        action: String,
        #[serde(default, rename = "changeType", skip_serializing_if = "Option::is_none")]
        change_type: Option<String>,
    },
    SceneChanged {
        action: String,
        #[serde(default, rename = "changeType", skip_serializing_if = "Option::is_none")]
        change_type: Option<String>,
    },
    ElementPlaced {
        id: ElementId,
    },
}

/// Headless editor
pub struct Editor {
    pub history: UndoRedoController,
    pub clipboard: ClipboardController,
    pub selection: SelectionState,
    pub services: Services,
    delete_cooldown: Cooldown,
}

impl Editor {
    /// Build an editor; if `services` already carries a scene it is initialized
    pub fn new(settings: &AppSettings, services: Services) -> Self {
        let mut editor = Self {
            history: UndoRedoController::new(&settings.history),
            clipboard: ClipboardController::new(&settings.clipboard),
            selection: SelectionState::default(),
            services,
            delete_cooldown: Cooldown::new(settings.clipboard.delete_cooldown_ms),
        };
        if editor.services.has_scene() {
            editor.initialize_history();
        }
        editor
    }

    /// The scene collaborator became available
    pub fn attach_scene(&mut self, scene: Box<dyn SceneService>) {
        self.services.scene = Some(scene);
        self.selection.clear();
        self.initialize_history();
    }

    /// The scene collaborator went away; history referring to it is dropped
    pub fn detach_scene(&mut self) -> Option<Box<dyn SceneService>> {
        self.history.clear_history();
        self.selection.clear();
        let scene = self.services.scene.take();
        self.refresh();
        scene
    }

    /// Replace the scene contents and start a fresh history from them
    pub fn load_scene(&mut self, data: &serde_json::Value) -> Result<(), EditError> {
        let result = self
            .services
            .scene_mut()
            .and_then(|scene| scene.import_scene(data).map_err(EditError::from));
        if result.is_ok() {
            self.selection.clear();
            self.clipboard.clear();
            self.services.recalculate_quantities();
            self.initialize_history();
        }
        self.finish("load_scene", result)
    }

    fn initialize_history(&mut self) {
        if let Err(e) = self.history.initialize(&self.services, &self.selection) {
            tracing::error!(error = %e, "history not initialized");
        }
        self.refresh();
    }

    pub fn scene(&self) -> Result<&dyn SceneService, EditError> {
        self.services.scene()
    }

    // ── Affordances / reporting ───────────────────────────────

    pub fn affordances(&self) -> EditAffordances {
        EditAffordances {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            can_paste: self.clipboard.has_contents(),
            has_selection: self.selection.has_sources(),
        }
    }

    /// Push current affordances to the UI
    pub fn refresh(&mut self) {
        let affordances = self.affordances();
        self.services.ui.refresh(affordances);
    }

    fn report(&mut self, command: &str, error: &EditError) {
        match error.severity() {
            None => tracing::debug!(command, "{error}"),
            Some(severity) => {
                match severity {
                    Severity::Error => tracing::error!(command, error = %error, "edit command failed"),
                    _ => tracing::warn!(command, "{error}"),
                }
                self.services.notify(severity, error.user_message());
            }
        }
    }

    /// Refresh the UI, and report a failure if there is one
    fn finish<T>(&mut self, command: &str, result: Result<T, EditError>) -> Result<T, EditError> {
        if let Err(e) = &result {
            self.report(command, e);
        }
        self.refresh();
        result
    }

    // ── History ───────────────────────────────────────────────

    /// Take a checkpoint labelled `action`
    pub fn record_state(&mut self, action: &str, custom_data: Option<serde_json::Value>) -> bool {
        let recorded = self
            .history
            .record_state(&self.services, &self.selection, action, custom_data);
        self.refresh();
        recorded
    }

    pub fn undo(&mut self) -> Result<String, EditError> {
        let result = self.history.undo(&mut self.services, &mut self.selection);
        if let Ok(label) = &result {
            self.services.notify(Severity::Success, format!("Undo: {label}"));
        }
        self.finish("undo", result)
    }

    pub fn redo(&mut self) -> Result<String, EditError> {
        let result = self.history.redo(&mut self.services, &mut self.selection);
        if let Ok(label) = &result {
            self.services.notify(Severity::Success, format!("Redo: {label}"));
        }
        self.finish("redo", result)
    }

    /// Apply a snapshot directly (used for loading checkpoints from outside)
    pub fn restore_state(&mut self, snapshot: &SceneSnapshot) -> Result<(), EditError> {
        let result = self
            .history
            .restore_state(&mut self.services, &mut self.selection, snapshot);
        self.finish("restore", result)
    }

    // ── Clipboard ─────────────────────────────────────────────

    pub fn copy(&mut self) -> Result<usize, EditError> {
        let result = self.clipboard.copy(&self.services, &self.selection);
        if let Ok(count) = &result {
            self.services
                .notify(Severity::Success, format!("Copied {count} element(s)"));
        }
        self.finish("copy", result)
    }

    pub fn cut(&mut self) -> Result<CutOutcome, EditError> {
        let result = self
            .clipboard
            .cut(&mut self.history, &mut self.services, &mut self.selection);
        if let Ok(outcome) = &result {
            if outcome.removed > 0 {
                self.services
                    .notify(Severity::Success, format!("Cut {} element(s)", outcome.removed));
            } else {
                self.services.notify(
                    Severity::Warning,
                    format!("Copied {} element(s) but none could be removed", outcome.copied),
                );
            }
        }
        self.finish("cut", result)
    }

    pub fn paste(&mut self) -> Result<PasteOutcome, EditError> {
        let result = self
            .clipboard
            .paste(&mut self.history, &mut self.services, &mut self.selection);
        if let Ok(outcome) = &result {
            self.services
                .notify(Severity::Success, format!("Pasted {} element(s)", outcome.ids.len()));
        }
        self.finish("paste", result)
    }

    pub fn duplicate(&mut self) -> Result<PasteOutcome, EditError> {
        let result = self
            .clipboard
            .duplicate(&mut self.history, &mut self.services, &mut self.selection);
        if let Ok(outcome) = &result {
            self.services
                .notify(Severity::Success, format!("Duplicated {} element(s)", outcome.ids.len()));
        }
        self.finish("duplicate", result)
    }

    // ── Scene edits ───────────────────────────────────────────

    /// Delete the selection (or the active element). Debounced.
    pub fn delete_selected(&mut self) -> Result<usize, EditError> {
        let result = self.delete_selection();
        if let Ok(removed) = &result {
            self.services
                .notify(Severity::Success, format!("Deleted {removed} element(s)"));
        }
        self.finish("delete", result)
    }

    fn delete_selection(&mut self) -> Result<usize, EditError> {
        let now = self.services.now();
        if !self.delete_cooldown.is_open(now) {
            return Err(EditError::Debounced);
        }
        let sources = self.selection.sources();
        if sources.is_empty() {
            return Err(EditError::NothingSelected);
        }
        self.delete_cooldown.stamp(now);
        let removed = remove_elements(&mut self.services, &mut self.selection, &sources)?;
        self.history
            .record_state(&self.services, &self.selection, "delete", None);
        tracing::info!(removed, "deleted selection");
        Ok(removed)
    }

    /// Add an element and checkpoint it
    pub fn add_element(&mut self, element: WallElement) -> Result<ElementId, EditError> {
        let result = self
            .services
            .scene_mut()
            .and_then(|scene| scene.add_element(element).map_err(EditError::from));
        if result.is_ok() {
            self.services.recalculate_quantities();
            self.history
                .record_state(&self.services, &self.selection, "add_element", None);
        }
        self.finish("add_element", result)
    }

    /// Remove one element by id and checkpoint it
    pub fn remove_element(&mut self, id: &str) -> Result<bool, EditError> {
        let result = self.services.scene_mut().map(|scene| scene.remove_element(id));
        if let Ok(true) = result {
            self.selection.remove(id);
            self.services.recalculate_quantities();
            self.history
                .record_state(&self.services, &self.selection, "remove_element", None);
        }
        self.finish("remove_element", result)
    }

    /// Empty the scene and checkpoint it
    pub fn clear_scene(&mut self) -> Result<usize, EditError> {
        let result = self.services.scene_mut().map(|scene| {
            let count = scene.element_count();
            scene.clear_all();
            count
        });
        if result.is_ok() {
            self.selection.clear();
            self.services.recalculate_quantities();
            self.history
                .record_state(&self.services, &self.selection, "clear_scene", None);
        }
        self.finish("clear_scene", result)
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select(&mut self, id: ElementId) {
        self.selection.select(id);
        self.refresh();
    }

    pub fn toggle(&mut self, id: ElementId) {
        self.selection.toggle(id);
        self.refresh();
    }

    /// Select every element in the scene
    pub fn select_all(&mut self) -> Result<usize, EditError> {
        let result = self.services.scene().map(|scene| scene.element_ids());
        let result = result.map(|ids| {
            let count = ids.len();
            self.selection.replace(ids);
            count
        });
        self.finish("select_all", result)
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.refresh();
    }

    // ── Events ────────────────────────────────────────────────

    /// React to an event published by the scene or the construction tools
    pub fn on_event(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::ElementSelected { id } => {
                self.selection.set_active(id);
                self.refresh();
            }
            SceneEvent::ElementDeselected { id } => {
                self.selection.remove(&id);
                self.refresh();
            }
            SceneEvent::SceneModified { action, change_type } | SceneEvent::SceneChanged { action, change_type } => {
                self.prune_selection();
                if self.history.is_restoring() || OWN_ACTIONS.contains(&action.as_str()) {
                    self.refresh();
                    return;
                }
                let custom = change_type.map(|c| serde_json::json!({ "changeType": c }));
                self.record_state(&action, custom);
            }
            SceneEvent::ElementPlaced { id } => {
                tracing::debug!(%id, "element placed");
                self.record_state("place_element", Some(serde_json::json!({ "id": id })));
            }
        }
    }

    /// Drop selected ids that no longer exist in the scene
    fn prune_selection(&mut self) {
        if let Some(scene) = self.services.scene.as_deref() {
            self.selection.retain_existing(|id| scene.contains(id));
        }
    }
}
