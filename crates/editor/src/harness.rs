//! Headless test harness for programmatic editing.
//!
//! Wires an [`Editor`] to an in-memory [`SceneState`], a manual clock and
//! recording ports. The command wrappers move the clock past every cooldown
//! first, so scripted sequences are not debounced; call the editor directly to
//! exercise the repeat guards.

use shared::{ElementId, WallElement};

use crate::editor::Editor;
use crate::error::EditError;
use crate::fixtures::{CountingQuantities, RecordingUi, ToggleFlags};
use crate::notify::Notification;
use crate::ports::{ManualClock, Services};
use crate::state::clipboard::{CutOutcome, PasteOutcome};
use crate::state::scene::SceneState;
use crate::state::settings::AppSettings;

/// Start time of the harness clock
pub const START_MS: u64 = 1_000_000;
/// Clock step taken before each wrapped command; longer than any cooldown
pub const SETTLE_MS: u64 = 2_000;

/// Headless test harness: editor plus handles on its fake collaborators
pub struct TestHarness {
    pub editor: Editor,
    pub clock: ManualClock,
    pub ui: RecordingUi,
    pub quantities: CountingQuantities,
    pub flags: ToggleFlags,
}

impl TestHarness {
    /// Editor with an empty scene (grid spacing 10) and an initialized history.
    pub fn new() -> Self {
        Self::with_settings(&AppSettings::default())
    }

    pub fn with_settings(settings: &AppSettings) -> Self {
        let mut h = Self::without_scene(settings);
        let scene = SceneState::new().with_grid_spacing(settings.grid.spacing);
        h.editor.attach_scene(Box::new(scene));
        h
    }

    /// Editor whose scene collaborator has not arrived yet.
    pub fn without_scene(settings: &AppSettings) -> Self {
        let clock = ManualClock::new(START_MS);
        let ui = RecordingUi::new();
        let quantities = CountingQuantities::new();
        let flags = ToggleFlags::new(true);
        let services = Services::new(Box::new(clock.clone()), Box::new(ui.clone()))
            .with_quantities(Box::new(quantities.clone()))
            .with_flags(Box::new(flags.clone()));
        Self {
            editor: Editor::new(settings, services),
            clock,
            ui,
            quantities,
            flags,
        }
    }

    /// Move the clock past every cooldown window
    pub fn settle(&self) {
        self.clock.advance(SETTLE_MS);
    }

    pub fn advance(&self, ms: u64) {
        self.clock.advance(ms);
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add an element and record it in history. Failures only show up as
    /// a notification and a missing element.
    pub fn add(&mut self, element: WallElement) -> ElementId {
        let id = element.id.clone();
        if let Err(e) = self.editor.add_element(element) {
            tracing::warn!(%id, "harness add failed: {e}");
        }
        id
    }

    /// Add several elements, one checkpoint each
    pub fn add_all(&mut self, elements: Vec<WallElement>) -> Vec<ElementId> {
        elements.into_iter().map(|e| self.add(e)).collect()
    }

    /// Load a scene from JSON string (replaces current, resets history)
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let data: serde_json::Value =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.editor.load_scene(&data).map_err(|e| e.to_string())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.editor
            .scene()
            .map(|scene| serde_json::to_string_pretty(&scene.export_scene()).unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn scene_value(&self) -> serde_json::Value {
        self.editor
            .scene()
            .map(|scene| scene.export_scene())
            .unwrap_or(serde_json::Value::Null)
    }

    /// Deserialized element by id
    pub fn element(&self, id: &str) -> Option<WallElement> {
        let scene = self.editor.scene().ok()?;
        WallElement::from_json(&scene.serialize_element(id)?).ok()
    }

    pub fn element_count(&self) -> usize {
        self.editor.scene().map(|scene| scene.element_count()).unwrap_or(0)
    }

    pub fn element_ids(&self) -> Vec<ElementId> {
        self.editor.scene().map(|scene| scene.element_ids()).unwrap_or_default()
    }

    // ── Edit commands (settled) ───────────────────────────────

    pub fn undo(&mut self) -> Result<String, EditError> {
        self.settle();
        self.editor.undo()
    }

    pub fn redo(&mut self) -> Result<String, EditError> {
        self.settle();
        self.editor.redo()
    }

    pub fn copy(&mut self) -> Result<usize, EditError> {
        self.settle();
        self.editor.copy()
    }

    pub fn cut(&mut self) -> Result<CutOutcome, EditError> {
        self.settle();
        self.editor.cut()
    }

    pub fn paste(&mut self) -> Result<PasteOutcome, EditError> {
        self.settle();
        self.editor.paste()
    }

    pub fn duplicate(&mut self) -> Result<PasteOutcome, EditError> {
        self.settle();
        self.editor.duplicate()
    }

    pub fn delete(&mut self) -> Result<usize, EditError> {
        self.settle();
        self.editor.delete_selected()
    }

    // ── Selection ─────────────────────────────────────────────

    /// Replace the selection with `ids`
    pub fn select(&mut self, ids: &[&str]) {
        self.editor
            .selection
            .replace(ids.iter().map(|id| id.to_string()).collect());
        self.editor.refresh();
    }

    pub fn clear_selection(&mut self) {
        self.editor.deselect_all();
    }

    pub fn selected(&self) -> Vec<ElementId> {
        self.editor.selection.all().to_vec()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn notifications(&self) -> Vec<Notification> {
        self.ui.notifications()
    }

    pub fn last_message(&self) -> Option<String> {
        self.ui.last().map(|n| n.message)
    }

    pub fn undo_labels(&self) -> Vec<String> {
        self.editor.history.undo_stack().labels()
    }

    pub fn redo_labels(&self) -> Vec<String> {
        self.editor.history.redo_stack().labels()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
