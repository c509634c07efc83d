//! Undo/redo functionality
//!
//! Linear two-stack history of whole-scene snapshots. A checkpoint is taken
//! once an edit has been applied, so the top of the undo stack always mirrors
//! the live scene and undo restores the entry beneath it. The bottom entry is
//! the initial state and is never popped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use shared::ElementId;

use super::guard::{Cooldown, OperationSlot};
use super::selection::SelectionState;
use super::settings::HistorySettings;
use crate::error::EditError;
use crate::ports::Services;

/// Label of the bottom snapshot taken when a scene is attached
pub const INITIAL_STATE_ACTION: &str = "initial_state";

/// Whole-scene checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Capture time in milliseconds
    pub timestamp: u64,
    /// What produced this checkpoint ("paste", "delete", ...)
    pub action: String,
    /// Scene as exported by the scene service; never inspected beyond `elements`
    pub scene_data: serde_json::Value,
    /// Selection at capture time
    pub selected_element_ids: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
}

impl SceneSnapshot {
    /// Whether the snapshot holds at least one element
    pub fn has_elements(&self) -> bool {
        self.scene_data
            .get("elements")
            .and_then(serde_json::Value::as_array)
            .is_some_and(|elements| !elements.is_empty())
    }
}

/// Ordered snapshot stack, oldest first. Evicts from the bottom when full.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: VecDeque<SceneSnapshot>,
    capacity: Option<usize>,
}

impl HistoryStack {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Push on top; returns the evicted oldest entry when over capacity
    pub fn push(&mut self, snapshot: SceneSnapshot) -> Option<SceneSnapshot> {
        self.entries.push_back(snapshot);
        match self.capacity {
            Some(cap) if self.entries.len() > cap => self.entries.pop_front(),
            _ => None,
        }
    }

    pub fn pop(&mut self) -> Option<SceneSnapshot> {
        self.entries.pop_back()
    }

    pub fn top(&self) -> Option<&SceneSnapshot> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl Iterator<Item = &SceneSnapshot> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|s| s.action.clone()).collect()
    }
}

/// Which history operation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOp {
    Undo,
    Redo,
}

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPhase {
    /// Recording is switched off
    Idle,
    /// New checkpoints are accepted
    Recording,
    /// A snapshot is being applied; checkpoints are suppressed
    Restoring,
}

/// Undo/redo controller
pub struct UndoRedoController {
    undo_stack: HistoryStack,
    redo_stack: HistoryStack,
    recording: bool,
    restoring: bool,
    in_flight: OperationSlot<HistoryOp>,
    undo_cooldown: Cooldown,
    redo_cooldown: Cooldown,
}

impl Default for UndoRedoController {
    fn default() -> Self {
        Self::new(&HistorySettings::default())
    }
}

impl UndoRedoController {
    pub fn new(settings: &HistorySettings) -> Self {
        Self {
            undo_stack: HistoryStack::bounded(settings.capacity),
            redo_stack: HistoryStack::unbounded(),
            recording: true,
            restoring: false,
            in_flight: OperationSlot::new(),
            undo_cooldown: Cooldown::new(settings.undo_cooldown_ms),
            redo_cooldown: Cooldown::new(settings.redo_cooldown_ms),
        }
    }

    pub fn phase(&self) -> HistoryPhase {
        if self.restoring {
            HistoryPhase::Restoring
        } else if self.recording {
            HistoryPhase::Recording
        } else {
            HistoryPhase::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// More than the initial state on the undo stack
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &HistoryStack {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &HistoryStack {
        &self.redo_stack
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_cooldown.reset();
        self.redo_cooldown.reset();
    }

    /// Reset history and take the initial-state checkpoint
    pub fn initialize(&mut self, svc: &Services, selection: &SelectionState) -> Result<(), EditError> {
        self.clear_history();
        let snapshot = Self::capture(svc, selection, INITIAL_STATE_ACTION, None)?;
        self.undo_stack.push(snapshot);
        Ok(())
    }

    fn capture(
        svc: &Services,
        selection: &SelectionState,
        action: &str,
        custom_data: Option<serde_json::Value>,
    ) -> Result<SceneSnapshot, EditError> {
        let scene = svc.scene()?;
        Ok(SceneSnapshot {
            timestamp: svc.now(),
            action: action.to_string(),
            scene_data: scene.export_scene(),
            selected_element_ids: selection.all().to_vec(),
            custom_data,
        })
    }

    /// Take a checkpoint of the current scene and selection.
    ///
    /// Silently skipped (logged) while recording is off, during restoration,
    /// or when no scene is attached. Clears the redo history.
    pub fn record_state(
        &mut self,
        svc: &Services,
        selection: &SelectionState,
        action: &str,
        custom_data: Option<serde_json::Value>,
    ) -> bool {
        if !self.recording || self.restoring {
            tracing::debug!(action, "recording suppressed");
            return false;
        }
        let snapshot = match Self::capture(svc, selection, action, custom_data) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(action, error = %e, "state not recorded");
                return false;
            }
        };
        if let Some(evicted) = self.undo_stack.push(snapshot) {
            tracing::debug!(action = %evicted.action, "oldest history entry evicted");
        }
        self.redo_stack.clear();
        tracing::debug!(action, undo = self.undo_stack.len(), "state recorded");
        true
    }

    /// Step back one checkpoint. Returns the label of the restored snapshot.
    pub fn undo(&mut self, svc: &mut Services, selection: &mut SelectionState) -> Result<String, EditError> {
        if self.in_flight.is_busy() {
            return Err(EditError::Busy);
        }
        let now = svc.now();
        if !self.undo_cooldown.is_open(now) {
            tracing::debug!("undo debounced");
            return Err(EditError::Debounced);
        }
        svc.scene()?;
        if !self.can_undo() {
            return Err(EditError::NothingToUndo);
        }
        self.undo_cooldown.stamp(now);

        let Some(undone) = self.undo_stack.pop() else {
            return Err(EditError::NothingToUndo);
        };
        let current = match Self::capture(svc, selection, &undone.action, None) {
            Ok(current) => current,
            Err(e) => {
                self.undo_stack.push(undone);
                return Err(e);
            }
        };
        self.redo_stack.push(current);

        let Some(target) = self.undo_stack.top().cloned() else {
            self.redo_stack.pop();
            self.undo_stack.push(undone);
            return Err(EditError::NothingToUndo);
        };

        self.in_flight.begin(HistoryOp::Undo);
        let result = self.restore_state(svc, selection, &target);
        self.in_flight.end();

        match result {
            Ok(()) => {
                tracing::info!(undone = %undone.action, restored = %target.action, "undo");
                Ok(target.action)
            }
            Err(e) => {
                self.redo_stack.pop();
                self.undo_stack.push(undone);
                tracing::error!(error = %e, "undo failed");
                Err(e)
            }
        }
    }

    /// Re-apply the last undone checkpoint. Returns its label.
    pub fn redo(&mut self, svc: &mut Services, selection: &mut SelectionState) -> Result<String, EditError> {
        if self.in_flight.is_busy() {
            return Err(EditError::Busy);
        }
        let now = svc.now();
        if !self.redo_cooldown.is_open(now) {
            tracing::debug!("redo debounced");
            return Err(EditError::Debounced);
        }
        svc.scene()?;
        let Some(snapshot) = self.redo_stack.pop() else {
            return Err(EditError::NothingToRedo);
        };
        self.redo_cooldown.stamp(now);

        self.in_flight.begin(HistoryOp::Redo);
        let result = self.restore_state(svc, selection, &snapshot);
        self.in_flight.end();

        match result {
            Ok(()) => {
                let action = snapshot.action.clone();
                self.undo_stack.push(snapshot);
                tracing::info!(redone = %action, "redo");
                Ok(action)
            }
            Err(e) => {
                self.redo_stack.push(snapshot);
                tracing::error!(error = %e, "redo failed");
                Err(e)
            }
        }
    }

    /// Apply a snapshot to the scene and the selection.
    ///
    /// Recording and the scene's auto-join flag are switched off while the
    /// snapshot is applied and put back afterwards on every path.
    pub fn restore_state(
        &mut self,
        svc: &mut Services,
        selection: &mut SelectionState,
        snapshot: &SceneSnapshot,
    ) -> Result<(), EditError> {
        let was_recording = self.recording;
        self.recording = false;
        self.restoring = true;
        let auto_join = svc.flags.as_mut().map(|flags| {
            let previous = flags.auto_join();
            flags.set_auto_join(false);
            previous
        });

        let result = Self::apply_snapshot(svc, selection, snapshot);

        if let (Some(flags), Some(previous)) = (svc.flags.as_mut(), auto_join) {
            flags.set_auto_join(previous);
        }
        self.restoring = false;
        self.recording = was_recording;
        result
    }

    fn apply_snapshot(
        svc: &mut Services,
        selection: &mut SelectionState,
        snapshot: &SceneSnapshot,
    ) -> Result<(), EditError> {
        let scene = svc.scene_mut()?;
        if snapshot.has_elements() {
            scene.import_scene(&snapshot.scene_data).map_err(EditError::Restore)?;
        } else {
            scene.clear_all();
        }

        selection.replace(snapshot.selected_element_ids.clone());
        selection.retain_existing(|id| scene.contains(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(action: &str) -> SceneSnapshot {
        SceneSnapshot {
            timestamp: 0,
            action: action.to_string(),
            scene_data: serde_json::json!({"elements": []}),
            selected_element_ids: vec![],
            custom_data: None,
        }
    }

    #[test]
    fn test_bounded_stack_evicts_oldest() {
        let mut stack = HistoryStack::bounded(3);
        for i in 0..5 {
            stack.push(snapshot(&format!("s{i}")));
        }
        assert_eq!(stack.labels(), vec!["s2", "s3", "s4"]);
    }

    #[test]
    fn test_push_reports_evicted() {
        let mut stack = HistoryStack::bounded(1);
        assert!(stack.push(snapshot("a")).is_none());
        assert_eq!(stack.push(snapshot("b")).unwrap().action, "a");
    }

    #[test]
    fn test_unbounded_stack_keeps_everything() {
        let mut stack = HistoryStack::unbounded();
        for i in 0..200 {
            stack.push(snapshot(&format!("s{i}")));
        }
        assert_eq!(stack.len(), 200);
        assert_eq!(stack.pop().unwrap().action, "s199");
        assert_eq!(stack.top().unwrap().action, "s198");
    }

    #[test]
    fn test_has_elements() {
        let mut s = snapshot("x");
        assert!(!s.has_elements());
        s.scene_data = serde_json::Value::Null;
        assert!(!s.has_elements());
        s.scene_data = serde_json::json!({"elements": [{"id": "a"}]});
        assert!(s.has_elements());
    }

    #[test]
    fn test_snapshot_serde_skips_empty_custom_data() {
        let json = serde_json::to_string(&snapshot("paste")).unwrap();
        assert!(!json.contains("custom_data"));
        let back: SceneSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot("paste"));
    }

    #[test]
    fn test_default_controller_state() {
        let c = UndoRedoController::default();
        assert_eq!(c.phase(), HistoryPhase::Recording);
        assert!(!c.can_undo());
        assert!(!c.can_redo());
    }

    #[test]
    fn test_clear_history_empties_both_stacks() {
        let mut c = UndoRedoController::default();
        c.undo_stack.push(snapshot("a"));
        c.redo_stack.push(snapshot("b"));
        assert_eq!((c.undo_len(), c.redo_len()), (1, 1));
        c.clear_history();
        assert_eq!((c.undo_len(), c.redo_len()), (0, 0));
    }

    #[test]
    fn test_phase_idle_when_recording_off() {
        let mut c = UndoRedoController::default();
        c.set_recording(false);
        assert_eq!(c.phase(), HistoryPhase::Idle);
    }
}
