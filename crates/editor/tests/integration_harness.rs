//! Integration tests for the editor as driven through TestHarness.
//!
//! Scene events, attach/detach of the scene collaborator, shortcuts and
//! the affordances pushed to the UI.

use wallsim_editor_lib::command::{dispatch, EditCommand};
use wallsim_editor_lib::editor::SceneEvent;
use wallsim_editor_lib::error::EditError;
use wallsim_editor_lib::fixtures::{brick_at, brick_row, scene_json};
use wallsim_editor_lib::harness::TestHarness;
use wallsim_editor_lib::keyboard::{handle_key, Modifiers};
use wallsim_editor_lib::notify::EditAffordances;
use wallsim_editor_lib::state::{AppSettings, SceneState};

fn modified(action: &str) -> SceneEvent {
    SceneEvent::SceneModified {
        action: action.to_string(),
        change_type: None,
    }
}

#[test]
fn test_harness_undo_redo_cycle() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.add(brick_at("b", 40.0, 0.0));
    assert_eq!(h.element_count(), 2);

    h.undo().unwrap();
    assert_eq!(h.element_count(), 1);

    h.undo().unwrap();
    assert_eq!(h.element_count(), 0);

    assert!(h.undo().is_err()); // nothing to undo
    assert_eq!(h.element_count(), 0);

    h.redo().unwrap();
    assert_eq!(h.element_count(), 1);

    h.redo().unwrap();
    assert_eq!(h.element_count(), 2);

    assert!(h.redo().is_err()); // nothing to redo
}

#[test]
fn test_scene_modified_records_checkpoint() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.editor.on_event(SceneEvent::SceneModified {
        action: "move_element".into(),
        change_type: Some("position".into()),
    });
    assert_eq!(h.undo_labels().last().map(String::as_str), Some("move_element"));
    let top = h.editor.history.undo_stack().top().unwrap();
    assert_eq!(top.custom_data, Some(serde_json::json!({ "changeType": "position" })));
}

#[test]
fn test_scene_changed_records_checkpoint() {
    let mut h = TestHarness::new();
    h.editor.on_event(SceneEvent::SceneChanged {
        action: "resize".into(),
        change_type: None,
    });
    assert_eq!(h.undo_labels(), vec!["initial_state", "resize"]);
}

#[test]
fn test_echoes_of_own_edits_not_recorded_twice() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    let depth = h.undo_labels().len();
    for action in ["paste", "cut", "delete", "undo", "redo", "restore"] {
        h.editor.on_event(modified(action));
    }
    assert_eq!(h.undo_labels().len(), depth);
}

#[test]
fn test_scene_modified_prunes_stale_selection() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.select(&["a", "gone"]);
    h.editor.on_event(modified("move_element"));
    assert_eq!(h.selected(), vec!["a".to_string()]);
}

#[test]
fn test_element_placed_records_checkpoint() {
    let mut h = TestHarness::new();
    h.editor.on_event(SceneEvent::ElementPlaced { id: "a".into() });
    assert_eq!(h.undo_labels().last().map(String::as_str), Some("place_element"));
}

#[test]
fn test_element_selected_and_deselected() {
    let mut h = TestHarness::new();
    h.add_all(brick_row("b", 2));
    h.select(&["b0", "b1"]);
    h.editor.on_event(SceneEvent::ElementSelected { id: "b1".into() });
    assert_eq!(h.editor.selection.active().map(String::as_str), Some("b1"));
    assert_eq!(h.selected().len(), 2);

    h.editor.on_event(SceneEvent::ElementDeselected { id: "b1".into() });
    assert!(h.editor.selection.active().is_none());
    assert_eq!(h.selected(), vec!["b0".to_string()]);
}

#[test]
fn test_attach_scene_records_initial_state() {
    let mut h = TestHarness::without_scene(&AppSettings::default());
    assert!(matches!(h.editor.scene(), Err(EditError::SceneUnavailable)));
    assert!(!h.editor.record_state("early", None));

    h.editor.attach_scene(Box::new(SceneState::new()));
    assert_eq!(h.undo_labels(), vec!["initial_state"]);
    h.add(brick_at("a", 0.0, 0.0));
    assert!(h.editor.history.can_undo());
}

#[test]
fn test_detach_scene_drops_history() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.select(&["a"]);
    let scene = h.editor.detach_scene();
    assert!(scene.is_some());
    assert!(h.undo_labels().is_empty());
    assert!(h.selected().is_empty());
    assert_eq!(h.ui.affordances(), EditAffordances::default());
}

#[test]
fn test_affordances_follow_state() {
    let mut h = TestHarness::new();
    assert_eq!(h.ui.affordances(), EditAffordances::default());

    h.add(brick_at("a", 0.0, 0.0));
    assert!(h.ui.affordances().can_undo);

    h.select(&["a"]);
    assert!(h.ui.affordances().has_selection);
    assert!(!h.ui.affordances().can_paste);

    h.copy().unwrap();
    assert!(h.ui.affordances().can_paste);

    h.undo().unwrap();
    let a = h.ui.affordances();
    assert!(a.can_redo);
    assert!(!a.can_undo);
}

#[test]
fn test_select_all_and_deselect_all() {
    let mut h = TestHarness::new();
    h.add_all(brick_row("b", 4));
    assert_eq!(h.editor.select_all().unwrap(), 4);
    assert_eq!(h.selected().len(), 4);
    h.editor.deselect_all();
    assert!(h.selected().is_empty());
}

#[test]
fn test_toggle_selection() {
    let mut h = TestHarness::new();
    h.add_all(brick_row("b", 2));
    h.editor.select("b0".into());
    h.editor.toggle("b1".into());
    assert_eq!(h.selected(), vec!["b0".to_string(), "b1".to_string()]);
    h.editor.toggle("b0".into());
    assert_eq!(h.selected(), vec!["b1".to_string()]);
}

#[test]
fn test_dispatch_table() {
    let mut h = TestHarness::new();
    h.add_all(brick_row("b", 2));
    h.settle();
    dispatch(&mut h.editor, EditCommand::SelectAll).unwrap();
    dispatch(&mut h.editor, EditCommand::Duplicate).unwrap();
    assert_eq!(h.element_count(), 4);
    h.settle();
    dispatch(&mut h.editor, EditCommand::Undo).unwrap();
    assert_eq!(h.element_count(), 2);
    dispatch(&mut h.editor, EditCommand::DeselectAll).unwrap();
    assert!(matches!(
        dispatch(&mut h.editor, EditCommand::Delete),
        Err(EditError::NothingSelected)
    ));
}

#[test]
fn test_keyboard_delete_and_escape() {
    let mut h = TestHarness::new();
    h.add_all(brick_row("b", 2));
    h.select(&["b0"]);
    h.settle();

    let result = handle_key(&mut h.editor, "Delete", Modifiers::NONE, false).unwrap();
    assert_eq!(result.unwrap()["removed"], 1);

    h.select(&["b1"]);
    handle_key(&mut h.editor, "Escape", Modifiers::NONE, false).unwrap().unwrap();
    assert!(h.selected().is_empty());

    assert!(handle_key(&mut h.editor, "q", Modifiers::NONE, false).is_none());
}

#[test]
fn test_keyboard_copy_paste() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.select(&["a"]);
    h.settle();
    handle_key(&mut h.editor, "c", Modifiers::CTRL, false).unwrap().unwrap();
    handle_key(&mut h.editor, "v", Modifiers::CTRL, false).unwrap().unwrap();
    assert_eq!(h.element_count(), 2);
}

#[test]
fn test_load_scene_resets_history_and_clipboard() {
    let mut h = TestHarness::new();
    h.add(brick_at("a", 0.0, 0.0));
    h.select(&["a"]);
    h.copy().unwrap();

    h.load_scene_json(&scene_json(brick_row("w", 3))).unwrap();
    assert_eq!(h.element_count(), 3);
    assert_eq!(h.undo_labels(), vec!["initial_state"]);
    assert!(!h.editor.clipboard.has_contents());
    assert!(h.selected().is_empty());
}
