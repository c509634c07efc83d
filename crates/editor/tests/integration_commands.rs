//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use wallsim_editor_lib::command::{execute_json, execute_json_batch};
use wallsim_editor_lib::harness::TestHarness;

fn add_brick(h: &mut TestHarness, id: &str, x: f64) {
    let json = format!(
        r#"{{"command": "add_element", "id": "{id}", "type": "brick", "position": {{"x": {x}, "y": 0.0, "z": 0.0}}, "dimensions": {{"width": 20.0, "depth": 10.0, "height": 6.5}}}}"#
    );
    let resp = execute_json(&mut h.editor, &json).unwrap();
    assert!(resp.success, "{:?}", resp.error);
}

#[test]
fn test_command_add_element() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    assert_eq!(h.element_count(), 1);
    let a = h.element("a").unwrap();
    assert_eq!(a.dimensions.width, 20.0);
}

#[test]
fn test_command_add_duplicate_id_fails() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    let json = r#"{"command": "add_element", "id": "a", "position": {"x": 0.0, "y": 0.0, "z": 0.0}}"#;
    let resp = execute_json(&mut h.editor, json).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("already exists"));
    assert_eq!(h.element_count(), 1);
}

#[test]
fn test_command_remove_element() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    let resp = execute_json(&mut h.editor, r#"{"command": "remove_element", "id": "a"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["removed"], true);
    assert_eq!(h.element_count(), 0);

    let resp = execute_json(&mut h.editor, r#"{"command": "remove_element", "id": "a"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], false);
}

#[test]
fn test_command_copy_paste_flow() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);

    let resp = execute_json(&mut h.editor, r#"{"command": "select", "ids": ["a"]}"#).unwrap();
    assert!(resp.success);
    let resp = execute_json(&mut h.editor, r#"{"command": "copy"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["copied"], 1);

    let resp = execute_json(&mut h.editor, r#"{"command": "paste"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["ids"].as_array().unwrap().len(), 1);
    assert_eq!(data["offset"]["x"], 30.0);
    assert_eq!(h.element_count(), 2);
}

#[test]
fn test_command_menu_action() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    h.settle();
    let resp = execute_json(&mut h.editor, r#"{"command": "action", "id": "undoAction"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["restored"], "initial_state");
    assert_eq!(h.element_count(), 0);
}

#[test]
fn test_command_key_shortcut() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    h.settle();

    let resp = execute_json(&mut h.editor, r#"{"command": "key", "key": "z", "ctrl": true}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.element_count(), 0);

    let resp = execute_json(&mut h.editor, r#"{"command": "key", "key": "Z", "meta": true, "shift": true}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.element_count(), 1);
}

#[test]
fn test_command_key_in_text_field_is_ignored() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    h.settle();
    let resp = execute_json(&mut h.editor, r#"{"command": "key", "key": "z", "ctrl": true, "text_focus": true}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["handled"], false);
    assert_eq!(h.element_count(), 1);
}

#[test]
fn test_command_event() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    let json = r#"{"command": "event", "event": {"type": "sceneModified", "detail": {"action": "move_element"}}}"#;
    let resp = execute_json(&mut h.editor, json).unwrap();
    assert!(resp.success);
    assert_eq!(h.undo_labels().last().map(String::as_str), Some("move_element"));
}

#[test]
fn test_command_inspect() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    add_brick(&mut h, "b", 40.0);
    execute_json(&mut h.editor, r#"{"command": "select", "ids": ["b"]}"#).unwrap();

    let resp = execute_json(&mut h.editor, r#"{"command": "inspect"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["element_count"], 2);
    assert_eq!(data["elements"][0]["name"], "Brick (a)");
    assert_eq!(data["elements"][1]["selected"], true);
    assert_eq!(data["selected"][0], "b");
    assert_eq!(data["affordances"]["can_undo"], true);
    assert_eq!(data["affordances"]["can_paste"], false);
}

#[test]
fn test_command_history() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    let resp = execute_json(&mut h.editor, r#"{"command": "history"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["undo"], serde_json::json!(["initial_state", "add_element"]));
    assert_eq!(data["redo"], serde_json::json!([]));
    assert_eq!(data["can_undo"], true);
}

#[test]
fn test_command_clear_is_undoable() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    add_brick(&mut h, "b", 40.0);
    let resp = execute_json(&mut h.editor, r#"{"command": "clear"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], 2);
    assert_eq!(h.element_count(), 0);

    h.undo().unwrap();
    assert_eq!(h.element_count(), 2);
}

#[test]
fn test_command_export_scene() {
    let mut h = TestHarness::new();
    add_brick(&mut h, "a", 0.0);
    let resp = execute_json(&mut h.editor, r#"{"command": "export_scene"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["scene"]["elements"][0]["id"], "a");
    assert_eq!(data["scene"]["version"], 1);
}

#[test]
fn test_command_failure_reports_message() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h.editor, r#"{"command": "delete"}"#).unwrap();
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("Nothing selected"));
    assert!(resp.data.is_none());
}

#[test]
fn test_command_batch() {
    let mut h = TestHarness::new();
    let json = r#"[
        {"command": "add_element", "id": "a", "position": {"x": 0.0, "y": 0.0, "z": 0.0}},
        {"command": "add_element", "id": "b", "position": {"x": 50.0, "y": 0.0, "z": 0.0}},
        {"command": "select_all"},
        {"command": "copy"},
        {"command": "clear_selection"},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h.editor, json).unwrap();
    assert_eq!(responses.len(), 6);
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[2].data.as_ref().unwrap()["selected"], 2);
    assert_eq!(responses[5].data.as_ref().unwrap()["selected"], serde_json::json!([]));
    assert!(h.editor.clipboard.has_contents());
}

#[test]
fn test_command_invalid_json() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h.editor, "not valid json").is_err());
    assert!(execute_json(&mut h.editor, r#"{"command": "fly"}"#).is_err());
    assert!(execute_json_batch(&mut h.editor, r#"{"command": "undo"}"#).is_err());
}
