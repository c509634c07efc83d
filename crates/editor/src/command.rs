//! Edit commands and the JSON command protocol.
//!
//! [`EditCommand`] is what menus and shortcuts trigger. [`AgentCommand`] is the
//! line-oriented JSON protocol spoken by the headless shell and by scripts.

use serde::{Deserialize, Serialize};
use shared::{Dimensions, ElementKind, Position, WallElement};

use crate::editor::{Editor, SceneEvent};
use crate::error::EditError;
use crate::keyboard::{handle_key, Modifiers};
use crate::state::scene::element_display_name;

/// An edit command bound to a menu entry or a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditCommand {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    DeselectAll,
}

impl EditCommand {
    /// Resolve a menu action id ("undoAction", "pasteAction", ...)
    pub fn from_action_id(id: &str) -> Option<Self> {
        match id {
            "undoAction" => Some(Self::Undo),
            "redoAction" => Some(Self::Redo),
            "copyAction" => Some(Self::Copy),
            "cutAction" => Some(Self::Cut),
            "pasteAction" => Some(Self::Paste),
            "duplicateAction" => Some(Self::Duplicate),
            "deleteAction" => Some(Self::Delete),
            "selectAllAction" => Some(Self::SelectAll),
            _ => None,
        }
    }

    /// Menu action id; `DeselectAll` has no menu entry
    pub fn action_id(&self) -> Option<&'static str> {
        match self {
            Self::Undo => Some("undoAction"),
            Self::Redo => Some("redoAction"),
            Self::Copy => Some("copyAction"),
            Self::Cut => Some("cutAction"),
            Self::Paste => Some("pasteAction"),
            Self::Duplicate => Some("duplicateAction"),
            Self::Delete => Some("deleteAction"),
            Self::SelectAll => Some("selectAllAction"),
            Self::DeselectAll => None,
        }
    }
}

/// Run an edit command. Returns a small JSON summary of what happened.
pub fn dispatch(editor: &mut Editor, command: EditCommand) -> Result<serde_json::Value, EditError> {
    use serde_json::json;

    match command {
        EditCommand::Undo => editor.undo().map(|restored| json!({ "restored": restored })),
        EditCommand::Redo => editor.redo().map(|restored| json!({ "restored": restored })),
        EditCommand::Copy => editor.copy().map(|count| json!({ "copied": count })),
        EditCommand::Cut => editor
            .cut()
            .map(|o| json!({ "copied": o.copied, "removed": o.removed })),
        EditCommand::Paste => editor
            .paste()
            .map(|o| json!({ "ids": o.ids, "offset": o.offset })),
        EditCommand::Duplicate => editor
            .duplicate()
            .map(|o| json!({ "ids": o.ids, "offset": o.offset })),
        EditCommand::Delete => editor.delete_selected().map(|count| json!({ "removed": count })),
        EditCommand::SelectAll => editor.select_all().map(|count| json!({ "selected": count })),
        EditCommand::DeselectAll => {
            editor.deselect_all();
            Ok(json!({ "selected": 0 }))
        }
    }
}

/// A command the JSON protocol accepts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add an element; a fresh id is generated when none is given
    AddElement {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "type", default)]
        kind: ElementKind,
        position: Position,
        #[serde(default)]
        dimensions: Dimensions,
        #[serde(default)]
        rotation: f64,
        #[serde(default)]
        material: Option<String>,
    },
    /// Remove an element by ID
    RemoveElement {
        id: String,
    },
    /// Run an edit command directly
    Edit {
        edit: EditCommand,
    },
    /// Run the command behind a menu action id
    Action {
        id: String,
    },
    /// Simulate a key press
    Key {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
        #[serde(default)]
        text_focus: bool,
    },
    /// Deliver a scene event
    Event {
        event: SceneEvent,
    },
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    /// Replace the selection
    Select {
        ids: Vec<String>,
    },
    ClearSelection,
    /// Empty the scene
    Clear,
    /// List elements, selection and edit affordances
    Inspect,
    /// List history labels
    History,
    /// Export the scene as JSON
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result(result: Result<serde_json::Value, EditError>) -> Self {
        match result {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(e.user_message()),
        }
    }
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut Editor, cmd: AgentCommand) -> CommandResponse {
    use serde_json::json;

    match cmd {
        AgentCommand::AddElement {
            id,
            kind,
            position,
            dimensions,
            rotation,
            material,
        } => {
            let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut element = WallElement::new(id, kind, position, dimensions);
            element.rotation = rotation;
            element.material = material;
            CommandResponse::from_result(editor.add_element(element).map(|id| json!({ "id": id })))
        }

        AgentCommand::RemoveElement { id } => CommandResponse::from_result(
            editor
                .remove_element(&id)
                .map(|removed| json!({ "removed": removed })),
        ),

        AgentCommand::Edit { edit } => CommandResponse::from_result(dispatch(editor, edit)),

        AgentCommand::Action { id } => match EditCommand::from_action_id(&id) {
            Some(command) => CommandResponse::from_result(dispatch(editor, command)),
            None => CommandResponse::err(format!("Unknown action: {id}")),
        },

        AgentCommand::Key {
            key,
            modifiers,
            text_focus,
        } => match handle_key(editor, &key, modifiers, text_focus) {
            Some(result) => CommandResponse::from_result(result),
            None => CommandResponse::ok_with_data(json!({ "handled": false })),
        },

        AgentCommand::Event { event } => {
            editor.on_event(event);
            CommandResponse::ok()
        }

        AgentCommand::Undo => CommandResponse::from_result(dispatch(editor, EditCommand::Undo)),
        AgentCommand::Redo => CommandResponse::from_result(dispatch(editor, EditCommand::Redo)),
        AgentCommand::Copy => CommandResponse::from_result(dispatch(editor, EditCommand::Copy)),
        AgentCommand::Cut => CommandResponse::from_result(dispatch(editor, EditCommand::Cut)),
        AgentCommand::Paste => CommandResponse::from_result(dispatch(editor, EditCommand::Paste)),
        AgentCommand::Duplicate => {
            CommandResponse::from_result(dispatch(editor, EditCommand::Duplicate))
        }
        AgentCommand::Delete => CommandResponse::from_result(dispatch(editor, EditCommand::Delete)),
        AgentCommand::SelectAll => {
            CommandResponse::from_result(dispatch(editor, EditCommand::SelectAll))
        }

        AgentCommand::Select { ids } => {
            editor.selection.replace(ids.clone());
            editor.refresh();
            CommandResponse::ok_with_data(json!({ "selected": ids }))
        }

        AgentCommand::ClearSelection => {
            editor.deselect_all();
            CommandResponse::ok()
        }

        AgentCommand::Clear => CommandResponse::from_result(
            editor.clear_scene().map(|count| json!({ "removed": count })),
        ),

        AgentCommand::Inspect => inspect(editor),

        AgentCommand::History => CommandResponse::ok_with_data(json!({
            "undo": editor.history.undo_stack().labels(),
            "redo": editor.history.redo_stack().labels(),
            "undo_len": editor.history.undo_len(),
            "redo_len": editor.history.redo_len(),
            "can_undo": editor.history.can_undo(),
            "can_redo": editor.history.can_redo(),
        })),

        AgentCommand::ExportScene => match editor.scene() {
            Ok(scene) => CommandResponse::ok_with_data(json!({ "scene": scene.export_scene() })),
            Err(e) => CommandResponse::err(e.user_message()),
        },
    }
}

fn inspect(editor: &Editor) -> CommandResponse {
    let scene = match editor.scene() {
        Ok(scene) => scene,
        Err(e) => return CommandResponse::err(e.user_message()),
    };
    let elements: Vec<serde_json::Value> = scene
        .element_ids()
        .iter()
        .filter_map(|id| scene.serialize_element(id))
        .filter_map(|value| WallElement::from_json(&value).ok())
        .map(|element| {
            serde_json::json!({
                "id": element.id,
                "name": element_display_name(&element),
                "type": element.kind,
                "position": element.position,
                "selected": editor.selection.is_selected(&element.id),
            })
        })
        .collect();
    CommandResponse::ok_with_data(serde_json::json!({
        "element_count": elements.len(),
        "elements": elements,
        "selected": editor.selection.all(),
        "active": editor.selection.active(),
        "affordances": editor.affordances(),
    }))
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut Editor, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(editor: &mut Editor, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
