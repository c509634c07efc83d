//! Keyboard shortcut handling

use serde::{Deserialize, Serialize};

use crate::command::{dispatch, EditCommand};
use crate::editor::Editor;
use crate::error::EditError;

/// Modifier keys held with a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    /// Cmd on macOS
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on Linux/Windows, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Map a key press to an edit command. `key` is the key name as reported by
/// the UI ("z", "Delete", "Escape", ...); letters are case-insensitive.
///
/// Nothing is mapped while a text input has focus.
pub fn shortcut_for(key: &str, modifiers: Modifiers, text_focus: bool) -> Option<EditCommand> {
    if text_focus || modifiers.alt {
        return None;
    }

    if modifiers.command() {
        return match key.to_ascii_lowercase().as_str() {
            // Ctrl+Shift+Z = redo
            "z" if modifiers.shift => Some(EditCommand::Redo),
            "z" => Some(EditCommand::Undo),
            "y" => Some(EditCommand::Redo),
            "c" => Some(EditCommand::Copy),
            "x" => Some(EditCommand::Cut),
            "v" => Some(EditCommand::Paste),
            "a" => Some(EditCommand::SelectAll),
            "d" => Some(EditCommand::Duplicate),
            _ => None,
        };
    }

    match key {
        "Delete" | "Backspace" => Some(EditCommand::Delete),
        "Escape" => Some(EditCommand::DeselectAll),
        _ => None,
    }
}

/// Run the command bound to a key press, if any
pub fn handle_key(
    editor: &mut Editor,
    key: &str,
    modifiers: Modifiers,
    text_focus: bool,
) -> Option<Result<serde_json::Value, EditError>> {
    let command = shortcut_for(key, modifiers, text_focus)?;
    tracing::debug!(key, ?command, "shortcut");
    Some(dispatch(editor, command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(shortcut_for("z", Modifiers::CTRL, false), Some(EditCommand::Undo));
        assert_eq!(shortcut_for("Z", Modifiers::CTRL.with_shift(), false), Some(EditCommand::Redo));
        assert_eq!(shortcut_for("y", Modifiers::CTRL, false), Some(EditCommand::Redo));
    }

    #[test]
    fn test_meta_acts_as_command() {
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(shortcut_for("c", cmd, false), Some(EditCommand::Copy));
        assert_eq!(shortcut_for("v", cmd, false), Some(EditCommand::Paste));
    }

    #[test]
    fn test_clipboard_and_selection_bindings() {
        assert_eq!(shortcut_for("x", Modifiers::CTRL, false), Some(EditCommand::Cut));
        assert_eq!(shortcut_for("a", Modifiers::CTRL, false), Some(EditCommand::SelectAll));
        assert_eq!(shortcut_for("d", Modifiers::CTRL, false), Some(EditCommand::Duplicate));
        assert_eq!(shortcut_for("Escape", Modifiers::NONE, false), Some(EditCommand::DeselectAll));
    }

    #[test]
    fn test_delete_keys() {
        assert_eq!(shortcut_for("Delete", Modifiers::NONE, false), Some(EditCommand::Delete));
        assert_eq!(shortcut_for("Backspace", Modifiers::NONE, false), Some(EditCommand::Delete));
    }

    #[test]
    fn test_plain_letters_unbound() {
        assert_eq!(shortcut_for("z", Modifiers::NONE, false), None);
        assert_eq!(shortcut_for("c", Modifiers::NONE, false), None);
    }

    #[test]
    fn test_text_focus_suppresses_everything() {
        assert_eq!(shortcut_for("z", Modifiers::CTRL, true), None);
        assert_eq!(shortcut_for("Delete", Modifiers::NONE, true), None);
    }

    #[test]
    fn test_alt_combinations_unbound() {
        let m = Modifiers {
            alt: true,
            ..Modifiers::CTRL
        };
        assert_eq!(shortcut_for("z", m, false), None);
    }
}
