//! Error types for edit operations and the scene collaborator.

use crate::notify::Severity;

/// Failure raised by a scene collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid scene document: {0}")]
    InvalidScene(#[source] serde_json::Error),
    #[error("invalid element record: {0}")]
    InvalidElement(#[source] serde_json::Error),
    #[error("element already exists: {0}")]
    DuplicateId(String),
}

/// Failure of an edit command. None of these are fatal to the application.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("nothing selected")]
    NothingSelected,
    #[error("clipboard is empty")]
    ClipboardEmpty,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("scene is not available")]
    SceneUnavailable,
    #[error("another history operation is in progress")]
    Busy,
    #[error("repeated invocation ignored")]
    Debounced,
    #[error("failed to restore scene: {0}")]
    Restore(#[source] SceneError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl EditError {
    /// Severity of the user notice for this error; `None` means it is not shown.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::NothingSelected | Self::ClipboardEmpty => Some(Severity::Warning),
            Self::NothingToUndo | Self::NothingToRedo => Some(Severity::Info),
            Self::SceneUnavailable | Self::Restore(_) | Self::Scene(_) => Some(Severity::Error),
            Self::Busy | Self::Debounced => None,
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::NothingSelected => "Nothing selected".to_string(),
            Self::ClipboardEmpty => "Clipboard is empty".to_string(),
            Self::NothingToUndo => "Nothing to undo".to_string(),
            Self::NothingToRedo => "Nothing to redo".to_string(),
            Self::SceneUnavailable => "Scene is not ready yet".to_string(),
            other => other.to_string(),
        }
    }
}
