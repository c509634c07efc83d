//! User-facing notices and edit affordances pushed to the UI layer.

use serde::{Deserialize, Serialize};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, non-blocking notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Which edit commands are currently available (menu/button enablement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditAffordances {
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_paste: bool,
    pub has_selection: bool,
}

/// UI port: receives notices and affordance updates
pub trait EditorUi {
    fn notify(&mut self, notification: Notification);

    fn refresh(&mut self, affordances: EditAffordances);
}

/// UI port that only logs. Used by the headless shell.
#[derive(Debug, Default)]
pub struct TracingUi {
    last: EditAffordances,
}

impl EditorUi for TracingUi {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info | Severity::Success => tracing::info!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            Severity::Error => tracing::error!("{}", notification.message),
        }
    }

    fn refresh(&mut self, affordances: EditAffordances) {
        if affordances != self.last {
            tracing::debug!(?affordances, "edit affordances changed");
            self.last = affordances;
        }
    }
}
