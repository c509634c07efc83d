//! Application settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::placement::{DEFAULT_GRID_SPACING, SAFETY_MARGIN};

/// Undo/redo history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo snapshots kept
    pub capacity: usize,
    /// Repeated undo requests inside this window are ignored
    pub undo_cooldown_ms: u64,
    /// Repeated redo requests inside this window are ignored
    pub redo_cooldown_ms: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: 50,
            undo_cooldown_ms: 300,
            redo_cooldown_ms: 300,
        }
    }
}

/// Copy/paste and delete settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Repeated copy requests inside this window are ignored
    pub copy_cooldown_ms: u64,
    /// Repeated delete requests inside this window are ignored
    pub delete_cooldown_ms: u64,
    /// Clearance kept between pasted content and existing elements
    pub safety_margin: f64,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            copy_cooldown_ms: 500,
            delete_cooldown_ms: 1500,
            safety_margin: SAFETY_MARGIN,
        }
    }
}

/// Grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Grid cell size in scene units
    pub spacing: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_GRID_SPACING,
        }
    }
}

/// Autosave settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveSettings {
    /// Write the scene to the data directory on exit
    pub enabled: bool,
    /// Load the autosaved scene on start when no scene is given
    pub restore_on_start: bool,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            restore_on_start: true,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub clipboard: ClipboardSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub autosave: AutosaveSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wallsim3d", "wallsim3d")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => {
                        tracing::warn!("Ignoring invalid settings file {}: {e}", config_path.display());
                    }
                }
            }
        }
        Self::default()
    }
}
