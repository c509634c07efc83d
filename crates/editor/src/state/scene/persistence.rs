//! Autosave/load functionality

use shared::SceneDocument;

use super::SceneState;

impl SceneState {
    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "wallsim3d", "wallsim3d")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save scene to autosave file
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Cannot create autosave directory {}: {e}", parent.display());
                }
            }
            match serde_json::to_string_pretty(&self.document) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        tracing::warn!("Autosave to {} failed: {e}", path.display());
                    }
                }
                Err(e) => tracing::warn!("Autosave serialization failed: {e}"),
            }
        }
    }

    /// Load scene from autosave file
    pub fn load_autosave() -> Option<SceneDocument> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Load a scene document from a JSON file
    pub fn load_file(path: &std::path::Path) -> Result<SceneDocument, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene file {}: {e}", path.display()))?;
        serde_json::from_str(&json)
            .map_err(|e| format!("Failed to parse scene JSON from {}: {e}", path.display()))
    }
}
