//! Element CRUD operations and the scene port implementation

use serde::Deserialize;
use shared::{ElementId, SceneDocument, WallElement};

use super::SceneState;
use crate::error::SceneError;
use crate::ports::SceneService;
use crate::state::placement::Footprint;

impl SceneService for SceneState {
    fn export_scene(&self) -> serde_json::Value {
        serde_json::to_value(&self.document).unwrap_or(serde_json::Value::Null)
    }

    fn import_scene(&mut self, data: &serde_json::Value) -> Result<(), SceneError> {
        let document = SceneDocument::deserialize(data).map_err(SceneError::InvalidScene)?;
        self.set_document(document);
        Ok(())
    }

    fn clear_all(&mut self) {
        self.document.elements.clear();
        self.version += 1;
    }

    fn contains(&self, id: &str) -> bool {
        self.document.contains(id)
    }

    fn element_ids(&self) -> Vec<ElementId> {
        self.document.elements.iter().map(|e| e.id.clone()).collect()
    }

    fn element_count(&self) -> usize {
        self.document.elements.len()
    }

    fn serialize_element(&self, id: &str) -> Option<serde_json::Value> {
        self.get_element(id).map(WallElement::to_json)
    }

    fn footprints(&self) -> Vec<Footprint> {
        self.document.elements.iter().map(Footprint::of_element).collect()
    }

    fn add_element(&mut self, element: WallElement) -> Result<ElementId, SceneError> {
        if self.document.contains(&element.id) {
            return Err(SceneError::DuplicateId(element.id));
        }
        let id = element.id.clone();
        self.document.elements.push(element);
        self.version += 1;
        Ok(id)
    }

    fn remove_element(&mut self, id: &str) -> bool {
        let before = self.document.elements.len();
        self.document.elements.retain(|e| e.id != id);
        let removed = self.document.elements.len() != before;
        if removed {
            self.version += 1;
        }
        removed
    }

    fn grid_spacing(&self) -> Option<f64> {
        self.grid_spacing
    }
}
