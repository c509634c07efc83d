//! Scene state management
//!
//! In-memory scene document used by the headless shell and the test harness.
//! It implements [`SceneService`](crate::ports::SceneService), the same port the
//! browser build implements on top of its 3D scene manager.

mod display;
mod element_ops;
mod persistence;

pub use display::{element_display_name, short_id};

use shared::{SceneDocument, WallElement};

/// Scene state with elements
#[derive(Debug, Default)]
pub struct SceneState {
    /// Current scene document
    pub(crate) document: SceneDocument,
    /// Snapping grid unit reported to the paste resolver
    grid_spacing: Option<f64>,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid_spacing(mut self, spacing: f64) -> Self {
        self.grid_spacing = Some(spacing);
        self
    }

    pub fn from_document(document: SceneDocument) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn document(&self) -> &SceneDocument {
        &self.document
    }

    /// Replace the whole document
    pub fn set_document(&mut self, document: SceneDocument) {
        self.document = document;
        self.version += 1;
    }

    /// Get an element by ID
    pub fn get_element(&self, id: &str) -> Option<&WallElement> {
        self.document.get(id)
    }

    pub fn len(&self) -> usize {
        self.document.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.elements.is_empty()
    }
}
