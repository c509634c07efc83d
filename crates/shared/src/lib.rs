use serde::{Deserialize, Serialize};

/// Unique identifier of an element in the scene
pub type ElementId = String;

fn default_version() -> u32 {
    1
}

/// Kind of construction element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[default]
    Brick,
    Block,
    Wall,
    Lintel,
    Column,
    Beam,
    Footing,
    /// Kinds this model does not know about; the tag is kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl ElementKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Brick => "Brick",
            ElementKind::Block => "Block",
            ElementKind::Wall => "Wall",
            ElementKind::Lintel => "Lintel",
            ElementKind::Column => "Column",
            ElementKind::Beam => "Beam",
            ElementKind::Footing => "Footing",
            ElementKind::Other(_) => "Element",
        }
    }
}

/// Element center in world coordinates (Y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by the given displacement
    pub fn offset_by(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// Element size. `width` runs along X, `depth` along Z, `height` along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub depth: f64,
    #[serde(default)]
    pub height: f64,
    /// Run length for linear elements (walls, beams)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
            length: None,
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// A placed construction element as persisted in the scene document.
///
/// Fields this model does not know about are kept in `extra` and written back
/// unchanged, so documents from newer editors survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallElement {
    pub id: ElementId,
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    pub position: Position,
    pub dimensions: Dimensions,
    /// Rotation around the Y axis in degrees
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WallElement {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, position: Position, dimensions: Dimensions) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            dimensions,
            rotation: 0.0,
            material: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Serialize to a JSON record
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parse a JSON record produced by [`WallElement::to_json`]
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Scene document: every element placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Elements in placement order
    pub elements: Vec<WallElement>,
    /// Free-form document metadata (project name, units, ...)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            elements: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }
}

impl SceneDocument {
    pub fn get(&self, id: &str) -> Option<&WallElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}
