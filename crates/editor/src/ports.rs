//! Collaborator interfaces injected into the editor.
//!
//! The scene engine, the clock, the UI, the quantity take-off and the feature
//! flags all live outside this crate. The editor only talks to them through
//! these traits so tests can hand in fakes.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use shared::{ElementId, WallElement};

use crate::error::{EditError, SceneError};
use crate::notify::{EditorUi, Notification, Severity};
use crate::state::placement::Footprint;

/// The live scene (the 3D scene manager in the browser build)
pub trait SceneService {
    /// Serialize the whole scene
    fn export_scene(&self) -> serde_json::Value;

    /// Replace the whole scene with a previously exported one
    fn import_scene(&mut self, data: &serde_json::Value) -> Result<(), SceneError>;

    /// Remove every element
    fn clear_all(&mut self);

    fn contains(&self, id: &str) -> bool;

    /// Element ids in placement order
    fn element_ids(&self) -> Vec<ElementId>;

    fn element_count(&self) -> usize {
        self.element_ids().len()
    }

    /// Serialized record of one element, if present
    fn serialize_element(&self, id: &str) -> Option<serde_json::Value>;

    /// X/Z footprints of every element (center ± half width/depth)
    fn footprints(&self) -> Vec<Footprint>;

    /// Build the renderable element and add it to the scene
    fn add_element(&mut self, element: WallElement) -> Result<ElementId, SceneError>;

    fn remove_element(&mut self, id: &str) -> bool;

    /// Snapping grid unit, when the scene has one configured
    fn grid_spacing(&self) -> Option<f64> {
        None
    }
}

/// Millisecond clock used for snapshot timestamps and cooldowns
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Quantity / material take-off that must be refreshed after bulk edits
pub trait QuantityService {
    fn recalculate(&mut self);
}

/// Scene feature flags that restoration has to switch off temporarily
pub trait FeatureFlags {
    /// Whether newly imported walls are joined to their neighbours automatically
    fn auto_join(&self) -> bool;

    fn set_auto_join(&mut self, enabled: bool);
}

/// Every collaborator the editor needs, injected at construction
pub struct Services {
    /// `None` until the scene engine has finished initializing
    pub scene: Option<Box<dyn SceneService>>,
    pub clock: Box<dyn Clock>,
    pub ui: Box<dyn EditorUi>,
    pub quantities: Option<Box<dyn QuantityService>>,
    pub flags: Option<Box<dyn FeatureFlags>>,
}

impl Services {
    pub fn new(clock: Box<dyn Clock>, ui: Box<dyn EditorUi>) -> Self {
        Self {
            scene: None,
            clock,
            ui,
            quantities: None,
            flags: None,
        }
    }

    pub fn with_scene(mut self, scene: Box<dyn SceneService>) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn with_quantities(mut self, quantities: Box<dyn QuantityService>) -> Self {
        self.quantities = Some(quantities);
        self
    }

    pub fn with_flags(mut self, flags: Box<dyn FeatureFlags>) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn scene(&self) -> Result<&dyn SceneService, EditError> {
        self.scene.as_deref().ok_or(EditError::SceneUnavailable)
    }

    pub fn scene_mut(&mut self) -> Result<&mut (dyn SceneService + 'static), EditError> {
        self.scene.as_deref_mut().ok_or(EditError::SceneUnavailable)
    }

    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.ui.notify(Notification::new(severity, message));
    }

    /// Trigger the quantity take-off, if one is attached
    pub fn recalculate_quantities(&mut self) {
        if let Some(quantities) = self.quantities.as_mut() {
            quantities.recalculate();
        }
    }
}
