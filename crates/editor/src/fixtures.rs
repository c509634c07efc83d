//! Factory functions for creating test data.
//!
//! Element and scene builders plus recording stand-ins for the UI, quantity
//! and feature-flag ports. Used by unit tests, integration tests and the
//! test harness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::*;

use crate::notify::{EditAffordances, EditorUi, Notification, Severity};
use crate::ports::{FeatureFlags, QuantityService};

// ── Element factories ───────────────────────────────────────────

/// Standard brick (20 x 10 x 6.5) centred at (x, 0, z).
pub fn brick_at(id: &str, x: f64, z: f64) -> WallElement {
    WallElement::new(id, ElementKind::Brick, Position::new(x, 0.0, z), Dimensions::new(20.0, 10.0, 6.5))
}

/// Concrete block (40 x 20 x 20) centred at (x, 0, z).
pub fn block_at(id: &str, x: f64, z: f64) -> WallElement {
    WallElement::new(id, ElementKind::Block, Position::new(x, 0.0, z), Dimensions::new(40.0, 20.0, 20.0))
}

/// A row of `count` bricks along X, edge to edge, starting at x = 0.
pub fn brick_row(prefix: &str, count: usize) -> Vec<WallElement> {
    (0..count)
        .map(|i| brick_at(&format!("{prefix}{i}"), i as f64 * 20.0, 0.0))
        .collect()
}

// ── Scene factories ─────────────────────────────────────────────

/// Scene document holding the given elements.
pub fn scene_with(elements: Vec<WallElement>) -> SceneDocument {
    SceneDocument {
        elements,
        ..Default::default()
    }
}

/// Scene document as JSON.
pub fn scene_json(elements: Vec<WallElement>) -> String {
    serde_json::to_string(&scene_with(elements)).unwrap_or_default()
}

// ── Port stand-ins ──────────────────────────────────────────────

/// UI port that remembers every notification and affordance update.
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    notifications: Rc<RefCell<Vec<Notification>>>,
    affordances: Rc<Cell<EditAffordances>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.borrow().last().cloned()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn affordances(&self) -> EditAffordances {
        self.affordances.get()
    }

    pub fn clear(&self) {
        self.notifications.borrow_mut().clear();
    }
}

impl EditorUi for RecordingUi {
    fn notify(&mut self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    fn refresh(&mut self, affordances: EditAffordances) {
        self.affordances.set(affordances);
    }
}

/// Quantity service that counts recalculation requests.
#[derive(Debug, Clone, Default)]
pub struct CountingQuantities {
    calls: Rc<Cell<usize>>,
}

impl CountingQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl QuantityService for CountingQuantities {
    fn recalculate(&mut self) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// Feature flags with an observable auto-join switch.
#[derive(Debug, Clone)]
pub struct ToggleFlags {
    auto_join: Rc<Cell<bool>>,
    /// Every value ever written, in order
    writes: Rc<RefCell<Vec<bool>>>,
}

impl ToggleFlags {
    pub fn new(auto_join: bool) -> Self {
        Self {
            auto_join: Rc::new(Cell::new(auto_join)),
            writes: Rc::default(),
        }
    }

    pub fn is_on(&self) -> bool {
        self.auto_join.get()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.borrow().clone()
    }
}

impl FeatureFlags for ToggleFlags {
    fn auto_join(&self) -> bool {
        self.auto_join.get()
    }

    fn set_auto_join(&mut self, enabled: bool) {
        self.writes.borrow_mut().push(enabled);
        self.auto_join.set(enabled);
    }
}
