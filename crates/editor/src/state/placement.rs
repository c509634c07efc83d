//! Paste placement: find an offset that keeps pasted elements clear of the scene.
//!
//! Works in the X/Z (ground) plane. Candidates are tried on growing rings
//! around the clipboard's original location, eight directions per ring, and
//! the first one that overlaps nothing wins. Elevation is never changed.

use serde::{Deserialize, Serialize};
use shared::WallElement;

/// Grid unit assumed when the scene does not report one
pub const DEFAULT_GRID_SPACING: f64 = 10.0;
/// Lower bound for the ring step
pub const MIN_BASE_OFFSET: f64 = 25.0;
/// Clearance added around every existing element
pub const SAFETY_MARGIN: f64 = 5.0;
/// Number of rings searched before giving up
pub const MAX_RINGS: u32 = 10;

/// Displacement applied to every pasted element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlacementOffset {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle on the X/Z plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Footprint {
    pub fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Rectangle of size `width` × `depth` centred on (`x`, `z`)
    pub fn centered(x: f64, z: f64, width: f64, depth: f64) -> Self {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        Self::new(x - hw, x + hw, z - hd, z + hd)
    }

    pub fn of_element(element: &WallElement) -> Self {
        Self::centered(
            element.position.x,
            element.position.z,
            element.dimensions.width,
            element.dimensions.depth,
        )
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.max_x + margin,
            self.min_z - margin,
            self.max_z + margin,
        )
    }

    pub fn translated(&self, dx: f64, dz: f64) -> Self {
        Self::new(self.min_x + dx, self.max_x + dx, self.min_z + dz, self.max_z + dz)
    }

    pub fn union(&self, other: &Footprint) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_z.min(other.min_z),
            self.max_z.max(other.max_z),
        )
    }

    /// Inclusive overlap test; touching edges count as a collision
    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.max_x >= other.min_x
            && self.min_x <= other.max_x
            && self.max_z >= other.min_z
            && self.min_z <= other.max_z
    }
}

/// Bounding rectangle of a set of elements, `None` when empty
pub fn bounding_footprint<'a>(elements: impl IntoIterator<Item = &'a WallElement>) -> Option<Footprint> {
    elements
        .into_iter()
        .map(Footprint::of_element)
        .reduce(|acc, f| acc.union(&f))
}

/// Spiral candidate search for a collision-free paste offset
#[derive(Debug, Clone, Copy)]
pub struct PasteOffsetResolver {
    grid_spacing: f64,
    margin: f64,
}

impl PasteOffsetResolver {
    /// `grid_spacing` falls back to [`DEFAULT_GRID_SPACING`] when missing or not positive
    pub fn new(grid_spacing: Option<f64>) -> Self {
        let grid_spacing = grid_spacing
            .filter(|g| g.is_finite() && *g > 0.0)
            .unwrap_or(DEFAULT_GRID_SPACING);
        Self {
            grid_spacing,
            margin: SAFETY_MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Ring step: three grid cells, never less than [`MIN_BASE_OFFSET`]
    pub fn base_offset(&self) -> f64 {
        (3.0 * self.grid_spacing).max(MIN_BASE_OFFSET)
    }

    /// The eight candidates of one ring, in search order:
    /// right, left, forward, backward, then the four diagonals
    pub fn ring(distance: f64) -> [PlacementOffset; 8] {
        let d = distance;
        [
            PlacementOffset::new(d, 0.0, 0.0),
            PlacementOffset::new(-d, 0.0, 0.0),
            PlacementOffset::new(0.0, 0.0, d),
            PlacementOffset::new(0.0, 0.0, -d),
            PlacementOffset::new(d, 0.0, d),
            PlacementOffset::new(-d, 0.0, d),
            PlacementOffset::new(d, 0.0, -d),
            PlacementOffset::new(-d, 0.0, -d),
        ]
    }

    /// First candidate whose translated `clipboard` box clears every
    /// `existing` footprint (plus margin); `(base, 0, base)` if none does.
    pub fn resolve(&self, clipboard: &Footprint, existing: &[Footprint]) -> PlacementOffset {
        let base = self.base_offset();
        let obstacles: Vec<Footprint> = existing.iter().map(|f| f.expanded(self.margin)).collect();

        for ring in 1..=MAX_RINGS {
            let distance = base * f64::from(ring);
            for candidate in Self::ring(distance) {
                let moved = clipboard.translated(candidate.x, candidate.z);
                if !obstacles.iter().any(|o| moved.overlaps(o)) {
                    return candidate;
                }
            }
        }

        tracing::debug!(base, "no free paste position found, using fallback offset");
        PlacementOffset::new(base, 0.0, base)
    }
}
