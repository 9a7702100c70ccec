//! 2D geometry primitives for the node builder.
//!
//! Provides the `glam::DVec2` alias used for all map coordinates, the cached
//! line geometry shared by half-edges and partitions, and the two bounding
//! box flavours: integer [`BlockBounds`] for the superblock index and
//! floating [`AABox`] for node bounds.

use config::constants::DIST_EPSILON;
use serde::{Deserialize, Serialize};

pub use glam::DVec2 as Vec2;

// =============================================================================
// ANGLES
// =============================================================================

/// Direction of `delta` in degrees, in the range `[0, 360)`.
///
/// Vertical directions are answered exactly so that tips along the Y axis
/// compare equal regardless of `atan2` rounding.
///
/// # Examples
/// ```
/// use bsp_builder::geom::{compute_angle, Vec2};
///
/// assert_eq!(compute_angle(Vec2::new(1.0, 0.0)), 0.0);
/// assert_eq!(compute_angle(Vec2::new(0.0, 5.0)), 90.0);
/// assert_eq!(compute_angle(Vec2::new(0.0, -5.0)), 270.0);
/// assert_eq!(compute_angle(Vec2::new(-1.0, 0.0)), 180.0);
/// ```
pub fn compute_angle(delta: Vec2) -> f64 {
    if delta.x == 0.0 {
        return if delta.y > 0.0 { 90.0 } else { 270.0 };
    }

    let angle = delta.y.atan2(delta.x).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

// =============================================================================
// LINE GEOMETRY
// =============================================================================

/// Which side of a directed line something lies on.
///
/// "Right" is the side a walker along the line has on their right hand in a
/// Y-up map coordinate system; it is where a linedef's front sector lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSide {
    /// Strictly left of the line.
    Left,
    /// On the line (within [`DIST_EPSILON`]) or crossing it.
    On,
    /// Strictly right of the line.
    Right,
}

/// Cached geometry of a directed line segment.
///
/// The perpendicular and parallel coefficients let distance queries run in a
/// handful of multiplies, which matters because partition evaluation calls
/// them for every half-edge against every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    /// Start point.
    pub origin: Vec2,
    /// End point minus start point.
    pub delta: Vec2,
    /// Euclidean length of `delta`.
    pub length: f64,
    /// Direction in degrees, `[0, 360)`.
    pub angle: f64,
    perp: f64,
    para: f64,
}

impl LineGeometry {
    /// Computes the geometry of the segment `start → end`.
    ///
    /// A zero-length segment yields `length == 0.0`; callers must reject it
    /// before asking for distances.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        let delta = end - start;
        Self {
            origin: start,
            delta,
            length: delta.length(),
            angle: compute_angle(delta),
            perp: start.y * delta.x - start.x * delta.y,
            para: -start.x * delta.x - start.y * delta.y,
        }
    }

    /// End point of the segment.
    pub fn end(&self) -> Vec2 {
        self.origin + self.delta
    }

    /// Signed perpendicular distance of `point` from the infinite line.
    ///
    /// Positive values are on the right side.
    ///
    /// # Examples
    /// ```
    /// use bsp_builder::geom::{LineGeometry, Vec2};
    ///
    /// // Pointing up the Y axis: +X is on the right.
    /// let line = LineGeometry::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
    /// assert_eq!(line.perp_dist(Vec2::new(3.0, 5.0)), 3.0);
    /// assert_eq!(line.perp_dist(Vec2::new(-2.0, 5.0)), -2.0);
    /// ```
    pub fn perp_dist(&self, point: Vec2) -> f64 {
        (point.x * self.delta.y - point.y * self.delta.x + self.perp) / self.length
    }

    /// Signed distance of `point`'s projection along the line, measured from
    /// the origin.
    pub fn para_dist(&self, point: Vec2) -> f64 {
        (point.x * self.delta.x + point.y * self.delta.y + self.para) / self.length
    }

    /// Classifies `point` with a [`DIST_EPSILON`] dead zone around the line.
    pub fn point_side(&self, point: Vec2) -> LineSide {
        let perp = self.perp_dist(point);
        if perp.abs() <= DIST_EPSILON {
            LineSide::On
        } else if perp < 0.0 {
            LineSide::Left
        } else {
            LineSide::Right
        }
    }

    /// True when the line runs exactly along the X axis.
    pub fn is_horizontal(&self) -> bool {
        self.delta.y == 0.0
    }

    /// True when the line runs exactly along the Y axis.
    pub fn is_vertical(&self) -> bool {
        self.delta.x == 0.0
    }

    /// True for purely horizontal or purely vertical lines.
    pub fn is_axis_aligned(&self) -> bool {
        self.is_horizontal() || self.is_vertical()
    }
}

// =============================================================================
// BOUNDING BOXES
// =============================================================================

/// Integer bounding box of a superblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockBounds {
    /// Left edge.
    pub x1: i32,
    /// Bottom edge.
    pub y1: i32,
    /// Right edge.
    pub x2: i32,
    /// Top edge.
    pub y2: i32,
}

impl BlockBounds {
    /// Creates bounds from explicit edges.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Root bounds for a map whose coordinates lie within `limits`.
    ///
    /// The origin is aligned down to a multiple of 8 and each extent is
    /// rounded up to a power-of-two number of 128-unit blocks, so that
    /// repeated halving lands on whole coordinates.
    ///
    /// `limits` must lie within ±[`MAX_COORDINATE`](config::constants::MAX_COORDINATE),
    /// which [`MapData::validate`](crate::map::MapData::validate) enforces.
    ///
    /// # Examples
    /// ```
    /// use bsp_builder::geom::{AABox, BlockBounds, Vec2};
    ///
    /// let limits = AABox::new(Vec2::new(3.0, -20.0), Vec2::new(300.0, 40.0));
    /// let root = BlockBounds::for_map(&limits);
    /// assert_eq!((root.x1, root.y1), (0, -24));
    /// assert_eq!(root.width(), 512);
    /// assert_eq!(root.height(), 128);
    /// ```
    pub fn for_map(limits: &AABox) -> Self {
        use config::constants::{BLOCK_ALIGN_MASK, BLOCK_UNIT};

        let min_x = limits.min.x.floor() as i32;
        let min_y = limits.min.y.floor() as i32;
        let max_x = limits.max.x.ceil() as i32;
        let max_y = limits.max.y.ceil() as i32;

        let x1 = min_x - (min_x & BLOCK_ALIGN_MASK);
        let y1 = min_y - (min_y & BLOCK_ALIGN_MASK);
        let blocks_w = ((max_x - x1) / BLOCK_UNIT + 1) as u32;
        let blocks_h = ((max_y - y1) / BLOCK_UNIT + 1) as u32;

        Self {
            x1,
            y1,
            x2: x1 + BLOCK_UNIT * blocks_w.next_power_of_two() as i32,
            y2: y1 + BLOCK_UNIT * blocks_h.next_power_of_two() as i32,
        }
    }

    /// Horizontal extent.
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Midpoint, rounded towards zero like the integer halving it mirrors.
    pub const fn mid(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// True when both sides are at or under `size`.
    pub const fn is_leaf(&self, size: i32) -> bool {
        self.width() <= size && self.height() <= size
    }

    /// True when the block is split along X (wider than high, or square).
    pub const fn splits_along_x(&self) -> bool {
        self.width() >= self.height()
    }

    /// Bounds of child `child` (0 = low half, 1 = high half).
    pub const fn child(&self, child: usize) -> Self {
        let (mid_x, mid_y) = self.mid();
        if self.splits_along_x() {
            if child == 1 {
                Self::new(mid_x, self.y1, self.x2, self.y2)
            } else {
                Self::new(self.x1, self.y1, mid_x, self.y2)
            }
        } else if child == 1 {
            Self::new(self.x1, mid_y, self.x2, self.y2)
        } else {
            Self::new(self.x1, self.y1, self.x2, mid_y)
        }
    }

    /// Centre of the block as a floating point position.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x1 as f64 + self.x2 as f64) / 2.0,
            (self.y1 as f64 + self.y2 as f64) / 2.0,
        )
    }
}

/// Axis-aligned bounding box in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABox {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl AABox {
    /// Creates a box from its corners.
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// An inverted box that any added point replaces.
    pub const fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True when no point was ever added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grows the box to include `point`.
    pub fn add_point(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Box with its corners rounded outwards to whole map units.
    pub fn rounded_out(&self) -> Self {
        Self {
            min: self.min.floor(),
            max: self.max.ceil(),
        }
    }

    /// True when `point` lies inside or on the box.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

impl Default for AABox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests;
