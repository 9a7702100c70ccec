//! Map input records consumed by the builder.
//!
//! These mirror the DOOM VERTEXES/LINEDEFS/SIDEDEFS/SECTORS lumps after the
//! loader has resolved sidedefs to sectors. The builder never parses a file
//! format itself; it only needs positions, line endpoints and which sector
//! lies on each side.

use std::fmt;

use config::constants::MAX_COORDINATE;
use serde::{Deserialize, Serialize};

use crate::error::{BspError, BspResult};
use crate::geom::{AABox, Vec2};

pub mod analysis;

pub use analysis::{analyze_lines, LineInfo, SkipReason};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque reference to a map sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorId(pub u32);

/// Index of a linedef in [`MapData::linedefs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// LINEDEFS
// =============================================================================

/// Per-linedef flags relevant to node building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFlags {
    /// The map marks the line as two-sided.
    pub two_sided: bool,
    /// Both sides face the same sector on purpose (deep water, invisible
    /// bridges). Also inferred when `front == back`.
    pub self_ref: bool,
    /// The line belongs to a polyobject and is excluded from the tree.
    pub polyobj: bool,
}

/// A directed wall segment between two map vertices.
///
/// The front sector lies on the right of `start → end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDef {
    /// Index of the start vertex.
    pub start: u32,
    /// Index of the end vertex.
    pub end: u32,
    /// Sector on the right-hand side, if there is a front sidedef.
    pub front: Option<SectorId>,
    /// Sector on the left-hand side, if there is a back sidedef.
    pub back: Option<SectorId>,
    /// Builder-relevant flags.
    #[serde(default)]
    pub flags: LineFlags,
}

impl LineDef {
    /// A solid wall with only a front side.
    pub fn one_sided(start: u32, end: u32, front: Option<SectorId>) -> Self {
        Self {
            start,
            end,
            front,
            back: None,
            flags: LineFlags::default(),
        }
    }

    /// A line with sectors on both sides.
    pub fn two_sided(start: u32, end: u32, front: SectorId, back: SectorId) -> Self {
        Self {
            start,
            end,
            front: Some(front),
            back: Some(back),
            flags: LineFlags {
                two_sided: true,
                self_ref: front == back,
                polyobj: false,
            },
        }
    }
}

// =============================================================================
// MAP DATA
// =============================================================================

/// Vertices and linedefs of one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Vertex positions in map units.
    pub vertices: Vec<Vec2>,
    /// Linedefs referencing `vertices` by index.
    pub linedefs: Vec<LineDef>,
}

impl MapData {
    /// Checks indices and coordinates before any geometry is derived.
    ///
    /// Coordinates must be finite and no larger than [`MAX_COORDINATE`] in
    /// magnitude.
    ///
    /// # Examples
    /// ```
    /// use bsp_builder::{BspError, LineDef, MapData, Vec2};
    ///
    /// let map = MapData {
    ///     vertices: vec![Vec2::ZERO],
    ///     linedefs: vec![LineDef::one_sided(0, 5, None)],
    /// };
    /// assert!(matches!(
    ///     map.validate(),
    ///     Err(BspError::InvalidVertexReference { line: 0, vertex: 5 })
    /// ));
    /// ```
    pub fn validate(&self) -> BspResult<()> {
        if self.linedefs.is_empty() {
            return Err(BspError::EmptyMap);
        }

        for (index, position) in self.vertices.iter().enumerate() {
            let in_range = |c: f64| c.is_finite() && c.abs() <= MAX_COORDINATE;
            if !in_range(position.x) || !in_range(position.y) {
                return Err(BspError::InvalidCoordinate {
                    vertex: index as u32,
                    x: position.x,
                    y: position.y,
                });
            }
        }

        let count = self.vertices.len() as u32;
        for (index, line) in self.linedefs.iter().enumerate() {
            for vertex in [line.start, line.end] {
                if vertex >= count {
                    return Err(BspError::InvalidVertexReference {
                        line: index as u32,
                        vertex,
                    });
                }
            }
        }

        Ok(())
    }

    /// Bounds of every vertex referenced by a linedef.
    ///
    /// Assumes [`MapData::validate`] passed.
    pub fn line_bounds(&self) -> AABox {
        let mut bounds = AABox::empty();
        for line in &self.linedefs {
            bounds.add_point(self.vertices[line.start as usize]);
            bounds.add_point(self.vertices[line.end as usize]);
        }
        bounds
    }

    /// Start and end positions of linedef `line`.
    pub fn line_points(&self, line: LineId) -> (Vec2, Vec2) {
        let def = &self.linedefs[line.0 as usize];
        (
            self.vertices[def.start as usize],
            self.vertices[def.end as usize],
        )
    }
}
