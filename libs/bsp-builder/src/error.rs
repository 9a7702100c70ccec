//! # Error Types
//!
//! Fatal errors of a BSP build. Any of these aborts the whole build: the map
//! is malformed or degenerate and must not be loaded.
//!
//! ## Error Policy
//!
//! - Recoverable oddities (unclosed sectors, facing mismatches, open leaves)
//!   are reported as [`crate::BuildWarning`]s and never surface here
//! - Every error carries enough geometric context (indices, coordinates) for
//!   the caller to point a map author at the problem

use config::constants::ConfigError;
use thiserror::Error;

use crate::half_edge::VertexId;
use crate::map::LineId;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that abort a BSP build.
///
/// ## Example
///
/// ```rust
/// use bsp_builder::{build_bsp, BspError, MapData};
///
/// match build_bsp(&MapData::default()) {
///     Err(BspError::EmptyMap) => {}
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BspError {
    /// The map has no usable linedef, so there is nothing to partition.
    #[error("map has no usable linedefs")]
    EmptyMap,

    /// A linedef refers to a vertex index outside the vertex array.
    #[error("linedef #{line} references missing vertex #{vertex}")]
    InvalidVertexReference {
        /// Offending linedef.
        line: u32,
        /// Index that was out of range.
        vertex: u32,
    },

    /// A vertex coordinate is NaN, infinite or out of range.
    #[error("vertex #{vertex} has invalid coordinates ({x}, {y})")]
    InvalidCoordinate {
        /// Offending vertex.
        vertex: u32,
        /// X coordinate as read.
        x: f64,
        /// Y coordinate as read.
        y: f64,
    },

    /// A half-edge was constructed with coincident endpoints.
    #[error("half-edge from vertex #{start} to #{end} near ({x:.1}, {y:.1}) has zero length")]
    ZeroLengthHalfEdge {
        /// Start vertex.
        start: VertexId,
        /// End vertex.
        end: VertexId,
        /// Approximate X position.
        x: f64,
        /// Approximate Y position.
        y: f64,
    },

    /// A finished leaf contains only mini half-edges.
    #[error("leaf #{leaf} near ({x:.1}, {y:.1}) has no real half-edge")]
    LeafWithoutRealHalfEdge {
        /// Offending leaf.
        leaf: u32,
        /// Leaf centroid X.
        x: f64,
        /// Leaf centroid Y.
        y: f64,
    },

    /// Intercepts along a partition went backwards while merging.
    #[error("bad intercept order along partition: {previous:.3} > {next:.3}")]
    InterceptOrder {
        /// Distance of the earlier intercept.
        previous: f64,
        /// Distance of the later intercept.
        next: f64,
    },

    /// An open-sector query hit a vertex that no half-edge touches.
    #[error("vertex #{vertex} at ({x:.1}, {y:.1}) has no edge tips")]
    VertexWithoutTips {
        /// Offending vertex.
        vertex: VertexId,
        /// Vertex X.
        x: f64,
        /// Vertex Y.
        y: f64,
    },

    /// Dividing by the chosen partition left one side empty.
    #[error("partition along linedef {line:?} left the {side} side empty")]
    EmptyPartitionSide {
        /// Linedef the partition was taken from.
        line: Option<LineId>,
        /// `"right"` or `"left"`.
        side: &'static str,
    },

    /// The tree grew deeper than the configured limit.
    #[error("BSP depth limit {limit} exceeded near ({x:.1}, {y:.1})")]
    RecursionLimit {
        /// Configured limit.
        limit: usize,
        /// X of the block being partitioned.
        x: f64,
        /// Y of the block being partitioned.
        y: f64,
    },

    /// Builder settings failed validation.
    #[error("invalid builder configuration: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for BSP build operations.
pub type BspResult<T> = Result<T, BspError>;

// =============================================================================
// TESTS
// =============================================================================
