//! Half-edge BSP node builder for DOOM-format maps.
//!
//! This crate ingests a map's vertices and linedefs and produces a binary
//! space partition whose leaves are convex, closed loops of half-edges, each
//! bordering a single sector. The tree is what a renderer walks front to
//! back and what collision code uses for point containment.
//!
//! ## Pipeline
//!
//! ```text
//! MapData ──► analysis ──► half-edges ──► SuperBlock index
//!                                             │
//!                    ┌────────────────────────┘
//!                    ▼
//!        choose partition ──► divide ──► mini half-edges ──► recurse
//!                    │
//!                    └─ convex ──► leaf ──► wind + sanity checks
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bsp_builder::{build_bsp, LineDef, MapData, SectorId, Vec2};
//!
//! let sector = Some(SectorId(0));
//! let map = MapData {
//!     vertices: vec![
//!         Vec2::new(0.0, 0.0),
//!         Vec2::new(0.0, 64.0),
//!         Vec2::new(64.0, 64.0),
//!         Vec2::new(64.0, 0.0),
//!     ],
//!     linedefs: vec![
//!         LineDef::one_sided(0, 1, sector),
//!         LineDef::one_sided(1, 2, sector),
//!         LineDef::one_sided(2, 3, sector),
//!         LineDef::one_sided(3, 0, sector),
//!     ],
//! };
//!
//! let tree = build_bsp(&map).unwrap();
//! assert_eq!(tree.leaf_count(), 1);
//! assert_eq!(tree.node_count(), 0);
//! ```

pub mod builder;
pub mod diagnostics;
pub mod divide;
pub mod error;
pub mod geom;
pub mod half_edge;
pub mod hplane;
mod leaf;
#[cfg(test)]
mod fixtures;
pub mod map;
pub mod partition;
pub mod settings;
pub mod superblock;
pub mod tree;

pub use builder::{build_bsp, BspBuilder};
pub use diagnostics::{BuildReport, BuildStats, BuildWarning};
pub use error::{BspError, BspResult};
pub use geom::{AABox, Vec2};
pub use half_edge::{HEdge, HEdgeId, Side, Vertex, VertexId};
pub use map::{LineDef, LineFlags, LineId, MapData, SectorId};
pub use settings::BuilderConfig;
pub use tree::{BspElement, BspLeaf, BspNode, BspTree, LeafId, NodeId, Partition};
