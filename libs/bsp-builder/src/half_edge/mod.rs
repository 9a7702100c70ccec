//! Half-edge and vertex storage for a single build.
//!
//! Every half-edge and vertex lives in one [`HalfEdgeStore`] and is referred
//! to by integer handle. Splitting, twin linking and the per-vertex edge tips
//! used for open-sector queries are all implemented here; deciding *where* a
//! split tail is filed is left to the builder context.

use std::fmt;

use config::constants::ANG_EPSILON;
use serde::{Deserialize, Serialize};

use crate::error::{BspError, BspResult};
use crate::geom::{compute_angle, LineGeometry, Vec2};
use crate::map::{LineId, SectorId};
use crate::superblock::BlockId;
use crate::tree::LeafId;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Unique identifier for half-edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HEdgeId(pub u32);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of its linedef a half-edge runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Same direction as the linedef.
    Front,
    /// Opposite direction to the linedef.
    Back,
}

/// Where a half-edge is currently filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HEdgeOwner {
    /// Not linked anywhere (freshly created or popped from an index).
    Unfiled,
    /// Linked directly into a superblock's own list.
    Block(BlockId),
    /// Part of a finished leaf.
    Leaf(LeafId),
}

// =============================================================================
// VERTICES
// =============================================================================

/// One wall leaving a vertex, seen from the vertex.
///
/// `left` and `right` are the sectors on either hand when walking away from
/// the vertex in direction `angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeTip {
    /// Direction of the wall, degrees in `[0, 360)`.
    pub angle: f64,
    /// Sector on the left-hand side.
    pub left: Option<SectorId>,
    /// Sector on the right-hand side.
    pub right: Option<SectorId>,
}

/// A map vertex or a vertex created by a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in map units.
    pub position: Vec2,
    /// Number of half-edge endpoints using this vertex.
    pub ref_count: u32,
    /// Walls leaving the vertex, ascending by angle.
    pub tips: Vec<EdgeTip>,
}

impl Vertex {
    /// Creates an unreferenced vertex without tips.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ref_count: 0,
            tips: Vec::new(),
        }
    }
}

// =============================================================================
// HALF-EDGES
// =============================================================================

/// A directed piece of a linedef, or of a partition for mini half-edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HEdge {
    /// Start vertex.
    pub start: VertexId,
    /// End vertex.
    pub end: VertexId,
    /// Owning linedef; `None` for mini half-edges.
    pub linedef: Option<LineId>,
    /// Line the half-edge lies along. For mini half-edges this is the line
    /// the partition was taken from.
    pub source_line: Option<LineId>,
    /// Sector on the right-hand side.
    pub sector: Option<SectorId>,
    /// Which side of the linedef this half-edge belongs to.
    pub side: Side,
    /// Opposite half-edge, if any.
    pub twin: Option<HEdgeId>,
    /// Current filing location.
    pub owner: HEdgeOwner,
    /// Sequential index assigned when leaves are wound.
    pub index: Option<u32>,
    /// Distance from the start of the linedef side to `start`.
    pub offset: f64,
    /// Cached geometry, refreshed whenever an endpoint moves.
    pub geometry: LineGeometry,
}

impl HEdge {
    /// True for half-edges inserted along a partition to close a leaf.
    pub fn is_mini(&self) -> bool {
        self.linedef.is_none()
    }

    /// Length in map units.
    pub fn length(&self) -> f64 {
        self.geometry.length
    }
}

/// Result of [`HalfEdgeStore::split_half_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitResult {
    /// Vertex created at the split point.
    pub vertex: VertexId,
    /// New half-edge from the split vertex to the old end.
    pub tail: HEdgeId,
    /// New twin half-edge from the old end to the split vertex.
    pub twin_tail: Option<HEdgeId>,
}

// =============================================================================
// STORE
// =============================================================================

/// Arena of vertices and half-edges.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeStore {
    vertices: Vec<Vertex>,
    hedges: Vec<HEdge>,
}

impl HalfEdgeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the map's vertices, keeping their
    /// indices.
    pub fn with_vertices(positions: &[Vec2]) -> Self {
        Self {
            vertices: positions.iter().copied().map(Vertex::new).collect(),
            hedges: Vec::new(),
        }
    }

    /// Appends a vertex.
    pub fn add_vertex(&mut self, position: Vec2) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Vertex by handle.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0 as usize]
    }

    /// Mutable vertex by handle.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0 as usize]
    }

    /// Position of a vertex.
    pub fn position(&self, id: VertexId) -> Vec2 {
        self.vertices[id.0 as usize].position
    }

    /// Half-edge by handle.
    pub fn hedge(&self, id: HEdgeId) -> &HEdge {
        &self.hedges[id.0 as usize]
    }

    /// Mutable half-edge by handle.
    pub fn hedge_mut(&mut self, id: HEdgeId) -> &mut HEdge {
        &mut self.hedges[id.0 as usize]
    }

    /// All vertices, original map vertices first.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All half-edges in creation order.
    pub fn hedges(&self) -> &[HEdge] {
        &self.hedges
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges.
    pub fn hedge_count(&self) -> usize {
        self.hedges.len()
    }

    /// Hands the arenas over to the output tree.
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<HEdge>) {
        (self.vertices, self.hedges)
    }

    /// Creates an unfiled half-edge and counts its endpoint references.
    ///
    /// # Errors
    ///
    /// [`BspError::ZeroLengthHalfEdge`] when both endpoints coincide.
    pub fn create_half_edge(
        &mut self,
        linedef: Option<LineId>,
        source_line: Option<LineId>,
        start: VertexId,
        end: VertexId,
        sector: Option<SectorId>,
        side: Side,
    ) -> BspResult<HEdgeId> {
        let geometry = LineGeometry::new(self.position(start), self.position(end));
        self.check_length(start, end, &geometry)?;

        let id = HEdgeId(self.hedges.len() as u32);
        self.hedges.push(HEdge {
            start,
            end,
            linedef,
            source_line,
            sector,
            side,
            twin: None,
            owner: HEdgeOwner::Unfiled,
            index: None,
            offset: 0.0,
            geometry,
        });
        self.vertex_mut(start).ref_count += 1;
        self.vertex_mut(end).ref_count += 1;
        Ok(id)
    }

    /// Links two half-edges as twins of each other.
    pub fn link_twins(&mut self, a: HEdgeId, b: HEdgeId) {
        self.hedge_mut(a).twin = Some(b);
        self.hedge_mut(b).twin = Some(a);
    }

    /// Records a wall leaving `vertex` in direction `delta`.
    ///
    /// Tips stay sorted by ascending angle; a tip whose angle is within
    /// [`ANG_EPSILON`] of an existing one goes after it.
    pub fn add_edge_tip(
        &mut self,
        vertex: VertexId,
        delta: Vec2,
        left: Option<SectorId>,
        right: Option<SectorId>,
    ) {
        let tip = EdgeTip {
            angle: compute_angle(delta),
            left,
            right,
        };
        let tips = &mut self.vertex_mut(vertex).tips;

        let mut pos = tips.len();
        while pos > 0 && tip.angle + ANG_EPSILON < tips[pos - 1].angle {
            pos -= 1;
        }
        tips.insert(pos, tip);
    }

    /// Splits `edge` at `point`, mirroring the split on its twin.
    ///
    /// `edge` keeps its start and now ends at the new vertex; the returned
    /// tail runs from the new vertex to the old end and copies the edge's
    /// sector, side and lines. When the edge has a twin, the twin is
    /// shortened to start at the new vertex and a twin tail is created; the
    /// two pairs are re-linked. The new half-edges are left unfiled.
    ///
    /// # Errors
    ///
    /// [`BspError::ZeroLengthHalfEdge`] when `point` coincides with an
    /// endpoint.
    pub fn split_half_edge(&mut self, edge: HEdgeId, point: Vec2) -> BspResult<SplitResult> {
        let old = self.hedge(edge).clone();
        let twin = old.twin;

        let vertex = self.add_vertex(point);
        self.vertex_mut(vertex).ref_count = if twin.is_some() { 4 } else { 2 };

        let twin_sector = twin.and_then(|t| self.hedge(t).sector);
        let delta = old.geometry.delta;
        self.add_edge_tip(vertex, -delta, old.sector, twin_sector);
        self.add_edge_tip(vertex, delta, twin_sector, old.sector);

        self.set_end(edge, vertex)?;
        let tail = self.push_copy(&old, vertex, old.end)?;

        let twin_tail = match twin {
            Some(old_twin) => {
                let twin_copy = self.hedge(old_twin).clone();
                self.set_start(old_twin, vertex)?;
                let twin_tail = self.push_copy(&twin_copy, twin_copy.start, vertex)?;
                self.link_twins(tail, twin_tail);
                Some(twin_tail)
            }
            None => None,
        };

        Ok(SplitResult {
            vertex,
            tail,
            twin_tail,
        })
    }

    /// Sector that is open at `vertex` in `direction`, if any.
    ///
    /// Returns `Ok(None)` when a wall leaves the vertex in exactly that
    /// direction. Otherwise returns the right-hand sector of the first tip
    /// counter-clockwise from `direction`, wrapping to the left-hand sector
    /// of the last tip.
    ///
    /// # Errors
    ///
    /// [`BspError::VertexWithoutTips`] when no wall touches the vertex.
    pub fn open_sector_at_vertex(
        &self,
        vertex: VertexId,
        direction: Vec2,
    ) -> BspResult<Option<SectorId>> {
        let v = self.vertex(vertex);
        let Some(last) = v.tips.last() else {
            return Err(BspError::VertexWithoutTips {
                vertex,
                x: v.position.x,
                y: v.position.y,
            });
        };

        let angle = compute_angle(direction);

        let on_wall = v.tips.iter().any(|tip| {
            let diff = (tip.angle - angle).abs();
            diff < ANG_EPSILON || diff > 360.0 - ANG_EPSILON
        });
        if on_wall {
            return Ok(None);
        }

        Ok(v.tips
            .iter()
            .find(|tip| angle + ANG_EPSILON < tip.angle)
            .map_or(last.left, |tip| tip.right))
    }

    fn check_length(&self, start: VertexId, end: VertexId, geometry: &LineGeometry) -> BspResult<()> {
        if geometry.length <= 0.0 {
            return Err(BspError::ZeroLengthHalfEdge {
                start,
                end,
                x: geometry.origin.x,
                y: geometry.origin.y,
            });
        }
        Ok(())
    }

    fn set_start(&mut self, edge: HEdgeId, start: VertexId) -> BspResult<()> {
        let end = self.hedge(edge).end;
        self.reshape(edge, start, end)
    }

    fn set_end(&mut self, edge: HEdgeId, end: VertexId) -> BspResult<()> {
        let start = self.hedge(edge).start;
        self.reshape(edge, start, end)
    }

    fn reshape(&mut self, edge: HEdgeId, start: VertexId, end: VertexId) -> BspResult<()> {
        let geometry = LineGeometry::new(self.position(start), self.position(end));
        self.check_length(start, end, &geometry)?;
        let hedge = self.hedge_mut(edge);
        hedge.start = start;
        hedge.end = end;
        hedge.geometry = geometry;
        Ok(())
    }

    /// Pushes an unfiled copy of `template` spanning `start → end`. Endpoint
    /// references are already accounted for by the split.
    fn push_copy(&mut self, template: &HEdge, start: VertexId, end: VertexId) -> BspResult<HEdgeId> {
        let geometry = LineGeometry::new(self.position(start), self.position(end));
        self.check_length(start, end, &geometry)?;

        let id = HEdgeId(self.hedges.len() as u32);
        self.hedges.push(HEdge {
            start,
            end,
            twin: None,
            owner: HEdgeOwner::Unfiled,
            index: None,
            geometry,
            ..template.clone()
        });
        Ok(id)
    }
}
