//! Finished BSP tree.
//!
//! Nodes and leaves are stored in flat arenas and linked by [`BspElement`]
//! handles. The tree owns every vertex and half-edge produced by the build,
//! so it can be queried and serialized on its own.

use serde::{Deserialize, Serialize};

use crate::diagnostics::BuildReport;
use crate::geom::{AABox, LineGeometry, Vec2};
use crate::half_edge::{HEdge, HEdgeId, Vertex, VertexId};
use crate::map::{LineId, SectorId};


/// Unique identifier for nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Unique identifier for leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafId(pub u32);

/// Child reference inside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BspElement {
    /// An internal node.
    Node(NodeId),
    /// A convex leaf.
    Leaf(LeafId),
}

/// An infinite dividing line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// A point on the line.
    pub origin: Vec2,
    /// Direction; its length is that of the source half-edge.
    pub direction: Vec2,
    /// Linedef the partition was taken from.
    pub source_line: Option<LineId>,
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            direction: Vec2::X,
            source_line: None,
        }
    }
}

impl Partition {
    /// Geometry of the segment `origin → origin + direction`.
    pub fn geometry(&self) -> LineGeometry {
        LineGeometry::new(self.origin, self.origin + self.direction)
    }
}

/// An internal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspNode {
    /// The dividing line.
    pub partition: Partition,
    /// Bounds of everything on the right.
    pub right_bounds: AABox,
    /// Bounds of everything on the left.
    pub left_bounds: AABox,
    /// Right subtree.
    pub right: BspElement,
    /// Left subtree.
    pub left: BspElement,
}

/// A convex leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspLeaf {
    /// Half-edges in clockwise order once the tree is finished.
    pub hedges: Vec<HEdgeId>,
    /// Sector of the first real half-edge.
    pub sector: Option<SectorId>,
    /// Average of the half-edge endpoints.
    pub centroid: Vec2,
}

impl BspLeaf {
    /// Creates an unwound leaf.
    pub fn new(hedges: Vec<HEdgeId>) -> Self {
        Self {
            hedges,
            sector: None,
            centroid: Vec2::ZERO,
        }
    }
}

/// The output of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspTree {
    /// Root element; a single leaf for convex maps.
    pub root: BspElement,
    /// Internal nodes.
    pub nodes: Vec<BspNode>,
    /// Leaves.
    pub leaves: Vec<BspLeaf>,
    /// Every half-edge, including ones created by splits.
    pub hedges: Vec<HEdge>,
    /// Every vertex: map vertices first, then split vertices.
    pub vertices: Vec<Vertex>,
    /// Warnings and statistics.
    pub report: BuildReport,
}

impl BspTree {
    /// Node by handle.
    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id.0 as usize]
    }

    /// Leaf by handle.
    pub fn leaf(&self, id: LeafId) -> &BspLeaf {
        &self.leaves[id.0 as usize]
    }

    /// Half-edge by handle.
    pub fn hedge(&self, id: HEdgeId) -> &HEdge {
        &self.hedges[id.0 as usize]
    }

    /// Vertex by handle.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0 as usize]
    }

    /// Half-edges of a leaf in winding order.
    pub fn leaf_hedges(&self, id: LeafId) -> impl Iterator<Item = &HEdge> + '_ {
        self.leaf(id).hedges.iter().map(move |&h| self.hedge(h))
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Number of internal nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf containing `point`. Points on a partition go right.
    pub fn find_leaf(&self, point: Vec2) -> LeafId {
        let mut current = self.root;
        loop {
            match current {
                BspElement::Leaf(leaf) => return leaf,
                BspElement::Node(id) => {
                    let node = self.node(id);
                    current = if node.partition.geometry().perp_dist(point) >= 0.0 {
                        node.right
                    } else {
                        node.left
                    };
                }
            }
        }
    }

    /// Every leaf ordered front to back as seen from `point`.
    pub fn leaves_front_to_back(&self, point: Vec2) -> Vec<LeafId> {
        let mut out = Vec::with_capacity(self.leaves.len());
        let mut stack = vec![self.root];
        while let Some(element) = stack.pop() {
            match element {
                BspElement::Leaf(leaf) => out.push(leaf),
                BspElement::Node(id) => {
                    let node = self.node(id);
                    let (near, far) = if node.partition.geometry().perp_dist(point) >= 0.0 {
                        (node.right, node.left)
                    } else {
                        (node.left, node.right)
                    };
                    stack.push(far);
                    stack.push(near);
                }
            }
        }
        out
    }

    /// Elements in post-order: right subtree, left subtree, then the node.
    pub fn post_order(&self) -> Vec<BspElement> {
        post_order(&self.nodes, self.root)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((element, depth)) = stack.pop() {
            match element {
                BspElement::Leaf(_) => deepest = deepest.max(depth),
                BspElement::Node(id) => {
                    let node = self.node(id);
                    stack.push((node.left, depth + 1));
                    stack.push((node.right, depth + 1));
                }
            }
        }
        deepest
    }
}

/// Post-order listing of the subtree at `root`.
pub(crate) fn post_order(nodes: &[BspNode], root: BspElement) -> Vec<BspElement> {
    let mut out = Vec::new();
    let mut stack = vec![(root, false)];
    while let Some((element, expanded)) = stack.pop() {
        match element {
            BspElement::Leaf(_) => out.push(element),
            BspElement::Node(_) if expanded => out.push(element),
            BspElement::Node(id) => {
                let node = &nodes[id.0 as usize];
                stack.push((element, true));
                stack.push((node.left, false));
                stack.push((node.right, false));
            }
        }
    }
    out
}
