//! Node builder entry points.
//!
//! [`BspBuilder`] validates and analyses the map, creates the initial
//! half-edges and then recursively partitions them:
//!
//! ```text
//! build_node(block)
//!   ├─ no partition  ──► drain block into a leaf
//!   └─ partition     ──► divide into right/left blocks
//!                        merge intercepts, add mini half-edges
//!                        build_node(right), build_node(left)
//! ```
//!
//! All mutable state of a build lives in one [`BuildContext`], so independent
//! maps can be built on separate threads.

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use rayon::prelude::*;
use stacker::maybe_grow;

use crate::diagnostics::{BuildReport, BuildStats, Diagnostics};
use crate::error::{BspError, BspResult};
use crate::geom::{AABox, BlockBounds};
use crate::half_edge::{HEdgeId, HEdgeOwner, HalfEdgeStore, Side, VertexId};
use crate::hplane::HPlane;
use crate::map::{analyze_lines, LineInfo, MapData};
use crate::partition::{choose_partition, CandidateStamps};
use crate::settings::BuilderConfig;
use crate::superblock::{BlockId, SuperBlockmap};
use crate::tree::{BspElement, BspLeaf, BspNode, BspTree, LeafId, NodeId, Partition};


/// Builds BSP trees with a fixed configuration.
///
/// # Examples
/// ```
/// use bsp_builder::{BspBuilder, BuilderConfig, MapData};
///
/// let builder = BspBuilder::new(BuilderConfig::new(11, 64).unwrap());
/// assert!(builder.build(&MapData::default()).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BspBuilder {
    config: BuilderConfig,
}

impl BspBuilder {
    /// Creates a builder using `config`.
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds the tree for one map.
    ///
    /// # Errors
    ///
    /// Any [`BspError`]; the map should then be rejected.
    pub fn build(&self, map: &MapData) -> BspResult<BspTree> {
        map.validate()?;

        let mut diag = Diagnostics::new();
        let lines = analyze_lines(map, &mut diag);

        let mut ctx = BuildContext::new(map, self.config, lines, diag);
        let root_block = ctx.create_initial_hedges()?;
        let root = ctx.build_node(root_block, 0)?;
        ctx.finalize_leaves(root)?;
        Ok(ctx.into_tree(root))
    }

    /// Builds several maps in parallel, one result per map in input order.
    pub fn build_many(&self, maps: &[MapData]) -> Vec<BspResult<BspTree>> {
        maps.par_iter().map(|map| self.build(map)).collect()
    }
}

/// Builds `map` with the default configuration.
pub fn build_bsp(map: &MapData) -> BspResult<BspTree> {
    BspBuilder::default().build(map)
}

/// Mutable state of one build.
pub(crate) struct BuildContext<'a> {
    pub(crate) map: &'a MapData,
    pub(crate) config: BuilderConfig,
    pub(crate) lines: Vec<LineInfo>,
    pub(crate) store: HalfEdgeStore,
    pub(crate) blocks: SuperBlockmap,
    pub(crate) hplane: HPlane,
    pub(crate) diag: Diagnostics,
    pub(crate) stamps: CandidateStamps,
    pub(crate) nodes: Vec<BspNode>,
    pub(crate) leaves: Vec<BspLeaf>,
    pub(crate) stats: BuildStats,
    /// Scratch space for sorting leaf half-edges by angle.
    pub(crate) sort_buffer: Vec<(f64, HEdgeId)>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        map: &'a MapData,
        config: BuilderConfig,
        lines: Vec<LineInfo>,
        diag: Diagnostics,
    ) -> Self {
        Self {
            map,
            config,
            store: HalfEdgeStore::with_vertices(&map.vertices),
            blocks: SuperBlockmap::new(),
            hplane: HPlane::new(),
            diag,
            stamps: CandidateStamps::new(map.linedefs.len()),
            nodes: Vec::new(),
            leaves: Vec::new(),
            stats: BuildStats {
                linedefs: map.linedefs.len(),
                skipped_lines: lines.iter().filter(|l| !l.is_usable()).count(),
                original_vertices: map.vertices.len(),
                ..BuildStats::default()
            },
            lines,
            sort_buffer: Vec::new(),
        }
    }

    /// Creates the half-edges of every usable linedef, records their edge
    /// tips and files them in a fresh root block.
    pub(crate) fn create_initial_hedges(&mut self) -> BspResult<BlockId> {
        let usable: Vec<LineInfo> = self.lines.iter().copied().filter(LineInfo::is_usable).collect();
        if usable.is_empty() {
            return Err(BspError::EmptyMap);
        }

        let mut limits = AABox::empty();
        for info in &usable {
            let (start, end) = self.map.line_points(info.line);
            limits.add_point(start);
            limits.add_point(end);
        }
        let root = self.blocks.create_root(BlockBounds::for_map(&limits));

        for info in usable {
            let def = self.map.linedefs[info.line.0 as usize];
            let (start, end) = (VertexId(def.start), VertexId(def.end));
            let line = Some(info.line);

            let front = self
                .store
                .create_half_edge(line, line, start, end, def.front, Side::Front)?;
            self.blocks.insert(&mut self.store, root, front);

            if def.back.is_some() {
                let back = self
                    .store
                    .create_half_edge(line, line, end, start, def.back, Side::Back)?;
                self.store.link_twins(front, back);
                self.blocks.insert(&mut self.store, root, back);
            }

            let delta = self.store.position(end) - self.store.position(start);
            self.store.add_edge_tip(start, delta, def.back, def.front);
            self.store.add_edge_tip(end, -delta, def.front, def.back);
        }

        Ok(root)
    }

    /// Builds the subtree for the half-edges in `block`, consuming the block.
    pub(crate) fn build_node(&mut self, block: BlockId, depth: usize) -> BspResult<BspElement> {
        if depth >= self.config.max_depth {
            let center = self.blocks.block(block).bounds.center();
            return Err(BspError::RecursionLimit {
                limit: self.config.max_depth,
                x: center.x,
                y: center.y,
            });
        }

        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.build_node_inner(block, depth)
        })
    }

    fn build_node_inner(&mut self, block: BlockId, depth: usize) -> BspResult<BspElement> {
        let chosen = choose_partition(
            &self.store,
            &self.blocks,
            block,
            self.config.split_factor,
            &mut self.stamps,
        );
        let Some(part_edge) = chosen else {
            let leaf = self.create_leaf(block);
            self.stats.max_depth = self.stats.max_depth.max(depth);
            return Ok(BspElement::Leaf(leaf));
        };

        let hedge = self.store.hedge(part_edge);
        let partition = Partition {
            origin: hedge.geometry.origin,
            direction: hedge.geometry.delta,
            source_line: hedge.linedef,
        };

        let bounds = self.blocks.block(block).bounds;
        let right = self.blocks.create_root(bounds);
        let left = self.blocks.create_root(bounds);

        self.hplane.reset(partition);
        self.divide_half_edges(block, right, left)?;
        self.blocks.release(block);

        for (side, id) in [("right", right), ("left", left)] {
            if self.blocks.block(id).is_empty() {
                return Err(BspError::EmptyPartitionSide {
                    line: partition.source_line,
                    side,
                });
            }
        }

        self.hplane.merge_intercepts(&self.store, &mut self.diag)?;
        self.add_mini_hedges(right, left)?;
        self.hplane.clear();

        let right_bounds = self.blocks.find_limits(&self.store, right);
        let left_bounds = self.blocks.find_limits(&self.store, left);

        let right_child = self.build_node(right, depth + 1)?;
        let left_child = self.build_node(left, depth + 1)?;

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(BspNode {
            partition,
            right_bounds,
            left_bounds,
            right: right_child,
            left: left_child,
        });
        Ok(BspElement::Node(id))
    }

    /// Drains `block` into a new leaf and releases it.
    fn create_leaf(&mut self, block: BlockId) -> LeafId {
        let id = LeafId(self.leaves.len() as u32);
        let hedges = self.blocks.drain(&mut self.store, block);
        for &hedge in &hedges {
            self.store.hedge_mut(hedge).owner = HEdgeOwner::Leaf(id);
        }
        self.blocks.release(block);
        self.leaves.push(BspLeaf::new(hedges));
        id
    }

    pub(crate) fn into_tree(self, root: BspElement) -> BspTree {
        let mut stats = self.stats;
        stats.split_vertices = self.store.vertex_count() - stats.original_vertices;
        stats.nodes = self.nodes.len();
        stats.leaves = self.leaves.len();
        let total: usize = self.leaves.iter().map(|leaf| leaf.hedges.len()).sum();
        stats.real_hedges = self
            .leaves
            .iter()
            .flat_map(|leaf| &leaf.hedges)
            .filter(|&&h| !self.store.hedge(h).is_mini())
            .count();
        stats.mini_hedges = total - stats.real_hedges;

        log::info!(
            "built {} nodes, {} leaves, {} half-edges ({} mini), {} splits, {} warnings",
            stats.nodes,
            stats.leaves,
            stats.real_hedges + stats.mini_hedges,
            stats.mini_hedges,
            stats.splits,
            self.diag.warnings().len(),
        );

        let (vertices, hedges) = self.store.into_parts();
        BspTree {
            root,
            nodes: self.nodes,
            leaves: self.leaves,
            hedges,
            vertices,
            report: BuildReport {
                warnings: self.diag.into_warnings(),
                stats,
            },
        }
    }
}
