//! SuperBlock spatial index.
//!
//! A binary quadtree-like subdivision of the map's bounding square. Each
//! half-edge is filed in the smallest block that wholly contains it, and every
//! block keeps running counts of the real and mini half-edges in its whole
//! subtree. Partition evaluation uses the counts to settle entire blocks that
//! lie on one side of a candidate without visiting their half-edges.
//!
//! ```text
//!            root (x split)
//!           /              \
//!     child 0 (y split)   child 1
//!      /         \
//!   leaf-sized  leaf-sized       <- both sides <= SUPERBLOCK_LEAF_SIZE
//! ```
//!
//! Blocks live in an arena with a free list so that the many short-lived
//! indices created during recursion recycle their slots.

use config::constants::SUPERBLOCK_LEAF_SIZE;
use serde::{Deserialize, Serialize};

use crate::geom::{AABox, BlockBounds};
use crate::half_edge::{HEdgeId, HEdgeOwner, HalfEdgeStore};

/// Unique identifier for superblocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// One node of the spatial index.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperBlock {
    /// Integer bounds of the block.
    pub bounds: BlockBounds,
    parent: Option<BlockId>,
    children: [Option<BlockId>; 2],
    hedges: Vec<HEdgeId>,
    real_count: u32,
    mini_count: u32,
}

impl SuperBlock {
    fn new(bounds: BlockBounds, parent: Option<BlockId>) -> Self {
        Self {
            bounds,
            parent,
            children: [None, None],
            hedges: Vec::new(),
            real_count: 0,
            mini_count: 0,
        }
    }

    /// Parent block, `None` for a root.
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    /// Low (0) and high (1) children.
    pub fn children(&self) -> [Option<BlockId>; 2] {
        self.children
    }

    /// Half-edges linked directly into this block.
    pub fn own_hedges(&self) -> &[HEdgeId] {
        &self.hedges
    }

    /// Real half-edges in this block's subtree.
    pub fn real_count(&self) -> u32 {
        self.real_count
    }

    /// Mini half-edges in this block's subtree.
    pub fn mini_count(&self) -> u32 {
        self.mini_count
    }

    /// All half-edges in this block's subtree.
    pub fn total_count(&self) -> u32 {
        self.real_count + self.mini_count
    }

    /// True when no half-edge is filed anywhere in the subtree.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

/// Arena of superblocks shared by every index of one build.
#[derive(Debug, Clone, Default)]
pub struct SuperBlockmap {
    blocks: Vec<SuperBlock>,
    free: Vec<BlockId>,
}

impl SuperBlockmap {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new, empty root block.
    pub fn create_root(&mut self, bounds: BlockBounds) -> BlockId {
        self.alloc(bounds, None)
    }

    /// Block by handle.
    pub fn block(&self, id: BlockId) -> &SuperBlock {
        &self.blocks[id.0 as usize]
    }

    /// Number of blocks currently allocated.
    pub fn live_count(&self) -> usize {
        self.blocks.len() - self.free.len()
    }

    /// Files `hedge` in the smallest block under `root` that contains it.
    ///
    /// Blocks are halved along their longer axis (X on ties). A half-edge
    /// whose endpoints fall on different halves stays in the current block,
    /// as does anything reaching a leaf-sized block.
    pub fn insert(&mut self, store: &mut HalfEdgeStore, root: BlockId, hedge: HEdgeId) {
        let mini = store.hedge(hedge).is_mini();
        let start = store.position(store.hedge(hedge).start);
        let end = store.position(store.hedge(hedge).end);

        let mut current = root;
        loop {
            self.bump(current, mini, 1);

            let bounds = self.block(current).bounds;
            if bounds.is_leaf(SUPERBLOCK_LEAF_SIZE) {
                break;
            }

            let (mid_x, mid_y) = bounds.mid();
            let (p1, p2) = if bounds.splits_along_x() {
                (start.x >= mid_x as f64, end.x >= mid_x as f64)
            } else {
                (start.y >= mid_y as f64, end.y >= mid_y as f64)
            };

            let child = match (p1, p2) {
                (true, true) => 1,
                (false, false) => 0,
                _ => break,
            };

            current = match self.block(current).children[child] {
                Some(existing) => existing,
                None => {
                    let created = self.alloc(bounds.child(child), Some(current));
                    self.blocks[current.0 as usize].children[child] = Some(created);
                    created
                }
            };
        }

        self.blocks[current.0 as usize].hedges.push(hedge);
        store.hedge_mut(hedge).owner = HEdgeOwner::Block(current);
    }

    /// Links `hedge` directly into `block`, bumping counts up to the root.
    pub fn link_into(&mut self, store: &mut HalfEdgeStore, block: BlockId, hedge: HEdgeId) {
        let mini = store.hedge(hedge).is_mini();
        let mut current = Some(block);
        while let Some(id) = current {
            self.bump(id, mini, 1);
            current = self.block(id).parent;
        }
        self.blocks[block.0 as usize].hedges.push(hedge);
        store.hedge_mut(hedge).owner = HEdgeOwner::Block(block);
    }

    /// Removes the most recently linked half-edge from `block`'s own list.
    pub fn pop(&mut self, store: &mut HalfEdgeStore, block: BlockId) -> Option<HEdgeId> {
        let hedge = self.blocks[block.0 as usize].hedges.pop()?;
        let mini = store.hedge(hedge).is_mini();
        let mut current = Some(block);
        while let Some(id) = current {
            self.bump(id, mini, -1);
            current = self.block(id).parent;
        }
        store.hedge_mut(hedge).owner = HEdgeOwner::Unfiled;
        Some(hedge)
    }

    /// Blocks under `root` in pre-order, skipping empty subtrees.
    pub fn block_ids(&self, root: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let block = self.block(id);
            if block.is_empty() {
                continue;
            }
            out.push(id);
            let [low, high] = block.children;
            stack.extend(high);
            stack.extend(low);
        }
        out
    }

    /// Unlinks every half-edge under `root`.
    ///
    /// Blocks are drained in pre-order, each one last-in first-out.
    pub fn drain(&mut self, store: &mut HalfEdgeStore, root: BlockId) -> Vec<HEdgeId> {
        let mut out = Vec::with_capacity(self.block(root).total_count() as usize);
        for id in self.block_ids(root) {
            while let Some(hedge) = self.pop(store, id) {
                out.push(hedge);
            }
        }
        out
    }

    /// Visits every block under `root` in pre-order (parent, low, high).
    pub fn for_each_block<F>(&self, root: BlockId, mut visit: F)
    where
        F: FnMut(BlockId, &SuperBlock),
    {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let block = self.block(id);
            visit(id, block);
            let [low, high] = block.children;
            stack.extend(high);
            stack.extend(low);
        }
    }

    /// Every half-edge under `root`, in pre-order block order.
    pub fn hedges_in(&self, root: BlockId) -> Vec<HEdgeId> {
        let mut out = Vec::new();
        self.for_each_block(root, |_, block| out.extend_from_slice(&block.hedges));
        out
    }

    /// Bounding box of every half-edge under `root`, rounded out to whole
    /// map units.
    pub fn find_limits(&self, store: &HalfEdgeStore, root: BlockId) -> AABox {
        let mut limits = AABox::empty();
        self.for_each_block(root, |_, block| {
            for &hedge in &block.hedges {
                let edge = store.hedge(hedge);
                limits.add_point(store.position(edge.start));
                limits.add_point(store.position(edge.end));
            }
        });
        limits.rounded_out()
    }

    /// Returns the whole subtree under `root` to the free list.
    ///
    /// Half-edges still linked are simply forgotten; callers drain first.
    pub fn release(&mut self, root: BlockId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let slot = &mut self.blocks[id.0 as usize];
            let [low, high] = slot.children;
            *slot = SuperBlock::new(slot.bounds, None);
            stack.extend(low);
            stack.extend(high);
            self.free.push(id);
        }
    }

    fn alloc(&mut self, bounds: BlockBounds, parent: Option<BlockId>) -> BlockId {
        match self.free.pop() {
            Some(id) => {
                self.blocks[id.0 as usize] = SuperBlock::new(bounds, parent);
                id
            }
            None => {
                let id = BlockId(self.blocks.len() as u32);
                self.blocks.push(SuperBlock::new(bounds, parent));
                id
            }
        }
    }

    fn bump(&mut self, id: BlockId, mini: bool, delta: i32) {
        let block = &mut self.blocks[id.0 as usize];
        let count = if mini {
            &mut block.mini_count
        } else {
            &mut block.real_count
        };
        *count = count.saturating_add_signed(delta);
    }
}

#[cfg(test)]
mod tests;
