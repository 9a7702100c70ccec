//! Partition selection.
//!
//! Every real half-edge in the current set is tried as a partition line and
//! scored; the cheapest one wins. The score penalises splits, near misses
//! that would produce slivers later, and imbalance between the two sides.
//!
//! ## Branch and bound
//!
//! Whole superblocks lying on one side of the candidate are counted without
//! visiting their half-edges, and a candidate is abandoned as soon as its
//! running cost exceeds the best cost found so far.
//!
//! The weights below were tuned empirically on real maps; changing them
//! changes the output trees.

use config::constants::{
    BOX_PADDING_FACTOR, DIST_EPSILON, IFFY_LEN, IFFY_SPLIT_COST, MINI_BALANCE_COST,
    NEAR_MISS_LEFT_COST, NEAR_MISS_RIGHT_COST, NON_AXIAL_COST, REAL_BALANCE_COST, SPLIT_COST,
};

use crate::geom::{BlockBounds, LineGeometry, LineSide, Vec2};
use crate::half_edge::{HEdge, HEdgeId, HalfEdgeStore};
use crate::map::LineId;
use crate::superblock::{BlockId, SuperBlockmap};


/// Running totals while a candidate is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionCost {
    /// Accumulated cost.
    pub cost: i64,
    /// Half-edges the candidate would split.
    pub splits: u32,
    /// Splits landing close to an endpoint.
    pub iffy: u32,
    /// Half-edges passing close to the candidate without crossing it.
    pub near_miss: u32,
    /// Real half-edges on the left.
    pub real_left: i64,
    /// Real half-edges on the right.
    pub real_right: i64,
    /// Mini half-edges on the left.
    pub mini_left: i64,
    /// Mini half-edges on the right.
    pub mini_right: i64,
}

impl PartitionCost {
    fn add_left(&mut self, edge: &HEdge) {
        if edge.is_mini() {
            self.mini_left += 1;
        } else {
            self.real_left += 1;
        }
    }

    fn add_right(&mut self, edge: &HEdge) {
        if edge.is_mini() {
            self.mini_right += 1;
        } else {
            self.real_right += 1;
        }
    }
}

/// Per-linedef generation stamps so that both sides of a linedef are not
/// evaluated in the same selection round.
#[derive(Debug, Clone, Default)]
pub struct CandidateStamps {
    generation: u32,
    seen: Vec<u32>,
}

impl CandidateStamps {
    /// Stamps for a map with `line_count` linedefs.
    pub fn new(line_count: usize) -> Self {
        Self {
            generation: 0,
            seen: vec![0; line_count],
        }
    }

    /// Starts a new selection round.
    pub fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.seen.iter_mut().for_each(|s| *s = 0);
            self.generation = 1;
        }
    }

    /// Marks `line` as tried; false if it already was this round.
    pub fn try_mark(&mut self, line: LineId) -> bool {
        let slot = &mut self.seen[line.0 as usize];
        if *slot == self.generation {
            false
        } else {
            *slot = self.generation;
            true
        }
    }
}

/// Picks the cheapest partition among the real half-edges under `root`.
///
/// Returns `None` when no candidate leaves real half-edges on both sides,
/// meaning the set is convex.
pub fn choose_partition(
    store: &HalfEdgeStore,
    blocks: &SuperBlockmap,
    root: BlockId,
    split_factor: i32,
    stamps: &mut CandidateStamps,
) -> Option<HEdgeId> {
    stamps.next_generation();

    let mut best: Option<(HEdgeId, i64)> = None;
    for candidate in blocks.hedges_in(root) {
        let Some(line) = store.hedge(candidate).linedef else {
            continue;
        };
        if !stamps.try_mark(line) {
            continue;
        }

        let best_cost = best.map_or(i64::MAX, |(_, cost)| cost);
        if let Some(cost) = eval_partition(store, blocks, root, candidate, split_factor, best_cost) {
            if cost.cost < best_cost {
                best = Some((candidate, cost.cost));
            }
        }
    }

    if let Some((edge, cost)) = best {
        let geometry = &store.hedge(edge).geometry;
        log::debug!(
            "partition ({:.1}, {:.1}) -> ({:.1}, {:.1}) cost {cost}",
            geometry.origin.x,
            geometry.origin.y,
            geometry.end().x,
            geometry.end().y,
        );
    }
    best.map(|(edge, _)| edge)
}

/// Scores `candidate` against everything under `root`.
///
/// Returns `None` if the candidate is abandoned (cost exceeded `best_cost`)
/// or would leave no real half-edge on one side.
pub fn eval_partition(
    store: &HalfEdgeStore,
    blocks: &SuperBlockmap,
    root: BlockId,
    candidate: HEdgeId,
    split_factor: i32,
    best_cost: i64,
) -> Option<PartitionCost> {
    let part = store.hedge(candidate);
    let mut info = PartitionCost::default();

    if eval_block(store, blocks, root, part, split_factor as f64, best_cost, &mut info) {
        return None;
    }
    if info.real_left == 0 || info.real_right == 0 {
        return None;
    }

    info.cost += REAL_BALANCE_COST * (info.real_left - info.real_right).abs();
    info.cost += MINI_BALANCE_COST * (info.mini_left - info.mini_right).abs();
    if !part.geometry.is_axis_aligned() {
        info.cost += NON_AXIAL_COST;
    }
    Some(info)
}

/// Accumulates one block's subtree. Returns true once the cost is over
/// budget.
fn eval_block(
    store: &HalfEdgeStore,
    blocks: &SuperBlockmap,
    block_id: BlockId,
    part: &HEdge,
    factor: f64,
    best_cost: i64,
    info: &mut PartitionCost,
) -> bool {
    let block = blocks.block(block_id);
    let geometry = &part.geometry;

    match box_on_line_side(&block.bounds, geometry) {
        LineSide::Left => {
            info.real_left += i64::from(block.real_count());
            info.mini_left += i64::from(block.mini_count());
            return false;
        }
        LineSide::Right => {
            info.real_right += i64::from(block.real_count());
            info.mini_right += i64::from(block.mini_count());
            return false;
        }
        LineSide::On => {}
    }

    for &id in block.own_hedges() {
        if info.cost > best_cost {
            return true;
        }

        let check = store.hedge(id);
        let (a, b) = if check.source_line.is_some() && check.source_line == part.source_line {
            (0.0, 0.0)
        } else {
            (
                geometry.perp_dist(check.geometry.origin),
                geometry.perp_dist(check.geometry.end()),
            )
        };
        let (fa, fb) = (a.abs(), b.abs());

        if fa <= DIST_EPSILON && fb <= DIST_EPSILON {
            if check.geometry.delta.dot(geometry.delta) < 0.0 {
                info.add_left(check);
            } else {
                info.add_right(check);
            }
            continue;
        }

        if a > -DIST_EPSILON && b > -DIST_EPSILON {
            info.add_right(check);
            if (a >= IFFY_LEN && b >= IFFY_LEN)
                || (a <= DIST_EPSILON && b >= IFFY_LEN)
                || (b <= DIST_EPSILON && a >= IFFY_LEN)
            {
                continue;
            }
            info.near_miss += 1;
            let q = if a <= DIST_EPSILON || b <= DIST_EPSILON {
                IFFY_LEN / a.max(b)
            } else {
                IFFY_LEN / a.min(b)
            };
            info.cost += (NEAR_MISS_RIGHT_COST * factor * (q * q - 1.0)) as i64;
            continue;
        }

        if a < DIST_EPSILON && b < DIST_EPSILON {
            info.add_left(check);
            if (a <= -IFFY_LEN && b <= -IFFY_LEN)
                || (a >= -DIST_EPSILON && b <= -IFFY_LEN)
                || (b >= -DIST_EPSILON && a <= -IFFY_LEN)
            {
                continue;
            }
            info.near_miss += 1;
            let q = if a >= -DIST_EPSILON || b >= -DIST_EPSILON {
                IFFY_LEN / -a.min(b)
            } else {
                IFFY_LEN / -a.max(b)
            };
            info.cost += (NEAR_MISS_LEFT_COST * factor * (q * q - 1.0)) as i64;
            continue;
        }

        // Endpoints on opposite sides: the candidate splits this half-edge.
        info.splits += 1;
        info.cost += SPLIT_COST * factor as i64;
        if fa < IFFY_LEN || fb < IFFY_LEN {
            info.iffy += 1;
            let q = IFFY_LEN / fa.min(fb);
            info.cost += (IFFY_SPLIT_COST * factor * (q * q - 1.0)) as i64;
        }
    }

    for child in block.children().into_iter().flatten() {
        if eval_block(store, blocks, child, part, factor, best_cost, info) {
            return true;
        }
    }
    false
}

/// Which side of `part` the padded block lies on; [`LineSide::On`] when the
/// line passes through it.
pub fn box_on_line_side(bounds: &BlockBounds, part: &LineGeometry) -> LineSide {
    let pad = IFFY_LEN * BOX_PADDING_FACTOR;
    let x1 = bounds.x1 as f64 - pad;
    let y1 = bounds.y1 as f64 - pad;
    let x2 = bounds.x2 as f64 + pad;
    let y2 = bounds.y2 as f64 + pad;

    let (p1, p2) = if part.is_vertical() {
        let side = |x: f64| {
            let right = x > part.origin.x;
            if part.delta.y < 0.0 {
                !right
            } else {
                right
            }
        };
        (to_side(side(x1)), to_side(side(x2)))
    } else if part.is_horizontal() {
        let side = |y: f64| {
            let right = y < part.origin.y;
            if part.delta.x < 0.0 {
                !right
            } else {
                right
            }
        };
        (to_side(side(y1)), to_side(side(y2)))
    } else if part.delta.x * part.delta.y > 0.0 {
        (
            part.point_side(Vec2::new(x1, y2)),
            part.point_side(Vec2::new(x2, y1)),
        )
    } else {
        (
            part.point_side(Vec2::new(x1, y1)),
            part.point_side(Vec2::new(x2, y2)),
        )
    };

    if p1 == p2 {
        p1
    } else {
        LineSide::On
    }
}

fn to_side(right: bool) -> LineSide {
    if right {
        LineSide::Right
    } else {
        LineSide::Left
    }
}
