//! Dividing half-edges by the chosen partition.
//!
//! Each half-edge of the current set ends up in the right or left output
//! block, split in two when it crosses the partition. Every vertex landing on
//! the partition is recorded in the [`HPlane`](crate::hplane::HPlane); once
//! all are divided, the gaps between consecutive intercepts that open onto a
//! sector are closed with pairs of mini half-edges.

use config::constants::DIST_EPSILON;

use crate::builder::BuildContext;
use crate::error::BspResult;
use crate::geom::{LineGeometry, Vec2};
use crate::half_edge::{HEdgeId, HEdgeOwner, Side};
use crate::hplane::Intercept;
use crate::superblock::BlockId;


/// Point where `edge` crosses `part`, given the perpendicular distances `a`
/// and `b` of its endpoints.
///
/// Axis-aligned combinations are answered exactly; otherwise the point is
/// interpolated, keeping any coordinate along which the edge does not move.
pub fn calc_intersection(edge: &LineGeometry, part: &LineGeometry, a: f64, b: f64) -> Vec2 {
    if part.is_horizontal() && edge.is_vertical() {
        return Vec2::new(edge.origin.x, part.origin.y);
    }
    if part.is_vertical() && edge.is_horizontal() {
        return Vec2::new(part.origin.x, edge.origin.y);
    }

    let ds = a / (a - b);
    let x = if edge.delta.x == 0.0 {
        edge.origin.x
    } else {
        edge.origin.x + edge.delta.x * ds
    };
    let y = if edge.delta.y == 0.0 {
        edge.origin.y
    } else {
        edge.origin.y + edge.delta.y * ds
    };
    Vec2::new(x, y)
}

impl BuildContext<'_> {
    /// Drains `source` into `right` and `left`.
    pub(crate) fn divide_half_edges(
        &mut self,
        source: BlockId,
        right: BlockId,
        left: BlockId,
    ) -> BspResult<()> {
        // Splitting a two-sided edge can link a twin tail back into
        // `source`, so keep sweeping until it is empty.
        while !self.blocks.block(source).is_empty() {
            for block in self.blocks.block_ids(source) {
                while let Some(edge) = self.blocks.pop(&mut self.store, block) {
                    self.divide_one(edge, right, left)?;
                }
            }
        }
        Ok(())
    }

    fn divide_one(&mut self, edge: HEdgeId, right: BlockId, left: BlockId) -> BspResult<()> {
        let part = *self.hplane.geometry();
        let part_line = self.hplane.partition().source_line;

        let hedge = self.store.hedge(edge);
        let self_ref = hedge
            .linedef
            .is_some_and(|line| self.lines[line.0 as usize].self_ref);
        let (a, b) = if hedge.source_line.is_some() && hedge.source_line == part_line {
            (0.0, 0.0)
        } else {
            (
                part.perp_dist(hedge.geometry.origin),
                part.perp_dist(hedge.geometry.end()),
            )
        };
        let (start, end) = (hedge.start, hedge.end);
        let geometry = hedge.geometry;

        if a.abs() <= DIST_EPSILON && b.abs() <= DIST_EPSILON {
            self.hplane.add_intercept(&self.store, start, self_ref)?;
            self.hplane.add_intercept(&self.store, end, self_ref)?;
            let target = if geometry.delta.dot(part.delta) < 0.0 { left } else { right };
            self.blocks.insert(&mut self.store, target, edge);
            return Ok(());
        }

        if a > -DIST_EPSILON && b > -DIST_EPSILON {
            if a < DIST_EPSILON {
                self.hplane.add_intercept(&self.store, start, self_ref)?;
            } else if b < DIST_EPSILON {
                self.hplane.add_intercept(&self.store, end, self_ref)?;
            }
            self.blocks.insert(&mut self.store, right, edge);
            return Ok(());
        }

        if a < DIST_EPSILON && b < DIST_EPSILON {
            if a > -DIST_EPSILON {
                self.hplane.add_intercept(&self.store, start, self_ref)?;
            } else if b > -DIST_EPSILON {
                self.hplane.add_intercept(&self.store, end, self_ref)?;
            }
            self.blocks.insert(&mut self.store, left, edge);
            return Ok(());
        }

        let point = calc_intersection(&geometry, &part, a, b);
        let tail = self.split_and_file(edge, point)?;
        let split_vertex = self.store.hedge(edge).end;
        self.hplane.add_intercept(&self.store, split_vertex, self_ref)?;

        let (head_side, tail_side) = if a < 0.0 { (left, right) } else { (right, left) };
        self.blocks.insert(&mut self.store, head_side, edge);
        self.blocks.insert(&mut self.store, tail_side, tail);
        Ok(())
    }

    /// Splits `edge` at `point` and files the new pieces beside the old ones.
    ///
    /// The twin tail goes wherever the old twin is: the same superblock, or
    /// right after it in its leaf. The tail itself is filed beside `edge`
    /// only when `edge` is filed; an unfiled edge's tail is returned unfiled
    /// for the caller to route.
    pub(crate) fn split_and_file(&mut self, edge: HEdgeId, point: Vec2) -> BspResult<HEdgeId> {
        let old_twin = self.store.hedge(edge).twin;
        let split = self.store.split_half_edge(edge, point)?;
        self.stats.splits += 1;

        self.file_beside(edge, split.tail);
        if let (Some(old_twin), Some(twin_tail)) = (old_twin, split.twin_tail) {
            self.file_beside(old_twin, twin_tail);
        }
        Ok(split.tail)
    }

    fn file_beside(&mut self, existing: HEdgeId, new: HEdgeId) {
        match self.store.hedge(existing).owner {
            HEdgeOwner::Unfiled => {}
            HEdgeOwner::Block(block) => self.blocks.link_into(&mut self.store, block, new),
            HEdgeOwner::Leaf(leaf) => {
                let hedges = &mut self.leaves[leaf.0 as usize].hedges;
                let pos = hedges
                    .iter()
                    .position(|&h| h == existing)
                    .map_or(hedges.len(), |p| p + 1);
                hedges.insert(pos, new);
                self.store.hedge_mut(new).owner = HEdgeOwner::Leaf(leaf);
            }
        }
    }

    /// Closes every open gap along the partition with a mini half-edge pair.
    ///
    /// The forward half-edge runs along the partition into `right`; its twin
    /// goes into `left`. Both face the sector open across the gap.
    pub(crate) fn add_mini_hedges(&mut self, right: BlockId, left: BlockId) -> BspResult<()> {
        let part_line = self.hplane.partition().source_line;
        let count = self.hplane.len();

        for i in 1..count {
            let cur: Intercept = self.hplane.intercepts()[i - 1];
            let next: Intercept = self.hplane.intercepts()[i];
            let cur_pos = self.store.position(cur.vertex);
            let next_pos = self.store.position(next.vertex);

            let sector = match (cur.after, next.before) {
                (None, None) => continue,
                (Some(open), None) => {
                    if !cur.self_ref {
                        self.diag.warn_unclosed(open, (cur_pos + next_pos) / 2.0);
                    }
                    continue;
                }
                (None, Some(open)) => {
                    if !next.self_ref {
                        self.diag.warn_unclosed(open, (cur_pos + next_pos) / 2.0);
                    }
                    continue;
                }
                (Some(after), Some(before)) if after != before => {
                    if !cur.self_ref && !next.self_ref {
                        self.diag.warn_mismatch(after, cur_pos, before, next_pos);
                    }
                    if cur.self_ref && !next.self_ref {
                        before
                    } else {
                        after
                    }
                }
                (Some(after), Some(_)) => after,
            };

            let forward = self.store.create_half_edge(
                None,
                part_line,
                cur.vertex,
                next.vertex,
                Some(sector),
                Side::Front,
            )?;
            let backward = self.store.create_half_edge(
                None,
                part_line,
                next.vertex,
                cur.vertex,
                Some(sector),
                Side::Back,
            )?;
            self.store.link_twins(forward, backward);
            self.blocks.insert(&mut self.store, right, forward);
            self.blocks.insert(&mut self.store, left, backward);
        }
        Ok(())
    }
}
