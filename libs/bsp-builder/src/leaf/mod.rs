//! Leaf finalization.
//!
//! Once the whole tree exists, every leaf is visited in post-order: its
//! half-edges are sorted clockwise around the leaf centroid, rotated so a
//! good sector representative comes first, numbered, and sanity checked.

use config::constants::ANG_EPSILON;

use crate::builder::BuildContext;
use crate::diagnostics::BuildWarning;
use crate::error::{BspError, BspResult};
use crate::geom::{compute_angle, Vec2};
use crate::half_edge::{HEdge, Side};
use crate::tree::{post_order, BspElement, LeafId};


impl BuildContext<'_> {
    /// Winds and checks every leaf under `root`, numbering half-edges in
    /// post-order.
    pub(crate) fn finalize_leaves(&mut self, root: BspElement) -> BspResult<()> {
        let mut next_index = 0;
        for element in post_order(&self.nodes, root) {
            if let BspElement::Leaf(leaf) = element {
                self.wind_leaf(leaf, &mut next_index);
                self.check_closed(leaf);
                self.check_same_sector(leaf);
                self.check_has_real(leaf)?;
            }
        }
        Ok(())
    }

    /// Sorts a leaf's half-edges clockwise, picks the first one and assigns
    /// indices, sector and linedef offsets.
    pub(crate) fn wind_leaf(&mut self, leaf: LeafId, next_index: &mut u32) {
        let hedges = &self.leaves[leaf.0 as usize].hedges;
        if hedges.is_empty() {
            return;
        }

        let mut sum = Vec2::ZERO;
        for &h in hedges {
            let edge = self.store.hedge(h);
            sum += self.store.position(edge.start) + self.store.position(edge.end);
        }
        let centroid = sum / (hedges.len() * 2) as f64;

        self.sort_buffer.clear();
        self.sort_buffer.extend(hedges.iter().map(|&h| {
            let start = self.store.position(self.store.hedge(h).start);
            (compute_angle(start - centroid), h)
        }));

        // Descending angle; equal angles keep their order.
        let buf = &mut self.sort_buffer;
        let mut i = 0;
        while i + 1 < buf.len() {
            if buf[i].0 + ANG_EPSILON < buf[i + 1].0 {
                buf.swap(i, i + 1);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }

        let mut first = 0;
        let mut best = -1;
        for (pos, &(_, h)) in self.sort_buffer.iter().enumerate() {
            let score = self.representative_score(self.store.hedge(h));
            if score > best {
                first = pos;
                best = score;
            }
        }
        self.sort_buffer.rotate_left(first);

        let ordered: Vec<_> = self.sort_buffer.iter().map(|&(_, h)| h).collect();
        for &h in &ordered {
            let offset = self.linedef_offset(self.store.hedge(h));
            let edge = self.store.hedge_mut(h);
            edge.index = Some(*next_index);
            edge.offset = offset;
            *next_index += 1;
        }

        let sector = ordered
            .iter()
            .map(|&h| self.store.hedge(h))
            .find(|e| !e.is_mini())
            .and_then(|e| e.sector);

        let slot = &mut self.leaves[leaf.0 as usize];
        slot.hedges = ordered;
        slot.centroid = centroid;
        slot.sector = sector;
    }

    /// Minis make poor representatives, self-referencing lines only
    /// slightly better.
    fn representative_score(&self, edge: &HEdge) -> i32 {
        match edge.linedef {
            None => 0,
            Some(line) if self.lines[line.0 as usize].self_ref => 2,
            Some(_) => 3,
        }
    }

    fn linedef_offset(&self, edge: &HEdge) -> f64 {
        let Some(line) = edge.linedef else {
            return 0.0;
        };
        let (line_start, line_end) = self.map.line_points(line);
        let side_start = match edge.side {
            Side::Front => line_start,
            Side::Back => line_end,
        };
        self.store.position(edge.start).distance(side_start)
    }

    fn check_closed(&mut self, leaf: LeafId) {
        let slot = &self.leaves[leaf.0 as usize];
        let count = slot.hedges.len();
        let gaps = (0..count)
            .filter(|&i| {
                let cur = self.store.hedge(slot.hedges[i]);
                let next = self.store.hedge(slot.hedges[(i + 1) % count]);
                self.store.position(cur.end) != self.store.position(next.start)
            })
            .count();

        if gaps > 0 {
            let warning = BuildWarning::LeafNotClosed {
                leaf,
                position: slot.centroid,
                gaps,
                hedges: count,
            };
            self.diag.warn(warning);
        }
    }

    fn check_same_sector(&mut self, leaf: LeafId) {
        let hedges = self.leaves[leaf.0 as usize].hedges.clone();
        let Some(compare_at) = hedges
            .iter()
            .position(|&h| self.store.hedge(h).sector.is_some())
        else {
            return;
        };
        let compare = self.store.hedge(hedges[compare_at]).sector;

        for &h in &hedges[compare_at + 1..] {
            let edge = self.store.hedge(h);
            let (Some(expected), Some(facing)) = (compare, edge.sector) else {
                continue;
            };
            if expected != facing {
                let position = self.store.position(edge.start);
                let line = edge.linedef;
                self.diag.warn_facing(expected, facing, line, position);
            }
        }
    }

    fn check_has_real(&self, leaf: LeafId) -> BspResult<()> {
        let slot = &self.leaves[leaf.0 as usize];
        if slot.hedges.iter().any(|&h| !self.store.hedge(h).is_mini()) {
            return Ok(());
        }
        Err(BspError::LeafWithoutRealHalfEdge {
            leaf: leaf.0,
            x: slot.centroid.x,
            y: slot.centroid.y,
        })
    }
}
