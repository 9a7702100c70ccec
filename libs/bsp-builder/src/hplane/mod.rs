//! Intersection ledger for the current partition.
//!
//! While half-edges are divided, every vertex that ends up on the partition
//! line is recorded here together with the sectors open immediately before
//! and after it along the partition. Walking the ordered intercepts then
//! reveals the gaps that mini half-edges must close.

use config::constants::{DIST_EPSILON, INTERCEPT_MERGE_DISTANCE, INTERCEPT_ORDER_TOLERANCE};

use crate::diagnostics::{BuildWarning, Diagnostics};
use crate::error::{BspError, BspResult};
use crate::geom::LineGeometry;
use crate::half_edge::{HalfEdgeStore, VertexId};
use crate::map::SectorId;
use crate::tree::Partition;

/// A vertex lying on the partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// The vertex.
    pub vertex: VertexId,
    /// Signed distance along the partition from its origin.
    pub distance: f64,
    /// Sector open just before the vertex, walking along the partition.
    pub before: Option<SectorId>,
    /// Sector open just after the vertex.
    pub after: Option<SectorId>,
    /// Produced by a self-referencing linedef.
    pub self_ref: bool,
}

/// The current partition and its ordered intercepts.
///
/// Clearing keeps the intercept allocation so one plane serves a whole build.
#[derive(Debug, Clone)]
pub struct HPlane {
    partition: Partition,
    geometry: LineGeometry,
    intercepts: Vec<Intercept>,
}

impl Default for HPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl HPlane {
    /// Creates an empty plane along the X axis.
    pub fn new() -> Self {
        let partition = Partition::default();
        Self {
            geometry: partition.geometry(),
            partition,
            intercepts: Vec::new(),
        }
    }

    /// Drops all intercepts and switches to `partition`.
    pub fn reset(&mut self, partition: Partition) {
        self.intercepts.clear();
        self.geometry = partition.geometry();
        self.partition = partition;
    }

    /// Drops all intercepts, keeping the storage.
    pub fn clear(&mut self) {
        self.intercepts.clear();
    }

    /// The current partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Cached geometry of the current partition.
    pub fn geometry(&self) -> &LineGeometry {
        &self.geometry
    }

    /// Intercepts ordered by distance.
    pub fn intercepts(&self) -> &[Intercept] {
        &self.intercepts
    }

    /// Number of intercepts.
    pub fn len(&self) -> usize {
        self.intercepts.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.intercepts.is_empty()
    }

    /// Intercept recorded for `vertex`, if any.
    pub fn find(&self, vertex: VertexId) -> Option<&Intercept> {
        self.intercepts.iter().find(|i| i.vertex == vertex)
    }

    /// Records `vertex` as lying on the partition.
    ///
    /// Vertices already recorded are ignored. The open sectors on either side
    /// are looked up from the vertex's edge tips.
    ///
    /// # Errors
    ///
    /// [`BspError::VertexWithoutTips`] if the vertex has no walls.
    pub fn add_intercept(
        &mut self,
        store: &HalfEdgeStore,
        vertex: VertexId,
        self_ref: bool,
    ) -> BspResult<()> {
        if self.find(vertex).is_some() {
            return Ok(());
        }

        let direction = self.geometry.delta;
        let intercept = Intercept {
            vertex,
            distance: self.geometry.para_dist(store.position(vertex)),
            before: store.open_sector_at_vertex(vertex, -direction)?,
            after: store.open_sector_at_vertex(vertex, direction)?,
            self_ref,
        };
        self.insert(intercept);
        Ok(())
    }

    /// Inserts after the last intercept not further along than `intercept`.
    pub(crate) fn insert(&mut self, intercept: Intercept) {
        let mut pos = self.intercepts.len();
        while pos > 0 && intercept.distance < self.intercepts[pos - 1].distance {
            pos -= 1;
        }
        self.intercepts.insert(pos, intercept);
    }

    /// Collapses intercepts that are too close together to leave a gap.
    ///
    /// When a self-referencing intercept absorbs a normal one, the normal
    /// one's sectors win.
    ///
    /// # Errors
    ///
    /// [`BspError::InterceptOrder`] if distances decrease by more than the
    /// order tolerance, which means the list was corrupted.
    pub fn merge_intercepts(
        &mut self,
        store: &HalfEdgeStore,
        diag: &mut Diagnostics,
    ) -> BspResult<()> {
        let mut i = 0;
        while i + 1 < self.intercepts.len() {
            let cur = self.intercepts[i];
            let next = self.intercepts[i + 1];
            let gap = next.distance - cur.distance;

            if gap < INTERCEPT_ORDER_TOLERANCE {
                return Err(BspError::InterceptOrder {
                    previous: cur.distance,
                    next: next.distance,
                });
            }
            if gap > INTERCEPT_MERGE_DISTANCE {
                i += 1;
                continue;
            }
            if gap > DIST_EPSILON {
                diag.warn(BuildWarning::ShortGap {
                    length: gap,
                    position: store.position(cur.vertex),
                });
            }

            let merged = &mut self.intercepts[i];
            if merged.self_ref && !next.self_ref {
                if merged.before.is_some() && next.before.is_some() {
                    merged.before = next.before;
                }
                if merged.after.is_some() && next.after.is_some() {
                    merged.after = next.after;
                }
                merged.self_ref = false;
            }
            merged.before = merged.before.or(next.before);
            merged.after = merged.after.or(next.after);

            self.intercepts.remove(i + 1);
        }
        Ok(())
    }
}
