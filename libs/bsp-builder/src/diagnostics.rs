//! Non-fatal build diagnostics.
//!
//! Warnings are emitted through the `log` facade as they happen and are also
//! kept as structured [`BuildWarning`] records in the [`BuildReport`], so
//! callers can inspect them without installing a logger. Some warnings are
//! suppressed after the first occurrence per sector (or sector pair) to keep
//! reports on broken maps readable.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;
use crate::map::{LineId, SectorId};
use crate::tree::LeafId;

/// A recoverable oddity found while building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildWarning {
    /// A linedef whose endpoints coincide was skipped.
    ZeroLengthLine {
        /// Skipped line.
        line: LineId,
    },
    /// A linedef exactly overlapping an earlier one was skipped.
    OverlappingLine {
        /// Skipped line.
        line: LineId,
        /// Line that was kept.
        overlaps: LineId,
    },
    /// A linedef long enough to risk precision trouble.
    LongLine {
        /// Offending line.
        line: LineId,
        /// Its length.
        length: f64,
    },
    /// A linedef without a front sector.
    MissingFrontSide {
        /// Offending line.
        line: LineId,
    },
    /// A linedef flagged two-sided that has no back sector.
    TwoSidedWithoutBack {
        /// Offending line.
        line: LineId,
    },
    /// Two intercepts closer than the merge distance but not coincident.
    ShortGap {
        /// Gap length along the partition.
        length: f64,
        /// Position of the first intercept.
        position: Vec2,
    },
    /// Only one side of a gap along the partition is open.
    UnclosedSector {
        /// Sector left open.
        sector: SectorId,
        /// Gap midpoint.
        position: Vec2,
    },
    /// The two ends of a gap open onto different sectors.
    SectorMismatch {
        /// Sector after the first intercept.
        first: SectorId,
        /// Position of the first intercept.
        first_position: Vec2,
        /// Sector before the second intercept.
        second: SectorId,
        /// Position of the second intercept.
        second_position: Vec2,
    },
    /// A finished leaf whose half-edges do not form a closed loop.
    LeafNotClosed {
        /// Offending leaf.
        leaf: LeafId,
        /// Leaf centroid.
        position: Vec2,
        /// Number of breaks in the loop.
        gaps: usize,
        /// Number of half-edges in the leaf.
        hedges: usize,
    },
    /// A leaf mixes half-edges facing different sectors.
    SectorFacing {
        /// Sector of the leaf.
        sector: SectorId,
        /// Sector faced by the offending half-edge.
        facing: SectorId,
        /// Linedef of the offending half-edge.
        line: Option<LineId>,
        /// Start of the offending half-edge.
        position: Vec2,
    },
}

impl BuildWarning {
    /// Verbose warnings are logged at debug level.
    pub fn is_verbose(&self) -> bool {
        matches!(
            self,
            Self::ShortGap { .. } | Self::LeafNotClosed { .. } | Self::SectorFacing { .. }
        )
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthLine { line } => write!(f, "linedef #{line} has zero length"),
            Self::OverlappingLine { line, overlaps } => {
                write!(f, "linedef #{line} overlaps linedef #{overlaps}")
            }
            Self::LongLine { line, length } => {
                write!(f, "linedef #{line} is very long ({length:.0} units)")
            }
            Self::MissingFrontSide { line } => write!(f, "linedef #{line} has no front side"),
            Self::TwoSidedWithoutBack { line } => {
                write!(f, "linedef #{line} is two-sided but has no back side")
            }
            Self::ShortGap { length, position } => write!(
                f,
                "skipping very short gap ({length:.3}) near ({:.1}, {:.1})",
                position.x, position.y
            ),
            Self::UnclosedSector { sector, position } => write!(
                f,
                "sector #{sector} is unclosed near ({:.1}, {:.1})",
                position.x, position.y
            ),
            Self::SectorMismatch {
                first,
                first_position,
                second,
                second_position,
            } => write!(
                f,
                "sector mismatch: #{first} ({:.1}, {:.1}) != #{second} ({:.1}, {:.1})",
                first_position.x, first_position.y, second_position.x, second_position.y
            ),
            Self::LeafNotClosed {
                leaf,
                position,
                gaps,
                hedges,
            } => write!(
                f,
                "leaf #{} near ({:.1}, {:.1}) is not closed ({gaps} gaps, {hedges} half-edges)",
                leaf.0, position.x, position.y
            ),
            Self::SectorFacing {
                sector,
                facing,
                line,
                position,
            } => {
                write!(f, "sector #{sector} has half-edge facing #{facing}")?;
                if let Some(line) = line {
                    write!(f, " (linedef #{line})")?;
                }
                write!(f, " near ({:.1}, {:.1})", position.x, position.y)
            }
        }
    }
}

/// Counters summarising one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Linedefs in the input.
    pub linedefs: usize,
    /// Linedefs skipped by analysis.
    pub skipped_lines: usize,
    /// Vertices in the input.
    pub original_vertices: usize,
    /// Vertices created by splits.
    pub split_vertices: usize,
    /// Real half-edges in the output.
    pub real_hedges: usize,
    /// Mini half-edges in the output.
    pub mini_hedges: usize,
    /// Half-edge splits performed.
    pub splits: usize,
    /// Internal nodes in the output.
    pub nodes: usize,
    /// Leaves in the output.
    pub leaves: usize,
    /// Depth of the deepest leaf (root leaf = 0).
    pub max_depth: usize,
}

/// Everything a build reports besides the tree itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Warnings in emission order.
    pub warnings: Vec<BuildWarning>,
    /// Summary counters.
    pub stats: BuildStats,
}

impl BuildReport {
    /// Number of warnings matching `pred`.
    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&BuildWarning) -> bool,
    {
        self.warnings.iter().filter(|w| pred(w)).count()
    }
}

/// Warning sink with per-build suppression state.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<BuildWarning>,
    unclosed: HashSet<SectorId>,
    mismatched: HashSet<(SectorId, SectorId)>,
    facing: HashSet<(SectorId, SectorId)>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a warning.
    pub fn warn(&mut self, warning: BuildWarning) {
        if warning.is_verbose() {
            log::debug!("{warning}");
        } else {
            log::warn!("{warning}");
        }
        self.warnings.push(warning);
    }

    /// Reports an unclosed sector unless it was already reported.
    pub fn warn_unclosed(&mut self, sector: SectorId, position: Vec2) {
        if self.unclosed.insert(sector) {
            self.warn(BuildWarning::UnclosedSector { sector, position });
        }
    }

    /// Reports a sector mismatch unless this pair was already reported.
    pub fn warn_mismatch(
        &mut self,
        first: SectorId,
        first_position: Vec2,
        second: SectorId,
        second_position: Vec2,
    ) {
        let key = (first.min(second), first.max(second));
        if self.mismatched.insert(key) {
            self.warn(BuildWarning::SectorMismatch {
                first,
                first_position,
                second,
                second_position,
            });
        }
    }

    /// Reports a half-edge facing the wrong sector unless this pair was
    /// already reported.
    pub fn warn_facing(
        &mut self,
        sector: SectorId,
        facing: SectorId,
        line: Option<LineId>,
        position: Vec2,
    ) {
        if self.facing.insert((sector, facing)) {
            self.warn(BuildWarning::SectorFacing {
                sector,
                facing,
                line,
                position,
            });
        }
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Consumes the sink.
    pub fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
    }
}
