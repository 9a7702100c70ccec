//! Pre-build linedef analysis.
//!
//! Decides which linedefs contribute half-edges and flags the ones that are
//! suspicious but usable.

use config::constants::LONG_LINE_LENGTH;

use crate::diagnostics::{BuildWarning, Diagnostics};
use crate::geom::Vec2;
use crate::map::{LineId, MapData};

/// Why a linedef contributes no half-edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Both endpoints are at the same position.
    ZeroLength,
    /// Exactly overlaps the given, earlier linedef.
    Overlaps(LineId),
    /// Polyobject lines are handled by the engine, not the tree.
    PolyObject,
}

/// Analysis result for one linedef.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// The linedef.
    pub line: LineId,
    /// Both sides face the same sector.
    pub self_ref: bool,
    /// Set when the line is excluded from the build.
    pub skip: Option<SkipReason>,
}

impl LineInfo {
    /// True when the line contributes half-edges.
    pub fn is_usable(&self) -> bool {
        self.skip.is_none()
    }
}

/// Classifies every linedef of a validated map, one entry per line.
pub fn analyze_lines(map: &MapData, diag: &mut Diagnostics) -> Vec<LineInfo> {
    let mut infos: Vec<LineInfo> = map
        .linedefs
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let line = LineId(index as u32);
            let (start, end) = map.line_points(line);
            let skip = if def.flags.polyobj {
                Some(SkipReason::PolyObject)
            } else if start == end {
                diag.warn(BuildWarning::ZeroLengthLine { line });
                Some(SkipReason::ZeroLength)
            } else {
                None
            };
            LineInfo {
                line,
                self_ref: def.flags.self_ref || (def.front.is_some() && def.front == def.back),
                skip,
            }
        })
        .collect();

    mark_overlaps(map, &mut infos, diag);

    for info in infos.iter().filter(|i| i.is_usable()) {
        let def = &map.linedefs[info.line.0 as usize];
        let (start, end) = map.line_points(info.line);
        let delta = end - start;

        if delta.x.abs() >= LONG_LINE_LENGTH || delta.y.abs() >= LONG_LINE_LENGTH {
            diag.warn(BuildWarning::LongLine {
                line: info.line,
                length: delta.length(),
            });
        }
        if def.front.is_none() {
            diag.warn(BuildWarning::MissingFrontSide { line: info.line });
        }
        if def.flags.two_sided && def.back.is_none() {
            diag.warn(BuildWarning::TwoSidedWithoutBack { line: info.line });
        }
    }

    infos
}

/// Skips every linedef that has the same endpoint positions as an earlier
/// one, in either direction.
fn mark_overlaps(map: &MapData, infos: &mut [LineInfo], diag: &mut Diagnostics) {
    let mut keyed: Vec<(Vec2, Vec2, LineId)> = infos
        .iter()
        .filter(|i| i.is_usable())
        .map(|i| {
            let (a, b) = map.line_points(i.line);
            let (lo, hi) = if cmp_points(a, b).is_le() { (a, b) } else { (b, a) };
            (lo, hi, i.line)
        })
        .collect();

    keyed.sort_by(|x, y| {
        cmp_points(x.0, y.0)
            .then_with(|| cmp_points(x.1, y.1))
            .then_with(|| x.2.cmp(&y.2))
    });

    let mut kept = match keyed.first() {
        Some(first) => *first,
        None => return,
    };
    for &entry in &keyed[1..] {
        if entry.0 == kept.0 && entry.1 == kept.1 {
            infos[entry.2 .0 as usize].skip = Some(SkipReason::Overlaps(kept.2));
            diag.warn(BuildWarning::OverlappingLine {
                line: entry.2,
                overlaps: kept.2,
            });
        } else {
            kept = entry;
        }
    }
}

fn cmp_points(a: Vec2, b: Vec2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}
