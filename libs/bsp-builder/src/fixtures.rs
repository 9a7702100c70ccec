//! Small maps shared by the unit tests.

use crate::geom::Vec2;
use crate::map::{LineDef, MapData, SectorId};

pub(crate) const S0: Option<SectorId> = Some(SectorId(0));
pub(crate) const S1: Option<SectorId> = Some(SectorId(1));

pub(crate) fn map(vertices: &[(f64, f64)], linedefs: Vec<LineDef>) -> MapData {
    MapData {
        vertices: vertices.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        linedefs,
    }
}

/// One-sided walls joining `first..first + count` into a closed loop.
pub(crate) fn ring(first: u32, count: u32, sector: Option<SectorId>) -> Vec<LineDef> {
    (0..count)
        .map(|i| LineDef::one_sided(first + i, first + (i + 1) % count, sector))
        .collect()
}

/// 64×64 room.
pub(crate) fn square() -> MapData {
    map(&[(0.0, 0.0), (0.0, 64.0), (64.0, 64.0), (64.0, 0.0)], ring(0, 4, S0))
}

/// L-shaped room with its inner corner at (64, 64).
pub(crate) fn l_shape() -> MapData {
    map(
        &[(0.0, 0.0), (0.0, 128.0), (64.0, 128.0), (64.0, 64.0), (128.0, 64.0), (128.0, 0.0)],
        ring(0, 6, S0),
    )
}

/// Two 64×64 rooms joined by a two-sided wall at x = 64.
pub(crate) fn two_rooms() -> MapData {
    map(
        &[(0.0, 0.0), (64.0, 0.0), (128.0, 0.0), (128.0, 64.0), (64.0, 64.0), (0.0, 64.0)],
        vec![
            LineDef::one_sided(0, 5, S0),
            LineDef::one_sided(5, 4, S0),
            LineDef::two_sided(4, 1, SectorId(0), SectorId(1)),
            LineDef::one_sided(1, 0, S0),
            LineDef::one_sided(4, 3, S1),
            LineDef::one_sided(3, 2, S1),
            LineDef::one_sided(2, 1, S1),
        ],
    )
}

/// 128×128 room cut in half by a line with sector 0 on both sides.
pub(crate) fn self_ref_room() -> MapData {
    let mut lines = ring(0, 6, S0);
    lines.push(LineDef::two_sided(5, 2, SectorId(0), SectorId(0)));
    map(
        &[(0.0, 0.0), (0.0, 128.0), (64.0, 128.0), (128.0, 128.0), (128.0, 0.0), (64.0, 0.0)],
        lines,
    )
}
