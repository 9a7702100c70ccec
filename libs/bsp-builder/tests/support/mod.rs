//! Map fixtures shared by the integration tests.
#![allow(dead_code)]

use bsp_builder::{BspTree, LeafId, LineDef, MapData, SectorId, Vec2};

pub const S0: Option<SectorId> = Some(SectorId(0));
pub const S1: Option<SectorId> = Some(SectorId(1));

pub fn map(vertices: &[(f64, f64)], linedefs: Vec<LineDef>) -> MapData {
    MapData {
        vertices: vertices.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        linedefs,
    }
}

/// One-sided walls joining `first..first + count` into a closed loop.
pub fn ring(first: u32, count: u32, sector: Option<SectorId>) -> Vec<LineDef> {
    (0..count)
        .map(|i| LineDef::one_sided(first + i, first + (i + 1) % count, sector))
        .collect()
}

/// 64×64 room.
pub fn square() -> MapData {
    map(&[(0.0, 0.0), (0.0, 64.0), (64.0, 64.0), (64.0, 0.0)], ring(0, 4, S0))
}

/// L-shaped room with its inner corner at (64, 64).
pub fn l_shape() -> MapData {
    map(
        &[(0.0, 0.0), (0.0, 128.0), (64.0, 128.0), (64.0, 64.0), (128.0, 64.0), (128.0, 0.0)],
        ring(0, 6, S0),
    )
}

/// Two 64×64 rooms joined by a two-sided wall at x = 64.
pub fn two_rooms() -> MapData {
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
pub fn self_ref_room() -> MapData {
    let mut lines = ring(0, 6, S0);
    lines.push(LineDef::two_sided(5, 2, SectorId(0), SectorId(0)));
    map(
        &[(0.0, 0.0), (0.0, 128.0), (64.0, 128.0), (128.0, 128.0), (128.0, 0.0), (64.0, 0.0)],
        lines,
    )
}

/// 256×256 room around a 64×64 square pillar.
pub fn pillar_room() -> MapData {
    let mut lines = ring(0, 4, S0);
    // Counter-clockwise, so the room stays on the right.
    lines.extend(ring(4, 4, S0));
    map(
        &[
            (0.0, 0.0),
            (0.0, 256.0),
            (256.0, 256.0),
            (256.0, 0.0),
            (96.0, 96.0),
            (160.0, 96.0),
            (160.0, 160.0),
            (96.0, 160.0),
        ],
        lines,
    )
}

/// 256×256 room around a diamond-shaped pillar.
pub fn diamond_room() -> MapData {
    let mut lines = ring(0, 4, S0);
    lines.extend(ring(4, 4, S0));
    map(
        &[
            (0.0, 0.0),
            (0.0, 256.0),
            (256.0, 256.0),
            (256.0, 0.0),
            (128.0, 96.0),
            (160.0, 128.0),
            (128.0, 160.0),
            (96.0, 128.0),
        ],
        lines,
    )
}

/// Every well-formed fixture, by name.
pub fn all_maps() -> Vec<(&'static str, MapData)> {
    vec![
        ("square", square()),
        ("l_shape", l_shape()),
        ("two_rooms", two_rooms()),
        ("self_ref_room", self_ref_room()),
        ("pillar_room", pillar_room()),
        ("diamond_room", diamond_room()),
    ]
}

/// True when every half-edge of the leaf ends where the next one starts.
pub fn is_closed(tree: &BspTree, leaf: LeafId) -> bool {
    let hedges = &tree.leaf(leaf).hedges;
    (0..hedges.len()).all(|i| {
        let cur = tree.hedge(hedges[i]);
        let next = tree.hedge(hedges[(i + 1) % hedges.len()]);
        cur.end == next.start
    })
}

/// Leaf ids in storage order.
pub fn leaf_ids(tree: &BspTree) -> impl Iterator<Item = LeafId> {
    (0..tree.leaf_count() as u32).map(LeafId)
}
