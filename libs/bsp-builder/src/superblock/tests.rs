use super::*;
use crate::geom::Vec2;
use crate::half_edge::{Side, VertexId};
use crate::map::LineId;

fn store_with(points: &[(f64, f64)]) -> HalfEdgeStore {
    let positions: Vec<Vec2> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
    HalfEdgeStore::with_vertices(&positions)
}

fn real(store: &mut HalfEdgeStore, start: u32, end: u32) -> HEdgeId {
    let line = Some(LineId(start));
    store
        .create_half_edge(line, line, VertexId(start), VertexId(end), None, Side::Front)
        .unwrap()
}

fn mini(store: &mut HalfEdgeStore, start: u32, end: u32) -> HEdgeId {
    store
        .create_half_edge(None, None, VertexId(start), VertexId(end), None, Side::Front)
        .unwrap()
}

#[test]
fn test_small_edge_descends_to_leaf_block() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0)]);
    let edge = real(&mut store, 0, 1);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));

    map.insert(&mut store, root, edge);

    let HEdgeOwner::Block(block) = store.hedge(edge).owner else {
        panic!("edge was not filed");
    };
    assert_ne!(block, root);
    assert_eq!(map.block(block).bounds, BlockBounds::new(0, 0, 256, 256));
    assert_eq!(map.block(root).real_count(), 1);
    assert!(map.block(root).own_hedges().is_empty());
    // root, x-half, y-half, x-quarter, leaf
    assert_eq!(map.live_count(), 5);
}

#[test]
fn test_straddling_edge_stays_in_root() {
    let mut store = store_with(&[(500.0, 10.0), (600.0, 10.0)]);
    let edge = real(&mut store, 0, 1);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));

    map.insert(&mut store, root, edge);

    assert_eq!(store.hedge(edge).owner, HEdgeOwner::Block(root));
    assert_eq!(map.block(root).own_hedges(), &[edge]);
    assert_eq!(map.live_count(), 1);
}

#[test]
fn test_counts_split_real_and_mini() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0), (900.0, 900.0)]);
    let a = real(&mut store, 0, 1);
    let b = mini(&mut store, 1, 0);
    let c = real(&mut store, 1, 2);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));

    for edge in [a, b, c] {
        map.insert(&mut store, root, edge);
    }

    let block = map.block(root);
    assert_eq!(block.real_count(), 2);
    assert_eq!(block.mini_count(), 1);
    assert_eq!(block.total_count(), 3);
    assert_eq!(map.hedges_in(root).len(), 3);
}

#[test]
fn test_drain_empties_every_block() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0), (900.0, 900.0), (500.0, 10.0)]);
    let edges = [real(&mut store, 0, 1), real(&mut store, 1, 2), mini(&mut store, 3, 2)];
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));
    for edge in edges {
        map.insert(&mut store, root, edge);
    }

    let mut drained = map.drain(&mut store, root);
    for &edge in &drained {
        assert_eq!(store.hedge(edge).owner, HEdgeOwner::Unfiled);
    }

    drained.sort();
    assert_eq!(drained, edges.to_vec());
    assert!(map.block(root).is_empty());
    map.for_each_block(root, |_, block| assert!(block.is_empty()));
}

#[test]
fn test_pop_is_last_in_first_out() {
    let mut store = store_with(&[(500.0, 10.0), (600.0, 10.0), (600.0, 20.0)]);
    let first = real(&mut store, 0, 1);
    let second = real(&mut store, 0, 2);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));
    map.insert(&mut store, root, first);
    map.insert(&mut store, root, second);

    assert_eq!(map.pop(&mut store, root), Some(second));
    assert_eq!(map.pop(&mut store, root), Some(first));
    assert_eq!(map.pop(&mut store, root), None);
}

#[test]
fn test_link_into_bumps_ancestors() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0), (20.0, 30.0)]);
    let edge = real(&mut store, 0, 1);
    let extra = mini(&mut store, 1, 2);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));
    map.insert(&mut store, root, edge);
    let HEdgeOwner::Block(leaf) = store.hedge(edge).owner else {
        panic!("edge was not filed");
    };

    map.link_into(&mut store, leaf, extra);

    assert_eq!(store.hedge(extra).owner, HEdgeOwner::Block(leaf));
    assert_eq!(map.block(leaf).mini_count(), 1);
    assert_eq!(map.block(root).mini_count(), 1);
    assert_eq!(map.block(root).real_count(), 1);
}

#[test]
fn test_find_limits_rounds_outwards() {
    let mut store = store_with(&[(10.5, 10.0), (20.0, 10.2), (-3.25, 4.0)]);
    let a = real(&mut store, 0, 1);
    let b = real(&mut store, 1, 2);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(-512, -512, 512, 512));
    map.insert(&mut store, root, a);
    map.insert(&mut store, root, b);

    let limits = map.find_limits(&store, root);
    assert_eq!(limits.min, Vec2::new(-4.0, 4.0));
    assert_eq!(limits.max, Vec2::new(20.0, 11.0));
}

#[test]
fn test_release_recycles_slots() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0)]);
    let edge = real(&mut store, 0, 1);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));
    map.insert(&mut store, root, edge);
    map.drain(&mut store, root);
    assert_eq!(map.live_count(), 5);

    map.release(root);
    assert_eq!(map.live_count(), 0);

    let again = map.create_root(BlockBounds::new(0, 0, 64, 64));
    assert_eq!(map.live_count(), 1);
    assert!(again.0 < 5);
    assert!(map.block(again).is_empty());
}

#[test]
fn test_block_ids_skip_empty_subtrees() {
    let mut store = store_with(&[(10.0, 10.0), (20.0, 10.0), (900.0, 900.0), (910.0, 900.0)]);
    let near = real(&mut store, 0, 1);
    let far = real(&mut store, 2, 3);
    let mut map = SuperBlockmap::new();
    let root = map.create_root(BlockBounds::new(0, 0, 1024, 1024));
    map.insert(&mut store, root, near);
    map.insert(&mut store, root, far);
    let all = map.block_ids(root);

    let owner = match store.hedge(far).owner {
        HEdgeOwner::Block(block) => block,
        other => panic!("unexpected owner {other:?}"),
    };
    assert_eq!(map.pop(&mut store, owner), Some(far));

    let remaining = map.block_ids(root);
    assert!(remaining.len() < all.len());
    assert!(!remaining.contains(&owner));
    assert_eq!(map.drain(&mut store, root), vec![near]);
}
