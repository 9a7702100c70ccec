mod support;

use std::collections::HashMap;

use approx::assert_relative_eq;
use bsp_builder::{
    build_bsp, BspBuilder, BspElement, BspTree, BuildWarning, LeafId, LineId, MapData, Side, Vec2,
};
use support::*;

/// Looser than the builder's own epsilon; split points off the axes are
/// rounded.
const CONVEX_TOLERANCE: f64 = 0.01;

fn build_all() -> Vec<(&'static str, BspTree)> {
    all_maps()
        .into_iter()
        .map(|(name, map)| (name, build_bsp(&map).unwrap()))
        .collect()
}

#[test]
fn builds_are_deterministic() {
    for (name, map) in all_maps() {
        let first = build_bsp(&map).unwrap();
        let second = build_bsp(&map).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn every_leaf_is_a_closed_loop() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            assert!(is_closed(&tree, leaf), "{name}: leaf {leaf:?} is open");
        }
        let open = tree
            .report
            .count_where(|w| matches!(w, BuildWarning::LeafNotClosed { .. }));
        assert_eq!(open, 0, "{name}");
    }
}

#[test]
fn every_leaf_is_convex() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            for edge in tree.leaf_hedges(leaf) {
                for other in tree.leaf_hedges(leaf) {
                    for vertex in [other.start, other.end] {
                        let point = tree.vertex(vertex).position;
                        let dist = edge.geometry.perp_dist(point);
                        assert!(
                            dist >= -CONVEX_TOLERANCE,
                            "{name}: {point} lies {dist} left of a wall in leaf {leaf:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn every_leaf_faces_one_sector() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            let sector = tree.leaf(leaf).sector;
            assert!(sector.is_some(), "{name}");
            assert!(tree.leaf_hedges(leaf).all(|h| h.sector == sector), "{name}");
        }
        let facing = tree
            .report
            .count_where(|w| matches!(w, BuildWarning::SectorFacing { .. }));
        assert_eq!(facing, 0, "{name}");
    }
}

#[test]
fn no_gaps_are_reported_on_well_formed_maps() {
    for (name, tree) in build_all() {
        let gaps = tree.report.count_where(|w| {
            matches!(
                w,
                BuildWarning::UnclosedSector { .. } | BuildWarning::SectorMismatch { .. }
            )
        });
        assert_eq!(gaps, 0, "{name}");
    }
}

#[test]
fn split_pieces_cover_each_line_exactly() {
    for (name, map) in all_maps() {
        let tree = build_bsp(&map).unwrap();
        let mut covered: HashMap<(LineId, Side), f64> = HashMap::new();
        for hedge in tree.hedges.iter().filter(|h| !h.is_mini()) {
            let Some(line) = hedge.linedef else { continue };
            *covered.entry((line, hedge.side)).or_default() += hedge.length();
        }

        for (index, def) in map.linedefs.iter().enumerate() {
            let line = LineId(index as u32);
            let length = map.vertices[def.start as usize].distance(map.vertices[def.end as usize]);
            assert_relative_eq!(covered[&(line, Side::Front)], length, epsilon = 1e-6);
            if def.back.is_some() {
                assert_relative_eq!(covered[&(line, Side::Back)], length, epsilon = 1e-6);
            } else {
                assert!(!covered.contains_key(&(line, Side::Back)), "{name}");
            }
        }
    }
}

#[test]
fn split_twins_stay_paired() {
    for (name, tree) in build_all() {
        for hedge in &tree.hedges {
            if let Some(twin) = hedge.twin {
                let twin = tree.hedge(twin);
                assert_eq!((twin.start, twin.end), (hedge.end, hedge.start), "{name}");
                assert_eq!(twin.linedef, hedge.linedef, "{name}");
            }
        }
    }
}

#[test]
fn every_half_edge_lands_in_one_leaf_with_a_unique_index() {
    for (name, tree) in build_all() {
        let mut seen = vec![false; tree.hedges.len()];
        for leaf in leaf_ids(&tree) {
            for &h in &tree.leaf(leaf).hedges {
                assert!(!seen[h.0 as usize], "{name}: {h} filed twice");
                seen[h.0 as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "{name}");

        let mut indices: Vec<u32> = tree.hedges.iter().filter_map(|h| h.index).collect();
        indices.sort_unstable();
        let expected: Vec<u32> = (0..tree.hedges.len() as u32).collect();
        assert_eq!(indices, expected, "{name}");
    }
}

#[test]
fn every_leaf_starts_with_a_real_half_edge() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            let first = tree.leaf_hedges(leaf).next().unwrap();
            assert!(!first.is_mini(), "{name}");
        }
    }
}

#[test]
fn partitions_are_balanced_on_symmetric_rooms() {
    let tree = build_bsp(&two_rooms()).unwrap();
    let BspElement::Node(root) = tree.root else {
        panic!("expected a node at the root");
    };
    let node = tree.node(root);
    let count = |element: BspElement| match element {
        BspElement::Leaf(leaf) => tree.leaf(leaf).hedges.len(),
        BspElement::Node(_) => 0,
    };
    assert_eq!(count(node.right), count(node.left));
}

fn subtree_leaves(tree: &BspTree, element: BspElement, out: &mut Vec<LeafId>) {
    match element {
        BspElement::Leaf(leaf) => out.push(leaf),
        BspElement::Node(id) => {
            let node = tree.node(id);
            subtree_leaves(tree, node.right, out);
            subtree_leaves(tree, node.left, out);
        }
    }
}

#[test]
fn node_bounds_contain_their_subtrees() {
    for (name, tree) in build_all() {
        for node in &tree.nodes {
            for (element, bounds) in [(node.right, node.right_bounds), (node.left, node.left_bounds)] {
                let mut leaves = Vec::new();
                subtree_leaves(&tree, element, &mut leaves);
                for leaf in leaves {
                    for hedge in tree.leaf_hedges(leaf) {
                        let start = tree.vertex(hedge.start).position;
                        assert!(bounds.contains(start), "{name}: {start} outside {bounds:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn find_leaf_returns_the_leaf_around_a_point() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            let centroid = tree.leaf(leaf).centroid;
            assert_eq!(tree.find_leaf(centroid), leaf, "{name}");
        }
    }
}

#[test]
fn front_to_back_lists_every_leaf_once_nearest_first() {
    for (name, tree) in build_all() {
        for leaf in leaf_ids(&tree) {
            let centroid = tree.leaf(leaf).centroid;
            let order = tree.leaves_front_to_back(centroid);
            assert_eq!(order.len(), tree.leaf_count(), "{name}");
            assert_eq!(order[0], leaf, "{name}");
            let mut sorted = order.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), order.len(), "{name}");
        }
    }
}

#[test]
fn post_order_ends_at_the_root() {
    for (name, tree) in build_all() {
        let order = tree.post_order();
        assert_eq!(order.len(), tree.node_count() + tree.leaf_count(), "{name}");
        assert_eq!(order.last(), Some(&tree.root), "{name}");
        assert_eq!(tree.depth(), tree.report.stats.max_depth, "{name}");
    }
}

#[test]
fn batch_build_matches_single_builds() {
    let maps: Vec<MapData> = all_maps().into_iter().map(|(_, map)| map).collect();
    let batch = BspBuilder::default().build_many(&maps);
    for (map, result) in maps.iter().zip(batch) {
        assert_eq!(result.unwrap(), build_bsp(map).unwrap());
    }
}

#[test]
fn map_round_trips_through_json() {
    for (name, map) in all_maps() {
        let json = serde_json::to_string(&map).unwrap();
        let back: MapData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map, "{name}");
    }
}

#[test]
fn map_flags_default_when_missing_from_json() {
    let json = r#"{
        "vertices": [[0.0, 0.0], [0.0, 64.0], [64.0, 64.0], [64.0, 0.0]],
        "linedefs": [
            {"start": 0, "end": 1, "front": 0, "back": null},
            {"start": 1, "end": 2, "front": 0, "back": null},
            {"start": 2, "end": 3, "front": 0, "back": null},
            {"start": 3, "end": 0, "front": 0, "back": null}
        ]
    }"#;
    let map: MapData = serde_json::from_str(json).unwrap();
    assert_eq!(map, square());
}

#[test]
fn tree_round_trips_through_json() {
    let tree = build_bsp(&square()).unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let back: BspTree = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
    assert_eq!(back.vertex(back.hedges[0].start).position, Vec2::new(0.0, 0.0));
}
