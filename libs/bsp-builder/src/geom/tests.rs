use super::*;
use approx::assert_relative_eq;

#[test]
fn test_compute_angle_quadrants() {
    assert_relative_eq!(compute_angle(Vec2::new(1.0, 1.0)), 45.0);
    assert_relative_eq!(compute_angle(Vec2::new(-1.0, 1.0)), 135.0);
    assert_relative_eq!(compute_angle(Vec2::new(-1.0, -1.0)), 225.0);
    assert_relative_eq!(compute_angle(Vec2::new(1.0, -1.0)), 315.0);
}

#[test]
fn test_line_geometry_caches_length_and_angle() {
    let line = LineGeometry::new(Vec2::new(10.0, 10.0), Vec2::new(13.0, 14.0));
    assert_relative_eq!(line.length, 5.0);
    assert_relative_eq!(line.angle, 4.0_f64.atan2(3.0).to_degrees());
    assert_eq!(line.end(), Vec2::new(13.0, 14.0));
}

#[test]
fn test_perp_dist_sign_convention() {
    // Heading east: south is on the right.
    let line = LineGeometry::new(Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0));
    assert_relative_eq!(line.perp_dist(Vec2::new(4.0, -2.0)), 2.0);
    assert_relative_eq!(line.perp_dist(Vec2::new(4.0, 3.0)), -3.0);
    assert_eq!(line.point_side(Vec2::new(100.0, -1.0)), LineSide::Right);
    assert_eq!(line.point_side(Vec2::new(100.0, 1.0)), LineSide::Left);
    assert_eq!(line.point_side(Vec2::new(-50.0, 0.001)), LineSide::On);
}

#[test]
fn test_para_dist_measures_from_origin() {
    let line = LineGeometry::new(Vec2::new(64.0, 128.0), Vec2::new(64.0, 64.0));
    assert_relative_eq!(line.para_dist(Vec2::new(64.0, 128.0)), 0.0);
    assert_relative_eq!(line.para_dist(Vec2::new(64.0, 64.0)), 64.0);
    assert_relative_eq!(line.para_dist(Vec2::new(10.0, 0.0)), 128.0);
    assert_relative_eq!(line.para_dist(Vec2::new(64.0, 200.0)), -72.0);
}

#[test]
fn test_axis_alignment() {
    assert!(LineGeometry::new(Vec2::ZERO, Vec2::new(5.0, 0.0)).is_horizontal());
    assert!(LineGeometry::new(Vec2::ZERO, Vec2::new(0.0, -5.0)).is_vertical());
    assert!(!LineGeometry::new(Vec2::ZERO, Vec2::new(1.0, 2.0)).is_axis_aligned());
}

#[test]
fn test_block_bounds_children_split_longer_axis() {
    let wide = BlockBounds::new(0, 0, 512, 256);
    assert!(wide.splits_along_x());
    assert_eq!(wide.child(0), BlockBounds::new(0, 0, 256, 256));
    assert_eq!(wide.child(1), BlockBounds::new(256, 0, 512, 256));

    let tall = BlockBounds::new(0, 0, 256, 512);
    assert!(!tall.splits_along_x());
    assert_eq!(tall.child(0), BlockBounds::new(0, 0, 256, 256));
    assert_eq!(tall.child(1), BlockBounds::new(0, 256, 256, 512));
}

#[test]
fn test_block_bounds_for_map_at_coordinate_limit() {
    use config::constants::MAX_COORDINATE;

    let limits = AABox::new(
        Vec2::new(-MAX_COORDINATE, -MAX_COORDINATE),
        Vec2::new(MAX_COORDINATE, MAX_COORDINATE),
    );
    let root = BlockBounds::for_map(&limits);
    assert_eq!((root.x1, root.y1), (-16_777_216, -16_777_216));
    assert_eq!(root.width(), 67_108_864);
    assert_eq!(root.height(), 67_108_864);
}

#[test]
fn test_block_bounds_leaf_size() {
    assert!(BlockBounds::new(0, 0, 256, 256).is_leaf(256));
    assert!(!BlockBounds::new(0, 0, 512, 256).is_leaf(256));
}

#[test]
fn test_aabox_accumulates_points() {
    let mut bounds = AABox::empty();
    assert!(bounds.is_empty());
    bounds.add_point(Vec2::new(1.5, -2.25));
    bounds.add_point(Vec2::new(-3.0, 7.0));
    assert!(!bounds.is_empty());
    assert_eq!(bounds.min, Vec2::new(-3.0, -2.25));
    assert_eq!(bounds.max, Vec2::new(1.5, 7.0));

    let rounded = bounds.rounded_out();
    assert_eq!(rounded.min, Vec2::new(-3.0, -3.0));
    assert_eq!(rounded.max, Vec2::new(2.0, 7.0));
    assert!(rounded.contains(Vec2::new(2.0, -3.0)));
    assert!(!rounded.contains(Vec2::new(2.1, 0.0)));
}
