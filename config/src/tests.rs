//! # Tests for Config Constants
//!
//! Unit tests verifying the relationships between configuration constants
//! that the builder's heuristics depend on.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_dist_epsilon_matches_classic_builders() {
    assert_eq!(DIST_EPSILON, 1.0 / 128.0);
}

#[test]
fn test_ang_epsilon_matches_classic_builders() {
    assert_eq!(ANG_EPSILON, 1.0 / 1024.0);
}

#[test]
fn test_iffy_len_larger_than_dist_epsilon() {
    assert!(IFFY_LEN > DIST_EPSILON, "near misses must be measurable");
}

#[test]
fn test_intercept_tolerances() {
    assert!(INTERCEPT_MERGE_DISTANCE > 0.0);
    assert!(INTERCEPT_ORDER_TOLERANCE < 0.0);
    assert!(INTERCEPT_ORDER_TOLERANCE.abs() < INTERCEPT_MERGE_DISTANCE);
}

// =============================================================================
// SPATIAL INDEX TESTS
// =============================================================================

#[test]
fn test_superblock_leaf_size_is_multiple_of_block_unit() {
    assert_eq!(SUPERBLOCK_LEAF_SIZE % BLOCK_UNIT, 0);
}

#[test]
fn test_block_align_mask_is_low_bits() {
    assert_eq!(BLOCK_ALIGN_MASK & (BLOCK_ALIGN_MASK + 1), 0);
}

// =============================================================================
// COST TESTS
// =============================================================================

#[test]
fn test_cost_weights_preserved() {
    // Changing these alters which partitions get chosen.
    assert_eq!(SPLIT_COST, 100);
    assert_eq!(REAL_BALANCE_COST, 100);
    assert_eq!(MINI_BALANCE_COST, 50);
    assert_eq!(NON_AXIAL_COST, 25);
    assert_eq!(DEFAULT_SPLIT_FACTOR, 7);
}

#[test]
fn test_left_near_miss_cheaper_than_right() {
    assert!(NEAR_MISS_LEFT_COST < NEAR_MISS_RIGHT_COST);
    assert!(IFFY_SPLIT_COST > NEAR_MISS_RIGHT_COST);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_max_recursion_depth_reasonable() {
    assert!(MAX_RECURSION_DEPTH >= 100);
    assert!(MAX_RECURSION_DEPTH <= 10000);
}

#[test]
fn test_stacker_sizes() {
    assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
}
