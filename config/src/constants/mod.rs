//! Centralized configuration values shared by the BSP builder crates.
//!
//! Each public item in this module documents its purpose and, where useful,
//! provides a minimal usage example so that downstream crates can remain
//! declarative and avoid scattering literals.
//!
//! The cost weights below are empirically tuned values inherited from the
//! classic DOOM node builders. They carry no derivation; they are kept
//! verbatim so that existing maps produce the same trees.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Perpendicular distance under which a point is considered to lie on a
/// partition line.
///
/// # Examples
/// ```
/// use config::constants::DIST_EPSILON;
/// let on_line = |perp: f64| perp.abs() <= DIST_EPSILON;
/// assert!(on_line(0.005));
/// assert!(!on_line(0.01));
/// ```
pub const DIST_EPSILON: f64 = 1.0 / 128.0;

/// Angular tolerance, in degrees, used when ordering edge tips and winding
/// leaves.
///
/// # Examples
/// ```
/// use config::constants::ANG_EPSILON;
/// assert!(ANG_EPSILON < 0.001);
/// ```
pub const ANG_EPSILON: f64 = 1.0 / 1024.0;

/// Length under which a resulting edge piece is considered "iffy".
///
/// Split points closer than this to either end of a half-edge, and edges
/// passing closer than this to a partition without crossing it, are
/// penalised by the partition cost heuristic.
pub const IFFY_LEN: f64 = 4.0;

/// Padding factor applied to [`IFFY_LEN`] when testing a whole superblock
/// against a partition line.
pub const BOX_PADDING_FACTOR: f64 = 1.5;

/// Intercepts closer than this along a partition are merged into one.
///
/// # Examples
/// ```
/// use config::constants::{INTERCEPT_MERGE_DISTANCE, DIST_EPSILON};
/// assert!(INTERCEPT_MERGE_DISTANCE > DIST_EPSILON);
/// ```
pub const INTERCEPT_MERGE_DISTANCE: f64 = 0.2;

/// Largest backwards step tolerated between consecutive intercepts before
/// the ledger is declared out of order.
pub const INTERCEPT_ORDER_TOLERANCE: f64 = -0.1;

// =============================================================================
// SPATIAL INDEX CONSTANTS
// =============================================================================

/// Side length at or under which a superblock is no longer subdivided.
///
/// # Examples
/// ```
/// use config::constants::SUPERBLOCK_LEAF_SIZE;
/// let width = 200;
/// let height = 256;
/// assert!(width <= SUPERBLOCK_LEAF_SIZE && height <= SUPERBLOCK_LEAF_SIZE);
/// ```
pub const SUPERBLOCK_LEAF_SIZE: i32 = 256;

/// Granularity of the root superblock extent, in map units.
pub const BLOCK_UNIT: i32 = 128;

/// Mask used to align the root superblock origin down to a multiple of 8.
pub const BLOCK_ALIGN_MASK: i32 = 0x7;

/// Largest accepted absolute vertex coordinate, in map units (2^24).
///
/// Keeps the integer superblock extent, which is padded out to a power of
/// two, well inside `i32`.
///
/// # Examples
/// ```
/// use config::constants::MAX_COORDINATE;
/// let in_range = |c: f64| c.abs() <= MAX_COORDINATE;
/// assert!(in_range(-32768.0));
/// assert!(!in_range(1.5e9));
/// assert!(4.0 * MAX_COORDINATE < i32::MAX as f64);
/// ```
pub const MAX_COORDINATE: f64 = 16_777_216.0;

// =============================================================================
// PARTITION COST CONSTANTS
// =============================================================================

/// Default multiplier applied to split and near-miss costs.
///
/// Higher values make the builder avoid splitting half-edges at the cost of
/// a less balanced tree.
pub const DEFAULT_SPLIT_FACTOR: i32 = 7;

/// Base cost of one split half-edge, multiplied by the split factor.
pub const SPLIT_COST: i64 = 100;

/// Base cost of a near miss on the right side, multiplied by the split
/// factor and the squared closeness ratio.
pub const NEAR_MISS_RIGHT_COST: f64 = 100.0;

/// Base cost of a near miss on the left side.
pub const NEAR_MISS_LEFT_COST: f64 = 70.0;

/// Base surcharge for a split point closer than [`IFFY_LEN`] to either end.
pub const IFFY_SPLIT_COST: f64 = 140.0;

/// Weight of the difference between real half-edge counts on either side.
///
/// # Examples
/// ```
/// use config::constants::{REAL_BALANCE_COST, MINI_BALANCE_COST};
/// assert!(REAL_BALANCE_COST > MINI_BALANCE_COST);
/// ```
pub const REAL_BALANCE_COST: i64 = 100;

/// Weight of the difference between mini half-edge counts on either side.
pub const MINI_BALANCE_COST: i64 = 50;

/// Flat cost added to partitions that are neither horizontal nor vertical.
pub const NON_AXIAL_COST: i64 = 25;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum recursion depth of the node builder.
///
/// Degenerate maps that would recurse deeper are rejected instead of
/// exhausting the stack.
///
/// # Examples
/// ```
/// use config::constants::MAX_RECURSION_DEPTH;
/// let current_depth = 40;
/// assert!(current_depth < MAX_RECURSION_DEPTH);
/// ```
pub const MAX_RECURSION_DEPTH: usize = 1000;

/// Axis extent at or above which a linedef is reported as very long.
pub const LONG_LINE_LENGTH: f64 = 10000.0;

/// Bytes of stack space allocated when the `stacker` crate has to grow the
/// stack during recursion.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which recursion switches to a freshly grown
/// segment.
pub const STACKER_RED_ZONE_BYTES: usize = 128 * 1024;

// =============================================================================
// GLOBAL CONFIGURATION
// =============================================================================

/// Immutable snapshot of the tunable builder settings.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert_eq!(config.split_factor, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Multiplier for split and near-miss costs.
    pub split_factor: i32,
    /// Maximum node builder recursion depth.
    pub max_depth: usize,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// values.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(11, 64).expect("valid config");
    /// assert_eq!(cfg.max_depth, 64);
    /// ```
    pub fn new(split_factor: i32, max_depth: usize) -> Result<Self, ConfigError> {
        if split_factor <= 0 {
            return Err(ConfigError::InvalidSplitFactor(split_factor));
        }
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(max_depth));
        }
        Ok(Self {
            split_factor,
            max_depth,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            split_factor: DEFAULT_SPLIT_FACTOR,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when the split factor is zero or negative.
    InvalidSplitFactor(i32),
    /// Raised when the recursion limit is zero.
    InvalidMaxDepth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSplitFactor(value) => {
                write!(f, "split_factor must be positive: {value}")
            }
            ConfigError::InvalidMaxDepth(value) => {
                write!(f, "max_depth must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
