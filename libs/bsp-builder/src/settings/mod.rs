//! Builder-level configuration helpers building on the shared `config` crate.
//!
//! The builder never reads literal tuning values; it takes them from a
//! [`BuilderConfig`] so batch builds can vary them per run.

use config::constants::{GlobalConfig, DEFAULT_SPLIT_FACTOR, MAX_RECURSION_DEPTH};

use crate::error::BspResult;

/// Node builder configuration wrapper.
///
/// # Examples
/// ```
/// use bsp_builder::BuilderConfig;
/// let cfg = BuilderConfig::default();
/// assert_eq!(cfg.split_factor, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Multiplier applied to split and near-miss costs. Higher values favour
    /// fewer splits over balance.
    pub split_factor: i32,
    /// Maximum number of tree levels below the root node.
    pub max_depth: usize,
}

impl BuilderConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use bsp_builder::{BspError, BuilderConfig};
    /// let cfg = BuilderConfig::new(11, 64).unwrap();
    /// assert_eq!(cfg.max_depth, 64);
    /// assert!(matches!(BuilderConfig::new(0, 64), Err(BspError::Config(_))));
    /// ```
    pub fn new(split_factor: i32, max_depth: usize) -> BspResult<Self> {
        let cfg = GlobalConfig::new(split_factor, max_depth)?;
        Ok(cfg.into())
    }
}

impl From<GlobalConfig> for BuilderConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            split_factor: cfg.split_factor,
            max_depth: cfg.max_depth,
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            split_factor: DEFAULT_SPLIT_FACTOR,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}
