//! # Config Crate
//!
//! Centralized configuration constants for the BSP node builder. Every
//! epsilon, cost weight and safety limit the builder relies on is defined
//! here so that the numeric behavior of partition selection stays in one
//! place.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DIST_EPSILON, IFFY_LEN};
//!
//! // A point closer than DIST_EPSILON to a partition lies on it.
//! let perpendicular: f64 = 0.001;
//! assert!(perpendicular.abs() <= DIST_EPSILON);
//!
//! // Near misses are judged against IFFY_LEN.
//! assert!(IFFY_LEN > DIST_EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Output Compatible**: Values match the classic node builder so that
//!   identical input produces identical trees
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
