//! Physical constants and numerical thresholds.
//!
//! - [`FlowConstants`]: entrainment, bed strength, drag and fluid properties
//! - [`Thresholds`]: dry-node and blow-up limits used by every sub-step

pub mod constants;
pub mod thresholds;

pub use constants::{FlowConstants, SECONDS_PER_DAY};
pub use thresholds::{HMIN, Thresholds};
