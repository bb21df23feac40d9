//! Runtime diagnostics and progress tracking.
//!
//! - [`MassBalance`]: sediment mass budget
//! - [`ProgressReporter`]: periodic progress logging

mod mass_balance;
mod progress;

pub use mass_balance::MassBalance;
pub use progress::ProgressReporter;
