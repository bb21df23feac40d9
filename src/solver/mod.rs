//! Flow state and run diagnostics.
//!
//! # Submodules
//!
//! - [`state`]: ghost-padded flow arrays and boundary nodes
//! - [`diagnostics`]: mass budget and progress reporting

pub mod diagnostics;
pub mod state;

pub use diagnostics::{MassBalance, ProgressReporter};
pub use state::{BoundaryNode, FlowArray, GHOST};
