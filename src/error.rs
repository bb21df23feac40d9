//! Error types for the turbidity-current solver.
//!
//! Two kinds of failure are distinguished:
//! - [`SakuraError`]: precondition failures detected at the public entry
//!   point, before any state is allocated.
//! - [`StepFailure`]: numerical failures inside one iteration. These never
//!   reach the caller as errors; the driver switches to fallback deposition
//!   and reports `success = false` in the run output.

use thiserror::Error;

/// Input validation errors surfaced by [`run_sakura`](crate::run_sakura)
/// and the grid-state constructors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SakuraError {
    /// Time step must be strictly positive.
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f64),

    /// At least one grain class is required.
    #[error("at least one grain class is required")]
    NoGrains,

    /// Flood record field out of range.
    #[error("flood record field `{field}` is out of range, got {value}")]
    InvalidFlood {
        /// Name of the offending field
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// Number of grain fractions does not match the number of grain classes.
    #[error("expected {expected} grain fractions, got {found}")]
    GrainMismatch {
        /// Number of sediment classes
        expected: usize,
        /// Number of fractions supplied
        found: usize,
    },

    /// Grain fractions must be non-negative and sum to one.
    #[error("grain fractions must be non-negative and sum to 1, sum is {0}")]
    InvalidFractions(f64),

    /// The grid needs enough nodes for the five-point stencils.
    #[error("grid needs at least {min} nodes, got {len}")]
    GridTooShort {
        /// Minimum number of nodes
        min: usize,
        /// Number of nodes supplied
        len: usize,
    },

    /// Node positions must be strictly increasing.
    #[error("node spacing must be positive, found dx = {dx} at node {node}")]
    NonIncreasingGrid {
        /// Index of the node whose right spacing is not positive
        node: usize,
        /// Offending spacing
        dx: f64,
    },

    /// Interior array length does not match the grid.
    #[error("expected {expected} values for `{field}`, got {found}")]
    LengthMismatch {
        /// Field being set
        field: &'static str,
        /// Grid length
        expected: usize,
        /// Values supplied
        found: usize,
    },

    /// Channel widths must be strictly positive.
    #[error("channel width must be positive, found {width} at node {node}")]
    InvalidWidth {
        /// Node index
        node: usize,
        /// Offending width
        width: f64,
    },

    /// Flow constant must be positive and finite.
    #[error("flow constant `{field}` must be positive, got {value}")]
    InvalidConstant {
        /// Name of the offending constant
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// Sediment class parameters are not physical.
    #[error("invalid sediment class {grain}: {reason}")]
    InvalidSediment {
        /// Grain class index
        grain: usize,
        /// Description of the violated constraint
        reason: &'static str,
    },
}

/// Numerical failure inside one iteration of the predictor-corrector loop.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StepFailure {
    /// A thickness in `(0, h_tiny)` where slope terms cannot be evaluated.
    #[error("thickness {h:.3e} at node {node} is out of band")]
    TinyThickness {
        /// Node index
        node: isize,
        /// Offending thickness
        h: f64,
    },

    /// Velocity magnitude above the hard limit.
    #[error("velocity {u:.3e} m/s at node {node} exceeds limit {limit}")]
    VelocityOutOfRange {
        /// Node index
        node: isize,
        /// Offending velocity
        u: f64,
        /// Configured limit
        limit: f64,
    },

    /// Velocity reversed (negative) at a face.
    #[error("negative velocity {u:.3e} m/s at node {node}")]
    NegativeVelocity {
        /// Node index
        node: isize,
        /// Offending velocity
        u: f64,
    },

    /// Non-finite value produced by the update.
    #[error("non-finite {field} at node {node}")]
    NonFinite {
        /// Field name
        field: &'static str,
        /// Node index
        node: isize,
    },
}

/// Result alias for entry-point operations.
pub type Result<T> = std::result::Result<T, SakuraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = SakuraError::InvalidFlood {
            field: "velocity",
            value: -1.0,
        };
        assert_eq!(
            e.to_string(),
            "flood record field `velocity` is out of range, got -1"
        );

        let e = SakuraError::GrainMismatch {
            expected: 2,
            found: 3,
        };
        assert!(e.to_string().contains("expected 2"));
    }

    #[test]
    fn test_step_failure_display() {
        let f = StepFailure::VelocityOutOfRange {
            node: 4,
            u: 250.0,
            limit: 100.0,
        };
        let msg = f.to_string();
        assert!(msg.contains("node 4"));
        assert!(msg.contains("100"));
    }
}
