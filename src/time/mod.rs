//! Time stepping of the turbidity current.
//!
//! - [`predictor_corrector`]: the sub-steps of one iteration
//! - [`head`]: flow-head tracking and celerity rules

pub mod head;
pub mod predictor_corrector;

pub use head::{HeadCelerity, HeadTracker};
pub use predictor_corrector::{
    StepContext, StepStats, advance_concentration, advance_thickness, average_midpoint,
    correct_velocity, last_active_cell, last_active_face, outflow_node, predict_mid_velocity,
};
