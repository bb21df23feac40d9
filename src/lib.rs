//! # sakura
//!
//! A one-dimensional solver for hyperpycnal flows and turbidity currents.
//!
//! The current is modelled as a depth-averaged layer of sediment-laden water
//! flowing along the sea floor. Velocity, thickness and per-grain suspended
//! concentration are advanced on a staggered grid with a predictor-corrector
//! scheme, while sediment is exchanged with an external seabed store through
//! erosion and deposition.
//!
//! This crate provides:
//! - Ghost-padded flow state (positions, widths, thickness, velocity,
//!   concentrations, exchange tallies)
//! - TVD face interpolation and a width-weighted advection operator
//! - Momentum, slope and entrainment source terms
//! - Per-grain erosion and deposition physics
//! - Flow-head tracking and the predictor-corrector driver
//! - A seabed interface with planar and layered in-memory stores
//! - Sediment mass-balance diagnostics

pub mod bed;
pub mod error;
pub mod flux;
pub mod physics;
pub mod sediment;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;

pub use bed::{BedArchitecture, LayeredSeabed, PlanarBed};
pub use error::{Result, SakuraError, StepFailure};
pub use flux::{AdvectionStencil, dfdt, tvd_left, tvd_right};
pub use physics::{FlowConstants, HMIN, Thresholds};
pub use sediment::{SedimentClass, SedimentExchange, erosion_depth};
pub use simulation::{
    FloodRecord, RunConfig, RunState, SakuraOutput, StepView, run_sakura, run_sakura_with_callback,
};
pub use solver::{BoundaryNode, FlowArray, MassBalance};
pub use source::{FrictionScheme, MomentumStencil, dudt, entrainment_rate, sin_slope};
pub use time::{HeadCelerity, HeadTracker, StepStats};
