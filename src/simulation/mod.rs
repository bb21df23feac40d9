//! Run entry point.
//!
//! Ties together the flow state, the predictor-corrector sub-steps, sediment
//! exchange and the seabed store:
//!
//! ```ignore
//! use sakura::{FloodRecord, FlowConstants, PlanarBed, RunConfig, SedimentClass, run_sakura};
//!
//! let config = RunConfig::uniform(500, 10.0, 200.0, 1.0);
//! let flood = FloodRecord::new(1.0, 0.01, 3.0, 3600.0, vec![1.0]);
//! let sediment = [SedimentClass::sand(0.002)];
//! let mut bed = PlanarBed::sloping(-20.0, -0.01, 1);
//!
//! let out = run_sakura(&config, &flood, &sediment, &FlowConstants::default(), &mut bed)?;
//! println!("{}", out.mass_balance.detailed());
//! ```

mod config;
mod runner;

pub use config::{FloodRecord, RunConfig};
pub use runner::{RunState, SakuraOutput, StepView, run_sakura, run_sakura_with_callback};
