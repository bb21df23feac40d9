//! Seabed stores exchanged with the flow.
//!
//! The solver only sees the [`BedArchitecture`] trait. Two stores are
//! provided: [`PlanarBed`], an unlimited planar bed, and [`LayeredSeabed`],
//! a finite per-node store with accommodation limits.

mod layered;
mod planar;
mod traits;

pub use layered::LayeredSeabed;
pub use planar::PlanarBed;
pub use traits::BedArchitecture;
