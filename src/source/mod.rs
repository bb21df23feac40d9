//! Source terms of the depth-averaged turbidity-current equations.
//!
//! - [`momentum`]: gravity, pressure, bed friction and viscous smoothing
//! - [`slope`]: bed slope sampled from the seabed store
//! - [`entrainment`]: ambient water entrainment closure

pub mod entrainment;
pub mod momentum;
pub mod slope;

pub use entrainment::{entrainment_coefficient, entrainment_rate, richardson};
pub use momentum::{FrictionScheme, MomentumStencil, buoyancy, dudt, face_stencil};
pub use slope::{sin_slope, slope_profile};
