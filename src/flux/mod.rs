//! Face interpolation and advection operators.
//!
//! - [`tvd_left`], [`tvd_right`]: minmod-limited upwind face values
//! - [`dfdt`]: width-weighted finite-volume divergence with a source term

mod advection;
mod tvd;

pub use advection::{AdvectionStencil, cell_stencil, dfdt};
pub use tvd::{minmod, tvd_left, tvd_right};
