//! Grid state for the layer-averaged flow.
//!
//! - [`FlowArray`]: ghost-padded arrays of position, width, thickness,
//!   velocity and per-grain concentration
//! - [`BoundaryNode`]: inflow/outflow values written into ghost cells

mod boundary;
mod flow_array;

pub use boundary::BoundaryNode;
pub use flow_array::{FlowArray, GHOST};
