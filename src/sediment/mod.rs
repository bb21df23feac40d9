//! Sediment classes and bed exchange.

mod class;
mod exchange;

pub use class::SedimentClass;
pub use exchange::{SedimentExchange, erosion_depth, settling_rate};
