//! Sediment mass budget of a run.
//!
//! Every kilogram of sediment that enters the domain through the inflow
//! face or is eroded from the bed must be in suspension, on the bed, or
//! gone through the outflow face:
//!
//! in + eroded = suspended + deposited + lost

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sediment::SedimentClass;
use crate::solver::FlowArray;

/// Budgets smaller than this are treated as empty.
const EMPTY_BUDGET: f64 = 1.0e-14;

/// Sediment mass budget (kg).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    /// Mass supplied through the inflow face
    pub mass_in: f64,
    /// Mass eroded from the bed
    pub eroded: f64,
    /// Mass deposited on the bed
    pub deposited: f64,
    /// Mass held in suspension
    pub suspended: f64,
    /// Mass carried out through the outflow face
    pub lost: f64,
}

impl MassBalance {
    /// Budget of `state` given the boundary fluxes accumulated by the driver.
    pub fn from_state(
        state: &FlowArray,
        sediment: &[SedimentClass],
        mass_in: f64,
        lost: f64,
    ) -> Self {
        Self {
            mass_in,
            eroded: state.mass_eroded(sediment),
            deposited: state.mass_deposited(sediment),
            suspended: state.mass_in_suspension(sediment),
            lost,
        }
    }

    /// Total mass that entered the flow.
    pub fn sources(&self) -> f64 {
        self.mass_in + self.eroded
    }

    /// Total mass accounted for.
    pub fn sinks(&self) -> f64 {
        self.suspended + self.deposited + self.lost
    }

    /// Unaccounted mass, `sources − sinks`.
    pub fn residual(&self) -> f64 {
        self.sources() - self.sinks()
    }

    /// Residual relative to the sources; zero for an empty budget.
    pub fn relative_error(&self) -> f64 {
        let sources = self.sources();
        if sources.abs() > EMPTY_BUDGET {
            self.residual().abs() / sources.abs()
        } else {
            0.0
        }
    }

    /// True if the relative error is within `tolerance`.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        self.relative_error() <= tolerance
    }

    /// Format as a compact single line for logging.
    pub fn summary_line(&self) -> String {
        format!(
            "in={:.4e} ero={:.4e} dep={:.4e} susp={:.4e} lost={:.4e} err={:.2e}",
            self.mass_in,
            self.eroded,
            self.deposited,
            self.suspended,
            self.lost,
            self.relative_error()
        )
    }

    /// Format as detailed multi-line output.
    pub fn detailed(&self) -> String {
        format!(
            "Sources:\n  Inflow:     {:.6e} kg\n  Eroded:     {:.6e} kg\n\
             Sinks:\n  Suspended:  {:.6e} kg\n  Deposited:  {:.6e} kg\n  Outflow:    {:.6e} kg\n\
             Balance:\n  Residual:   {:.6e} kg ({:.4}%)",
            self.mass_in,
            self.eroded,
            self.suspended,
            self.deposited,
            self.lost,
            self.residual(),
            self.relative_error() * 100.0
        )
    }
}

impl fmt::Display for MassBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_line())
    }
}
