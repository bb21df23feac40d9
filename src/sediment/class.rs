//! Grain-class definitions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SakuraError};

/// Physical properties of one grain-size class.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SedimentClass {
    /// Grain (solid) density ρ_g (kg/m³)
    pub rho_grain: f64,
    /// Bulk density of the deposit ρ_d (kg/m³)
    pub rho_deposit: f64,
    /// Settling velocity w_s (m/s)
    pub settling_velocity: f64,
}

impl SedimentClass {
    /// Create a new grain class.
    pub fn new(rho_grain: f64, rho_deposit: f64, settling_velocity: f64) -> Self {
        Self {
            rho_grain,
            rho_deposit,
            settling_velocity,
        }
    }

    /// Quartz sand with a typical deposit bulk density.
    pub fn sand(settling_velocity: f64) -> Self {
        Self::new(2650.0, 1850.0, settling_velocity)
    }

    /// Mud (silt and clay) deposit.
    pub fn mud(settling_velocity: f64) -> Self {
        Self::new(2650.0, 1400.0, settling_velocity)
    }

    /// Void fraction of the deposit.
    ///
    /// p = (ρ_g − ρ_d) / (ρ_g − ρ_w)
    #[inline]
    pub fn porosity(&self, rho_water: f64) -> f64 {
        (self.rho_grain - self.rho_deposit) / (self.rho_grain - rho_water)
    }

    /// Solid fraction of a unit of deposit, `1 − p`.
    #[inline]
    pub fn solid_fraction(&self, rho_water: f64) -> f64 {
        1.0 - self.porosity(rho_water)
    }

    /// Submerged specific gravity R = (ρ_g − ρ_w) / ρ_w.
    #[inline]
    pub fn reduced_gravity(&self, rho_water: f64) -> f64 {
        (self.rho_grain - rho_water) / rho_water
    }

    /// Check the class is physical against the given water density.
    pub fn validate(&self, grain: usize, rho_water: f64) -> Result<()> {
        if !(self.settling_velocity > 0.0) {
            return Err(SakuraError::InvalidSediment {
                grain,
                reason: "settling velocity must be positive",
            });
        }
        if !(self.rho_grain > rho_water) {
            return Err(SakuraError::InvalidSediment {
                grain,
                reason: "grain density must exceed water density",
            });
        }
        if !(self.rho_deposit > rho_water && self.rho_deposit <= self.rho_grain) {
            return Err(SakuraError::InvalidSediment {
                grain,
                reason: "deposit density must lie between water and grain density",
            });
        }
        Ok(())
    }
}
