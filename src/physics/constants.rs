//! Flow constants for a turbidity-current run.
//!
//! All physical constants that would otherwise be globals (gravity, sea
//! water density) are carried here and passed explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SakuraError};
use crate::source::FrictionScheme;

use super::thresholds::Thresholds;

/// Seconds per day; the erosion law is calibrated per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Pascals per kilopascal.
const PA_PER_KPA: f64 = 1.0e3;

/// Constants read by the solver during stepping.
///
/// Bed shear-strength parameters `sua` and `sub` are given in kPa and
/// converted with [`FlowConstants::to_model_units`] at run entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConstants {
    /// Entrainment coefficient numerator
    pub e_a: f64,
    /// Entrainment coefficient offset
    pub e_b: f64,
    /// Bed shear strength rate (kPa·day/m before scaling)
    pub sua: f64,
    /// Bed shear strength at the surface (kPa before scaling)
    pub sub: f64,
    /// Bed drag coefficient (dimensionless)
    pub c_drag: f64,
    /// Kinematic viscosity of water (m²/s)
    pub mu_water: f64,
    /// Ambient sea water density (kg/m³)
    pub rho_sea_water: f64,
    /// River water density (kg/m³)
    pub rho_river_water: f64,
    /// Distance from the first node before deposition may occur (m)
    pub dep_start: f64,
    /// Ratio of near-bed to depth-averaged concentration
    pub near_bed_ratio: f64,
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Friction treatment in the velocity predictor and corrector
    pub friction: FrictionScheme,
    /// Dry-node and blow-up thresholds
    pub thresholds: Thresholds,
}

impl Default for FlowConstants {
    fn default() -> Self {
        Self {
            e_a: 0.00153,
            e_b: 0.0204,
            sua: 30.0,
            sub: 0.1,
            c_drag: 0.004,
            mu_water: 1.3e-6,
            rho_sea_water: 1028.0,
            rho_river_water: 1000.0,
            dep_start: 0.0,
            near_bed_ratio: 1.5,
            g: 9.81,
            friction: FrictionScheme::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl FlowConstants {
    /// Set the entrainment coefficients.
    pub fn with_entrainment(mut self, e_a: f64, e_b: f64) -> Self {
        self.e_a = e_a;
        self.e_b = e_b;
        self
    }

    /// Set the bed shear-strength parameters (kPa).
    pub fn with_bed_strength(mut self, sua: f64, sub: f64) -> Self {
        self.sua = sua;
        self.sub = sub;
        self
    }

    /// Set the drag coefficient.
    pub fn with_drag(mut self, c_drag: f64) -> Self {
        self.c_drag = c_drag;
        self
    }

    /// Set the friction treatment of the velocity updates.
    pub fn with_friction(mut self, friction: FrictionScheme) -> Self {
        self.friction = friction;
        self
    }

    /// Set the deposition start offset (m).
    pub fn with_dep_start(mut self, dep_start: f64) -> Self {
        self.dep_start = dep_start;
        self
    }

    /// Set the numerical thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check the constants that divide or scale the source terms.
    ///
    /// `sua` divides the excess bed shear, so zero would make erosion
    /// unbounded.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("sua", self.sua),
            ("c_drag", self.c_drag),
            ("g", self.g),
            ("rho_sea_water", self.rho_sea_water),
            ("rho_river_water", self.rho_river_water),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SakuraError::InvalidConstant { field, value });
            }
        }
        for (field, value) in [
            ("sub", self.sub),
            ("e_a", self.e_a),
            ("mu_water", self.mu_water),
            ("near_bed_ratio", self.near_bed_ratio),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(SakuraError::InvalidConstant { field, value });
            }
        }
        Ok(())
    }

    /// Copy with `sua` and `sub` scaled from kPa to Pa.
    ///
    /// The caller's constants are left untouched, so no reverse
    /// adjustment is needed when the run finishes.
    pub fn to_model_units(&self) -> Self {
        Self {
            sua: self.sua * PA_PER_KPA,
            sub: self.sub * PA_PER_KPA,
            ..self.clone()
        }
    }

    /// Density of a flow carrying the given volumetric grain concentrations.
    ///
    /// ρ = ρ_river (1 − Σc) + Σ c_n ρ_n
    pub fn flow_density(&self, c_grain: &[f64], rho_grain: impl Iterator<Item = f64>) -> f64 {
        let mut c_total = 0.0;
        let mut rho = 0.0;
        for (&c, rho_n) in c_grain.iter().zip(rho_grain) {
            c_total += c;
            rho += c * rho_n;
        }
        rho + self.rho_river_water * (1.0 - c_total)
    }
}
