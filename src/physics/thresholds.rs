//! Numerical thresholds guarding the predictor-corrector scheme.

use serde::{Deserialize, Serialize};

/// Minimum flow thickness (m) below which a node is treated as dry.
pub const HMIN: f64 = 1.0e-5;

/// Thresholds for dry-node handling and blow-up detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Thickness below which friction, erosion and deposition are skipped (m).
    pub h_min: f64,
    /// Thicknesses in `(0, h_tiny)` abort the velocity predictor (m).
    pub h_tiny: f64,
    /// Velocity magnitude below which face values use pure upwinding (m/s).
    pub u_min: f64,
    /// Hard upper limit on velocity magnitude (m/s).
    pub u_max: f64,
    /// Treat a negative corrected velocity as a step failure instead of a
    /// logged anomaly.
    pub reject_backflow: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            h_min: HMIN,
            h_tiny: 1.0e-12,
            u_min: HMIN,
            u_max: 100.0,
            reject_backflow: false,
        }
    }
}

impl Thresholds {
    /// Set the dry-node thickness.
    pub fn with_h_min(mut self, h_min: f64) -> Self {
        self.h_min = h_min;
        self
    }

    /// Set the out-of-band thickness bound.
    pub fn with_h_tiny(mut self, h_tiny: f64) -> Self {
        self.h_tiny = h_tiny;
        self
    }

    /// Set the hard velocity limit.
    pub fn with_u_max(mut self, u_max: f64) -> Self {
        self.u_max = u_max;
        self
    }

    /// Fail the step on any negative corrected velocity.
    pub fn with_reject_backflow(mut self, reject: bool) -> Self {
        self.reject_backflow = reject;
        self
    }

    /// True if `h` is positive but too small to evaluate slope terms.
    #[inline]
    pub fn is_out_of_band(&self, h: f64) -> bool {
        h > 0.0 && h < self.h_tiny
    }

    /// True if the node carries no flow.
    #[inline]
    pub fn is_dry(&self, h: f64) -> bool {
        h < self.h_min
    }
}
