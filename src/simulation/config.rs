//! Run configuration and flood forcing.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SakuraError};
use crate::time::HeadCelerity;

/// Tolerance on the sum of grain fractions.
const FRACTION_TOLERANCE: f64 = 1.0e-6;

/// River flood feeding the current at the upstream boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloodRecord {
    /// Inflow velocity (m/s)
    pub velocity: f64,
    /// Volumetric sediment concentration of the inflow
    pub concentration: f64,
    /// Inflow thickness (m)
    pub depth: f64,
    /// Sediment supply duration (s)
    pub duration: f64,
    /// Fraction of the load in each grain class (sums to 1)
    pub fractions: Vec<f64>,
}

impl FloodRecord {
    /// Create a flood record.
    pub fn new(
        velocity: f64,
        concentration: f64,
        depth: f64,
        duration: f64,
        fractions: Vec<f64>,
    ) -> Self {
        Self {
            velocity,
            concentration,
            depth,
            duration,
            fractions,
        }
    }

    /// Check the record against the number of grain classes.
    pub fn validate(&self, n_grain: usize) -> Result<()> {
        for (field, value) in [
            ("velocity", self.velocity),
            ("concentration", self.concentration),
            ("depth", self.depth),
            ("duration", self.duration),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SakuraError::InvalidFlood { field, value });
            }
        }
        if self.concentration >= 1.0 {
            return Err(SakuraError::InvalidFlood {
                field: "concentration",
                value: self.concentration,
            });
        }
        if self.fractions.len() != n_grain {
            return Err(SakuraError::GrainMismatch {
                expected: n_grain,
                found: self.fractions.len(),
            });
        }
        let sum: f64 = self.fractions.iter().sum();
        if (sum - 1.0).abs() > FRACTION_TOLERANCE || self.fractions.iter().any(|&f| f < 0.0) {
            return Err(SakuraError::InvalidFractions(sum));
        }
        Ok(())
    }
}

/// Grid, time step and driver options of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Node positions along the channel (m)
    pub x: Vec<f64>,
    /// Channel width at each node (m)
    pub width: Vec<f64>,
    /// Time step (s)
    pub dt: f64,
    /// Head celerity rule
    #[serde(default)]
    pub head_celerity: HeadCelerity,
    /// Log progress every this many percent of the run (0 disables)
    #[serde(default)]
    pub report_interval_pct: u32,
}

impl RunConfig {
    /// Configuration from explicit node positions and widths.
    pub fn new(x: Vec<f64>, width: Vec<f64>, dt: f64) -> Self {
        Self {
            x,
            width,
            dt,
            head_celerity: HeadCelerity::default(),
            report_interval_pct: 0,
        }
    }

    /// Evenly spaced channel of constant width starting at x = 0.
    pub fn uniform(len: usize, dx: f64, width: f64, dt: f64) -> Self {
        Self::new((0..len).map(|i| i as f64 * dx).collect(), vec![width; len], dt)
    }

    /// Set the head celerity rule.
    pub fn with_head_celerity(mut self, rule: HeadCelerity) -> Self {
        self.head_celerity = rule;
        self
    }

    /// Log progress every `pct` percent of the run.
    pub fn with_progress(mut self, pct: u32) -> Self {
        self.report_interval_pct = pct;
        self
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if the grid has no nodes.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Check the time step and grid geometry.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SakuraError::InvalidTimeStep(self.dt));
        }
        // Two interior cells plus the outflow cell
        if self.x.len() < 3 {
            return Err(SakuraError::GridTooShort {
                min: 3,
                len: self.x.len(),
            });
        }
        if self.width.len() != self.x.len() {
            return Err(SakuraError::LengthMismatch {
                field: "width",
                expected: self.x.len(),
                found: self.width.len(),
            });
        }
        for (node, pair) in self.x.windows(2).enumerate() {
            let dx = pair[1] - pair[0];
            if !(dx > 0.0) {
                return Err(SakuraError::NonIncreasingGrid { node, dx });
            }
        }
        if let Some((node, &width)) = self.width.iter().enumerate().find(|&(_, &w)| !(w > 0.0)) {
            return Err(SakuraError::InvalidWidth { node, width });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flood_validation() {
        let flood = FloodRecord::new(1.0, 0.01, 3.0, 3600.0, vec![0.3, 0.7]);
        assert!(flood.validate(2).is_ok());
        assert!(matches!(
            flood.validate(3),
            Err(SakuraError::GrainMismatch { expected: 3, found: 2 })
        ));

        let bad = FloodRecord {
            depth: 0.0,
            ..flood.clone()
        };
        assert!(matches!(bad.validate(2), Err(SakuraError::InvalidFlood { field: "depth", .. })));

        let bad = FloodRecord {
            concentration: 1.2,
            ..flood.clone()
        };
        assert!(matches!(
            bad.validate(2),
            Err(SakuraError::InvalidFlood { field: "concentration", .. })
        ));

        let bad = FloodRecord {
            fractions: vec![0.5, 0.6],
            ..flood
        };
        assert!(matches!(bad.validate(2), Err(SakuraError::InvalidFractions(_))));
    }

    #[test]
    fn test_run_config_validation() {
        let config = RunConfig::uniform(10, 5.0, 20.0, 1.0);
        assert_eq!(config.len(), 10);
        assert_eq!(config.x[9], 45.0);
        assert!(config.validate().is_ok());

        let bad = RunConfig { dt: 0.0, ..config.clone() };
        assert!(matches!(bad.validate(), Err(SakuraError::InvalidTimeStep(_))));

        let short = RunConfig::uniform(2, 1.0, 1.0, 1.0);
        assert!(matches!(short.validate(), Err(SakuraError::GridTooShort { .. })));

        let bad = RunConfig {
            width: vec![1.0; 3],
            ..config.clone()
        };
        assert!(matches!(bad.validate(), Err(SakuraError::LengthMismatch { field: "width", .. })));

        let mut bad = config.clone();
        bad.x[4] = bad.x[3];
        assert!(matches!(bad.validate(), Err(SakuraError::NonIncreasingGrid { node: 3, .. })));

        let mut bad = config;
        bad.width[7] = -1.0;
        assert!(matches!(bad.validate(), Err(SakuraError::InvalidWidth { node: 7, .. })));
    }
}
