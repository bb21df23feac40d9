//! Planar sea floor with an unlimited sediment supply.

use super::traits::BedArchitecture;

/// Sea floor `z(x) = z0 + gradient · x` with a fixed grain composition.
///
/// Erosion always finds the requested volume and deposition is always
/// accepted. A frozen bed refuses every exchange, which isolates the
/// advection part of the solver.
#[derive(Clone, Debug)]
pub struct PlanarBed {
    z0: f64,
    gradient: f64,
    fractions: Vec<f64>,
    frozen: bool,
    added: Vec<f64>,
    removed: Vec<f64>,
}

impl PlanarBed {
    /// Flat bed at elevation `z0` with an even grain mix.
    pub fn flat(z0: f64, n_grain: usize) -> Self {
        Self::sloping(z0, 0.0, n_grain)
    }

    /// Bed with constant gradient (negative deepens seaward).
    pub fn sloping(z0: f64, gradient: f64, n_grain: usize) -> Self {
        let n = n_grain.max(1);
        Self {
            z0,
            gradient,
            fractions: vec![1.0 / n as f64; n_grain],
            frozen: false,
            added: vec![0.0; n_grain],
            removed: vec![0.0; n_grain],
        }
    }

    /// Set the bed grain fractions.
    pub fn with_fractions(mut self, fractions: Vec<f64>) -> Self {
        assert_eq!(fractions.len(), self.fractions.len(), "grain count mismatch");
        self.fractions = fractions;
        self
    }

    /// Refuse all erosion and deposition.
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// Total bulk volume added per grain.
    pub fn added(&self) -> &[f64] {
        &self.added
    }

    /// Total bulk volume removed per grain.
    pub fn removed(&self) -> &[f64] {
        &self.removed
    }
}

impl BedArchitecture for PlanarBed {
    fn composition_at(&self, _x: f64, requested_volume: f64, fractions: &mut [f64]) -> f64 {
        fractions.copy_from_slice(&self.fractions);
        if self.frozen { 0.0 } else { requested_volume }
    }

    fn remove(&mut self, _x: f64, grain: usize, volume: f64) -> f64 {
        if self.frozen {
            return 0.0;
        }
        self.removed[grain] += volume;
        volume
    }

    fn add(&mut self, _x: f64, grain: usize, volume: f64) -> f64 {
        if self.frozen {
            return 0.0;
        }
        self.added[grain] += volume;
        volume
    }

    fn depth_at(&self, x: f64) -> f64 {
        self.z0 + self.gradient * x
    }

    fn name(&self) -> &'static str {
        if self.frozen { "planar (frozen)" } else { "planar" }
    }
}
