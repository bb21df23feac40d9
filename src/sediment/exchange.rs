//! Erosion and deposition between the flow and the seabed.
//!
//! Erosion follows an excess-shear law calibrated per day:
//!
//! Δz = max(0, (C_d ρ_flow u² − sub) / sua) · dt / 86400
//!
//! Deposition settles each grain class at `K w_s c_n`, where `K` is the
//! near-bed to depth-averaged concentration ratio. A thin flow that would
//! settle out within one step drops its whole load instead.
//!
//! Bed volumes are bulk; the flow carries solids. Every exchange is
//! converted with the grain's solid fraction `1 − p` and tallied on the
//! flow as a solid volume.

use crate::bed::BedArchitecture;
use crate::physics::{FlowConstants, SECONDS_PER_DAY};
use crate::solver::FlowArray;

use super::class::SedimentClass;

/// Bed lowering in one step from excess shear (m).
///
/// `k` must be in model units (see [`FlowConstants::to_model_units`]).
pub fn erosion_depth(u: f64, rho_flow: f64, k: &FlowConstants, dt: f64) -> f64 {
    let tau = k.c_drag * rho_flow * u * u;
    ((tau - k.sub) / k.sua).max(0.0) * dt / SECONDS_PER_DAY
}

/// Per-grain settling flux `K w_s c_n` (m/s), limited to the full load
/// of a flow thinner than one step of settling.
pub fn settling_rate(h: f64, c: f64, settling_velocity: f64, near_bed_ratio: f64, dt: f64) -> f64 {
    let fall = settling_velocity * near_bed_ratio;
    if h <= fall * dt { h / dt * c } else { fall * c }
}

/// Sediment exchange at the nodes of a flow array.
pub struct SedimentExchange<'a> {
    sediment: &'a [SedimentClass],
    constants: &'a FlowConstants,
    /// Deposition is allowed from this position onward
    deposition_start: f64,
    fractions: Vec<f64>,
}

impl<'a> SedimentExchange<'a> {
    /// Create an exchange operator.
    ///
    /// * `x0` - position of the first node; deposition starts at
    ///   `x0 + dep_start`
    pub fn new(sediment: &'a [SedimentClass], constants: &'a FlowConstants, x0: f64) -> Self {
        Self {
            sediment,
            constants,
            deposition_start: x0 + constants.dep_start,
            fractions: vec![0.0; sediment.len()],
        }
    }

    /// Water density used for deposit porosity.
    #[inline]
    fn rho_water(&self) -> f64 {
        self.constants.rho_sea_water
    }

    /// Erode the bed under cell `i` into the flow.
    ///
    /// * `u` - cell-averaged velocity driving the bed shear
    ///
    /// Returns the solid volume taken into suspension (m³).
    pub fn erode(
        &mut self,
        state: &mut FlowArray,
        i: isize,
        u: f64,
        dt: f64,
        bed: &mut dyn BedArchitecture,
    ) -> f64 {
        if !(dt > 0.0) || self.clear_if_dry(state, i) {
            return 0.0;
        }

        let h = state.h(i);
        let rho_flow = self
            .constants
            .flow_density(state.c_grain(i), self.sediment.iter().map(|s| s.rho_grain));
        let depth = erosion_depth(u, rho_flow, self.constants, dt);
        if depth <= 0.0 {
            return 0.0;
        }

        let x = state.x(i);
        let area = state.cell_area(i);
        let available = bed.composition_at(x, depth * area, &mut self.fractions);
        if available <= 0.0 {
            return 0.0;
        }

        let rho_water = self.rho_water();
        let mut total = 0.0;
        for (n, class) in self.sediment.iter().enumerate() {
            let wanted = available * self.fractions[n];
            if wanted <= 0.0 {
                continue;
            }
            let removed = bed.remove(x, n, wanted);
            let solid = removed * class.solid_fraction(rho_water);
            state.c_grain_mut(i)[n] += solid / (h * area);
            state.eroded_mut(i)[n] += solid;
            total += solid;
        }
        state.sync_total_concentration(i);
        total
    }

    /// Settle suspended sediment of cell `i` onto the bed.
    ///
    /// Nothing settles upstream of the deposition start. Returns the solid
    /// volume accepted by the bed (m³).
    pub fn deposit(
        &self,
        state: &mut FlowArray,
        i: isize,
        dt: f64,
        bed: &mut dyn BedArchitecture,
    ) -> f64 {
        if !(dt > 0.0) || self.clear_if_dry(state, i) || state.x(i) < self.deposition_start {
            return 0.0;
        }
        let k = self.constants;
        self.settle(state, i, bed, |h, c, class| {
            settling_rate(h, c, class.settling_velocity, k.near_bed_ratio, dt) * dt
        })
    }

    /// Drop the entire suspended load of every physical node.
    ///
    /// Used when a run aborts; ignores the deposition start. Returns the
    /// solid volume accepted by the bed (m³).
    pub fn deposit_all(&self, state: &mut FlowArray, bed: &mut dyn BedArchitecture) -> f64 {
        (0..state.len() as isize)
            .map(|i| self.settle(state, i, bed, |h, c, _| h * c))
            .sum()
    }

    /// Zero the suspended load of a cell thinner than `h_min`.
    ///
    /// Returns true if the cell is dry.
    fn clear_if_dry(&self, state: &mut FlowArray, i: isize) -> bool {
        if state.h(i) >= self.constants.thresholds.h_min {
            return false;
        }
        state.c_grain_mut(i).iter_mut().for_each(|c| *c = 0.0);
        state.set_c(i, 0.0);
        true
    }

    /// Move solid thickness `settled(h, c_n, class)` of each grain to the bed.
    fn settle<F>(
        &self,
        state: &mut FlowArray,
        i: isize,
        bed: &mut dyn BedArchitecture,
        settled: F,
    ) -> f64
    where
        F: Fn(f64, f64, &SedimentClass) -> f64,
    {
        let h = state.h(i);
        if !(h > 0.0) {
            return 0.0;
        }

        let x = state.x(i);
        let area = state.cell_area(i);
        let rho_water = self.rho_water();
        let mut total = 0.0;
        for (n, class) in self.sediment.iter().enumerate() {
            let c = state.c_grain(i)[n];
            if !(c > 0.0) {
                continue;
            }
            let solid = (settled(h, c, class) * area).min(c * h * area);
            let solid_fraction = class.solid_fraction(rho_water);
            let accepted = bed.add(x, n, solid / solid_fraction) * solid_fraction;

            let c_new = (c - accepted / (h * area)).max(0.0);
            state.c_grain_mut(i)[n] = c_new;
            state.deposited_mut(i)[n] += accepted;
            total += accepted;
        }
        state.sync_total_concentration(i);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::{LayeredSeabed, PlanarBed};
    use approx::assert_relative_eq;

    fn flow(len: usize, n_grain: usize) -> FlowArray {
        let mut a = FlowArray::new(len, n_grain);
        let x: Vec<f64> = (0..len).map(|i| i as f64 * 10.0).collect();
        a.set_x(&x).unwrap();
        a.set_width(&vec![5.0; len]).unwrap();
        a
    }

    #[test]
    fn test_erosion_depth_below_threshold() {
        let k = FlowConstants::default().to_model_units();
        assert_eq!(erosion_depth(0.0, 1000.0, &k, 10.0), 0.0);
        // τ = 0.004 * 1000 * 4 = 16 Pa < 100 Pa
        assert_eq!(erosion_depth(2.0, 1000.0, &k, 10.0), 0.0);
    }

    #[test]
    fn test_erosion_depth_excess_shear() {
        let k = FlowConstants::default().to_model_units();
        // τ = 0.004 * 1000 * 100 = 400 Pa
        let expected = (400.0 - 100.0) / 30_000.0 * 86_400.0 / SECONDS_PER_DAY;
        assert_relative_eq!(erosion_depth(10.0, 1000.0, &k, 86_400.0), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_settling_rate_regimes() {
        // Thick flow: K w_s c
        assert_relative_eq!(settling_rate(10.0, 0.01, 0.02, 1.5, 1.0), 0.03 * 0.01);
        // Thin flow: everything settles in one step
        assert_relative_eq!(settling_rate(0.01, 0.01, 0.02, 1.5, 1.0), 0.01 * 0.01);
    }

    #[test]
    fn test_erode_adds_suspended_sediment() {
        let sed = [SedimentClass::sand(0.01), SedimentClass::mud(0.001)];
        let k = FlowConstants::default().with_bed_strength(0.001, 0.0).to_model_units();
        let mut state = flow(4, 2);
        state.set_h(1, 2.0);
        let mut bed = PlanarBed::flat(-100.0, 2);

        let mut exchange = SedimentExchange::new(&sed, &k, 0.0);
        assert_eq!(exchange.erode(&mut state, 1, 5.0, 0.0, &mut bed), 0.0);
        let eroded = exchange.erode(&mut state, 1, 5.0, 1.0, &mut bed);
        assert!(eroded > 0.0);

        let suspended: f64 = (0..2)
            .map(|n| state.c_grain(1)[n] * state.h(1) * state.cell_area(1))
            .sum();
        assert_relative_eq!(suspended, eroded, epsilon = 1e-12);
        assert_relative_eq!(state.eroded(1).iter().sum::<f64>(), eroded, epsilon = 1e-15);
        assert!(state.concentration_residual() < 1e-15);
        // Bed lost bulk volume in equal parts
        assert_relative_eq!(bed.removed()[0], bed.removed()[1]);
    }

    #[test]
    fn test_erode_takes_only_what_the_bed_holds() {
        let sed = [SedimentClass::sand(0.01)];
        let k = FlowConstants::default().with_bed_strength(0.001, 0.0).to_model_units();
        let mut state = flow(4, 1);
        state.set_h(1, 2.0);

        // 1 mm of sand over a 50 m² footprint
        let x = [0.0, 10.0, 20.0, 30.0];
        let mut bed =
            LayeredSeabed::new(&x, &[5.0; 4], &[-50.0; 4], 1).with_uniform_store(&[0.001]);
        let store = bed.volume(1, 0);
        assert_relative_eq!(store, 0.05);

        // τ = 100 Pa over 1 Pa/day for 10 s asks for about 0.58 m³
        let requested = erosion_depth(5.0, 1000.0, &k, 10.0) * state.cell_area(1);
        assert!(requested > 10.0 * store);

        let mut exchange = SedimentExchange::new(&sed, &k, 0.0);
        let eroded = exchange.erode(&mut state, 1, 5.0, 10.0, &mut bed);

        let solid_fraction = sed[0].solid_fraction(k.rho_sea_water);
        assert_relative_eq!(eroded, store * solid_fraction, epsilon = 1e-15);
        assert_eq!(bed.volume(1, 0), 0.0);
        assert_relative_eq!(bed.elevation(1), -50.001, epsilon = 1e-12);
        assert_relative_eq!(state.eroded(1)[0], eroded);
        let suspended = state.c_grain(1)[0] * 2.0 * state.cell_area(1);
        assert_relative_eq!(suspended, eroded, epsilon = 1e-15);

        // Nothing left to take
        assert_eq!(exchange.erode(&mut state, 1, 5.0, 10.0, &mut bed), 0.0);
    }

    #[test]
    fn test_dry_cell_is_cleared() {
        let sed = [SedimentClass::sand(0.01)];
        let k = FlowConstants::default().to_model_units();
        let mut state = flow(3, 1);
        state.set_h(1, 1e-7);
        state.c_grain_mut(1)[0] = 0.2;
        state.sync_total_concentration(1);
        let mut bed = PlanarBed::flat(-10.0, 1);
        let mut exchange = SedimentExchange::new(&sed, &k, 0.0);
        assert_eq!(exchange.erode(&mut state, 1, 50.0, 1.0, &mut bed), 0.0);
        assert_eq!(state.c(1), 0.0);
        assert_eq!(state.c_grain(1), &[0.0]);
    }

    #[test]
    fn test_deposit_conserves_solid() {
        let sed = [SedimentClass::sand(0.01)];
        let k = FlowConstants::default().to_model_units();
        let mut state = flow(4, 1);
        state.set_h(2, 3.0);
        state.c_grain_mut(2)[0] = 0.02;
        state.sync_total_concentration(2);
        let before = 0.02 * 3.0 * state.cell_area(2);

        let mut bed = PlanarBed::flat(-10.0, 1);
        let exchange = SedimentExchange::new(&sed, &k, 0.0);
        let deposited = exchange.deposit(&mut state, 2, 10.0, &mut bed);

        // K w_s c dt area = 1.5 * 0.01 * 0.02 * 10 * 50
        assert_relative_eq!(deposited, 0.15, epsilon = 1e-12);
        let after = state.c_grain(2)[0] * 3.0 * state.cell_area(2);
        assert_relative_eq!(before - after, deposited, epsilon = 1e-12);
        let solid_fraction = sed[0].solid_fraction(k.rho_sea_water);
        assert_relative_eq!(bed.added()[0] * solid_fraction, deposited, epsilon = 1e-12);
    }

    #[test]
    fn test_deposit_respects_start() {
        let sed = [SedimentClass::sand(0.01)];
        let k = FlowConstants::default().with_dep_start(15.0).to_model_units();
        let mut state = flow(4, 1);
        for i in 0..4 {
            state.set_h(i, 1.0);
            state.c_grain_mut(i)[0] = 0.01;
            state.sync_total_concentration(i);
        }
        let mut bed = PlanarBed::flat(-10.0, 1);
        let exchange = SedimentExchange::new(&sed, &k, 0.0);
        assert_eq!(exchange.deposit(&mut state, 1, 1.0, &mut bed), 0.0);
        assert!(exchange.deposit(&mut state, 2, 1.0, &mut bed) > 0.0);
    }

    #[test]
    fn test_deposit_capped_by_accommodation() {
        let sed = [SedimentClass::sand(0.01)];
        let k = FlowConstants::default().to_model_units();
        let mut state = flow(3, 1);
        state.set_h(0, 2.0);
        state.c_grain_mut(0)[0] = 0.1;
        state.sync_total_concentration(0);

        // Sea floor already at sea level: nothing can be added
        let x = [0.0, 10.0, 20.0];
        let mut bed = LayeredSeabed::new(&x, &[5.0; 3], &[0.0; 3], 1);
        let exchange = SedimentExchange::new(&sed, &k, 0.0);
        assert_eq!(exchange.deposit_all(&mut state, &mut bed), 0.0);
        assert_eq!(state.c_grain(0)[0], 0.1);
    }

    #[test]
    fn test_deposit_all_empties_flow() {
        let sed = [SedimentClass::sand(0.01), SedimentClass::mud(0.0001)];
        let k = FlowConstants::default().with_dep_start(1e6).to_model_units();
        let mut state = flow(5, 2);
        let mut expected = 0.0;
        for i in 0..5 {
            state.set_h(i, 1.0 + i as f64);
            state.c_grain_mut(i).copy_from_slice(&[0.01, 0.005]);
            state.sync_total_concentration(i);
            expected += 0.015 * state.h(i) * state.cell_area(i);
        }
        let mut bed = PlanarBed::flat(-10.0, 2);
        let exchange = SedimentExchange::new(&sed, &k, 0.0);
        let total = exchange.deposit_all(&mut state, &mut bed);
        assert_relative_eq!(total, expected, epsilon = 1e-12);
        for i in 0..5 {
            assert!(state.c(i).abs() < 1e-15);
        }
    }
}
