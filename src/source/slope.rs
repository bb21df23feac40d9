//! Bed slope sampled from the seabed store.

use crate::bed::BedArchitecture;
use crate::solver::FlowArray;

/// Sine of the downslope angle between two positions.
///
/// Positive when the sea floor deepens from `x_back` to `x`, so gravity
/// accelerates a dense flow in the positive direction.
#[inline]
pub fn sin_slope(bed: &dyn BedArchitecture, x_back: f64, x: f64) -> f64 {
    let dz = bed.depth_at(x) - bed.depth_at(x_back);
    -(dz / (x - x_back)).atan().sin()
}

/// Slope at every velocity face `0..len`.
///
/// Face `i` uses nodes `i - 1` and `i`; face 0 reaches into the upstream
/// ghost, whose position continues the first grid spacing.
pub fn slope_profile(bed: &dyn BedArchitecture, state: &FlowArray) -> Vec<f64> {
    (0..state.len() as isize)
        .map(|i| sin_slope(bed, state.x(i - 1), state.x(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::PlanarBed;

    #[test]
    fn test_flat_bed_has_no_slope() {
        let bed = PlanarBed::flat(-50.0, 1);
        assert_eq!(sin_slope(&bed, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_deepening_bed_is_positive() {
        // 1 m drop over 100 m
        let bed = PlanarBed::sloping(0.0, -0.01, 1);
        let s = sin_slope(&bed, 0.0, 100.0);
        assert!(s > 0.0);
        assert!((s - (0.01f64).atan().sin()).abs() < 1e-14);

        let rising = PlanarBed::sloping(0.0, 0.01, 1);
        assert!(sin_slope(&rising, 0.0, 100.0) < 0.0);
    }

    #[test]
    fn test_profile_covers_every_face() {
        let bed = PlanarBed::sloping(-1.0, -0.02, 1);
        let mut state = FlowArray::new(5, 1);
        state.set_x(&[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        let profile = slope_profile(&bed, &state);
        assert_eq!(profile.len(), 5);
        for s in profile {
            assert!((s - (0.02f64).atan().sin()).abs() < 1e-14);
        }
    }
}
