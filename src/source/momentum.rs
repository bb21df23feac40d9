//! Depth-averaged momentum balance at a velocity face.
//!
//! For face `i`, between cells `i - 1` and `i`, with mean thickness `h̄`,
//! buoyancy `b = Σ R_n c_n` and centre spacing `Δs`:
//!
//! du/dt = g b̄ sin θ
//!       − g (b_i h_i² − b_{i−1} h_{i−1}²) / (2 h̄ Δs)
//!       − C_d u |u| / h̄
//!       + ν (1 + 2.5 c̄) (u_{i+1} − 2 u_i + u_{i−1}) / Δs²
//!
//! The last term is a small Einstein-corrected viscous smoothing of the
//! velocity field. There is no advective acceleration term.
//!
//! Time updates go through a [`FrictionScheme`]. The default explicit
//! scheme adds `Δt · du/dt`. The semi-implicit scheme linearizes friction
//! about the stencil velocity, which stays bounded under a thin flow head:
//!
//! u_new = (u_0 + Δt (gravity + pressure + diffusion)) / (1 + Δt C_d |u| / h̄)

use serde::{Deserialize, Serialize};

use crate::physics::FlowConstants;
use crate::solver::FlowArray;

/// Coefficient of the Einstein viscosity correction.
const EINSTEIN: f64 = 2.5;

/// Buoyancy `Σ R_n c_n` of a suspension.
#[inline]
pub fn buoyancy(c_grain: &[f64], reduced_gravity: &[f64]) -> f64 {
    c_grain.iter().zip(reduced_gravity).map(|(c, r)| c * r).sum()
}

/// Inputs of the momentum balance at one face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MomentumStencil {
    /// Velocity at face `i - 1`
    pub u_back: f64,
    /// Velocity at face `i`
    pub u: f64,
    /// Velocity at face `i + 1`
    pub u_fwd: f64,
    /// Thickness of cell `i - 1`
    pub h_back: f64,
    /// Thickness of cell `i`
    pub h: f64,
    /// Buoyancy of cell `i - 1`
    pub b_back: f64,
    /// Buoyancy of cell `i`
    pub b: f64,
    /// Mean total concentration across the face
    pub c_mean: f64,
    /// Distance between the two cell centres
    pub ds: f64,
    /// Sine of the bed slope at the face
    pub sin_slope: f64,
}

impl MomentumStencil {
    /// Mean thickness across the face.
    #[inline]
    pub fn h_mean(&self) -> f64 {
        0.5 * (self.h_back + self.h)
    }

    /// Mean buoyancy across the face.
    #[inline]
    pub fn b_mean(&self) -> f64 {
        0.5 * (self.b_back + self.b)
    }

    /// Gravitational driving along the slope.
    #[inline]
    pub fn gravity(&self, g: f64) -> f64 {
        g * self.b_mean() * self.sin_slope
    }

    /// Hydrostatic pressure gradient of the dense layer.
    #[inline]
    pub fn pressure(&self, g: f64) -> f64 {
        let gradient = self.b * self.h * self.h - self.b_back * self.h_back * self.h_back;
        -g * gradient / (2.0 * self.h_mean() * self.ds)
    }

    /// Quadratic bed friction.
    #[inline]
    pub fn friction(&self, c_drag: f64) -> f64 {
        -c_drag * self.u * self.u.abs() / self.h_mean()
    }

    /// Viscous smoothing with Einstein's suspension correction.
    #[inline]
    pub fn diffusion(&self, nu: f64) -> f64 {
        let laplacian = (self.u_fwd - 2.0 * self.u + self.u_back) / (self.ds * self.ds);
        nu * (1.0 + EINSTEIN * self.c_mean) * laplacian
    }
}

/// Treatment of bed friction in the velocity updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrictionScheme {
    /// `u_0 + Δt · du/dt`
    #[default]
    Explicit,
    /// Friction linearized about the stencil velocity and taken implicitly
    SemiImplicit,
}

impl FrictionScheme {
    /// Velocity after `dt` starting from `u0`, with tendencies from `s`.
    ///
    /// Leaves `u0` unchanged when the mean thickness is below `h_min`.
    pub fn advance(&self, s: &MomentumStencil, u0: f64, dt: f64, k: &FlowConstants) -> f64 {
        match self {
            FrictionScheme::Explicit => u0 + dt * dudt(s, k),
            FrictionScheme::SemiImplicit => {
                let h = s.h_mean();
                if h < k.thresholds.h_min {
                    return u0;
                }
                let explicit = s.gravity(k.g) + s.pressure(k.g) + s.diffusion(k.mu_water);
                let damping = 1.0 + dt * k.c_drag * s.u.abs() / h;
                (u0 + dt * explicit) / damping
            }
        }
    }
}

/// Velocity tendency at a face.
///
/// Returns zero when the mean thickness is below `h_min`.
pub fn dudt(s: &MomentumStencil, k: &FlowConstants) -> f64 {
    if s.h_mean() < k.thresholds.h_min {
        return 0.0;
    }
    s.gravity(k.g) + s.pressure(k.g) + s.friction(k.c_drag) + s.diffusion(k.mu_water)
}

/// Build the momentum stencil at face `i` of `state`.
///
/// * `reduced_gravity` - R_n of each grain class
/// * `sin_slope` - bed slope at the face
pub fn face_stencil(
    state: &FlowArray,
    i: isize,
    reduced_gravity: &[f64],
    sin_slope: f64,
) -> MomentumStencil {
    MomentumStencil {
        u_back: state.u(i - 1),
        u: state.u(i),
        u_fwd: state.u(i + 1),
        h_back: state.h(i - 1),
        h: state.h(i),
        b_back: buoyancy(state.c_grain(i - 1), reduced_gravity),
        b: buoyancy(state.c_grain(i), reduced_gravity),
        c_mean: 0.5 * (state.c(i - 1) + state.c(i)),
        ds: 0.5 * (state.dx(i - 1) + state.dx(i)),
        sin_slope,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn still_layer() -> MomentumStencil {
        MomentumStencil {
            h_back: 2.0,
            h: 2.0,
            b_back: 0.01,
            b: 0.01,
            c_mean: 0.006,
            ds: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_still_layer_is_at_rest() {
        let k = FlowConstants::default();
        assert_eq!(dudt(&still_layer(), &k), 0.0);
    }

    #[test]
    fn test_slope_accelerates() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            sin_slope: 0.01,
            ..still_layer()
        };
        assert_relative_eq!(dudt(&s, &k), 9.81 * 0.01 * 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_thinning_layer_pushes_forward() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            h: 1.0,
            ..still_layer()
        };
        // -g (0.01*1 - 0.01*4) / (2 * 1.5 * 1)
        assert_relative_eq!(dudt(&s, &k), 9.81 * 0.03 / 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_friction_opposes_motion() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            u_back: 1.0,
            u: 1.0,
            u_fwd: 1.0,
            ..still_layer()
        };
        assert_relative_eq!(dudt(&s, &k), -0.004 / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_explicit_scheme_adds_tendency() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            u_back: 1.0,
            u: 1.0,
            u_fwd: 1.0,
            h_back: 0.01,
            h: 0.01,
            sin_slope: 0.01,
            ..still_layer()
        };
        let u = FrictionScheme::Explicit.advance(&s, 1.0, 1.0, &k);
        assert_eq!(u, 1.0 + dudt(&s, &k));
        // Gravity 9.81e-4, friction -0.4
        assert_relative_eq!(u, 0.6 + 9.81e-4, epsilon = 1e-12);
    }

    #[test]
    fn test_semi_implicit_friction() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            u_back: 2.0,
            u: 2.0,
            u_fwd: 2.0,
            ..still_layer()
        };
        // Small step agrees with the explicit tendency
        let dt = 1e-3;
        let explicit = FrictionScheme::Explicit.advance(&s, 2.0, dt, &k);
        let implicit = FrictionScheme::SemiImplicit.advance(&s, 2.0, dt, &k);
        assert_relative_eq!(implicit, explicit, max_relative = 1e-8);

        // A very thin layer brakes without reversing
        let thin = MomentumStencil {
            h_back: 1e-4,
            h: 1e-4,
            ..s
        };
        let u = FrictionScheme::SemiImplicit.advance(&thin, 2.0, 1.0, &k);
        assert!(u > 0.0 && u < 0.05);
        assert!(FrictionScheme::Explicit.advance(&thin, 2.0, 1.0, &k) < -100.0);
    }

    #[test]
    fn test_dry_face_keeps_velocity() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            h_back: 1e-6,
            h: 1e-6,
            u: 3.0,
            ..still_layer()
        };
        for scheme in [FrictionScheme::Explicit, FrictionScheme::SemiImplicit] {
            assert_eq!(scheme.advance(&s, 3.0, 1.0, &k), 3.0);
        }
    }

    #[test]
    fn test_diffusion_smooths_peak() {
        let s = MomentumStencil {
            u: 1.0,
            ..still_layer()
        };
        assert!(s.diffusion(1.3e-6) < 0.0);
        assert_relative_eq!(s.diffusion(1.0), -2.0 * (1.0 + 2.5 * 0.006));
    }

    #[test]
    fn test_dry_face_has_no_tendency() {
        let k = FlowConstants::default();
        let s = MomentumStencil {
            h_back: 1e-6,
            h: 1e-6,
            u: 3.0,
            sin_slope: 0.5,
            ..still_layer()
        };
        assert_eq!(dudt(&s, &k), 0.0);
    }

    #[test]
    fn test_face_stencil_reads_neighbours() {
        let mut a = FlowArray::new(4, 2);
        a.set_x(&[0.0, 2.0, 4.0, 6.0]).unwrap();
        a.set_width(&[1.0; 4]).unwrap();
        a.set_h(0, 3.0);
        a.set_h(1, 1.0);
        a.c_grain_mut(0).copy_from_slice(&[0.01, 0.02]);
        a.sync_total_concentration(0);
        a.set_u(2, 0.5);

        let s = face_stencil(&a, 1, &[1.5, 0.5], 0.1);
        assert_eq!(s.h_back, 3.0);
        assert_eq!(s.h, 1.0);
        assert_relative_eq!(s.b_back, 0.025);
        assert_eq!(s.b, 0.0);
        assert_relative_eq!(s.c_mean, 0.015);
        assert_eq!(s.u_fwd, 0.5);
        assert_relative_eq!(s.ds, 2.0);
    }
}
