//! Predictor-corrector update of the staggered flow state.
//!
//! One step of length Δt uses three snapshots:
//!
//! 1. predict: `mid.u = prev.u + Δt/2 · du/dt(prev)`
//! 2. advance: `next.h`, `next.c_grain` from `prev` fields advected with
//!    the predicted `mid.u`, plus entrainment, erosion and deposition
//! 3. average: `mid.h`, `mid.c_grain` = ½ (prev + next)
//! 4. correct: `next.u = prev.u + Δt · du/dt(mid)`
//!
//! Both velocity updates follow the configured
//! [`FrictionScheme`](crate::source::FrictionScheme), explicit by default.
//!
//! Velocities are updated on faces `1..=min(head, len - 1)`; thickness and
//! concentration in cells `0..=min(head, len - 2)`. Faces beyond the head
//! keep zero velocity, so nothing is advected past it.

use crate::bed::BedArchitecture;
use crate::error::StepFailure;
use crate::flux::{cell_stencil, dfdt};
use crate::physics::FlowConstants;
use crate::sediment::{SedimentClass, SedimentExchange};
use crate::solver::{BoundaryNode, FlowArray, GHOST};
use crate::source::{buoyancy, entrainment_rate, face_stencil};

use super::head::HeadTracker;

/// Read-only inputs shared by every sub-step.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    /// Constants in model units
    pub constants: &'a FlowConstants,
    /// Grain classes
    pub sediment: &'a [SedimentClass],
    /// R_n of each grain class
    pub reduced_gravity: &'a [f64],
    /// Time step (s)
    pub dt: f64,
}

/// Counters and boundary fluxes of the steps taken so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepStats {
    /// Thickness updates clamped from a negative value
    pub negative_thickness: usize,
    /// Concentration updates clamped from a negative value
    pub negative_concentration: usize,
    /// Corrected velocities that came out negative
    pub negative_velocity: usize,
    /// Sediment mass supplied by the seeded cell and the inflow face (kg)
    pub mass_in: f64,
    /// Sediment mass through the outflow face (kg)
    pub mass_out: f64,
    /// Solid volume eroded (m³)
    pub eroded: f64,
    /// Solid volume deposited (m³)
    pub deposited: f64,
}

impl StepStats {
    /// Number of clamped or flagged values.
    pub fn anomalies(&self) -> usize {
        self.negative_thickness + self.negative_concentration + self.negative_velocity
    }
}

/// Last face whose velocity is updated.
#[inline]
pub fn last_active_face(state: &FlowArray, head: &HeadTracker) -> isize {
    head.index().min(state.len() - 1) as isize
}

/// Last cell whose thickness and concentration are updated.
#[inline]
pub fn last_active_cell(state: &FlowArray, head: &HeadTracker) -> isize {
    head.index().min(state.len() - 2) as isize
}

/// Downstream boundary node for the current head position.
///
/// Zero while the head is inside the domain, a copy of the last active cell
/// once it is past the last face, and a linear ramp between the two while
/// the head crosses the last cell.
pub fn outflow_node(state: &FlowArray, head: &HeadTracker) -> BoundaryNode {
    let n = state.len() as isize;
    let x_last = state.x(n - 1);
    if head.position() < x_last {
        return BoundaryNode::zero(state.n_grain());
    }
    let node = BoundaryNode::from_node(state, n - 2);
    let fraction = (head.position() - x_last) / state.dx(n - 1);
    if fraction < 1.0 { node.scaled(fraction) } else { node }
}

fn check_finite(value: f64, field: &'static str, node: isize) -> Result<f64, StepFailure> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StepFailure::NonFinite { field, node })
    }
}

/// Half-step velocity at face `i` from `prev`.
fn predict_face(
    prev: &FlowArray,
    i: isize,
    slope: f64,
    ctx: &StepContext,
) -> Result<f64, StepFailure> {
    let thresholds = &ctx.constants.thresholds;
    for node in [i - 1, i] {
        let h = prev.h(node);
        if thresholds.is_out_of_band(h) {
            return Err(StepFailure::TinyThickness { node, h });
        }
    }
    let stencil = face_stencil(prev, i, ctx.reduced_gravity, slope);
    let k = ctx.constants;
    let u = k.friction.advance(&stencil, prev.u(i), 0.5 * ctx.dt, k);
    check_finite(u, "velocity", i)
}

/// Predict the half-step velocity into `mid`.
///
/// `slopes[i]` is the bed slope at face `i`.
pub fn predict_mid_velocity(
    prev: &FlowArray,
    mid: &mut FlowArray,
    head: &HeadTracker,
    slopes: &[f64],
    ctx: &StepContext,
) -> Result<(), StepFailure> {
    for i in 1..=last_active_face(prev, head) {
        let u = predict_face(prev, i, slopes[i as usize], ctx)?;
        mid.set_u(i, u);
    }
    Ok(())
}

/// Advance thickness over the full step into `next`.
///
/// Dry cells do not entrain. Negative thickness is clamped to zero and
/// counted.
pub fn advance_thickness(
    prev: &FlowArray,
    mid: &FlowArray,
    next: &mut FlowArray,
    head: &HeadTracker,
    ctx: &StepContext,
    stats: &mut StepStats,
) -> Result<(), StepFailure> {
    let k = ctx.constants;
    for i in 0..=last_active_cell(prev, head) {
        let h_old = prev.h(i);
        let source = if k.thresholds.is_dry(h_old) {
            0.0
        } else {
            let u_mean = 0.5 * (mid.u(i) + mid.u(i + 1));
            let b = buoyancy(prev.c_grain(i), ctx.reduced_gravity);
            entrainment_rate(k.g, b, h_old, u_mean, k.e_a, k.e_b)
        };

        let stencil = cell_stencil(prev, mid, i, k.thresholds.u_min, |a, j| a.h(j));
        let h = check_finite(h_old + ctx.dt * dfdt(&stencil, source), "thickness", i)?;
        if h < 0.0 {
            log::warn!("negative thickness {:.3e} m at node {} clamped to zero", h, i);
            stats.negative_thickness += 1;
            next.set_h(i, 0.0);
        } else {
            next.set_h(i, h);
        }
    }
    Ok(())
}

/// Advance per-grain concentration over the full step into `next`, then
/// exchange sediment with the bed node by node.
///
/// Requires `next.h` from [`advance_thickness`]. Boundary fluxes of
/// sediment mass are added to `stats`.
#[allow(clippy::too_many_arguments)]
pub fn advance_concentration(
    prev: &FlowArray,
    mid: &FlowArray,
    next: &mut FlowArray,
    head: &HeadTracker,
    ctx: &StepContext,
    exchange: &mut SedimentExchange,
    bed: &mut dyn BedArchitecture,
    stats: &mut StepStats,
) -> Result<(), StepFailure> {
    let u_min = ctx.constants.thresholds.u_min;
    let outflow_cell = prev.len() as isize - 2;
    let last = last_active_cell(prev, head);

    for i in 0..=last {
        let h = next.h(i);
        for (n, class) in ctx.sediment.iter().enumerate() {
            let stencil = cell_stencil(prev, mid, i, u_min, |a, j| a.h(j) * a.c_grain(j)[n]);
            if i == 0 {
                stats.mass_in += stencil.flux_left() * ctx.dt * class.rho_grain;
            }
            if i == outflow_cell {
                stats.mass_out += stencil.flux_right() * ctx.dt * class.rho_grain;
            }

            let hc = prev.h(i) * prev.c_grain(i)[n] + ctx.dt * dfdt(&stencil, 0.0);
            let mut c = check_finite(if h > 0.0 { hc / h } else { 0.0 }, "concentration", i)?;
            if c < 0.0 {
                log::warn!(
                    "negative concentration {:.3e} of grain {} at node {} clamped to zero",
                    c,
                    n,
                    i
                );
                stats.negative_concentration += 1;
                c = 0.0;
            }
            next.c_grain_mut(i)[n] = c;
        }
        next.sync_total_concentration(i);

        let u_mean = 0.5 * (mid.u(i) + mid.u(i + 1));
        stats.eroded += check_finite(exchange.erode(next, i, u_mean, ctx.dt, bed), "erosion", i)?;
        stats.deposited += exchange.deposit(next, i, ctx.dt, bed);
    }
    Ok(())
}

/// Set `mid` thickness and concentrations to the mean of `prev` and `next`
/// at every node, ghosts included.
pub fn average_midpoint(prev: &FlowArray, next: &FlowArray, mid: &mut FlowArray) {
    for i in -(GHOST as isize)..=prev.last_ghost() {
        mid.set_h(i, 0.5 * (prev.h(i) + next.h(i)));
        let pairs = prev.c_grain(i).iter().zip(next.c_grain(i));
        for (m, (&p, &q)) in mid.c_grain_mut(i).iter_mut().zip(pairs) {
            *m = 0.5 * (p + q);
        }
        mid.sync_total_concentration(i);
    }
}

/// Correct the velocity over the full step from the midpoint state.
pub fn correct_velocity(
    prev: &FlowArray,
    mid: &FlowArray,
    next: &mut FlowArray,
    head: &HeadTracker,
    slopes: &[f64],
    ctx: &StepContext,
    stats: &mut StepStats,
) -> Result<(), StepFailure> {
    let k = ctx.constants;
    let thresholds = &k.thresholds;
    for i in 1..=last_active_face(prev, head) {
        let stencil = face_stencil(mid, i, ctx.reduced_gravity, slopes[i as usize]);
        let u = check_finite(k.friction.advance(&stencil, prev.u(i), ctx.dt, k), "velocity", i)?;

        if u.abs() > thresholds.u_max {
            return Err(StepFailure::VelocityOutOfRange {
                node: i,
                u,
                limit: thresholds.u_max,
            });
        }
        if u < 0.0 {
            if thresholds.reject_backflow {
                return Err(StepFailure::NegativeVelocity { node: i, u });
            }
            log::warn!("negative velocity {:.3e} m/s at node {}", u, i);
            stats.negative_velocity += 1;
        }
        next.set_u(i, u);
    }
    Ok(())
}
