//! Tracking of the flow head.
//!
//! The head moves at the faster of the two face velocities bracketing it,
//! capped by a densimetric front speed evaluated at the node behind it:
//!
//! c_front = 1.5 (g b h)^{1/3}
//!
//! with buoyancy `b = Σ R_n c_n`. The [`HeadCelerity::FluxCapped`] variant
//! uses `1.5 (g b h u_head)^{1/3}` instead.

use serde::{Deserialize, Serialize};

use crate::solver::FlowArray;
use crate::source::buoyancy;

/// Front-speed coefficient.
const FRONT_COEFFICIENT: f64 = 1.5;

/// Rule capping the head celerity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadCelerity {
    /// Cap at `1.5 (g b h)^{1/3}`
    #[default]
    Capped,
    /// Cap at `1.5 (g b h u_head)^{1/3}`
    FluxCapped,
}

impl HeadCelerity {
    /// Front-speed cap for buoyancy `b`, thickness `h` and head velocity `u`.
    pub fn cap(&self, g: f64, b: f64, h: f64, u: f64) -> f64 {
        let flux = match self {
            HeadCelerity::Capped => g * b * h,
            HeadCelerity::FluxCapped => g * b * h * u,
        };
        FRONT_COEFFICIENT * flux.cbrt()
    }
}

/// Position and grid index of the leading edge of the flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadTracker {
    position: f64,
    index: usize,
    rule: HeadCelerity,
}

impl HeadTracker {
    /// Place the head at node `index` of `state`.
    pub fn at_node(state: &FlowArray, index: usize, rule: HeadCelerity) -> Self {
        Self {
            position: state.x(index as isize),
            index,
            rule,
        }
    }

    /// Head position (m).
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Index of the node at or behind the head.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Head speed from the current state.
    ///
    /// * `reduced_gravity` - R_n of each grain class
    pub fn celerity(&self, state: &FlowArray, reduced_gravity: &[f64], g: f64) -> f64 {
        let last = state.len() as isize - 1;
        let head = (self.index as isize).min(last);
        let u_head = state.u(head);
        let bracket = u_head.max(state.u(head + 1));

        let behind = (head - 1).max(0);
        let b = buoyancy(state.c_grain(behind), reduced_gravity);
        let cap = self.rule.cap(g, b, state.h(behind), u_head);

        if cap > 0.0 { bracket.min(cap) } else { bracket }
    }

    /// Move the head over one step and refresh its index.
    ///
    /// The head never moves backward. Returns the celerity used.
    pub fn advance(&mut self, state: &FlowArray, reduced_gravity: &[f64], g: f64, dt: f64) -> f64 {
        let celerity = self.celerity(state, reduced_gravity, g).max(0.0);
        self.position += celerity * dt;
        self.index = Self::locate(state, self.position);
        celerity
    }

    /// Index of the node at or behind `position`, never below 0.
    ///
    /// Past the last node the index keeps growing with the last spacing.
    fn locate(state: &FlowArray, position: f64) -> usize {
        let x0 = state.x(0);
        let n = state.len();
        let last = state.x(n as isize - 1);
        if position >= last {
            let dx = state.dx(n as isize - 2);
            return n - 1 + ((position - last) / dx).floor() as usize;
        }
        let below = (0..n).take_while(|&i| state.x(i as isize) <= position).count();
        if position < x0 { 0 } else { below.saturating_sub(1) }
    }
}
