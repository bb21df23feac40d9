//! Boundary node values pushed into ghost cells.

use super::flow_array::FlowArray;

/// Flow values imposed at the upstream or downstream end of the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryNode {
    /// Velocity (m/s)
    pub u: f64,
    /// Total volumetric concentration
    pub c: f64,
    /// Thickness (m)
    pub h: f64,
    /// Per-grain volumetric concentration
    pub c_grain: Vec<f64>,
}

impl BoundaryNode {
    /// Create a boundary node; the total concentration is the grain sum.
    pub fn new(u: f64, h: f64, c_grain: Vec<f64>) -> Self {
        let c = c_grain.iter().sum();
        Self { u, c, h, c_grain }
    }

    /// A node carrying no flow.
    pub fn zero(n_grain: usize) -> Self {
        Self {
            u: 0.0,
            c: 0.0,
            h: 0.0,
            c_grain: vec![0.0; n_grain],
        }
    }

    /// Inflow from a river: total concentration split by grain fractions.
    pub fn from_fractions(u: f64, h: f64, c: f64, fractions: &[f64]) -> Self {
        Self::new(u, h, fractions.iter().map(|f| c * f).collect())
    }

    /// Copy the state of cell `i` (velocity from face `i`).
    pub fn from_node(array: &FlowArray, i: isize) -> Self {
        Self {
            u: array.u(i),
            c: array.c(i),
            h: array.h(i),
            c_grain: array.c_grain(i).to_vec(),
        }
    }

    /// Copy with velocity, thickness and concentrations scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            u: self.u * factor,
            c: self.c * factor,
            h: self.h * factor,
            c_grain: self.c_grain.iter().map(|c| c * factor).collect(),
        }
    }

    /// Reset every value to zero, keeping the grain count.
    pub fn clear(&mut self) {
        self.u = 0.0;
        self.c = 0.0;
        self.h = 0.0;
        self.c_grain.iter_mut().for_each(|c| *c = 0.0);
    }

    /// True if the node carries no flow.
    pub fn is_zero(&self) -> bool {
        self.u == 0.0 && self.h == 0.0 && self.c_grain.iter().all(|&c| c == 0.0)
    }
}
