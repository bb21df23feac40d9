//! Ghost-padded 1D flow state.
//!
//! Each field is stored as one contiguous buffer of `len + 4` values. The
//! logical index range is `-2..=len+1`; logical index `i` lives at physical
//! offset `i + 2`. Velocity `u[i]` sits on the face between cells `i - 1`
//! and `i`; thickness and concentrations sit at cell centres.

use crate::error::{Result, SakuraError};
use crate::sediment::SedimentClass;

use super::boundary::BoundaryNode;

/// Number of ghost nodes on each side of the domain.
pub const GHOST: usize = 2;

/// Generate logical-index accessors for a scalar field.
macro_rules! scalar_field {
    ($(#[$meta:meta])* $get:ident, $set:ident, $field:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $get(&self, i: isize) -> f64 {
            self.$field[self.idx(i)]
        }

        #[inline]
        #[doc = concat!("Set `", stringify!($field), "` at logical index `i`.")]
        pub fn $set(&mut self, i: isize, value: f64) {
            let k = self.idx(i);
            self.$field[k] = value;
        }
    };
}

/// Generate logical-index accessors for a per-grain field.
macro_rules! grain_field {
    ($(#[$meta:meta])* $get:ident, $get_mut:ident, $field:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $get(&self, i: isize) -> &[f64] {
            let base = self.idx(i) * self.n_grain;
            &self.$field[base..base + self.n_grain]
        }

        #[inline]
        #[doc = concat!("Mutable `", stringify!($field), "` vector at logical index `i`.")]
        pub fn $get_mut(&mut self, i: isize) -> &mut [f64] {
            let base = self.idx(i) * self.n_grain;
            &mut self.$field[base..base + self.n_grain]
        }
    };
}

/// Flow state on a padded 1D grid.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowArray {
    len: usize,
    n_grain: usize,
    x: Vec<f64>,
    w: Vec<f64>,
    h: Vec<f64>,
    u: Vec<f64>,
    c: Vec<f64>,
    /// Node-major per-grain concentration: `[node * n_grain + grain]`
    c_grain: Vec<f64>,
    /// Cumulative eroded solid volume per node and grain (m³)
    eroded: Vec<f64>,
    /// Cumulative deposited solid volume per node and grain (m³)
    deposited: Vec<f64>,
}

impl FlowArray {
    /// Allocate a zero-filled array of `len` nodes and `n_grain` grain classes.
    pub fn new(len: usize, n_grain: usize) -> Self {
        let n = len + 2 * GHOST;
        Self {
            len,
            n_grain,
            x: vec![0.0; n],
            w: vec![0.0; n],
            h: vec![0.0; n],
            u: vec![0.0; n],
            c: vec![0.0; n],
            c_grain: vec![0.0; n * n_grain],
            eroded: vec![0.0; n * n_grain],
            deposited: vec![0.0; n * n_grain],
        }
    }

    /// Number of physical nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the array has no physical nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of grain classes.
    #[inline]
    pub fn n_grain(&self) -> usize {
        self.n_grain
    }

    /// Map a logical index (`-2..=len+1`) to a buffer offset.
    #[inline]
    pub fn idx(&self, i: isize) -> usize {
        let k = i + GHOST as isize;
        debug_assert!(
            k >= 0 && (k as usize) < self.len + 2 * GHOST,
            "logical index {} outside -2..={}",
            i,
            self.len + 1
        );
        k as usize
    }

    /// Last logical index (`len + 1`).
    #[inline]
    pub fn last_ghost(&self) -> isize {
        self.len as isize + 1
    }

    scalar_field!(
        /// Node position (m).
        x, set_x_at, x
    );
    scalar_field!(
        /// Channel width (m).
        w, set_w, w
    );
    scalar_field!(
        /// Flow thickness (m).
        h, set_h, h
    );
    scalar_field!(
        /// Depth-averaged velocity on the left face of the cell (m/s).
        u, set_u, u
    );
    scalar_field!(
        /// Total volumetric concentration.
        c, set_c, c
    );

    grain_field!(
        /// Per-grain volumetric concentration.
        c_grain, c_grain_mut, c_grain
    );
    grain_field!(
        /// Cumulative eroded solid volume per grain (m³).
        eroded, eroded_mut, eroded
    );
    grain_field!(
        /// Cumulative deposited solid volume per grain (m³).
        deposited, deposited_mut, deposited
    );

    /// Cell length `x[i+1] - x[i]`.
    #[inline]
    pub fn dx(&self, i: isize) -> f64 {
        self.x(i + 1) - self.x(i)
    }

    /// Plan-view footprint of cell `i` (m²).
    #[inline]
    pub fn cell_area(&self, i: isize) -> f64 {
        self.dx(i) * self.w(i)
    }

    /// Width at face `i` (between cells `i - 1` and `i`).
    #[inline]
    pub fn face_width(&self, i: isize) -> f64 {
        0.5 * (self.w(i - 1) + self.w(i))
    }

    /// Deep-copy every field of `src`, ghosts included.
    ///
    /// Panics if the arrays have different shapes.
    pub fn copy_from(&mut self, src: &FlowArray) {
        assert_eq!(self.len, src.len, "length mismatch in copy");
        assert_eq!(self.n_grain, src.n_grain, "grain count mismatch in copy");
        self.clone_from(src);
    }

    /// Set interior node positions and extrapolate the ghosts.
    ///
    /// Ghost positions continue the spacing of the two nodes nearest each
    /// boundary. Fails if any spacing is not strictly positive.
    pub fn set_x(&mut self, x: &[f64]) -> Result<()> {
        if x.len() != self.len {
            return Err(SakuraError::LengthMismatch {
                field: "x",
                expected: self.len,
                found: x.len(),
            });
        }
        if self.len < 2 {
            return Err(SakuraError::GridTooShort {
                min: 2,
                len: self.len,
            });
        }
        for (node, pair) in x.windows(2).enumerate() {
            let dx = pair[1] - pair[0];
            if !(dx > 0.0) {
                return Err(SakuraError::NonIncreasingGrid { node, dx });
            }
        }

        let offset = GHOST;
        self.x[offset..offset + self.len].copy_from_slice(x);

        let n = self.len as isize;
        let dx_left = x[1] - x[0];
        let dx_right = x[self.len - 1] - x[self.len - 2];
        self.set_x_at(-1, x[0] - dx_left);
        self.set_x_at(-2, x[0] - 2.0 * dx_left);
        self.set_x_at(n, x[self.len - 1] + dx_right);
        self.set_x_at(n + 1, x[self.len - 1] + 2.0 * dx_right);
        Ok(())
    }

    /// Set interior channel widths; ghosts copy the nearest boundary width.
    pub fn set_width(&mut self, w: &[f64]) -> Result<()> {
        if w.len() != self.len {
            return Err(SakuraError::LengthMismatch {
                field: "width",
                expected: self.len,
                found: w.len(),
            });
        }
        if let Some((node, &width)) = w.iter().enumerate().find(|&(_, &v)| !(v > 0.0)) {
            return Err(SakuraError::InvalidWidth { node, width });
        }

        let offset = GHOST;
        self.w[offset..offset + self.len].copy_from_slice(w);

        let n = self.len as isize;
        let first = w[0];
        let last = w[self.len - 1];
        self.set_w(-1, first);
        self.set_w(-2, first);
        self.set_w(n, last);
        self.set_w(n + 1, last);
        Ok(())
    }

    /// Write boundary nodes into the ghost cells.
    ///
    /// Inflow velocity goes to faces `{0, -1, -2}`; inflow thickness and
    /// concentrations to cells `{-1, -2}`. Outflow fills `{len, len+1}`.
    pub fn set_boundary(&mut self, inflow: &BoundaryNode, outflow: &BoundaryNode) {
        for i in [0, -1, -2] {
            self.set_u(i, inflow.u);
        }
        for i in [-1, -2] {
            self.write_node(i, inflow);
        }

        let n = self.len as isize;
        for i in [n, n + 1] {
            self.set_u(i, outflow.u);
            self.write_node(i, outflow);
        }
    }

    fn write_node(&mut self, i: isize, node: &BoundaryNode) {
        self.set_c(i, node.c);
        self.set_h(i, node.h);
        self.c_grain_mut(i).copy_from_slice(&node.c_grain);
    }

    /// Recompute the total concentration at `i` from the per-grain values.
    #[inline]
    pub fn sync_total_concentration(&mut self, i: isize) -> f64 {
        let total: f64 = self.c_grain(i).iter().sum();
        self.set_c(i, total);
        total
    }

    /// Largest `|Σ c_grain - c|` over all nodes, ghosts included.
    pub fn concentration_residual(&self) -> f64 {
        (-(GHOST as isize)..=self.last_ghost())
            .map(|i| (self.c_grain(i).iter().sum::<f64>() - self.c(i)).abs())
            .fold(0.0, f64::max)
    }

    /// Minimum thickness over the physical nodes.
    pub fn min_thickness(&self) -> f64 {
        (0..self.len as isize)
            .map(|i| self.h(i))
            .fold(f64::INFINITY, f64::min)
    }

    /// Mass of sediment held in suspension (kg).
    ///
    /// Σ cell area × h × c_n × ρ_n over physical nodes and grains.
    pub fn mass_in_suspension(&self, sediment: &[SedimentClass]) -> f64 {
        let mut mass = 0.0;
        for i in 0..self.len as isize {
            let volume = self.cell_area(i) * self.h(i);
            for (class, &c) in sediment.iter().zip(self.c_grain(i)) {
                mass += volume * c * class.rho_grain;
            }
        }
        mass
    }

    /// Mass of sediment eroded from the bed so far (kg).
    pub fn mass_eroded(&self, sediment: &[SedimentClass]) -> f64 {
        self.tally_mass(sediment, |a, i| a.eroded(i))
    }

    /// Mass of sediment deposited on the bed so far (kg).
    pub fn mass_deposited(&self, sediment: &[SedimentClass]) -> f64 {
        self.tally_mass(sediment, |a, i| a.deposited(i))
    }

    fn tally_mass<'a, F>(&'a self, sediment: &[SedimentClass], field: F) -> f64
    where
        F: Fn(&'a FlowArray, isize) -> &'a [f64],
    {
        let mut mass = 0.0;
        for i in 0..self.len as isize {
            for (class, &v) in sediment.iter().zip(field(self, i)) {
                mass += v * class.rho_grain;
            }
        }
        mass
    }
}
