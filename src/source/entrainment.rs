//! Ambient water entrainment at the upper interface of the flow.
//!
//! The entrainment coefficient follows a Richardson-number closure:
//!
//! e_w = e_a / (e_b + Ri),   Ri = g b h / ū²
//!
//! where `b = Σ R_n c_n` is the buoyancy of the suspension. The thickness
//! grows at `e_w |ū|`.

/// Speeds below this are treated as still water.
const U_STILL: f64 = 1.0e-12;

/// Bulk Richardson number of the flow.
///
/// Returns infinity for still water.
#[inline]
pub fn richardson(g: f64, buoyancy: f64, h: f64, u: f64) -> f64 {
    if u.abs() < U_STILL {
        return f64::INFINITY;
    }
    g * buoyancy * h / (u * u)
}

/// Entrainment coefficient `e_a / (e_b + Ri)`.
#[inline]
pub fn entrainment_coefficient(ri: f64, e_a: f64, e_b: f64) -> f64 {
    if ri.is_infinite() {
        return 0.0;
    }
    e_a / (e_b + ri.max(0.0))
}

/// Rate of thickness growth from entrainment (m/s).
///
/// * `u` - cell-averaged velocity
/// * `h` - thickness
/// * `buoyancy` - Σ R_n c_n
pub fn entrainment_rate(g: f64, buoyancy: f64, h: f64, u: f64, e_a: f64, e_b: f64) -> f64 {
    let ri = richardson(g, buoyancy, h, u);
    entrainment_coefficient(ri, e_a, e_b) * u.abs()
}
