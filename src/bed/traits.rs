//! Interface between the flow solver and the seabed store.

/// Access to the sediment store underneath the flow.
///
/// The solver calls these methods node by node, left to right, eroding
/// before depositing at each node. Implementations may rely on that
/// ordering but not on any other.
///
/// All volumes are bulk (water-inclusive) deposit volumes in m³.
pub trait BedArchitecture {
    /// Grain-size composition of the bed at `x`.
    ///
    /// Writes the fraction of each grain class into `fractions` (summing to
    /// one when material is present) and returns the volume the bed can
    /// supply, which may be less than `requested_volume`.
    fn composition_at(&self, x: f64, requested_volume: f64, fractions: &mut [f64]) -> f64;

    /// Remove up to `volume` of grain class `grain` at `x`.
    ///
    /// Returns the volume actually removed.
    fn remove(&mut self, x: f64, grain: usize, volume: f64) -> f64;

    /// Add up to `volume` of grain class `grain` at `x`.
    ///
    /// Returns the volume actually accepted, which may be capped by the
    /// available accommodation space.
    fn add(&mut self, x: f64, grain: usize, volume: f64) -> f64;

    /// Sea-floor elevation at `x` relative to sea level (negative below).
    fn depth_at(&self, x: f64) -> f64;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str {
        "bed"
    }
}
