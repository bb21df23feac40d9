//! In-memory seabed store on the solver's node positions.
//!
//! Each node owns a column of erodible sediment, stored as bulk volume per
//! grain class, and a sea-floor elevation that moves as sediment is added
//! or removed. Deposition is capped by the accommodation space between the
//! sea floor and sea level.

use super::traits::BedArchitecture;

/// Node-based seabed with finite sediment supply and accommodation.
#[derive(Clone, Debug)]
pub struct LayeredSeabed {
    x: Vec<f64>,
    area: Vec<f64>,
    elevation: Vec<f64>,
    /// Bulk volume per node and grain: `[node * n_grain + grain]`
    store: Vec<f64>,
    n_grain: usize,
    sea_level: f64,
}

impl LayeredSeabed {
    /// Create an empty store.
    ///
    /// * `x` - node positions (strictly increasing)
    /// * `width` - channel width at each node
    /// * `elevation` - initial sea-floor elevation at each node
    pub fn new(x: &[f64], width: &[f64], elevation: &[f64], n_grain: usize) -> Self {
        assert!(x.len() >= 2, "need at least two nodes");
        assert_eq!(x.len(), width.len(), "width length mismatch");
        assert_eq!(x.len(), elevation.len(), "elevation length mismatch");

        let n = x.len();
        let area = (0..n)
            .map(|i| {
                let dx = if i + 1 < n { x[i + 1] - x[i] } else { x[n - 1] - x[n - 2] };
                dx * width[i]
            })
            .collect();

        Self {
            x: x.to_vec(),
            area,
            elevation: elevation.to_vec(),
            store: vec![0.0; n * n_grain],
            n_grain,
            sea_level: 0.0,
        }
    }

    /// Fill every node with a uniform thickness of each grain class.
    pub fn with_uniform_store(mut self, thickness: &[f64]) -> Self {
        assert_eq!(thickness.len(), self.n_grain, "grain count mismatch");
        for node in 0..self.x.len() {
            for (grain, &t) in thickness.iter().enumerate() {
                self.store[node * self.n_grain + grain] = t * self.area[node];
            }
        }
        self
    }

    /// Set the sea level used for accommodation.
    pub fn with_sea_level(mut self, sea_level: f64) -> Self {
        self.sea_level = sea_level;
        self
    }

    /// Node whose cell contains `x`.
    fn node(&self, x: f64) -> usize {
        self.x.partition_point(|&v| v <= x).saturating_sub(1)
    }

    /// Sea-floor elevation at node `i`.
    pub fn elevation(&self, i: usize) -> f64 {
        self.elevation[i]
    }

    /// Stored bulk volume of `grain` at node `i`.
    pub fn volume(&self, i: usize, grain: usize) -> f64 {
        self.store[i * self.n_grain + grain]
    }

    /// Total stored bulk volume.
    pub fn total_volume(&self) -> f64 {
        self.store.iter().sum()
    }
}

impl BedArchitecture for LayeredSeabed {
    fn composition_at(&self, x: f64, requested_volume: f64, fractions: &mut [f64]) -> f64 {
        let i = self.node(x);
        let column = &self.store[i * self.n_grain..(i + 1) * self.n_grain];
        let total: f64 = column.iter().sum();
        if total <= 0.0 {
            fractions.iter_mut().for_each(|f| *f = 0.0);
            return 0.0;
        }
        for (f, &v) in fractions.iter_mut().zip(column) {
            *f = v / total;
        }
        requested_volume.min(total)
    }

    fn remove(&mut self, x: f64, grain: usize, volume: f64) -> f64 {
        let i = self.node(x);
        let k = i * self.n_grain + grain;
        let taken = volume.clamp(0.0, self.store[k]);
        self.store[k] -= taken;
        self.elevation[i] -= taken / self.area[i];
        taken
    }

    fn add(&mut self, x: f64, grain: usize, volume: f64) -> f64 {
        let i = self.node(x);
        let space = (self.sea_level - self.elevation[i]).max(0.0) * self.area[i];
        let accepted = volume.clamp(0.0, space);
        self.store[i * self.n_grain + grain] += accepted;
        self.elevation[i] += accepted / self.area[i];
        accepted
    }

    fn depth_at(&self, x: f64) -> f64 {
        let i = self.node(x).min(self.x.len() - 2);
        let t = (x - self.x[i]) / (self.x[i + 1] - self.x[i]);
        self.elevation[i] + t * (self.elevation[i + 1] - self.elevation[i])
    }

    fn name(&self) -> &'static str {
        "layered"
    }
}
