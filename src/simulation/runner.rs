//! Turbidity-current run driver.
//!
//! Owns the three flow snapshots, seeds the inflow, iterates the
//! predictor-corrector until twice the flood duration has elapsed and
//! converts the bed exchange tallies into deposit thickness.
//!
//! A numerical failure inside a step does not surface as an error: the
//! remaining suspended load is dropped onto the bed and the run returns
//! with `success = false`.

use serde::{Deserialize, Serialize};

use crate::bed::BedArchitecture;
use crate::error::{Result, SakuraError, StepFailure};
use crate::physics::FlowConstants;
use crate::sediment::{SedimentClass, SedimentExchange};
use crate::solver::{BoundaryNode, FlowArray, MassBalance, ProgressReporter};
use crate::source::slope_profile;
use crate::time::{
    HeadTracker, StepContext, StepStats, advance_concentration, advance_thickness,
    average_midpoint, correct_velocity, outflow_node, predict_mid_velocity,
};

use super::config::{FloodRecord, RunConfig};

// =============================================================================
// Run state and output
// =============================================================================

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Inputs validated, state allocated
    Init,
    /// Stepping
    Iterating,
    /// Reached the end time without a step failure
    Success,
    /// A step failed and the suspended load was deposited in place
    FallbackDeposit,
}

impl RunState {
    /// True once the run has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Success | RunState::FallbackDeposit)
    }
}

/// Result of a turbidity-current run.
#[derive(Clone, Debug)]
pub struct SakuraOutput {
    /// Net deposited thickness `[grain][node]` (m); negative where the bed
    /// was eroded
    pub deposit: Vec<Vec<f64>>,
    /// Whether the run completed without a step failure
    pub success: bool,
    /// Terminal state
    pub state: RunState,
    /// Step failure that ended the run, if any
    pub failure: Option<StepFailure>,
    /// Number of completed steps
    pub n_steps: usize,
    /// Simulated time reached (s)
    pub final_time: f64,
    /// Final head position (m)
    pub head_position: f64,
    /// Sediment mass budget
    pub mass_balance: MassBalance,
    /// Anomaly counters and boundary fluxes
    pub stats: StepStats,
}

impl SakuraOutput {
    /// Net deposit summed over grain classes at each node (m).
    pub fn total_deposit(&self) -> Vec<f64> {
        let len = self.deposit.first().map_or(0, Vec::len);
        (0..len)
            .map(|i| self.deposit.iter().map(|grain| grain[i]).sum())
            .collect()
    }

    /// Format as a compact single line for logging.
    pub fn summary_line(&self) -> String {
        format!(
            "{:?} after {} steps, t={:.1}s, head={:.1}m | {}",
            self.state, self.n_steps, self.final_time, self.head_position, self.mass_balance
        )
    }
}

/// Snapshot handed to a step callback after each completed step.
#[derive(Clone, Copy, Debug)]
pub struct StepView<'a> {
    /// Flow state at the end of the step
    pub state: &'a FlowArray,
    /// Head after the step
    pub head: &'a HeadTracker,
    /// Counters and boundary fluxes accumulated so far
    pub stats: &'a StepStats,
    /// Simulated time (s)
    pub time: f64,
    /// Number of completed steps
    pub step: usize,
}

// =============================================================================
// Driver
// =============================================================================

/// Flow snapshots and bookkeeping of one run.
struct Driver<'a> {
    constants: &'a FlowConstants,
    sediment: &'a [SedimentClass],
    reduced_gravity: &'a [f64],
    dt: f64,
    prev: FlowArray,
    mid: FlowArray,
    next: FlowArray,
    head: HeadTracker,
    inflow: BoundaryNode,
    exchange: SedimentExchange<'a>,
    stats: StepStats,
    state: RunState,
}

impl<'a> Driver<'a> {
    fn new(
        config: &RunConfig,
        flood: &FloodRecord,
        sediment: &'a [SedimentClass],
        constants: &'a FlowConstants,
        reduced_gravity: &'a [f64],
    ) -> Result<Self> {
        let len = config.len();
        let n_grain = sediment.len();

        let mut prev = FlowArray::new(len, n_grain);
        prev.set_x(&config.x)?;
        prev.set_width(&config.width)?;

        // Seed the first cell with the river inflow
        let inflow = BoundaryNode::from_fractions(
            flood.velocity,
            flood.depth,
            flood.concentration,
            &flood.fractions,
        );
        prev.set_boundary(&inflow, &BoundaryNode::zero(n_grain));
        prev.set_h(0, inflow.h);
        prev.c_grain_mut(0).copy_from_slice(&inflow.c_grain);
        prev.sync_total_concentration(0);
        prev.set_u(1, inflow.u);

        let head = HeadTracker::at_node(&prev, 1, config.head_celerity);
        let exchange = SedimentExchange::new(sediment, constants, config.x[0]);

        // The seeded cell is part of the supply
        let stats = StepStats {
            mass_in: prev.mass_in_suspension(sediment),
            ..StepStats::default()
        };

        Ok(Self {
            constants,
            sediment,
            reduced_gravity,
            dt: config.dt,
            mid: prev.clone(),
            next: prev.clone(),
            prev,
            head,
            inflow,
            exchange,
            stats,
            state: RunState::Init,
        })
    }

    /// Advance `prev` by one time step.
    ///
    /// On failure `next` holds the partially advanced state.
    fn step(&mut self, bed: &mut dyn BedArchitecture) -> std::result::Result<(), StepFailure> {
        let ctx = StepContext {
            constants: self.constants,
            sediment: self.sediment,
            reduced_gravity: self.reduced_gravity,
            dt: self.dt,
        };

        let outflow = outflow_node(&self.prev, &self.head);
        self.prev.set_boundary(&self.inflow, &outflow);
        self.mid.copy_from(&self.prev);
        self.next.copy_from(&self.prev);

        let slopes = slope_profile(&*bed, &self.prev);

        predict_mid_velocity(&self.prev, &mut self.mid, &self.head, &slopes, &ctx)?;

        advance_thickness(
            &self.prev,
            &self.mid,
            &mut self.next,
            &self.head,
            &ctx,
            &mut self.stats,
        )?;
        advance_concentration(
            &self.prev,
            &self.mid,
            &mut self.next,
            &self.head,
            &ctx,
            &mut self.exchange,
            bed,
            &mut self.stats,
        )?;

        let outflow = outflow_node(&self.next, &self.head);
        self.next.set_boundary(&self.inflow, &outflow);
        average_midpoint(&self.prev, &self.next, &mut self.mid);
        correct_velocity(
            &self.prev,
            &self.mid,
            &mut self.next,
            &self.head,
            &slopes,
            &ctx,
            &mut self.stats,
        )?;

        self.head.advance(&self.next, self.reduced_gravity, self.constants.g, self.dt);
        std::mem::swap(&mut self.prev, &mut self.next);
        Ok(())
    }

    /// Iterate until `t > 2 × duration` or a step fails.
    fn run<F>(
        mut self,
        flood: &FloodRecord,
        report_interval_pct: u32,
        bed: &mut dyn BedArchitecture,
        mut callback: F,
    ) -> SakuraOutput
    where
        F: FnMut(&StepView<'_>),
    {
        let t_end = 2.0 * flood.duration;
        let mut reporter = ProgressReporter::new(t_end, report_interval_pct);
        let mut t = 0.0;
        let mut failure = None;

        log::info!(
            "sakura: {} nodes, {} grain classes, dt={}s, t_end={}s, bed={}",
            self.prev.len(),
            self.sediment.len(),
            self.dt,
            t_end,
            bed.name()
        );

        self.state = RunState::Iterating;
        while t <= t_end {
            if t > flood.duration && !self.inflow.is_zero() {
                log::info!("sediment supply stopped at t={:.1}s", t);
                self.inflow.clear();
            }

            if let Err(f) = self.step(bed) {
                log::error!("step {} failed at t={:.1}s: {}", reporter.n_steps() + 1, t, f);
                failure = Some(f);
                break;
            }

            t += self.dt;
            reporter.step();
            log::debug!(
                "step {} t={:.1}s head={:.1}m (node {})",
                reporter.n_steps(),
                t,
                self.head.position(),
                self.head.index()
            );
            let balance = (report_interval_pct > 0).then(|| {
                let StepStats { mass_in, mass_out, .. } = self.stats;
                MassBalance::from_state(&self.prev, self.sediment, mass_in, mass_out)
            });
            reporter.maybe_report(t, self.head.position(), balance.as_ref());
            callback(&StepView {
                state: &self.prev,
                head: &self.head,
                stats: &self.stats,
                time: t,
                step: reporter.n_steps(),
            });
        }

        let final_state = if failure.is_some() {
            self.state = RunState::FallbackDeposit;
            let dumped = self.exchange.deposit_all(&mut self.next, bed);
            self.stats.deposited += dumped;
            log::warn!("fallback deposition of {:.4e} m³ of suspended sediment", dumped);
            &self.next
        } else {
            self.state = RunState::Success;
            &self.prev
        };

        let StepStats { mass_in, mass_out, .. } = self.stats;
        let mass_balance = MassBalance::from_state(final_state, self.sediment, mass_in, mass_out);
        let deposit = deposit_thickness(final_state, self.sediment, self.constants.rho_sea_water);

        if self.stats.anomalies() > 0 {
            log::warn!(
                "{} clamped thickness, {} clamped concentration, {} negative velocity events",
                self.stats.negative_thickness,
                self.stats.negative_concentration,
                self.stats.negative_velocity
            );
        }

        let output = SakuraOutput {
            deposit,
            success: failure.is_none(),
            state: self.state,
            failure,
            n_steps: reporter.n_steps(),
            final_time: t,
            head_position: self.head.position(),
            mass_balance,
            stats: self.stats,
        };
        log::info!("sakura finished in {}: {}", reporter.elapsed(), output.summary_line());
        log::debug!("mass balance:\n{}", mass_balance.detailed());
        output
    }
}

/// Net deposit thickness `[grain][node]` from the exchange tallies.
///
/// Solid volumes are converted to bulk deposit volume with each grain's
/// solid fraction and spread over the cell footprint.
fn deposit_thickness(
    state: &FlowArray,
    sediment: &[SedimentClass],
    rho_water: f64,
) -> Vec<Vec<f64>> {
    sediment
        .iter()
        .enumerate()
        .map(|(n, class)| {
            let solid_fraction = class.solid_fraction(rho_water);
            (0..state.len() as isize)
                .map(|i| {
                    let solid = state.deposited(i)[n] - state.eroded(i)[n];
                    solid / solid_fraction / state.cell_area(i)
                })
                .collect()
        })
        .collect()
}

// =============================================================================
// Entry point
// =============================================================================

/// Run a turbidity current fed by `flood` over the seabed `bed`.
///
/// Inputs are validated before any state is allocated. `constants` is
/// read in user units (bed strength in kPa) and never modified.
///
/// # Errors
/// Returns a [`SakuraError`] for invalid inputs. Numerical failures during
/// stepping are reported through [`SakuraOutput::success`] instead.
pub fn run_sakura(
    config: &RunConfig,
    flood: &FloodRecord,
    sediment: &[SedimentClass],
    constants: &FlowConstants,
    bed: &mut dyn BedArchitecture,
) -> Result<SakuraOutput> {
    run_sakura_with_callback(config, flood, sediment, constants, bed, |_| {})
}

/// Run with a callback invoked after every successful step.
///
/// The callback sees the state the next step starts from. It is not
/// called for a failed step.
pub fn run_sakura_with_callback<F>(
    config: &RunConfig,
    flood: &FloodRecord,
    sediment: &[SedimentClass],
    constants: &FlowConstants,
    bed: &mut dyn BedArchitecture,
    callback: F,
) -> Result<SakuraOutput>
where
    F: FnMut(&StepView<'_>),
{
    config.validate()?;
    constants.validate()?;
    if sediment.is_empty() {
        return Err(SakuraError::NoGrains);
    }
    for (grain, class) in sediment.iter().enumerate() {
        class.validate(grain, constants.rho_sea_water)?;
    }
    flood.validate(sediment.len())?;

    let model = constants.to_model_units();
    let reduced_gravity: Vec<f64> = sediment
        .iter()
        .map(|s| s.reduced_gravity(model.rho_sea_water))
        .collect();

    let driver = Driver::new(config, flood, sediment, &model, &reduced_gravity)?;
    Ok(driver.run(flood, config.report_interval_pct, bed, callback))
}
