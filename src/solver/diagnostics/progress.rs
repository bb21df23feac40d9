//! Progress logging for long runs.

use std::time::Instant;

use super::mass_balance::MassBalance;

/// Logs progress at fixed percentage intervals of the run length.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    start_instant: Instant,
    total_time: f64,
    last_reported_pct: u32,
    report_interval_pct: u32,
    n_steps: usize,
}

impl ProgressReporter {
    /// Create a reporter for a run of `total_time` seconds.
    ///
    /// An interval of zero disables reporting.
    pub fn new(total_time: f64, report_interval_pct: u32) -> Self {
        Self {
            start_instant: Instant::now(),
            total_time,
            last_reported_pct: 0,
            report_interval_pct,
            n_steps: 0,
        }
    }

    /// Record a time step.
    pub fn step(&mut self) {
        self.n_steps += 1;
    }

    /// Number of recorded steps.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Log progress if the next threshold has been reached.
    ///
    /// Returns true if a report was logged.
    pub fn maybe_report(&mut self, time: f64, head: f64, balance: Option<&MassBalance>) -> bool {
        if self.report_interval_pct == 0 || self.total_time <= 0.0 {
            return false;
        }
        let pct = ((time / self.total_time) * 100.0) as u32;
        if pct < self.last_reported_pct + self.report_interval_pct {
            return false;
        }

        let elapsed = self.start_instant.elapsed().as_secs_f64();
        match balance {
            Some(mb) => log::info!(
                "[{:>3}%] t={:.1}s head={:.1}m steps={} wall={} | {}",
                pct,
                time,
                head,
                self.n_steps,
                format_duration(elapsed),
                mb.summary_line()
            ),
            None => log::info!(
                "[{:>3}%] t={:.1}s head={:.1}m steps={} wall={}",
                pct,
                time,
                head,
                self.n_steps,
                format_duration(elapsed)
            ),
        }
        self.last_reported_pct = (pct / self.report_interval_pct) * self.report_interval_pct;
        true
    }

    /// Wall-clock time since the reporter was created, formatted.
    pub fn elapsed(&self) -> String {
        format_duration(self.start_instant.elapsed().as_secs_f64())
    }
}

/// Format a duration in seconds as a human-readable string.
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        format!("{:.0}m{:.0}s", mins, secs - mins * 60.0)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{:.0}h{:.0}m", hours, mins)
    }
}
