use std::sync::Arc;

use crate::activity::LinkActivity;

/// Detects loss of host traffic from a fixed-period heartbeat.
///
/// The transport calls [`LinkActivity::note_arrival`] on every completed
/// transfer; this watchdog ticks on an independent periodic source (one call
/// per USB frame, i.e. per millisecond). Once more than `threshold`
/// consecutive ticks pass without an arrival, every direction is forced into
/// hold and the estimators fall back to the nominal rate until traffic
/// resumes.
#[derive(Debug)]
pub struct SilenceWatchdog {
    activity: Arc<LinkActivity>,
    threshold: u32,
    silent_ticks: u32,
}

impl SilenceWatchdog {
    pub fn new(activity: Arc<LinkActivity>, threshold: u32) -> Self {
        Self {
            activity,
            threshold,
            silent_ticks: 0,
        }
    }

    /// Heartbeat. Never blocks; only flips the shared flags.
    pub fn on_tick(&mut self) {
        if self.activity.take_arrival() {
            self.silent_ticks = 0;
            return;
        }
        self.silent_ticks = self.silent_ticks.saturating_add(1);
        if self.silent_ticks > self.threshold && !self.activity.all_held() {
            self.activity.hold_all();
        }
    }

    /// Consecutive ticks seen without an arrival.
    pub fn silent_ticks(&self) -> u32 {
        self.silent_ticks
    }
}
