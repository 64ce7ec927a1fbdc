use std::sync::Arc;

use crate::activity::LinkActivity;
use crate::config::{ConfigError, RateConfig, Strategy};
use crate::direction::{Direction, PerDirection};
use crate::smoothed::SmoothedRate;
use crate::source::RateSource;
use crate::watchdog::SilenceWatchdog;
use crate::windowed::WindowedRate;

#[derive(Debug)]
struct Lane {
    source: Box<dyn RateSource>,
    bytes_per_frame: u32,
}

/// Per-direction rate recovery facade.
///
/// Owns one estimator per [`Direction`] (strategy fixed at construction)
/// plus the [`LinkActivity`] flags shared with the silence watchdog. The
/// transport's completion path calls [`on_arrival`](Self::on_arrival); the
/// downstream sample-rate converter reads [`rate`](Self::rate) on demand.
///
/// All allocation happens in [`new`](Self::new); the arrival path is
/// allocation-free and O(window size).
#[derive(Debug)]
pub struct RateEstimator {
    lanes: PerDirection<Lane>,
    activity: Arc<LinkActivity>,
    config: RateConfig,
    nominal: u32,
}

impl RateEstimator {
    pub fn new(config: RateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lanes = PerDirection::new(|dir| Lane {
            source: match config.strategy {
                Strategy::Windowed => {
                    Box::new(WindowedRate::new(&config)) as Box<dyn RateSource>
                }
                Strategy::Smoothed => Box::new(SmoothedRate::new(&config)),
            },
            bytes_per_frame: config.formats[dir].bytes_per_frame(),
        });
        Ok(Self {
            lanes,
            activity: Arc::new(LinkActivity::new()),
            nominal: config.nominal_rate(),
            config,
        })
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// The configured rate in frames per reference tick; startup and hold
    /// fallback value.
    pub fn nominal_rate(&self) -> u32 {
        self.nominal
    }

    /// Shared flag handle for the watchdog and the transport completion
    /// path.
    pub fn activity(&self) -> Arc<LinkActivity> {
        Arc::clone(&self.activity)
    }

    /// A silence watchdog pre-wired to this estimator's activity flags, at
    /// the configured threshold.
    pub fn watchdog(&self) -> SilenceWatchdog {
        SilenceWatchdog::new(self.activity(), self.config.silence_threshold_ticks)
    }

    /// Folds one completed transfer into `direction`'s estimate and returns
    /// the refreshed value.
    ///
    /// `timestamp` is a reference-clock reading taken at completion time,
    /// `byte_len` the raw transfer length (converted to frames via the
    /// direction's [`ChannelFormat`](crate::ChannelFormat)), and `commit`
    /// marks candidate bucket-rotation points. If the watchdog tripped since
    /// the previous arrival, this call reports nominal, discards in-flight
    /// accumulation and clears the direction's hold flag.
    pub fn on_arrival(
        &mut self,
        direction: Direction,
        timestamp: u32,
        byte_len: u32,
        commit: bool,
    ) -> u32 {
        self.activity.note_arrival();
        let held = self.activity.take_hold(direction);
        let lane = &mut self.lanes[direction];
        let frames = byte_len / lane.bytes_per_frame;
        lane.source.update(timestamp, frames, commit, held)
    }

    /// Most recent estimate for `direction`; nominal before any arrival.
    pub fn rate(&self, direction: Direction) -> u32 {
        self.lanes[direction].source.current()
    }

    /// Discards all accumulated history, e.g. on a stream restart. The next
    /// arrival in each direction reseeds at its own timestamp. Synchronous
    /// and immediate.
    pub fn reset(&mut self) {
        for dir in Direction::ALL {
            self.lanes[dir].source.reset();
        }
    }
}
