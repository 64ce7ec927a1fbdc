use driftlock_math::{div_q_wide, Q31_ONE};
use thiserror::Error;

use crate::direction::PerDirection;

/// Q31 coefficient of the default smoothing filter (0.999: heavy weight on
/// history, a few hundred transactions of effective memory).
pub const DEFAULT_EMA_ALPHA_Q31: u32 = 2_145_336_164;

/// Sample layout of one direction's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelFormat {
    pub bytes_per_sample: u32,
    pub channels: u32,
}

impl ChannelFormat {
    /// Bytes per frame (one sample across every channel); converts a
    /// transfer's byte length to a frame count.
    pub fn bytes_per_frame(self) -> u32 {
        self.bytes_per_sample * self.channels
    }
}

impl Default for ChannelFormat {
    /// 16-bit stereo.
    fn default() -> Self {
        Self {
            bytes_per_sample: 2,
            channels: 2,
        }
    }
}

/// Estimation strategy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Sliding-window average over bucketed arrival history.
    #[default]
    Windowed,
    /// Exponentially smoothed per-transaction rate.
    Smoothed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("reference clock must be non-zero")]
    ZeroRefClock,

    #[error("channel format has a zero-sized frame")]
    ZeroFrameSize,

    #[error("window must hold at least one bucket")]
    EmptyWindow,

    #[error("rate Q format {0} is outside 1..=32")]
    InvalidQFormat(u32),

    #[error("smoothing coefficient {0:#010x} exceeds Q31 1.0")]
    AlphaOutOfRange(u32),

    #[error("reference clock {ref_clock_hz} Hz is not a whole number of ticks per bucket at {buckets_per_second} buckets/s")]
    FractionalBucketSpan {
        ref_clock_hz: u32,
        buckets_per_second: u32,
    },

    #[error("sample rate {sample_rate_hz} Hz is not a whole number of frames per bucket at {buckets_per_second} buckets/s")]
    FractionalBucketSeed {
        sample_rate_hz: u32,
        buckets_per_second: u32,
    },
}

/// Construction-time parameters for a [`RateEstimator`](crate::RateEstimator).
///
/// Defaults model a 48 kHz 16-bit stereo stream timed against a 100 MHz
/// reference clock, averaged over a 4 s window of quarter-second buckets.
#[derive(Debug, Clone, Copy)]
pub struct RateConfig {
    /// Nominal stream rate in frames per second.
    pub sample_rate_hz: u32,
    /// Reference clock rate; arrival timestamps are ticks of this clock.
    pub ref_clock_hz: u32,
    /// Per-direction sample layout, used to convert bytes to frames.
    pub formats: PerDirection<ChannelFormat>,
    /// Buckets committed per second of history.
    pub buckets_per_second: u32,
    /// Sliding-window length in seconds.
    pub window_seconds: u32,
    /// Consecutive silent heartbeat ticks tolerated before hold engages.
    pub silence_threshold_ticks: u32,
    /// Q31 coefficient for the smoothed strategy.
    pub ema_alpha_q31: u32,
    /// Q format of reported rates (frames per tick, `value / 2^rate_q`).
    pub rate_q: u32,
    pub strategy: Strategy,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48_000,
            ref_clock_hz: 100_000_000,
            formats: PerDirection::new(|_| ChannelFormat::default()),
            buckets_per_second: 4,
            window_seconds: 4,
            silence_threshold_ticks: 8,
            ema_alpha_q31: DEFAULT_EMA_ALPHA_Q31,
            rate_q: 32,
            strategy: Strategy::Windowed,
        }
    }
}

impl RateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.ref_clock_hz == 0 {
            return Err(ConfigError::ZeroRefClock);
        }
        if self.formats.iter().any(|(_, f)| f.bytes_per_frame() == 0) {
            return Err(ConfigError::ZeroFrameSize);
        }
        if self.buckets_per_second == 0 || self.window_seconds == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.rate_q == 0 || self.rate_q > 32 {
            return Err(ConfigError::InvalidQFormat(self.rate_q));
        }
        if self.ema_alpha_q31 > Q31_ONE {
            return Err(ConfigError::AlphaOutOfRange(self.ema_alpha_q31));
        }
        // Buckets must tile a second exactly, otherwise the seeded "perfect
        // second" written by a reseed would not sit at the nominal rate.
        if self.ref_clock_hz % self.buckets_per_second != 0 {
            return Err(ConfigError::FractionalBucketSpan {
                ref_clock_hz: self.ref_clock_hz,
                buckets_per_second: self.buckets_per_second,
            });
        }
        if self.sample_rate_hz % self.buckets_per_second != 0 {
            return Err(ConfigError::FractionalBucketSeed {
                sample_rate_hz: self.sample_rate_hz,
                buckets_per_second: self.buckets_per_second,
            });
        }
        Ok(())
    }

    /// The configured rate as frames per reference tick in `rate_q` format;
    /// startup and hold fallback value.
    pub fn nominal_rate(&self) -> u32 {
        div_q_wide(self.sample_rate_hz as u64, self.ref_clock_hz, self.rate_q)
    }

    /// Reference ticks spanned by one nominal bucket.
    pub fn ticks_per_bucket(&self) -> u32 {
        self.ref_clock_hz / self.buckets_per_second
    }

    /// Frames carried by one nominal bucket.
    pub fn frames_per_bucket(&self) -> u32 {
        self.sample_rate_hz / self.buckets_per_second
    }

    /// Ring capacity covering the whole window.
    pub fn ring_capacity(&self) -> usize {
        (self.window_seconds * self.buckets_per_second) as usize
    }
}
