//! Adaptive sample-rate recovery for audio endpoints on a jittery periodic
//! transport.
//!
//! A USB audio device cannot observe the host's sample clock directly: all it
//! sees are byte counts arriving on (or requested from) its isochronous
//! endpoints, timestamped against a local reference clock. This crate turns
//! that noisy, integer-only signal into a stable fixed-point estimate of the
//! host's true rate, in frames per reference-clock tick, for a downstream
//! asynchronous sample-rate converter to consume.
//!
//! Two strategies implement the same capability ([`RateSource`]), selected at
//! construction via [`RateConfig::strategy`]:
//!
//! - [`WindowedRate`] keeps a ring of time-sliced arrival buckets and reports
//!   the average over a multi-second sliding window. Robust to
//!   transaction-level jitter at the cost of a larger working set.
//! - [`SmoothedRate`] exponentially smooths the per-transaction rate.
//!   Constant memory, slower to react.
//!
//! The [`SilenceWatchdog`] runs on an independent heartbeat and forces both
//! into a "hold at nominal" state when host traffic stops; the next arrival
//! in each direction exits hold and reseeds.
//!
//! # Reference-clock wrap
//!
//! Timestamps are raw `u32` ticks of the reference clock (100 MHz by default)
//! and wrap at 2^32. Elapsed spans use wrapping subtraction, which stays
//! correct across a single wrap; a span that itself exceeds 2^32 ticks
//! (about 42.9 s at the default rate) silently aliases. Accumulation windows
//! are kept well below that; the limitation is documented rather than
//! corrected.
//!
//! # Concurrency
//!
//! Each direction's [`RateEstimator::on_arrival`] is driven from that
//! direction's transfer-completion path only. The watchdog tick runs on its
//! own periodic source and communicates exclusively through the
//! [`LinkActivity`] flags, which are relaxed atomics: the only contract is
//! that a store becomes visible to the other side within roughly one tick.
//! Nothing on the estimation path blocks, allocates or suspends.

mod activity;
mod config;
mod direction;
mod estimator;
mod ring;
mod smoothed;
mod source;
mod watchdog;
mod windowed;

pub use activity::LinkActivity;
pub use config::{ChannelFormat, ConfigError, RateConfig, Strategy, DEFAULT_EMA_ALPHA_Q31};
pub use direction::{Direction, PerDirection};
pub use estimator::RateEstimator;
pub use ring::{Bucket, BucketRing};
pub use smoothed::SmoothedRate;
pub use source::RateSource;
pub use watchdog::SilenceWatchdog;
pub use windowed::WindowedRate;
