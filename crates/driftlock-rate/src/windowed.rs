use driftlock_math::div_q_headroom;

use crate::config::RateConfig;
use crate::ring::{Bucket, BucketRing};
use crate::source::RateSource;

/// Sliding-window rate accumulator.
///
/// Arrivals accumulate into a running bucket; at commit points at least one
/// bucket-span apart the running bucket is pushed into a fixed ring covering
/// the whole window. The reported rate is total frames over total ticks,
/// running bucket included, which averages out transaction-level jitter
/// while still tracking genuine drift within one window length.
///
/// A reseed does not start from an empty window: the most recent second's
/// worth of slots is stamped with perfect nominal-rate buckets, damping the
/// estimate for roughly one window after startup.
#[derive(Debug, Clone)]
pub struct WindowedRate {
    ring: BucketRing,
    pending_frames: u32,
    bucket_start: u32,
    first_arrival: bool,
    last_rate: u32,

    nominal: u32,
    rate_q: u32,
    ticks_per_bucket: u32,
    seed: Bucket,
    seeded_slots: usize,
}

impl WindowedRate {
    pub fn new(config: &RateConfig) -> Self {
        let nominal = config.nominal_rate();
        Self {
            ring: BucketRing::new(config.ring_capacity()),
            pending_frames: 0,
            bucket_start: 0,
            first_arrival: true,
            last_rate: nominal,
            nominal,
            rate_q: config.rate_q,
            ticks_per_bucket: config.ticks_per_bucket(),
            seed: Bucket {
                frames: config.frames_per_bucket(),
                span_ticks: config.ticks_per_bucket(),
            },
            seeded_slots: config.buckets_per_second as usize,
        }
    }

    /// Committed window contents.
    pub fn buckets(&self) -> &BucketRing {
        &self.ring
    }

    /// Window average at `now`, including the in-flight bucket; nominal
    /// while the estimator is waiting for its seeding arrival.
    pub fn estimate_at(&self, now: u32) -> u32 {
        if self.first_arrival {
            return self.nominal;
        }
        let (frames, ticks) = self.ring.totals();
        let total_frames = frames.wrapping_add(self.pending_frames);
        let total_ticks = ticks.wrapping_add(now.wrapping_sub(self.bucket_start));
        div_q_headroom(total_frames, total_ticks, self.rate_q)
    }

    fn reseed(&mut self, now: u32) {
        self.pending_frames = 0;
        self.bucket_start = now;
        self.ring.reinit(self.seeded_slots, self.seed);
        self.last_rate = self.nominal;
    }
}

impl RateSource for WindowedRate {
    fn reset(&mut self) {
        self.first_arrival = true;
        self.last_rate = self.nominal;
    }

    fn update(&mut self, now: u32, frames: u32, commit: bool, held: bool) -> u32 {
        if self.first_arrival {
            self.first_arrival = false;
            self.reseed(now);
            return self.nominal;
        }

        if held {
            // Drop in-flight accumulation but leave committed history alone;
            // the next arrival performs the full reseed.
            self.pending_frames = 0;
            self.bucket_start = now;
            self.first_arrival = true;
            self.last_rate = self.nominal;
            return self.nominal;
        }

        self.pending_frames = self.pending_frames.wrapping_add(frames);

        let elapsed = now.wrapping_sub(self.bucket_start);
        if commit && elapsed >= self.ticks_per_bucket {
            self.ring.push(Bucket {
                frames: self.pending_frames,
                span_ticks: elapsed,
            });
            self.pending_frames = 0;
            self.bucket_start = now;
        }

        let rate = self.estimate_at(now);
        self.last_rate = rate;
        rate
    }

    fn current(&self) -> u32 {
        self.last_rate
    }
}
