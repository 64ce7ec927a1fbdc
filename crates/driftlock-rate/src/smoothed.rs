use driftlock_math::{div_q_wide, ema_q31};

use crate::config::RateConfig;
use crate::source::RateSource;

/// Exponentially smoothed per-transaction rate.
///
/// Constant-memory alternative to [`WindowedRate`](crate::WindowedRate):
/// each arrival's instantaneous rate (frames over ticks since the previous
/// arrival) is folded into a single-pole filter weighted heavily toward
/// history. Smoother and smaller, slower to react to genuine drift.
///
/// Arrivals must be at least one reference tick apart; a zero span is a
/// transport contract violation and panics in the divide.
#[derive(Debug, Clone)]
pub struct SmoothedRate {
    state: u32,
    prev_timestamp: u32,
    first_arrival: bool,

    nominal: u32,
    alpha_q31: u32,
    rate_q: u32,
}

impl SmoothedRate {
    pub fn new(config: &RateConfig) -> Self {
        let nominal = config.nominal_rate();
        Self {
            state: nominal,
            prev_timestamp: 0,
            first_arrival: true,
            nominal,
            alpha_q31: config.ema_alpha_q31,
            rate_q: config.rate_q,
        }
    }
}

impl RateSource for SmoothedRate {
    fn reset(&mut self) {
        self.first_arrival = true;
        self.state = self.nominal;
    }

    fn update(&mut self, now: u32, frames: u32, _commit: bool, held: bool) -> u32 {
        if self.first_arrival {
            self.first_arrival = false;
            self.prev_timestamp = now;
            self.state = self.nominal;
            return self.nominal;
        }

        if held {
            self.prev_timestamp = now;
            self.state = self.nominal;
            self.first_arrival = true;
            return self.nominal;
        }

        let span = now.wrapping_sub(self.prev_timestamp);
        self.prev_timestamp = now;

        let instantaneous = div_q_wide(frames as u64, span, self.rate_q);
        self.state = ema_q31(self.state, instantaneous, self.alpha_q31);
        self.state
    }

    fn current(&self) -> u32 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS_PER_MS: u32 = 100_000;

    #[test]
    fn nominal_traffic_is_a_fixed_point() {
        let mut lane = SmoothedRate::new(&RateConfig::default());
        let nominal = lane.nominal;
        assert_eq!(lane.update(0, 48, true, false), nominal);
        for ms in 1..=50 {
            assert_eq!(lane.update(ms * TICKS_PER_MS, 48, true, false), nominal);
        }
    }

    #[test]
    fn hold_reseeds_to_nominal() {
        let mut lane = SmoothedRate::new(&RateConfig::default());
        lane.update(0, 48, true, false);
        for ms in 1..=50 {
            lane.update(ms * TICKS_PER_MS, 96, true, false);
        }
        assert!(lane.current() > lane.nominal);

        assert_eq!(lane.update(51 * TICKS_PER_MS, 48, true, true), lane.nominal);
        assert_eq!(lane.current(), lane.nominal);
    }
}
