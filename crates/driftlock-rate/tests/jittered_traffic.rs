//! Transaction-level timing jitter must wash out of the windowed average.

use driftlock_rate::{Direction, RateConfig, RateEstimator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TICKS_PER_MS: u32 = 100_000;

#[test]
fn jittered_completion_times_stay_within_half_a_percent_of_nominal() {
    let mut est = RateEstimator::new(RateConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(0x0b0c_4a17);

    // Completion timestamps wobble +/-50us around the 1 ms schedule but stay
    // anchored to it, as isochronous transfers do; payloads are nominal.
    est.on_arrival(Direction::Out, 0, 192, true);
    let mut rate = 0;
    for ms in 1..=8_000u32 {
        let jitter: i32 = rng.gen_range(-5_000..=5_000);
        let timestamp = (ms * TICKS_PER_MS).wrapping_add_signed(jitter);
        rate = est.on_arrival(Direction::Out, timestamp, 192, true);
    }

    let nominal = est.nominal_rate() as f64;
    let error = (rate as f64 - nominal).abs() / nominal;
    assert!(error < 0.005, "rate {rate} vs nominal {nominal}");
}
