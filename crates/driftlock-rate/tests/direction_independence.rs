//! OUT and IN estimates must never contaminate each other.

use driftlock_rate::{ChannelFormat, Direction, PerDirection, RateConfig, RateEstimator};

const TICKS_PER_MS: u32 = 100_000;

#[test]
fn fast_out_traffic_leaves_the_in_estimate_untouched() {
    let mut est = RateEstimator::new(RateConfig::default()).unwrap();
    let nominal = est.nominal_rate();

    est.on_arrival(Direction::Out, 0, 192, true);
    for ms in 1..=4_000u32 {
        est.on_arrival(Direction::Out, ms * TICKS_PER_MS, 384, true);
    }
    assert!(est.rate(Direction::Out) > nominal);

    // IN has seen no traffic at all: still the nominal fallback.
    assert_eq!(est.rate(Direction::In), nominal);

    // And once it does see traffic, it seeds from nominal, not from OUT's
    // history.
    let t0 = 5_000 * TICKS_PER_MS;
    assert_eq!(est.on_arrival(Direction::In, t0, 192, true), nominal);
    for ms in 1..=1_000u32 {
        let rate = est.on_arrival(Direction::In, t0 + ms * TICKS_PER_MS, 192, true);
        assert_eq!(rate, nominal);
    }
}

#[test]
fn per_direction_channel_formats_scale_byte_lengths_independently() {
    // OUT carries 16-bit stereo, IN 32-bit stereo: the same frame count per
    // transaction arrives as different byte lengths.
    let config = RateConfig {
        formats: PerDirection::new(|dir| match dir {
            Direction::Out => ChannelFormat {
                bytes_per_sample: 2,
                channels: 2,
            },
            Direction::In => ChannelFormat {
                bytes_per_sample: 4,
                channels: 2,
            },
        }),
        ..RateConfig::default()
    };
    let mut est = RateEstimator::new(config).unwrap();
    let nominal = est.nominal_rate();

    est.on_arrival(Direction::Out, 0, 192, true);
    est.on_arrival(Direction::In, 0, 384, true);
    for ms in 1..=1_000u32 {
        let t = ms * TICKS_PER_MS;
        assert_eq!(est.on_arrival(Direction::Out, t, 192, true), nominal);
        assert_eq!(est.on_arrival(Direction::In, t, 384, true), nominal);
    }
}
