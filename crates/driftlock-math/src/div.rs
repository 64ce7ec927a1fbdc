/// Count of unused leading bits in `value` (32 for zero).
pub fn headroom(value: u32) -> u32 {
    value.leading_zeros()
}

/// `floor(dividend * 2^q / divisor)`.
///
/// `divisor` must be non-zero; a zero divisor is a caller bug and panics.
pub fn div_q(dividend: u32, divisor: u32, q: u32) -> u32 {
    div_q_wide(dividend as u64, divisor, q)
}

/// `floor(dividend * 2^q / divisor)` with a 64-bit dividend.
///
/// Needed wherever `dividend << q` no longer fits 32 bits, e.g. deriving a
/// per-tick rate from a per-second one. Quotient bits above 32 are truncated;
/// callers pick `q` so the result fits.
pub fn div_q_wide(dividend: u64, divisor: u32, q: u32) -> u32 {
    debug_assert!(q <= 32);
    (((dividend as u128) << q) / divisor as u128) as u32
}

/// Headroom-maximizing variant of [`div_q`].
///
/// The dividend is shifted up by its headroom before dividing and the
/// quotient shifted back down afterwards, so the divide always sees every
/// significant bit of the dividend regardless of its magnitude. Use this
/// where the numerator varies widely, such as a total accumulated over a
/// long sliding window.
pub fn div_q_headroom(dividend: u32, divisor: u32, q: u32) -> u32 {
    debug_assert!(q <= 32);
    let hr = headroom(dividend);
    let quotient = ((dividend as u128) << (q + hr)) / divisor as u128;
    (quotient >> hr) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_q_is_a_plain_scaled_divide() {
        assert_eq!(div_q(1, 2, 8), 128);
        assert_eq!(div_q(48_000, 100_000_000, 32), 2_061_584);
        assert_eq!(div_q(7, 3, 0), 2);
    }

    #[test]
    fn div_q_wide_accepts_dividends_past_32_bits() {
        assert_eq!(div_q_wide(1 << 40, 1 << 20, 0), 1 << 20);
        assert_eq!(div_q_wide(48_000, 100_000_000, 32), 2_061_584);
    }

    #[test]
    fn headroom_counts_unused_leading_bits() {
        assert_eq!(headroom(0), 32);
        assert_eq!(headroom(1), 31);
        assert_eq!(headroom(u32::MAX), 0);
        assert_eq!(headroom(192_000), 14);
    }

    #[test]
    fn headroom_divide_handles_the_extremes() {
        assert_eq!(div_q_headroom(0, 12_345, 32), 0);
        assert_eq!(div_q_headroom(u32::MAX, u32::MAX, 31), 1 << 31);
        assert_eq!(div_q_headroom(48_000, 100_000_000, 32), 2_061_584);
    }
}
