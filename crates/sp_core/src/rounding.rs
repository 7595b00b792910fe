//! Rounding policy: round-half-away-from-zero, applied uniformly.
//!
//! `f64::round` already rounds halfway cases away from zero, so every helper
//! here is a thin, named wrapper around it. Vote counts, voter counts and the
//! 2-decimal percentages in the output table all go through this module.

/// Round to the nearest integer, halfway cases away from zero.
#[inline]
pub fn round_half_away(x: f64) -> f64 {
    x.round()
}

/// Round to a non-negative integer count. Non-finite and negative inputs clamp to 0.
#[inline]
pub fn round_to_count(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    round_half_away(x) as u64
}

/// Round to `dp` decimal places, halfway cases away from zero.
#[inline]
pub fn round_dp(x: f64, dp: u32) -> f64 {
    let scale = 10f64.powi(dp as i32);
    round_half_away(x * scale) / scale
}

/// Round to 2 decimals (percentages in the output table).
#[inline]
pub fn round_2dp(x: f64) -> f64 {
    round_dp(x, 2)
}

/// `part / whole * 100`; an empty whole yields 0.
#[inline]
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round_half_away(562.5), 563.0);
        assert_eq!(round_half_away(0.5), 1.0);
        assert_eq!(round_half_away(-0.5), -1.0);
        assert_eq!(round_half_away(2.4999), 2.0);
    }

    #[test]
    fn counts_clamp_at_zero() {
        assert_eq!(round_to_count(-3.2), 0);
        assert_eq!(round_to_count(f64::NAN), 0);
        assert_eq!(round_to_count(f64::INFINITY), 0);
        assert_eq!(round_to_count(315.79), 316);
    }

    #[test]
    fn two_decimals() {
        assert_eq!(round_2dp(43.24596774193548), 43.25);
        assert_eq!(round_2dp(13.508064516129032), 13.51);
        assert_eq!(round_2dp(26.4), 26.4);
    }

    #[test]
    fn percent_of_empty_whole_is_zero() {
        assert_eq!(percent_of(5, 0), 0.0);
        assert_eq!(percent_of(316, 500), 63.2);
    }
}
