//! Reusable numeric helpers for report tables.
//!
//! All rounding is half-to-even (2.5 → 2, 3.5 → 4).

/// Arithmetic mean. Returns 0.0 if the slice is empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to one decimal place, ties to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `num / den` rounded to the nearest integer, ties to even. Exact.
fn div_ties_even(num: u64, den: u64) -> u64 {
    let q = num / den;
    let twice_rem = 2 * (num % den);
    if twice_rem > den || (twice_rem == den && q % 2 == 1) {
        q + 1
    } else {
        q
    }
}

/// `part / total` as a whole percentage, ties to even. 0 when total is 0.
pub fn whole_pct(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    div_ties_even(part as u64 * 100, total as u64) as u32
}

/// `part / total` as a percentage with one decimal. 0.0 when total is 0.
pub fn pct1(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    div_ties_even(part as u64 * 1000, total as u64) as f64 / 10.0
}

/// Within/crossed whole percentages that always sum to 100 when
/// `within + crossed > 0`. Crossed is rounded independently; within is
/// corrected from it whenever rounding breaks the sum.
pub fn split_pct(within: usize, crossed: usize) -> (u32, u32) {
    let total = within + crossed;
    if total == 0 {
        return (0, 0);
    }
    let crossed_pct = whole_pct(crossed, total);
    let mut within_pct = whole_pct(within, total);
    if within_pct + crossed_pct != 100 {
        within_pct = 100 - crossed_pct;
    }
    (within_pct, crossed_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_known() {
        // (2 + 4 + 6) / 3 = 4.0
        assert!((mean(&[2.0, 4.0, 6.0]) - 4.0).abs() < 1e-10);
    }

    // --- rounding ---

    #[test]
    fn test_round1() {
        assert_eq!(round1(1.0 / 3.0), 0.3);
        assert_eq!(round1(2.25), 2.2);
        assert_eq!(round1(2.35), 2.4);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_whole_pct_ties_to_even() {
        // 1/8 = 12.5 → 12, 3/8 = 37.5 → 38
        assert_eq!(whole_pct(1, 8), 12);
        assert_eq!(whole_pct(3, 8), 38);
        assert_eq!(whole_pct(1, 2), 50);
        assert_eq!(whole_pct(3, 0), 0);
    }

    #[test]
    fn test_whole_pct_exact_ties() {
        // 57.5 → 58, 54.5 → 54; a float quotient lands on the wrong side
        assert_eq!(whole_pct(23, 40), 58);
        assert_eq!(whole_pct(46, 80), 58);
        assert_eq!(whole_pct(109, 200), 54);
        assert_eq!(split_pct(17, 23), (42, 58));
    }

    #[test]
    fn test_whole_pct_matches_rational_rounding() {
        for total in 1..=500usize {
            for part in 0..=total {
                let twice = 200 * part;
                let (q, r) = (twice / (2 * total), twice % (2 * total));
                let want = if r > total || (r == total && q % 2 == 1) { q + 1 } else { q };
                assert_eq!(whole_pct(part, total) as usize, want, "{}/{}", part, total);
            }
        }
    }

    #[test]
    fn test_pct1() {
        assert_eq!(pct1(1, 3), 33.3);
        assert_eq!(pct1(2, 3), 66.7);
        assert_eq!(pct1(0, 0), 0.0);
        // 1/16 = 6.25 → 6.2, 3/16 = 18.75 → 18.8
        assert_eq!(pct1(1, 16), 6.2);
        assert_eq!(pct1(3, 16), 18.8);
    }

    // --- split_pct ---

    #[test]
    fn test_split_pct_sums_to_100() {
        for total in 1..=40usize {
            for crossed in 0..=total {
                let (w, c) = split_pct(total - crossed, crossed);
                assert_eq!(w + c, 100, "within={} crossed={}", total - crossed, crossed);
            }
        }
    }

    #[test]
    fn test_split_pct_crossed_authoritative() {
        // 1/8 crossed = 12.5 → 12, 7/8 within = 87.5 → 88 → corrected to 88
        assert_eq!(split_pct(7, 1), (88, 12));
        // 1/3 crossed = 33.3 → 33, within 66.7 → 67
        assert_eq!(split_pct(2, 1), (67, 33));
        // 5/8 crossed = 62.5 → 62, within 37.5 → 38
        assert_eq!(split_pct(3, 5), (38, 62));
    }

    #[test]
    fn test_split_pct_empty() {
        assert_eq!(split_pct(0, 0), (0, 0));
    }
}
