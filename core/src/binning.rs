//! Quantile binning engine.
//!
//! Scores are cohort-relative: a value's score is its percentile rank
//! against the values passed in the same call. Re-running over a
//! different cohort changes what each score means.
//!
//! The rank is RIGHT-EXCLUSIVE: the index of the first sorted value
//! strictly greater than x, so every value tied with x counts as
//! "at or below" it. The cohort maximum therefore lands on p = 1.0 and
//! is pulled back into range by the final clamp. Do not swap this for
//! a textbook quantile.

use crate::types::Score;

/// Score each value into `[1, bins]` by percentile rank.
///
/// With `higher_is_better == false` the scale is flipped, so the
/// smallest values score highest (used for recency in days).
pub fn score_by_quantiles(values: &[f64], bins: u8, higher_is_better: bool) -> Vec<Score> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut ranks = values.to_vec();
    ranks.sort_by(f64::total_cmp);

    values
        .iter()
        .map(|&x| {
            let index = ranks.partition_point(|&r| r <= x);
            bucket(index, ranks.len(), bins, higher_is_better)
        })
        .collect()
}

/// Percentile bucket for a right-exclusive rank `index` out of `len`.
fn bucket(index: usize, len: usize, bins: u8, higher_is_better: bool) -> Score {
    let mut sc = unclamped_score(index, len, bins);
    let bins = i64::from(bins);
    if !higher_is_better {
        sc = bins - sc + 1;
    }
    sc.clamp(1, bins) as Score
}

/// The raw (pre-clamp) score. Exposed for property checks.
pub fn unclamped_score(index: usize, len: usize, bins: u8) -> i64 {
    let p = index as f64 / len as f64;
    (p * f64::from(bins)).floor() as i64 + 1
}
