//! Scoring stage: customers -> metrics -> three binning passes -> segment.
//!
//! Recency is binned inverted (fewer days = better). Frequency and
//! monetary are binned as-is. All three passes see the same cohort.

use crate::{
    binning::score_by_quantiles,
    classifier::{classify, Segment},
    metrics::extract,
    normalizer::Customer,
    types::Score,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub r: Score,
    pub f: Score,
    pub m: Score,
    /// Informational only; never re-scored.
    pub recency_days: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegRecord {
    pub customer: Customer,
    pub scores:   Scores,
    pub segment:  Segment,
}

pub fn score_population(customers: Vec<Customer>, as_of: NaiveDate, bins: u8) -> Vec<SegRecord> {
    let metrics = extract(&customers, as_of);

    let r = score_by_quantiles(&metrics.recency_as_f64(), bins, false);
    let f = score_by_quantiles(&metrics.frequency, bins, true);
    let m = score_by_quantiles(&metrics.monetary, bins, true);

    customers
        .into_iter()
        .enumerate()
        .map(|(i, customer)| {
            let scores = Scores {
                r: r[i],
                f: f[i],
                m: m[i],
                recency_days: metrics.recency_days[i],
            };
            SegRecord {
                customer,
                segment: classify(scores.r, scores.f, scores.m, bins),
                scores,
            }
        })
        .collect()
}
