//! Raw per-customer R/F/M metrics, aligned by index with the customer list.

use crate::normalizer::Customer;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub recency_days: Vec<u64>,
    pub frequency:    Vec<f64>,
    pub monetary:     Vec<f64>,
}

impl Metrics {
    pub fn len(&self) -> usize {
        self.recency_days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recency_days.is_empty()
    }

    /// Recency as floats, the input shape the binning engine takes.
    pub fn recency_as_f64(&self) -> Vec<f64> {
        self.recency_days.iter().map(|&d| d as f64).collect()
    }
}

pub fn extract(customers: &[Customer], as_of: NaiveDate) -> Metrics {
    let reference = as_of_instant(as_of);
    Metrics {
        recency_days: customers
            .iter()
            .map(|c| recency_days(reference, c.last_visit))
            .collect(),
        frequency: customers.iter().map(|c| c.visits).collect(),
        monetary:  customers.iter().map(|c| c.total_spend).collect(),
    }
}

/// Whole days between `reference` and `last_visit`, in either direction.
/// A last visit after the as-of day counts the same as one before it.
pub fn recency_days(reference: NaiveDateTime, last_visit: NaiveDateTime) -> u64 {
    let ms = (reference - last_visit).num_milliseconds().unsigned_abs();
    ms / MS_PER_DAY as u64
}

/// The as-of day as an instant: midnight UTC.
pub fn as_of_instant(as_of: NaiveDate) -> NaiveDateTime {
    as_of.and_time(chrono::NaiveTime::MIN)
}
