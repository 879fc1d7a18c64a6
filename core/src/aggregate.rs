//! Cohort KPIs and the search / segment-chip view.
//!
//! Chip counts are always taken over the UNFILTERED population so they
//! hold still while the user types a search. The summary block is taken
//! over whatever rows the view currently shows.

use crate::{classifier::Segment, scoring::SegRecord};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub total:          usize,
    /// Every segment present, zero counts included, in rule order.
    pub segment_counts: BTreeMap<Segment, usize>,
    pub avg_spend:      f64,
    pub median_recency: f64,
}

pub fn summarize<'a, I>(records: I) -> CohortSummary
where
    I: IntoIterator<Item = &'a SegRecord>,
{
    let mut segment_counts = empty_counts();
    let mut spend_total = 0.0;
    let mut recency = Vec::new();

    for rec in records {
        *segment_counts.entry(rec.segment).or_insert(0) += 1;
        spend_total += rec.customer.total_spend;
        recency.push(rec.scores.recency_days);
    }

    let total = recency.len();
    let avg_spend = if total == 0 { 0.0 } else { spend_total / total as f64 };

    CohortSummary {
        total,
        segment_counts,
        avg_spend,
        median_recency: median(&mut recency),
    }
}

/// Per-segment counts with every segment present.
pub fn segment_counts<'a, I>(records: I) -> BTreeMap<Segment, usize>
where
    I: IntoIterator<Item = &'a SegRecord>,
{
    let mut counts = empty_counts();
    for rec in records {
        *counts.entry(rec.segment).or_insert(0) += 1;
    }
    counts
}

fn empty_counts() -> BTreeMap<Segment, usize> {
    Segment::ALL.into_iter().map(|s| (s, 0)).collect()
}

/// Median of day counts; the mean of the two central values for even
/// lengths, 0 for an empty slice.
pub fn median(values: &mut [u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] as f64 + values[mid] as f64) / 2.0
    } else {
        values[mid] as f64
    }
}

// ── View query ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentFilter {
    #[default]
    All,
    Only(Segment),
}

impl SegmentFilter {
    pub fn matches(&self, segment: Segment) -> bool {
        match self {
            Self::All        => true,
            Self::Only(only) => *only == segment,
        }
    }
}

impl fmt::Display for SegmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All     => f.write_str("ALL"),
            Self::Only(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl FromStr for SegmentFilter {
    type Err = crate::error::RfmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ALL" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl Serialize for SegmentFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SegmentFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    pub search:  String,
    pub segment: SegmentFilter,
}

impl ViewQuery {
    /// Case-insensitive substring over name / email / phone, then segment.
    pub fn matches(&self, rec: &SegRecord) -> bool {
        if !self.segment.matches(rec.segment) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let c = &rec.customer;
        [Some(&c.name), c.email.as_ref(), c.phone.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || self.segment != SegmentFilter::All
    }
}

pub fn filter_view<'a>(records: &'a [SegRecord], query: &ViewQuery) -> Vec<&'a SegRecord> {
    records.iter().filter(|rec| query.matches(rec)).collect()
}

/// What a dashboard shows for one query over one scored population.
#[derive(Debug, Clone)]
pub struct PopulationView<'a> {
    /// Over the full population, independent of the query.
    pub chip_counts: BTreeMap<Segment, usize>,
    pub rows:        Vec<&'a SegRecord>,
    /// Over `rows`.
    pub summary:     CohortSummary,
    pub filtered:    bool,
}

impl<'a> PopulationView<'a> {
    pub fn build(records: &'a [SegRecord], query: &ViewQuery) -> Self {
        let rows = filter_view(records, query);
        let summary = summarize(rows.iter().copied());
        Self {
            chip_counts: segment_counts(records),
            rows,
            summary,
            filtered: query.is_filtered(),
        }
    }
}
