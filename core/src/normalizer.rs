//! Record normalizer: raw CSV rows to the fixed customer schema.
//!
//! Rows that fail a shape check are dropped, never reported as errors:
//!   - blank name
//!   - last visit that no supported format can parse
//!   - visits or total spend that is not a finite number
//!   - visits / spend under the cohort cutoffs
//!
//! Callers that want the tally use normalize_with_stats().

use crate::{
    config::{CohortFilters, ColumnMapping},
    ids::IdStrategy,
    types::{CustomerId, RawRow},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fallback layout tried after the direct date-time parses fail.
const SPACE_SEPARATED_MINUTES: &str = "%Y-%m-%d %H:%M";

/// ISO-8601 local date-time layouts accepted by the direct parse.
const DIRECT_LAYOUTS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id:          CustomerId,
    pub name:        String,
    pub email:       Option<String>,
    pub phone:       Option<String>,
    /// UTC wall-clock time of the most recent visit.
    pub last_visit:  NaiveDateTime,
    pub visits:      f64,
    pub total_spend: f64,
}

/// Why a row did not make it into the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingName,
    BadLastVisit,
    BadVisits,
    BadSpend,
    BelowMinVisits,
    BelowMinSpend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    pub rows_seen:        usize,
    pub kept:             usize,
    pub missing_name:     usize,
    pub bad_last_visit:   usize,
    pub bad_visits:       usize,
    pub bad_spend:        usize,
    pub below_min_visits: usize,
    pub below_min_spend:  usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.rows_seen - self.kept
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingName    => self.missing_name += 1,
            DropReason::BadLastVisit   => self.bad_last_visit += 1,
            DropReason::BadVisits      => self.bad_visits += 1,
            DropReason::BadSpend       => self.bad_spend += 1,
            DropReason::BelowMinVisits => self.below_min_visits += 1,
            DropReason::BelowMinSpend  => self.below_min_spend += 1,
        }
    }
}

/// Normalize rows into customers, silently dropping malformed rows.
pub fn normalize(
    rows: &[RawRow],
    mapping: &ColumnMapping,
    filters: CohortFilters,
    ids: &mut dyn IdStrategy,
) -> Vec<Customer> {
    normalize_with_stats(rows, mapping, filters, ids).0
}

pub fn normalize_with_stats(
    rows: &[RawRow],
    mapping: &ColumnMapping,
    filters: CohortFilters,
    ids: &mut dyn IdStrategy,
) -> (Vec<Customer>, NormalizeStats) {
    let mut customers = Vec::with_capacity(rows.len());
    let mut stats = NormalizeStats {
        rows_seen: rows.len(),
        ..NormalizeStats::default()
    };

    for (row_index, row) in rows.iter().enumerate() {
        match normalize_row(row, row_index, mapping, filters, ids) {
            Ok(customer) => customers.push(customer),
            Err(reason) => {
                log::debug!("normalize: row {row_index} dropped ({reason:?})");
                stats.record(reason);
            }
        }
    }

    stats.kept = customers.len();
    (customers, stats)
}

fn normalize_row(
    row: &RawRow,
    row_index: usize,
    mapping: &ColumnMapping,
    filters: CohortFilters,
    ids: &mut dyn IdStrategy,
) -> Result<Customer, DropReason> {
    let name = cell(row, &mapping.name).ok_or(DropReason::MissingName)?;

    let last_visit = cell(row, &mapping.last_visit)
        .and_then(parse_last_visit)
        .ok_or(DropReason::BadLastVisit)?;

    let visits = cell(row, &mapping.visits)
        .and_then(parse_number)
        .ok_or(DropReason::BadVisits)?;
    let total_spend = cell(row, &mapping.total_spend)
        .and_then(parse_number)
        .ok_or(DropReason::BadSpend)?;

    if visits < filters.min_visits {
        return Err(DropReason::BelowMinVisits);
    }
    if total_spend < filters.min_spend {
        return Err(DropReason::BelowMinSpend);
    }

    // The id is minted last so dropped rows never consume a sequence number.
    let id = match cell(row, &mapping.id) {
        Some(id) => id.to_string(),
        None     => ids.assign(name, row_index),
    };

    Ok(Customer {
        id,
        name: name.to_string(),
        email: cell(row, &mapping.email).map(str::to_string),
        phone: cell(row, &mapping.phone).map(str::to_string),
        last_visit,
        visits,
        total_spend,
    })
}

/// Trimmed, non-blank cell value for `column`.
fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    if column.is_empty() {
        return None;
    }
    row.get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Parse a last-visit cell.
///
/// Direct parse first: RFC 3339 (offset converted to UTC), ISO-8601 local
/// date-times, or a bare date at midnight. Then `YYYY-MM-DD HH:MM`.
pub fn parse_last_visit(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    parse_direct(raw).or_else(|| NaiveDateTime::parse_from_str(raw, SPACE_SEPARATED_MINUTES).ok())
}

fn parse_direct(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for layout in DIRECT_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Finite number or nothing. `inf` and `NaN` spellings are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_visit_accepts_supported_layouts() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_last_visit("2024-01-01"), Some(midnight));
        assert_eq!(parse_last_visit("2024-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_last_visit("2024-01-01T02:00:00+02:00"), Some(midnight));

        let quarter_past = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 15, 0).unwrap();
        assert_eq!(parse_last_visit("2024-01-01 09:15"), Some(quarter_past));
        assert_eq!(parse_last_visit("2024-01-01T09:15"), Some(quarter_past));
    }

    #[test]
    fn last_visit_rejects_garbage() {
        assert_eq!(parse_last_visit("last tuesday"), None);
        assert_eq!(parse_last_visit("2024-13-45"), None);
        assert_eq!(parse_last_visit(""), None);
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("twelve"), None);
    }
}
