use crate::{
    error::{RfmError, RfmResult},
    ids::IdStrategyKind,
    types::{MAX_BINS, MIN_BINS},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BINS: u8 = 5;
pub const DEFAULT_BOOKING_LINK: &str = "https://example.com/book";
pub const DEFAULT_EXPORT_PREFIX: &str = "customers";

// ── Column mapping ─────────────────────────────────────────────────

/// Which input column feeds each customer field.
/// `name`, `last_visit`, `visits` and `total_spend` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id:          String,
    pub name:        String,
    pub email:       String,
    pub phone:       String,
    pub last_visit:  String,
    pub visits:      String,
    pub total_spend: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id:          "id".into(),
            name:        "name".into(),
            email:       "email".into(),
            phone:       "phone".into(),
            last_visit:  "last_visit".into(),
            visits:      "visits".into(),
            total_spend: "total_spend".into(),
        }
    }
}

impl ColumnMapping {
    fn validate(&self) -> RfmResult<()> {
        let required = [
            ("columns.name",        &self.name),
            ("columns.last_visit",  &self.last_visit),
            ("columns.visits",      &self.visits),
            ("columns.total_spend", &self.total_spend),
        ];
        for (field, column) in required {
            if column.trim().is_empty() {
                return Err(RfmError::InvalidConfig {
                    field,
                    reason: "required column name is empty".into(),
                });
            }
        }
        Ok(())
    }
}

// ── Cohort filters ─────────────────────────────────────────────────

/// Minimum-visit and minimum-spend cutoffs applied during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortFilters {
    pub min_visits: f64,
    pub min_spend:  f64,
}

impl Default for CohortFilters {
    fn default() -> Self {
        Self { min_visits: 1.0, min_spend: 0.0 }
    }
}

// ── Run configuration ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfmConfig {
    pub bins:          u8,
    /// Reference day for recency. `None` means the clock's today.
    pub as_of:         Option<NaiveDate>,
    pub min_visits:    f64,
    pub min_spend:     f64,
    pub booking_link:  String,
    pub export_prefix: String,
    pub columns:       ColumnMapping,
    /// How ids are minted for rows without an id value.
    pub id_strategy:   IdStrategyKind,
}

impl Default for RfmConfig {
    fn default() -> Self {
        let filters = CohortFilters::default();
        Self {
            bins:          DEFAULT_BINS,
            as_of:         None,
            min_visits:    filters.min_visits,
            min_spend:     filters.min_spend,
            booking_link:  DEFAULT_BOOKING_LINK.into(),
            export_prefix: DEFAULT_EXPORT_PREFIX.into(),
            columns:       ColumnMapping::default(),
            id_strategy:   IdStrategyKind::default(),
        }
    }
}

impl RfmConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RfmConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("config: loaded {path} (bins={}, as_of={:?})", config.bins, config.as_of);
        Ok(config)
    }

    /// Config pinned to a fixed as-of day, for tests and replays.
    pub fn default_test() -> Self {
        Self {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Self::default()
        }
    }

    pub fn filters(&self) -> CohortFilters {
        CohortFilters {
            min_visits: self.min_visits,
            min_spend:  self.min_spend,
        }
    }

    pub fn validate(&self) -> RfmResult<()> {
        validate_bins(self.bins)?;
        validate_threshold("min_visits", self.min_visits)?;
        validate_threshold("min_spend", self.min_spend)?;
        if self.export_prefix.trim().is_empty() {
            return Err(RfmError::InvalidConfig {
                field:  "export_prefix",
                reason: "must not be empty".into(),
            });
        }
        self.columns.validate()
    }
}

pub fn validate_bins(bins: u8) -> RfmResult<()> {
    if (MIN_BINS..=MAX_BINS).contains(&bins) {
        Ok(())
    } else {
        Err(RfmError::InvalidBins { bins })
    }
}

fn validate_threshold(field: &'static str, value: f64) -> RfmResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RfmError::InvalidConfig {
            field,
            reason: format!("must be a finite number >= 0, got {value}"),
        })
    }
}
