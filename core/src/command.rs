use crate::{aggregate::SegmentFilter, config::ColumnMapping};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every input edit a front end can make to a session.
/// Variants are appended, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SessionCommand {
    // ── Inputs that trigger a full recompute ──────
    LoadCsv { path: String },
    LoadCsvText { text: String },
    SetColumns { columns: ColumnMapping },
    SetBins { bins: u8 },
    SetAsOf { as_of: Option<NaiveDate> },
    SetMinVisits { min_visits: f64 },
    SetMinSpend { min_spend: f64 },

    // ── View-only inputs ──────────────────────────
    SetSearch { search: String },
    SetSegment { segment: SegmentFilter },
    SetBookingLink { booking_link: String },
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadCsv { .. }        => "load_csv",
            Self::LoadCsvText { .. }    => "load_csv_text",
            Self::SetColumns { .. }     => "set_columns",
            Self::SetBins { .. }        => "set_bins",
            Self::SetAsOf { .. }        => "set_as_of",
            Self::SetMinVisits { .. }   => "set_min_visits",
            Self::SetMinSpend { .. }    => "set_min_spend",
            Self::SetSearch { .. }      => "set_search",
            Self::SetSegment { .. }     => "set_segment",
            Self::SetBookingLink { .. } => "set_booking_link",
        }
    }
}
