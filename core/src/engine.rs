//! The segmentation engine.
//!
//! PIPELINE ORDER (fixed):
//!   1. Normalize      raw rows -> customers (silent drops, cutoffs)
//!   2. Extract        recency days / visits / spend
//!   3. Bin            R (inverted), F, M over the same cohort
//!   4. Classify       ordered rule table -> segment
//!
//! RULES:
//!   - The pipeline is a pure function of (rows, config, as-of day).
//!   - A session recomputes the WHOLE population on every input change
//!     and swaps the result in one assignment. Nothing is incremental.
//!   - View inputs (search, segment chip, booking link) never recompute.

use crate::{
    aggregate::{CohortSummary, PopulationView, SegmentFilter, ViewQuery},
    clock::{Clock, SystemClock},
    command::SessionCommand,
    config::{validate_bins, ColumnMapping, RfmConfig},
    error::RfmResult,
    export::Sink,
    ids::IdStrategy,
    ingest,
    normalizer::{normalize_with_stats, NormalizeStats},
    scoring::{score_population, SegRecord},
    templates::{first_name_of, template_for, Template},
    types::RawRow,
};
use chrono::NaiveDate;
use std::{io::Read, path::Path};

/// Score a population in one pass. `today` is used when the config has
/// no as-of day.
pub fn compute_scored_population(
    rows: &[RawRow],
    config: &RfmConfig,
    today: NaiveDate,
) -> RfmResult<Vec<SegRecord>> {
    let mut ids = config.id_strategy.build();
    let (population, _) = compute_with_ids(rows, config, today, ids.as_mut())?;
    Ok(population)
}

/// Same as compute_scored_population with a caller-owned id strategy.
pub fn compute_with_ids(
    rows: &[RawRow],
    config: &RfmConfig,
    today: NaiveDate,
    ids: &mut dyn IdStrategy,
) -> RfmResult<(Vec<SegRecord>, NormalizeStats)> {
    config.validate()?;
    let as_of = config.as_of.unwrap_or(today);

    let (customers, stats) = normalize_with_stats(rows, &config.columns, config.filters(), ids);
    let population = score_population(customers, as_of, config.bins);

    log::info!(
        "recompute: {} rows -> {} scored, {} dropped (bins={}, as_of={as_of})",
        stats.rows_seen,
        population.len(),
        stats.dropped(),
        config.bins,
    );
    Ok((population, stats))
}

// ── Session ────────────────────────────────────────────────────────

/// Current inputs plus the latest scored population.
pub struct SegmentationSession<C: Clock = SystemClock> {
    config:     RfmConfig,
    clock:      C,
    rows:       Vec<RawRow>,
    query:      ViewQuery,
    population: Vec<SegRecord>,
    stats:      NormalizeStats,
    revision:   u64,
}

impl SegmentationSession<SystemClock> {
    pub fn with_system_clock(config: RfmConfig) -> RfmResult<Self> {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> SegmentationSession<C> {
    pub fn new(config: RfmConfig, clock: C) -> RfmResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            rows:       Vec::new(),
            query:      ViewQuery::default(),
            population: Vec::new(),
            stats:      NormalizeStats::default(),
            revision:   0,
        })
    }

    // ── Read side ──────────────────────────────────

    pub fn config(&self) -> &RfmConfig          { &self.config }
    pub fn rows(&self) -> &[RawRow]             { &self.rows }
    pub fn query(&self) -> &ViewQuery           { &self.query }
    pub fn population(&self) -> &[SegRecord]    { &self.population }
    pub fn stats(&self) -> &NormalizeStats      { &self.stats }
    /// Bumped on every recompute.
    pub fn revision(&self) -> u64               { self.revision }

    pub fn as_of(&self) -> NaiveDate {
        self.config.as_of.unwrap_or_else(|| self.clock.today())
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn view(&self) -> PopulationView<'_> {
        PopulationView::build(&self.population, &self.query)
    }

    /// Summary over the full population, ignoring the view query.
    pub fn summary(&self) -> CohortSummary {
        crate::aggregate::summarize(&self.population)
    }

    /// Outreach triad for one record, first name filled in.
    pub fn outreach_for(&self, record: &SegRecord, short_link: &str) -> Template {
        template_for(record.segment, &self.config.booking_link)
            .personalize(first_name_of(&record.customer.name), short_link)
    }

    /// Export the rows the current view shows.
    pub fn export(&self, sink: &mut dyn Sink) -> RfmResult<()> {
        let view = self.view();
        sink.export_rows(&view.rows)
    }

    // ── Inputs that recompute ──────────────────────

    pub fn set_rows(&mut self, rows: Vec<RawRow>) -> RfmResult<()> {
        self.rows = rows;
        self.recompute()
    }

    /// Load CSV rows. A structural CSV error is reported to `sink` and
    /// the previous rows stay in place. Returns whether rows were loaded.
    pub fn load_csv<R: Read>(&mut self, reader: R, sink: &mut dyn Sink) -> RfmResult<bool> {
        match ingest::read_rows(reader) {
            Ok(rows) => {
                self.set_rows(rows)?;
                Ok(true)
            }
            Err(e) => {
                sink.report_error(&format!("Could not read CSV: {e}"));
                Ok(false)
            }
        }
    }

    pub fn load_csv_path(&mut self, path: impl AsRef<Path>, sink: &mut dyn Sink) -> RfmResult<bool> {
        let path = path.as_ref();
        match std::fs::File::open(path) {
            Ok(file) => self.load_csv(std::io::BufReader::new(file), sink),
            Err(e) => {
                sink.report_error(&format!("Could not open {}: {e}", path.display()));
                Ok(false)
            }
        }
    }

    pub fn set_columns(&mut self, columns: ColumnMapping) -> RfmResult<()> {
        self.update_config(|c| c.columns = columns)
    }

    pub fn set_bins(&mut self, bins: u8) -> RfmResult<()> {
        validate_bins(bins)?;
        self.update_config(|c| c.bins = bins)
    }

    pub fn set_as_of(&mut self, as_of: Option<NaiveDate>) -> RfmResult<()> {
        self.update_config(|c| c.as_of = as_of)
    }

    pub fn set_min_visits(&mut self, min_visits: f64) -> RfmResult<()> {
        self.update_config(|c| c.min_visits = min_visits)
    }

    pub fn set_min_spend(&mut self, min_spend: f64) -> RfmResult<()> {
        self.update_config(|c| c.min_spend = min_spend)
    }

    // ── View-only inputs ───────────────────────────

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_segment_filter(&mut self, segment: SegmentFilter) {
        self.query.segment = segment;
    }

    pub fn set_booking_link(&mut self, booking_link: impl Into<String>) {
        self.config.booking_link = booking_link.into();
    }

    /// Apply a serialized input edit.
    pub fn apply(&mut self, command: SessionCommand, sink: &mut dyn Sink) -> RfmResult<()> {
        log::debug!("session: apply {}", command.name());
        match command {
            SessionCommand::LoadCsv { path } => {
                self.load_csv_path(path, sink)?;
            }
            SessionCommand::LoadCsvText { text } => {
                self.load_csv(text.as_bytes(), sink)?;
            }
            SessionCommand::SetColumns { columns }       => self.set_columns(columns)?,
            SessionCommand::SetBins { bins }             => self.set_bins(bins)?,
            SessionCommand::SetAsOf { as_of }            => self.set_as_of(as_of)?,
            SessionCommand::SetMinVisits { min_visits }  => self.set_min_visits(min_visits)?,
            SessionCommand::SetMinSpend { min_spend }    => self.set_min_spend(min_spend)?,
            SessionCommand::SetSearch { search }         => self.set_search(search),
            SessionCommand::SetSegment { segment }       => self.set_segment_filter(segment),
            SessionCommand::SetBookingLink { booking_link } => self.set_booking_link(booking_link),
        }
        Ok(())
    }

    /// Validate the edited config first; on error nothing changes.
    fn update_config(&mut self, edit: impl FnOnce(&mut RfmConfig)) -> RfmResult<()> {
        let mut next = self.config.clone();
        edit(&mut next);
        next.validate()?;
        self.config = next;
        self.recompute()
    }

    fn recompute(&mut self) -> RfmResult<()> {
        let mut ids = self.config.id_strategy.build();
        let (population, stats) =
            compute_with_ids(&self.rows, &self.config, self.clock.today(), ids.as_mut())?;
        self.population = population;
        self.stats = stats;
        self.revision += 1;
        Ok(())
    }
}
