//! Seeded synthetic customer tables, shaped like a real export.
//!
//! Columns match the default column mapping. Roughly 3% of rows are
//! deliberately malformed (blank name or unparseable date) so the
//! normalizer's drop path shows up in demos.

use crate::{
    config::ColumnMapping,
    name_generator::NameGenerator,
    rng::{SampleRng, SampleStream},
    types::RawRow,
};
use chrono::{Duration, NaiveDate};

pub const MAX_DAYS_BACK: u64 = 540;

pub fn generate_rows(seed: u64, count: usize, as_of: NaiveDate) -> Vec<RawRow> {
    let columns = ColumnMapping::default();
    let mut identity = SampleRng::new(seed, SampleStream::Identity);
    let mut contact = SampleRng::new(seed, SampleStream::Contact);
    let mut activity = SampleRng::new(seed, SampleStream::Activity);

    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let name = NameGenerator::full_name(&mut identity);
        let email = if contact.chance(0.85) {
            NameGenerator::email_for(&name, &mut contact)
        } else {
            String::new()
        };
        let phone = if contact.chance(0.6) {
            NameGenerator::phone(&mut contact)
        } else {
            String::new()
        };

        // Recent customers visit more and spend more.
        let days_back = activity.next_u64_below(MAX_DAYS_BACK + 1);
        let engagement = 1.0 - days_back as f64 / MAX_DAYS_BACK as f64;
        let visits = 1 + activity.next_u64_below(3 + (engagement * 20.0) as u64);
        let spend = visits as f64 * activity.pareto(25.0, 2.2);
        let minutes = activity.next_u64_below(24 * 60);

        let visited = as_of.and_time(chrono::NaiveTime::MIN)
            - Duration::days(days_back as i64)
            + Duration::minutes(minutes as i64);
        let mut last_visit = visited.format("%Y-%m-%d %H:%M").to_string();

        let mut display_name = name;
        if activity.chance(0.03) {
            if activity.chance(0.5) {
                display_name = String::new();
            } else {
                last_visit = "unknown".into();
            }
        }

        let mut row = RawRow::new();
        row.insert(columns.id.clone(), format!("s-{:05}", i + 1));
        row.insert(columns.name.clone(), display_name);
        row.insert(columns.email.clone(), email);
        row.insert(columns.phone.clone(), phone);
        row.insert(columns.last_visit.clone(), last_visit);
        row.insert(columns.visits.clone(), visits.to_string());
        row.insert(columns.total_spend.clone(), format!("{spend:.2}"));
        rows.push(row);
    }

    log::debug!("sample: generated {count} rows (seed={seed})");
    rows
}

/// The same rows as CSV text, header first, default column order.
pub fn generate_csv(seed: u64, count: usize, as_of: NaiveDate) -> crate::error::RfmResult<String> {
    let columns = ColumnMapping::default();
    let order = [
        &columns.id, &columns.name, &columns.email, &columns.phone,
        &columns.last_visit, &columns.visits, &columns.total_spend,
    ];

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(order)?;
    for row in generate_rows(seed, count, as_of) {
        wtr.write_record(order.iter().map(|col| row.get(*col).map(String::as_str).unwrap_or("")))?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| anyhow::anyhow!("sample CSV is not UTF-8: {e}").into())
}
