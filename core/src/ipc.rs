//! JSON-lines protocol between a UI front end and a session.
//!
//! One request per line, every request tagged by `cmd`:
//!   - any SessionCommand        {"cmd":"set_bins","bins":4}
//!   - {"cmd":"get_state"}
//!   - {"cmd":"export"}
//!   - {"cmd":"outreach","customer_id":"c1","short_link":"https://s.test/x"}
//!   - {"cmd":"quit"}
//!
//! Replies are one JSON line each: a UiState, a Template for outreach,
//! or {"error": "..."}. Quit produces no reply.

use crate::{
    aggregate::{CohortSummary, SegmentFilter},
    classifier::Segment,
    clock::Clock,
    command::SessionCommand,
    engine::SegmentationSession,
    error::RfmResult,
    export::{MemorySink, Sink},
    normalizer::NormalizeStats,
    scoring::SegRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum IpcRequest {
    Session(SessionCommand),
    GetState,
    Export,
    Outreach { customer_id: String, short_link: String },
    Quit,
}

/// The `cmd` values handled by the loop itself rather than the session.
#[derive(Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum ControlCommand {
    GetState,
    Export,
    Outreach { customer_id: String, short_link: String },
    Quit,
}

const CONTROL_CMDS: [&str; 4] = ["get_state", "export", "outreach", "quit"];

pub fn parse_request(line: &str) -> Result<IpcRequest, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    let is_control = value
        .get("cmd")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|cmd| CONTROL_CMDS.contains(&cmd));

    if !is_control {
        return serde_json::from_value(value).map(IpcRequest::Session);
    }
    Ok(match serde_json::from_value(value)? {
        ControlCommand::GetState => IpcRequest::GetState,
        ControlCommand::Export   => IpcRequest::Export,
        ControlCommand::Outreach { customer_id, short_link } => {
            IpcRequest::Outreach { customer_id, short_link }
        }
        ControlCommand::Quit     => IpcRequest::Quit,
    })
}

/// Everything a dashboard redraw needs.
#[derive(Debug, Serialize)]
pub struct UiState<'a> {
    pub revision:    u64,
    pub as_of:       NaiveDate,
    pub bins:        u8,
    pub search:      &'a str,
    pub segment:     SegmentFilter,
    pub filtered:    bool,
    pub chip_counts: BTreeMap<Segment, usize>,
    pub summary:     CohortSummary,
    pub stats:       &'a NormalizeStats,
    pub rows:        Vec<&'a SegRecord>,
    pub errors:      Vec<String>,
}

impl<'a> UiState<'a> {
    pub fn build<C: Clock>(session: &'a SegmentationSession<C>, errors: Vec<String>) -> Self {
        let view = session.view();
        Self {
            revision:    session.revision(),
            as_of:       session.as_of(),
            bins:        session.config().bins,
            search:      &session.query().search,
            segment:     session.query().segment,
            filtered:    view.filtered,
            chip_counts: view.chip_counts,
            summary:     view.summary,
            stats:       session.stats(),
            rows:        view.rows,
            errors,
        }
    }
}

pub fn error_line(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Handle one request line. Returns the reply line, or `None` on quit.
///
/// User-facing alerts raised while handling (CSV failures, export
/// failures) are collected in `alerts` and drained into the state reply.
pub fn handle_line<C: Clock>(
    session: &mut SegmentationSession<C>,
    line: &str,
    alerts: &mut MemorySink,
    exporter: &mut dyn Sink,
) -> RfmResult<Option<String>> {
    let request = match parse_request(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("ipc: rejected request: {e}");
            return Ok(Some(error_line(&e.to_string())));
        }
    };

    match request {
        IpcRequest::Quit => return Ok(None),
        IpcRequest::GetState => {}
        IpcRequest::Session(command) => {
            if let Err(e) = session.apply(command, alerts) {
                return Ok(Some(error_line(&e.to_string())));
            }
        }
        IpcRequest::Outreach { customer_id, short_link } => {
            let record = session.population().iter().find(|r| r.customer.id == customer_id);
            return Ok(Some(match record {
                Some(record) => serde_json::to_string(&session.outreach_for(record, &short_link))?,
                None => error_line(&format!("Unknown customer '{customer_id}'")),
            }));
        }
        IpcRequest::Export => {
            if let Err(e) = session.export(exporter) {
                alerts.report_error(&format!("Export failed: {e}"));
            }
        }
    }

    let errors = std::mem::take(&mut alerts.errors);
    Ok(Some(serde_json::to_string(&UiState::build(session, errors))?))
}
