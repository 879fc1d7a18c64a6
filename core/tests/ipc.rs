use chrono::NaiveDate;
use rfm_core::{
    clock::FixedClock,
    command::SessionCommand,
    export::MemorySink,
    ipc::{handle_line, parse_request, IpcRequest},
    RfmConfig, SegmentationSession,
};
use serde_json::Value;

// ── Helpers ──────────────────────────────────────────────────────────────────

const LOAD: &str = r#"{"cmd":"load_csv_text","text":"id,name,email,last_visit,visits,total_spend\nc1,Ada Lovelace,ada@example.com,2024-05-30,9,400\nc2,Bea Arthur,bea@mail.test,2024-04-01,2,80\n"}"#;

struct Harness {
    session:  SegmentationSession<FixedClock>,
    alerts:   MemorySink,
    exporter: MemorySink,
}

impl Harness {
    fn new() -> Self {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        Self {
            session:  SegmentationSession::new(RfmConfig::default(), clock).unwrap(),
            alerts:   MemorySink::new(),
            exporter: MemorySink::new(),
        }
    }

    /// Send one line and parse the reply.
    fn send(&mut self, line: &str) -> Option<Value> {
        handle_line(&mut self.session, line, &mut self.alerts, &mut self.exporter)
            .unwrap()
            .map(|reply| serde_json::from_str(&reply).unwrap())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn session_commands_use_the_cmd_envelope() {
    assert_eq!(
        parse_request(r#"{"cmd":"set_bins","bins":4}"#).unwrap(),
        IpcRequest::Session(SessionCommand::SetBins { bins: 4 })
    );
    assert_eq!(parse_request(r#"{"cmd":"get_state"}"#).unwrap(), IpcRequest::GetState);
    assert_eq!(parse_request(r#"{"cmd":"export"}"#).unwrap(), IpcRequest::Export);
    assert_eq!(parse_request(r#"{"cmd":"quit"}"#).unwrap(), IpcRequest::Quit);
    assert!(parse_request(r#"{"type":"get_state"}"#).is_err());
    assert!(parse_request(r#"{"cmd":"launch_rockets"}"#).is_err());
}

#[test]
fn each_line_gets_a_state_reply() {
    let mut h = Harness::new();

    let state = h.send(LOAD).unwrap();
    assert_eq!(state["revision"], 1);
    assert_eq!(state["rows"].as_array().unwrap().len(), 2);

    let state = h.send(r#"{"cmd":"set_bins","bins":4}"#).unwrap();
    assert_eq!(state["bins"], 4);
    assert_eq!(state["revision"], 2);

    let state = h.send(r#"{"cmd":"set_search","search":"bea"}"#).unwrap();
    assert_eq!(state["filtered"], true);
    assert_eq!(state["rows"].as_array().unwrap().len(), 1);
    assert_eq!(state["summary"]["total"], 1);
    assert_eq!(state["chip_counts"].as_object().unwrap().len(), 8);

    let state = h.send(r#"{"cmd":"get_state"}"#).unwrap();
    assert_eq!(state["revision"], 2, "get_state must not recompute");
    assert_eq!(state["as_of"], "2024-06-01");
}

#[test]
fn export_goes_to_the_exporter_sink() {
    let mut h = Harness::new();
    h.send(LOAD);
    h.send(r#"{"cmd":"set_search","search":"ada"}"#);
    h.send(r#"{"cmd":"export"}"#).unwrap();

    assert_eq!(h.exporter.exports.len(), 1);
    let text = String::from_utf8(h.exporter.exports[0].clone()).unwrap();
    assert_eq!(text.lines().count(), 2, "header plus the one visible row");
}

#[test]
fn bad_requests_get_error_replies() {
    let mut h = Harness::new();
    let reply = h.send("not json").unwrap();
    assert!(reply["error"].is_string());

    let reply = h.send(r#"{"cmd":"set_bins","bins":9}"#).unwrap();
    assert!(reply["error"].as_str().unwrap().contains("bin"));
    assert_eq!(h.session.revision(), 0);
}

#[test]
fn csv_failures_surface_in_the_state_errors() {
    let mut h = Harness::new();
    h.send(LOAD);
    let state = h.send(r#"{"cmd":"load_csv","path":"/definitely/not/here.csv"}"#).unwrap();
    assert_eq!(state["errors"].as_array().unwrap().len(), 1);
    assert_eq!(state["rows"].as_array().unwrap().len(), 2, "previous rows stay");

    let state = h.send(r#"{"cmd":"get_state"}"#).unwrap();
    assert!(state["errors"].as_array().unwrap().is_empty(), "alerts are drained once");
}

#[test]
fn outreach_returns_a_personalized_template() {
    let mut h = Harness::new();
    h.send(LOAD);
    let t = h
        .send(r#"{"cmd":"outreach","customer_id":"c1","short_link":"https://s.test/x"}"#)
        .unwrap();
    assert!(t["email_body"].as_str().unwrap().starts_with("Hi Ada,"));
    assert!(t["sms"].as_str().unwrap().contains("https://s.test/x"));

    let missing = h
        .send(r#"{"cmd":"outreach","customer_id":"zz","short_link":"x"}"#)
        .unwrap();
    assert!(missing["error"].as_str().unwrap().contains("zz"));
}

#[test]
fn quit_ends_the_conversation() {
    let mut h = Harness::new();
    assert!(h.send(r#"{"cmd":"quit"}"#).is_none());
}
