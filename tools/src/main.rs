//! rfm-runner: headless front end for the RFM segmentation engine.
//!
//! Usage:
//!   rfm-runner score --input customers.csv [--config rfm.json] [--bins 5]
//!              [--as-of 2024-06-01] [--min-visits 1] [--min-spend 0]
//!              [--search TEXT] [--segment "At Risk"] [--out-dir ./exports]
//!   rfm-runner sample [--seed 42] [--count 200] [--as-of 2024-06-01]
//!   rfm-runner template --segment "At Risk" [--booking-link URL]
//!   rfm-runner --ipc-mode [--config rfm.json] [--out-dir ./exports]

use anyhow::Result;
use chrono::NaiveDate;
use rfm_core::{
    clock::{Clock, SystemClock},
    export::{DirectorySink, MemorySink},
    ipc, sample,
    templates::template_for_label,
    RfmConfig, Segment, SegmentationSession,
};
use std::env;
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: rfm-runner <score|sample|template> [flags] | rfm-runner --ipc-mode";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let out_dir = flag_value(&args, "--out-dir").unwrap_or("./exports");

    if has_flag(&args, "--ipc-mode") {
        let config = build_config(&args)?;
        let mut session = SegmentationSession::with_system_clock(config)?;
        return run_ipc_loop(&mut session, out_dir);
    }

    match args.get(1).map(String::as_str) {
        Some("score")    => run_score(&args, out_dir),
        Some("sample")   => run_sample(&args),
        Some("template") => run_template(&args),
        Some(other) => anyhow::bail!("unknown subcommand '{other}'\n{USAGE}"),
        None        => anyhow::bail!("{USAGE}"),
    }
}

fn run_score(args: &[String], out_dir: &str) -> Result<()> {
    let Some(input) = flag_value(args, "--input") else {
        anyhow::bail!("score: --input <file.csv> is required");
    };
    let config = build_config(args)?;
    let mut session = SegmentationSession::with_system_clock(config)?;

    println!("RFM segmentation: rfm-runner score");
    println!("  input:     {input}");
    println!("  bins:      {}", session.config().bins);
    println!("  as_of:     {}", session.as_of());
    println!("  out_dir:   {out_dir}");
    println!();

    let mut sink = DirectorySink::new(out_dir, &session.config().export_prefix, SystemClock.today());
    if !session.load_csv_path(input, &mut sink)? {
        anyhow::bail!("import aborted");
    }

    if let Some(search) = flag_value(args, "--search") {
        session.set_search(search);
    }
    if let Some(segment) = flag_value(args, "--segment") {
        session.set_segment_filter(segment.parse()?);
    }

    print_summary(&session);
    session.export(&mut sink)?;
    for path in sink.written() {
        println!("  exported:  {}", path.display());
    }
    Ok(())
}

fn build_config(args: &[String]) -> Result<RfmConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => RfmConfig::load(path)?,
        None => RfmConfig::default(),
    };
    config.bins = parse_arg(args, "--bins", config.bins);
    config.min_visits = parse_arg(args, "--min-visits", config.min_visits);
    config.min_spend = parse_arg(args, "--min-spend", config.min_spend);
    if let Some(day) = flag_value(args, "--as-of") {
        config.as_of = Some(parse_day(day)?);
    }
    if let Some(link) = flag_value(args, "--booking-link") {
        config.booking_link = link.to_string();
    }
    config.validate()?;
    Ok(config)
}

fn run_sample(args: &[String]) -> Result<()> {
    let seed = parse_arg(args, "--seed", 42u64);
    let count = parse_arg(args, "--count", 200usize);
    let as_of = match flag_value(args, "--as-of") {
        Some(day) => parse_day(day)?,
        None => SystemClock.today(),
    };
    let csv = sample::generate_csv(seed, count, as_of)?;
    io::stdout().write_all(csv.as_bytes())?;
    Ok(())
}

fn run_template(args: &[String]) -> Result<()> {
    let Some(label) = flag_value(args, "--segment") else {
        anyhow::bail!("template: --segment <LABEL> is required");
    };
    let link = flag_value(args, "--booking-link").unwrap_or(rfm_core::config::DEFAULT_BOOKING_LINK);
    if label.parse::<Segment>().is_err() {
        log::warn!("template: unknown segment '{label}', showing the default template");
    }
    let t = template_for_label(label, link);
    println!("Subject: {}\n", t.email_subject);
    println!("{}\n", t.email_body);
    println!("SMS: {}", t.sms);
    Ok(())
}

fn run_ipc_loop(session: &mut SegmentationSession, out_dir: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut alerts = MemorySink::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let mut exporter = DirectorySink::new(out_dir, &session.config().export_prefix, session.today());
        let reply = match ipc::handle_line(session, &buffer, &mut alerts, &mut exporter) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => ipc::error_line(&e.to_string()),
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(session: &SegmentationSession) {
    let stats = session.stats();
    let view = session.view();
    let s = &view.summary;

    println!("=== RUN SUMMARY ===");
    println!("  rows read:      {}", stats.rows_seen);
    println!("  scored:         {}", stats.kept);
    println!("  dropped:        {}", stats.dropped());
    if view.filtered {
        println!("  view:           \"{}\" / {}", session.query().search, session.query().segment);
    }
    println!("  shown:          {}", s.total);
    println!("  avg spend:      ${:.2}", s.avg_spend);
    println!("  median recency: {:.1} days", s.median_recency);

    println!();
    println!("=== SEGMENTS (all customers) ===");
    for (segment, count) in &view.chip_counts {
        println!("  {:<12} {count}", segment.label());
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date '{raw}' (want YYYY-MM-DD): {e}"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
