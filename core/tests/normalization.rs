use chrono::NaiveDate;
use rfm_core::{
    compute_scored_population,
    config::{CohortFilters, ColumnMapping},
    ids::{ContentHashIds, SequentialIds},
    normalizer::{normalize, normalize_with_stats},
    types::RawRow,
    RfmConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn row(cells: &[(&str, &str)]) -> RawRow {
    cells.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn customer(name: &str, last_visit: &str, visits: &str, spend: &str) -> RawRow {
    row(&[
        ("name", name),
        ("last_visit", last_visit),
        ("visits", visits),
        ("total_spend", spend),
    ])
}

fn run(rows: &[RawRow]) -> Vec<rfm_core::normalizer::Customer> {
    normalize(rows, &ColumnMapping::default(), CohortFilters::default(), &mut SequentialIds::new())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn blank_name_row_is_dropped_silently() {
    let rows = vec![
        customer("Ada Lovelace", "2024-05-01", "3", "120"),
        customer("", "2024-05-02", "4", "80"),
        customer("   ", "2024-05-03", "2", "50"),
        customer("Grace Hopper", "2024-04-01", "1", "10"),
    ];
    let customers = run(&rows);
    let names: Vec<&str> = customers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
}

#[test]
fn unparseable_dates_and_numbers_are_dropped() {
    let rows = vec![
        customer("Ada", "yesterday", "3", "120"),
        customer("Bea", "2024-05-01", "three", "120"),
        customer("Cy", "2024-05-01", "3", "NaN"),
        customer("Di", "2024-05-01", "", "10"),
        customer("Ed", "2024-05-01 18:30", "2", "45.5"),
    ];
    let (customers, stats) = normalize_with_stats(
        &rows,
        &ColumnMapping::default(),
        CohortFilters::default(),
        &mut SequentialIds::new(),
    );
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Ed");
    assert_eq!(stats.rows_seen, 5);
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.bad_last_visit, 1);
    assert_eq!(stats.bad_visits, 2);
    assert_eq!(stats.bad_spend, 1);
    assert_eq!(stats.dropped(), 4);
}

#[test]
fn cutoffs_drop_customers_below_the_minimums() {
    let rows = vec![
        customer("Once", "2024-05-01", "1", "500"),
        customer("Twice", "2024-05-01", "2", "500"),
        customer("Cheap", "2024-05-01", "9", "5"),
    ];
    let filters = CohortFilters { min_visits: 2.0, min_spend: 10.0 };
    let (customers, stats) =
        normalize_with_stats(&rows, &ColumnMapping::default(), filters, &mut SequentialIds::new());
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Twice");
    assert_eq!(stats.below_min_visits, 1);
    assert_eq!(stats.below_min_spend, 1);
}

/// With the default cutoff (1 visit) a zero-visit row is out.
#[test]
fn default_filters_require_one_visit() {
    let rows = vec![
        customer("Ghost", "2024-05-01", "0", "0"),
        customer("Guest", "2024-05-01", "1", "0"),
    ];
    let customers = run(&rows);
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Guest");
}

#[test]
fn custom_column_mapping_is_honoured() {
    let mapping = ColumnMapping {
        id:          "Customer ID".into(),
        name:        "Full Name".into(),
        email:       "E-mail".into(),
        phone:       String::new(),
        last_visit:  "Last Seen".into(),
        visits:      "Trips".into(),
        total_spend: "Revenue".into(),
    };
    let rows = vec![row(&[
        ("Customer ID", "cust-9"),
        ("Full Name", " Ada Lovelace "),
        ("E-mail", "ada@example.com"),
        ("phone", "555-0100"),
        ("Last Seen", "2024-05-31T09:15:00"),
        ("Trips", "7"),
        ("Revenue", "310.25"),
    ])];

    let customers = normalize(&rows, &mapping, CohortFilters::default(), &mut SequentialIds::new());
    assert_eq!(customers.len(), 1);
    let c = &customers[0];
    assert_eq!(c.id, "cust-9");
    assert_eq!(c.name, "Ada Lovelace");
    assert_eq!(c.email.as_deref(), Some("ada@example.com"));
    assert_eq!(c.phone, None, "unmapped phone column must stay empty");
    assert_eq!(
        c.last_visit,
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap().and_hms_opt(9, 15, 0).unwrap()
    );
    assert_eq!(c.visits, 7.0);
    assert_eq!(c.total_spend, 310.25);
}

#[test]
fn missing_ids_are_minted_for_kept_rows_only() {
    let mut with_id = customer("Has Id", "2024-05-01", "2", "20");
    with_id.insert("id".into(), "crm-1".into());
    let rows = vec![
        customer("First", "2024-05-01", "2", "20"),
        customer("", "2024-05-01", "2", "20"),
        with_id,
        customer("Second", "2024-05-01", "2", "20"),
    ];
    let ids: Vec<String> = run(&rows).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["c-000001", "crm-1", "c-000002"]);
}

/// With the default config a row without an id is keyed by its name.
#[test]
fn default_id_is_the_display_name() {
    let rows = vec![
        customer("Ada Lovelace", "2024-05-01", "2", "20"),
        customer("  Grace Hopper ", "2024-05-02", "3", "30"),
    ];
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let population = compute_scored_population(&rows, &RfmConfig::default_test(), as_of).unwrap();
    let ids: Vec<&str> = population.iter().map(|r| r.customer.id.as_str()).collect();
    assert_eq!(ids, vec!["Ada Lovelace", "Grace Hopper"]);
}

#[test]
fn content_hash_ids_are_stable_across_runs() {
    let rows = vec![
        customer("Ada", "2024-05-01", "2", "20"),
        customer("Bea", "2024-05-01", "2", "20"),
    ];
    let first = normalize(&rows, &ColumnMapping::default(), CohortFilters::default(), &mut ContentHashIds::default());
    let second = normalize(&rows, &ColumnMapping::default(), CohortFilters::default(), &mut ContentHashIds::default());
    assert_eq!(first, second);
    assert_ne!(first[0].id, first[1].id);
}

#[test]
fn blank_contact_cells_become_none() {
    let mut r = customer("Ada", "2024-05-01", "2", "20");
    r.insert("email".into(), "  ".into());
    let customers = run(&[r]);
    assert_eq!(customers[0].email, None);
    assert_eq!(customers[0].phone, None);
}
