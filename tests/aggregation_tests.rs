mod common;

use common::*;
use geochem_extract::{
    aggregate, aggregate_with_context, CancelToken, ExtractError, Grid, Group, ItemDescriptor,
    JobContext, LqSubstitution, NoProgress, Orientation, ProgressSink, Selection,
};
use std::sync::Mutex;

#[test]
fn end_to_end_column_oriented_scenario() {
    let table = aggregate(&geochem_grid(), &column_config(), &selection(&["arsenic", "lead"]))
        .expect("aggregation should succeed");

    assert_eq!(table.len(), 2);
    let s1 = table.get("S1").expect("S1 should be present");
    assert_eq!(s1.get("arsenic"), Some("5"));
    assert_eq!(s1.get("lead"), Some("<LQ (<0.1)"));
    let s2 = table.get("S2").expect("S2 should be present");
    assert_eq!(s2.get("arsenic"), Some("<LQ"));
    assert_eq!(s2.get("lead"), Some("2"));
}

#[test]
fn header_and_blank_identifier_samples_are_skipped() {
    let grid = Grid::from_rows(vec![
        vec![text("Code"), text("Arsenic (mg/kg)")],
        vec![blank(), num(9.0)],
        vec![num(42.0), num(9.0)],
        vec![text("  "), num(9.0)],
        vec![text("S1"), num(5.0)],
    ]);
    let table = aggregate(&grid, &column_config(), &selection(&["arsenic"]))
        .expect("aggregation should succeed");

    assert_eq!(table.sample_ids().collect::<Vec<_>>(), vec!["S1"]);
}

#[test]
fn duplicate_identifiers_are_last_write_wins() {
    let grid = Grid::from_rows(vec![
        vec![text("Code"), text("Arsenic (mg/kg)")],
        vec![text("S1"), num(5.0)],
        vec![text("S1"), num(7.0)],
    ]);
    let table = aggregate(&grid, &column_config(), &selection(&["arsenic"]))
        .expect("aggregation should succeed");

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("S1").unwrap().get("arsenic"), Some("7"));
}

#[test]
fn ambiguous_plain_keyword_is_never_guessed() {
    let grid = Grid::from_rows(vec![
        vec![
            text("Code"),
            text("Plomb total (mg/kg)"),
            text("Plomb lixiviat (mg/kg)"),
        ],
        vec![text("S1"), num(5.0), num(9.0)],
    ]);
    let table = aggregate(&grid, &column_config(), &selection(&["plomb"]))
        .expect("aggregation should succeed");

    assert_eq!(table.get("S1").unwrap().get("plomb"), Some(""));
}

#[test]
fn aggregate_all_takes_first_present_candidate() {
    let grid = Grid::from_rows(vec![
        vec![
            text("Code"),
            text("HAP fraction a"),
            text("HAP fraction b"),
        ],
        vec![text("S1"), blank(), num(7.0)],
        vec![text("S2"), num(3.0), num(9.0)],
    ]);
    let table = aggregate(&grid, &column_config(), &selection(&["hap → all"]))
        .expect("aggregation should succeed");

    // S1's first candidate is blank, so the later one is probed.
    assert_eq!(table.get("S1").unwrap().get("hap → all"), Some("7"));
    // S2's first candidate is present; the later one is never consulted.
    assert_eq!(table.get("S2").unwrap().get("hap → all"), Some("3"));
}

#[test]
fn groups_sum_members_under_censored_semantics() {
    let grid = Grid::from_rows(vec![
        vec![
            text("Code"),
            text("Naphtalene (mg/kg)"),
            text("Benzene (mg/kg)"),
            text("Mercure (mg/kg)"),
        ],
        vec![text("S1"), text("1,5"), num(2.5), text("<0.05")],
        vec![text("S2"), text("<0.1"), text("n.d."), blank()],
    ]);
    let config = column_config();
    let sel = Selection {
        keywords: vec![ItemDescriptor::parse("mercure")],
        groups: vec![Group {
            name: "BTEX+HAP".to_string(),
            members: vec![
                ItemDescriptor::parse("naphtalene → all"),
                ItemDescriptor::parse("benzene → (2, Benzene (mg/kg))"),
            ],
        }],
    };

    let table = aggregate(&grid, &config, &sel).expect("aggregation should succeed");

    let s1 = table.get("S1").unwrap();
    // Member values are recorded under their own keys.
    assert_eq!(s1.get("naphtalene → all"), Some("1,5"));
    assert_eq!(s1.get("benzene → (2, Benzene (mg/kg))"), Some("2.5"));
    assert_eq!(s1.get("BTEX+HAP"), Some("4"));
    assert_eq!(s1.get("mercure"), Some("<LQ (<0.05)"));

    let s2 = table.get("S2").unwrap();
    // Both members censored: the group reports <LQ, not a sum and not "".
    assert_eq!(s2.get("BTEX+HAP"), Some("<LQ"));
    assert_eq!(s2.get("mercure"), Some(""));
}

#[test]
fn group_name_shadows_a_plain_keyword_of_the_same_name() {
    let grid = Grid::from_rows(vec![
        vec![text("Code"), text("Benzene (mg/kg)")],
        vec![text("S1"), num(2.0)],
    ]);
    let sel = Selection {
        keywords: vec![ItemDescriptor::parse("total")],
        groups: vec![Group {
            name: "total".to_string(),
            members: vec![ItemDescriptor::parse("benzene → all")],
        }],
    };
    let table = aggregate(&grid, &column_config(), &sel).expect("aggregation should succeed");

    // The group's censored sum wins over the (empty) plain keyword.
    assert_eq!(table.get("S1").unwrap().get("total"), Some("2"));
}

#[test]
fn minus_one_substitution_applies_to_keywords_and_groups() {
    let grid = Grid::from_rows(vec![
        vec![text("Code"), text("Arsenic (mg/kg)"), text("Plomb (mg/kg)")],
        vec![text("S1"), text("n.d."), text("<0.1")],
    ]);
    let mut config = column_config();
    config.lq_substitution = LqSubstitution::MinusOne;
    let sel = Selection {
        keywords: vec![ItemDescriptor::parse("arsenic")],
        groups: vec![Group {
            name: "metaux".to_string(),
            members: vec![ItemDescriptor::parse("plomb → all")],
        }],
    };

    let table = aggregate(&grid, &config, &sel).expect("aggregation should succeed");
    let s1 = table.get("S1").unwrap();
    assert_eq!(s1.get("arsenic"), Some("-1"));
    assert_eq!(s1.get("metaux"), Some("-1"));
    // Member values keep their textual classified form.
    assert_eq!(s1.get("plomb → all"), Some("<LQ (<0.1)"));
}

#[test]
fn repeated_runs_are_identical() {
    let grid = geochem_grid();
    let config = column_config();
    let sel = selection(&["arsenic", "lead"]);

    let first = aggregate(&grid, &config, &sel).expect("first run should succeed");
    let second = aggregate(&grid, &config, &sel).expect("second run should succeed");
    assert_eq!(first, second);
}

#[test]
fn empty_grid_is_a_fatal_error() {
    let err = aggregate(&Grid::from_rows(Vec::new()), &column_config(), &selection(&[]))
        .expect_err("empty grid must fail");
    assert!(matches!(err, ExtractError::UnreadableGrid));
    assert_eq!(err.code(), "GEOX_EXTRACT_003");
}

#[test]
fn out_of_bounds_layout_is_a_fatal_error() {
    let mut config = column_config();
    config.layout.param_row = 40;
    let err = aggregate(&geochem_grid(), &config, &selection(&["arsenic"]))
        .expect_err("bad layout must fail");
    match err {
        ExtractError::MissingLayout { coordinate, .. } => assert_eq!(coordinate, "parameters"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_orientation_maps_to_invalid_orientation() {
    let err: ExtractError = "diagonal".parse::<Orientation>().unwrap_err().into();
    assert!(matches!(err, ExtractError::InvalidOrientation { ref value } if value == "diagonal"));
    assert_eq!(err.code(), "GEOX_EXTRACT_001");
}

#[test]
fn cancellation_aborts_the_pass() {
    let token = CancelToken::new();
    token.cancel();
    let job = JobContext::new(&NoProgress, &token);

    let err = aggregate_with_context(
        &geochem_grid(),
        &column_config(),
        &selection(&["arsenic"]),
        job,
    )
    .expect_err("cancelled job must fail");
    assert!(matches!(err, ExtractError::Cancelled));
}

struct RecordingSink {
    updates: Mutex<Vec<f32>>,
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, phase: &str, percent: f32) {
        assert_eq!(phase, "samples");
        self.updates.lock().unwrap().push(percent);
    }
}

#[test]
fn progress_is_reported_per_sample_and_completes() {
    let sink = RecordingSink {
        updates: Mutex::new(Vec::new()),
    };
    let token = CancelToken::new();
    let job = JobContext::new(&sink, &token);

    aggregate_with_context(
        &geochem_grid(),
        &column_config(),
        &selection(&["arsenic"]),
        job,
    )
    .expect("aggregation should succeed");

    let updates = sink.updates.lock().unwrap();
    assert!(updates.len() >= 2);
    assert_eq!(*updates.last().unwrap(), 1.0);
}
