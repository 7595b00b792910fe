//! End-to-end pipeline runs over small in-memory tables.

use std::io::Write;

use sp_algo::AlgoError;
use sp_io::config::parse_scenario;
use sp_io::IoError;
use sp_pipeline::{run, run_from_path, PipelineError, PipelineOutputs};

const TWO_DISTRICTS: &str = "Körzet;Népesség;X;Y\nA;1000;60;40\nB;2000;40;60\n";

fn scenario(extra: &str) -> String {
    format!(r#"{{"nationalTargets": {{"X": 50, "Y": 50}}, "turnoutPercent": 50, "totalSeats": 10{extra}}}"#)
}

fn run_str(table: &str, cfg: &str) -> Result<PipelineOutputs, PipelineError> {
    let cfg = parse_scenario(cfg).expect("scenario parses");
    run(table.as_bytes(), &cfg)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn two_district_scenario_matches_hand_computation() {
    let out = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    let r = &out.result;

    assert_eq!(r.parties, vec!["X", "Y"]);
    assert!((r.tally[0].baseline_pct - 140_000.0 / 3000.0).abs() < 1e-9);

    let a = &r.districts[0];
    assert_eq!(a.voters, 500);
    assert_eq!(a.votes, vec![316, 184]);
    assert_eq!(a.winner, "X");
    assert_eq!(a.margin_votes, 132);
    assert!(approx(a.margin_pct, 26.4));
    assert!(approx(a.adjusted_pct[0], 63.2) && approx(a.adjusted_pct[1], 36.8));

    let b = &r.districts[1];
    assert_eq!(b.voters, 1000);
    assert_eq!(b.votes, vec![429, 563]);
    assert_eq!(b.winner, "Y");
    assert_eq!(b.margin_votes, 134);
    assert!(approx(b.margin_pct, 13.51));
    assert!(approx(b.adjusted_pct[0], 43.25) && approx(b.adjusted_pct[1], 56.75));

    assert_eq!(r.national_voters, 1500);
    assert_eq!(r.seat_pool, 10);

    let x = r.tally_for("X").unwrap();
    let y = r.tally_for("Y").unwrap();
    assert_eq!((x.list_votes, y.list_votes), (798, 702));
    assert_eq!((x.leftover_votes, y.leftover_votes), (429, 184));
    assert_eq!((x.compensation_votes, y.compensation_votes), (133, 135));
    assert_eq!((x.list_weight, y.list_weight), (1360, 1021));
    assert_eq!((x.individual_votes, y.individual_votes), (316, 563));
    assert_eq!((x.individual_mandates, y.individual_mandates), (1, 1));
    assert_eq!((x.list_mandates, y.list_mandates), (6, 4));
    assert_eq!((x.total_mandates, y.total_mandates), (7, 5));
}

#[test]
fn seat_totals_and_share_sums_hold() {
    let table = "Körzet;Népesség;X;Y;Z\n\
                 A;1200;45;35;20\nB;800;30;50;20\nC;1500;25;25;50\nD;900;40;40;20\n";
    let cfg = r#"{"nationalTargets": {"X": 38, "Y": 33, "Z": 29}, "totalSeats": 15, "fixedSeats": {"Z": 2}}"#;
    let out = run_str(table, cfg).unwrap();
    let r = &out.result;

    for d in &r.districts {
        let sum: f64 = d.adjusted_pct.iter().sum();
        assert!((sum - 100.0).abs() <= 0.01 + 1e-9, "{} sums to {sum}", d.id);
    }
    let individual: u32 = r.tally.iter().map(|t| t.individual_mandates).sum();
    let list: u32 = r.tally.iter().map(|t| t.list_mandates).sum();
    assert_eq!(individual as usize, r.districts.len());
    assert_eq!(list, 15);
    assert_eq!(r.seat_pool, 13);
    assert!(r.tally_for("Z").unwrap().list_mandates >= 2);
}

#[test]
fn zero_fraction_rule_is_a_no_op() {
    let plain = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    let zero = run_str(TWO_DISTRICTS, &scenario(r#", "tacticalGlobal": {"X": [0.0, "Y"]}"#)).unwrap();
    assert_eq!(plain.result, zero.result);
    assert_eq!(plain.district_csv, zero.district_csv);
    assert_ne!(plain.run_record.inputs.scenario_sha256, zero.run_record.inputs.scenario_sha256);
}

#[test]
fn global_rule_moves_votes_and_override_replaces_it() {
    let cfg = scenario(
        r#", "tacticalGlobal": {"X": [0.5, "Y"]}, "tacticalByDistrict": {"B": {"Y": [0.1, "X"]}}"#,
    );
    let out = run_str(TWO_DISTRICTS, &cfg).unwrap();
    let r = &out.result;
    // A: 158 of X's 316 move to Y.
    assert_eq!(r.districts[0].votes, vec![158, 342]);
    assert_eq!(r.districts[0].winner, "Y");
    // B: only the override applies; 56 of Y's 563 move to X.
    assert_eq!(r.districts[1].votes, vec![485, 507]);
    assert!(r.diagnostics.is_empty());
}

#[test]
fn unknown_party_rule_yields_one_diagnostic_and_no_change() {
    let plain = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    let cfg = scenario(r#", "tacticalByDistrict": {"A": {"X": [0.3, "Q"]}}"#);
    let out = run_str(TWO_DISTRICTS, &cfg).unwrap();

    assert_eq!(out.result.diagnostics.len(), 1);
    let d = &out.result.diagnostics[0];
    assert_eq!((d.district.as_str(), d.source.as_str(), d.target.as_str()), ("A", "X", "Q"));
    for (a, b) in plain.result.districts.iter().zip(&out.result.districts) {
        assert_eq!(a.votes, b.votes);
    }
    assert_eq!(out.run_record.skipped_rules, 1);
}

#[test]
fn zero_baseline_is_a_typed_error() {
    let table = "Körzet;Népesség;X;Y;Z\nA;1000;60;40;0\nB;2000;40;60;0\n";
    let err = run_str(table, &scenario("")).unwrap_err();
    assert!(matches!(err, PipelineError::Project(AlgoError::ZeroBaseline { ref party }) if party == "Z"));
}

#[test]
fn fixed_seats_above_total_are_rejected() {
    let err = run_str(TWO_DISTRICTS, &scenario(r#", "fixedSeats": {"X": 11}"#)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Allocate(AlgoError::FixedSeatsExceedTotal { fixed: 11, total: 10 })
    ));
}

#[test]
fn external_votes_overflowing_the_list_base_are_rejected() {
    let cfg = scenario(r#", "externalVotes": {"X": 18446744073709551615}"#);
    let err = run_str(TWO_DISTRICTS, &cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Project(AlgoError::VoteOverflow { ref party }) if party == "X"));
}

#[test]
fn no_eligible_party_is_an_error() {
    let cfg = r#"{"nationalTargets": {"X": 3, "Y": 4}, "totalSeats": 10}"#;
    let err = run_str(TWO_DISTRICTS, cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Allocate(AlgoError::NoEligibleParties)));
}

#[test]
fn missing_population_column_is_a_schema_error() {
    let table = "Körzet;X;Y\nA;60;40\n";
    let err = run_str(table, &scenario("")).unwrap_err();
    assert!(matches!(err, PipelineError::Io(IoError::Schema(_))));
}

#[test]
fn district_csv_has_bom_and_layout_header() {
    let out = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    let csv = &out.district_csv;
    assert!(csv.starts_with(b"\xEF\xBB\xBF"));
    let text = std::str::from_utf8(&csv[3..]).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Körzet;X;Y;Győztes;Különbség"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn repeated_runs_are_identical() {
    let a = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    let b = run_str(TWO_DISTRICTS, &scenario("")).unwrap();
    assert_eq!(a.district_csv, b.district_csv);
    assert_eq!(a.run_record, b.run_record);
    assert!(a.run_record.id.starts_with("RUN:"));
    assert_eq!(a.run_record.id.len(), 4 + 64);
}

#[test]
fn run_from_path_reads_the_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_DISTRICTS.as_bytes()).unwrap();
    let cfg = parse_scenario(&scenario("")).unwrap();
    let out = run_from_path(file.path(), &cfg).unwrap();
    assert_eq!(out.result.tally_for("X").unwrap().total_mandates, 7);

    let missing = run_from_path(&file.path().with_extension("absent"), &cfg).unwrap_err();
    assert!(matches!(missing, PipelineError::Io(IoError::Path(_))));
}

#[test]
fn bundled_demo_runs() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let cfg = sp_io::config::load_scenario(&root.join("scenario.json")).unwrap();
    let out = run_from_path(&root.join("baseline.csv"), &cfg).unwrap();
    let r = &out.result;

    assert_eq!(r.parties, vec!["X", "Y", "Z", "Független"]);
    assert_eq!(r.districts.len(), 5);
    assert_eq!(r.seat_pool, 24);
    let independent = r.tally_for("Független").unwrap();
    assert!(!independent.eligible);
    assert_eq!(independent.list_mandates, 0);
    assert!(r.tally_for("Z").unwrap().list_mandates >= 1);
    assert_eq!(r.tally.iter().map(|t| t.list_mandates).sum::<u32>(), 25);
    assert!(r.diagnostics.is_empty());
}
