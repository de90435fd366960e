use std::fs;
use std::path::PathBuf;

use cabrs_terminal::predictor::{
    parse_bio_json, parse_innings_sim_json, parse_metadata_json, parse_predict_json,
    parse_win_sim_json,
};
use cabrs_terminal::schedule::parse_schedule_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_metadata_fixture() {
    let raw = read_fixture("metadata.json");
    let metadata = parse_metadata_json(&raw).expect("fixture should parse");
    assert_eq!(metadata.venues.len(), 3);
    assert_eq!(metadata.batters[0], "V Kohli");
    assert_eq!(metadata.bowlers.len(), 4);
}

#[test]
fn metadata_null_is_empty() {
    let metadata = parse_metadata_json("null").expect("null should parse");
    assert!(metadata.venues.is_empty());
    assert!(metadata.batters.is_empty());
    assert!(metadata.bowlers.is_empty());
}

#[test]
fn parses_predict_fixture() {
    let raw = read_fixture("predict.json");
    let result = parse_predict_json(&raw).expect("fixture should parse");
    assert_eq!(result.top_recommendation, "JJ Bumrah");
    assert_eq!(result.confidence, 87.5);
    assert_eq!(result.predictions.len(), 2);
    assert_eq!(result.predictions[0].bowler, "JJ Bumrah");
    assert_eq!(result.predictions[0].insights.len(), 2);
    assert_eq!(result.predictions[0].metrics.economy, 88.0);
    // Merged later from the bio endpoint, never from the predict payload.
    assert!(result.bio.is_empty());
}

#[test]
fn predict_without_recommendation_is_an_error() {
    assert!(parse_predict_json("").is_err());
    assert!(parse_predict_json("null").is_err());
    assert!(parse_predict_json(r#"{"top_recommendation": "  "}"#).is_err());
}

#[test]
fn predict_tolerates_missing_metrics_and_insights() {
    let raw = r#"{
        "top_recommendation": "R Ashwin",
        "predictions": [{"bowler": "R Ashwin", "predicted_score": 1.9}]
    }"#;
    let result = parse_predict_json(raw).expect("sparse payload should parse");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.predictions[0].metrics.economy, 0.0);
    assert!(result.predictions[0].insights.is_empty());
}

#[test]
fn win_sim_is_sorted_by_win_probability() {
    let raw = read_fixture("win_sim.json");
    let result = parse_win_sim_json(&raw).expect("fixture should parse");
    assert_eq!(result.simulations.len(), 3);
    assert_eq!(result.simulations[0].bowler, "JJ Bumrah");
    assert_eq!(result.simulations[1].bowler, "M Shami");
    assert_eq!(result.simulations[2].bowler, "YS Chahal");
}

#[test]
fn win_sim_null_is_empty() {
    let result = parse_win_sim_json("null").expect("null should parse");
    assert!(result.simulations.is_empty());
}

#[test]
fn innings_sim_breakdown_is_sorted_by_over() {
    let raw = read_fixture("innings_sim.json");
    let result = parse_innings_sim_json(&raw).expect("fixture should parse");
    assert_eq!(result.projected_total_runs, 164.0);
    assert_eq!(result.projected_wickets, 6);
    assert_eq!(result.overs_simulated, 4);
    let overs: Vec<u32> = result.over_breakdown.iter().map(|o| o.over).collect();
    assert_eq!(overs, vec![17, 18, 19, 20]);
}

#[test]
fn parses_bio_payload() {
    let bio = parse_bio_json(r#"{"bio": "Right-arm fast, lethal yorkers."}"#)
        .expect("bio should parse");
    assert_eq!(bio, "Right-arm fast, lethal yorkers.");
}

#[test]
fn parses_schedule_fixture() {
    let raw = read_fixture("schedule.json");
    let entries = parse_schedule_json(&raw).expect("fixture should parse");
    assert_eq!(entries.len(), 4);

    assert!(entries[0].is_live());
    assert_eq!(entries[0].score[0].runs, 120);
    assert_eq!(entries[0].score[0].wickets, 3);
    assert_eq!(entries[0].score[0].overs, Some(14.2));

    // Overs arrive as a string on this entry.
    assert!(!entries[1].is_live());
    assert_eq!(entries[1].score[1].overs, Some(20.0));

    assert!(!entries[2].match_started);
    assert!(entries[2].score.is_empty());

    // Unparseable overs string degrades to None, not an error.
    assert_eq!(entries[3].score[0].overs, None);
}

#[test]
fn schedule_null_is_empty() {
    let entries = parse_schedule_json("null").expect("null should parse");
    assert!(entries.is_empty());
    let entries = parse_schedule_json("  ").expect("blank should parse");
    assert!(entries.is_empty());
}
