use cabrs_terminal::live_sync::ScenarioPatch;
use cabrs_terminal::predictor::{AnalysisResult, InningsSimResult, Metadata, WinSimResult};
use cabrs_terminal::schedule::ScheduleEntry;
use cabrs_terminal::state::{
    apply_delta, AnalysisView, AppState, Delta, Screen, WorkflowKind, WorkflowPayload,
};

fn metadata() -> Metadata {
    Metadata {
        venues: vec!["Wankhede Stadium".to_string(), "Eden Gardens".to_string()],
        batters: vec![
            "V Kohli".to_string(),
            "RG Sharma".to_string(),
            "SA Yadav".to_string(),
        ],
        bowlers: vec!["JJ Bumrah".to_string(), "YS Chahal".to_string()],
    }
}

fn bootstrapped_state() -> AppState {
    let mut state = AppState::new();
    state.apply_metadata(metadata());
    state.toggle_bowler_under_cursor();
    state
}

fn matchup_payload(name: &str) -> WorkflowPayload {
    WorkflowPayload::BestMatchup(AnalysisResult {
        top_recommendation: name.to_string(),
        confidence: 90.0,
        predictions: Vec::new(),
        bio: String::new(),
    })
}

#[test]
fn metadata_seeds_default_scenario() {
    let mut state = AppState::new();
    assert!(!state.bootstrapped);
    state.apply_metadata(metadata());
    assert!(state.bootstrapped);
    assert_eq!(state.scenario.venue, "Wankhede Stadium");
    assert_eq!(state.scenario.striker, "V Kohli");
    assert_eq!(state.scenario.non_striker, "RG Sharma");
    assert_eq!(state.scenario.over, 10);
    assert_eq!(state.scenario.innings, 1);
}

#[test]
fn begin_workflow_requires_bowlers() {
    let mut state = AppState::new();
    state.apply_metadata(metadata());
    state.view = AnalysisView::WinProbability(WinSimResult::default());

    assert!(state.begin_workflow(WorkflowKind::BestMatchup).is_none());
    assert_eq!(state.error, "No bowlers selected.");
    assert!(!state.loading);
    // The previous result survives a refused launch.
    assert!(matches!(state.view, AnalysisView::WinProbability(_)));
}

#[test]
fn begin_workflow_clears_previous_result() {
    let mut state = bootstrapped_state();
    state.error = "Analysis Failed.".to_string();
    state.view = AnalysisView::InningsProjection(InningsSimResult::default());

    let ticket = state
        .begin_workflow(WorkflowKind::WinProbability)
        .expect("bowlers are selected");
    assert!(state.loading);
    assert!(state.error.is_empty());
    assert!(state.view.is_none());
    assert_eq!(ticket.kind, WorkflowKind::WinProbability);
}

#[test]
fn completion_lands_only_for_the_current_ticket() {
    let mut state = bootstrapped_state();
    let stale = state
        .begin_workflow(WorkflowKind::BestMatchup)
        .expect("bowlers are selected");
    let current = state
        .begin_workflow(WorkflowKind::BestMatchup)
        .expect("bowlers are selected");

    state.complete_workflow(stale, matchup_payload("Stale Pick"));
    assert!(state.loading, "stale completion must not land");
    assert!(state.view.is_none());

    state.complete_workflow(current, matchup_payload("Fresh Pick"));
    assert!(!state.loading);
    match &state.view {
        AnalysisView::BestMatchup(result) => {
            assert_eq!(result.top_recommendation, "Fresh Pick")
        }
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn mismatched_payload_kind_is_discarded() {
    let mut state = bootstrapped_state();
    let ticket = state
        .begin_workflow(WorkflowKind::WinProbability)
        .expect("bowlers are selected");

    state.complete_workflow(ticket, matchup_payload("Wrong Shape"));
    assert!(state.loading);
    assert!(state.view.is_none());
}

#[test]
fn stale_failure_is_discarded() {
    let mut state = bootstrapped_state();
    let stale = state
        .begin_workflow(WorkflowKind::BestMatchup)
        .expect("bowlers are selected");
    let current = state
        .begin_workflow(WorkflowKind::WinProbability)
        .expect("bowlers are selected");

    state.fail_workflow(stale, "Analysis Failed.");
    assert!(state.loading, "stale failure must not land");
    assert!(state.error.is_empty());

    state.fail_workflow(current, "Win simulation failed.");
    assert!(!state.loading);
    assert_eq!(state.error, "Win simulation failed.");
}

#[test]
fn scenario_request_mirrors_the_scenario() {
    let mut state = bootstrapped_state();
    state.scenario.over = 17;
    state.scenario.innings = 2;
    let request = state.scenario_request();
    assert_eq!(request.venue, "Wankhede Stadium");
    assert_eq!(request.striker, "V Kohli");
    assert_eq!(request.non_striker, "RG Sharma");
    assert_eq!(request.over, 17);
    assert_eq!(request.inning, 2);
    assert_eq!(request.bowler_list, vec!["JJ Bumrah".to_string()]);
}

#[test]
fn striker_cycling_skips_the_non_striker() {
    let mut state = bootstrapped_state();
    // batters: Kohli (striker), Sharma (non-striker), Yadav
    state.cycle_striker(true);
    assert_eq!(state.scenario.striker, "SA Yadav");
    state.cycle_striker(true);
    assert_eq!(state.scenario.striker, "V Kohli");
    assert_eq!(state.scenario.non_striker, "RG Sharma");
}

#[test]
fn over_adjustment_clamps_to_t20_range() {
    let mut state = AppState::new();
    state.scenario.over = 1;
    state.adjust_over(-1);
    assert_eq!(state.scenario.over, 1);
    state.scenario.over = 20;
    state.adjust_over(1);
    assert_eq!(state.scenario.over, 20);
}

#[test]
fn bowler_toggle_has_set_semantics() {
    let mut state = AppState::new();
    state.apply_metadata(metadata());
    state.toggle_bowler_under_cursor();
    state.toggle_bowler_under_cursor();
    assert!(state.scenario.candidate_bowlers.is_empty());
    state.toggle_bowler_under_cursor();
    state.bowler_cursor_next();
    state.toggle_bowler_under_cursor();
    assert_eq!(
        state.scenario.candidate_bowlers,
        vec!["JJ Bumrah".to_string(), "YS Chahal".to_string()]
    );
}

#[test]
fn scenario_patch_applies_atomically_and_returns_home() {
    let mut state = bootstrapped_state();
    state.screen = Screen::Schedule;
    state.scorecard_open = true;

    state.apply_scenario_patch(ScenarioPatch {
        venue: Some("Eden Gardens".to_string()),
        innings: 2,
        over: 14,
    });
    assert_eq!(state.scenario.venue, "Eden Gardens");
    assert_eq!(state.scenario.innings, 2);
    assert_eq!(state.scenario.over, 14);
    assert_eq!(state.screen, Screen::Scenario);
    assert!(!state.scorecard_open);

    // An unresolved venue leaves the current one alone.
    state.apply_scenario_patch(ScenarioPatch {
        venue: None,
        innings: 1,
        over: 6,
    });
    assert_eq!(state.scenario.venue, "Eden Gardens");
    assert_eq!(state.scenario.over, 6);
}

#[test]
fn bootstrap_failure_keeps_a_persistent_error() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::BootstrapFailed("timed out".to_string()));
    assert_eq!(state.error, "Backend connection failed.");
    assert!(!state.bootstrapped);
    assert!(state
        .logs
        .back()
        .is_some_and(|log| log.contains("timed out")));

    apply_delta(&mut state, Delta::SetMetadata(metadata()));
    assert!(state.bootstrapped);
    assert!(state.error.is_empty());
}

#[test]
fn schedule_delta_clamps_the_selection() {
    let mut state = AppState::new();
    state.schedule = vec![ScheduleEntry::default(); 5];
    state.schedule_selected = 4;
    apply_delta(
        &mut state,
        Delta::SetSchedule(vec![ScheduleEntry::default(); 2]),
    );
    assert_eq!(state.schedule.len(), 2);
    assert_eq!(state.schedule_selected, 1);
    assert!(!state.schedule_loading);
}

#[test]
fn workflow_deltas_route_through_the_ticket_guard() {
    let mut state = bootstrapped_state();
    let ticket = state
        .begin_workflow(WorkflowKind::BestMatchup)
        .expect("bowlers are selected");

    apply_delta(
        &mut state,
        Delta::WorkflowCompleted {
            ticket,
            payload: matchup_payload("JJ Bumrah"),
        },
    );
    assert!(!state.loading);
    assert!(matches!(state.view, AnalysisView::BestMatchup(_)));

    // The same ticket cannot land twice.
    apply_delta(
        &mut state,
        Delta::WorkflowFailed {
            ticket,
            message: "Analysis Failed.".to_string(),
        },
    );
    assert!(state.error.is_empty());
}

#[test]
fn log_ring_is_capped() {
    let mut state = AppState::new();
    for i in 0..250 {
        state.push_log(format!("[INFO] entry {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] entry 50"));
}
