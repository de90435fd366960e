use std::collections::VecDeque;

use crate::live_sync::ScenarioPatch;
use crate::predictor::{
    AnalysisResult, InningsSimResult, Metadata, ScenarioRequest, WinSimResult,
};
use crate::schedule::ScheduleEntry;

pub const MIN_OVER: u8 = 1;
pub const MAX_OVER: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Scenario,
    Schedule,
}

/// Which scenario form field the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioField {
    Innings,
    Venue,
    Striker,
    NonStriker,
    Over,
    Bowlers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    BestMatchup,
    WinProbability,
    InningsProjection,
}

impl WorkflowKind {
    pub fn failure_message(self) -> &'static str {
        match self {
            WorkflowKind::BestMatchup => "Analysis Failed.",
            WorkflowKind::WinProbability => "Win simulation failed.",
            WorkflowKind::InningsProjection => "Innings simulation failed.",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkflowKind::BestMatchup => "Best Matchup",
            WorkflowKind::WinProbability => "Win Probability",
            WorkflowKind::InningsProjection => "Innings Projection",
        }
    }
}

/// Issued by `begin_workflow`; a completion or failure only lands if it still
/// carries the current ticket. Responses from an abandoned workflow are
/// discarded, not cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTicket {
    pub kind: WorkflowKind,
    pub generation: u64,
}

/// The one result pane. Switching workflows atomically discards whatever the
/// previous workflow produced.
#[derive(Debug, Clone, Default)]
pub enum AnalysisView {
    #[default]
    None,
    BestMatchup(AnalysisResult),
    WinProbability(WinSimResult),
    InningsProjection(InningsSimResult),
}

impl AnalysisView {
    pub fn is_none(&self) -> bool {
        matches!(self, AnalysisView::None)
    }
}

#[derive(Debug, Clone)]
pub enum WorkflowPayload {
    BestMatchup(AnalysisResult),
    WinProbability(WinSimResult),
    InningsProjection(InningsSimResult),
}

impl WorkflowPayload {
    pub fn kind(&self) -> WorkflowKind {
        match self {
            WorkflowPayload::BestMatchup(_) => WorkflowKind::BestMatchup,
            WorkflowPayload::WinProbability(_) => WorkflowKind::WinProbability,
            WorkflowPayload::InningsProjection(_) => WorkflowKind::InningsProjection,
        }
    }
}

/// The match situation under analysis.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub venue: String,
    pub striker: String,
    pub non_striker: String,
    pub over: u8,
    pub innings: u8,
    pub candidate_bowlers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub field: ScenarioField,
    pub scenario: Scenario,
    pub metadata: Metadata,
    pub bootstrapped: bool,
    pub loading: bool,
    pub error: String,
    pub view: AnalysisView,
    active_workflow: Option<WorkflowTicket>,
    generation: u64,
    pub health_status: Option<String>,
    pub schedule: Vec<ScheduleEntry>,
    pub schedule_loading: bool,
    pub schedule_selected: usize,
    pub scorecard_open: bool,
    pub bowler_cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Scenario,
            field: ScenarioField::Venue,
            scenario: Scenario {
                over: 10,
                innings: 1,
                ..Scenario::default()
            },
            metadata: Metadata::default(),
            bootstrapped: false,
            loading: false,
            error: String::new(),
            view: AnalysisView::None,
            active_workflow: None,
            generation: 0,
            health_status: None,
            schedule: Vec::new(),
            schedule_loading: false,
            schedule_selected: 0,
            scorecard_open: false,
            bowler_cursor: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    // ----- workflow lifecycle -----

    /// Launches a workflow: clears the error and the previous result, flips
    /// the loading flag and hands back a ticket. With no candidate bowlers
    /// selected this refuses up front, before any network traffic, leaving
    /// everything but the error message untouched.
    pub fn begin_workflow(&mut self, kind: WorkflowKind) -> Option<WorkflowTicket> {
        if self.scenario.candidate_bowlers.is_empty() {
            self.error = "No bowlers selected.".to_string();
            return None;
        }
        self.error.clear();
        self.loading = true;
        self.view = AnalysisView::None;
        self.generation += 1;
        let ticket = WorkflowTicket {
            kind,
            generation: self.generation,
        };
        self.active_workflow = Some(ticket);
        Some(ticket)
    }

    /// Applies a finished workflow's payload, but only when the ticket is
    /// still current; a late response from an abandoned workflow is a no-op.
    pub fn complete_workflow(&mut self, ticket: WorkflowTicket, payload: WorkflowPayload) {
        if self.active_workflow != Some(ticket) || payload.kind() != ticket.kind {
            return;
        }
        self.view = match payload {
            WorkflowPayload::BestMatchup(result) => AnalysisView::BestMatchup(result),
            WorkflowPayload::WinProbability(result) => AnalysisView::WinProbability(result),
            WorkflowPayload::InningsProjection(result) => AnalysisView::InningsProjection(result),
        };
        self.loading = false;
        self.active_workflow = None;
    }

    /// Same ticket guard as completions: only the workflow the operator is
    /// still waiting on may surface its error.
    pub fn fail_workflow(&mut self, ticket: WorkflowTicket, message: impl Into<String>) {
        if self.active_workflow != Some(ticket) {
            return;
        }
        self.error = message.into();
        self.loading = false;
        self.active_workflow = None;
    }

    pub fn workflow_in_flight(&self) -> bool {
        self.active_workflow.is_some()
    }

    /// Request body for the current scenario.
    pub fn scenario_request(&self) -> ScenarioRequest {
        ScenarioRequest {
            venue: self.scenario.venue.clone(),
            striker: self.scenario.striker.clone(),
            non_striker: self.scenario.non_striker.clone(),
            over: self.scenario.over,
            inning: self.scenario.innings,
            bowler_list: self.scenario.candidate_bowlers.clone(),
        }
    }

    // ----- bootstrap -----

    /// Seeds the default scenario from backend metadata: first venue, first
    /// two batters as striker/non-striker.
    pub fn apply_metadata(&mut self, metadata: Metadata) {
        self.scenario.venue = metadata.venues.first().cloned().unwrap_or_default();
        self.scenario.striker = metadata.batters.first().cloned().unwrap_or_default();
        self.scenario.non_striker = metadata.batters.get(1).cloned().unwrap_or_default();
        self.metadata = metadata;
        self.bootstrapped = true;
        self.bowler_cursor = 0;
    }

    // ----- scenario editing -----

    pub fn cycle_field(&mut self, forward: bool) {
        const ORDER: [ScenarioField; 6] = [
            ScenarioField::Innings,
            ScenarioField::Venue,
            ScenarioField::Striker,
            ScenarioField::NonStriker,
            ScenarioField::Over,
            ScenarioField::Bowlers,
        ];
        let pos = ORDER.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (pos + 1) % ORDER.len()
        } else {
            (pos + ORDER.len() - 1) % ORDER.len()
        };
        self.field = ORDER[next];
    }

    pub fn toggle_innings(&mut self) {
        self.scenario.innings = if self.scenario.innings == 1 { 2 } else { 1 };
    }

    pub fn adjust_over(&mut self, delta: i8) {
        let over = self.scenario.over as i16 + delta as i16;
        self.scenario.over = over.clamp(MIN_OVER as i16, MAX_OVER as i16) as u8;
    }

    pub fn cycle_venue(&mut self, forward: bool) {
        self.scenario.venue =
            cycle_option(&self.metadata.venues, &self.scenario.venue, forward, None);
    }

    /// Cycles the striker, skipping the current non-striker so the two never
    /// collide.
    pub fn cycle_striker(&mut self, forward: bool) {
        self.scenario.striker = cycle_option(
            &self.metadata.batters,
            &self.scenario.striker,
            forward,
            Some(&self.scenario.non_striker),
        );
    }

    pub fn cycle_non_striker(&mut self, forward: bool) {
        self.scenario.non_striker = cycle_option(
            &self.metadata.batters,
            &self.scenario.non_striker,
            forward,
            Some(&self.scenario.striker),
        );
    }

    pub fn bowler_cursor_next(&mut self) {
        let total = self.metadata.bowlers.len();
        if total == 0 {
            self.bowler_cursor = 0;
            return;
        }
        self.bowler_cursor = (self.bowler_cursor + 1) % total;
    }

    pub fn bowler_cursor_prev(&mut self) {
        let total = self.metadata.bowlers.len();
        if total == 0 {
            self.bowler_cursor = 0;
            return;
        }
        if self.bowler_cursor == 0 {
            self.bowler_cursor = total - 1;
        } else {
            self.bowler_cursor -= 1;
        }
    }

    /// Adds or removes the bowler under the cursor. The candidate list keeps
    /// selection order but set semantics: no duplicates.
    pub fn toggle_bowler_under_cursor(&mut self) {
        let Some(name) = self.metadata.bowlers.get(self.bowler_cursor).cloned() else {
            return;
        };
        if let Some(pos) = self
            .scenario
            .candidate_bowlers
            .iter()
            .position(|b| *b == name)
        {
            self.scenario.candidate_bowlers.remove(pos);
        } else {
            self.scenario.candidate_bowlers.push(name);
        }
    }

    pub fn is_bowler_selected(&self, name: &str) -> bool {
        self.scenario.candidate_bowlers.iter().any(|b| b == name)
    }

    // ----- live sync -----

    /// Applies a live-match patch in one step and jumps back to the editing
    /// surface so the operator sees what changed.
    pub fn apply_scenario_patch(&mut self, patch: ScenarioPatch) {
        if let Some(venue) = patch.venue {
            self.scenario.venue = venue;
        }
        self.scenario.innings = patch.innings;
        self.scenario.over = patch.over;
        self.screen = Screen::Scenario;
        self.scorecard_open = false;
    }

    // ----- schedule navigation -----

    pub fn selected_schedule_entry(&self) -> Option<&ScheduleEntry> {
        self.schedule.get(self.schedule_selected)
    }

    pub fn select_schedule_next(&mut self) {
        let total = self.schedule.len();
        if total == 0 {
            self.schedule_selected = 0;
            return;
        }
        self.schedule_selected = (self.schedule_selected + 1) % total;
    }

    pub fn select_schedule_prev(&mut self) {
        let total = self.schedule.len();
        if total == 0 {
            self.schedule_selected = 0;
            return;
        }
        if self.schedule_selected == 0 {
            self.schedule_selected = total - 1;
        } else {
            self.schedule_selected -= 1;
        }
    }

    pub fn clamp_schedule_selection(&mut self) {
        if self.schedule.is_empty() {
            self.schedule_selected = 0;
        } else if self.schedule_selected >= self.schedule.len() {
            self.schedule_selected = self.schedule.len() - 1;
        }
    }

    // ----- console -----

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

fn cycle_option(options: &[String], current: &str, forward: bool, skip: Option<&str>) -> String {
    if options.is_empty() {
        return current.to_string();
    }
    let len = options.len();
    let start = options.iter().position(|v| v == current).unwrap_or(0);
    let mut idx = start;
    for _ in 0..len {
        idx = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        let candidate = &options[idx];
        if skip.is_some_and(|s| s == candidate) {
            continue;
        }
        return candidate.clone();
    }
    current.to_string()
}

/// Messages from the provider thread, applied on the main loop.
#[derive(Debug, Clone)]
pub enum Delta {
    SetMetadata(Metadata),
    BootstrapFailed(String),
    SetHealth(String),
    WorkflowCompleted {
        ticket: WorkflowTicket,
        payload: WorkflowPayload,
    },
    WorkflowFailed {
        ticket: WorkflowTicket,
        message: String,
    },
    SetSchedule(Vec<ScheduleEntry>),
    ScheduleFailed(String),
    Log(String),
}

/// Requests from the UI to the provider thread.
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchMetadata,
    CheckHealth,
    RunWorkflow {
        ticket: WorkflowTicket,
        request: ScenarioRequest,
    },
    FetchSchedule,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetMetadata(metadata) => {
            state.apply_metadata(metadata);
            state.error.clear();
            state.push_log("[INFO] Metadata loaded");
        }
        Delta::BootstrapFailed(err) => {
            // Without metadata no valid scenario can be formed; the error
            // stays up until a retry succeeds.
            state.error = "Backend connection failed.".to_string();
            state.push_log(format!("[WARN] Metadata fetch error: {err}"));
        }
        Delta::SetHealth(status) => {
            state.health_status = Some(status);
        }
        Delta::WorkflowCompleted { ticket, payload } => {
            state.complete_workflow(ticket, payload);
        }
        Delta::WorkflowFailed { ticket, message } => {
            state.fail_workflow(ticket, message);
        }
        Delta::SetSchedule(entries) => {
            state.schedule = entries;
            state.schedule_loading = false;
            state.clamp_schedule_selection();
        }
        Delta::ScheduleFailed(err) => {
            state.schedule_loading = false;
            state.push_log(format!("[WARN] Schedule fetch error: {err}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
