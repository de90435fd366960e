use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use cabrs_terminal::config::Config;
use cabrs_terminal::fake_feed;
use cabrs_terminal::http_client;
use cabrs_terminal::live_sync::sync_from_live_match;
use cabrs_terminal::metrics;
use cabrs_terminal::provider;
use cabrs_terminal::schedule::ScheduleEntry;
use cabrs_terminal::state::{
    apply_delta, AnalysisView, AppState, Delta, ProviderCommand, ScenarioField, Screen,
    WorkflowKind,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    total_scheduled_matches: u32,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>, total_scheduled_matches: u32) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            total_scheduled_matches,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }
        if self.state.scorecard_open {
            match key.code {
                KeyCode::Char('s') => self.sync_selected_live_match(),
                _ => self.state.scorecard_open = false,
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') => self.state.screen = Screen::Scenario,
            KeyCode::Char('2') => self.state.screen = Screen::Schedule,
            _ => match self.state.screen {
                Screen::Scenario => self.on_scenario_key(key),
                Screen::Schedule => self.on_schedule_key(key),
            },
        }
    }

    fn on_scenario_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.cycle_field(true),
            KeyCode::BackTab => self.state.cycle_field(false),
            KeyCode::Char('a') => self.launch_workflow(WorkflowKind::BestMatchup),
            KeyCode::Char('w') => self.launch_workflow(WorkflowKind::WinProbability),
            KeyCode::Char('f') => self.launch_workflow(WorkflowKind::InningsProjection),
            KeyCode::Char('m') => self.retry_metadata(),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.field == ScenarioField::Bowlers {
                    self.state.bowler_cursor_next();
                } else {
                    self.state.cycle_field(true);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.state.field == ScenarioField::Bowlers {
                    self.state.bowler_cursor_prev();
                } else {
                    self.state.cycle_field(false);
                }
            }
            KeyCode::Char('h') | KeyCode::Left => self.adjust_field(false),
            KeyCode::Char('l') | KeyCode::Right => self.adjust_field(true),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.state.field == ScenarioField::Bowlers {
                    self.state.toggle_bowler_under_cursor();
                }
            }
            _ => {}
        }
    }

    fn on_schedule_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_schedule_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_schedule_prev(),
            KeyCode::Enter => {
                if self.state.selected_schedule_entry().is_some() {
                    self.state.scorecard_open = true;
                }
            }
            KeyCode::Char('s') => self.sync_selected_live_match(),
            KeyCode::Char('r') => self.request_schedule(),
            KeyCode::Esc | KeyCode::Char('b') => self.state.screen = Screen::Scenario,
            _ => {}
        }
    }

    fn adjust_field(&mut self, forward: bool) {
        match self.state.field {
            ScenarioField::Innings => self.state.toggle_innings(),
            ScenarioField::Venue => self.state.cycle_venue(forward),
            ScenarioField::Striker => self.state.cycle_striker(forward),
            ScenarioField::NonStriker => self.state.cycle_non_striker(forward),
            ScenarioField::Over => self.state.adjust_over(if forward { 1 } else { -1 }),
            ScenarioField::Bowlers => {
                if forward {
                    self.state.bowler_cursor_next();
                } else {
                    self.state.bowler_cursor_prev();
                }
            }
        }
    }

    fn launch_workflow(&mut self, kind: WorkflowKind) {
        // UI policy: ignore launch keys while a workflow is loading. A hung
        // request would otherwise stack invisible retries.
        if self.state.loading {
            self.state.push_log("[INFO] Analysis already in flight");
            return;
        }
        let Some(ticket) = self.state.begin_workflow(kind) else {
            return;
        };
        let request = self.state.scenario_request();
        if self
            .cmd_tx
            .send(ProviderCommand::RunWorkflow { ticket, request })
            .is_err()
        {
            self.state.fail_workflow(ticket, kind.failure_message());
        }
    }

    fn retry_metadata(&mut self) {
        if self.state.bootstrapped {
            return;
        }
        if self.cmd_tx.send(ProviderCommand::FetchMetadata).is_ok() {
            self.state.push_log("[INFO] Metadata retry sent");
        }
    }

    fn request_schedule(&mut self) {
        if self.cmd_tx.send(ProviderCommand::FetchSchedule).is_ok() {
            self.state.schedule_loading = true;
            self.state.push_log("[INFO] Schedule refresh sent");
        }
    }

    fn sync_selected_live_match(&mut self) {
        let Some(entry) = self.state.selected_schedule_entry() else {
            return;
        };
        if !entry.is_live() {
            self.state.push_log("[INFO] Selected match is not live");
            return;
        }
        let patch = sync_from_live_match(entry, &self.state.metadata.venues);
        let label = entry.teams.join(" vs ");
        self.state.apply_scenario_patch(patch);
        self.state.push_log(format!("[INFO] Scenario synced from {label}"));
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();
    if let Err(err) = http_client::configure(config.request_timeout) {
        eprintln!("error: {err:#}");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if config.fake_feed {
        fake_feed::spawn_fake_provider(tx, cmd_rx);
    } else {
        provider::spawn_provider(tx, cmd_rx, config.clone());
    }

    let mut app = App::new(cmd_tx, config.total_scheduled_matches);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_error_banner(frame, chunks[1], &app.state);

    match app.state.screen {
        Screen::Scenario => render_scenario(frame, chunks[2], &app.state),
        Screen::Schedule => render_schedule(frame, chunks[2], app),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.scorecard_open {
        render_scorecard_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let health = match state.health_status.as_deref() {
        Some("ok") => "● ONLINE",
        Some(_) => "● OFFLINE",
        None => "○ CHECKING",
    };
    let screen = match state.screen {
        Screen::Scenario => "SCENARIO",
        Screen::Schedule => "SCHEDULE",
    };
    format!("CABRS TERMINAL | Context-Aware Bowler Recommendation | {screen} | {health}")
}

fn render_error_banner(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.error.is_empty() {
        return;
    }
    let banner = Paragraph::new(format!(" {} ", state.error)).style(
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(banner, area);
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Scenario => {
            "1 Scenario | 2 Schedule | Tab Field | h/l Adjust | Space Toggle bowler | a Matchup | w Win sim | f Innings sim | ? Help | q Quit"
                .to_string()
        }
        Screen::Schedule => {
            "1 Scenario | j/k Move | Enter Scorecard | s Sync live | r Refresh | b/Esc Back | ? Help | q Quit"
                .to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------- scenario screen ----------

fn render_scenario(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(columns[0]);

    render_form(frame, left[0], state);
    render_bowler_picker(frame, left[1], state);
    render_results(frame, columns[1], state);
}

fn field_line(label: &str, value: &str, focused: bool) -> String {
    let marker = if focused { ">" } else { " " };
    format!("{marker} {label:<12} {value}")
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let scenario = &state.scenario;
    let innings_label = if scenario.innings == 1 {
        "1st Inning"
    } else {
        "2nd Inning"
    };
    let over_label = format!(
        "{} ({})",
        scenario.over,
        metrics::over_phase(scenario.over)
    );
    let lines = [
        field_line(
            "Innings",
            innings_label,
            state.field == ScenarioField::Innings,
        ),
        field_line("Venue", &scenario.venue, state.field == ScenarioField::Venue),
        field_line(
            "Striker",
            &scenario.striker,
            state.field == ScenarioField::Striker,
        ),
        field_line(
            "Non-Striker",
            &scenario.non_striker,
            state.field == ScenarioField::NonStriker,
        ),
        field_line("Over", &over_label, state.field == ScenarioField::Over),
        format!(
            "  {:<12} {}",
            "Bowlers",
            if scenario.candidate_bowlers.is_empty() {
                "none selected".to_string()
            } else {
                scenario.candidate_bowlers.join(", ")
            }
        ),
    ]
    .join("\n");

    let form = Paragraph::new(lines)
        .block(Block::default().title("Match Situation").borders(Borders::ALL));
    frame.render_widget(form, area);
}

fn render_bowler_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Compare Bowlers")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.metadata.bowlers.is_empty() {
        let empty = Paragraph::new(if state.bootstrapped {
            "No bowlers in metadata"
        } else {
            "Waiting for metadata (m to retry)"
        })
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let focused = state.field == ScenarioField::Bowlers;
    let mut lines = Vec::new();
    for (idx, bowler) in state.metadata.bowlers.iter().enumerate() {
        let cursor = if focused && idx == state.bowler_cursor {
            ">"
        } else {
            " "
        };
        let mark = if state.is_bowler_selected(bowler) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!("{cursor} {mark} {bowler}"));
    }
    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.loading {
        let loading = Paragraph::new("Simulating scenarios...")
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Analysis").borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    }

    match &state.view {
        AnalysisView::None => {
            let hint = Paragraph::new(
                "Pick candidate bowlers, then:\n  a  Analyze Best Matchup\n  w  Simulate Win Probability\n  f  Simulate Full Innings",
            )
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Analysis").borders(Borders::ALL));
            frame.render_widget(hint, area);
        }
        AnalysisView::BestMatchup(result) => render_best_matchup(frame, area, result),
        AnalysisView::WinProbability(result) => render_win_probability(frame, area, result),
        AnalysisView::InningsProjection(result) => render_innings_projection(frame, area, result),
    }
}

fn text_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('░');
    }
    bar
}

fn render_best_matchup(
    frame: &mut Frame,
    area: Rect,
    result: &cabrs_terminal::predictor::AnalysisResult,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Min(1),
        ])
        .split(area);

    let mut card = vec![
        format!("PRIMARY SELECTION: {}", result.top_recommendation),
        format!("AI Confidence: {:.0}%", result.confidence),
    ];
    if let Some(top) = result.predictions.first() {
        card.push(format!("Impact Score: {:.3}", top.predicted_score));
    }
    card.push(format!("Scout Report: \"{}\"", result.bio));
    if let Some(top) = result.predictions.first() {
        for insight in &top.insights {
            card.push(format!("  › {insight}"));
        }
    }
    let card = Paragraph::new(card.join("\n"))
        .block(Block::default().title("Best Matchup").borders(Borders::ALL));
    frame.render_widget(card, rows[0]);

    render_comparison_vectors(frame, rows[1], result);
    render_unit_comparison(frame, rows[2], result);
}

fn render_comparison_vectors(
    frame: &mut Frame,
    area: Rect,
    result: &cabrs_terminal::predictor::AnalysisResult,
) {
    let block = Block::default()
        .title("Matchup Analysis")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let vectors = metrics::comparison_vectors(&result.predictions);
    if vectors.is_empty() {
        let empty = Paragraph::new("Needs two ranked bowlers to compare")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let leader = &result.predictions[0].bowler;
    let rival = &result.predictions[1].bowler;
    let mut lines = vec![format!("{leader:<20} vs {rival}")];
    for row in vectors {
        lines.push(format!(
            "{:<12} {} {:>5.1} | {:>5.1} {}",
            row.metric,
            text_bar(row.leader, 10),
            row.leader,
            row.rival,
            text_bar(row.rival, 10),
        ));
    }
    let table = Paragraph::new(lines.join("\n"));
    frame.render_widget(table, inner);
}

fn render_unit_comparison(
    frame: &mut Frame,
    area: Rect,
    result: &cabrs_terminal::predictor::AnalysisResult,
) {
    let block = Block::default()
        .title("Unit Comparison (Efficiency Rank)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (idx, prediction) in result.predictions.iter().enumerate() {
        let tag = if idx == 0 { "OPTIMAL" } else { "ALT" };
        lines.push(format!(
            "#{:<2} {:<20} impact {:>6.3}  {} {:<7}",
            idx + 1,
            prediction.bowler,
            prediction.predicted_score,
            text_bar(metrics::efficiency_width(prediction.predicted_score), 12),
            tag,
        ));
    }
    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_win_probability(
    frame: &mut Frame,
    area: Rect,
    result: &cabrs_terminal::predictor::WinSimResult,
) {
    let block = Block::default()
        .title("Win Probability Simulation")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if result.simulations.is_empty() {
        let empty = Paragraph::new("No simulations returned")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = Vec::new();
    for (idx, sim) in result.simulations.iter().enumerate() {
        let tag = if idx == 0 { "TOP IMPACT" } else { "ALTERNATIVE" };
        lines.push(format!(
            "{:<20} {} {:>5.1}%  {tag}",
            sim.bowler,
            text_bar(sim.win_probability, 20),
            sim.win_probability,
        ));
        lines.push(format!(
            "    predicted runs {:.1} | wicket probability {:.1}%",
            sim.predicted_runs, sim.wicket_probability
        ));
    }
    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_innings_projection(
    frame: &mut Frame,
    area: Rect,
    result: &cabrs_terminal::predictor::InningsSimResult,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(7),
        ])
        .split(area);

    let scoreboard = Paragraph::new(format!(
        "Projected Score: {:.0}   Wickets: {}   Overs Simulated: {}",
        result.projected_total_runs, result.projected_wickets, result.overs_simulated
    ))
    .block(
        Block::default()
            .title("Projected Innings Outcome")
            .borders(Borders::ALL),
    );
    frame.render_widget(scoreboard, rows[0]);

    let breakdown_lines: Vec<String> = result
        .over_breakdown
        .iter()
        .map(|over| {
            format!(
                "Over {:<2}  {:<20} {:>5.1} runs  {:>5.1}% wk",
                over.over, over.bowler, over.predicted_runs, over.wicket_probability
            )
        })
        .collect();
    let breakdown = Paragraph::new(breakdown_lines.join("\n")).block(
        Block::default()
            .title("Over Breakdown")
            .borders(Borders::ALL),
    );
    frame.render_widget(breakdown, rows[1]);

    let mut summary_lines = Vec::new();
    if let Some(summary) = metrics::tactical_summary(result) {
        summary_lines.push(format!(
            "Avg Runs/Over {:.2}   Peak Over {}   Safest Over {}   Projected RR {:.2}",
            summary.avg_runs_per_over,
            summary.peak_over.over,
            summary.safest_over.over,
            summary.projected_run_rate
        ));
    }
    let pressure = metrics::pressure_index(result.projected_total_runs);
    summary_lines.push(format!(
        "Pressure Index {:>3.0}% {}",
        pressure,
        text_bar(pressure, 24)
    ));
    let summary = Paragraph::new(summary_lines.join("\n")).block(
        Block::default()
            .title("Tactical Summary")
            .borders(Borders::ALL),
    );
    frame.render_widget(summary, rows[2]);
}

// ---------- schedule screen ----------

fn render_schedule(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(1)])
        .split(area);

    render_tournament_hub(frame, rows[0], app);
    render_registry(frame, rows[1], state);
}

fn render_tournament_hub(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let block = Block::default()
        .title("Tournament Hub")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let completed = state
        .schedule
        .iter()
        .filter(|entry| entry.match_ended)
        .count();
    let percent = metrics::completion_percent(&state.schedule, app.total_scheduled_matches);
    let mut lines = vec![format!(
        "Registry Completion {percent:>3}% {}  {completed} / {} matches",
        text_bar(percent as f64, 20),
        app.total_scheduled_matches
    )];

    let standings = metrics::top_teams(&state.schedule);
    if standings.is_empty() {
        lines.push("Awaiting match completions for standings...".to_string());
    } else {
        for (idx, team) in standings.iter().enumerate() {
            lines.push(format!(
                "0{} {:<28} {} wins",
                idx + 1,
                team.name,
                team.win_count
            ));
        }
    }
    let hub = Paragraph::new(lines.join("\n"));
    frame.render_widget(hub, inner);
}

fn registry_columns() -> [Constraint; 4] {
    [
        Constraint::Length(14),
        Constraint::Min(28),
        Constraint::Min(20),
        Constraint::Length(24),
    ]
}

fn render_registry(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Match Schedule")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.schedule_loading && state.schedule.is_empty() {
        let loading = Paragraph::new("Decoding registry...")
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(loading, inner);
        return;
    }
    if state.schedule.is_empty() {
        let empty = Paragraph::new("Satellite feed empty")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    if inner.height < 2 {
        return;
    }

    let widths = registry_columns();
    let header_area = Rect { height: 1, ..inner };
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(header_area);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, header_cols[0], "Timeline", header_style);
    render_cell_text(frame, header_cols[1], "Matchup", header_style);
    render_cell_text(frame, header_cols[2], "Venue", header_style);
    render_cell_text(frame, header_cols[3], "Status", header_style);

    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };
    let visible = list_area.height as usize;
    let total = state.schedule.len();
    let (start, end) = visible_range(state.schedule_selected, total, visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let entry = &state.schedule[idx];
        let selected = idx == state.schedule_selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let matchup = entry.teams.join(" vs ");
        render_cell_text(frame, cols[0], &format_start_time(&entry.date_time_gmt), row_style);
        render_cell_text(frame, cols[1], &matchup, row_style);
        render_cell_text(frame, cols[2], &entry.venue, row_style);
        render_cell_text(frame, cols[3], &registry_status(entry), row_style);
    }
}

fn registry_status(entry: &ScheduleEntry) -> String {
    if entry.is_live() {
        "LIVE (s to sync)".to_string()
    } else if entry.match_ended {
        "RESULT RECORDED".to_string()
    } else {
        "SCHEDULED".to_string()
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn format_start_time(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "TBD".to_string();
    }
    let cleaned = raw.trim().trim_end_matches('Z');
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return dt.format("%b %d %H:%M").to_string();
        }
    }
    if cleaned.len() >= 16 {
        return cleaned[..16].replace('T', " ");
    }
    cleaned.replace('T', " ")
}

fn render_scorecard_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(entry) = state.selected_schedule_entry() else {
        return;
    };
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![entry.teams.join(" vs "), String::new()];
    for (idx, score) in entry.score.iter().enumerate() {
        let team = entry
            .teams
            .get(idx)
            .map(String::as_str)
            .unwrap_or("Innings");
        let overs = score
            .overs
            .map(|o| format!("{o:.1}"))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{team}: {}/{} ({overs} ov)",
            score.runs, score.wickets
        ));
    }
    if entry.score.is_empty() {
        lines.push("No innings recorded".to_string());
    }
    lines.push(String::new());
    lines.push(if entry.status.is_empty() {
        if entry.match_started {
            "Match in Progress".to_string()
        } else {
            "Match Scheduled".to_string()
        }
    } else {
        entry.status.clone()
    });
    if entry.is_live() {
        lines.push(String::new());
        lines.push("s  Sync scenario from this match".to_string());
    }

    let card = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("Official Scorecard")
            .borders(Borders::ALL),
    );
    frame.render_widget(card, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "CABRS Terminal - Help",
        "",
        "Global:",
        "  1            Scenario screen",
        "  2            Schedule screen",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Scenario:",
        "  Tab/S-Tab    Move between fields",
        "  h/l or ←/→   Adjust focused field",
        "  j/k or ↑/↓   Move bowler cursor",
        "  Space/Enter  Toggle bowler selection",
        "  a            Analyze best matchup",
        "  w            Simulate win probability",
        "  f            Simulate full innings",
        "  m            Retry metadata fetch",
        "",
        "Schedule:",
        "  j/k or ↑/↓   Move selection",
        "  Enter        Scorecard overlay",
        "  s            Sync scenario from live match",
        "  r            Refresh feed",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
