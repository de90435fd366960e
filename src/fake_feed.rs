//! Offline demo provider. Answers the same command surface as the real
//! provider with generated payloads so the UI can be explored without a
//! running predictor (`PREDICTOR_FAKE=1`).

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::predictor::{
    AnalysisResult, BowlerMetrics, BowlerPrediction, InningsSimResult, Metadata, OverProjection,
    ScenarioRequest, WinSimEntry, WinSimResult,
};
use crate::schedule::{InningsScore, ScheduleEntry};
use crate::state::{Delta, ProviderCommand, WorkflowKind, WorkflowPayload, WorkflowTicket};

const VENUES: &[&str] = &[
    "Wankhede Stadium",
    "Eden Gardens",
    "M. Chinnaswamy Stadium",
    "Arun Jaitley Stadium",
    "MA Chidambaram Stadium",
];

const BATTERS: &[&str] = &[
    "V Kohli",
    "RG Sharma",
    "SA Yadav",
    "S Gill",
    "KL Rahul",
    "RR Pant",
];

const BOWLERS: &[&str] = &[
    "JJ Bumrah",
    "R Ashwin",
    "YS Chahal",
    "M Shami",
    "K Rabada",
    "Rashid Khan",
];

const TEAMS: &[&str] = &[
    "Mumbai Indians",
    "Chennai Super Kings",
    "Kolkata Knight Riders",
    "Royal Challengers Bengaluru",
    "Delhi Capitals",
    "Rajasthan Royals",
];

pub fn spawn_fake_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::SetMetadata(fake_metadata()));
        let _ = tx.send(Delta::SetHealth("ok".to_string()));
        let _ = tx.send(Delta::SetSchedule(fake_schedule()));
        let _ = tx.send(Delta::Log("[INFO] Offline demo feed active".to_string()));

        loop {
            thread::sleep(Duration::from_millis(100));
            loop {
                match cmd_rx.try_recv() {
                    Ok(ProviderCommand::FetchMetadata) => {
                        let _ = tx.send(Delta::SetMetadata(fake_metadata()));
                    }
                    Ok(ProviderCommand::CheckHealth) => {
                        let _ = tx.send(Delta::SetHealth("ok".to_string()));
                    }
                    Ok(ProviderCommand::FetchSchedule) => {
                        let _ = tx.send(Delta::SetSchedule(fake_schedule()));
                    }
                    Ok(ProviderCommand::RunWorkflow { ticket, request }) => {
                        run_fake_workflow(&tx, ticket, request);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
        }
    });
}

fn run_fake_workflow(tx: &Sender<Delta>, ticket: WorkflowTicket, request: ScenarioRequest) {
    let tx = tx.clone();
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        // Enough latency that launching another workflow mid-flight is easy
        // to reproduce by hand.
        thread::sleep(Duration::from_millis(rng.gen_range(300..900)));
        let payload = match ticket.kind {
            WorkflowKind::BestMatchup => {
                WorkflowPayload::BestMatchup(fake_analysis(&request, &mut rng))
            }
            WorkflowKind::WinProbability => {
                WorkflowPayload::WinProbability(fake_win_sim(&request, &mut rng))
            }
            WorkflowKind::InningsProjection => {
                WorkflowPayload::InningsProjection(fake_innings_sim(&request, &mut rng))
            }
        };
        let _ = tx.send(Delta::WorkflowCompleted { ticket, payload });
    });
}

fn fake_metadata() -> Metadata {
    Metadata {
        venues: VENUES.iter().map(|v| v.to_string()).collect(),
        batters: BATTERS.iter().map(|b| b.to_string()).collect(),
        bowlers: BOWLERS.iter().map(|b| b.to_string()).collect(),
    }
}

fn fake_analysis(request: &ScenarioRequest, rng: &mut impl Rng) -> AnalysisResult {
    let mut predictions: Vec<BowlerPrediction> = request
        .bowler_list
        .iter()
        .map(|bowler| BowlerPrediction {
            bowler: bowler.clone(),
            predicted_score: rng.gen_range(0.8..3.6),
            metrics: BowlerMetrics {
                economy: rng.gen_range(40.0..95.0),
                strike_rate: rng.gen_range(40.0..95.0),
                dot_percent: rng.gen_range(25.0..70.0),
                pressure: rng.gen_range(30.0..90.0),
            },
            insights: vec![
                format!("Strong record at {}", request.venue),
                format!("Favourable matchup against {}", request.striker),
            ],
        })
        .collect();
    predictions.sort_by(|a, b| {
        a.predicted_score
            .partial_cmp(&b.predicted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top = predictions
        .first()
        .map(|p| p.bowler.clone())
        .unwrap_or_default();
    AnalysisResult {
        bio: format!("{top} is a frontline option with a knack for breakthroughs in the {}-over phase.",
            request.over),
        top_recommendation: top,
        confidence: rng.gen_range(70.0..97.0),
        predictions,
    }
}

fn fake_win_sim(request: &ScenarioRequest, rng: &mut impl Rng) -> WinSimResult {
    let mut simulations: Vec<WinSimEntry> = request
        .bowler_list
        .iter()
        .map(|bowler| WinSimEntry {
            bowler: bowler.clone(),
            win_probability: rng.gen_range(35.0..85.0),
            predicted_runs: rng.gen_range(4.0..14.0),
            wicket_probability: rng.gen_range(5.0..45.0),
        })
        .collect();
    simulations.sort_by(|a, b| {
        b.win_probability
            .partial_cmp(&a.win_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    WinSimResult { simulations }
}

fn fake_innings_sim(request: &ScenarioRequest, rng: &mut impl Rng) -> InningsSimResult {
    let overs_simulated = (20 - request.over + 1) as u32;
    let mut total_runs = 0.0;
    let mut breakdown = Vec::with_capacity(overs_simulated as usize);
    for idx in 0..overs_simulated {
        let bowler = request
            .bowler_list
            .get(idx as usize % request.bowler_list.len().max(1))
            .cloned()
            .unwrap_or_default();
        let runs = rng.gen_range(3.0..16.0f64).round();
        total_runs += runs;
        breakdown.push(OverProjection {
            over: request.over as u32 + idx,
            bowler,
            predicted_runs: runs,
            wicket_probability: rng.gen_range(4.0..40.0f64).round(),
        });
    }
    InningsSimResult {
        projected_total_runs: total_runs + rng.gen_range(60.0..110.0f64).round(),
        projected_wickets: rng.gen_range(2..9),
        overs_simulated,
        over_breakdown: breakdown,
    }
}

fn fake_schedule() -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();
    for (idx, pair) in TEAMS.chunks(2).enumerate() {
        let [home, away] = pair else { continue };
        entries.push(ScheduleEntry {
            id: format!("demo-{idx}"),
            teams: vec![home.to_string(), away.to_string()],
            venue: format!("{}, Mumbai", VENUES[idx % VENUES.len()]),
            date_time_gmt: format!("2026-03-{:02}T14:00:00", 10 + idx),
            score: vec![InningsScore {
                runs: 142 + idx as u32 * 9,
                wickets: 4,
                overs: Some(13.0 + idx as f64),
            }],
            match_started: true,
            match_ended: idx > 0,
            status: if idx > 0 {
                format!("{home} won by {} runs", 12 + idx)
            } else {
                "Live".to_string()
            },
        });
    }
    entries
}
