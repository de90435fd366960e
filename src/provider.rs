use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::predictor;
use crate::schedule;
use crate::state::{Delta, ProviderCommand, WorkflowKind, WorkflowPayload, WorkflowTicket};

/// Background worker: owns all network I/O. Workflows each run on their own
/// thread so a slow response can still be in flight when the operator has
/// already launched a newer one; the store's ticket guard discards the
/// stragglers.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, config: Config) {
    thread::spawn(move || {
        fetch_metadata_async(&tx, &config.base_url);
        check_health_async(&tx, &config.base_url);
        fetch_schedule_async(&tx, &config.base_url);

        let mut last_health = Instant::now();
        let mut last_schedule = Instant::now();

        loop {
            thread::sleep(Duration::from_millis(200));

            if last_health.elapsed() >= config.health_poll {
                check_health_async(&tx, &config.base_url);
                last_health = Instant::now();
            }

            if last_schedule.elapsed() >= config.schedule_poll {
                fetch_schedule_async(&tx, &config.base_url);
                last_schedule = Instant::now();
            }

            loop {
                match cmd_rx.try_recv() {
                    Ok(ProviderCommand::FetchMetadata) => {
                        fetch_metadata_async(&tx, &config.base_url)
                    }
                    Ok(ProviderCommand::CheckHealth) => {
                        check_health_async(&tx, &config.base_url);
                        last_health = Instant::now();
                    }
                    Ok(ProviderCommand::FetchSchedule) => {
                        fetch_schedule_async(&tx, &config.base_url);
                        last_schedule = Instant::now();
                    }
                    Ok(ProviderCommand::RunWorkflow { ticket, request }) => {
                        run_workflow_async(&tx, &config.base_url, ticket, request);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
        }
    });
}

fn run_workflow_async(
    tx: &Sender<Delta>,
    base_url: &str,
    ticket: WorkflowTicket,
    request: predictor::ScenarioRequest,
) {
    let tx = tx.clone();
    let base_url = base_url.to_string();
    thread::spawn(move || {
        let outcome = match ticket.kind {
            WorkflowKind::BestMatchup => predictor::run_best_matchup(&base_url, &request)
                .map(WorkflowPayload::BestMatchup),
            WorkflowKind::WinProbability => predictor::run_win_probability(&base_url, &request)
                .map(WorkflowPayload::WinProbability),
            WorkflowKind::InningsProjection => {
                predictor::run_innings_projection(&base_url, &request)
                    .map(WorkflowPayload::InningsProjection)
            }
        };
        match outcome {
            Ok(payload) => {
                let _ = tx.send(Delta::WorkflowCompleted { ticket, payload });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] {} error: {err:#}",
                    ticket.kind.label()
                )));
                let _ = tx.send(Delta::WorkflowFailed {
                    ticket,
                    message: ticket.kind.failure_message().to_string(),
                });
            }
        }
    });
}

fn fetch_metadata_async(tx: &Sender<Delta>, base_url: &str) {
    let tx = tx.clone();
    let base_url = base_url.to_string();
    thread::spawn(move || match predictor::fetch_metadata(&base_url) {
        Ok(metadata) => {
            let _ = tx.send(Delta::SetMetadata(metadata));
        }
        Err(err) => {
            let _ = tx.send(Delta::BootstrapFailed(format!("{err:#}")));
        }
    });
}

fn check_health_async(tx: &Sender<Delta>, base_url: &str) {
    let tx = tx.clone();
    let base_url = base_url.to_string();
    thread::spawn(move || {
        let status = predictor::fetch_health(&base_url).unwrap_or_else(|_| "offline".to_string());
        let _ = tx.send(Delta::SetHealth(status));
    });
}

fn fetch_schedule_async(tx: &Sender<Delta>, base_url: &str) {
    let tx = tx.clone();
    let base_url = base_url.to_string();
    thread::spawn(move || match schedule::fetch_schedule(&base_url) {
        Ok(entries) => {
            let _ = tx.send(Delta::SetSchedule(entries));
        }
        Err(err) => {
            let _ = tx.send(Delta::ScheduleFailed(format!("{err:#}")));
        }
    });
}
