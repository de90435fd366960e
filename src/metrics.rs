//! Derived metrics computed client-side from raw predictor payloads.
//! Everything here is pure; completion handlers call these freely.

use crate::predictor::{BowlerPrediction, InningsSimResult, OverProjection};
use crate::schedule::ScheduleEntry;

/// Fixed display order for the matchup comparison rows.
pub const COMPARISON_METRICS: [&str; 5] =
    ["AI WEIGHT", "ECONOMY", "STRIKE RATE", "DOT BALL %", "PRESSURE"];

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub leader: f64,
    pub rival: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TacticalSummary {
    pub avg_runs_per_over: f64,
    pub peak_over: OverProjection,
    pub safest_over: OverProjection,
    pub projected_run_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStanding {
    pub name: String,
    pub win_count: u32,
}

/// Inverse-score normalization into a 10-100 display scale; lower predicted
/// runs conceded shows as a higher weight.
pub fn ai_weight(predicted_score: f64) -> f64 {
    (100.0 - predicted_score * 10.0).clamp(10.0, 100.0)
}

/// Same scale as [`ai_weight`] with a higher floor so the efficiency bar on a
/// comparison card never collapses to a sliver.
pub fn efficiency_width(predicted_score: f64) -> f64 {
    (100.0 - predicted_score * 10.0).clamp(15.0, 100.0)
}

/// One row per comparison metric for the top two ranked bowlers. A single
/// prediction has nothing to compare against, so the result is empty.
pub fn comparison_vectors(predictions: &[BowlerPrediction]) -> Vec<ComparisonRow> {
    let (Some(leader), Some(rival)) = (predictions.first(), predictions.get(1)) else {
        return Vec::new();
    };

    let leader_values = [
        ai_weight(leader.predicted_score),
        leader.metrics.economy,
        leader.metrics.strike_rate,
        leader.metrics.dot_percent,
        leader.metrics.pressure,
    ];
    let rival_values = [
        ai_weight(rival.predicted_score),
        rival.metrics.economy,
        rival.metrics.strike_rate,
        rival.metrics.dot_percent,
        rival.metrics.pressure,
    ];

    COMPARISON_METRICS
        .iter()
        .zip(leader_values.iter().zip(rival_values.iter()))
        .map(|(metric, (leader, rival))| ComparisonRow {
            metric,
            leader: *leader,
            rival: *rival,
        })
        .collect()
}

/// Match-intensity gauge for the innings view, 20-100.
pub fn pressure_index(projected_total_runs: f64) -> f64 {
    (projected_total_runs * 0.8).clamp(20.0, 100.0)
}

/// Aggregates over the simulated over breakdown. Peak is the first entry with
/// the highest projected runs, safest the first with the lowest wicket
/// probability. The run rate uses a fixed 20-over denominator so partial
/// simulations stay comparable to a full T20 innings.
pub fn tactical_summary(sim: &InningsSimResult) -> Option<TacticalSummary> {
    if sim.overs_simulated == 0 || sim.over_breakdown.is_empty() {
        return None;
    }

    let mut peak = &sim.over_breakdown[0];
    let mut safest = &sim.over_breakdown[0];
    for entry in &sim.over_breakdown[1..] {
        if entry.predicted_runs > peak.predicted_runs {
            peak = entry;
        }
        if entry.wicket_probability < safest.wicket_probability {
            safest = entry;
        }
    }

    Some(TacticalSummary {
        avg_runs_per_over: sim.projected_total_runs / sim.overs_simulated as f64,
        peak_over: peak.clone(),
        safest_over: safest.clone(),
        projected_run_rate: sim.projected_total_runs / 20.0,
    })
}

/// Phase of a T20 innings for a given over, as shown next to the over slider.
pub fn over_phase(over: u8) -> &'static str {
    if over <= 6 {
        "Powerplay"
    } else if over <= 15 {
        "Middle Overs"
    } else {
        "Death Overs"
    }
}

/// Top three teams by wins across finished matches. The winner of a match is
/// inferred by substring: the first team of the pair whose name appears in
/// the free-text status. That inference is ambiguous when one team's name
/// contains the other's; the first listed team is then credited, matching the
/// upstream feed conventions this client has always relied on.
pub fn top_teams(schedule: &[ScheduleEntry]) -> Vec<TeamStanding> {
    let mut tally: Vec<TeamStanding> = Vec::new();

    for entry in schedule {
        if !entry.match_ended || !entry.status.contains("won") {
            continue;
        }
        let Some(winner) = entry.teams.iter().find(|team| entry.status.contains(*team))
        else {
            continue;
        };
        match tally.iter_mut().find(|standing| &standing.name == winner) {
            Some(standing) => standing.win_count += 1,
            None => tally.push(TeamStanding {
                name: winner.clone(),
                win_count: 1,
            }),
        }
    }

    // Stable sort keeps first-encountered order on equal win counts.
    tally.sort_by(|a, b| b.win_count.cmp(&a.win_count));
    tally.truncate(3);
    tally
}

/// Percentage of the tournament played, against the configured tournament
/// size rather than the fetched collection (which may be filtered).
pub fn completion_percent(schedule: &[ScheduleEntry], total_scheduled: u32) -> u32 {
    if total_scheduled == 0 {
        return 0;
    }
    let ended = schedule.iter().filter(|entry| entry.match_ended).count() as f64;
    (100.0 * ended / total_scheduled as f64).round() as u32
}
