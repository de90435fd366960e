use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::http_client::http_client;

/// Request body shared by all three analysis endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRequest {
    pub venue: String,
    pub striker: String,
    pub non_striker: String,
    pub over: u8,
    pub inning: u8,
    pub bowler_list: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Metadata {
    #[serde(default)]
    pub venues: Vec<String>,
    #[serde(default)]
    pub batters: Vec<String>,
    #[serde(default)]
    pub bowlers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct BowlerMetrics {
    #[serde(default)]
    pub economy: f64,
    #[serde(default)]
    pub strike_rate: f64,
    #[serde(default)]
    pub dot_percent: f64,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BowlerPrediction {
    pub bowler: String,
    pub predicted_score: f64,
    #[serde(default)]
    pub metrics: BowlerMetrics,
    #[serde(default, rename = "ai_insights")]
    pub insights: Vec<String>,
}

/// Best-matchup payload. `predictions` keeps the model's rank order, best
/// first. `bio` arrives from a separate endpoint and is merged in by
/// [`run_best_matchup`] before the result ever reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    pub top_recommendation: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub predictions: Vec<BowlerPrediction>,
    #[serde(skip)]
    pub bio: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WinSimEntry {
    pub bowler: String,
    #[serde(default)]
    pub win_probability: f64,
    #[serde(default)]
    pub predicted_runs: f64,
    #[serde(default)]
    pub wicket_probability: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WinSimResult {
    #[serde(default)]
    pub simulations: Vec<WinSimEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OverProjection {
    pub over: u32,
    #[serde(default)]
    pub bowler: String,
    #[serde(default)]
    pub predicted_runs: f64,
    #[serde(default)]
    pub wicket_probability: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct InningsSimResult {
    #[serde(default)]
    pub projected_total_runs: f64,
    #[serde(default)]
    pub projected_wickets: u32,
    #[serde(default)]
    pub overs_simulated: u32,
    #[serde(default)]
    pub over_breakdown: Vec<OverProjection>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct BioResponse {
    #[serde(default)]
    bio: String,
}

pub fn parse_metadata_json(raw: &str) -> Result<Metadata> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Metadata::default());
    }
    serde_json::from_str(trimmed).context("invalid metadata json")
}

pub fn parse_predict_json(raw: &str) -> Result<AnalysisResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("empty predict response");
    }
    let result: AnalysisResult =
        serde_json::from_str(trimmed).context("invalid predict json")?;
    if result.top_recommendation.trim().is_empty() {
        bail!("predict response has no top recommendation");
    }
    Ok(result)
}

/// Parses a win simulation, enforcing the top-impact-first ordering the
/// display assumes even if the backend returns entries unsorted.
pub fn parse_win_sim_json(raw: &str) -> Result<WinSimResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(WinSimResult::default());
    }
    let mut result: WinSimResult =
        serde_json::from_str(trimmed).context("invalid win simulation json")?;
    result.simulations.sort_by(|a, b| {
        b.win_probability
            .partial_cmp(&a.win_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(result)
}

/// Parses an innings simulation; the over breakdown is kept ascending by
/// over number, one entry per simulated over.
pub fn parse_innings_sim_json(raw: &str) -> Result<InningsSimResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(InningsSimResult::default());
    }
    let mut result: InningsSimResult =
        serde_json::from_str(trimmed).context("invalid innings simulation json")?;
    result.over_breakdown.sort_by_key(|entry| entry.over);
    Ok(result)
}

pub fn parse_bio_json(raw: &str) -> Result<String> {
    let response: BioResponse =
        serde_json::from_str(raw.trim()).context("invalid player bio json")?;
    Ok(response.bio)
}

pub fn fetch_metadata(base_url: &str) -> Result<Metadata> {
    let body = get_text(&format!("{base_url}/get_metadata"))?;
    parse_metadata_json(&body)
}

pub fn fetch_health(base_url: &str) -> Result<String> {
    let body = get_text(&format!("{base_url}/health"))?;
    let response: HealthResponse =
        serde_json::from_str(body.trim()).context("invalid health json")?;
    Ok(response.status)
}

pub fn fetch_player_bio(base_url: &str, player: &str) -> Result<String> {
    let encoded = urlencoding::encode(player);
    let body = get_text(&format!("{base_url}/get_player_bio/{encoded}"))?;
    parse_bio_json(&body)
}

/// Two-stage best-matchup pipeline: the prediction call must finish first
/// because the bio lookup is keyed by its top recommendation. The bio is not
/// optional; a failure in either stage fails the workflow as a whole.
pub fn run_best_matchup(base_url: &str, request: &ScenarioRequest) -> Result<AnalysisResult> {
    let body = post_json(&format!("{base_url}/predict"), request)?;
    let mut result = parse_predict_json(&body)?;
    result.bio = fetch_player_bio(base_url, &result.top_recommendation)
        .context("player bio fetch failed")?;
    Ok(result)
}

pub fn run_win_probability(base_url: &str, request: &ScenarioRequest) -> Result<WinSimResult> {
    let body = post_json(&format!("{base_url}/simulate_win_probability"), request)?;
    parse_win_sim_json(&body)
}

pub fn run_innings_projection(
    base_url: &str,
    request: &ScenarioRequest,
) -> Result<InningsSimResult> {
    let body = post_json(&format!("{base_url}/simulate_innings"), request)?;
    parse_innings_sim_json(&body)
}

fn get_text(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let resp = resp.error_for_status().context("request rejected")?;
    resp.text().context("response read failed")
}

fn post_json(url: &str, request: &ScenarioRequest) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .post(url)
        .json(request)
        .send()
        .context("request failed")?;
    let resp = resp.error_for_status().context("request rejected")?;
    resp.text().context("response read failed")
}
