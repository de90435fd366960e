use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::http_client::http_client;

/// One innings line on a schedule entry. The feed abbreviates keys and is
/// loose about the overs type (number or string), so everything defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InningsScore {
    #[serde(default, rename = "r")]
    pub runs: u32,
    #[serde(default, rename = "w")]
    pub wickets: u32,
    #[serde(default, rename = "o", deserialize_with = "overs_value")]
    pub overs: Option<f64>,
}

/// External read-only record of a scheduled or in-progress match. `status`
/// is free text; for finished matches it is the only signal of the winner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default, rename = "dateTimeGMT")]
    pub date_time_gmt: String,
    #[serde(default)]
    pub score: Vec<InningsScore>,
    #[serde(default, rename = "matchStarted")]
    pub match_started: bool,
    #[serde(default, rename = "matchEnded")]
    pub match_ended: bool,
    #[serde(default)]
    pub status: String,
}

impl ScheduleEntry {
    pub fn is_live(&self) -> bool {
        self.match_started && !self.match_ended
    }
}

fn overs_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(num)) => num.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    })
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<ScheduleEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid schedule json")
}

pub fn fetch_schedule(base_url: &str) -> Result<Vec<ScheduleEntry>> {
    let client = http_client()?;
    let resp = client
        .get(format!("{base_url}/get_world_cup_schedule"))
        .send()
        .context("request failed")?;
    let resp = resp.error_for_status().context("request rejected")?;
    let body = resp.text().context("response read failed")?;
    parse_schedule_json(&body)
}
