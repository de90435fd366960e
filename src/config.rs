use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup after dotenvy has loaded the
/// `.env` files. Everything has a working default so the binary starts
/// against a local predictor with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction service; all endpoints hang off this.
    pub base_url: String,
    /// Tournament-wide match count driving the completion gauge. The schedule
    /// feed may be a filtered subset, so the denominator is configured, not
    /// derived.
    pub total_scheduled_matches: u32,
    pub schedule_poll: Duration,
    pub health_poll: Duration,
    /// Per-request timeout for the shared HTTP client.
    pub request_timeout: Duration,
    /// Run against the offline demo provider instead of the real backend.
    pub fake_feed: bool,
}

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TOTAL_MATCHES: u32 = 55;

impl Config {
    pub fn from_env() -> Self {
        let base_url = env::var("PREDICTOR_API_URL")
            .ok()
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let total_scheduled_matches = env::var("TOURNAMENT_TOTAL_MATCHES")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_TOTAL_MATCHES)
            .max(1);

        let schedule_poll = Duration::from_secs(
            env::var("SCHEDULE_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(120)
                .max(15),
        );

        let health_poll = Duration::from_secs(
            env::var("HEALTH_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(30)
                .max(5),
        );

        let request_timeout = Duration::from_secs(
            env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(10)
                .max(1),
        );

        let fake_feed = env::var("PREDICTOR_FAKE")
            .map(|val| {
                let val = val.trim().to_lowercase();
                val == "1" || val == "true" || val == "yes"
            })
            .unwrap_or(false);

        Self {
            base_url,
            total_scheduled_matches,
            schedule_poll,
            health_poll,
            request_timeout,
            fake_feed,
        }
    }
}
