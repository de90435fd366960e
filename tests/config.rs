use std::env;
use std::time::Duration;

use cabrs_terminal::config::Config;

// Env mutation is process-global, so overrides and defaults share one test.
#[test]
fn config_reads_env_with_defaults() {
    unsafe {
        env::set_var("PREDICTOR_API_URL", "http://predictor.local:9000/");
        env::set_var("TOURNAMENT_TOTAL_MATCHES", "74");
        env::set_var("SCHEDULE_POLL_SECS", "300");
        env::set_var("HEALTH_POLL_SECS", "2");
        env::set_var("REQUEST_TIMEOUT_SECS", "25");
        env::set_var("PREDICTOR_FAKE", "yes");
    }
    let config = Config::from_env();
    assert_eq!(config.base_url, "http://predictor.local:9000");
    assert_eq!(config.total_scheduled_matches, 74);
    assert_eq!(config.schedule_poll, Duration::from_secs(300));
    // Floored so an aggressive setting cannot hammer the backend.
    assert_eq!(config.health_poll, Duration::from_secs(5));
    assert_eq!(config.request_timeout, Duration::from_secs(25));
    assert!(config.fake_feed);

    unsafe {
        env::remove_var("PREDICTOR_API_URL");
        env::remove_var("TOURNAMENT_TOTAL_MATCHES");
        env::remove_var("SCHEDULE_POLL_SECS");
        env::remove_var("HEALTH_POLL_SECS");
        env::remove_var("REQUEST_TIMEOUT_SECS");
        env::remove_var("PREDICTOR_FAKE");
    }
    let config = Config::from_env();
    assert_eq!(config.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.total_scheduled_matches, 55);
    assert_eq!(config.schedule_poll, Duration::from_secs(120));
    assert_eq!(config.health_poll, Duration::from_secs(30));
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert!(!config.fake_feed);
}
