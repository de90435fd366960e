pub mod config;
pub mod fake_feed;
pub mod http_client;
pub mod live_sync;
pub mod metrics;
pub mod predictor;
pub mod provider;
pub mod schedule;
pub mod state;
