use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Installs the shared client with the configured request timeout. Call once
/// at startup, before the provider thread issues any request; once a client
/// exists later calls are no-ops.
pub fn configure(timeout: Duration) -> Result<()> {
    CLIENT.get_or_try_init(|| build(timeout)).map(|_| ())
}

/// Shared blocking client. The predictor can be slow to answer a simulation
/// request but never streams, so one pooled client with a flat timeout covers
/// every endpoint. Falls back to the default timeout when [`configure`] was
/// never called (tests, mostly).
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build(DEFAULT_TIMEOUT))
}

fn build(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}
