use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

/// Ceiling for any request made through the shared client.
pub const GENERAL_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request ceiling for match-list fetches, which can be slow on busy days.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("matchday_desk/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(GENERAL_TIMEOUT)
            .connect_timeout(GENERAL_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")
    })
}
