//! HTTP transport used by the retry client.

mod client;

pub use client::{HttpClient, RawResponse, bearer};

use anyhow::Result;
use reqwest::Client;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("campaign-retry/", env!("CAMPAIGN_RETRY_VERSION"));

/// Builds the shared HTTP client. Authorization is attached per request, so
/// no default headers are installed here.
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(HttpClient::new(client))
}
