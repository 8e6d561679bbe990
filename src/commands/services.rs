//! Service factory for building the retry client from configuration.

use anyhow::Result;
use log::debug;

use crate::{
    campaign::RetryClient,
    credentials::CredentialStore,
    http::build_http_client,
    runtime::Runtime,
};

use super::config::Config;

/// Build a credential store that reads the token through `runtime`.
pub fn build_credentials<R: Runtime>(config: &Config, runtime: R) -> CredentialStore<R> {
    CredentialStore::new(runtime, config.session_file.clone())
}

/// Build a retry client from configuration.
pub fn build_retry_client<R: Runtime>(
    config: &Config,
    runtime: R,
) -> Result<RetryClient<CredentialStore<R>>> {
    let http_client = build_http_client()?;
    let client = RetryClient::new(http_client, &config.api_base, build_credentials(config, runtime))
        .with_timeout(config.timeout);
    debug!(
        "Retry client targets {} with timeout {:?}",
        client.endpoint(),
        client.timeout()
    );
    Ok(client)
}
