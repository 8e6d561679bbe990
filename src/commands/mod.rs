//! CLI-facing commands: the caller side of the retry client.
//!
//! The retry core never reports failures itself; these commands surface its
//! results and errors to the user.

use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::{
    campaign::{RetryFailedCalls, RetryRequest, RetryResult},
    runtime::Runtime,
};

pub mod config;
mod request;
pub mod services;

pub use request::{DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS, RequestArgs, build_input};

use config::{Config, ConfigOverrides};
use services::build_retry_client;

/// Validate the request, send it, and print the outcome.
#[tracing::instrument(skip(runtime, overrides, args))]
pub async fn retry<R: Runtime>(
    runtime: R,
    overrides: ConfigOverrides,
    args: RequestArgs,
    json: bool,
) -> Result<()> {
    // Validate before touching configuration or credentials.
    let input = build_input(&runtime, &args)?;
    let request = RetryRequest::from_value(&input)?;

    let config = Config::load(&runtime, overrides)?;
    let client = build_retry_client(&config, runtime)?;

    let stdout = std::io::stdout();
    run_retry(&client, &request, json, &mut stdout.lock()).await
}

/// Validate the request and print its normalized form. Never sends anything.
#[tracing::instrument(skip(runtime, args))]
pub fn validate<R: Runtime>(runtime: R, args: RequestArgs) -> Result<()> {
    let input = build_input(&runtime, &args)?;
    let stdout = std::io::stdout();
    run_validate(&input, &mut stdout.lock())
}

pub async fn run_retry<C, W>(
    client: &C,
    request: &RetryRequest,
    json: bool,
    out: &mut W,
) -> Result<()>
where
    C: RetryFailedCalls + ?Sized,
    W: Write,
{
    debug!(
        "Submitting retry for {} campaign(s)",
        request.campaign_ids().len()
    );
    let result = client.retry_failed_calls(request).await?;
    print_result(&result, json, out)
}

pub fn run_validate<W: Write>(input: &serde_json::Value, out: &mut W) -> Result<()> {
    let request = RetryRequest::from_value(input)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
    Ok(())
}

fn print_result<W: Write>(result: &RetryResult, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(result)?)?;
        return Ok(());
    }

    writeln!(out, "{} calls successfully retried", result.retried)?;
    if let Some(failures) = result.failures {
        writeln!(out, "{} calls failed permanently", failures)?;
    }
    if let Some(error) = &result.error {
        writeln!(out, "note: {}", error)?;
    }
    Ok(())
}
