use anyhow::{Context, Result, bail};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::campaign::DEFAULT_TIMEOUT;
use crate::runtime::Runtime;

pub const API_BASE_ENV: &str = "CAMPAIGN_API_BASE";
pub const TIMEOUT_ENV: &str = "CAMPAIGN_TIMEOUT_MS";
pub const SESSION_FILE_ENV: &str = "CAMPAIGN_SESSION_FILE";

/// Values given on the command line; these win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub timeout_ms: Option<u64>,
    pub session_file: Option<PathBuf>,
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API base without a trailing slash.
    pub api_base: String,
    pub timeout: Duration,
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Resolves configuration from overrides, then the environment, then defaults.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let api_base = match overrides.api_base {
            Some(base) => base,
            None => runtime.env_var(API_BASE_ENV).with_context(|| {
                format!(
                    "No API base URL configured. Pass --api-base or set {}.",
                    API_BASE_ENV
                )
            })?,
        };
        let api_base = normalize_api_base(&api_base)?;

        let timeout_ms = match overrides.timeout_ms {
            Some(ms) => Some(ms),
            None => match runtime.env_var(TIMEOUT_ENV) {
                Ok(raw) => Some(raw.trim().parse::<u64>().with_context(|| {
                    format!("{} must be a whole number of milliseconds, got {:?}", TIMEOUT_ENV, raw)
                })?),
                Err(_) => None,
            },
        };
        let timeout = match timeout_ms {
            Some(0) => bail!("Timeout must be greater than zero"),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIMEOUT,
        };

        let session_file = overrides
            .session_file
            .or_else(|| runtime.env_var(SESSION_FILE_ENV).ok().map(PathBuf::from))
            .or_else(|| default_session_file(runtime));

        let config = Self {
            api_base,
            timeout,
            session_file,
        };
        debug!("Resolved config: {:?}", config);
        Ok(config)
    }
}

/// `<config_dir>/campaign-retry/session.json`, if a config dir exists.
pub fn default_session_file<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    runtime
        .config_dir()
        .map(|dir| dir.join("campaign-retry").join("session.json"))
}

fn normalize_api_base(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() {
        bail!("API base URL is empty");
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        bail!("API base URL must start with http:// or https://, got {:?}", raw);
    }
    Ok(base.to_string())
}
