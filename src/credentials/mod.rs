//! Bearer token sources.
//!
//! The retry client never caches a token: it asks its [`TokenSource`] on
//! every call, so a token refreshed between calls is picked up.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Environment variable checked before the session file.
pub const TOKEN_ENV_VAR: &str = "CAMPAIGN_AUTH_TOKEN";

#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send + Sync {
    /// Returns the token to send right now.
    fn current_token(&self) -> Result<String>;
}

/// A fixed token, for callers that manage refresh themselves.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn current_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    auth_token: Option<String>,
}

/// Reads the token from an environment variable, falling back to a session
/// file shaped like `{ "authToken": "..." }`.
pub struct CredentialStore<R: Runtime> {
    runtime: R,
    env_key: String,
    session_file: Option<PathBuf>,
}

impl<R: Runtime> CredentialStore<R> {
    pub fn new(runtime: R, session_file: Option<PathBuf>) -> Self {
        Self {
            runtime,
            env_key: TOKEN_ENV_VAR.to_string(),
            session_file,
        }
    }

    /// Overrides the environment variable name.
    pub fn with_env_key(mut self, key: impl Into<String>) -> Self {
        self.env_key = key.into();
        self
    }

    #[tracing::instrument(skip(self))]
    fn read_session_file(&self) -> Result<Option<String>> {
        let Some(path) = &self.session_file else {
            return Ok(None);
        };
        if !self.runtime.exists(path) {
            debug!("Session file {:?} does not exist", path);
            return Ok(None);
        }

        let content = self.runtime.read_to_string(path)?;
        let session: SessionFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file {:?}", path))?;
        Ok(session.auth_token)
    }
}

impl<R: Runtime> TokenSource for CredentialStore<R> {
    #[tracing::instrument(skip(self))]
    fn current_token(&self) -> Result<String> {
        if let Ok(token) = self.runtime.env_var(&self.env_key) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!("Using {} for authentication: {}", self.env_key, mask_token(&token));
                return Ok(token);
            }
        }

        match self.read_session_file()? {
            Some(token) if !token.trim().is_empty() => {
                let token = token.trim().to_string();
                debug!("Using session file for authentication: {}", mask_token(&token));
                Ok(token)
            }
            _ => bail!(
                "No auth token found. Set {} or sign in to refresh the session file.",
                self.env_key
            ),
        }
    }
}

/// Shows only the edges of a token, e.g. `abcd****wxyz`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
