use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;

use crate::credentials::TokenSource;
use crate::http::{HttpClient, bearer};

use super::error::RetryError;
use super::request::{RetryRequest, RetryResult};
use super::response::interpret;

/// Path of the retry endpoint, relative to the API base.
pub const RETRY_PATH: &str = "/voice-campaigns/retry";

/// Default bound on one retry call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetryFailedCalls: Send + Sync {
    /// Resubmits failed calls for the campaigns in `request`.
    async fn retry_failed_calls(&self, request: &RetryRequest) -> Result<RetryResult, RetryError>;
}

/// Issues one authenticated POST per retry request.
///
/// Holds no per-call state; one instance can serve concurrent callers.
pub struct RetryClient<T: TokenSource> {
    http: HttpClient,
    endpoint: String,
    tokens: T,
    timeout: Duration,
}

impl<T: TokenSource> RetryClient<T> {
    #[tracing::instrument(skip(http, tokens))]
    pub fn new(http: HttpClient, api_base: &str, tokens: T) -> Self {
        let endpoint = format!("{}{}", api_base.trim_end_matches('/'), RETRY_PATH);
        Self {
            http,
            endpoint,
            tokens,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validates `input` first; nothing is sent if validation fails.
    pub async fn validate_and_retry(&self, input: &Value) -> Result<RetryResult, RetryError> {
        let request = RetryRequest::from_value(input)?;
        self.retry_failed_calls(&request).await
    }

    async fn send(&self, request: &RetryRequest) -> Result<RetryResult, RetryError> {
        // Read per call, never cached.
        let token = self
            .tokens
            .current_token()
            .map_err(|e| RetryError::Credential(format!("{:#}", e)))?;
        if token.is_empty() {
            return Err(RetryError::Credential("auth token is empty".to_string()));
        }
        let authorization = bearer(&token).map_err(|_| {
            RetryError::Credential("auth token is not a valid header value".to_string())
        })?;

        debug!(
            "Retrying {} campaign(s) with max_attempts={} delay_ms={}",
            request.campaign_ids().len(),
            request.max_attempts(),
            request.delay_ms()
        );

        let response = self
            .http
            .post_json(&self.endpoint, authorization, request, self.timeout)
            .await
            .map_err(|e| self.transport_error(e))?;

        interpret(response.status, &response.body)
    }

    fn transport_error(&self, error: reqwest::Error) -> RetryError {
        if error.is_timeout() {
            return RetryError::Timeout {
                after: self.timeout,
            };
        }

        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        RetryError::Transport(message)
    }
}

#[async_trait]
impl<T: TokenSource> RetryFailedCalls for RetryClient<T> {
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn retry_failed_calls(&self, request: &RetryRequest) -> Result<RetryResult, RetryError> {
        self.send(request).await
    }
}
