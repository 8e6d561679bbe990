//! Validating client for re-triggering failed voice-campaign calls.
//!
//! ```no_run
//! use campaign_retry::campaign::{RetryClient, RetryFailedCalls, RetryRequest};
//! use campaign_retry::credentials::StaticToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let request = RetryRequest::from_value(&serde_json::json!({
//!     "campaignIds": ["7f14b5e4-69ea-4803-9c62-a5946bc2cc9c"],
//!     "maxAttempts": 3,
//!     "delayMs": 1500
//! }))?;
//!
//! let http = campaign_retry::http::build_http_client()?;
//! let client = RetryClient::new(http, "https://api.example.com", StaticToken::new("token"));
//! let result = client.retry_failed_calls(&request).await?;
//! println!("{} calls successfully retried", result.retried);
//! # Ok(())
//! # }
//! ```

pub mod campaign;
pub mod commands;
pub mod credentials;
pub mod http;
pub mod runtime;
