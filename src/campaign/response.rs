//! Maps an HTTP status and body onto the retry outcome.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use super::error::{FALLBACK_MESSAGE, RetryError};
use super::request::RetryResult;
use super::validate::whole_number;

/// Statuses at or above this are server errors; everything below is parsed.
pub const SERVER_ERROR_THRESHOLD: u16 = 500;

/// Body shape returned by the retry endpoint.
#[derive(Debug, Deserialize)]
struct RetryBody {
    success: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    retried: u64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_count")]
    failures: Option<u64>,
}

/// `null` reads as zero; whole-number floats such as `5.0` are accepted.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient_optional_count(deserializer)?.unwrap_or(0))
}

fn lenient_optional_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(number) => whole_number(&number).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a whole count, got {}", number))
        }),
    }
}

/// Interprets a completed exchange. Only `{ "success": true }` bodies below
/// the server-error threshold produce `Ok`.
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<RetryResult, RetryError> {
    if status.as_u16() >= SERVER_ERROR_THRESHOLD {
        return Err(RetryError::Server {
            status: status.as_u16(),
            message: server_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        });
    }

    let parsed: Option<RetryBody> = serde_json::from_slice(body).ok();
    match parsed {
        Some(body) if body.success => Ok(RetryResult {
            success: true,
            retried: body.retried,
            error: body.error,
            failures: body.failures,
        }),
        Some(body) => Err(RetryError::Application {
            message: non_empty(body.error).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        }),
        None => Err(RetryError::Application {
            message: FALLBACK_MESSAGE.to_string(),
        }),
    }
}

/// A server error only overrides the fallback through a `message` field.
fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value.get("message")?.as_str()?;
    non_empty(Some(message.to_string()))
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
