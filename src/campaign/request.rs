use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::ValidationError;
use super::validate::{check_bounds, validate};

/// A retry request that has passed validation.
///
/// Fields are private: the only ways to obtain one are [`RetryRequest::new`]
/// and [`RetryRequest::from_value`], both of which enforce every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRequest {
    campaign_ids: Vec<Uuid>,
    max_attempts: u32,
    delay_ms: u64,
}

impl RetryRequest {
    /// Builds a request from already typed values, checking the numeric bounds.
    pub fn new(
        campaign_ids: Vec<Uuid>,
        max_attempts: u32,
        delay_ms: u64,
    ) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        check_bounds(max_attempts, delay_ms, &mut violations);
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }
        Ok(Self::from_parts(campaign_ids, max_attempts, delay_ms))
    }

    /// Validates a loosely typed JSON object.
    pub fn from_value(input: &Value) -> Result<Self, ValidationError> {
        validate(input)
    }

    /// Runs validation again on this request's wire form.
    pub fn revalidate(&self) -> Result<Self, ValidationError> {
        validate(&self.to_value())
    }

    pub(crate) fn from_parts(campaign_ids: Vec<Uuid>, max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            campaign_ids,
            max_attempts,
            delay_ms,
        }
    }

    pub fn campaign_ids(&self) -> &[Uuid] {
        &self.campaign_ids
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// The JSON body sent on the wire.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "campaignIds": self.campaign_ids,
            "maxAttempts": self.max_attempts,
            "delayMs": self.delay_ms,
        })
    }
}

impl TryFrom<&Value> for RetryRequest {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl TryFrom<Value> for RetryRequest {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Outcome of a retry operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryResult {
    pub success: bool,
    #[serde(default)]
    pub retried: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Permanent failures, when the server reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<u64>,
}

impl RetryResult {
    pub fn succeeded(retried: u64) -> Self {
        Self {
            success: true,
            retried,
            error: None,
            failures: None,
        }
    }
}
