//! Assembles the loose request object handed to the validator.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

use crate::runtime::Runtime;

pub const DEFAULT_MAX_ATTEMPTS: i64 = 3;
pub const DEFAULT_DELAY_MS: i64 = 1000;

/// Request fields as given on the command line. Numbers stay signed and
/// unchecked here; bounds are the validator's job.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub campaign_ids: Vec<String>,
    pub max_attempts: Option<i64>,
    pub delay_ms: Option<i64>,
    /// JSON file holding a request object; flags override its fields.
    pub input: Option<PathBuf>,
}

/// Builds the request object: file contents first, then flags, then defaults.
#[tracing::instrument(skip(runtime))]
pub fn build_input<R: Runtime>(runtime: &R, args: &RequestArgs) -> Result<Value> {
    let mut object = match &args.input {
        Some(path) => {
            let content = runtime.read_to_string(path)?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse request file {:?}", path))?;
            match value {
                Value::Object(object) => object,
                _ => bail!("Request file {:?} must contain a JSON object", path),
            }
        }
        None => Map::new(),
    };

    if !args.campaign_ids.is_empty() || !object.contains_key("campaignIds") {
        object.insert("campaignIds".to_string(), json!(args.campaign_ids));
    }
    if let Some(max_attempts) = args.max_attempts {
        object.insert("maxAttempts".to_string(), json!(max_attempts));
    }
    if let Some(delay_ms) = args.delay_ms {
        object.insert("delayMs".to_string(), json!(delay_ms));
    }
    object
        .entry("maxAttempts")
        .or_insert_with(|| json!(DEFAULT_MAX_ATTEMPTS));
    object
        .entry("delayMs")
        .or_insert_with(|| json!(DEFAULT_DELAY_MS));

    Ok(Value::Object(object))
}
