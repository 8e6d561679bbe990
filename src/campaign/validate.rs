//! Schema checks applied to a loosely typed retry request.
//!
//! Every rule runs; violations are accumulated in field order so a caller can
//! show all of them at once.

use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::error::{Field, FieldViolation, ValidationError, ViolationKind};
use super::request::RetryRequest;

pub const MAX_ATTEMPTS_LIMIT: u32 = 5;
pub const MIN_DELAY_MS: u64 = 1000;

/// Length of the canonical 8-4-4-4-12 form.
const CANONICAL_UUID_LEN: usize = 36;

/// Validates `input` and builds a [`RetryRequest`]. Performs no I/O.
pub fn validate(input: &Value) -> Result<RetryRequest, ValidationError> {
    let empty = Map::new();
    let object = match input.as_object() {
        Some(object) => object,
        None => &empty,
    };

    let mut violations = Vec::new();

    let campaign_ids = check_campaign_ids(object.get(Field::CampaignIds.as_str()), &mut violations);
    let max_attempts = check_max_attempts(object.get(Field::MaxAttempts.as_str()), &mut violations);
    let delay_ms = check_delay_ms(object.get(Field::DelayMs.as_str()), &mut violations);

    match (campaign_ids, max_attempts, delay_ms) {
        (Some(ids), Some(attempts), Some(delay)) if violations.is_empty() => {
            Ok(RetryRequest::from_parts(ids, attempts, delay))
        }
        _ => Err(ValidationError::new(violations)),
    }
}

/// True for the canonical hyphenated form only (no braces, no `urn:` prefix,
/// no bare 32-digit form).
pub fn is_canonical_uuid(s: &str) -> bool {
    s.len() == CANONICAL_UUID_LEN && Uuid::try_parse(s).is_ok()
}

pub(crate) fn check_bounds(
    max_attempts: u32,
    delay_ms: u64,
    violations: &mut Vec<FieldViolation>,
) {
    if max_attempts == 0 {
        violations.push(FieldViolation::new(Field::MaxAttempts, ViolationKind::NotPositive));
    } else if max_attempts > MAX_ATTEMPTS_LIMIT {
        violations.push(FieldViolation::new(
            Field::MaxAttempts,
            ViolationKind::AboveMaximum {
                max: MAX_ATTEMPTS_LIMIT as u64,
            },
        ));
    }

    if delay_ms < MIN_DELAY_MS {
        violations.push(FieldViolation::new(
            Field::DelayMs,
            ViolationKind::BelowMinimum { min: MIN_DELAY_MS },
        ));
    }
}

fn check_campaign_ids(
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Vec<Uuid>> {
    let field = Field::CampaignIds;
    let items = match value {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, ViolationKind::Missing));
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                ViolationKind::WrongType {
                    expected: "an array of strings",
                },
            ));
            return None;
        }
    };

    let before = violations.len();
    let mut ids = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            None => violations.push(FieldViolation::new(
                field,
                ViolationKind::NonStringIdentifier { index },
            )),
            Some(s) if !is_canonical_uuid(s) => violations.push(FieldViolation::new(
                field,
                ViolationKind::MalformedIdentifier { index },
            )),
            Some(s) => {
                if let Ok(id) = Uuid::try_parse(s) {
                    ids.push(id);
                }
            }
        }
    }

    (violations.len() == before).then_some(ids)
}

enum Integral {
    NonNegative(u64),
    Negative,
}

/// Extracts an integral number, recording a violation for anything else.
fn integral(
    field: Field,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Integral> {
    let number = match value {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, ViolationKind::Missing));
            return None;
        }
        Some(Value::Number(n)) => n,
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                ViolationKind::WrongType {
                    expected: "a number",
                },
            ));
            return None;
        }
    };

    if let Some(n) = whole_number(number) {
        return Some(Integral::NonNegative(n));
    }
    if number.as_i64().is_some()
        || number
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0 && f < 0.0)
    {
        return Some(Integral::Negative);
    }

    violations.push(FieldViolation::new(field, ViolationKind::NotInteger));
    None
}

/// Reads a non-negative whole number. Floats with no fractional part count
/// (e.g. `3.0`); values at or beyond 2^64 do not.
pub(crate) fn whole_number(number: &Number) -> Option<u64> {
    if let Some(n) = number.as_u64() {
        return Some(n);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
            Some(f as u64)
        }
        _ => None,
    }
}

fn check_max_attempts(value: Option<&Value>, violations: &mut Vec<FieldViolation>) -> Option<u32> {
    let field = Field::MaxAttempts;
    match integral(field, value, violations)? {
        Integral::Negative | Integral::NonNegative(0) => {
            violations.push(FieldViolation::new(field, ViolationKind::NotPositive));
            None
        }
        Integral::NonNegative(n) if n > MAX_ATTEMPTS_LIMIT as u64 => {
            violations.push(FieldViolation::new(
                field,
                ViolationKind::AboveMaximum {
                    max: MAX_ATTEMPTS_LIMIT as u64,
                },
            ));
            None
        }
        Integral::NonNegative(n) => Some(n as u32),
    }
}

fn check_delay_ms(value: Option<&Value>, violations: &mut Vec<FieldViolation>) -> Option<u64> {
    let field = Field::DelayMs;
    match integral(field, value, violations)? {
        Integral::NonNegative(n) if n >= MIN_DELAY_MS => Some(n),
        _ => {
            violations.push(FieldViolation::new(
                field,
                ViolationKind::BelowMinimum { min: MIN_DELAY_MS },
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_ID: &str = "7f14b5e4-69ea-4803-9c62-a5946bc2cc9c";

    fn valid_input() -> Value {
        json!({
            "campaignIds": [VALID_ID],
            "maxAttempts": 3,
            "delayMs": 1000
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut input = valid_input();
        input[key] = value;
        input
    }

    fn kinds(err: &ValidationError, field: Field) -> Vec<ViolationKind> {
        err.violations()
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.kind.clone())
            .collect()
    }

    #[test]
    fn test_accepts_valid_input() {
        let request = validate(&valid_input()).unwrap();
        assert_eq!(request.campaign_ids().len(), 1);
        assert_eq!(request.campaign_ids()[0].to_string(), VALID_ID);
        assert_eq!(request.max_attempts(), 3);
        assert_eq!(request.delay_ms(), 1000);
    }

    #[test]
    fn test_accepts_empty_campaign_ids() {
        let request = validate(&with("campaignIds", json!([]))).unwrap();
        assert!(request.campaign_ids().is_empty());
    }

    #[test]
    fn test_accepts_uppercase_uuid() {
        let input = with("campaignIds", json!(["7F14B5E4-69EA-4803-9C62-A5946BC2CC9C"]));
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_rejects_invalid_uuid() {
        let err = validate(&with("campaignIds", json!([VALID_ID, "invalid-id"]))).unwrap_err();
        assert_eq!(
            kinds(&err, Field::CampaignIds),
            vec![ViolationKind::MalformedIdentifier { index: 1 }]
        );
        assert!(err.to_string().contains("campaignIds contains a malformed identifier"));
    }

    #[test]
    fn test_rejects_non_canonical_uuid_forms() {
        for id in [
            "7f14b5e469ea48039c62a5946bc2cc9c",
            "{7f14b5e4-69ea-4803-9c62-a5946bc2cc9c}",
            "urn:uuid:7f14b5e4-69ea-4803-9c62-a5946bc2cc9c",
            "7f14b5e4-69ea-4803-9c62-a5946bc2cc9g",
            "",
        ] {
            let err = validate(&with("campaignIds", json!([id]))).unwrap_err();
            assert!(err.has_field(Field::CampaignIds), "accepted {:?}", id);
        }
    }

    #[test]
    fn test_rejects_non_string_identifier() {
        let err = validate(&with("campaignIds", json!([42]))).unwrap_err();
        assert_eq!(
            kinds(&err, Field::CampaignIds),
            vec![ViolationKind::NonStringIdentifier { index: 0 }]
        );
    }

    #[test]
    fn test_rejects_campaign_ids_not_array() {
        let err = validate(&with("campaignIds", json!(VALID_ID))).unwrap_err();
        assert!(matches!(
            kinds(&err, Field::CampaignIds)[..],
            [ViolationKind::WrongType { .. }]
        ));
    }

    #[test]
    fn test_enforces_max_attempts_upper_bound() {
        let err = validate(&with("maxAttempts", json!(6))).unwrap_err();
        assert_eq!(
            kinds(&err, Field::MaxAttempts),
            vec![ViolationKind::AboveMaximum { max: 5 }]
        );
        assert_eq!(err.to_string(), "maxAttempts exceeds maximum of 5");
    }

    #[test]
    fn test_enforces_max_attempts_positive() {
        for value in [json!(0), json!(-1), json!(-3.0)] {
            let err = validate(&with("maxAttempts", value)).unwrap_err();
            assert_eq!(
                kinds(&err, Field::MaxAttempts),
                vec![ViolationKind::NotPositive]
            );
        }
    }

    #[test]
    fn test_max_attempts_must_be_integer() {
        let err = validate(&with("maxAttempts", json!(2.5))).unwrap_err();
        assert_eq!(kinds(&err, Field::MaxAttempts), vec![ViolationKind::NotInteger]);

        let err = validate(&with("maxAttempts", json!("3"))).unwrap_err();
        assert!(matches!(
            kinds(&err, Field::MaxAttempts)[..],
            [ViolationKind::WrongType { .. }]
        ));
    }

    #[test]
    fn test_integral_float_is_accepted() {
        let request = validate(&with("maxAttempts", json!(5.0))).unwrap();
        assert_eq!(request.max_attempts(), 5);
    }

    #[test]
    fn test_requires_delay_minimum() {
        let err = validate(&with("delayMs", json!(999))).unwrap_err();
        assert_eq!(
            kinds(&err, Field::DelayMs),
            vec![ViolationKind::BelowMinimum { min: 1000 }]
        );
        assert_eq!(err.to_string(), "delayMs below minimum of 1000");

        let err = validate(&with("delayMs", json!(-5000))).unwrap_err();
        assert!(err.has_field(Field::DelayMs));
    }

    #[test]
    fn test_delay_has_no_upper_bound() {
        let request = validate(&with("delayMs", json!(86_400_000u64))).unwrap();
        assert_eq!(request.delay_ms(), 86_400_000);
    }

    #[test]
    fn test_reports_all_violations_in_field_order() {
        let input = json!({
            "campaignIds": ["nope"],
            "maxAttempts": 9,
            "delayMs": 10
        });
        let err = validate(&input).unwrap_err();
        let fields: Vec<Field> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![Field::CampaignIds, Field::MaxAttempts, Field::DelayMs]
        );
    }

    #[test]
    fn test_missing_fields_and_non_object_input() {
        let err = validate(&json!({})).unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert!(
            err.violations()
                .iter()
                .all(|v| v.kind == ViolationKind::Missing)
        );

        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn test_float_at_u64_limit_is_not_saturated() {
        // 2^64 is exactly representable as f64 but not as u64.
        let err = validate(&with("delayMs", json!(18_446_744_073_709_551_616.0_f64))).unwrap_err();
        assert_eq!(kinds(&err, Field::DelayMs), vec![ViolationKind::NotInteger]);
    }

    #[test]
    fn test_whole_number() {
        let number = |v: Value| v.as_number().cloned().unwrap();
        assert_eq!(whole_number(&number(json!(5))), Some(5));
        assert_eq!(whole_number(&number(json!(5.0))), Some(5));
        assert_eq!(whole_number(&number(json!(5.5))), None);
        assert_eq!(whole_number(&number(json!(-1))), None);
        assert_eq!(whole_number(&number(json!(u64::MAX))), Some(u64::MAX));
    }

    #[test]
    fn test_is_canonical_uuid() {
        assert!(is_canonical_uuid(VALID_ID));
        assert!(!is_canonical_uuid("invalid-id"));
    }
}
