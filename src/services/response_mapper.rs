//! Upstream JSON -> client contract.
//!
//! Business failures are not errors here: every outcome is a value the
//! dispatcher returns with HTTP 200, failures carrying `erro: 1` in the body.

use serde_json::Value;

use crate::models::envelope::{ChargeResult, ClientResult, ErrorEnvelope, StatusResult};
use crate::services::validator::Action;

pub const UNEXPECTED_RESPONSE: &str = "unexpected response";
pub const STATUS_NOT_FOUND: &str = "status not found in response";
const UPSTREAM_ERROR_PREFIX: &str = "Error: ";

pub fn map_response(action: Action, body: &Value) -> ClientResult {
    match action {
        Action::Create => ClientResult::Charge(map_charge(body)),
        Action::Verify => ClientResult::Status(map_status(body)),
    }
}

pub fn map_charge(body: &Value) -> ChargeResult {
    if let Some(transaction_id) = truthy_field(body, "transactionId") {
        return ChargeResult::Created {
            payment_id: transaction_id.clone(),
            pix_code: body.get("pixCode").cloned(),
            status: body.get("status").cloned(),
        };
    }

    if let Some(message) = truthy_field(body, "message") {
        return ChargeResult::Failed(
            ErrorEnvelope::new(js_string(message)).with_code(body.get("code").cloned()),
        );
    }

    ChargeResult::Failed(ErrorEnvelope::new(UNEXPECTED_RESPONSE).with_details(body.to_string()))
}

pub fn map_status(body: &Value) -> StatusResult {
    if let Some(error) = truthy_field(body, "error") {
        let message = format!("{}{}", UPSTREAM_ERROR_PREFIX, js_string(error));
        return StatusResult::Failed(ErrorEnvelope::new(message).with_details(body.to_string()));
    }

    match truthy_field(body, "status") {
        Some(status) => StatusResult::Found {
            status: status.clone(),
        },
        None => StatusResult::Failed(ErrorEnvelope::new(STATUS_NOT_FOUND).with_details(body.to_string())),
    }
}

fn truthy_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|value| is_truthy(value))
}

/// `null`, `false`, `0` and `""` are falsy; everything else, including `{}` and `[]`, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form used when an upstream field is concatenated into a message.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // integral floats print without a fraction, as in JS ("1.0" -> "1")
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{:.0}", f)
                }
            }
            _ => n.to_string(),
        },
        Value::Bool(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
