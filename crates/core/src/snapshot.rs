//! Threshold snapshot model and decoding of the tuner's response envelope.
//!
//! The predictive service answers `GET /api/predictive/tune-thresholds`
//! with `{"status": "...", "data": {...}}`. Only `data` drives the card;
//! `status` and `message` are kept for diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// The most recent adaptive threshold summary computed by the tuner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSnapshot {
    pub avg_confidence: f64,
    pub avg_drift: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub drift_alert_threshold: f64,
    /// ISO-8601 time at which the tuner computed this record, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Decoded top-level response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuneEnvelope {
    /// `"success"`, `"error"`, ... as reported by the service.
    pub status: Option<String>,
    /// Human-readable message the service attaches to error responses.
    pub message: Option<String>,
    /// The snapshot, or `None` when `data` is absent or falsy.
    pub data: Option<ThresholdSnapshot>,
}

/// Decode a raw response body into a [`TuneEnvelope`].
///
/// A body that is not JSON is an error. A JSON value that is not an object
/// decodes as an empty envelope. A falsy `data` member (`null`, `false`,
/// `0`, `""`) means no data. Any other `data` must be a complete snapshot,
/// otherwise this returns [`CoreError::Payload`].
pub fn decode_envelope(body: &[u8]) -> Result<TuneEnvelope, CoreError> {
    let value: Value = serde_json::from_slice(body)?;

    let Value::Object(mut fields) = value else {
        return Ok(TuneEnvelope::default());
    };

    let data = match fields.remove("data") {
        None => None,
        Some(raw) if is_falsy(&raw) => None,
        Some(raw) => Some(
            serde_json::from_value::<ThresholdSnapshot>(raw)
                .map_err(|e| CoreError::Payload(e.to_string()))?,
        ),
    };

    Ok(TuneEnvelope {
        status: take_string(&mut fields, "status"),
        message: take_string(&mut fields, "message"),
        data,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
