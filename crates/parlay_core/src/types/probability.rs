//! Marginal probability extraction from leg records.
//!
//! Leg records come from an upstream probability model whose output shape
//! is not under our control. The extractor looks for a probability under a
//! small set of known field names and degrades to `0.0` (a certain loss)
//! whenever nothing usable is found, so a corrupt leg can never fabricate
//! credit for the parlay.

use serde_json::Value;

/// Field names checked for a leg probability, in priority order.
pub const PROBABILITY_FIELDS: [&str; 3] = ["adjusted_probability", "probability", "prob"];

/// Clamps a raw probability into `[0.0, 1.0]`.
///
/// `NaN` maps to `0.0`.
///
/// # Examples
/// ```
/// use parlay_core::types::clamp_probability;
///
/// assert_eq!(clamp_probability(1.7), 1.0);
/// assert_eq!(clamp_probability(-0.2), 0.0);
/// assert_eq!(clamp_probability(f64::NAN), 0.0);
/// assert_eq!(clamp_probability(0.42), 0.42);
/// ```
#[inline]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Reads a clamped probability from a leg record.
///
/// Probes [`PROBABILITY_FIELDS`] in order and uses the first field that is
/// present with a non-null value. Numbers are read directly and numeric
/// strings are parsed. Anything else yields `0.0`.
///
/// # Examples
/// ```
/// use parlay_core::types::extract_probability;
/// use serde_json::json;
///
/// let leg = json!({ "adjusted_probability": 0.61, "probability": 0.55 });
/// assert_eq!(extract_probability(&leg), 0.61);
///
/// let leg = json!({ "prob": "0.4" });
/// assert_eq!(extract_probability(&leg), 0.4);
///
/// let leg = json!({ "probability": "n/a" });
/// assert_eq!(extract_probability(&leg), 0.0);
/// ```
pub fn extract_probability(record: &Value) -> f64 {
    let Some(fields) = record.as_object() else {
        return 0.0;
    };

    let raw = PROBABILITY_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_null());

    match raw {
        Some(value) => clamp_probability(numeric_value(value).unwrap_or(0.0)),
        None => 0.0,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
