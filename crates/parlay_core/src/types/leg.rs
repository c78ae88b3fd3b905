//! Wager leg data model.
//!
//! A [`Leg`] is one selection within a parlay. Legs are immutable inputs:
//! the engine reads them and never mutates or retains them beyond a call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::PricingError;
use super::probability::{clamp_probability, extract_probability};

/// A single wager selection.
///
/// # Fields
/// - `event_id`: Underlying event identifier, may be empty
/// - `market_identifier`: Market identifier, empty when the source has none
/// - `market_type`: Market type label (e.g. moneyline, spread, total)
/// - `outcome`: Selected outcome within the market
/// - `probability`: Marginal hit probability in `[0, 1]`
///
/// Deserialising goes through [`Leg::from_record`], so serde input obeys the
/// same field aliases, probability precedence and clamping as JSON records.
///
/// # Examples
/// ```
/// use parlay_core::types::Leg;
///
/// let leg = Leg::new("G1", "spread-home", "spread", "home -3.5", 0.52);
/// assert_eq!(leg.event_key(), Some("G1"));
///
/// // Probabilities are clamped on construction
/// let leg = Leg::new("", "", "total", "over", 1.8);
/// assert_eq!(leg.probability, 1.0);
/// assert_eq!(leg.event_key(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Leg {
    /// Underlying event identifier (may be empty)
    pub event_id: String,
    /// Market identifier (may be empty)
    pub market_identifier: String,
    /// Market type label
    pub market_type: String,
    /// Selected outcome
    pub outcome: String,
    /// Marginal hit probability
    pub probability: f64,
}

impl Leg {
    /// Creates a leg, clamping `probability` into `[0, 1]` (`NaN` becomes `0`).
    pub fn new(
        event_id: impl Into<String>,
        market_identifier: impl Into<String>,
        market_type: impl Into<String>,
        outcome: impl Into<String>,
        probability: f64,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            market_identifier: market_identifier.into(),
            market_type: market_type.into(),
            outcome: outcome.into(),
            probability: clamp_probability(probability),
        }
    }

    /// Builds a leg from a loosely typed JSON record.
    ///
    /// String fields that are missing or not scalars become empty strings;
    /// numeric identifiers are stringified. The probability is read with
    /// [`extract_probability`].
    ///
    /// # Examples
    /// ```
    /// use parlay_core::types::Leg;
    /// use serde_json::json;
    ///
    /// let leg = Leg::from_record(&json!({
    ///     "event_id": 401547,
    ///     "market_id": "ml",
    ///     "market_type": "moneyline",
    ///     "outcome": "away",
    ///     "adjusted_probability": 0.44,
    /// }));
    /// assert_eq!(leg.event_id, "401547");
    /// assert_eq!(leg.market_identifier, "ml");
    /// assert_eq!(leg.probability, 0.44);
    /// ```
    pub fn from_record(record: &Value) -> Self {
        let text = |names: &[&str]| -> String {
            names
                .iter()
                .filter_map(|name| record.get(*name))
                .find_map(scalar_text)
                .unwrap_or_default()
        };

        Self {
            event_id: text(&["event_id"]),
            market_identifier: text(&["market_identifier", "market_id"]),
            market_type: text(&["market_type"]),
            outcome: text(&["outcome"]),
            probability: extract_probability(record),
        }
    }

    /// Like [`from_record`](Self::from_record), but rejects records that are
    /// not JSON objects.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidInput` for arrays, scalars and `null`.
    pub fn try_from_record(record: &Value) -> Result<Self, PricingError> {
        if !record.is_object() {
            return Err(PricingError::InvalidInput(format!(
                "leg record must be a JSON object, got {record}"
            )));
        }
        Ok(Self::from_record(record))
    }

    /// Returns the trimmed event identifier, or `None` when blank.
    pub fn event_key(&self) -> Option<&str> {
        let trimmed = self.event_id.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl From<Value> for Leg {
    fn from(record: Value) -> Self {
        Self::from_record(&record)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_clamps_nan() {
        let leg = Leg::new("G1", "m", "moneyline", "home", f64::NAN);
        assert_eq!(leg.probability, 0.0);
    }

    #[test]
    fn test_event_key_trims() {
        let leg = Leg::new("  G7 ", "m", "total", "over", 0.5);
        assert_eq!(leg.event_key(), Some("G7"));

        let leg = Leg::new("   ", "m", "total", "over", 0.5);
        assert_eq!(leg.event_key(), None);
    }

    #[test]
    fn test_from_record_missing_fields() {
        let leg = Leg::from_record(&json!({ "probability": 0.3 }));
        assert_eq!(leg.event_id, "");
        assert_eq!(leg.market_identifier, "");
        assert_eq!(leg.market_type, "");
        assert_eq!(leg.outcome, "");
        assert_eq!(leg.probability, 0.3);
    }

    #[test]
    fn test_from_record_prefers_long_market_field() {
        let leg = Leg::from_record(&json!({
            "market_identifier": "long",
            "market_id": "short",
        }));
        assert_eq!(leg.market_identifier, "long");
    }

    #[test]
    fn test_from_record_ignores_structured_values() {
        let leg = Leg::from_record(&json!({ "event_id": { "id": 1 }, "outcome": ["a"] }));
        assert_eq!(leg.event_id, "");
        assert_eq!(leg.outcome, "");
        assert_eq!(leg.probability, 0.0);
    }

    #[test]
    fn test_try_from_record_requires_object() {
        assert!(Leg::try_from_record(&json!({ "prob": 0.2 })).is_ok());

        for bad in [json!(null), json!(0.5), json!(["G1", 0.5])] {
            assert!(matches!(
                Leg::try_from_record(&bad),
                Err(PricingError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_serde_matches_from_record() {
        let records = [
            json!({ "adjusted_probability": 0.6, "probability": 0.1 }),
            json!({ "prob": 0.5 }),
            json!({ "probability": "0.5" }),
            json!({ "probability": 1.7 }),
            json!({ "probability": -0.2, "market_identifier": "long", "market_id": "short" }),
            json!({ "event_id": 401547, "probability": "garbage" }),
        ];
        for record in records {
            let via_serde: Leg = serde_json::from_value(record.clone()).unwrap();
            assert_eq!(via_serde, Leg::from_record(&record), "record {record}");
        }

        let leg: Leg = serde_json::from_str(r#"{"probability": 1.7, "prob": 0.2}"#).unwrap();
        assert_eq!(leg.probability, 1.0);
    }

    #[test]
    fn test_serialize_round_trips() {
        let leg = Leg::new("G1", "ml", "moneyline", "home", 0.42);
        let back: Leg = serde_json::from_value(serde_json::to_value(&leg).unwrap()).unwrap();
        assert_eq!(back, leg);
    }

    #[test]
    fn test_serde_alias() {
        let leg: Leg = serde_json::from_value(json!({
            "event_id": "G1",
            "market_id": "ml",
            "market_type": "moneyline",
            "outcome": "home",
            "probability": 0.6,
        }))
        .unwrap();
        assert_eq!(leg.market_identifier, "ml");
        assert_eq!(leg.probability, 0.6);
    }
}
