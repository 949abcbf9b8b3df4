//! Turns loosely typed consumption input into a complete [`ConsumptionRecord`].
//!
//! Missing, null, blank and non-numeric values count as zero. Numeric strings
//! are accepted. Negative or non-finite quantities are rejected. No unit
//! conversion happens here.

use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::models::ConsumptionRecord;

pub fn normalize(raw: &Value) -> Result<ConsumptionRecord> {
    match raw {
        Value::Null => Ok(ConsumptionRecord::default()),
        Value::Object(map) => normalize_pairs(
            map.iter()
                .map(|(key, value)| (key.as_str(), quantity_of(key, value))),
        ),
        other => Err(EngineError::InvalidConsumption {
            field: "<input>".to_string(),
            reason: format!("expected an object of activity quantities, got {other}"),
        }),
    }
}

/// Normalises `(activity, text)` cells such as CSV columns.
pub fn normalize_cells<'a, I>(cells: I) -> Result<ConsumptionRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    normalize_pairs(
        cells
            .into_iter()
            .map(|(key, text)| (key, parse_text(key, text))),
    )
}

fn normalize_pairs<'a, I>(pairs: I) -> Result<ConsumptionRecord>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut record = ConsumptionRecord::default();

    for (key, quantity) in pairs {
        let Some(slot) = record.field_mut(key) else {
            tracing::debug!(field = key, "ignoring unknown consumption field");
            continue;
        };

        if !quantity.is_finite() {
            return Err(EngineError::InvalidConsumption {
                field: key.to_string(),
                reason: format!("{quantity} is not a finite quantity"),
            });
        }
        if quantity < 0.0 {
            return Err(EngineError::InvalidConsumption {
                field: key.to_string(),
                reason: format!("{quantity} is negative"),
            });
        }

        *slot = quantity;
    }

    Ok(record)
}

fn quantity_of(key: &str, value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or_else(|| defaulted(key)),
        Value::String(text) => parse_text(key, text),
        Value::Null => 0.0,
        _ => defaulted(key),
    }
}

fn parse_text(key: &str, text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or_else(|_| defaulted(key))
}

fn defaulted(key: &str) -> f64 {
    tracing::debug!(field = key, "non-numeric consumption value, defaulting to 0");
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_zero() {
        let record = normalize(&json!({ "electricity_kwh": 1000 })).unwrap();
        assert_eq!(record.electricity_kwh, 1000.0);
        assert_eq!(record.natural_gas_m3, 0.0);
        assert_eq!(record.purchased_goods_eur, 0.0);

        assert_eq!(normalize(&Value::Null).unwrap(), ConsumptionRecord::default());
    }

    #[test]
    fn non_numeric_values_default_to_zero() {
        let record = normalize(&json!({
            "electricity_kwh": "1200.5",
            "natural_gas_m3": "lots",
            "diesel_l": null,
            "gasoline_l": true,
            "train_km": "",
        }))
        .unwrap();
        assert_eq!(record.electricity_kwh, 1200.5);
        assert_eq!(record.natural_gas_m3, 0.0);
        assert_eq!(record.diesel_l, 0.0);
        assert_eq!(record.gasoline_l, 0.0);
        assert_eq!(record.train_km, 0.0);
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let err = normalize(&json!({ "waste_kg": -3 })).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConsumption { ref field, .. } if field == "waste_kg"
        ));
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        let err = normalize(&json!({ "water_m3": "inf" })).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConsumption { .. }));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record = normalize(&json!({ "unicorn_rides": 12, "paper_kg": 4 })).unwrap();
        assert_eq!(record.paper_kg, 4.0);
    }

    #[test]
    fn rejects_non_object_input() {
        assert!(normalize(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn normalizes_csv_style_cells() {
        let record = normalize_cells([
            ("heating_kwh", " 300 "),
            ("cooling_kwh", ""),
            ("commute_km", "n/a"),
        ])
        .unwrap();
        assert_eq!(record.heating_kwh, 300.0);
        assert_eq!(record.cooling_kwh, 0.0);
        assert_eq!(record.commute_km, 0.0);

        assert!(normalize_cells([("diesel_l", "-1")]).is_err());
    }
}
