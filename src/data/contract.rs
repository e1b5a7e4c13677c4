use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{trace, warn};

use crate::core::{Month, MortalityRecord};

/// One row of the raw input file, field names as published by the source.
///
/// Count fields arrive as numbers, numeric strings, `"n/a"`, or null; all of
/// those coerce leniently at deserialization time. Missing count fields
/// default to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMortalityRow {
    #[serde(rename = "Year", deserialize_with = "coerce_count", default)]
    pub year: u32,
    #[serde(rename = "Month", default)]
    pub month: String,
    #[serde(rename = "Total decedents", deserialize_with = "coerce_count", default)]
    pub total: u32,
    #[serde(rename = "Male", deserialize_with = "coerce_count", default)]
    pub male: u32,
    #[serde(rename = "Female", deserialize_with = "coerce_count", default)]
    pub female: u32,
    #[serde(
        rename = "Transgender/Non-binary/Two-Spirit",
        deserialize_with = "coerce_count",
        default
    )]
    pub trans: u32,
}

/// Lenient numeric coercion: `null`, `"n/a"`, and non-numeric input map to 0;
/// numeric strings parse; negatives and fractions clamp to whole counts.
fn coerce_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count_value(&value))
}

fn coerce_count_value(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(number) if number.is_finite() && number > 0.0 => number.round() as u32,
        _ => 0,
    }
}

/// Maps raw rows to canonical records.
///
/// Rows whose month name cannot be resolved have no place on any axis and
/// are skipped with a warning; everything else recovers silently to zero.
#[must_use]
pub fn normalize_rows(rows: Vec<RawMortalityRow>) -> Vec<MortalityRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let Some(month) = Month::from_name(&row.month) else {
                warn!(month = %row.month, year = row.year, "skipping row with unknown month name");
                return None;
            };
            trace!(year = row.year, month = %month, total = row.total, "normalized row");
            Some(MortalityRecord {
                year: row.year as i32,
                month,
                total: row.total,
                male: row.male,
                female: row.female,
                trans: row.trans,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RawMortalityRow, coerce_count_value, normalize_rows};
    use crate::core::Month;

    #[test]
    fn count_coercion_table() {
        assert_eq!(coerce_count_value(&json!(42)), 42);
        assert_eq!(coerce_count_value(&json!("42")), 42);
        assert_eq!(coerce_count_value(&json!("n/a")), 0);
        assert_eq!(coerce_count_value(&json!(null)), 0);
        assert_eq!(coerce_count_value(&json!("three")), 0);
        assert_eq!(coerce_count_value(&json!(-5)), 0);
    }

    #[test]
    fn rows_with_unknown_months_are_skipped() {
        let rows: Vec<RawMortalityRow> = serde_json::from_value(json!([
            { "Year": 2019, "Month": "Jan", "Total decedents": "10", "Male": 6, "Female": 3,
              "Transgender/Non-binary/Two-Spirit": "n/a" },
            { "Year": 2019, "Month": "Janvier", "Total decedents": 4 }
        ]))
        .expect("rows deserialize");

        let records = normalize_rows(rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, Month::January);
        assert_eq!(records[0].total, 10);
        assert_eq!(records[0].trans, 0);
    }
}
