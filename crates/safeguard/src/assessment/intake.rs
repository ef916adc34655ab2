//! Boundary coercion for loosely typed submissions.
//!
//! Form posts arrive with numbers as strings, checkboxes as `"on"`, and empty
//! selects as `""`. Each helper accepts any JSON shape and maps whatever it cannot
//! interpret to "absent", so deserializing a submission object never fails on a
//! field value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::domain::{Choice, IncidentType};

pub(crate) fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

pub(crate) fn loose_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_flag))
}

pub(crate) fn loose_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => T::from_label(&raw),
        _ => None,
    })
}

pub(crate) fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Accepts an array of labels or a single `,`/`;` separated string.
/// Unknown labels are dropped; order and duplicates are kept.
pub(crate) fn incident_list<'de, D>(deserializer: D) -> Result<Vec<IncidentType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(IncidentType::from_label)
            .collect(),
        Some(Value::String(raw)) => parse_incident_labels(&raw),
        _ => Vec::new(),
    })
}

pub(crate) fn parse_incident_labels(raw: &str) -> Vec<IncidentType> {
    raw.split([',', ';'])
        .filter_map(IncidentType::from_label)
        .collect()
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        Value::Number(number) => match number.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}
