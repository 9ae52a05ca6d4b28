//! Lead record as delivered by the capture webhook
//!
//! The upstream flow writes loosely-typed rows: booleans arrive as `true`,
//! `1` or `"sim"`, ages as numbers or numeric strings, and new columns show
//! up without notice. Every field is therefore optional on the wire and
//! deserialized leniently; a value of an unexpected shape degrades to its
//! absent form instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single prospective-customer record captured from a campaign.
///
/// Read-only from this core's perspective; no identity or uniqueness is
/// imposed and duplicates are counted as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Qualification judgment from the scoring flow (JS-truthy on the wire)
    #[serde(default, deserialize_with = "truthy")]
    pub qualificado: bool,
    /// Device tag; `"desktop"` (any case) marks desktop access
    #[serde(default, deserialize_with = "lenient_string")]
    pub dispositivo: Option<String>,
    /// Age answered in the survey; number or numeric string on the wire
    #[serde(default, deserialize_with = "lenient_u32")]
    pub idade: Option<u32>,
    /// Survey gender answer; only exact vocabulary values are bucketed
    #[serde(default, deserialize_with = "lenient_string")]
    pub sexo: Option<String>,
    /// Monthly-income range label from the survey
    #[serde(default, deserialize_with = "lenient_string")]
    pub renda_mensal: Option<String>,
    /// Qualification score assigned by the scoring flow
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_ia: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cidade: Option<String>,
    /// Traffic-source tag (`"ADS"` or `"Player"`)
    #[serde(default, deserialize_with = "lenient_string")]
    pub src: Option<String>,
    /// Capture timestamp; feeds the hourly histogram
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Lead {
    /// A record counts as a survey respondent when it carries an age or a
    /// gender answer.
    pub fn is_respondent(&self) -> bool {
        self.idade.is_some() || self.sexo.is_some()
    }
}

/* -------------------------------------------------------------------------- */
/* Lenient wire deserializers */
/* -------------------------------------------------------------------------- */

/// JS truthiness: null/absent, `false`, `0` and `""` are falsy, everything
/// else is truthy.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    })
}

/// Strings pass through; anything else is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts a non-negative number or a numeric string.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

/// Accepts a number or a numeric string.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts RFC 3339 or the `YYYY-MM-DD HH:MM:SS` form the capture flow
/// writes; anything else is treated as absent.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(raw)) = value else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(naive.and_utc()));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead(value: serde_json::Value) -> Lead {
        serde_json::from_value(value).unwrap_or_default()
    }

    #[test]
    fn qualificado_follows_js_truthiness() {
        assert!(lead(json!({"qualificado": true})).qualificado);
        assert!(lead(json!({"qualificado": 1})).qualificado);
        assert!(lead(json!({"qualificado": "sim"})).qualificado);
        assert!(!lead(json!({"qualificado": false})).qualificado);
        assert!(!lead(json!({"qualificado": 0})).qualificado);
        assert!(!lead(json!({"qualificado": ""})).qualificado);
        assert!(!lead(json!({"qualificado": null})).qualificado);
        assert!(!lead(json!({})).qualificado);
    }

    #[test]
    fn idade_accepts_number_or_numeric_string() {
        assert_eq!(lead(json!({"idade": 34})).idade, Some(34));
        assert_eq!(lead(json!({"idade": "34"})).idade, Some(34));
        assert_eq!(lead(json!({"idade": "n/a"})).idade, None);
        assert_eq!(lead(json!({"idade": null})).idade, None);
    }

    #[test]
    fn score_accepts_number_or_numeric_string() {
        assert_eq!(lead(json!({"score_ia": 8.5})).score_ia, Some(8.5));
        assert_eq!(lead(json!({"score_ia": "8.5"})).score_ia, Some(8.5));
        assert_eq!(lead(json!({"score_ia": {}})).score_ia, None);
    }

    #[test]
    fn non_string_tag_fields_degrade_to_absent() {
        assert_eq!(lead(json!({"sexo": 1})).sexo, None);
        assert_eq!(lead(json!({"dispositivo": 2})).dispositivo, None);
        assert_eq!(lead(json!({"src": false})).src, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let parsed = lead(json!({"sexo": "Masculino", "coluna_nova": {"x": 1}}));
        assert_eq!(parsed.sexo.as_deref(), Some("Masculino"));
    }

    #[test]
    fn created_at_parses_both_wire_forms() {
        let rfc = lead(json!({"created_at": "2025-11-03T14:05:00Z"}));
        assert_eq!(rfc.created_at.map(|t| t.format("%H").to_string()), Some("14".to_string()));

        let plain = lead(json!({"created_at": "2025-11-03 09:30:00"}));
        assert_eq!(plain.created_at.map(|t| t.format("%H").to_string()), Some("09".to_string()));

        assert_eq!(lead(json!({"created_at": "yesterday"})).created_at, None);
    }

    #[test]
    fn respondent_requires_age_or_gender() {
        assert!(lead(json!({"idade": 20})).is_respondent());
        assert!(lead(json!({"sexo": "Feminino"})).is_respondent());
        assert!(!lead(json!({"email": "a@b.com"})).is_respondent());
    }
}
