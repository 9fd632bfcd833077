//! Catalog records: producers, colors and model variants.
//!
//! Records deserialize straight from the catalog document. The `producer_id`
//! and `producer_name` back-references are never read from the document; they
//! are stamped on when a record is copied into an index.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Color>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
}

impl Producer {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "opt_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_introduced: Option<i32>,
    #[serde(
        default,
        deserialize_with = "opt_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_last_used: Option<i32>,
    #[serde(
        default,
        deserialize_with = "opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub pre1925_id: Vec<String>,
    #[serde(default, skip_deserializing)]
    pub producer_id: String,
    #[serde(default, skip_deserializing)]
    pub producer_name: String,
}

impl Color {
    /// `companyId` when it is a non-empty run of ASCII digits.
    pub fn numeric_company_id(&self) -> Option<u64> {
        self.company_id.as_deref().and_then(parse_digits)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub number: ModelNumber,
    #[serde(
        default,
        deserialize_with = "opt_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_introduced: Option<i32>,
    #[serde(
        default,
        deserialize_with = "opt_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_last_mfg: Option<i32>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub colors: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rare_colors: Vec<String>,
    #[serde(
        default,
        deserialize_with = "legacy_code_entries",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub pre1925_codes: Vec<LegacyCodeEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_deserializing)]
    pub producer_id: String,
    #[serde(default, skip_deserializing)]
    pub producer_name: String,
}

impl Variant {
    /// The legacy code this variant used for `color_id`, if it recorded one.
    pub fn legacy_code_for(&self, color_id: &str) -> Option<&str> {
        self.pre1925_codes
            .iter()
            .find(|e| e.color_id == color_id)
            .map(|e| e.code.as_str())
    }

    pub fn references_color(&self, color_id: &str) -> bool {
        self.colors.iter().chain(&self.rare_colors).any(|c| c == color_id)
    }
}

/// A model number as it appears in the document: a JSON number or a string.
///
/// Matching always goes through the string form, so `700` and `"700"` compare
/// equal. Only [`ModelNumber::as_integer`] attempts numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelNumber {
    Numeric(serde_json::Number),
    Label(String),
}

impl ModelNumber {
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => n.as_u64(),
            Self::Label(s) => parse_digits(s.trim()),
        }
    }
}

impl Default for ModelNumber {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl fmt::Display for ModelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ModelNumber {
    fn from(value: u64) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<&str> for ModelNumber {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCodeEntry {
    pub color_id: String,
    pub code: String,
}

pub(crate) fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Treats an explicit `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A year given as a number or a numeric string. Anything else is unknown.
fn opt_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Scalar(Scalar),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Year>::deserialize(deserializer)? {
        Some(Year::Scalar(Scalar::Number(n))) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Some(Year::Scalar(Scalar::Text(s))) => s.trim().parse().ok(),
        Some(Year::Other(_)) | None => None,
    })
}

fn opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Scalar),
        Many(Vec<Scalar>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s.into_string()],
        Some(OneOrMany::Many(v)) => v.into_iter().map(Scalar::into_string).collect(),
    })
}

fn legacy_code_entries<'de, D>(deserializer: D) -> Result<Vec<LegacyCodeEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<IndexMap<String, Scalar>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flat_map(|entry| entry.into_iter())
        .map(|(color_id, code)| LegacyCodeEntry {
            color_id,
            code: code.into_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn color_accepts_scalar_company_id_and_single_legacy_id() -> Result<()> {
        let color: Color = serde_json::from_str(
            r#"{"id":"ccbc-12","name":"Frog","companyId":12,"pre1925Id":"F"}"#,
        )?;
        assert_eq!(color.company_id.as_deref(), Some("12"));
        assert_eq!(color.pre1925_id, vec!["F".to_string()]);
        assert_eq!(color.numeric_company_id(), Some(12));
        assert_eq!(color.year_introduced, None);
        assert!(color.producer_id.is_empty());
        Ok(())
    }

    #[test]
    fn alphanumeric_company_id_is_not_numeric() -> Result<()> {
        let color: Color =
            serde_json::from_str(r#"{"id":"ccbc-y12","name":"Yellow","companyId":"Y12"}"#)?;
        assert_eq!(color.numeric_company_id(), None);
        Ok(())
    }

    #[test]
    fn variant_number_keeps_string_form_for_both_encodings() -> Result<()> {
        let numeric: Variant = serde_json::from_str(r#"{"name":"Pikie","number":700}"#)?;
        let label: Variant = serde_json::from_str(r#"{"name":"Pikie","number":"700"}"#)?;
        assert_eq!(numeric.number.to_string(), "700");
        assert_eq!(label.number.to_string(), "700");
        assert_eq!(numeric.number.as_integer(), Some(700));
        assert_eq!(label.number.as_integer(), Some(700));
        Ok(())
    }

    #[test]
    fn non_numeric_model_number_has_no_integer_form() {
        assert_eq!(ModelNumber::from("Wiggle Fish").as_integer(), None);
        assert_eq!(ModelNumber::from("-5").as_integer(), None);
        let float = ModelNumber::Numeric(serde_json::Number::from_f64(1.5).unwrap());
        assert_eq!(float.as_integer(), None);
    }

    #[test]
    fn legacy_codes_flatten_in_document_order() -> Result<()> {
        let variant: Variant = serde_json::from_str(
            r#"{"name":"Pikie","number":700,
                "pre1925Codes":[{"ccbc-00":"2700"},{"ccbc-01":2701}]}"#,
        )?;
        assert_eq!(variant.legacy_code_for("ccbc-00"), Some("2700"));
        assert_eq!(variant.legacy_code_for("ccbc-01"), Some("2701"));
        assert_eq!(variant.legacy_code_for("ccbc-02"), None);
        Ok(())
    }

    #[test]
    fn explicit_nulls_read_as_missing_fields() -> Result<()> {
        let variant: Variant = serde_json::from_str(
            r#"{"name":null,"number":null,"colors":null,"rareColors":null,
                "yearIntroduced":null,"pre1925Codes":null,"notes":null}"#,
        )?;
        assert_eq!(variant.name, "");
        assert_eq!(variant.number, ModelNumber::default());
        assert!(variant.colors.is_empty());
        assert!(variant.rare_colors.is_empty());
        assert_eq!(variant.year_introduced, None);

        let color: Color = serde_json::from_str(
            r#"{"id":"a-1","name":null,"yearLastUsed":null,"companyId":null,"pre1925Id":null}"#,
        )?;
        assert_eq!(color.name, "");
        assert_eq!(color.year_last_used, None);
        assert_eq!(color.company_id, None);
        Ok(())
    }

    #[test]
    fn years_accept_numeric_strings_and_ignore_prose() -> Result<()> {
        let variant: Variant = serde_json::from_str(
            r#"{"name":"Pikie","number":700,"yearIntroduced":"1920","yearLastMfg":"c. 1950"}"#,
        )?;
        assert_eq!(variant.year_introduced, Some(1920));
        assert_eq!(variant.year_last_mfg, None);
        Ok(())
    }
}
