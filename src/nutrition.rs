//! Nutrition record and user profile types as returned by the lookup and
//! profile services.
//!
//! Numeric fields are parsed leniently: the product service sends numbers,
//! numeric strings, `"N/A"` or null interchangeably. Anything that does not
//! start with a number is kept as absent. Nutrient amounts also keep the raw
//! value for display, so `"4.2 mg"` still shows its unit.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

lazy_static! {
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?")
        .expect("Leading number pattern should be valid");
}

/// Grade placeholder used when a score is missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Full structured result of a product lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default = "not_available", deserialize_with = "grade_or_not_available")]
    pub eco_score: String,
    #[serde(default = "not_available", deserialize_with = "grade_or_not_available")]
    pub nutri_score: String,
    #[serde(default)]
    pub ingredients: Option<String>,
    /// Amount per 100g, in the order the service listed them
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutritional_values: IndexMap<String, NutrientAmount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub low_nutrient_warnings: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbon_footprint: Option<f64>,
}

impl Default for NutritionRecord {
    fn default() -> Self {
        Self {
            product_name: None,
            eco_score: not_available(),
            nutri_score: not_available(),
            ingredients: None,
            nutritional_values: IndexMap::new(),
            low_nutrient_warnings: Vec::new(),
            carbon_footprint: None,
        }
    }
}

/// One nutrient entry: the value as sent plus its numeric reading
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NutrientAmount {
    pub value: Option<f64>,
    pub raw: Value,
}

impl NutrientAmount {
    pub fn new(raw: Value) -> Self {
        Self {
            value: numeric_value(&raw),
            raw,
        }
    }

    /// Text for the level table; `None` for null, zero, `false` or empty text
    pub fn display_text(&self) -> Option<String> {
        match &self.raw {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            Value::Array(_) | Value::Object(_) => Some(self.raw.to_string()),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for NutrientAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::new(Value::deserialize(deserializer)?))
    }
}

impl Serialize for NutrientAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

/// Profile of the signed-in user; the shape belongs to the profile service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserProfile {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn grade_or_not_available<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let grade = Option::<String>::deserialize(deserializer)?;
    Ok(grade
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(not_available))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(numeric_value))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric reading of a JSON value, taking the leading number of strings
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim_start().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_deserializes() {
        let record: NutritionRecord = serde_json::from_value(json!({
            "product_name": "Nutella 400g",
            "eco_score": "D",
            "nutri_score": "E",
            "ingredients": "Sugar, palm oil, hazelnuts",
            "nutritional_values": {"sugars": 56.3, "fat": "30.9", "salt": "N/A", "fiber": null},
            "low_nutrient_warnings": ["Low in fiber"],
            "carbon_footprint": "470.5"
        }))
        .unwrap();

        assert_eq!(record.nutri_score, "E");
        assert_eq!(record.nutritional_values["sugars"].value, Some(56.3));
        assert_eq!(record.nutritional_values["fat"].value, Some(30.9));
        assert_eq!(record.nutritional_values["salt"].value, None);
        assert_eq!(record.nutritional_values["fiber"].value, None);
        assert_eq!(record.carbon_footprint, Some(470.5));
        assert_eq!(record.low_nutrient_warnings, vec!["Low in fiber".to_string()]);
    }

    #[test]
    fn test_sparse_record_gets_defaults() {
        let record: NutritionRecord = serde_json::from_value(json!({
            "nutri_score": null,
            "nutritional_values": null,
            "low_nutrient_warnings": null,
            "carbon_footprint": "N/A"
        }))
        .unwrap();

        assert_eq!(record.eco_score, NOT_AVAILABLE);
        assert_eq!(record.nutri_score, NOT_AVAILABLE);
        assert!(record.nutritional_values.is_empty());
        assert!(record.low_nutrient_warnings.is_empty());
        assert_eq!(record.carbon_footprint, None);
    }

    #[test]
    fn test_nutrient_order_is_preserved() {
        let record: NutritionRecord = serde_json::from_str(
            r#"{"nutritional_values": {"zinc": 1, "alpha": 2, "mid": 3}}"#,
        )
        .unwrap();
        let keys: Vec<_> = record.nutritional_values.keys().cloned().collect();
        assert_eq!(keys, vec!["zinc", "alpha", "mid"]);
    }

    #[test]
    fn test_leading_number_parsing() {
        assert_eq!(leading_number("12.5 g"), Some(12.5));
        assert_eq!(leading_number("  -0.3"), Some(-0.3));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("N/A"), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("1e3"), Some(1000.0));
        assert_eq!(leading_number("2.5E-1 g"), Some(0.25));
        assert_eq!(leading_number("3e"), Some(3.0));
        assert_eq!(leading_number("7. kcal"), Some(7.0));
    }

    #[test]
    fn test_nutrient_amount_keeps_raw_text() {
        let record: NutritionRecord = serde_json::from_value(json!({
            "nutritional_values": {"iron": "4.2 mg", "fat": 30.9, "fiber": 0, "salt": null, "zinc": ""}
        }))
        .unwrap();
        let values = &record.nutritional_values;

        assert_eq!(values["iron"].value, Some(4.2));
        assert_eq!(values["iron"].display_text().as_deref(), Some("4.2 mg"));
        assert_eq!(values["fat"].display_text().as_deref(), Some("30.9"));
        assert_eq!(values["fiber"].display_text(), None);
        assert_eq!(values["salt"].display_text(), None);
        assert_eq!(values["zinc"].display_text(), None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nutritional_values"]["iron"], json!("4.2 mg"));
    }

    #[test]
    fn test_profile_keeps_arbitrary_fields() {
        let profile: UserProfile =
            serde_json::from_value(json!({"name": "Sam", "allergies": ["nuts"]})).unwrap();
        assert_eq!(profile.get("name"), Some(&json!("Sam")));
        assert!(profile.get("missing").is_none());
    }
}
