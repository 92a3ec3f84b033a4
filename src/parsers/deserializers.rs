use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{SpanKind, TextField, TextSpan};

/// Custom deserializer for optional strings that treats `""` the same as an absent field
pub fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Object form of a text entity
#[derive(Deserialize)]
struct SpanObject {
    #[serde(rename = "type", default)]
    kind: SpanKind,
    #[serde(default)]
    text: String,
    #[serde(default)]
    href: Option<String>,
}

impl TextSpan {
    fn from_value<E: Error>(value: Value) -> Result<Self, E> {
        match value {
            Value::String(text) => Ok(TextSpan::plain(text)),
            Value::Object(_) => {
                let obj: SpanObject = serde_json::from_value(value)
                    .map_err(|e| E::custom(format!("invalid text entity: {}", e)))?;
                Ok(TextSpan { kind: obj.kind, text: obj.text, href: obj.href })
            }
            other => Err(E::custom(format!(
                "text entity must be a string or an object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Accepts either a bare string (promoted to a plain span) or an entity object
impl<'de> Deserialize<'de> for TextSpan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TextSpan::from_value(Value::deserialize(deserializer)?)
    }
}

/// Accepts a JSON string (plain text) or a JSON array of entities, in that order
impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(TextField::Plain(text)),
            Value::Array(items) => items
                .into_iter()
                .map(TextSpan::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(TextField::Spans),
            other => Err(Error::custom(format!(
                "text field is neither string nor array, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
