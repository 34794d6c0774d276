//! `serde_yaml` and `serde_json` backed parser.

use blueprint_application::ports::{DocumentFormat, DocumentParser, ParseError};
use blueprint_domain::{Document, Value};
use ordered_float::OrderedFloat;

/// Parses YAML and JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeDocumentParser;

impl SerdeDocumentParser {
    /// Creates a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentParser for SerdeDocumentParser {
    fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document, ParseError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        let syntax = |message: String| ParseError::Syntax { format, message };
        let root = match format {
            DocumentFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_slice(bytes).map_err(|e| syntax(e.to_string()))?;
                from_yaml(value).map_err(syntax)?
            }
            DocumentFormat::Json => {
                let value: serde_json::Value =
                    serde_json::from_slice(bytes).map_err(|e| syntax(e.to_string()))?;
                from_json(value)
            }
        };

        match root {
            Value::Map(document) => Ok(document),
            Value::Null => Ok(Document::new()),
            other => Err(ParseError::RootNotMap(other.kind())),
        }
    }
}

fn from_yaml(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Bool(flag),
        serde_yaml::Value::Number(number) => yaml_number(&number),
        serde_yaml::Value::String(text) => Value::String(text),
        serde_yaml::Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut document = Document::with_capacity(mapping.len());
            for (key, value) in mapping {
                document.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Value::Map(document)
        }
        // tags carry no meaning here
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn yaml_number(number: &serde_yaml::Number) -> Value {
    number.as_i64().map_or_else(
        || Value::Float(OrderedFloat(number.as_f64().unwrap_or(f64::NAN))),
        Value::Int,
    )
}

/// Scalar keys become their text; `10.0` reads as `10`.
fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        serde_yaml::Value::Number(number) => Ok(yaml_number(&number)
            .scalar_text()
            .unwrap_or_else(|| number.to_string())),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err("map keys must be scalars".to_string())
        }
    }
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(flag) => Value::Bool(flag),
        serde_json::Value::Number(number) => number.as_i64().map_or_else(
            || Value::Float(OrderedFloat(number.as_f64().unwrap_or(f64::NAN))),
            Value::Int,
        ),
        serde_json::Value::String(text) => Value::String(text),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}
