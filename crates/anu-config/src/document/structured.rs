//! YAML document parsing.

use crate::ConfigError;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Parse a YAML document into a top-level mapping.
///
/// Empty and comment-only documents, as well as an explicit `null` root,
/// produce an empty mapping.
pub(super) fn parse_structured(
    contents: &str,
    origin: &str,
) -> Result<Map<String, Value>, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Map::new());
    }
    let yaml: YamlValue = serde_yaml::from_str(contents).map_err(|err| yaml_error(origin, &err))?;
    match yaml_to_json(yaml, origin)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::parse(
            origin,
            None,
            format!("document root must be a mapping, found {}", kind(&other)),
        )),
    }
}

fn yaml_error(origin: &str, err: &serde_yaml::Error) -> ConfigError {
    let location = err.location();
    ConfigError::ParseFailed {
        origin: origin.to_string(),
        line: location.as_ref().map(|loc| loc.line()),
        column: location.as_ref().map(|loc| loc.column()),
        message: err.to_string(),
    }
}

fn yaml_to_json(value: YamlValue, origin: &str) -> Result<Value, ConfigError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => number_to_json(&number, origin)?,
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(|item| yaml_to_json(item, origin))
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(mapping_key(key, origin)?, yaml_to_json(value, origin)?);
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, origin)?,
    })
}

fn number_to_json(number: &serde_yaml::Number, origin: &str) -> Result<Value, ConfigError> {
    if let Some(int) = number.as_i64() {
        return Ok(Value::Number(int.into()));
    }
    if let Some(int) = number.as_u64() {
        return Ok(Value::Number(int.into()));
    }
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| ConfigError::parse(origin, None, format!("unsupported number {number}")))
}

fn mapping_key(key: YamlValue, origin: &str) -> Result<String, ConfigError> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Bool(flag) => Ok(flag.to_string()),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => mapping_key(tagged.value, origin),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(ConfigError::parse(
            origin,
            None,
            "mapping keys must be scalars",
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
