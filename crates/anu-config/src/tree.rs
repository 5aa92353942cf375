//! The in-memory configuration tree and its typed lookups.

use crate::document::interpolate_value;
use crate::loader::merge_maps;
use crate::{ConfigError, Format};
use serde_json::{Map, Value};

/// Section whose options are visible from every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Ordered, case-sensitive configuration mapping.
///
/// Structured trees hold arbitrary YAML nesting. Sectioned trees hold one
/// level of `section -> { key -> raw string }`; their string lookups expand
/// `${...}` references against the whole tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTree {
    format: Format,
    root: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree for the given format.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            root: Map::new(),
        }
    }

    /// Wrap an already-parsed mapping.
    pub fn from_map(format: Format, root: Map<String, Value>) -> Self {
        Self { format, root }
    }

    /// Format the tree was loaded from.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Borrow the top-level mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Consume the tree and return the top-level mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Nested value by key path (`["logging", "prefix"]`).
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.root.get(*first)?, |value, key| value.as_object()?.get(*key))
    }

    /// Deep-merge `overlay` into this tree; overlay values win.
    pub fn merge(&mut self, overlay: &ConfigTree) {
        merge_maps(&mut self.root, &overlay.root);
    }

    /// Raw value at `section.key` without interpolation.
    ///
    /// Sectioned trees fall back to the `DEFAULT` section when the named
    /// section exists but lacks the key.
    pub fn raw(&self, section: &str, key: &str) -> Option<&Value> {
        let entries = self.root.get(section)?.as_object()?;
        entries.get(key).or_else(|| match self.format {
            Format::Sectioned => self
                .root
                .get(DEFAULT_SECTION)
                .and_then(Value::as_object)
                .and_then(|defaults| defaults.get(key)),
            Format::Structured => None,
        })
    }

    pub(crate) fn raw_str(&self, section: &str, key: &str) -> Option<&str> {
        self.raw(section, key).and_then(Value::as_str)
    }

    /// Value at `section.key` for the typed getters.
    ///
    /// A missing or `null` section reads as absent; a section that is present
    /// but not a mapping is an error rather than a silent fallback.
    fn lookup(&self, section: &str, key: &str) -> Result<Option<&Value>, ConfigError> {
        match self.root.get(section) {
            None | Some(Value::Null) | Some(Value::Object(_)) => Ok(self.raw(section, key)),
            Some(other) => Err(ConfigError::invalid(
                section,
                format!("expected a section of options, found {other}"),
            )),
        }
    }

    /// String value at `section.key`, or `None` when absent.
    pub fn get_str(&self, section: &str, key: &str) -> Result<Option<String>, ConfigError> {
        let Some(value) = self.lookup(section, key)? else {
            return Ok(None);
        };
        match value {
            Value::Null => Ok(None),
            Value::String(text) if self.format == Format::Sectioned => {
                interpolate_value(self, section, key, text).map(Some)
            }
            Value::String(text) => Ok(Some(text.clone())),
            Value::Number(number) => Ok(Some(number.to_string())),
            Value::Bool(flag) => Ok(Some(flag.to_string())),
            Value::Array(_) | Value::Object(_) => Err(ConfigError::invalid(
                field_path(section, key),
                "expected a scalar value",
            )),
        }
    }

    /// Integer value at `section.key`, or `None` when absent.
    pub fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, ConfigError> {
        let path = field_path(section, key);
        match self.lookup(section, key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number.as_i64().map(Some).ok_or_else(|| {
                ConfigError::invalid(path, format!("expected an integer, found {number}"))
            }),
            Some(Value::String(_)) => {
                let text = self.get_str(section, key)?.unwrap_or_default();
                text.trim().parse::<i64>().map(Some).map_err(|_| {
                    ConfigError::invalid(path, format!("expected an integer, found `{text}`"))
                })
            }
            Some(_) => Err(ConfigError::invalid(path, "expected an integer")),
        }
    }

    /// Boolean value at `section.key`, or `None` when absent.
    ///
    /// Accepts `1/yes/true/on` and `0/no/false/off` in any case.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
        let path = field_path(section, key);
        match self.lookup(section, key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(ConfigError::invalid(
                    path,
                    format!("expected a boolean, found {number}"),
                )),
            },
            Some(Value::String(_)) => {
                let text = self.get_str(section, key)?.unwrap_or_default();
                parse_bool(&text).map(Some).ok_or_else(|| {
                    ConfigError::invalid(path, format!("expected a boolean, found `{text}`"))
                })
            }
            Some(_) => Err(ConfigError::invalid(path, "expected a boolean")),
        }
    }
}

fn field_path(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn structured(value: Value) -> ConfigTree {
        match value {
            Value::Object(map) => ConfigTree::from_map(Format::Structured, map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn structured_lookups_read_native_types() {
        let tree = structured(json!({
            "logging": {"prefix": "svc", "port": 9000, "stdout": true, "file_log": "off"}
        }));
        assert_eq!(tree.get_str("logging", "prefix").expect("str"), Some("svc".to_string()));
        assert_eq!(tree.get_int("logging", "port").expect("int"), Some(9000));
        assert_eq!(tree.get_bool("logging", "stdout").expect("bool"), Some(true));
        assert_eq!(tree.get_bool("logging", "file_log").expect("bool"), Some(false));
    }

    #[test]
    fn missing_values_are_none() {
        let tree = structured(json!({"logging": {"prefix": null}}));
        assert_eq!(tree.get_str("logging", "prefix").expect("str"), None);
        assert_eq!(tree.get_int("logging", "port").expect("int"), None);
        assert_eq!(tree.get_bool("absent", "stdout").expect("bool"), None);
    }

    #[test]
    fn wrong_types_are_invalid() {
        let tree = structured(json!({
            "logging": {
                "port": "banana",
                "stdout": "maybe",
                "prefix": {"nested": 1},
                "max_byte": 1.5
            }
        }));
        let err = tree.get_int("logging", "port").unwrap_err();
        assert!(err.to_string().contains("logging.port"), "{err}");
        assert!(tree.get_bool("logging", "stdout").is_err());
        assert!(tree.get_str("logging", "prefix").is_err());
        assert!(tree.get_int("logging", "max_byte").is_err());
    }

    #[test]
    fn non_mapping_section_is_invalid() {
        let tree = structured(json!({"logging": "banana", "global": null}));
        for err in [
            tree.get_str("logging", "prefix").unwrap_err(),
            tree.get_int("logging", "port").unwrap_err(),
            tree.get_bool("logging", "stdout").unwrap_err(),
        ] {
            match err {
                ConfigError::InvalidField { path, .. } => assert_eq!(path, "logging"),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(tree.get_str("global", "cwd").expect("null section"), None);
    }

    #[test]
    fn sectioned_lookups_parse_strings() {
        let tree = Format::Sectioned
            .parse("[logging]\nport = 19883\nstdout = Yes\n", "inline")
            .expect("parse");
        assert_eq!(tree.get_int("logging", "port").expect("int"), Some(19883));
        assert_eq!(tree.get_bool("logging", "stdout").expect("bool"), Some(true));
    }

    #[test]
    fn default_section_needs_existing_section() {
        let tree = Format::Sectioned
            .parse("[DEFAULT]\nlevel = 30\n[logging]\nprefix = svc\n", "inline")
            .expect("parse");
        assert_eq!(tree.get_int("logging", "level").expect("int"), Some(30));
        assert_eq!(tree.get_int("global", "level").expect("int"), None);
    }

    #[test]
    fn get_path_walks_nested_maps() {
        let tree = structured(json!({"a": {"b": {"c": 3}}}));
        assert_eq!(tree.get_path(&["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(tree.get_path(&["a", "x"]), None);
        assert_eq!(tree.get_path(&[]), None);
    }
}
