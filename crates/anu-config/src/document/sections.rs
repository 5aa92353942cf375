//! INI-style section document parsing.
//!
//! Values are kept raw; `${...}` references are resolved at lookup time so
//! they can see keys contributed by every merged layer.

use crate::ConfigError;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Prefixes that start a comment.
const COMMENT_PREFIXES: [char; 2] = ['#', ';'];

/// Parse a section document into `section -> { key -> value }`.
pub(super) fn parse_sections(
    contents: &str,
    origin: &str,
) -> Result<Map<String, Value>, ConfigError> {
    let mut sections: Map<String, Value> = Map::new();
    let mut seen_sections = HashSet::new();
    let mut seen_keys = HashSet::new();
    let mut current: Option<String> = None;
    // Key of the value being built and the indent of the line that opened it.
    let mut open_value: Option<(String, usize)> = None;
    // Blank lines seen since the last line of the open value.
    let mut pending_blank = 0;

    for (idx, line) in contents.lines().enumerate() {
        let lineno = idx + 1;
        let trimmed = line.trim();
        if trimmed.starts_with(COMMENT_PREFIXES) {
            continue;
        }
        let content = strip_inline_comment(line).trim();
        if content.is_empty() {
            pending_blank += 1;
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if let (Some(section), Some((key, key_indent))) = (current.as_ref(), open_value.as_ref()) {
            if indent > *key_indent {
                if let Some(Value::String(value)) = sections
                    .get_mut(section)
                    .and_then(Value::as_object_mut)
                    .and_then(|entries| entries.get_mut(key))
                {
                    // Interior blank lines survive; trailing ones never get here.
                    for _ in 0..=pending_blank {
                        value.push('\n');
                    }
                    value.push_str(content);
                }
                pending_blank = 0;
                continue;
            }
        }
        pending_blank = 0;

        if let Some(header) = content
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let name = header.trim();
            if name.is_empty() {
                return Err(ConfigError::parse(origin, Some(lineno), "empty section name"));
            }
            if !seen_sections.insert(name.to_string()) {
                return Err(ConfigError::parse(
                    origin,
                    Some(lineno),
                    format!("section [{name}] already exists"),
                ));
            }
            sections
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = Some(name.to_string());
            open_value = None;
            continue;
        }

        let Some(section) = current.as_ref() else {
            return Err(ConfigError::parse(
                origin,
                Some(lineno),
                format!("missing section header before `{content}`"),
            ));
        };
        let Some(split) = content.find(['=', ':']) else {
            return Err(ConfigError::parse(
                origin,
                Some(lineno),
                format!("expected `key = value`, found `{content}`"),
            ));
        };
        let key = content[..split].trim();
        let value = content[split + 1..].trim();
        if key.is_empty() {
            return Err(ConfigError::parse(origin, Some(lineno), "empty option name"));
        }
        if !seen_keys.insert((section.clone(), key.to_string())) {
            return Err(ConfigError::parse(
                origin,
                Some(lineno),
                format!("option `{key}` in section [{section}] already exists"),
            ));
        }
        if let Some(entries) = sections.get_mut(section).and_then(Value::as_object_mut) {
            entries.insert(key.to_string(), Value::String(value.to_string()));
        }
        open_value = Some((key.to_string(), indent));
    }

    Ok(sections)
}

/// Cut a trailing comment that starts with `#` or `;` after whitespace and
/// outside quotes.
fn strip_inline_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut after_space = false;
    for (idx, ch) in line.char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if after_space && COMMENT_PREFIXES.contains(&ch) => return &line[..idx],
            None => {}
        }
        after_space = ch.is_whitespace();
    }
    line
}
