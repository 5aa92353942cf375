//! Extended `${section:key}` interpolation for section documents.

use crate::{ConfigError, ConfigTree};

/// Maximum number of nested substitutions before giving up.
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Expand references in `raw`, the value stored at `section.key`.
///
/// `${key}` looks in `section` (then `DEFAULT`), `${other:key}` looks in any
/// section, and `$$` produces a literal `$`.
pub(crate) fn interpolate_value(
    tree: &ConfigTree,
    section: &str,
    key: &str,
    raw: &str,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    expand(tree, section, key, raw, 1, &mut out)?;
    Ok(out)
}

fn expand(
    tree: &ConfigTree,
    section: &str,
    key: &str,
    raw: &str,
    depth: usize,
    out: &mut String,
) -> Result<(), ConfigError> {
    let path = format!("{section}.{key}");
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(ConfigError::invalid(
            path,
            format!("interpolation deeper than {MAX_INTERPOLATION_DEPTH} levels in `{raw}`"),
        ));
    }

    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(body) = tail.strip_prefix('{') {
            let Some(close) = body.find('}') else {
                return Err(ConfigError::invalid(
                    path,
                    format!("unterminated reference in `{raw}`"),
                ));
            };
            let reference = &body[..close];
            let (target_section, target_key) =
                split_reference(reference, section).ok_or_else(|| {
                    ConfigError::invalid(&path, format!("malformed reference `${{{reference}}}`"))
                })?;
            let value = tree.raw_str(target_section, target_key).ok_or_else(|| {
                ConfigError::invalid(
                    &path,
                    format!("reference `${{{reference}}}` points at a missing option"),
                )
            })?;
            if value.contains('$') {
                expand(tree, target_section, target_key, value, depth + 1, out)?;
            } else {
                out.push_str(value);
            }
            rest = &body[close + 1..];
        } else {
            return Err(ConfigError::invalid(
                path,
                format!("`$` must be followed by `$` or `{{` in `{raw}`"),
            ));
        }
    }
    out.push_str(rest);
    Ok(())
}

fn split_reference<'a>(reference: &'a str, section: &'a str) -> Option<(&'a str, &'a str)> {
    let mut parts = reference.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), None, None) if !key.is_empty() => Some((section, key)),
        (Some(target), Some(key), None) if !target.is_empty() && !key.is_empty() => {
            Some((target, key))
        }
        _ => None,
    }
}
