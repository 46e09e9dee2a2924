//! Parser and canonical renderer for `domain:key=value,...` object names.
//!
//! Key order in a source name is not guaranteed by the broker, so callers
//! must look properties up by key, never by position. Values wrapped in
//! `"` may contain literal `,` and `=`; the parser does not split on
//! separators inside quotes.

use serde::{Deserialize, Serialize};

use crate::error::MbeanError;

/// A parsed object name: a domain plus ordered `(key, value)` properties.
///
/// Property order reflects the source string. Quoting is stripped during
/// parsing; [`render_value`] re-quotes on output when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectName {
    pub domain: String,
    pub properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Parse an object-name string.
    ///
    /// Fails with [`MbeanError::Malformed`] when the `:` separator is
    /// missing, a segment lacks `=`, a key is empty, or a quote is left
    /// unterminated.
    pub fn parse(raw: &str) -> Result<Self, MbeanError> {
        let (domain, props) = raw
            .split_once(':')
            .ok_or_else(|| MbeanError::malformed(raw, "missing ':' separator"))?;
        if domain.is_empty() {
            return Err(MbeanError::malformed(raw, "empty domain"));
        }
        if props.is_empty() {
            return Err(MbeanError::malformed(raw, "empty property list"));
        }

        let mut properties = Vec::new();
        for segment in split_segments(props).map_err(|reason| MbeanError::malformed(raw, reason))? {
            let eq = find_unquoted(&segment, '=')
                .ok_or_else(|| MbeanError::malformed(raw, "property segment without '='"))?;
            let key = segment[..eq].trim();
            if key.is_empty() {
                return Err(MbeanError::malformed(raw, "empty property key"));
            }
            let value = unquote(&segment[eq + 1..])
                .map_err(|reason| MbeanError::malformed(raw, reason))?;
            properties.push((key.to_string(), value));
        }

        Ok(ObjectName {
            domain: domain.to_string(),
            properties,
        })
    }

    /// Value for `key`, if present.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Canonical rendering in original property order, minimally quoted.
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(self.domain.len() + 16);
        out.push_str(&self.domain);
        out.push(':');
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&render_value(value));
        }
        out
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Render a property value, quoting it when it contains a separator,
/// quote, colon, or backslash. Quotes and backslashes are escaped inside
/// the quoted form.
pub fn render_value(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| matches!(c, ',' | '=' | ':' | '"' | '\\'))
        || value.is_empty();
    if !needs_quotes {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Split the property list on commas that sit outside quotes.
fn split_segments(props: &str) -> Result<Vec<String>, &'static str> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in props.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                current.push(c);
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quote");
    }
    segments.push(current);
    Ok(segments)
}

/// Index of the first `needle` outside quotes, if any.
fn find_unquoted(segment: &str, needle: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in segment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Strip an optional surrounding quote pair and unescape the contents.
fn unquote(raw: &str) -> Result<String, &'static str> {
    let raw = raw.trim();
    if !raw.starts_with('"') {
        return Ok(raw.to_string());
    }
    if raw.len() < 2 || !raw.ends_with('"') {
        return Err("unterminated quote");
    }
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Err("unescaped quote inside quoted value");
        } else {
            out.push(c);
        }
    }
    if escaped {
        return Err("dangling escape in quoted value");
    }
    Ok(out)
}
