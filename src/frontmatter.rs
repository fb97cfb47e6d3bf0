//! YAML frontmatter parsing and value helpers

use std::io;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};

use crate::constants as C;

/// Split note content into its frontmatter block and body.
///
/// Returns `None` for the frontmatter when the note has no leading `---`
/// block. The body never includes the block or its closing fence.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line_end = content.find('\n').unwrap_or(content.len());
    if content[..first_line_end].trim_end() != "---" {
        return (None, content);
    }

    let rest = &content[(first_line_end + 1).min(content.len())..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let frontmatter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(frontmatter), body);
        }
        offset += line.len();
    }

    // Unterminated block: treat everything as body
    (None, content)
}

/// Parse the frontmatter of a note into a YAML mapping.
///
/// Missing, oversized, or malformed frontmatter yields an empty mapping.
pub fn parse_frontmatter(content: &str) -> Mapping {
    let (Some(raw), _) = split_frontmatter(content) else {
        return Mapping::new();
    };

    // Check frontmatter size before parsing
    if raw.len() > C::MAX_FRONTMATTER_SIZE || raw.trim().is_empty() {
        return Mapping::new();
    }

    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Mapping(map)) => map,
        Ok(_) => Mapping::new(),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed frontmatter");
            Mapping::new()
        }
    }
}

/// Body of a note with any leading frontmatter block removed
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).1
}

/// Look up a top-level key
pub fn get<'a>(frontmatter: &'a Mapping, key: &str) -> Option<&'a Value> {
    frontmatter.get(Value::String(key.to_string()))
}

/// Convert a scalar YAML value to its plain string form
pub fn to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Sequence(seq) => {
            let items: Vec<String> = seq.iter().map(to_plain_string).collect();
            items.join(",")
        }
        Value::Mapping(_) => serde_yaml::to_string(value).unwrap_or_default().trim().to_string(),
        Value::Tagged(tagged) => to_plain_string(&tagged.value),
    }
}

/// Date-time formats accepted in frontmatter, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only formats accepted in frontmatter
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse a frontmatter value into a timestamp.
///
/// Strings are tried as RFC 3339, then the local date-time and date
/// formats above. Integers are Unix epoch milliseconds. Anything else is
/// not a date.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        Value::Tagged(tagged) => parse_date(&tagged.value),
        _ => None,
    }
}

/// Parse a date string (see [`parse_date`])
pub fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Render a single-key frontmatter block.
///
/// The value goes through the YAML serializer, so anything that would not
/// survive as a plain scalar (`: `, ` #`, a trailing colon) gets quoted.
pub fn render_block(key: &str, value: &str) -> io::Result<String> {
    let mut block = Mapping::new();
    block.insert(Value::from(key), Value::from(value));
    let yaml = serde_yaml::to_string(&block)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(format!("---\n{}---\n", yaml))
}
