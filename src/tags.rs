//! Tag normalization and matching

use serde_yaml::Value;

use crate::settings::TagMatchMode;

/// Normalize a tag: trim whitespace and strip one leading `#`
pub fn normalize_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('#').unwrap_or(tag).trim()
}

/// Tags from a frontmatter `tags` value.
///
/// Arrays contribute each string item. Strings are split on commas,
/// semicolons, newlines and whitespace; each item may carry a `- ` or `* `
/// list marker and a leading `#`.
pub fn frontmatter_tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(normalize_tag(s)),
                _ => None,
            })
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) => split_tag_string(s),
        _ => Vec::new(),
    }
}

/// Split a delimited tag string into normalized tags
fn split_tag_string(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c == ';' || c == '\n')
        .map(|item| {
            let item = item.trim();
            item.strip_prefix("- ")
                .or_else(|| item.strip_prefix("* "))
                .unwrap_or(item)
        })
        .flat_map(str::split_whitespace)
        .filter(|item| *item != "-" && *item != "*")
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a note tag matches a queried tag.
///
/// Both sides are normalized first. See [`TagMatchMode`] for the policies;
/// the default accepts the tag itself and its sub-tags only.
pub fn tag_matches(note_tag: &str, query: &str, mode: TagMatchMode) -> bool {
    let note_tag = normalize_tag(note_tag);
    let query = normalize_tag(query);
    if note_tag.is_empty() || query.is_empty() {
        return false;
    }

    match mode {
        TagMatchMode::Exact => is_same_or_subtag(note_tag, query),
        TagMatchMode::IgnoreCase => {
            is_same_or_subtag(&note_tag.to_lowercase(), &query.to_lowercase())
        }
        TagMatchMode::Loose => {
            let note_tag = note_tag.to_lowercase();
            let query = query.to_lowercase();
            is_same_or_subtag(&note_tag, &query)
                || note_tag.contains(&query)
                || query.contains(&note_tag)
        }
    }
}

fn is_same_or_subtag(note_tag: &str, query: &str) -> bool {
    note_tag == query
        || note_tag
            .strip_prefix(query)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("#foo"), "foo");
        assert_eq!(normalize_tag("  foo "), "foo");
        assert_eq!(normalize_tag("##foo"), "#foo");
    }

    #[test]
    fn test_exact_and_subtag() {
        let mode = TagMatchMode::Exact;
        assert!(tag_matches("project", "project", mode));
        assert!(tag_matches("project/alpha", "project", mode));
        assert!(tag_matches("#project/alpha", "#project", mode));
        assert!(!tag_matches("projectX", "project", mode));
        assert!(!tag_matches("project", "project/alpha", mode));
        assert!(!tag_matches("Project", "project", mode));
    }

    #[test]
    fn test_hash_prefix_is_idempotent() {
        for mode in [TagMatchMode::Exact, TagMatchMode::IgnoreCase, TagMatchMode::Loose] {
            for tag in ["foo", "foo/bar", "food", "bar"] {
                assert_eq!(tag_matches(tag, "#foo", mode), tag_matches(tag, "foo", mode));
            }
        }
    }

    #[test]
    fn test_ignore_case() {
        assert!(tag_matches("Project/Alpha", "project", TagMatchMode::IgnoreCase));
        assert!(!tag_matches("projectx", "PROJECT", TagMatchMode::IgnoreCase));
    }

    #[test]
    fn test_loose_is_permissive() {
        // Substring containment in both directions, opt-in only
        assert!(tag_matches("projectX", "project", TagMatchMode::Loose));
        assert!(tag_matches("pro", "project", TagMatchMode::Loose));
        assert!(!tag_matches("other", "project", TagMatchMode::Loose));
    }

    #[test]
    fn test_frontmatter_tag_list_array() {
        let value: Value = serde_yaml::from_str("[\"#a\", b/c, 3, \" \"]").unwrap();
        assert_eq!(frontmatter_tag_list(&value), vec!["a", "b/c"]);
    }

    #[test]
    fn test_frontmatter_tag_list_string() {
        let value = Value::String("a, #b; c d".to_string());
        assert_eq!(frontmatter_tag_list(&value), vec!["a", "b", "c", "d"]);

        let value = Value::String("- one\n- #two\n* three".to_string());
        assert_eq!(frontmatter_tag_list(&value), vec!["one", "two", "three"]);

        assert!(frontmatter_tag_list(&Value::Null).is_empty());
    }
}
