//! Selection criteria and the `generated_from` provenance encoding

use std::fmt;
use std::io;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use crate::frontmatter;
use crate::settings::MetadataMatchMode;
use crate::tags;
use crate::util;

/// A metadata query: `key` or `key: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataQuery {
    pub key: String,
    /// `None` means "key present with any value"
    pub value: Option<String>,
}

impl MetadataQuery {
    /// Parse a query string, splitting at the first colon.
    ///
    /// Both parts are trimmed; an empty value is the same as no value.
    pub fn parse(query: &str) -> io::Result<Self> {
        let (key, value) = match query.split_once(':') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (query.trim(), None),
        };

        if key.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Metadata query has no key: '{}'", query),
            ));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }

    /// Whether a note's frontmatter satisfies the query.
    ///
    /// Without a value, the key only has to be present (a null value
    /// counts). With a value, comparison is case-insensitive against the
    /// scalar's string form or each array item, following `mode`.
    pub fn matches(&self, fm: &Mapping, mode: MetadataMatchMode) -> bool {
        let Some(field) = frontmatter::get(fm, &self.key) else {
            return false;
        };
        let Some(query) = &self.value else {
            return true;
        };

        let query = query.strip_prefix("- ").unwrap_or(query).trim().to_lowercase();
        match field {
            Value::Null => false,
            Value::Sequence(items) => items
                .iter()
                .any(|item| value_matches(&frontmatter::to_plain_string(item), &query, mode)),
            other => value_matches(&frontmatter::to_plain_string(other), &query, mode),
        }
    }
}

/// Compare one frontmatter string with a lowercased query
fn value_matches(field: &str, query: &str, mode: MetadataMatchMode) -> bool {
    let field = field.trim().to_lowercase();
    if field.is_empty() {
        return query.is_empty();
    }
    match mode {
        MetadataMatchMode::Exact => field == query,
        MetadataMatchMode::Contains => field.contains(query),
        MetadataMatchMode::Loose => field.contains(query) || query.contains(&field),
    }
}

impl fmt::Display for MetadataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// What a timeline is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Every note below a folder
    Folder(String),
    /// Notes carrying a tag or one of its sub-tags
    Tag(String),
    /// Notes whose frontmatter matches a query
    Metadata(MetadataQuery),
    /// Notes linked from a note
    FileLinks(String),
}

impl Criterion {
    pub fn folder(path: &str) -> Self {
        Criterion::Folder(util::normalize_vault_path(path))
    }

    pub fn tag(name: &str) -> Self {
        Criterion::Tag(tags::normalize_tag(name).to_string())
    }

    pub fn metadata(query: &str) -> io::Result<Self> {
        MetadataQuery::parse(query).map(Criterion::Metadata)
    }

    pub fn file_links(path: &str) -> Self {
        Criterion::FileLinks(util::normalize_vault_path(path))
    }

    /// Provenance recorded in generated files
    pub fn provenance(&self) -> Provenance {
        match self {
            Criterion::Folder(path) => Provenance::new(SourceKind::Folder, path.clone()),
            Criterion::Tag(name) => Provenance::new(SourceKind::Tag, name.clone()),
            Criterion::Metadata(query) => Provenance::new(
                SourceKind::Metadata,
                format!("{}:{}", query.key, query.value.as_deref().unwrap_or("")),
            ),
            Criterion::FileLinks(path) => Provenance::new(SourceKind::File, path.clone()),
        }
    }
}

/// Kind part of a `generated_from` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Folder,
    Tag,
    Metadata,
    File,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Folder => "folder",
            SourceKind::Tag => "tag",
            SourceKind::Metadata => "metadata",
            SourceKind::File => "file",
        }
    }
}

impl FromStr for SourceKind {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "folder" => Ok(SourceKind::Folder),
            "tag" => Ok(SourceKind::Tag),
            "metadata" => Ok(SourceKind::Metadata),
            "file" => Ok(SourceKind::File),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown timeline source kind '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(kind, value)` pair stored as `generated_from: <kind>:<value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub kind: SourceKind,
    pub value: String,
}

impl Provenance {
    pub fn new(kind: SourceKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }

    /// Encoded `generated_from` value
    pub fn encode(&self) -> String {
        format!("{}:{}", self.kind, self.value)
    }

    /// Parse a `generated_from` value by splitting at the first colon
    pub fn parse(encoded: &str) -> io::Result<Self> {
        let (kind, value) = encoded.trim().split_once(':').ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Malformed generated_from value '{}'", encoded),
            )
        })?;
        Ok(Self::new(kind.parse()?, value.trim()))
    }

    /// The criterion that regenerates this timeline
    pub fn to_criterion(&self) -> io::Result<Criterion> {
        Ok(match self.kind {
            SourceKind::Folder => Criterion::folder(&self.value),
            SourceKind::Tag => Criterion::tag(&self.value),
            SourceKind::Metadata => Criterion::metadata(&self.value)?,
            SourceKind::File => Criterion::file_links(&self.value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_query_parse() {
        let q = MetadataQuery::parse("author: Alice").unwrap();
        assert_eq!(q.key, "author");
        assert_eq!(q.value.as_deref(), Some("Alice"));

        let q = MetadataQuery::parse("status").unwrap();
        assert_eq!(q.value, None);

        let q = MetadataQuery::parse("status:   ").unwrap();
        assert_eq!(q.value, None);

        // Only the first colon splits
        let q = MetadataQuery::parse("time: 10:30").unwrap();
        assert_eq!(q.key, "time");
        assert_eq!(q.value.as_deref(), Some("10:30"));

        assert!(MetadataQuery::parse(": value").is_err());
        assert!(MetadataQuery::parse("   ").is_err());
    }

    fn fm(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_metadata_key_only() {
        let query = MetadataQuery::parse("status").unwrap();
        let mode = MetadataMatchMode::Contains;
        assert!(query.matches(&fm("status: done"), mode));
        assert!(query.matches(&fm("status:"), mode));
        assert!(!query.matches(&fm("other: done"), mode));
    }

    #[test]
    fn test_metadata_array_contains() {
        let query = MetadataQuery::parse("author: Alice").unwrap();
        assert!(query.matches(&fm("author: [Alice, Bob]"), MetadataMatchMode::Contains));
        assert!(query.matches(&fm("author: [alice]"), MetadataMatchMode::Exact));
        assert!(!query.matches(&fm("author: [Bob]"), MetadataMatchMode::Contains));
    }

    #[test]
    fn test_metadata_substring_is_intended_but_loose() {
        // The default policy accepts substrings: "Alice" matches "Alice Smith".
        // This is deliberately permissive; use `exact` to avoid it.
        let query = MetadataQuery::parse("author: Alice").unwrap();
        assert!(query.matches(&fm("author: Alice Smith"), MetadataMatchMode::Contains));
        assert!(!query.matches(&fm("author: Alice Smith"), MetadataMatchMode::Exact));
    }

    #[test]
    fn test_metadata_loose_is_bidirectional() {
        let query = MetadataQuery::parse("author: Alice Smith").unwrap();
        assert!(!query.matches(&fm("author: Alice"), MetadataMatchMode::Contains));
        assert!(query.matches(&fm("author: Alice"), MetadataMatchMode::Loose));
    }

    #[test]
    fn test_metadata_scalar_types() {
        let query = MetadataQuery::parse("priority: 1").unwrap();
        assert!(query.matches(&fm("priority: 1"), MetadataMatchMode::Exact));
        let query = MetadataQuery::parse("done: TRUE").unwrap();
        assert!(query.matches(&fm("done: true"), MetadataMatchMode::Exact));
        let query = MetadataQuery::parse("status: - done").unwrap();
        assert!(query.matches(&fm("status: [done]"), MetadataMatchMode::Exact));
        assert!(!query.matches(&fm("status: ~"), MetadataMatchMode::Contains));
    }

    #[test]
    fn test_criterion_normalization() {
        assert_eq!(Criterion::tag("#foo"), Criterion::tag("foo"));
        assert_eq!(Criterion::folder("./journal/"), Criterion::Folder("journal".to_string()));
    }

    #[test]
    fn test_provenance_round_trip() {
        let criteria = [
            Criterion::folder("journal/2024"),
            Criterion::tag("project/alpha"),
            Criterion::file_links("notes/Index.md"),
            Criterion::metadata("author: Alice").unwrap(),
        ];
        for criterion in criteria {
            let provenance = criterion.provenance();
            let parsed = Provenance::parse(&provenance.encode()).unwrap();
            assert_eq!(parsed, provenance);
            assert_eq!(parsed.to_criterion().unwrap(), criterion);
        }
    }

    #[test]
    fn test_metadata_provenance_is_key_value() {
        let criterion = Criterion::metadata("status").unwrap();
        let provenance = criterion.provenance();
        assert_eq!(provenance.encode(), "metadata:status:");

        let parsed = Provenance::parse("metadata:status:").unwrap();
        assert_eq!(parsed.kind, SourceKind::Metadata);
        assert_eq!(parsed.value, "status:");
        assert_eq!(parsed.to_criterion().unwrap(), criterion);

        let provenance = Criterion::metadata("author : Alice").unwrap().provenance();
        assert_eq!(provenance.encode(), "metadata:author:Alice");
    }

    #[test]
    fn test_provenance_survives_frontmatter() {
        let criteria = [
            Criterion::metadata("title: Re: hello").unwrap(),
            Criterion::folder("notes #2"),
            Criterion::tag("c#"),
        ];
        for criterion in criteria {
            let block = frontmatter::render_block("generated_from", &criterion.provenance().encode())
                .unwrap();
            let fm = frontmatter::parse_frontmatter(&block);
            let encoded = frontmatter::get(&fm, "generated_from").map(frontmatter::to_plain_string);
            let parsed = Provenance::parse(&encoded.unwrap()).unwrap();
            assert_eq!(parsed.to_criterion().unwrap(), criterion);
        }
    }

    #[test]
    fn test_provenance_parse_errors() {
        assert_eq!(Provenance::parse("folder").unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(Provenance::parse("note:x").unwrap_err().kind(), io::ErrorKind::InvalidData);
    }
}
