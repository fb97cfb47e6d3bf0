//! Timeline assembly: candidates → dated entries → sorted list

use std::io;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_yaml::Mapping;

use crate::constants as C;
use crate::criterion::Criterion;
use crate::frontmatter;
use crate::gather::Gatherer;
use crate::markdown;
use crate::settings::{Settings, TagMatchMode};
use crate::storage::Storage;
use crate::util;
use crate::vault::{Note, Vault};

/// One dated note on a timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub date: NaiveDateTime,
    pub title: String,
    pub path: String,
    pub preview: String,
    pub is_milestone: bool,
}

/// Builds timelines from a vault with the given settings
pub struct Timeline<'a, S: Storage> {
    vault: &'a Vault<S>,
    settings: &'a Settings,
}

impl<'a, S: Storage> Timeline<'a, S> {
    pub fn new(vault: &'a Vault<S>, settings: &'a Settings) -> Self {
        Self { vault, settings }
    }

    /// Dated entries for a criterion, most recent first
    pub fn generate(&self, criterion: &Criterion) -> io::Result<Vec<TimelineEntry>> {
        let candidates = Gatherer::new(self.vault, self.settings).candidates(criterion)?;
        let tag = match criterion {
            Criterion::Tag(name) => Some(name.as_str()),
            _ => None,
        };

        let mut entries: Vec<TimelineEntry> = candidates
            .iter()
            .filter_map(|note| self.build_entry(note, tag))
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            entries = entries.len(),
            "assembled timeline"
        );

        sort_entries(&mut entries);
        Ok(entries)
    }

    /// Entry for a note, or `None` when the note has no usable date
    pub fn build_entry(&self, note: &Note, tag: Option<&str>) -> Option<TimelineEntry> {
        let value = note.get(&self.settings.date_attribute)?;
        if value.is_null() {
            return None;
        }
        let Some(date) = frontmatter::parse_date(value) else {
            tracing::warn!(
                path = %note.path,
                attribute = %self.settings.date_attribute,
                "skipping note with unparsable date"
            );
            return None;
        };

        Some(TimelineEntry {
            date,
            title: note.basename.clone(),
            path: note.path.clone(),
            preview: preview(note, tag, self.settings.tag_match != TagMatchMode::Exact),
            is_milestone: is_milestone(&note.frontmatter, self.settings),
        })
    }
}

/// Preview text for a note.
///
/// With a tag, the first body line carrying that tag (up to 100 chars);
/// otherwise the start of the body (up to 50 chars).
pub fn preview(note: &Note, tag: Option<&str>, ignore_case: bool) -> String {
    if let Some(line) =
        tag.and_then(|tag| markdown::find_tag_line(&note.body, tag, ignore_case))
    {
        return util::truncate_chars(line, C::TAG_PREVIEW_LENGTH);
    }
    util::truncate_chars(note.body.trim(), C::BODY_PREVIEW_LENGTH)
}

/// Whether frontmatter marks a milestone under the configured attribute/value
pub fn is_milestone(fm: &Mapping, settings: &Settings) -> bool {
    if settings.milestone_attribute.is_empty() {
        return false;
    }
    match frontmatter::get(fm, &settings.milestone_attribute) {
        None | Some(serde_yaml::Value::Null) => false,
        Some(_) if settings.milestone_value.is_empty() => true,
        Some(value) => {
            frontmatter::to_plain_string(value).trim().to_lowercase()
                == settings.milestone_value.trim().to_lowercase()
        }
    }
}

/// Sort entries by date, most recent first
pub fn sort_entries(entries: &mut [TimelineEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn settings_with_milestone(value: &str) -> Settings {
        Settings {
            milestone_attribute: "status".to_string(),
            milestone_value: value.to_string(),
            ..Settings::default()
        }
    }

    fn fm(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_milestone() {
        let settings = settings_with_milestone("done");
        assert!(is_milestone(&fm("status: Done"), &settings));
        assert!(!is_milestone(&fm("status: pending"), &settings));
        assert!(!is_milestone(&fm("other: done"), &settings));
    }

    #[test]
    fn test_milestone_presence_only() {
        let settings = settings_with_milestone("");
        assert!(is_milestone(&fm("status: anything"), &settings));
        assert!(!is_milestone(&fm("status: ~"), &settings));
        assert!(!is_milestone(&fm("other: x"), &settings));
    }

    #[test]
    fn test_milestone_disabled() {
        let settings = Settings::default();
        assert!(!is_milestone(&fm("status: done"), &settings));
    }

    #[test]
    fn test_milestone_non_string_values() {
        let settings = settings_with_milestone("TRUE");
        assert!(is_milestone(&fm("status: true"), &settings));
        let settings = settings_with_milestone("1");
        assert!(is_milestone(&fm("status: 1"), &settings));
    }

    #[test]
    fn test_preview_with_tag() {
        let long_line = format!("#rust {}", "x".repeat(120));
        let note = Note::parse("a.md", &format!("intro\n{}\n", long_line));
        let preview = preview(&note, Some("rust"), false);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.starts_with("#rust xxx"));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_without_tag() {
        let note = Note::parse("a.md", "---\ncreated: 2024-01-01\n---\n\n  Short body  \n");
        assert_eq!(preview(&note, None, false), "Short body");

        let note = Note::parse("a.md", &"y".repeat(60));
        assert_eq!(preview(&note, None, false), format!("{}...", "y".repeat(50)));

        // Tag not present in body falls back to body start
        let note = Note::parse("a.md", "plain body");
        assert_eq!(preview(&note, Some("rust"), false), "plain body");
    }

    #[test]
    fn test_generate_drops_undated_and_sorts() {
        let vault = Vault::new(
            MemoryStorage::new()
                .with_file("n/old.md", "---\ncreated: 2020-05-01\n---\nold")
                .with_file("n/new.md", "---\ncreated: 2024-05-01\n---\nnew")
                .with_file("n/mid.md", "---\ncreated: 2022-05-01 10:00\n---\nmid")
                .with_file("n/none.md", "no frontmatter")
                .with_file("n/bad.md", "---\ncreated: someday\n---\nbad")
                .with_file("n/other.md", "---\ndate: 2021-01-01\n---\nother"),
        );
        let settings = Settings::default();
        let timeline = Timeline::new(&vault, &settings);
        let entries = timeline.generate(&Criterion::folder("n")).unwrap();

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
        assert!(entries.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_generate_custom_date_attribute() {
        let vault = Vault::new(
            MemoryStorage::new().with_file("n/other.md", "---\ndate: 2021-01-01\n---\nother"),
        );
        let settings = Settings { date_attribute: "date".to_string(), ..Settings::default() };
        let entries = Timeline::new(&vault, &settings).generate(&Criterion::folder("n")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "n/other.md");
    }

    #[test]
    fn test_generate_tag_preview() {
        let vault = Vault::new(MemoryStorage::new().with_file(
            "a.md",
            "---\ncreated: 2024-01-01\n---\nfirst line\nlearning #rust today\n",
        ));
        let settings = Settings::default();
        let entries = Timeline::new(&vault, &settings).generate(&Criterion::tag("#rust")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].preview, "learning #rust today");
    }

    #[test]
    fn test_generate_tag_preview_ignore_case() {
        let vault = Vault::new(MemoryStorage::new().with_file(
            "a.md",
            "---\ncreated: 2024-01-01\n---\nfirst line\nplanning #Project today\n",
        ));
        let settings = Settings { tag_match: TagMatchMode::IgnoreCase, ..Settings::default() };
        let entries = Timeline::new(&vault, &settings).generate(&Criterion::tag("project")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].preview, "planning #Project today");
    }
}
