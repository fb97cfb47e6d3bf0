//! Generated timeline files under the reserved output folder

use std::io;

use serde::Serialize;

use crate::constants as C;
use crate::criterion::{Criterion, Provenance, SourceKind};
use crate::frontmatter;
use crate::render;
use crate::settings::Settings;
use crate::storage::Storage;
use crate::timeline::{Timeline, TimelineEntry};
use crate::util;
use crate::vault::Vault;

/// Base name used for a timeline of the whole vault
const ROOT_FOLDER_NAME: &str = "root";

/// Result of writing a timeline file
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedTimeline {
    /// Vault path of the written file
    pub path: String,
    pub title: String,
    pub entries: Vec<TimelineEntry>,
}

/// Display title for a criterion
pub fn title_for(criterion: &Criterion) -> String {
    match criterion {
        Criterion::Folder(path) if path.is_empty() => format!("{}/", C::TITLE_PREFIX),
        Criterion::Folder(path) => format!("{}{}", C::TITLE_PREFIX, path),
        Criterion::Tag(name) => format!("{}#{}", C::TITLE_PREFIX, name),
        Criterion::Metadata(query) => format!("{}{}", C::TITLE_PREFIX, query),
        Criterion::FileLinks(path) => {
            format!("{}{}", C::LINKS_TITLE_PREFIX, util::basename_of(path))
        }
    }
}

/// Vault path the timeline for `provenance` is written to.
///
/// Folder and tag values become nested folders below the output root with
/// the last segment as file name; file-links and metadata timelines get
/// their own subfolders. Prefix and suffix from the settings wrap the
/// file's base name.
pub fn output_path(provenance: &Provenance, settings: &Settings) -> String {
    let (folders, base) = match provenance.kind {
        SourceKind::Folder | SourceKind::Tag => {
            let value = match provenance.kind {
                SourceKind::Tag => provenance.value.replace('#', ""),
                _ => provenance.value.clone(),
            };
            let mut segments = path_segments(&value);
            let base = segments.pop().unwrap_or_else(|| ROOT_FOLDER_NAME.to_string());
            (segments, base)
        }
        SourceKind::File => (
            vec![C::LINKED_FILES_SUBDIR.to_string()],
            sanitize_segment(util::basename_of(&provenance.value)),
        ),
        SourceKind::Metadata => {
            let (key, value) = provenance
                .value
                .split_once(':')
                .unwrap_or((provenance.value.as_str(), ""));
            let (key, value) = (key.trim(), value.trim());
            let base = if value.is_empty() {
                sanitize_segment(key)
            } else {
                format!("{}-{}", sanitize_segment(key), sanitize_segment(value))
            };
            (vec![C::METADATA_SUBDIR.to_string()], base)
        }
    };

    let file_name = format!(
        "{}.{}",
        sanitize_segment(&format!(
            "{}{}{}",
            settings.file_name_prefix, base, settings.file_name_suffix
        )),
        C::MARKDOWN_EXTENSION
    );

    let mut parts = vec![C::OUTPUT_ROOT.to_string()];
    parts.extend(folders);
    parts.push(file_name);
    parts.join("/")
}

/// Split a value on `/` into usable path segments
fn path_segments(value: &str) -> Vec<String> {
    value
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(sanitize_segment)
        .collect()
}

/// Replace characters that cannot appear in one path segment
fn sanitize_segment(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c => c,
        })
        .collect()
}

/// Write a timeline file, replacing any existing file at `path`
pub fn write_timeline<S: Storage>(storage: &S, path: &str, content: &str) -> io::Result<()> {
    if storage.is_file(path) {
        tracing::debug!(path = %path, "replacing existing timeline");
        storage.remove(path)?;
    }
    storage.write(path, content)
}

/// Build, render and write the timeline for a criterion
pub fn generate_file<S: Storage>(
    vault: &Vault<S>,
    settings: &Settings,
    criterion: &Criterion,
) -> io::Result<GeneratedTimeline> {
    let entries = Timeline::new(vault, settings).generate(criterion)?;
    let title = title_for(criterion);
    let provenance = criterion.provenance();
    let content = render::render_markdown(&entries, &title, &provenance, settings.language)?;
    let path = output_path(&provenance, settings);

    write_timeline(vault.storage(), &path, &content)?;
    tracing::info!(path = %path, entries = entries.len(), "wrote timeline");

    Ok(GeneratedTimeline { path, title, entries })
}

/// Provenance of a generated timeline file.
///
/// Returns `Ok(None)` when the file is not a timeline this tool produced:
/// outside the output folder, not markdown, or without `generated_from`.
pub fn read_generated<S: Storage>(vault: &Vault<S>, path: &str) -> io::Result<Option<Provenance>> {
    let path = util::normalize_vault_path(path);
    if !util::is_excluded(&path) || !util::is_markdown(&path) {
        return Ok(None);
    }

    let content = vault.storage().read(&path)?;
    let fm = frontmatter::parse_frontmatter(&content);
    match frontmatter::get(&fm, C::GENERATED_FROM_KEY) {
        Some(serde_yaml::Value::String(value)) if !value.trim().is_empty() => {
            Provenance::parse(value).map(Some)
        }
        _ => Ok(None),
    }
}
