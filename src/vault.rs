//! Vault - notes on top of a [`Storage`]
//!
//! Provides note loading (frontmatter, body, inline tags), recursive
//! markdown listing, wiki-link resolution, and the tag/folder listings the
//! CLI offers as suggestions.

use std::collections::BTreeSet;
use std::io;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::constants as C;
use crate::frontmatter;
use crate::markdown;
use crate::storage::{Storage, VaultEntry};
use crate::tags;
use crate::util;

/// A markdown note, parsed on load
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    /// Vault-relative path, e.g. `journal/day.md`
    pub path: String,
    /// File name without extension
    pub basename: String,
    /// Parsed frontmatter (empty when absent or malformed)
    pub frontmatter: Mapping,
    /// Content without the frontmatter block
    pub body: String,
    /// Inline `#tags` from the body, without `#`
    pub inline_tags: Vec<String>,
}

impl Note {
    /// Parse a note from its path and raw content
    pub fn parse(path: &str, content: &str) -> Self {
        let body = frontmatter::strip_frontmatter(content).to_string();
        let inline_tags = markdown::extract_inline_tags(&body);
        Self {
            path: path.to_string(),
            basename: util::basename_of(path).to_string(),
            frontmatter: frontmatter::parse_frontmatter(content),
            body,
            inline_tags,
        }
    }

    /// Frontmatter value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        frontmatter::get(&self.frontmatter, key)
    }

    /// Tags declared in frontmatter (`tags` or `tag`), normalized
    pub fn frontmatter_tags(&self) -> Vec<String> {
        C::FRONTMATTER_TAG_KEYS
            .iter()
            .filter_map(|key| self.get(key))
            .flat_map(tags::frontmatter_tag_list)
            .collect()
    }

    /// Inline and frontmatter tags, deduplicated
    pub fn all_tags(&self) -> Vec<String> {
        let mut all = self.inline_tags.clone();
        for tag in self.frontmatter_tags() {
            if !all.contains(&tag) {
                all.push(tag);
            }
        }
        all
    }

    /// Parent folder of the note ("" for the vault root)
    pub fn folder(&self) -> &str {
        util::parent_of(&self.path)
    }
}

/// A vault of notes backed by some storage
#[derive(Debug)]
pub struct Vault<S: Storage> {
    storage: S,
}

impl<S: Storage> Vault<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read and parse a note
    pub fn load_note(&self, path: &str) -> io::Result<Note> {
        let path = util::normalize_vault_path(path);
        let content = self.storage.read(&path)?;
        Ok(Note::parse(&path, &content))
    }

    /// Whether `path` is an existing folder
    pub fn is_folder(&self, path: &str) -> bool {
        self.storage.is_dir(&util::normalize_vault_path(path))
    }

    /// Whether `path` is an existing file
    pub fn is_file(&self, path: &str) -> bool {
        self.storage.is_file(&util::normalize_vault_path(path))
    }

    /// Every markdown file below `dir`, recursively, sorted by path.
    ///
    /// Hidden entries (starting with `.`) and the reserved output folder are
    /// skipped at every level.
    pub fn markdown_files(&self, dir: &str) -> io::Result<Vec<String>> {
        let dir = util::normalize_vault_path(dir);
        let mut files = Vec::new();
        if util::is_excluded(&dir) {
            return Ok(files);
        }
        self.walk(&dir, &mut |entry| {
            if let VaultEntry::File(path) = entry {
                if util::is_markdown(path) {
                    files.push(path.clone());
                }
            }
        })?;
        files.sort();
        Ok(files)
    }

    /// Every folder in the vault except hidden and reserved ones, sorted
    pub fn folders(&self) -> io::Result<Vec<String>> {
        let mut folders = Vec::new();
        self.walk("", &mut |entry| {
            if let VaultEntry::Directory(path) = entry {
                folders.push(path.clone());
            }
        })?;
        folders.sort();
        Ok(folders)
    }

    /// Every tag used in the vault (inline or frontmatter), sorted.
    ///
    /// Notes that cannot be read are skipped with a warning.
    pub fn tags(&self) -> io::Result<Vec<String>> {
        let mut all = BTreeSet::new();
        for path in self.markdown_files("")? {
            match self.load_note(&path) {
                Ok(note) => all.extend(note.all_tags()),
                Err(e) => tracing::warn!(path = %path, error = %e, "skipping unreadable note"),
            }
        }
        Ok(all.into_iter().collect())
    }

    /// Depth-first walk, visiting each non-hidden, non-reserved entry
    fn walk(&self, dir: &str, visit: &mut dyn FnMut(&VaultEntry)) -> io::Result<()> {
        for entry in self.storage.list(dir)? {
            let path = entry.path();
            if util::file_name_of(path).starts_with('.') || util::is_excluded(path) {
                continue;
            }
            visit(&entry);
            if let VaultEntry::Directory(sub) = &entry {
                match self.walk(sub, visit) {
                    Ok(()) => {}
                    Err(e) => tracing::warn!(path = %sub, error = %e, "skipping unreadable folder"),
                }
            }
        }
        Ok(())
    }

    /// Resolve a wiki-link target to a note path.
    ///
    /// Tried in order:
    /// 1. exact vault path, with or without `.md`
    /// 2. path relative to the folder of `source`
    /// 3. notes whose path ends with the target (basename or partial path),
    ///    preferring the source's folder, then the shortest path, then
    ///    alphabetical order
    ///
    /// The vault is only walked when the first two steps miss.
    pub fn resolve_link(&self, target: &str, source: &str) -> io::Result<Option<String>> {
        let Some(target) = LinkTarget::new(target) else {
            return Ok(None);
        };
        if let Some(path) = self.resolve_by_path(&target, source) {
            return Ok(Some(path));
        }
        let files = self.markdown_files("")?;
        Ok(target.best_suffix_match(source, &files))
    }

    /// Like [`Vault::resolve_link`], with step 3 searching `files` instead
    /// of walking the vault. Use when resolving many links at once.
    pub fn resolve_link_among(&self, target: &str, source: &str, files: &[String]) -> Option<String> {
        let target = LinkTarget::new(target)?;
        self.resolve_by_path(&target, source)
            .or_else(|| target.best_suffix_match(source, files))
    }

    fn resolve_by_path(&self, target: &LinkTarget, source: &str) -> Option<String> {
        for candidate in [&target.with_ext, &target.path] {
            if self.storage.is_file(candidate) && util::is_markdown(candidate) {
                return Some(candidate.clone());
            }
        }

        let source_folder = util::parent_of(source);
        if !source_folder.is_empty() {
            let relative =
                util::normalize_vault_path(&util::join_vault_path(source_folder, &target.with_ext));
            if self.storage.is_file(&relative) {
                return Some(relative);
            }
        }
        None
    }
}

/// Normalized wiki-link target
struct LinkTarget {
    path: String,
    with_ext: String,
}

impl LinkTarget {
    fn new(target: &str) -> Option<Self> {
        let path = util::normalize_vault_path(target);
        if path.is_empty() {
            return None;
        }
        let with_ext = if util::is_markdown(&path) {
            path.clone()
        } else {
            format!("{}.{}", path, C::MARKDOWN_EXTENSION)
        };
        Some(Self { path, with_ext })
    }

    fn best_suffix_match(&self, source: &str, files: &[String]) -> Option<String> {
        let source_folder = util::parent_of(source);
        let suffix = format!("/{}", self.with_ext.to_lowercase());
        let plain = self.with_ext.to_lowercase();

        files
            .iter()
            .filter(|path| {
                let lower = path.to_lowercase();
                lower == plain || lower.ends_with(&suffix)
            })
            .min_by(|a, b| {
                let a_local = util::parent_of(a) == source_folder;
                let b_local = util::parent_of(b) == source_folder;
                b_local
                    .cmp(&a_local)
                    .then(a.len().cmp(&b.len()))
                    .then(a.cmp(b))
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn vault() -> Vault<MemoryStorage> {
        Vault::new(
            MemoryStorage::new()
                .with_file("index.md", "[[Alpha]] [[beta]] [[journal/day]] [[Missing]]")
                .with_file("projects/Alpha.md", "---\ntags: [work]\n---\n#alpha/one body")
                .with_file("projects/beta.md", "---\ntags: \"- x\\n- y\"\n---\nbody")
                .with_file("archive/beta.md", "old")
                .with_file("journal/day.md", "---\ncreated: 2024-01-01\n---\nhello")
                .with_file("journal/picture.png", "")
                .with_file(".obsidian/app.md", "#hidden")
                .with_file("timelines/work.md", "#generated"),
        )
    }

    #[test]
    fn test_note_parse() {
        let note = Note::parse("projects/Alpha.md", "---\ntags: [work]\n---\n#alpha/one body");
        assert_eq!(note.basename, "Alpha");
        assert_eq!(note.folder(), "projects");
        assert_eq!(note.body, "#alpha/one body");
        assert_eq!(note.inline_tags, vec!["alpha/one".to_string()]);
        assert_eq!(note.frontmatter_tags(), vec!["work".to_string()]);
        assert_eq!(note.all_tags(), vec!["alpha/one".to_string(), "work".to_string()]);
    }

    #[test]
    fn test_markdown_files_skips_hidden_and_reserved() {
        let files = vault().markdown_files("").unwrap();
        assert_eq!(
            files,
            vec![
                "archive/beta.md",
                "index.md",
                "journal/day.md",
                "projects/Alpha.md",
                "projects/beta.md",
            ]
        );
        assert!(vault().markdown_files("timelines").unwrap().is_empty());
    }

    #[test]
    fn test_folders() {
        let folders = vault().folders().unwrap();
        assert_eq!(folders, vec!["archive", "journal", "projects"]);
    }

    #[test]
    fn test_tags() {
        let tags = vault().tags().unwrap();
        assert_eq!(tags, vec!["alpha/one", "work", "x", "y"]);
    }

    #[test]
    fn test_resolve_link() {
        let vault = vault();
        assert_eq!(
            vault.resolve_link("journal/day", "index.md").unwrap(),
            Some("journal/day.md".to_string())
        );
        assert_eq!(
            vault.resolve_link("Alpha", "index.md").unwrap(),
            Some("projects/Alpha.md".to_string())
        );
        assert_eq!(vault.resolve_link("Missing", "index.md").unwrap(), None);
    }

    #[test]
    fn test_resolve_link_among_listed_files() {
        let vault = vault();
        let files = vault.markdown_files("").unwrap();
        for target in ["journal/day", "Alpha", "beta", "Missing"] {
            assert_eq!(
                vault.resolve_link_among(target, "index.md", &files),
                vault.resolve_link(target, "index.md").unwrap()
            );
        }

        // Suffix matches only come from the given list
        assert_eq!(vault.resolve_link_among("Alpha", "index.md", &[]), None);
        assert_eq!(
            vault.resolve_link_among("journal/day", "index.md", &[]),
            Some("journal/day.md".to_string())
        );
    }

    #[test]
    fn test_resolve_link_prefers_source_folder() {
        let vault = vault();
        assert_eq!(
            vault.resolve_link("beta", "archive/index.md").unwrap(),
            Some("archive/beta.md".to_string())
        );
        assert_eq!(
            vault.resolve_link("beta", "projects/x.md").unwrap(),
            Some("projects/beta.md".to_string())
        );
        // No local candidate: shortest path wins
        assert_eq!(
            vault.resolve_link("beta", "index.md").unwrap(),
            Some("archive/beta.md".to_string())
        );
    }
}
