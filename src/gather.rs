//! Candidate gathering: which notes a criterion selects

use std::collections::HashSet;
use std::io;

use crate::criterion::{Criterion, MetadataQuery};
use crate::markdown;
use crate::settings::Settings;
use crate::storage::Storage;
use crate::tags;
use crate::util;
use crate::vault::{Note, Vault};

/// Selects candidate notes for a criterion
pub struct Gatherer<'a, S: Storage> {
    vault: &'a Vault<S>,
    settings: &'a Settings,
}

impl<'a, S: Storage> Gatherer<'a, S> {
    pub fn new(vault: &'a Vault<S>, settings: &'a Settings) -> Self {
        Self { vault, settings }
    }

    /// Notes selected by `criterion`, never including the reserved output folder.
    ///
    /// Notes that fail to load are logged and skipped. Errors are returned
    /// only when the criterion itself is unusable (missing folder or source
    /// note).
    pub fn candidates(&self, criterion: &Criterion) -> io::Result<Vec<Note>> {
        match criterion {
            Criterion::Folder(path) => self.from_folder(path),
            Criterion::Tag(name) => self.from_tag(name),
            Criterion::Metadata(query) => self.from_metadata(query),
            Criterion::FileLinks(path) => self.from_file_links(path),
        }
    }

    fn from_folder(&self, path: &str) -> io::Result<Vec<Note>> {
        if util::is_excluded(path) {
            tracing::debug!(path = %path, "folder is the reserved output folder");
            return Ok(Vec::new());
        }
        if !self.vault.is_folder(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Folder not found: {}", path),
            ));
        }
        let files = self.vault.markdown_files(path)?;
        Ok(self.load_all(files))
    }

    fn from_tag(&self, name: &str) -> io::Result<Vec<Note>> {
        let name = tags::normalize_tag(name);
        let mode = self.settings.tag_match;
        let notes = self.load_all(self.vault.markdown_files("")?);

        Ok(notes
            .into_iter()
            .filter(|note| {
                note.inline_tags.iter().any(|tag| tags::tag_matches(tag, name, mode))
                    || note
                        .frontmatter_tags()
                        .iter()
                        .any(|tag| tags::tag_matches(tag, name, mode))
            })
            .collect())
    }

    fn from_metadata(&self, query: &MetadataQuery) -> io::Result<Vec<Note>> {
        let mode = self.settings.metadata_match;
        let notes = self.load_all(self.vault.markdown_files("")?);
        Ok(notes
            .into_iter()
            .filter(|note| query.matches(&note.frontmatter, mode))
            .collect())
    }

    fn from_file_links(&self, path: &str) -> io::Result<Vec<Note>> {
        let source = self.vault.load_note(path)?;
        let files = self.vault.markdown_files("")?;
        let mut seen = HashSet::new();
        let mut paths = Vec::new();

        for link in markdown::extract_wiki_links(&source.body) {
            match self.vault.resolve_link_among(&link.target, &source.path, &files) {
                Some(resolved) => {
                    if util::is_excluded(&resolved) {
                        continue;
                    }
                    if seen.insert(resolved.clone()) {
                        paths.push(resolved);
                    }
                }
                None => tracing::debug!(target = %link.target, "unresolved link"),
            }
        }

        Ok(self.load_all(paths))
    }

    /// Load notes, skipping (and logging) the ones that fail
    fn load_all(&self, paths: Vec<String>) -> Vec<Note> {
        paths
            .into_iter()
            .filter(|path| !util::is_excluded(path))
            .filter_map(|path| match self.vault.load_note(&path) {
                Ok(note) => Some(note),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "skipping unreadable note");
                    None
                }
            })
            .collect()
    }
}
