//! Vault storage abstraction
//!
//! The timeline logic never touches the file system directly. It talks to a
//! [`Storage`] that lists folders as [`VaultEntry`] values and reads/writes
//! notes by vault-relative path (always `/`-separated, no leading slash).
//!
//! - [`FsStorage`]: a directory on disk
//! - [`MemoryStorage`]: an in-memory map, used by tests and for dry runs

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::util;

/// A child of a vault folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEntry {
    /// A file, by vault path
    File(String),
    /// A folder, by vault path
    Directory(String),
}

impl VaultEntry {
    /// Vault path of the entry
    pub fn path(&self) -> &str {
        match self {
            VaultEntry::File(path) | VaultEntry::Directory(path) => path,
        }
    }
}

/// Read/write access to the files of a vault
pub trait Storage {
    /// List the direct children of a folder ("" is the vault root), sorted by path
    fn list(&self, dir: &str) -> io::Result<Vec<VaultEntry>>;

    /// Read a file as UTF-8 text
    fn read(&self, path: &str) -> io::Result<String>;

    /// Create or replace a file, creating parent folders as needed
    fn write(&self, path: &str, content: &str) -> io::Result<()>;

    /// Delete a file
    fn remove(&self, path: &str) -> io::Result<()>;

    /// Whether a file exists at `path`
    fn is_file(&self, path: &str) -> bool;

    /// Whether a folder exists at `path` ("" always exists)
    fn is_dir(&self, path: &str) -> bool;
}

// === FsStorage ===

/// Storage backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Open a vault rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Vault directory does not exist: {}", util::display_path(&root)),
            ));
        }
        Ok(Self { root })
    }

    /// Vault root on disk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault path to a location on disk
    pub fn full_path(&self, path: &str) -> io::Result<PathBuf> {
        util::secure_path(&self.root, path)
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &str) -> io::Result<Vec<VaultEntry>> {
        let dir = util::normalize_vault_path(dir);
        let full = self.full_path(&dir)?;
        let mut entries = Vec::new();

        for entry in fs::read_dir(&full)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    tracing::warn!(name = ?name, "skipping non UTF-8 file name");
                    continue;
                }
            };
            let path = util::join_vault_path(&dir, &name);
            if entry.file_type()?.is_dir() || entry.path().is_dir() {
                entries.push(VaultEntry::Directory(path));
            } else {
                entries.push(VaultEntry::File(path));
            }
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(entries)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.full_path(path)?)
    }

    fn write(&self, path: &str, content: &str) -> io::Result<()> {
        let full = self.full_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.full_path(path)?)
    }

    fn is_file(&self, path: &str) -> bool {
        self.full_path(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.full_path(path).map(|p| p.is_dir()).unwrap_or(false)
    }
}

// === MemoryStorage ===

/// Storage holding files in memory; folders are implied by file paths
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    /// Insert or replace a file
    pub fn insert(&self, path: &str, content: &str) {
        let path = util::normalize_vault_path(path);
        if let Ok(mut files) = self.files.write() {
            files.insert(path, content.to_string());
        }
    }

    /// All file paths, sorted
    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn poisoned() -> io::Error {
        io::Error::other("memory storage lock poisoned")
    }
}

impl Storage for MemoryStorage {
    fn list(&self, dir: &str) -> io::Result<Vec<VaultEntry>> {
        let dir = util::normalize_vault_path(dir);
        if !self.is_dir(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Folder not found: {}", dir),
            ));
        }

        let prefix = if dir.is_empty() { String::new() } else { format!("{}/", dir) };
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        let mut entries = Vec::new();

        for path in files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            let entry = match rest.split_once('/') {
                Some((child, _)) => VaultEntry::Directory(util::join_vault_path(&dir, child)),
                None => VaultEntry::File(path.clone()),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(entries)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        let path = util::normalize_vault_path(path);
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files.get(&path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("File not found: {}", path))
        })
    }

    fn write(&self, path: &str, content: &str) -> io::Result<()> {
        let path = util::normalize_vault_path(path);
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path, content.to_string());
        Ok(())
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        let path = util::normalize_vault_path(path);
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.remove(&path).map(|_| ()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("File not found: {}", path))
        })
    }

    fn is_file(&self, path: &str) -> bool {
        let path = util::normalize_vault_path(path);
        self.files.read().map(|files| files.contains_key(&path)).unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        let path = util::normalize_vault_path(path);
        if path.is_empty() {
            return true;
        }
        let prefix = format!("{}/", path);
        self.files
            .read()
            .map(|files| files.keys().any(|p| p.starts_with(&prefix)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_list_root() {
        let storage = MemoryStorage::new()
            .with_file("a.md", "")
            .with_file("journal/b.md", "")
            .with_file("journal/2024/c.md", "");

        let entries = storage.list("").unwrap();
        assert_eq!(
            entries,
            vec![
                VaultEntry::File("a.md".to_string()),
                VaultEntry::Directory("journal".to_string()),
            ]
        );

        let entries = storage.list("journal").unwrap();
        assert_eq!(
            entries,
            vec![
                VaultEntry::Directory("journal/2024".to_string()),
                VaultEntry::File("journal/b.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_memory_missing_folder() {
        let storage = MemoryStorage::new().with_file("a.md", "");
        let err = storage.list("nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_write_remove() {
        let storage = MemoryStorage::new();
        storage.write("timelines/x.md", "hi").unwrap();
        assert!(storage.is_file("timelines/x.md"));
        assert!(storage.is_dir("timelines"));
        assert_eq!(storage.read("timelines/x.md").unwrap(), "hi");
        storage.remove("timelines/x.md").unwrap();
        assert!(!storage.is_file("timelines/x.md"));
        assert!(storage.remove("timelines/x.md").is_err());
    }

    #[test]
    fn test_fs_storage_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path()).unwrap();
        storage.write("journal/day.md", "content").unwrap();

        assert!(storage.is_dir("journal"));
        assert!(storage.is_file("journal/day.md"));
        assert_eq!(storage.read("journal/day.md").unwrap(), "content");
        assert_eq!(
            storage.list("").unwrap(),
            vec![VaultEntry::Directory("journal".to_string())]
        );
        assert!(storage.read("../outside.md").is_err());
    }
}
