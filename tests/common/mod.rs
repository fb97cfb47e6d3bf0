//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Builder for on-disk test vaults
pub struct VaultBuilder {
    temp_dir: TempDir,
    home: TempDir,
}

impl VaultBuilder {
    /// Create an empty vault and an isolated home directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = TempDir::new().expect("Failed to create home dir");
        Self { temp_dir, home }
    }

    /// Vault root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a note (parent folders are created)
    pub fn with_note(self, path: &str, content: &str) -> Self {
        let full = self.temp_dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create note folder");
        }
        fs::write(full, content).expect("Failed to write note");
        self
    }

    /// Add a note with a `created` date and body
    pub fn with_dated_note(self, path: &str, created: &str, body: &str) -> Self {
        let content = format!("---\ncreated: {}\n---\n{}\n", created, body);
        self.with_note(path, &content)
    }

    /// Absolute path of a vault file
    pub fn file(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Read a vault file
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.file(path)).expect("Failed to read vault file")
    }

    /// Binary invocation bound to this vault, isolated from user settings
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_emx-timeline"));
        cmd.env_remove("EMX_TIMELINE_VAULT")
            .env_remove("EMX_TIMELINE_CONFIG")
            .env_remove("RUST_LOG")
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .arg("--vault")
            .arg(self.temp_dir.path());
        cmd
    }
}

/// Three journal notes across two years plus some unrelated notes
pub fn journal_vault() -> VaultBuilder {
    VaultBuilder::new()
        .with_dated_note("journal/start.md", "2023-01-05", "Kickoff #project/alpha")
        .with_dated_note("journal/summer.md", "2023-06-01", "Midyear review #project")
        .with_dated_note("journal/launch.md", "2024-02-10", "Launch day #release")
        .with_note("journal/undated.md", "No date here #project")
        .with_note(
            "people/alice.md",
            "---\ncreated: 2022-03-04\nauthor: Alice Smith\n---\nNotes by Alice\n",
        )
        .with_note("Index.md", "See [[start]] and [[launch]] and [[missing]].\n")
}
