//! Vault and settings resolution
//!
//! The vault directory and the settings file are resolved by priority:
//! - vault: `--vault` > `EMX_TIMELINE_VAULT` > current directory
//! - settings: `--config` > `EMX_TIMELINE_CONFIG` > `<vault>/.emx-timeline.yaml`
//!   > `<user config dir>/emx-timeline/config.yaml` (first that exists)

use std::io;
use std::path::{Path, PathBuf};

use crate::constants as C;
use crate::settings::Settings;
use crate::storage::FsStorage;
use crate::vault::Vault;

/// Resolution context shared by all commands
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Vault root directory
    pub vault: PathBuf,
    /// Explicit settings file (`--config` or `EMX_TIMELINE_CONFIG`)
    pub config_override: Option<PathBuf>,
    /// Per-user settings file, if a config directory is known
    pub user_config: Option<PathBuf>,
    /// Whether to output in JSON format
    pub json: bool,
}

impl ResolveContext {
    /// Create a context from command-line values and the environment
    pub fn new(vault: Option<&Path>, config: Option<&Path>, json: bool) -> io::Result<Self> {
        // Treat empty strings as unset
        let env_vault = std::env::var(C::ENV_VAULT).ok().filter(|s| !s.is_empty());
        let env_config = std::env::var(C::ENV_CONFIG).ok().filter(|s| !s.is_empty());
        let cwd = std::env::current_dir()?;
        let user_config = dirs::config_dir()
            .map(|dir| dir.join(C::USER_CONFIG_DIR).join(C::USER_CONFIG_FILENAME));

        Ok(Self::from_sources(
            vault,
            env_vault.as_deref(),
            &cwd,
            config,
            env_config.as_deref(),
            user_config,
            json,
        ))
    }

    /// Build a context from already-collected sources
    pub fn from_sources(
        cli_vault: Option<&Path>,
        env_vault: Option<&str>,
        cwd: &Path,
        cli_config: Option<&Path>,
        env_config: Option<&str>,
        user_config: Option<PathBuf>,
        json: bool,
    ) -> Self {
        // Priority 1: --vault, 2: environment, 3: current directory
        let vault = match (cli_vault, env_vault) {
            (Some(path), _) => cwd.join(path),
            (None, Some(path)) => cwd.join(path),
            (None, None) => cwd.to_path_buf(),
        };
        let config_override = cli_config
            .map(|path| cwd.join(path))
            .or_else(|| env_config.map(|path| cwd.join(path)));

        Self { vault, config_override, user_config, json }
    }

    /// Settings file inside the vault
    pub fn vault_config(&self) -> PathBuf {
        self.vault.join(C::VAULT_CONFIG_FILENAME)
    }

    /// Settings file to read, if any exists.
    ///
    /// An explicit override is returned even when missing so that loading
    /// it falls back to defaults instead of silently using another file.
    pub fn settings_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_override {
            return Some(path.clone());
        }
        let vault_config = self.vault_config();
        if vault_config.is_file() {
            return Some(vault_config);
        }
        self.user_config.clone().filter(|path| path.is_file())
    }

    /// Settings file that `config set` and `config reset` write to
    pub fn settings_save_path(&self) -> PathBuf {
        self.settings_path().unwrap_or_else(|| self.vault_config())
    }

    /// Load settings, falling back to defaults when no file exists
    pub fn load_settings(&self) -> io::Result<Settings> {
        match self.settings_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Settings::load(&path)
            }
            None => {
                tracing::debug!("no settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Open the vault on disk
    pub fn open_vault(&self) -> io::Result<Vault<FsStorage>> {
        let root = dunce::canonicalize(&self.vault).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Cannot open vault {}: {}", self.vault.display(), e),
            )
        })?;
        Ok(Vault::new(FsStorage::new(root)?))
    }
}
