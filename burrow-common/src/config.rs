//! Configuration loading and root folder resolution
//!
//! Resolution priority for every setting, highest first:
//! 1. Command-line argument
//! 2. Environment variable (`BURROW_ROOT`, `BURROW_PORT`, `BURROW_UPLOAD_KEY`)
//! 3. TOML config file (`config.toml` in the platform config directory)
//! 4. Compiled platform default
//!
//! Missing configuration never aborts startup; the service degrades to
//! defaults with a warning.

use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default HTTP port when no tier provides one
pub const DEFAULT_PORT: u16 = 5780;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "burrow.db";

/// Optional overrides read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    pub root_folder: Option<PathBuf>,
    /// HTTP listen port
    pub port: Option<u16>,
    /// Shared upload key gating write endpoints
    pub upload_key: Option<String>,
    /// Family members allowed in person-scoped routes
    pub persons: Option<Vec<String>>,
}

impl TomlConfig {
    /// Load from the default platform location (`~/.config/burrow/config.toml`
    /// on Linux). A missing file is normal; unreadable or malformed TOML is
    /// logged and treated as absent.
    pub fn load() -> Self {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path (used by tests)
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Could not read {}: {} (using defaults)", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid TOML in {}: {} (using defaults)", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Effective service configuration after all tiers are merged
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Folder holding `burrow.db`
    pub root_folder: PathBuf,
    /// HTTP listen port
    pub port: u16,
    /// Upload key gating writes; `None` disables gating entirely
    pub upload_key: Option<String>,
    /// Known family members; empty list accepts any person
    pub persons: Vec<String>,
}

impl ServiceConfig {
    /// Merge command-line values, environment variables, the TOML config
    /// and compiled defaults into the effective configuration.
    pub fn resolve(
        cli_root: Option<&Path>,
        cli_port: Option<u16>,
        cli_upload_key: Option<&str>,
    ) -> Self {
        let toml_config = TomlConfig::load();
        Self::resolve_with(cli_root, cli_port, cli_upload_key, &toml_config)
    }

    /// Same as [`resolve`](Self::resolve) with an explicit TOML config
    /// (tests inject one instead of touching the platform config dir).
    pub fn resolve_with(
        cli_root: Option<&Path>,
        cli_port: Option<u16>,
        cli_upload_key: Option<&str>,
        toml_config: &TomlConfig,
    ) -> Self {
        let root_folder = cli_root
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("BURROW_ROOT").ok().map(PathBuf::from))
            .or_else(|| toml_config.root_folder.clone())
            .unwrap_or_else(default_root_folder);

        let port = cli_port
            .or_else(|| {
                std::env::var("BURROW_PORT")
                    .ok()
                    .and_then(|raw| raw.parse().ok())
            })
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        // An empty value in any tier means "not configured" for that tier,
        // so an empty env var cannot mask a key configured in the TOML file.
        let upload_key = cli_upload_key
            .map(str::to_string)
            .filter(|key| !key.is_empty())
            .or_else(|| {
                std::env::var("BURROW_UPLOAD_KEY")
                    .ok()
                    .filter(|key| !key.is_empty())
            })
            .or_else(|| {
                toml_config
                    .upload_key
                    .clone()
                    .filter(|key| !key.is_empty())
            });

        // The person allowlist has no CLI or env tier; a family roster
        // belongs in the config file.
        let persons = toml_config.persons.clone().unwrap_or_default();

        Self {
            root_folder,
            port,
            upload_key,
            persons,
        }
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("burrow").join("config.toml"))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/burrow
        dirs::data_local_dir()
            .map(|dir| dir.join("burrow"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/burrow"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/burrow
        dirs::data_dir()
            .map(|dir| dir.join("burrow"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/burrow"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\burrow
        dirs::data_local_dir()
            .map(|dir| dir.join("burrow"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\burrow"))
    } else {
        PathBuf::from("./burrow_data")
    }
}
