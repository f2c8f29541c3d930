//! Service configuration.
//!
//! Resolution order: built-in defaults, then the YAML config file, then the
//! environment (`DATABASE_URL`, `CLERK_SECRET_KEY`, `CLERK_PUBLISHABLE_KEY`,
//! `CLERK_API_URL`, `RTIMESHEET_BIND`, `RUST_LOG`, `RTIMESHEET_LOG_JSON`), then
//! CLI flags.

use crate::auth::clerk::DEFAULT_API_URL;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Set only by the config file, `DATABASE_URL` or `--db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_api_url")]
    pub clerk_api_url: String,
    #[serde(default)]
    pub clerk_secret_key: Option<String>,
    #[serde(default)]
    pub clerk_publishable_key: Option<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub log_json: bool,
}

/// Values `serve` cannot start without.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database: String,
    pub bind: String,
    pub clerk_api_url: String,
    pub clerk_secret_key: String,
    pub clerk_publishable_key: String,
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            bind: default_bind(),
            clerk_api_url: default_api_url(),
            clerk_secret_key: None,
            clerk_publishable_key: None,
            log_filter: default_log_filter(),
            log_json: false,
        }
    }
}

/// Accept `sqlite://path`, `sqlite:path` or a plain file path.
pub fn normalize_database_url(url: &str) -> String {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
        .to_string()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Return the configuration directory: `$RTIMESHEET_CONFIG_DIR` when set,
    /// otherwise the platform default.
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = non_empty(env::var("RTIMESHEET_CONFIG_DIR").ok()) {
            return PathBuf::from(dir);
        }
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rtimesheet")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtimesheet")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimesheet.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimesheet.sqlite")
    }

    /// Load the config file (defaults when missing) and apply the environment.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;
        cfg.apply_env_from(|k| env::var(k).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn apply_env_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = non_empty(get("DATABASE_URL")) {
            self.database = Some(normalize_database_url(&url));
        }
        if let Some(v) = non_empty(get("CLERK_SECRET_KEY")) {
            self.clerk_secret_key = Some(v);
        }
        if let Some(v) = non_empty(get("CLERK_PUBLISHABLE_KEY")) {
            self.clerk_publishable_key = Some(v);
        }
        if let Some(v) = non_empty(get("CLERK_API_URL")) {
            self.clerk_api_url = v;
        }
        if let Some(v) = non_empty(get("RTIMESHEET_BIND")) {
            self.bind = v;
        }
        if let Some(v) = non_empty(get("RUST_LOG")) {
            self.log_filter = v;
        }
        if let Some(v) = non_empty(get("RTIMESHEET_LOG_JSON")) {
            self.log_json = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Database for operator commands: the configured one, else the default
    /// file in the config directory.
    pub fn database_path(&self) -> String {
        non_empty(self.database.clone())
            .unwrap_or_else(|| Self::database_file().to_string_lossy().to_string())
    }

    /// Check that everything the HTTP service needs is present.
    pub fn require_server_settings(&self) -> AppResult<ServerSettings> {
        let missing = |name: &str| AppError::Config(format!("{name} is required"));

        let database = non_empty(self.database.clone()).ok_or_else(|| missing("DATABASE_URL"))?;
        let secret = non_empty(self.clerk_secret_key.clone()).ok_or_else(|| missing("CLERK_SECRET_KEY"))?;
        let publishable = non_empty(self.clerk_publishable_key.clone())
            .ok_or_else(|| missing("CLERK_PUBLISHABLE_KEY"))?;

        Ok(ServerSettings {
            database,
            bind: self.bind.clone(),
            clerk_api_url: self.clerk_api_url.clone(),
            clerk_secret_key: secret,
            clerk_publishable_key: publishable,
        })
    }

    /// Copy safe to print: secret values are masked.
    pub fn masked(&self) -> Self {
        let mask = |v: &Option<String>| {
            v.as_ref().map(|s| {
                let head: String = s.chars().take(8).collect();
                format!("{head}…")
            })
        };
        Self {
            clerk_secret_key: mask(&self.clerk_secret_key),
            ..self.clone()
        }
    }

    /// `--db` value as a path: URLs are normalized, relative names live in
    /// the config directory.
    pub fn resolve_database(custom: &str) -> PathBuf {
        let p = PathBuf::from(normalize_database_url(custom));
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database files. Returns the database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        fs::create_dir_all(Self::config_dir())?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_database(&name),
            None => Self::database_file(),
        };

        if !is_test {
            let mut config = Self::load_from(&Self::config_file())?;
            config.database = Some(db_path.to_string_lossy().to_string());
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}
