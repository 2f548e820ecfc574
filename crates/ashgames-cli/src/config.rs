// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use ashgames_app::SortMode;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_COPY_FEEDBACK_MS: u64 = 650;
const MAX_COPY_FEEDBACK_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
    pub key: Option<String>,
    pub max_value_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub default_sort: Option<String>,
    pub copy_feedback_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ASHGAMES_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("no config directory on this platform; set ASHGAMES_CONFIG_PATH")
        })?;
        Ok(config_root
            .join(ashgames_db::APP_NAME)
            .join("config.toml"))
    }

    /// Reads the config file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let Some(version) = value.get("version").and_then(toml::Value::as_integer) else {
            bail!(
                "config file {} has no `version`; add `version = {CONFIG_VERSION}` at the top",
                path.display()
            );
        };
        if version != CONFIG_VERSION {
            bail!(
                "config file {} declares version {version}, this build reads version {CONFIG_VERSION}",
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            ashgames_db::validate_db_path(db_path)?;
        }
        if let Some(key) = &self.storage.key
            && key.trim().is_empty()
        {
            bail!("storage.key must not be blank");
        }
        if let Some(max_size) = self.storage.max_value_size
            && max_size <= 0
        {
            bail!("storage.max_value_size must be positive, got {max_size}");
        }
        if let Some(sort) = &self.ui.default_sort
            && SortMode::parse(sort).is_none()
        {
            bail!(
                "ui.default_sort {sort:?} is not one of name-asc, name-desc, newest, oldest, none"
            );
        }
        if let Some(millis) = self.ui.copy_feedback_ms
            && !(1..=MAX_COPY_FEEDBACK_MS).contains(&millis)
        {
            bail!("ui.copy_feedback_ms must be between 1 and {MAX_COPY_FEEDBACK_MS}, got {millis}");
        }
        if let Some(level) = &self.logging.level {
            EnvFilter::try_new(level)
                .with_context(|| format!("logging.level {level:?} is not a valid filter"))?;
        }
        Ok(())
    }

    /// Config, then `ASHGAMES_DB_PATH`, then the platform data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => ashgames_db::default_db_path(),
        }
    }

    pub fn storage_key(&self) -> &str {
        self.storage
            .key
            .as_deref()
            .unwrap_or(ashgames_db::DEFAULT_STORAGE_KEY)
    }

    pub fn max_value_size(&self) -> i64 {
        self.storage
            .max_value_size
            .unwrap_or(ashgames_db::MAX_VALUE_SIZE)
    }

    pub fn default_sort(&self) -> SortMode {
        self.ui
            .default_sort
            .as_deref()
            .and_then(SortMode::parse)
            .unwrap_or_default()
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.ui.copy_feedback_ms.unwrap_or(DEFAULT_COPY_FEEDBACK_MS))
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => ashgames_db::default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# ashgames config\n# Place this file at: {}\n\nversion = {CONFIG_VERSION}\n\n[storage]\n# Optional. Default is the platform data dir (for example ~/.local/share/ashgames/ashgames.db)\n# db_path = \"/absolute/path/to/ashgames.db\"\nkey = \"{}\"\nmax_value_size = {}\n\n[ui]\n# name-asc, name-desc, newest, oldest, or none (insertion order)\ndefault_sort = \"name-asc\"\ncopy_feedback_ms = {DEFAULT_COPY_FEEDBACK_MS}\n\n[logging]\n# Any tracing filter; ASHGAMES_LOG overrides it.\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# file = \"/absolute/path/to/ashgames.log\"\n",
            path.display(),
            ashgames_db::DEFAULT_STORAGE_KEY,
            ashgames_db::MAX_VALUE_SIZE,
        )
    }
}
