// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod entries;
mod kv;

pub use entries::{EntryStore, parse_entries};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "ashgames";
pub const DEFAULT_STORAGE_KEY: &str = "ashgames_v1";
pub const MAX_VALUE_SIZE: i64 = 5 << 20;

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("ASHGAMES_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set ASHGAMES_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("ashgames.db"))
}

pub fn default_log_path() -> Result<PathBuf> {
    let state_root = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| anyhow!("cannot resolve a directory for the log file"))?;
    let app_dir = state_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create log directory {}", app_dir.display()))?;
    Ok(app_dir.join("ashgames.log"))
}

/// Rejects storage locations SQLite would interpret as URIs. The catalog
/// only ever lives in a plain file.
pub fn validate_db_path(path: &str) -> Result<()> {
    match path {
        "" => bail!("storage path is empty; set [storage].db_path or ASHGAMES_DB_PATH"),
        ":memory:" => return Ok(()),
        _ => {}
    }

    let uri_scheme = path
        .split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty() && scheme.chars().all(char::is_alphabetic));
    if let Some(scheme) = uri_scheme {
        bail!("storage path {path:?} is a {scheme}:// URI, expected a file path");
    }
    if path.starts_with("file:") || path.contains('?') {
        bail!("storage path {path:?} carries URI syntax, expected a file path");
    }
    Ok(())
}
