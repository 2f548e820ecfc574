// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ASHGAMES_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    /// The terminal UI owns the screen, so logs go to a file.
    File(PathBuf),
}

/// `ASHGAMES_LOG` wins over the configured level when it is set.
fn build_filter(from_env: Option<&str>, configured_level: &str) -> Result<EnvFilter> {
    let directives = from_env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(configured_level);
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))
}

pub fn init_tracing(configured_level: &str, destination: LogDestination) -> Result<()> {
    let from_env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(from_env.as_deref(), configured_level)?;
    let installed = match destination {
        LogDestination::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .try_init(),
        LogDestination::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn configured_level_must_parse() {
        assert!(build_filter(None, "debug").is_ok());
        assert!(build_filter(None, "ashgames_db=trace,warn").is_ok());
        assert!(build_filter(None, "ashgames=loud").is_err());
    }

    #[test]
    fn env_directives_override_config() {
        let filter = build_filter(Some("ashgames_db=debug"), "ashgames=loud");
        assert!(filter.is_ok());
        assert!(build_filter(Some("ashgames=loud"), "warn").is_err());
        assert!(build_filter(Some("  "), "warn").is_ok());
    }
}
