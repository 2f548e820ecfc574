// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{AppCommand, AppEvent, CatalogState, GameEntry, GameId, LaunchTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

impl SaveOutcome {
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Clipboard,
    Fallback,
}

/// Side effects the catalog needs from its host: persistence, navigation,
/// and clipboard access.
pub trait AppRuntime {
    /// Best-effort write of the full list. Never panics or errors; the
    /// outcome is informational.
    fn save_entries(&mut self, entries: &[GameEntry]) -> SaveOutcome;
    fn launch(&mut self, url: &str, target: LaunchTarget) -> Result<()>;
    fn write_clipboard(&mut self, text: &str) -> Result<()>;
    fn write_clipboard_fallback(&mut self, text: &str) -> Result<()>;
}

/// Owns the catalog state and the runtime; every mutation goes through
/// [`Controller::dispatch`].
pub struct Controller<R> {
    state: CatalogState,
    runtime: R,
}

impl<R: AppRuntime> Controller<R> {
    pub fn new(state: CatalogState, runtime: R) -> Self {
        Self { state, runtime }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        tracing::debug!(?command, "dispatch");
        let mut events = self.state.dispatch(command);
        let mut effects = Vec::new();

        if events.iter().any(AppEvent::mutates_entries) {
            let outcome = self.runtime.save_entries(&self.state.entries);
            if let SaveOutcome::Failed(reason) = &outcome {
                tracing::warn!(%reason, "catalog kept in memory only");
            }
            effects.push(AppEvent::Persisted(outcome));
        }

        for event in &events {
            match event {
                AppEvent::LaunchRequested { url, target } => {
                    effects.push(self.launch(url, *target));
                }
                AppEvent::CopyRequested { id, url } => {
                    effects.extend(self.copy_link(id, url));
                }
                _ => {}
            }
        }

        events.extend(effects);
        events
    }

    fn launch(&mut self, url: &str, target: LaunchTarget) -> AppEvent {
        match self.runtime.launch(url, target) {
            Ok(()) => AppEvent::Launched {
                url: url.to_owned(),
                target,
            },
            Err(error) => {
                tracing::warn!(url, error = %format!("{error:#}"), "launch failed");
                AppEvent::LaunchFailed(format!("{error:#}"))
            }
        }
    }

    // The confirmation is emitted either way. A failed fallback also emits
    // `CopyFailed` first so hosts without a confirmation label can report it.
    fn copy_link(&mut self, id: &GameId, url: &str) -> Vec<AppEvent> {
        let copied = |method| AppEvent::LinkCopied {
            id: id.clone(),
            method,
        };
        let Err(error) = self.runtime.write_clipboard(url) else {
            return vec![copied(CopyMethod::Clipboard)];
        };
        tracing::debug!(error = %format!("{error:#}"), "clipboard unavailable, using fallback");

        match self.runtime.write_clipboard_fallback(url) {
            Ok(()) => vec![copied(CopyMethod::Fallback)],
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "clipboard fallback failed");
                vec![
                    AppEvent::CopyFailed(format!("{error:#}")),
                    copied(CopyMethod::Fallback),
                ]
            }
        }
    }
}
