// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use ashgames_app::{AppRuntime, GameEntry, LaunchTarget, SaveOutcome};
use ashgames_db::{EntryStore, KeyValueStore};

use crate::platform;

pub type CatalogStore = EntryStore<Box<dyn KeyValueStore>>;

/// Persists through the entry store and reaches the desktop through the
/// platform opener and clipboard tools.
pub struct CatalogRuntime {
    store: CatalogStore,
}

impl CatalogRuntime {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store_mut(&mut self) -> &mut CatalogStore {
        &mut self.store
    }
}

impl AppRuntime for CatalogRuntime {
    fn save_entries(&mut self, entries: &[GameEntry]) -> SaveOutcome {
        self.store.save(entries)
    }

    fn launch(&mut self, url: &str, target: LaunchTarget) -> Result<()> {
        platform::open_url(url, target)
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        platform::copy_to_clipboard(text)
    }

    fn write_clipboard_fallback(&mut self, text: &str) -> Result<()> {
        platform::copy_via_terminal(text)
    }
}
