// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use ashgames_app::{
    DEFAULT_EMOJI, FALLBACK_URL, GameEntry, GameId, LaunchTarget, MAX_CATEGORY_CHARS,
    MAX_EMOJI_CHARS, MAX_NAME_CHARS, SaveOutcome, UNSORTED_CATEGORY, sanitize_url,
    truncate_chars,
};
use serde_json::{Map, Value};

use crate::KeyValueStore;

/// The persisted catalog: one key holding a JSON array of entries.
pub struct EntryStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> EntryStore<K> {
    pub fn new(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Reads the catalog. Missing, unreadable or malformed data yields a
    /// copy of `defaults`; a well-formed array is revalidated entry by entry.
    pub fn load(&self, defaults: &[GameEntry], now_millis: i64) -> Vec<GameEntry> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                tracing::debug!(key = %self.key, "no stored catalog, using defaults");
                return defaults.to_vec();
            }
            Err(error) => {
                tracing::warn!(key = %self.key, error = %format!("{error:#}"), "catalog read failed, using defaults");
                return defaults.to_vec();
            }
        };

        parse_entries(&raw, now_millis).unwrap_or_else(|| {
            tracing::warn!(key = %self.key, "stored catalog is not a JSON array, using defaults");
            defaults.to_vec()
        })
    }

    pub fn save(&mut self, entries: &[GameEntry]) -> SaveOutcome {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(error) => return self.failed(format!("encode catalog: {error}")),
        };
        match self.kv.set(&self.key, &json) {
            Ok(()) => SaveOutcome::Saved,
            Err(error) => self.failed(format!("{error:#}")),
        }
    }

    /// Drops the stored catalog so the next load seeds defaults.
    pub fn clear(&mut self) -> SaveOutcome {
        match self.kv.remove(&self.key) {
            Ok(()) => SaveOutcome::Saved,
            Err(error) => self.failed(format!("{error:#}")),
        }
    }

    fn failed(&self, reason: String) -> SaveOutcome {
        tracing::warn!(key = %self.key, %reason, "catalog write failed");
        SaveOutcome::Failed(reason)
    }
}

/// Parses a stored catalog. `None` when the payload is not a JSON array.
pub fn parse_entries(raw: &str, now_millis: i64) -> Option<Vec<GameEntry>> {
    let value = serde_json::from_str::<Value>(raw).ok()?;
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| coerce_entry(item.as_object()?, now_millis))
            .collect(),
    )
}

fn coerce_entry(fields: &Map<String, Value>, now_millis: i64) -> Option<GameEntry> {
    let raw_url = fields.get("url")?.as_str()?;
    let name = fields.get("name")?.as_str()?;

    let id = match fields.get("id") {
        Some(Value::String(id)) => GameId::new(id.as_str()),
        Some(other) => {
            let id = GameId::generate();
            tracing::warn!(stored = %other, new_id = %id, "entry id is not a string; links to the old id will break");
            id
        }
        None => GameId::generate(),
    };

    let emoji = match non_empty_str(fields, "emoji") {
        Some(emoji) => truncate_chars(emoji, MAX_EMOJI_CHARS),
        None => DEFAULT_EMOJI.to_owned(),
    };

    let url = sanitize_url(raw_url).unwrap_or_else(|rejection| {
        tracing::debug!(url = raw_url, %rejection, "stored url replaced with placeholder");
        FALLBACK_URL.to_owned()
    });

    let category = match non_empty_str(fields, "category") {
        Some(category) => truncate_chars(category, MAX_CATEGORY_CHARS),
        None => UNSORTED_CATEGORY.to_owned(),
    };

    let created_at = fields
        .get("createdAt")
        .and_then(|value| {
            value
                .as_i64()
                .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
        })
        .unwrap_or(now_millis);

    let target = match fields.get("target").and_then(Value::as_str) {
        Some(tag) => LaunchTarget::from_tag(tag),
        None => LaunchTarget::NewView,
    };

    Some(GameEntry {
        id,
        name: truncate_chars(name, MAX_NAME_CHARS),
        emoji,
        url,
        category,
        created_at,
        target,
    })
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
