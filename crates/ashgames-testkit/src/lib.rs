// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use ashgames_app::{AppRuntime, GameEntry, GameId, LaunchTarget, SaveOutcome};
use std::path::PathBuf;

const GAME_PREFIXES: [&str; 12] = [
    "Ash", "Neon", "Pixel", "Turbo", "Shadow", "Crystal", "Iron", "Sky", "Dungeon", "Star",
    "Hyper", "Moss",
];
const GAME_SUFFIXES: [&str; 10] = [
    "Dash", "Quest", "Runner", "Tactics", "Blocks", "Drift", "Siege", "Garden", "Heist", "Golf",
];
const CATEGORIES: [&str; 8] = [
    "Arcade",
    "Platformer",
    "Puzzle",
    "Racing",
    "Roguelike",
    "Sports",
    "Strategy",
    "",
];
const EMOJIS: [&str; 8] = ["🎮", "🌿", "🟧", "👾", "🏎", "🧩", "⚔", ""];
const HOSTS: [&str; 5] = [
    "netlify.app",
    "itch.io",
    "github.io",
    "vercel.app",
    "pages.dev",
];

/// Epoch milliseconds used as "now" by deterministic fixtures.
pub const REFERENCE_NOW_MILLIS: i64 = 1_771_500_000_000;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible catalog entries. Same seed, same catalog.
#[derive(Debug, Clone)]
pub struct GameFaker {
    rng: DeterministicRng,
    counter: u64,
}

impl GameFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            counter: 0,
        }
    }

    pub fn entry(&mut self) -> GameEntry {
        self.counter += 1;
        let name = format!(
            "{}{}",
            self.pick(&GAME_PREFIXES),
            self.pick(&GAME_SUFFIXES)
        );
        let host = self.pick(&HOSTS);
        let url = format!("https://{}.{host}/", name.to_lowercase());
        let age_minutes = self.rng.int_n(60 * 24 * 90) as i64;
        let target = if self.rng.bool() {
            LaunchTarget::NewView
        } else {
            LaunchTarget::SelfView
        };

        GameEntry {
            id: GameId::new(format!("fixture-{:04}-{:x}", self.counter, self.rng.next_u64())),
            name,
            emoji: self.pick(&EMOJIS).to_owned(),
            url,
            category: self.pick(&CATEGORIES).to_owned(),
            created_at: REFERENCE_NOW_MILLIS - age_minutes * 60_000,
            target,
        }
    }

    pub fn entries(&mut self, count: usize) -> Vec<GameEntry> {
        (0..count).map(|_| self.entry()).collect()
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn entry(id: &str, name: &str, category: &str, created_at: i64) -> GameEntry {
    GameEntry {
        id: GameId::new(id),
        name: name.to_owned(),
        emoji: "🎮".to_owned(),
        url: format!("https://{}.example.com/", name.to_lowercase()),
        category: category.to_owned(),
        created_at,
        target: LaunchTarget::NewView,
    }
}

/// The two-entry catalog most behavior tests start from.
pub fn avz_and_ashdash() -> Vec<GameEntry> {
    vec![
        GameEntry {
            url: "https://avza.netlify.app/".to_owned(),
            emoji: "🌿".to_owned(),
            ..entry("avz", "AvZ", "Strategy", REFERENCE_NOW_MILLIS - 172_800_000)
        },
        GameEntry {
            url: "https://ashdash.netlify.app/".to_owned(),
            emoji: "🟧".to_owned(),
            ..entry(
                "ashdash",
                "AshDash",
                "Platformer",
                REFERENCE_NOW_MILLIS - 86_400_000,
            )
        },
    ]
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("ashgames.db");
    Ok((dir, db_path))
}

/// Runtime that records every side effect instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    pub saved: Vec<Vec<GameEntry>>,
    pub launches: Vec<(String, LaunchTarget)>,
    pub clipboard: Vec<String>,
    pub fallback_clipboard: Vec<String>,
    pub fail_saves: bool,
    pub fail_launches: bool,
    pub deny_clipboard: bool,
}

impl AppRuntime for RecordingRuntime {
    fn save_entries(&mut self, entries: &[GameEntry]) -> SaveOutcome {
        if self.fail_saves {
            return SaveOutcome::Failed("storage quota exceeded".to_owned());
        }
        self.saved.push(entries.to_vec());
        SaveOutcome::Saved
    }

    fn launch(&mut self, url: &str, target: LaunchTarget) -> Result<()> {
        if self.fail_launches {
            bail!("no browser available");
        }
        self.launches.push((url.to_owned(), target));
        Ok(())
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        if self.deny_clipboard {
            bail!("clipboard access denied");
        }
        self.clipboard.push(text.to_owned());
        Ok(())
    }

    fn write_clipboard_fallback(&mut self, text: &str) -> Result<()> {
        self.fallback_clipboard.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GameFaker, avz_and_ashdash};
    use ashgames_app::sanitize_url;

    #[test]
    fn faker_is_deterministic_per_seed() {
        let first = GameFaker::new(7).entries(5);
        let second = GameFaker::new(7).entries(5);
        assert_eq!(first, second);
        assert_ne!(first, GameFaker::new(8).entries(5));
    }

    #[test]
    fn faker_urls_are_already_normalized() {
        for entry in GameFaker::new(3).entries(20) {
            assert_eq!(sanitize_url(&entry.url).as_deref(), Ok(entry.url.as_str()));
        }
    }

    #[test]
    fn fixture_ids_are_unique() {
        let entries = GameFaker::new(11).entries(50);
        let mut ids = entries.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert_eq!(avz_and_ashdash().len(), 2);
    }
}
