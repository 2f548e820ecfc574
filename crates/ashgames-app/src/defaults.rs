// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{GameEntry, GameId, LaunchTarget};

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

struct BuiltinGame {
    name: &'static str,
    emoji: &'static str,
    url: &'static str,
    category: &'static str,
    age_days: i64,
}

const BUILTIN_GAMES: [BuiltinGame; 2] = [
    BuiltinGame {
        name: "AvZ",
        emoji: "🌿",
        url: "https://avza.netlify.app/",
        category: "Strategy",
        age_days: 2,
    },
    BuiltinGame {
        name: "AshDash",
        emoji: "🟧",
        url: "https://ashdash.netlify.app/",
        category: "Platformer",
        age_days: 1,
    },
];

/// Seed catalog used on first run, after corrupted storage, and on reset.
pub fn builtin_entries(now_millis: i64) -> Vec<GameEntry> {
    BUILTIN_GAMES
        .iter()
        .map(|game| GameEntry {
            id: GameId::generate(),
            name: game.name.to_owned(),
            emoji: game.emoji.to_owned(),
            url: game.url.to_owned(),
            category: game.category.to_owned(),
            created_at: now_millis - game.age_days * DAY_MILLIS,
            target: LaunchTarget::NewView,
        })
        .collect()
}
