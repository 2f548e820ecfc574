// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::GameId;

pub const ALL_CATEGORY: &str = "All";
pub const UNSORTED_CATEGORY: &str = "Unsorted";
pub const UNTITLED_NAME: &str = "Untitled";
pub const DEFAULT_EMOJI: &str = "🎮";
pub const FALLBACK_URL: &str = "https://example.com/";

pub const MAX_NAME_CHARS: usize = 40;
pub const MAX_EMOJI_CHARS: usize = 2;
pub const MAX_CATEGORY_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEntry {
    pub id: GameId,
    pub name: String,
    pub emoji: String,
    pub url: String,
    pub category: String,
    pub created_at: i64,
    pub target: LaunchTarget,
}

impl GameEntry {
    /// Category as used by chips and filtering: blank labels collapse to
    /// `Unsorted`.
    pub fn normalized_category(&self) -> &str {
        normalize_category(&self.category)
    }

    pub fn display_emoji(&self) -> &str {
        if self.emoji.is_empty() {
            DEFAULT_EMOJI
        } else {
            &self.emoji
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNTITLED_NAME
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchTarget {
    #[serde(rename = "self")]
    SelfView,
    #[default]
    #[serde(rename = "blank")]
    NewView,
}

impl LaunchTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfView => "self",
            Self::NewView => "blank",
        }
    }

    /// Anything other than `self` opens a separate view.
    pub fn from_tag(value: &str) -> Self {
        if value == "self" {
            Self::SelfView
        } else {
            Self::NewView
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    NameAsc,
    NameDesc,
    Newest,
    Oldest,
    Insertion,
}

impl SortMode {
    pub const SELECTABLE: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::Newest, Self::Oldest];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Insertion => "none",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "Name A-Z",
            Self::NameDesc => "Name Z-A",
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::Insertion => "As added",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name-asc" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "none" => Some(Self::Insertion),
            _ => None,
        }
    }

    /// Unrecognized tags keep the list in insertion order.
    pub fn from_tag(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Insertion)
    }

    pub fn next(self) -> Self {
        let current = Self::SELECTABLE
            .iter()
            .position(|mode| *mode == self)
            .map_or(0, |index| index + 1);
        Self::SELECTABLE[current % Self::SELECTABLE.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Play,
    CopyLink,
    Delete,
}

impl CardAction {
    pub const ALL: [Self; 3] = [Self::Play, Self::CopyLink, Self::Delete];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::CopyLink => "copy",
            Self::Delete => "delete",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::CopyLink => "Copy link",
            Self::Delete => "Delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "play" => Some(Self::Play),
            "copy" => Some(Self::CopyLink),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

pub fn normalize_category(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNSORTED_CATEGORY
    } else {
        trimmed
    }
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        CardAction, GameEntry, LaunchTarget, SortMode, UNSORTED_CATEGORY, normalize_category,
        truncate_chars,
    };
    use crate::GameId;

    #[test]
    fn blank_categories_normalize_to_unsorted() {
        assert_eq!(normalize_category(""), UNSORTED_CATEGORY);
        assert_eq!(normalize_category("   "), UNSORTED_CATEGORY);
        assert_eq!(normalize_category("  Puzzle "), "Puzzle");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("🎮🌿🟧", 2), "🎮🌿");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn unknown_sort_tag_keeps_insertion_order() {
        assert_eq!(SortMode::from_tag("newest"), SortMode::Newest);
        assert_eq!(SortMode::from_tag("by-vibes"), SortMode::Insertion);
        assert_eq!(SortMode::parse("by-vibes"), None);
    }

    #[test]
    fn sort_cycle_wraps_and_skips_insertion() {
        assert_eq!(SortMode::Oldest.next(), SortMode::NameAsc);
        assert_eq!(SortMode::Insertion.next(), SortMode::NameAsc);
        assert_eq!(SortMode::NameAsc.next(), SortMode::NameDesc);
    }

    #[test]
    fn card_action_tags_round_trip() {
        for action in CardAction::ALL {
            assert_eq!(CardAction::parse(action.tag()), Some(action));
        }
        assert_eq!(CardAction::parse("launch"), None);
    }

    #[test]
    fn entry_serializes_with_storage_field_names() -> Result<(), serde_json::Error> {
        let entry = GameEntry {
            id: GameId::new("a-b-c-d"),
            name: "Pong".to_owned(),
            emoji: String::new(),
            url: "https://pong.io/".to_owned(),
            category: "Arcade".to_owned(),
            created_at: 42,
            target: LaunchTarget::SelfView,
        };
        let value = serde_json::to_value(&entry)?;
        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["target"], "self");
        assert_eq!(value["id"], "a-b-c-d");
        assert_eq!(entry.display_emoji(), "🎮");
        Ok(())
    }

    #[test]
    fn launch_target_defaults_to_new_view() {
        assert_eq!(LaunchTarget::from_tag("self"), LaunchTarget::SelfView);
        assert_eq!(LaunchTarget::from_tag("_blank"), LaunchTarget::NewView);
        assert_eq!(LaunchTarget::from_tag(""), LaunchTarget::NewView);
    }
}
