// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    DEFAULT_EMOJI, GameEntry, GameId, LaunchTarget, MAX_CATEGORY_CHARS, MAX_EMOJI_CHARS,
    MAX_NAME_CHARS, UNSORTED_CATEGORY, UNTITLED_NAME, UrlRejection, sanitize_url, truncate_chars,
};

/// Raw add-dialog fields, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddGameInput {
    pub name: String,
    pub emoji: String,
    pub url: String,
    pub category: String,
    pub target: LaunchTarget,
}

impl Default for AddGameInput {
    fn default() -> Self {
        Self::blank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Name,
    Emoji,
    Url,
    Category,
    Target,
}

impl AddField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Emoji,
        Self::Url,
        Self::Category,
        Self::Target,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Emoji => "emoji",
            Self::Url => "url",
            Self::Category => "category",
            Self::Target => "opens in",
        }
    }
}

impl AddGameInput {
    /// Fresh dialog contents: default glyph, empty text, new-view target.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            emoji: DEFAULT_EMOJI.to_owned(),
            url: String::new(),
            category: String::new(),
            target: LaunchTarget::NewView,
        }
    }

    pub fn field(&self, field: AddField) -> &str {
        match field {
            AddField::Name => &self.name,
            AddField::Emoji => &self.emoji,
            AddField::Url => &self.url,
            AddField::Category => &self.category,
            AddField::Target => self.target.as_str(),
        }
    }

    pub fn field_mut(&mut self, field: AddField) -> Option<&mut String> {
        match field {
            AddField::Name => Some(&mut self.name),
            AddField::Emoji => Some(&mut self.emoji),
            AddField::Url => Some(&mut self.url),
            AddField::Category => Some(&mut self.category),
            AddField::Target => None,
        }
    }

    pub fn toggle_target(&mut self) {
        self.target = match self.target {
            LaunchTarget::SelfView => LaunchTarget::NewView,
            LaunchTarget::NewView => LaunchTarget::SelfView,
        };
    }

    /// Validates the URL and fills defaults for every other field. Only the
    /// URL can reject the submission.
    pub fn build(&self, id: GameId, created_at: i64) -> Result<GameEntry, UrlRejection> {
        let url = sanitize_url(&self.url)?;

        let name = self.name.trim();
        let name = if name.is_empty() { UNTITLED_NAME } else { name };

        let emoji = truncate_chars(self.emoji.trim(), MAX_EMOJI_CHARS);
        let emoji = if emoji.is_empty() {
            DEFAULT_EMOJI.to_owned()
        } else {
            emoji
        };

        let category = self.category.trim();
        let category = if category.is_empty() {
            UNSORTED_CATEGORY
        } else {
            category
        };

        Ok(GameEntry {
            id,
            name: truncate_chars(name, MAX_NAME_CHARS),
            emoji,
            url,
            category: truncate_chars(category, MAX_CATEGORY_CHARS),
            created_at,
            target: self.target,
        })
    }
}
