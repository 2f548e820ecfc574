// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ALL_CATEGORY, AddGameInput, CardAction, CopyMethod, GameEntry, GameId, LaunchTarget,
    SaveOutcome, SortMode, UrlRejection, categories, derive_view, has_category, now_millis,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub category: String,
    pub sort: SortMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORY.to_owned(),
            sort: SortMode::NameAsc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub entries: Vec<GameEntry>,
    pub view: ViewState,
    pub add_dialog: DialogVisibility,
    defaults: Vec<GameEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetQuery(String),
    ClearQuery,
    SelectCategory(String),
    SetSort(SortMode),
    OpenAddDialog,
    CloseAddDialog,
    SubmitAdd(AddGameInput),
    Card { action: CardAction, id: GameId },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    QueryChanged(String),
    CategoryChanged(String),
    SortChanged(SortMode),
    AddDialogChanged(DialogVisibility),
    AddRejected(UrlRejection),
    EntryAdded(GameId),
    EntryRemoved(GameId),
    CatalogReset,
    UnknownEntry(GameId),
    LaunchRequested { url: String, target: LaunchTarget },
    CopyRequested { id: GameId, url: String },
    Persisted(SaveOutcome),
    Launched { url: String, target: LaunchTarget },
    LaunchFailed(String),
    LinkCopied { id: GameId, method: CopyMethod },
    CopyFailed(String),
}

impl AppEvent {
    /// Events after which the full list must be written back to storage.
    pub const fn mutates_entries(&self) -> bool {
        matches!(
            self,
            Self::EntryAdded(_) | Self::EntryRemoved(_) | Self::CatalogReset
        )
    }
}

impl CatalogState {
    pub fn new(entries: Vec<GameEntry>, defaults: Vec<GameEntry>) -> Self {
        Self {
            entries,
            view: ViewState::default(),
            add_dialog: DialogVisibility::Hidden,
            defaults,
        }
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.view.sort = sort;
        self
    }

    pub fn defaults(&self) -> &[GameEntry] {
        &self.defaults
    }

    pub fn entry(&self, id: &GameId) -> Option<&GameEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.entries)
    }

    pub fn derived_view(&self) -> Vec<&GameEntry> {
        derive_view(
            &self.entries,
            &self.view.query,
            &self.view.category,
            self.view.sort,
        )
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        self.dispatch_at(command, now_millis())
    }

    pub fn dispatch_at(&mut self, command: AppCommand, now_millis: i64) -> Vec<AppEvent> {
        match command {
            AppCommand::SetQuery(query) => {
                self.view.query = query.trim().to_owned();
                vec![AppEvent::QueryChanged(self.view.query.clone())]
            }
            AppCommand::ClearQuery => vec![self.clear_query()],
            AppCommand::SelectCategory(category) => {
                self.view.category = category;
                vec![AppEvent::CategoryChanged(self.view.category.clone())]
            }
            AppCommand::SetSort(sort) => {
                self.view.sort = sort;
                vec![AppEvent::SortChanged(sort)]
            }
            AppCommand::OpenAddDialog => {
                self.add_dialog = DialogVisibility::Visible;
                vec![AppEvent::AddDialogChanged(self.add_dialog)]
            }
            AppCommand::CloseAddDialog => {
                self.add_dialog = DialogVisibility::Hidden;
                vec![AppEvent::AddDialogChanged(self.add_dialog)]
            }
            AppCommand::SubmitAdd(input) => self.submit_add(&input, now_millis),
            AppCommand::Card { action, id } => self.card_action(action, id),
            AppCommand::Reset => {
                self.entries = self.defaults.clone();
                vec![
                    AppEvent::CatalogReset,
                    self.reset_category(),
                    self.clear_query(),
                ]
            }
        }
    }

    fn submit_add(&mut self, input: &AddGameInput, now_millis: i64) -> Vec<AppEvent> {
        let entry = match input.build(GameId::generate(), now_millis) {
            Ok(entry) => entry,
            Err(rejection) => return vec![AppEvent::AddRejected(rejection)],
        };

        let id = entry.id.clone();
        self.entries.insert(0, entry);
        self.add_dialog = DialogVisibility::Hidden;
        vec![
            AppEvent::EntryAdded(id),
            AppEvent::AddDialogChanged(self.add_dialog),
            self.clear_query(),
        ]
    }

    fn card_action(&mut self, action: CardAction, id: GameId) -> Vec<AppEvent> {
        let Some(entry) = self.entry(&id) else {
            return vec![AppEvent::UnknownEntry(id)];
        };

        match action {
            CardAction::Play => vec![AppEvent::LaunchRequested {
                url: entry.url.clone(),
                target: entry.target,
            }],
            CardAction::CopyLink => vec![AppEvent::CopyRequested {
                url: entry.url.clone(),
                id,
            }],
            CardAction::Delete => {
                self.entries.retain(|entry| entry.id != id);
                let mut events = vec![AppEvent::EntryRemoved(id)];
                if !has_category(&self.entries, &self.view.category) {
                    events.push(self.reset_category());
                }
                events
            }
        }
    }

    fn clear_query(&mut self) -> AppEvent {
        self.view.query.clear();
        AppEvent::QueryChanged(String::new())
    }

    fn reset_category(&mut self) -> AppEvent {
        self.view.category = ALL_CATEGORY.to_owned();
        AppEvent::CategoryChanged(self.view.category.clone())
    }
}
