// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::{ALL_CATEGORY, GameEntry, SortMode};

/// Distinct normalized categories, sorted, with `All` always first.
pub fn categories(entries: &[GameEntry]) -> Vec<String> {
    let distinct = entries
        .iter()
        .map(GameEntry::normalized_category)
        .filter(|category| *category != ALL_CATEGORY)
        .collect::<BTreeSet<_>>();

    let mut sorted = distinct.into_iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| locale_compare(a, b));

    let mut out = Vec::with_capacity(sorted.len() + 1);
    out.push(ALL_CATEGORY.to_owned());
    out.extend(sorted.into_iter().map(str::to_owned));
    out
}

pub fn has_category(entries: &[GameEntry], category: &str) -> bool {
    category == ALL_CATEGORY
        || entries
            .iter()
            .any(|entry| entry.normalized_category() == category)
}

pub fn matches_filters(entry: &GameEntry, query: &str, category: &str) -> bool {
    if category != ALL_CATEGORY && entry.normalized_category() != category {
        return false;
    }
    if query.is_empty() {
        return true;
    }

    let haystack = format!(
        "{} {} {}",
        entry.name,
        entry.normalized_category(),
        entry.url
    )
    .to_lowercase();
    haystack.contains(&query.to_lowercase())
}

pub fn filter_entries<'a>(
    entries: &'a [GameEntry],
    query: &str,
    category: &str,
) -> Vec<&'a GameEntry> {
    entries
        .iter()
        .filter(|entry| matches_filters(entry, query, category))
        .collect()
}

/// Stable sort of a borrowed view; the backing list is never reordered.
pub fn sort_entries<'a>(mut view: Vec<&'a GameEntry>, mode: SortMode) -> Vec<&'a GameEntry> {
    match mode {
        SortMode::NameAsc => view.sort_by(|a, b| locale_compare(&a.name, &b.name)),
        SortMode::NameDesc => view.sort_by(|a, b| locale_compare(&b.name, &a.name)),
        SortMode::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Insertion => {}
    }
    view
}

pub fn derive_view<'a>(
    entries: &'a [GameEntry],
    query: &str,
    category: &str,
    sort: SortMode,
) -> Vec<&'a GameEntry> {
    sort_entries(filter_entries(entries, query, category), sort)
}

/// Accent- and case-insensitive ordering. Ties fall back to the plain
/// lowercase text, so unaccented sorts before accented, then lowercase
/// before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase()
}
