// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! HTML markup for the catalog: category chips, one card per visible
//! entry, the empty panel, and a standalone page that wraps them.
//!
//! Every piece of user-supplied text goes through [`escape_html`] before it
//! reaches the output.

use ashgames_app::{CardAction, CatalogState, GameEntry, pretty_url};

const EMPTY_GLYPH: &str = "🟠";

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_chips(categories: &[String], active: &str) -> String {
    categories
        .iter()
        .map(|category| {
            let class = if category == active {
                "chip active"
            } else {
                "chip"
            };
            let text = escape_html(category);
            format!(r#"<button class="{class}" type="button" data-chip="{text}">{text}</button>"#)
        })
        .collect()
}

pub fn render_card(entry: &GameEntry) -> String {
    let name = escape_html(entry.display_name());
    let emoji = escape_html(entry.display_emoji());
    let category = escape_html(entry.normalized_category());
    let location = escape_html(&pretty_url(&entry.url));

    let mut html = format!(
        r#"
<article class="card" aria-label="{name}">
  <div class="cardTop">
    <div class="cardTitle">
      <span class="cardEmoji" aria-hidden="true">{emoji}</span>
      <span>{name}</span>
    </div>
    <span class="badge">{category}</span>
  </div>
  <div class="cardMeta">{location}</div>
  <div class="cardActions">"#
    );
    for action in CardAction::ALL {
        html.push_str(&action_button(action, entry));
    }
    html.push_str("\n  </div>\n</article>");
    html
}

fn action_button(action: CardAction, entry: &GameEntry) -> String {
    let (class, title) = match action {
        CardAction::Play => ("pill", ""),
        CardAction::CopyLink => ("pill linkBtn", ""),
        CardAction::Delete => ("pill ghost", r#" title="Remove""#),
    };
    format!(
        r#"
    <button class="{class}" type="button" data-action="{tag}" data-id="{id}"{title}>{label}</button>"#,
        tag = action.tag(),
        id = escape_html(entry.id.as_str()),
        label = action.label(),
    )
}

pub fn render_empty_state() -> String {
    format!(
        r#"
<div class="card empty">
  <div class="cardTitle">
    <span aria-hidden="true">{EMPTY_GLYPH}</span>
    <span>No games match that.</span>
  </div>
  <div class="cardMeta">Try clearing search, switching categories, or adding a new game link.</div>
  <div class="cardActions">
    <button class="pill" type="button" id="emptyAdd">Add Game</button>
    <button class="pill ghost" type="button" id="emptyClear">Clear search</button>
  </div>
</div>"#
    )
}

/// Cards for the visible entries, or the empty panel when there are none.
pub fn render_grid(view: &[&GameEntry]) -> String {
    if view.is_empty() {
        return render_empty_state();
    }
    view.iter().map(|entry| render_card(entry)).collect()
}

pub fn render_counters(total: usize, shown: usize) -> String {
    format!(
        r#"<div class="stats"><span id="statCount">{total}</span> games, <span id="statShown">{shown}</span> shown</div>"#
    )
}

/// Full document for the current state: chips, counters and grid.
pub fn render_page(state: &CatalogState) -> String {
    let view = state.derived_view();
    let chips = render_chips(&state.categories(), &state.view.category);
    let counters = render_counters(state.entries.len(), view.len());
    let grid = render_grid(&view);
    let query = escape_html(&state.view.query);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width, initial-scale=1"/>
  <title>Ash Games</title>
  <style>{STYLE}</style>
</head>
<body>
  <header>
    <h1>Ash Games</h1>
    <input id="search" type="search" placeholder="Search games" value="{query}"/>
    {counters}
  </header>
  <nav id="chipRow">{chips}</nav>
  <main id="grid">{grid}
  </main>
</body>
</html>
"#
    )
}

const STYLE: &str = "
body { font-family: system-ui, sans-serif; background: #141414; color: #f3f3f3; margin: 0; padding: 24px; }
#chipRow { display: flex; gap: 8px; flex-wrap: wrap; margin: 16px 0; }
.chip, .pill { border-radius: 999px; border: 1px solid #444; background: #222; color: inherit; padding: 6px 12px; }
.chip.active { background: #ff7a1a; color: #141414; }
#grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 12px; }
.card { background: #1d1d1d; border-radius: 14px; padding: 14px; }
.card.empty { grid-column: 1 / -1; }
.cardTop { display: flex; justify-content: space-between; align-items: center; }
.cardTitle { display: flex; gap: 8px; font-weight: 600; }
.cardEmoji { font-size: 18px; }
.badge { font-size: 12px; opacity: 0.8; }
.cardMeta { opacity: 0.7; margin: 8px 0; font-size: 13px; }
.cardActions { display: flex; gap: 6px; }
.pill.ghost { background: transparent; }
";
