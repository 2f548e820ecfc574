// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use ashgames_app::{
    AddField, AppCommand, AppEvent, AppRuntime, CardAction, CatalogState, Controller, CopyMethod,
    DialogVisibility, GameEntry, GameId, LaunchTarget, SaveOutcome, pretty_url,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const URL_CUE: Duration = Duration::from_millis(240);
const STATUS_LINGER: Duration = Duration::from_secs(4);
const COPIED_LABEL: &str = "Copied!";
const EMPTY_GLYPH: &str = "🟠";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiOptions {
    /// How long a row shows the copy confirmation.
    pub copy_feedback: Duration,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            copy_feedback: Duration::from_millis(650),
        }
    }
}

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    /// A same-context entry was played; the terminal hands over to it.
    Navigated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Browse,
    Search,
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    ClearCopied { token: u64 },
    ClearUrlCue { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FormUiState {
    input: ashgames_app::AddGameInput,
    field_index: usize,
    url_cue: bool,
}

impl FormUiState {
    fn focused(&self) -> AddField {
        AddField::ALL[self.field_index % AddField::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    search_input: String,
    selected_row: usize,
    form: FormUiState,
    copied: Option<GameId>,
    status: Option<String>,
    status_token: u64,
    copied_token: u64,
    url_cue_token: u64,
    exit: Option<SessionEnd>,
}

pub fn run_app<R: AppRuntime>(
    controller: &mut Controller<R>,
    options: TuiOptions,
) -> Result<SessionEnd> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(SessionEnd::Quit);
    loop {
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, controller.state(), &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(controller, &mut view_data, &internal_tx, options, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }

        if let Some(end) = view_data.exit.take() {
            result = Ok(end);
            break;
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearCopied { token } if token == view_data.copied_token => {
                view_data.copied = None;
            }
            InternalEvent::ClearUrlCue { token } if token == view_data.url_cue_token => {
                view_data.form.url_cue = false;
            }
            InternalEvent::ClearStatus { .. }
            | InternalEvent::ClearCopied { .. }
            | InternalEvent::ClearUrlCue { .. } => {}
        }
    }
}

fn schedule_clear(internal_tx: &Sender<InternalEvent>, delay: Duration, event: InternalEvent) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(event);
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_clear(
        internal_tx,
        STATUS_LINGER,
        InternalEvent::ClearStatus {
            token: view_data.status_token,
        },
    );
}

fn handle_key_event<R: AppRuntime>(
    controller: &mut Controller<R>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match view_data.mode {
        InputMode::Search => {
            handle_search_key(controller, view_data, internal_tx, options, key);
            false
        }
        InputMode::Add => {
            handle_form_key(controller, view_data, internal_tx, options, key);
            false
        }
        InputMode::Browse => handle_browse_key(controller, view_data, internal_tx, options, key),
    }
}

fn handle_browse_key<R: AppRuntime>(
    controller: &mut Controller<R>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    key: KeyEvent,
) -> bool {
    let command = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            view_data.mode = InputMode::Search;
            view_data.search_input = controller.state().view.query.clone();
            return false;
        }
        KeyCode::Esc => {
            if controller.state().view.query.is_empty() {
                return false;
            }
            view_data.search_input.clear();
            AppCommand::ClearQuery
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_selection(controller.state(), view_data, 1);
            return false;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_selection(controller.state(), view_data, -1);
            return false;
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            AppCommand::SelectCategory(adjacent_category(controller.state(), 1))
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            AppCommand::SelectCategory(adjacent_category(controller.state(), -1))
        }
        KeyCode::Char('s') => AppCommand::SetSort(controller.state().view.sort.next()),
        KeyCode::Char('a') => AppCommand::OpenAddDialog,
        KeyCode::Char('R') => AppCommand::Reset,
        KeyCode::Enter | KeyCode::Char('p') => {
            let Some(command) = card_command(controller.state(), view_data, CardAction::Play)
            else {
                return false;
            };
            command
        }
        KeyCode::Char('c') => {
            let Some(command) = card_command(controller.state(), view_data, CardAction::CopyLink)
            else {
                return false;
            };
            command
        }
        KeyCode::Char('d') => {
            let Some(command) = card_command(controller.state(), view_data, CardAction::Delete)
            else {
                return false;
            };
            command
        }
        _ => return false,
    };

    dispatch(controller, view_data, internal_tx, options, command);
    false
}

fn handle_search_key<R: AppRuntime>(
    controller: &mut Controller<R>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            view_data.mode = InputMode::Browse;
        }
        KeyCode::Esc => {
            view_data.mode = InputMode::Browse;
            view_data.search_input.clear();
            dispatch(
                controller,
                view_data,
                internal_tx,
                options,
                AppCommand::ClearQuery,
            );
        }
        KeyCode::Backspace => {
            view_data.search_input.pop();
            let query = view_data.search_input.clone();
            dispatch(
                controller,
                view_data,
                internal_tx,
                options,
                AppCommand::SetQuery(query),
            );
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search_input.push(ch);
            let query = view_data.search_input.clone();
            dispatch(
                controller,
                view_data,
                internal_tx,
                options,
                AppCommand::SetQuery(query),
            );
        }
        _ => {}
    }
}

fn handle_form_key<R: AppRuntime>(
    controller: &mut Controller<R>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc => Some(AppCommand::CloseAddDialog),
        KeyCode::Enter => Some(AppCommand::SubmitAdd(view_data.form.input.clone())),
        _ => None,
    };
    if let Some(command) = command {
        dispatch(controller, view_data, internal_tx, options, command);
        return;
    }

    let field_count = AddField::ALL.len();
    let form = &mut view_data.form;
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.field_index = (form.field_index + 1) % field_count;
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.field_index = (form.field_index + field_count - 1) % field_count;
        }
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if form.focused() == AddField::Target =>
        {
            form.input.toggle_target();
        }
        KeyCode::Backspace => {
            let focused = form.focused();
            if let Some(value) = form.input.field_mut(focused) {
                value.pop();
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let focused = form.focused();
            if let Some(value) = form.input.field_mut(focused) {
                value.push(ch);
            }
        }
        _ => {}
    }
}

fn dispatch<R: AppRuntime>(
    controller: &mut Controller<R>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    command: AppCommand,
) {
    let events = controller.dispatch(command);
    apply_events(controller.state(), view_data, internal_tx, options, events);
}

fn apply_events(
    state: &CatalogState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: TuiOptions,
    events: Vec<AppEvent>,
) {
    let mut select = None;
    for event in events {
        match event {
            AppEvent::AddDialogChanged(DialogVisibility::Visible) => {
                view_data.mode = InputMode::Add;
                view_data.form = FormUiState::default();
            }
            AppEvent::AddDialogChanged(DialogVisibility::Hidden) => {
                if view_data.mode == InputMode::Add {
                    view_data.mode = InputMode::Browse;
                }
            }
            AppEvent::AddRejected(rejection) => {
                view_data.form.url_cue = true;
                view_data.form.field_index = field_position(AddField::Url);
                view_data.url_cue_token = view_data.url_cue_token.saturating_add(1);
                schedule_clear(
                    internal_tx,
                    URL_CUE,
                    InternalEvent::ClearUrlCue {
                        token: view_data.url_cue_token,
                    },
                );
                emit_status(view_data, internal_tx, format!("url rejected: {rejection}"));
            }
            AppEvent::QueryChanged(query) => {
                if query.is_empty() && view_data.mode != InputMode::Search {
                    view_data.search_input.clear();
                }
            }
            AppEvent::EntryAdded(id) => {
                emit_status(view_data, internal_tx, "game added");
                select = Some(id);
            }
            AppEvent::EntryRemoved(_) => emit_status(view_data, internal_tx, "game deleted"),
            AppEvent::CatalogReset => {
                view_data.search_input.clear();
                emit_status(view_data, internal_tx, "catalog reset to defaults");
            }
            AppEvent::SortChanged(sort) => {
                emit_status(view_data, internal_tx, format!("sort: {}", sort.label()));
            }
            AppEvent::Persisted(SaveOutcome::Failed(reason)) => {
                emit_status(view_data, internal_tx, format!("not saved: {reason}"));
            }
            AppEvent::Launched {
                url,
                target: LaunchTarget::SelfView,
            } => {
                view_data.exit = Some(SessionEnd::Navigated(url));
            }
            AppEvent::Launched {
                url,
                target: LaunchTarget::NewView,
            } => {
                emit_status(view_data, internal_tx, format!("opened {}", pretty_url(&url)));
            }
            AppEvent::LaunchFailed(reason) => {
                emit_status(view_data, internal_tx, format!("open failed: {reason}"));
            }
            AppEvent::LinkCopied { id, method } => {
                view_data.copied = Some(id);
                view_data.copied_token = view_data.copied_token.saturating_add(1);
                schedule_clear(
                    internal_tx,
                    options.copy_feedback,
                    InternalEvent::ClearCopied {
                        token: view_data.copied_token,
                    },
                );
                if method == CopyMethod::Fallback {
                    tracing::debug!("link copied through terminal selection");
                }
            }
            AppEvent::UnknownEntry(id) => {
                emit_status(view_data, internal_tx, format!("no game with id {id}"));
            }
            AppEvent::CategoryChanged(_)
            | AppEvent::CopyFailed(_)
            | AppEvent::Persisted(SaveOutcome::Saved)
            | AppEvent::LaunchRequested { .. }
            | AppEvent::CopyRequested { .. } => {}
        }
    }

    let view = state.derived_view();
    if let Some(id) = select
        && let Some(position) = view.iter().position(|entry| entry.id == id)
    {
        view_data.selected_row = position;
    }
    view_data.selected_row = view_data.selected_row.min(view.len().saturating_sub(1));
}

fn field_position(field: AddField) -> usize {
    AddField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(0)
}

fn move_selection(state: &CatalogState, view_data: &mut ViewData, delta: isize) {
    let len = state.derived_view().len();
    if len == 0 {
        view_data.selected_row = 0;
        return;
    }
    let next = view_data.selected_row as isize + delta;
    view_data.selected_row = next.clamp(0, len as isize - 1) as usize;
}

fn adjacent_category(state: &CatalogState, delta: isize) -> String {
    let categories = state.categories();
    let current = categories
        .iter()
        .position(|category| *category == state.view.category)
        .unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(categories.len().max(1) as isize) as usize;
    categories
        .get(next)
        .cloned()
        .unwrap_or_else(|| state.view.category.clone())
}

fn selected_entry<'a>(state: &'a CatalogState, view_data: &ViewData) -> Option<&'a GameEntry> {
    state.derived_view().get(view_data.selected_row).copied()
}

fn card_command(
    state: &CatalogState,
    view_data: &ViewData,
    action: CardAction,
) -> Option<AppCommand> {
    selected_entry(state, view_data).map(|entry| AppCommand::Card {
        action,
        id: entry.id.clone(),
    })
}

fn render(frame: &mut ratatui::Frame<'_>, state: &CatalogState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let view = state.derived_view();

    let header = Paragraph::new(header_text(state, view_data, view.len()))
        .block(Block::default().title("ashgames").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let chips = Paragraph::new(chip_line(&state.categories(), &state.view.category))
        .block(Block::default().title("categories").borders(Borders::ALL));
    frame.render_widget(chips, layout[1]);

    if view.is_empty() {
        let empty = Paragraph::new(empty_state_text())
            .block(Block::default().borders(Borders::ALL).title("games"));
        frame.render_widget(empty, layout[2]);
    } else {
        render_table(frame, layout[2], &view, view_data);
    }

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if view_data.mode == InputMode::Add {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let border = if view_data.form.url_cue {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let form = Paragraph::new(form_text(&view_data.form)).block(
            Block::default()
                .title("add game")
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(form, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &[&GameEntry],
    view_data: &ViewData,
) {
    let header = Row::new(["game", "category", "link", "opens", ""].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = view.iter().enumerate().map(|(index, entry)| {
        let copied = view_data.copied.as_ref() == Some(&entry.id);
        let style = if index == view_data.selected_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(row_cells(entry, copied)).style(style)
    });

    let widths = [
        Constraint::Min(16),
        Constraint::Length(22),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("games").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_text(state: &CatalogState, view_data: &ViewData, shown: usize) -> String {
    let cursor = if view_data.mode == InputMode::Search {
        "_"
    } else {
        ""
    };
    let search = if view_data.mode == InputMode::Search {
        view_data.search_input.as_str()
    } else {
        state.view.query.as_str()
    };
    format!(
        "search: {search}{cursor} | sort: {} | {}",
        state.view.sort.label(),
        counter_text(state.entries.len(), shown)
    )
}

fn counter_text(total: usize, shown: usize) -> String {
    format!("{total} games, {shown} shown")
}

fn chip_line(categories: &[String], active: &str) -> Line<'static> {
    let mut spans = Vec::with_capacity(categories.len() * 2);
    for (index, category) in categories.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        if category == active {
            spans.push(Span::styled(
                format!("[{category}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(category.clone()));
        }
    }
    Line::from(spans)
}

fn row_cells(entry: &GameEntry, copied: bool) -> [String; 5] {
    let opens = match entry.target {
        LaunchTarget::SelfView => "here",
        LaunchTarget::NewView => "new tab",
    };
    [
        format!("{} {}", entry.display_emoji(), entry.display_name()),
        entry.normalized_category().to_owned(),
        pretty_url(&entry.url),
        opens.to_owned(),
        if copied { COPIED_LABEL } else { "" }.to_owned(),
    ]
}

fn empty_state_text() -> String {
    format!(
        "{EMPTY_GLYPH} No games match that.\n\
Try clearing search, switching categories, or adding a new game link.\n\n\
a add game | esc clear search"
    )
}

fn form_text(form: &FormUiState) -> String {
    let focused = form.focused();
    let mut lines = AddField::ALL
        .iter()
        .map(|field| {
            let marker = if *field == focused { ">" } else { " " };
            let flag = if *field == AddField::Url && form.url_cue {
                "  !"
            } else {
                ""
            };
            format!(
                "{marker} {:<9} {}{flag}",
                field.label(),
                form.input.field(*field)
            )
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("tab/shift+tab field | space toggles opens in | enter add | esc cancel".to_owned());
    lines.join("\n")
}

fn status_text(view_data: &ViewData) -> String {
    let (mode, hints) = match view_data.mode {
        InputMode::Browse => (
            "BROWSE",
            "/ search | h/l category | s sort | j/k move | enter play | c copy | d delete | a add | R reset | q quit",
        ),
        InputMode::Search => ("SEARCH", "type to filter | enter keep | esc clear"),
        InputMode::Add => ("ADD", "enter add | esc cancel | ctrl+q quit"),
    };
    match &view_data.status {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        InputMode, InternalEvent, SessionEnd, TuiOptions, ViewData, counter_text,
        empty_state_text, form_text, handle_key_event, process_internal_events, row_cells,
        status_text,
    };
    use ashgames_app::{CatalogState, Controller, GameEntry, LaunchTarget, SortMode};
    use ashgames_testkit::{RecordingRuntime, avz_and_ashdash};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc;

    fn controller() -> Controller<RecordingRuntime> {
        Controller::new(
            CatalogState::new(avz_and_ashdash(), avz_and_ashdash()),
            RecordingRuntime::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(text: &str) -> Vec<KeyEvent> {
        text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
    }

    fn run_key_script(
        controller: &mut Controller<RecordingRuntime>,
        view_data: &mut ViewData,
        tx: &mpsc::Sender<InternalEvent>,
        keys: &[KeyEvent],
    ) -> bool {
        let mut quit = false;
        for event in keys {
            quit |= handle_key_event(controller, view_data, tx, TuiOptions::default(), *event);
        }
        quit
    }

    #[test]
    fn ctrl_q_and_q_quit() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        assert!(handle_key_event(
            &mut controller,
            &mut view_data,
            &tx,
            TuiOptions::default(),
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ));
        assert!(run_key_script(
            &mut controller,
            &mut view_data,
            &tx,
            &[key(KeyCode::Char('q'))]
        ));
    }

    #[test]
    fn search_filters_live_and_esc_clears() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        let mut keys = vec![key(KeyCode::Char('/'))];
        keys.extend(type_text("ash"));
        run_key_script(&mut controller, &mut view_data, &tx, &keys);

        assert_eq!(view_data.mode, InputMode::Search);
        assert_eq!(controller.state().view.query, "ash");
        assert_eq!(controller.state().derived_view().len(), 1);

        // q is text while searching, not quit.
        assert!(!run_key_script(
            &mut controller,
            &mut view_data,
            &tx,
            &[key(KeyCode::Char('q')), key(KeyCode::Esc)]
        ));
        assert_eq!(view_data.mode, InputMode::Browse);
        assert_eq!(controller.state().view.query, "");
        assert_eq!(controller.state().derived_view().len(), 2);
    }

    #[test]
    fn add_dialog_submits_and_selects_new_entry() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        let mut keys = vec![key(KeyCode::Char('/'))];
        keys.extend(type_text("zzz"));
        keys.push(key(KeyCode::Enter));
        keys.push(key(KeyCode::Char('a')));
        keys.extend(type_text("Pong"));
        keys.push(key(KeyCode::Tab));
        keys.push(key(KeyCode::Tab));
        keys.extend(type_text("pong.io"));
        keys.push(key(KeyCode::Enter));
        run_key_script(&mut controller, &mut view_data, &tx, &keys);

        let state = controller.state();
        assert_eq!(view_data.mode, InputMode::Browse);
        assert_eq!(state.view.query, "");
        assert_eq!(view_data.search_input, "");
        assert_eq!(state.entries[0].name, "Pong");
        assert_eq!(state.entries[0].url, "https://pong.io/");
        assert_eq!(state.entries[0].category, "Unsorted");
        let selected = state.derived_view()[view_data.selected_row].id.clone();
        assert_eq!(selected, state.entries[0].id);
        assert_eq!(controller.runtime().saved.len(), 1);
    }

    #[test]
    fn rejected_url_keeps_dialog_open_with_cue() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();

        let mut keys = vec![key(KeyCode::Char('a')), key(KeyCode::Tab), key(KeyCode::Tab)];
        keys.extend(type_text("javascript:alert(1)"));
        keys.push(key(KeyCode::Enter));
        run_key_script(&mut controller, &mut view_data, &tx, &keys);

        assert_eq!(view_data.mode, InputMode::Add);
        assert!(view_data.form.url_cue);
        assert_eq!(controller.state().entries.len(), 2);
        assert!(controller.runtime().saved.is_empty());

        tx.send(InternalEvent::ClearUrlCue {
            token: view_data.url_cue_token,
        })
        .expect("send clear");
        process_internal_events(&mut view_data, &rx);
        assert!(!view_data.form.url_cue);
        assert_eq!(view_data.form.input.url, "javascript:alert(1)");

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Esc)]);
        assert_eq!(view_data.mode, InputMode::Browse);
    }

    #[test]
    fn target_field_toggles_with_space() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        run_key_script(
            &mut controller,
            &mut view_data,
            &tx,
            &[
                key(KeyCode::Char('a')),
                key(KeyCode::BackTab),
                key(KeyCode::Char(' ')),
            ],
        );
        assert_eq!(view_data.form.input.target, LaunchTarget::SelfView);
        assert!(form_text(&view_data.form).contains("> opens in  self"));
    }

    #[test]
    fn copy_marks_row_until_matching_token_clears_it() {
        let mut controller = controller();
        controller.runtime_mut().deny_clipboard = true;
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('c'))]);
        let first = controller.state().derived_view()[0].id.clone();
        assert_eq!(view_data.copied.as_ref(), Some(&first));
        assert_eq!(
            controller.runtime().fallback_clipboard,
            vec!["https://ashdash.netlify.app/".to_owned()]
        );

        let stale = view_data.copied_token;
        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('c'))]);
        tx.send(InternalEvent::ClearCopied { token: stale })
            .expect("send stale clear");
        process_internal_events(&mut view_data, &rx);
        assert!(view_data.copied.is_some());

        tx.send(InternalEvent::ClearCopied {
            token: view_data.copied_token,
        })
        .expect("send clear");
        process_internal_events(&mut view_data, &rx);
        assert_eq!(view_data.copied, None);
    }

    #[test]
    fn playing_self_target_ends_session() {
        let mut entries = avz_and_ashdash();
        entries[0].target = LaunchTarget::SelfView;
        let mut controller = Controller::new(
            CatalogState::new(entries, Vec::new()),
            RecordingRuntime::default(),
        );
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        // AshDash sorts first and opens in a new view.
        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Enter)]);
        assert_eq!(view_data.exit, None);

        run_key_script(
            &mut controller,
            &mut view_data,
            &tx,
            &[key(KeyCode::Char('j')), key(KeyCode::Enter)],
        );
        assert_eq!(
            view_data.exit,
            Some(SessionEnd::Navigated("https://avza.netlify.app/".to_owned()))
        );
        assert_eq!(controller.runtime().launches.len(), 2);
    }

    #[test]
    fn launch_failure_shows_status_and_keeps_session() {
        let mut entries = avz_and_ashdash();
        entries[1].target = LaunchTarget::SelfView;
        let mut controller = Controller::new(
            CatalogState::new(entries, Vec::new()),
            RecordingRuntime {
                fail_launches: true,
                ..RecordingRuntime::default()
            },
        );
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('p'))]);
        assert_eq!(view_data.exit, None);
        assert_eq!(view_data.mode, InputMode::Browse);
        assert!(controller.runtime().launches.is_empty());
        assert!(status_text(&view_data).contains("open failed: no browser available"));
    }

    #[test]
    fn category_cycling_and_delete_fall_back_to_all() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        // All -> Platformer
        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('l'))]);
        assert_eq!(controller.state().view.category, "Platformer");
        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('h'))]);
        assert_eq!(controller.state().view.category, "All");
        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Left)]);
        assert_eq!(controller.state().view.category, "Strategy");

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('d'))]);
        assert_eq!(controller.state().view.category, "All");
        assert_eq!(controller.state().entries.len(), 1);
        assert_eq!(controller.state().entries[0].name, "AshDash");
    }

    #[test]
    fn sort_key_cycles_modes() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('s'))]);
        assert_eq!(controller.state().view.sort, SortMode::NameDesc);
        assert_eq!(controller.state().derived_view()[0].name, "AvZ");
        assert!(status_text(&view_data).contains("sort:"));
    }

    #[test]
    fn reset_restores_defaults_after_deletes() {
        let mut controller = controller();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        run_key_script(
            &mut controller,
            &mut view_data,
            &tx,
            &[key(KeyCode::Char('d')), key(KeyCode::Char('d'))],
        );
        assert!(controller.state().entries.is_empty());
        assert_eq!(view_data.selected_row, 0);

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('R'))]);
        assert_eq!(controller.state().entries, avz_and_ashdash());
    }

    #[test]
    fn failed_save_is_surfaced_in_status() {
        let mut controller = controller();
        controller.runtime_mut().fail_saves = true;
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        run_key_script(&mut controller, &mut view_data, &tx, &[key(KeyCode::Char('d'))]);
        assert_eq!(controller.state().entries.len(), 1);
        assert!(status_text(&view_data).contains("not saved"));
    }

    #[test]
    fn text_builders_cover_rows_counters_and_empty_state() {
        let entry = GameEntry {
            emoji: String::new(),
            category: String::new(),
            ..avz_and_ashdash().remove(0)
        };
        let cells = row_cells(&entry, true);
        assert_eq!(cells[0], "🎮 AvZ");
        assert_eq!(cells[1], "Unsorted");
        assert_eq!(cells[2], "avza.netlify.app/");
        assert_eq!(cells[3], "new tab");
        assert_eq!(cells[4], "Copied!");
        assert_eq!(row_cells(&entry, false)[4], "");

        assert_eq!(counter_text(3, 1), "3 games, 1 shown");
        let empty = empty_state_text();
        assert!(empty.contains("No games match that."));
        assert!(empty.contains("a add game"));
        assert!(empty.contains("esc clear search"));
    }
}
