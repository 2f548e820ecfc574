// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod platform;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use ashgames_app::{
    AddGameInput, AppCommand, AppEvent, CardAction, CatalogState, Controller, CopyMethod,
    GameEntry, GameId, LaunchTarget, SaveOutcome, SortMode, builtin_entries, now_millis,
};
use ashgames_db::{EntryStore, KeyValueStore, MemoryKv, SqliteKv};
use ashgames_tui::{SessionEnd, TuiOptions};
use config::Config;
use logging::LogDestination;
use runtime::CatalogRuntime;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `ashgames --print-example-config` for a template",
            options.config_path.display()
        )
    })?;

    let interactive = options.command == CliCommand::Interactive && !options.check_only;
    let destination = if interactive {
        LogDestination::File(config.log_path()?)
    } else {
        LogDestination::Stderr
    };
    logging::init_tracing(config.log_level(), destination)?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let kv = open_storage(&config, &db_path, options.demo)?;
    if options.check_only {
        return Ok(());
    }

    let store = EntryStore::new(kv, config.storage_key());
    let now = now_millis();
    let defaults = builtin_entries(now);
    let entries = store.load(&defaults, now);
    tracing::debug!(entries = entries.len(), key = config.storage_key(), "catalog loaded");

    let state = CatalogState::new(entries, defaults).with_sort(config.default_sort());
    let mut controller = Controller::new(state, CatalogRuntime::new(store));
    execute(&mut controller, options.command, &config)
}

fn open_storage(config: &Config, db_path: &Path, demo: bool) -> Result<Box<dyn KeyValueStore>> {
    if demo {
        return Ok(Box::new(MemoryKv::new()));
    }

    let mut kv = SqliteKv::open(db_path).with_context(|| {
        format!(
            "open database {}; if this path is wrong, set [storage].db_path or ASHGAMES_DB_PATH",
            db_path.display()
        )
    })?;
    kv.set_max_value_size(config.max_value_size())?;
    Ok(Box::new(kv))
}

fn execute(
    controller: &mut Controller<CatalogRuntime>,
    command: CliCommand,
    config: &Config,
) -> Result<()> {
    match command {
        CliCommand::Interactive => {
            let options = TuiOptions {
                copy_feedback: config.copy_feedback(),
            };
            if let SessionEnd::Navigated(url) = ashgames_tui::run_app(controller, options)? {
                println!("opened {url}");
            }
            Ok(())
        }
        CliCommand::List { view, json } => {
            apply_view(controller, view);
            let visible = controller.state().derived_view();
            if json {
                let encoded =
                    serde_json::to_string_pretty(&visible).context("encode catalog as JSON")?;
                println!("{encoded}");
            } else {
                for entry in visible {
                    println!("{}", list_line(entry));
                }
            }
            Ok(())
        }
        CliCommand::Add(input) => report(controller.dispatch(AppCommand::SubmitAdd(input))),
        CliCommand::Delete(id) => card(controller, CardAction::Delete, id),
        CliCommand::Open(id) => card(controller, CardAction::Play, id),
        CliCommand::Copy(id) => card(controller, CardAction::CopyLink, id),
        CliCommand::Reset { wipe: false } => report(controller.dispatch(AppCommand::Reset)),
        CliCommand::Reset { wipe: true } => {
            if let SaveOutcome::Failed(reason) = controller.runtime_mut().store_mut().clear() {
                bail!("could not remove stored catalog: {reason}");
            }
            println!("stored catalog removed; defaults load on next start");
            Ok(())
        }
        CliCommand::Render { view, out } => {
            apply_view(controller, view);
            let html = ashgames_render::render_page(controller.state());
            match out {
                Some(path) => {
                    fs::write(&path, html)
                        .with_context(|| format!("write page to {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => print!("{html}"),
            }
            Ok(())
        }
    }
}

fn card(
    controller: &mut Controller<CatalogRuntime>,
    action: CardAction,
    id: GameId,
) -> Result<()> {
    report(controller.dispatch(AppCommand::Card { action, id }))
}

fn apply_view(controller: &mut Controller<CatalogRuntime>, view: ViewArgs) {
    if let Some(query) = view.query {
        controller.dispatch(AppCommand::SetQuery(query));
    }
    if let Some(category) = view.category {
        controller.dispatch(AppCommand::SelectCategory(category));
    }
    if let Some(sort) = view.sort {
        controller.dispatch(AppCommand::SetSort(sort));
    }
}

/// Prints what a one-shot command did; failures become the exit status.
fn report(events: Vec<AppEvent>) -> Result<()> {
    for event in events {
        match event {
            AppEvent::EntryAdded(id) => println!("{id}"),
            AppEvent::EntryRemoved(id) => println!("deleted {id}"),
            AppEvent::CatalogReset => println!("catalog reset to defaults"),
            AppEvent::Launched { url, .. } => println!("opened {url}"),
            AppEvent::LinkCopied {
                method: CopyMethod::Clipboard,
                ..
            } => println!("link copied"),
            AppEvent::LinkCopied {
                method: CopyMethod::Fallback,
                ..
            } => println!("link sent to terminal clipboard"),
            AppEvent::AddRejected(rejection) => bail!("cannot add game: {rejection}"),
            AppEvent::UnknownEntry(id) => bail!("no game with id {id}; run `ashgames list`"),
            AppEvent::LaunchFailed(reason) => bail!("could not open game: {reason}"),
            AppEvent::CopyFailed(reason) => bail!("could not copy link: {reason}"),
            AppEvent::Persisted(SaveOutcome::Failed(reason)) => {
                bail!("change applied but not saved: {reason}")
            }
            _ => {}
        }
    }
    Ok(())
}

fn list_line(entry: &GameEntry) -> String {
    format!(
        "{}\t{} {}\t{}\t{}",
        entry.id,
        entry.display_emoji(),
        entry.display_name(),
        entry.normalized_category(),
        entry.url
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewArgs {
    query: Option<String>,
    category: Option<String>,
    sort: Option<SortMode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    Interactive,
    List { view: ViewArgs, json: bool },
    Add(AddGameInput),
    Delete(GameId),
    Reset { wipe: bool },
    Render { view: ViewArgs, out: Option<PathBuf> },
    Open(GameId),
    Copy(GameId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: CliCommand,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: CliCommand::Interactive,
    };

    let mut iter = args.into_iter().map(|arg| arg.as_ref().to_owned());
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value);
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--demo" => options.demo = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            "list" | "add" | "delete" | "reset" | "render" | "open" | "copy" => {
                options.command = parse_command(&arg, &mut iter)?;
                break;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn parse_command(name: &str, args: &mut impl Iterator<Item = String>) -> Result<CliCommand> {
    let mut view = ViewArgs::default();
    let mut json = false;
    let mut wipe = false;
    let mut out = None;
    let mut input = AddGameInput::blank();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match (name, arg.as_str()) {
            ("list" | "render", "--query") => view.query = Some(flag_value(&arg, args)?),
            ("list" | "render", "--category") => view.category = Some(flag_value(&arg, args)?),
            ("list" | "render", "--sort") => {
                let value = flag_value(&arg, args)?;
                let sort = SortMode::parse(&value).ok_or_else(|| {
                    anyhow!("--sort {value:?} is not one of name-asc, name-desc, newest, oldest, none")
                })?;
                view.sort = Some(sort);
            }
            ("list", "--json") => json = true,
            ("render", "--out") => out = Some(PathBuf::from(flag_value(&arg, args)?)),
            ("add", "--name") => input.name = flag_value(&arg, args)?,
            ("add", "--emoji") => input.emoji = flag_value(&arg, args)?,
            ("add", "--category") => input.category = flag_value(&arg, args)?,
            ("add", "--self") => input.target = LaunchTarget::SelfView,
            ("reset", "--wipe") => wipe = true,
            (_, flag) if flag.starts_with("--") => {
                bail!("`{name}` does not take {flag}; run with --help to see supported options");
            }
            _ => positional.push(arg.clone()),
        }
    }

    let takes_positional = matches!(name, "add" | "delete" | "open" | "copy");
    if !takes_positional && !positional.is_empty() {
        bail!("`{name}` takes no positional arguments, got {positional:?}");
    }
    if takes_positional && positional.len() != 1 {
        let what = if name == "add" { "a url" } else { "a game id" };
        bail!("`{name}` takes exactly {what}; got {}", positional.len());
    }
    let single = positional.pop().unwrap_or_default();

    Ok(match name {
        "list" => CliCommand::List { view, json },
        "render" => CliCommand::Render { view, out },
        "reset" => CliCommand::Reset { wipe },
        "add" => {
            input.url = single;
            CliCommand::Add(input)
        }
        "delete" => CliCommand::Delete(GameId::new(single)),
        "open" => CliCommand::Open(GameId::new(single)),
        "copy" => CliCommand::Copy(GameId::new(single)),
        other => bail!("unknown command {other:?}"),
    })
}

fn flag_value(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn print_help() {
    println!("ashgames: a personal catalog of browser game links");
    println!();
    println!("usage: ashgames [options] [command]");
    println!();
    println!("options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Use an in-memory catalog seeded with defaults");
    println!("  --check                  Validate config and storage, then exit");
    println!("  --help                   Show this help");
    println!();
    println!("commands (no command starts the terminal UI):");
    println!("  list [--query Q] [--category C] [--sort MODE] [--json]");
    println!("  add <url> [--name N] [--emoji E] [--category C] [--self]");
    println!("  delete <id>");
    println!("  open <id>");
    println!("  copy <id>");
    println!("  reset [--wipe]");
    println!("  render [--query Q] [--category C] [--sort MODE] [--out FILE]");
    println!();
    println!("sort modes: name-asc, name-desc, newest, oldest, none");
}
