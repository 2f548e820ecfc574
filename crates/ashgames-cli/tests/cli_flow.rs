// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create sandbox dir"),
        }
    }

    fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("catalog.db")
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("missing-config.toml")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ashgames"))
            .args(args)
            .env("ASHGAMES_CONFIG_PATH", self.config_path())
            .env("ASHGAMES_DB_PATH", self.db_path())
            .env_remove("ASHGAMES_LOG")
            .output()
            .expect("run ashgames")
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf8 stdout")
    }
}

fn names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .map(ToOwned::to_owned)
        .collect()
}

#[test]
fn fresh_catalog_lists_the_defaults() {
    let sandbox = Sandbox::new();
    let listing = sandbox.stdout(&["list"]);
    let names = names(&listing);
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|name| name.ends_with("AshDash")));
    assert!(names.iter().any(|name| name.ends_with("AvZ")));
}

#[test]
fn added_game_is_persisted_first_in_insertion_order() {
    let sandbox = Sandbox::new();
    let id = sandbox.stdout(&["add", "pong.io", "--name", "Pong"]);
    let id = id.trim();
    assert!(!id.is_empty());

    let listing = sandbox.stdout(&["list", "--sort", "none"]);
    let first = listing.lines().next().expect("at least one line");
    let columns: Vec<&str> = first.split('\t').collect();
    assert_eq!(columns[0], id);
    assert!(columns[1].ends_with("Pong"));
    assert_eq!(columns[2], "Unsorted");
    assert_eq!(columns[3], "https://pong.io/");
    assert_eq!(listing.lines().count(), 3);
}

#[test]
fn unsafe_url_is_rejected_with_nonzero_exit() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "javascript:alert(1)"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scheme"), "stderr was: {stderr}");
    assert_eq!(names(&sandbox.stdout(&["list"])).len(), 2);
}

#[test]
fn delete_removes_entry_and_unknown_id_fails() {
    let sandbox = Sandbox::new();
    let id = sandbox.stdout(&["add", "https://tetris.com/", "--name", "Tetris"]);
    let id = id.trim();

    let deleted = sandbox.stdout(&["delete", id]);
    assert!(deleted.contains(&format!("deleted {id}")));
    assert!(!sandbox.stdout(&["list"]).contains("Tetris"));

    let output = sandbox.run(&["delete", id]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no game with id"));
}

#[test]
fn reset_restores_defaults() {
    let sandbox = Sandbox::new();
    sandbox.stdout(&["add", "pong.io", "--name", "Pong"]);
    assert_eq!(names(&sandbox.stdout(&["list"])).len(), 3);

    sandbox.stdout(&["reset"]);
    assert_eq!(names(&sandbox.stdout(&["list"])).len(), 2);
}

#[test]
fn wipe_removes_stored_catalog() {
    let sandbox = Sandbox::new();
    sandbox.stdout(&["add", "pong.io", "--name", "Pong"]);
    sandbox.stdout(&["reset", "--wipe"]);
    let listing = sandbox.stdout(&["list"]);
    assert!(!listing.contains("Pong"));
    assert_eq!(names(&listing).len(), 2);
}

#[test]
fn list_filters_by_query_and_category() {
    let sandbox = Sandbox::new();
    let by_query = names(&sandbox.stdout(&["list", "--query", "ash"]));
    assert_eq!(by_query.len(), 1);
    assert!(by_query[0].ends_with("AshDash"));

    let by_category = names(&sandbox.stdout(&["list", "--category", "Strategy"]));
    assert_eq!(by_category.len(), 1);
    assert!(by_category[0].ends_with("AvZ"));
}

#[test]
fn list_json_is_machine_readable() {
    let sandbox = Sandbox::new();
    let raw = sandbox.stdout(&["list", "--json", "--sort", "name-asc"]);
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "AshDash");
    assert_eq!(entries[1]["name"], "AvZ");
}

#[test]
fn render_writes_filtered_page() {
    let sandbox = Sandbox::new();
    let out = sandbox.dir.path().join("page.html");
    let out_arg = out.to_str().expect("utf8 path");
    sandbox.stdout(&["render", "--query", "ash", "--out", out_arg]);

    let html = std::fs::read_to_string(&out).expect("read page");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("AshDash"));
    assert!(!html.contains(r#"aria-label="AvZ""#));
}

#[cfg(unix)]
#[test]
fn copy_without_clipboard_tools_fails_cleanly_when_piped() {
    let sandbox = Sandbox::new();
    let empty_bin = sandbox.dir.path().join("bin");
    std::fs::create_dir(&empty_bin).expect("create empty bin dir");
    let id = sandbox.stdout(&["add", "pong.io", "--name", "Pong"]);

    let output = Command::new(env!("CARGO_BIN_EXE_ashgames"))
        .args(["copy", id.trim()])
        .env("ASHGAMES_CONFIG_PATH", sandbox.config_path())
        .env("ASHGAMES_DB_PATH", sandbox.db_path())
        .env("PATH", &empty_bin)
        .env_remove("WAYLAND_DISPLAY")
        .env_remove("ASHGAMES_LOG")
        .output()
        .expect("run ashgames");

    assert!(!output.status.success());
    assert!(!output.stdout.contains(&0x1b), "escape sequence leaked to stdout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not copy link"), "stderr was: {stderr}");
}

#[test]
fn open_with_unknown_id_exits_nonzero() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["open", "missing-id"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no game with id missing-id"));
}

#[test]
fn demo_mode_leaves_disk_untouched() {
    let sandbox = Sandbox::new();
    sandbox.stdout(&["--demo", "add", "pong.io"]);
    assert!(!Path::new(&sandbox.db_path()).exists());
}

#[test]
fn informational_flags_succeed() {
    let sandbox = Sandbox::new();
    assert!(sandbox.stdout(&["--help"]).contains("usage: ashgames"));
    assert!(
        sandbox
            .stdout(&["--print-example-config"])
            .contains("version = 1")
    );
    assert_eq!(
        sandbox.stdout(&["--print-path"]).trim(),
        sandbox.db_path().display().to_string()
    );
    sandbox.stdout(&["--check"]);
}

#[test]
fn unknown_argument_exits_nonzero() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--help"));
}
