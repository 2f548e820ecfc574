// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use ashgames_app::LaunchTarget;
use base64::Engine;
use std::io::{self, IsTerminal, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Opens `url` with the platform's default handler. A same-context launch
/// waits for the opener so the caller can exit right after; a new-context
/// launch is detached.
pub fn open_url(url: &str, target: LaunchTarget) -> Result<()> {
    let (program, args) = opener_command(url);
    let mut command = Command::new(program);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match target {
        LaunchTarget::SelfView => {
            let status = command
                .status()
                .with_context(|| format!("run {program} for {url}"))?;
            if !status.success() {
                bail!("{program} exited with {status} for {url}");
            }
        }
        LaunchTarget::NewView => {
            let child = command
                .spawn()
                .with_context(|| format!("spawn {program} for {url}"))?;
            drop(reap_in_background(program, child));
        }
    }
    Ok(())
}

/// Waits for a detached opener so it does not linger as a zombie while the
/// session keeps running.
fn reap_in_background(
    program: &'static str,
    mut child: Child,
) -> JoinHandle<Option<ExitStatus>> {
    thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                tracing::warn!(program, %status, "opener exited with failure");
            }
            Some(status)
        }
        Err(error) => {
            tracing::warn!(program, %error, "could not wait for opener");
            None
        }
    })
}

fn opener_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_owned()])
    } else if cfg!(target_os = "windows") {
        // The empty string is the window title `start` expects first.
        (
            "cmd",
            vec![
                "/C".to_owned(),
                "start".to_owned(),
                String::new(),
                url.to_owned(),
            ],
        )
    } else {
        ("xdg-open", vec![url.to_owned()])
    }
}

type ToolCommand = (&'static str, &'static [&'static str]);

const NO_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];
const XSEL_ARGS: &[&str] = &["--clipboard", "--input"];

/// Clipboard tools to try in order.
fn clipboard_commands(wayland: bool) -> Vec<ToolCommand> {
    if cfg!(target_os = "macos") {
        return vec![("pbcopy", NO_ARGS)];
    }
    if cfg!(target_os = "windows") {
        return vec![("clip", NO_ARGS)];
    }
    let mut commands = Vec::new();
    if wayland {
        commands.push(("wl-copy", NO_ARGS));
    }
    commands.push(("xclip", XCLIP_ARGS));
    commands.push(("xsel", XSEL_ARGS));
    commands
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
    let mut failures = Vec::new();
    for (program, args) in clipboard_commands(wayland) {
        match pipe_into(program, args, text) {
            Ok(()) => return Ok(()),
            Err(error) => failures.push(format!("{program}: {error:#}")),
        }
    }
    Err(anyhow!("no clipboard tool accepted the text ({})", failures.join("; ")))
}

fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {program}"))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("write to {program}"))?;
    }
    let status = child.wait().with_context(|| format!("wait for {program}"))?;
    if !status.success() {
        bail!("exited with {status}");
    }
    Ok(())
}

/// Asks the terminal to set the clipboard (OSC 52). Most terminal
/// emulators honor it even over SSH; there is no acknowledgement.
pub fn copy_via_terminal(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let is_terminal = stdout.is_terminal();
    write_osc52(&mut stdout.lock(), is_terminal, text)
}

// Piped or redirected output would receive the raw escape sequence.
fn write_osc52(out: &mut impl Write, is_terminal: bool, text: &str) -> Result<()> {
    if !is_terminal {
        bail!("stdout is not a terminal, so OSC 52 is unavailable; install wl-copy, xclip or xsel");
    }
    out.write_all(osc52_sequence(text).as_bytes())
        .context("write OSC 52 sequence")?;
    out.flush().context("flush OSC 52 sequence")
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::{clipboard_commands, opener_command, osc52_sequence, write_osc52};

    #[test]
    fn osc52_sequence_wraps_base64_payload() {
        assert_eq!(
            osc52_sequence("https://pong.io/"),
            "\x1b]52;c;aHR0cHM6Ly9wb25nLmlvLw==\x07"
        );
    }

    #[test]
    fn osc52_is_refused_when_output_is_not_a_terminal() {
        let mut piped = Vec::new();
        let error = write_osc52(&mut piped, false, "https://pong.io/")
            .expect_err("piped output should refuse OSC 52");
        assert!(error.to_string().contains("not a terminal"));
        assert!(piped.is_empty());

        let mut tty = Vec::new();
        write_osc52(&mut tty, true, "https://pong.io/").expect("terminal accepts OSC 52");
        assert_eq!(tty, osc52_sequence("https://pong.io/").into_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn detached_opener_is_reaped() {
        let child = std::process::Command::new("true")
            .spawn()
            .expect("spawn true");
        let status = super::reap_in_background("true", child)
            .join()
            .expect("reaper thread");
        assert!(status.is_some_and(|status| status.success()));
    }

    #[test]
    fn opener_passes_url_as_last_argument() {
        let (_, args) = opener_command("https://avza.netlify.app/");
        assert_eq!(
            args.last().map(String::as_str),
            Some("https://avza.netlify.app/")
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn wayland_prefers_wl_copy() {
        assert_eq!(clipboard_commands(true)[0].0, "wl-copy");
        assert_eq!(clipboard_commands(false)[0].0, "xclip");
    }
}
