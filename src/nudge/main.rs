//! # Nudge CLI
//!
//! The terminal client plays the part of the presentation layer: a list view,
//! an add form, and the undo prompt shown after marking a reminder done.
//! All behavior lives in the library; this binary parses arguments, prints
//! results, and drives the deferred-delete clock while the undo prompt is up.
//!
//! ## Undo Prompt
//!
//! `nudge done 2` marks the reminder done and waits out the grace period.
//! Pressing Enter before it elapses restores the reminder; otherwise it is
//! deleted when the period ends. `--no-undo` skips the wait.

use clap::Parser;
use directories::ProjectDirs;
use nudge::api::{ConfigAction, FsApi};
use nudge::error::{NudgeError, Result};
use nudge::index::Selector;
use nudge::lifecycle::ViewMode;
use nudge::model::Priority;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use tracing_subscriber::EnvFilter;

mod args;
mod cli;

use args::{Cli, Commands, ModeArg};
use cli::print::{print_config, print_messages, print_reminders};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: FsApi,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { mode }) => handle_list(&mut ctx, mode),
        Some(Commands::Add { text, priority }) => handle_add(&mut ctx, text, priority.into()),
        Some(Commands::Done {
            selector,
            mode,
            no_undo,
        }) => handle_done(&mut ctx, &selector, mode, no_undo),
        Some(Commands::Toggle { selector, mode }) => handle_toggle(&mut ctx, &selector, mode),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Interval { priority }) => handle_interval(&ctx, priority.into()),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&mut ctx, None),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "nudge=debug" } else { "nudge=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    tracing::debug!(path = %data_dir.display(), "Using data directory");
    let api = FsApi::open(data_dir)?;
    Ok(AppContext { api })
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Some(home) = std::env::var_os("NUDGE_HOME") {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "nudge", "nudge")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NudgeError::Store("Could not determine data directory".to_string()))
}

fn view_mode(ctx: &AppContext, mode: Option<ModeArg>) -> ViewMode {
    mode.map(ViewMode::from)
        .unwrap_or_else(|| ctx.api.default_view())
}

fn handle_list(ctx: &mut AppContext, mode: Option<ModeArg>) -> Result<()> {
    let mode = view_mode(ctx, mode);
    let result = ctx.api.list(mode);
    print_reminders(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, text: Vec<String>, priority: Priority) -> Result<()> {
    let text = text.join(" ");
    let result = ctx.api.add(&text, priority)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_done(
    ctx: &mut AppContext,
    selector: &str,
    mode: Option<ModeArg>,
    no_undo: bool,
) -> Result<()> {
    let selector: Selector = selector.parse()?;
    let mode = view_mode(ctx, mode);
    let result = ctx.api.mark_done(&selector, mode)?;
    print_messages(&result.messages);
    if result.affected.is_empty() {
        return Ok(());
    }

    if no_undo {
        print_messages(&ctx.api.flush().messages);
        return Ok(());
    }
    wait_for_undo(ctx)
}

/// Keep the undo affordance up until every pending delete has fired or the
/// user pressed Enter.
fn wait_for_undo(ctx: &mut AppContext) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        if let Ok(n) = io::stdin().read_line(&mut line) {
            if n > 0 {
                let _ = tx.send(());
            }
        }
    });

    let secs = ctx.api.config().grace_period().as_secs_f32();
    print!("Press Enter within {:.0}s to undo. ", secs);
    io::stdout().flush().map_err(NudgeError::Io)?;

    let mut listening = true;
    while let Some(remaining) = ctx.api.time_to_next_expiry() {
        if listening {
            match rx.recv_timeout(remaining) {
                Ok(()) => {
                    println!();
                    print_messages(&ctx.api.undo().messages);
                    listening = false;
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    listening = false;
                    continue;
                }
            }
        } else {
            thread::sleep(remaining);
        }
        let settled = ctx.api.settle();
        if !settled.messages.is_empty() {
            println!();
        }
        print_messages(&settled.messages);
    }
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, selector: &str, mode: Option<ModeArg>) -> Result<()> {
    let selector: Selector = selector.parse()?;
    let mode = view_mode(ctx, mode);
    let result = ctx.api.toggle(&selector, mode)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        let count = ctx.api.list(ViewMode::All).listed.len();
        if count == 0 {
            println!("No reminders yet");
            return Ok(());
        }
        print!("This will permanently remove {} reminder(s). [Y] To delete: ", count);
        io::stdout().flush().map_err(NudgeError::Io)?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(NudgeError::Io)?;
        if input.trim() != "Y" {
            println!("Operation cancelled.");
            return Ok(());
        }
    }
    let result = ctx.api.clear();
    print_messages(&result.messages);
    Ok(())
}

fn handle_interval(ctx: &AppContext, priority: Priority) -> Result<()> {
    let result = ctx.api.interval(priority);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.configure(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
