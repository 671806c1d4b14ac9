use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rewind_config::{AppConfig, KeyValueStore, RedbStore};
use rewind_core::default_if_blank;
use rewind_mod_history::{HistoryConfig, HistoryManager};
use serde::Serialize;
use serde_json::Value;

/// Undo/redo history of JSON values, persisted between runs.
#[derive(Parser, Debug)]
#[command(name = "rewind", version, about)]
struct Cli {
    /// Config file (defaults to `rewind.json` next to the executable).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the store database.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Store key of the history to operate on.
    #[arg(long)]
    key: Option<String>,

    /// Initial value (JSON) used when nothing is stored and after `clear`.
    #[arg(long, default_value = "null")]
    initial: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print the current timeline.
    Show,
    /// Record a new present value.
    Set {
        /// The value, as JSON.
        value: String,
        /// Store the argument as a plain string instead of parsing it.
        #[arg(long)]
        text: bool,
    },
    /// Step back one entry.
    Undo,
    /// Step forward one entry.
    Redo,
    /// Reset to the initial value and delete the stored history.
    Clear,
    /// List every key in the store.
    Keys,
}

/// What a command prints.
#[derive(Debug, Serialize)]
struct Report<'a> {
    key: &'a str,
    past: &'a [Value],
    present: &'a Value,
    future: &'a VecDeque<Value>,
    can_undo: bool,
    can_redo: bool,
    /// Whether the command changed the timeline.
    changed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_or_create(&config_path);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolve_data_dir());
    tracing::debug!("Using data directory {}", data_dir.display());
    let store = RedbStore::open_in(&data_dir)?;

    if cli.command == Command::Keys {
        for key in store.keys().context("Failed to list stored keys")? {
            println!("{key}");
        }
        return Ok(());
    }

    let initial: Value =
        serde_json::from_str(&cli.initial).context("--initial is not valid JSON")?;
    let history_config = with_key_override(HistoryConfig::from_app_config(&config), cli.key);

    let mut manager = open_manager(store, history_config, initial);
    let changed = execute(&cli.command, &mut manager)?;
    println!("{}", render(&manager, changed, config.pretty_print)?);
    Ok(())
}

/// Applies one command to the history. Returns whether anything changed.
fn execute(command: &Command, manager: &mut HistoryManager<Value>) -> Result<bool> {
    let changed = match command {
        Command::Show | Command::Keys => false,
        Command::Set { value, text } => {
            let value = if *text {
                Value::String(value.clone())
            } else {
                serde_json::from_str(value)
                    .with_context(|| format!("Value is not valid JSON: {value}"))?
            };
            manager.set(value);
            true
        }
        Command::Undo => manager.undo(),
        Command::Redo => manager.redo(),
        Command::Clear => {
            manager.clear();
            true
        }
    };
    if !changed {
        tracing::info!("Nothing to do for {command:?}");
    }
    Ok(changed)
}

fn render(manager: &HistoryManager<Value>, changed: bool, pretty: bool) -> Result<String> {
    let report = Report {
        key: manager.key().unwrap_or_default(),
        past: manager.past(),
        present: manager.present(),
        future: manager.future(),
        can_undo: manager.can_undo(),
        can_redo: manager.can_redo(),
        changed,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    json.context("Failed to render timeline")
}

/// Applies `--key`, ignoring a blank override.
fn with_key_override(mut config: HistoryConfig, key: Option<String>) -> HistoryConfig {
    if let Some(key) = key {
        config.key = default_if_blank(key, config.key);
    }
    config
}

/// Opens the persisted history, restoring any stored timeline.
fn open_manager(
    store: Arc<dyn KeyValueStore>,
    config: HistoryConfig,
    initial: Value,
) -> HistoryManager<Value> {
    HistoryManager::with_store(initial, store, config)
}
