//! Command-line driver for inspecting and exercising a storage file.
//!
//! Sync settings come from `STORAGESYNC_*` environment variables (see
//! `storagesync::settings`) or a `--settings` JSON file. Logs go to stderr and
//! are filtered with `RUST_LOG`.

mod file_storage;

use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use storagesync::settings::SyncSettings;
use storagesync::{Storage, StorageSyncOptions, SyncError, Value, rehydrate_state, sync_with_storage};
use tracing_subscriber::EnvFilter;

use crate::file_storage::FileStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read settings file {}: {source}", .path.display())]
    SettingsFile { path: PathBuf, source: std::io::Error },
    #[error("invalid settings: {0}")]
    Settings(#[source] serde_json::Error),
    #[error("invalid state JSON: {0}")]
    State(#[source] serde_json::Error),
    #[error("state must be a JSON object")]
    StateNotObject,
    #[error("no features configured; set STORAGESYNC_FEATURES or pass --settings")]
    NoFeatures,
    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),
    #[error("storage error: {0}")]
    Storage(#[from] storagesync::StorageError),
    #[error("no entry for key `{key}` in {}", .file.display())]
    MissingKey { key: String, file: PathBuf },
    #[error("output encoding failed: {0}")]
    Output(#[source] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "storagesync-cli", about = "Rehydrate and sync state against a JSON storage file")]
struct Cli {
    #[arg(long, env = "STORAGESYNC_FILE", default_value = "storagesync.json")]
    file: PathBuf,

    #[arg(long, help = "JSON settings file; overrides STORAGESYNC_* variables")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the state restored from the storage file.
    Rehydrate {
        #[arg(long, default_value_t = false, help = "Log faulty features and keep going")]
        skip_errors: bool,
    },
    /// Write the feature slices of a state object to the storage file.
    Sync {
        #[arg(long)]
        state: String,
    },
    /// Print the raw text stored under a key; a missing key is an error.
    Get { key: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!(error = %err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let storage = Rc::new(FileStorage::new(&cli.file));
    match cli.command {
        Command::Rehydrate { skip_errors } => {
            let mut options = load_options(cli.settings.as_ref(), storage)?;
            if skip_errors {
                options = options.with_storage_error(|err: SyncError| {
                    tracing::warn!(key = err.key(), code = err.error_code(), error = %err, "feature skipped");
                });
            }
            let state = rehydrate_state(&options)?;
            print_json(&state.into_value())
        }
        Command::Sync { state } => {
            let options = load_options(cli.settings.as_ref(), storage)?;
            let state = parse_state(&state)?;
            sync_with_storage(&state, &options)?;
            tracing::info!(features = options.features().len(), file = %cli.file.display(), "state synced");
            Ok(())
        }
        Command::Get { key } => match storage.get_item(&key)? {
            Some(raw) => {
                println!("{raw}");
                Ok(())
            }
            None => Err(CliError::MissingKey { key, file: storage.path().to_path_buf() }),
        },
    }
}

fn load_options(settings: Option<&PathBuf>, storage: Rc<FileStorage>) -> Result<StorageSyncOptions, CliError> {
    let settings = match settings {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| CliError::SettingsFile { path: path.clone(), source })?;
            SyncSettings::from_json(&raw).map_err(CliError::Settings)?
        }
        None => SyncSettings::from_env(),
    };
    if settings.features.is_empty() {
        return Err(CliError::NoFeatures);
    }
    Ok(settings.into_options(storage))
}

fn parse_state(raw: &str) -> Result<Value, CliError> {
    let json: serde_json::Value = serde_json::from_str(raw).map_err(CliError::State)?;
    if !json.is_object() {
        return Err(CliError::StateNotObject);
    }
    Ok(Value::from(json))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(CliError::Output)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
