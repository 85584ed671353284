//! Admin entry point for the site's settings store.
//!
//! Opens the SQLite settings database (see [`config`] for where it lives),
//! then runs one subcommand against it: list or inspect raw rows, show a
//! panel's projected record, edit or reset a panel, or move the whole table
//! in and out through a JSON snapshot.

mod commands;
mod config;
mod manager;
mod persistence;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use settings::DomainKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use manager::SettingsManager;
use persistence::sqlite::{Database, SqliteSettingRepository};

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "sitecms-settings", about = "Inspect and edit the site's settings panels")]
struct Cli {
    /// SQLite database file. Overrides `SITECMS_DATABASE_PATH`.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every stored row with the panel that owns it.
    List {
        /// Only rows under this panel's key prefix.
        #[arg(short, long)]
        domain: Option<DomainKind>,
    },
    /// Print one stored row and its decoded value.
    Get { key: String },
    /// Print a panel (hero, about, header, theme) as JSON.
    Show { domain: DomainKind },
    /// Change one field of a panel and save the panel.
    ///
    /// Text fields take VALUE verbatim. Other fields expect JSON, e.g.
    /// `'["a.png","b.png"]'` or `true`.
    Set {
        domain: DomainKind,
        field: String,
        value: String,
    },
    /// Overwrite a panel with its built-in defaults.
    Reset { domain: DomainKind },
    /// Write every stored row to a JSON snapshot file.
    Export { path: PathBuf },
    /// Replay a JSON snapshot file into the store.
    Import { path: PathBuf },
}

/// Logs go to stderr unless `SITECMS_LOG_DIR` is set, in which case they go
/// to a daily-rolling file there. The returned guard must outlive logging.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match config::get_log_dir() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir).ok();
            let file_appender = tracing_appender::rolling::daily(log_dir, "sitecms-settings");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();

    let db_path = cli.database.unwrap_or_else(config::get_database_path);
    tracing::info!("Using settings database: {}", db_path.display());

    let db = Database::open(&db_path, config::get_max_connections())
        .await
        .with_context(|| format!("failed to open settings database {}", db_path.display()))?;
    let manager = SettingsManager::new(SqliteSettingRepository::new(db.pool().clone()));

    commands::run(&manager, cli.command).await
}
