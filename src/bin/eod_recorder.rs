use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use eod_recorder::alert::{AlertLog, LogNotifier};
use eod_recorder::config::{Config, load_config_path};
use eod_recorder::db::{connection, migrate};
use eod_recorder::{discovery, parse, records};

#[derive(Parser)]
#[command(version, about = "EOD snapshot recorder")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Discover fresh files and parse them into the store.
    Run {
        #[arg(long, value_name = "FILE")]
        config: String,
        /// Stop after discovery, leaving staged files unparsed.
        #[arg(long)]
        discover_only: bool,
    },
    /// Apply schema migrations and exit.
    Migrate {
        #[arg(long, value_name = "FILE")]
        config: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Migrate { config } => {
            let cfg = load_config_path(Path::new(&config))?;
            migrate::run_sqlite(&cfg.database_url)?;
            Ok(())
        }
        Cmd::Run {
            config,
            discover_only,
        } => {
            let cfg = load_config_path(Path::new(&config))?;
            run(&cfg, discover_only)
        }
    }
}

fn run(cfg: &Config, discover_only: bool) -> Result<()> {
    const FACILITY: &str = "loader";

    migrate::run_sqlite(&cfg.database_url)?;
    let mut conn = connection::connect_sqlite(&cfg.database_url)?;

    let run_id = records::insert_run(&mut conn, "run")?;
    let notifier = LogNotifier {
        target: cfg.alert.notify_target.clone(),
    };
    let alert = AlertLog::new(run_id, cfg.alert.notify_below, Box::new(notifier));

    alert.write(&mut conn, FACILITY, 6, "start")?;

    // Discovery and parse run in separate transaction scopes; a fatal
    // discovery error must still emit a final alert before terminating.
    match discovery::run_discovery(&mut conn, &alert, run_id, &cfg.import_dir) {
        Ok(stats) => {
            alert.write(
                &mut conn,
                FACILITY,
                6,
                &format!(
                    "discovery: {} dirs, {} files, {} fresh, {} updated",
                    stats.directories, stats.total_files, stats.fresh_files, stats.updated_files
                ),
            )?;
        }
        Err(e) => {
            alert.write_fatal(&mut conn, FACILITY, &format!("discovery failed: {e}"))?;
            return Err(e.into());
        }
    }

    if !discover_only {
        if let Err(e) = parse::run_parsers(&mut conn, &alert, run_id, &cfg.import_dir) {
            alert.write_fatal(&mut conn, FACILITY, &format!("parse phase failed: {e}"))?;
            return Err(e.into());
        }
    }

    alert.write(&mut conn, FACILITY, 6, "stop")?;
    Ok(())
}
