//! Machine Storage CLI
//!
//! Loads a machine snapshot exported by the fleet manager and prints how its
//! storage is classified.
//!
//! ```text
//! machine-storage available machine.json
//! machine-storage classify - < machine.json
//! machine-storage schema
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use machine_storage::storage::{
    can_os_support_bcache_zfs, can_os_support_storage_config, is_machine_storage_configurable,
};
use machine_storage::{
    available_storage, ClassifierConfig, DeviceReport, Error, Machine, StorageClassifier,
    StorageRow,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Machine Storage - classify the disks and partitions of a machine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Classifier configuration file (YAML)
    #[arg(long, env = "CLASSIFIER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List disks and partitions that are free to use, with their actions
    Available {
        /// Machine snapshot, `-` for stdin
        snapshot: PathBuf,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a classification report for every disk and partition
    Classify {
        /// Machine snapshot, `-` for stdin
        snapshot: PathBuf,
    },
    /// Print the JSON schema of a machine snapshot
    Schema,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            match err.downcast_ref::<Error>() {
                Some(e) if e.is_user_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ClassifierConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    let classifier = StorageClassifier::with_config(config);

    match args.command {
        Command::Available { snapshot, json } => {
            let machine = read_snapshot(&snapshot)?;
            log_machine(&machine);

            let rows = available_storage(&classifier, &machine);
            info!(rows = rows.len(), "available storage");

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No available disks or partitions.");
            } else {
                print!("{}", render_table(&rows));
            }
        }
        Command::Classify { snapshot } => {
            let machine = read_snapshot(&snapshot)?;
            log_machine(&machine);

            let reports: Vec<DeviceReport> = machine
                .storage_devices()
                .map(|device| classifier.report(device))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Schema => {
            let schema = schemars::schema_for!(Machine);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> anyhow::Result<Machine> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(Error::from)
            .context("reading snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(Error::from)
            .with_context(|| format!("reading snapshot {}", path.display()))?
    };

    let machine = Machine::from_json(&json)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    Ok(machine)
}

fn log_machine(machine: &Machine) {
    info!(
        system_id = %machine.system_id,
        hostname = %machine.hostname,
        disks = machine.disks.len(),
        configurable = is_machine_storage_configurable(machine),
        storage_config = can_os_support_storage_config(machine),
        bcache_zfs = can_os_support_bcache_zfs(machine),
        "loaded machine snapshot"
    );
}

// =============================================================================
// Table Output
// =============================================================================

fn render_table(rows: &[StorageRow]) -> String {
    let mut out = format!(
        "{:<20} {:<16} {:<20} {:<5} {:<10} {:<16} {:<6} {}\n",
        "NAME", "SERIAL", "MODEL", "BOOT", "SIZE", "TYPE", "NUMA", "ACTIONS"
    );

    for row in rows {
        let boot = match row.boot {
            Some(true) => "yes",
            Some(false) => "no",
            None => "—",
        };
        let numa = row
            .numa_nodes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let actions = row
            .actions
            .iter()
            .map(|a| a.label.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        out.push_str(&format!(
            "{:<20} {:<16} {:<20} {:<5} {:<10} {:<16} {:<6} {}\n",
            row.name,
            row.serial.as_deref().unwrap_or("—"),
            row.model.as_deref().unwrap_or("—"),
            boot,
            row.size,
            row.type_label,
            numa,
            actions
        ));
    }

    out
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
