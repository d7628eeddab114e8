//! # Fairbill CLI Library
//!
//! Argument definitions and dispatch for the `fairbill` binary.
//!
//! ## Module Organization
//! ```text
//! fairbill_cli/
//! ├── lib.rs          ◄─── You are here (arguments, logging, dispatch)
//! ├── config.rs       ◄─── AppConfig (file, env, flags)
//! └── commands/
//!     ├── mod.rs      ◄─── Context + output helpers
//!     ├── catalog.rs  ◄─── init, catalog, search
//!     ├── check.rs    ◄─── check, verify
//!     ├── bill.rs     ◄─── bills, bill, stats
//!     └── complaint.rs◄─── complain, complaints
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging (stderr, RUST_LOG or --verbose)                  │
//! │  3. Load config: defaults → fairbill.toml → FAIRBILL_* env → flags      │
//! │  4. Open database (WAL, foreign keys, pending migrations)               │
//! │  5. Run the command, print its output to stdout                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fairbill_core::{BillLineItem, ItemType, Money, NewComplaint};
use fairbill_db::Database;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::check::{parse_line_item, SaveTarget};
use commands::Context;
use config::AppConfig;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "fairbill", version)]
#[command(about = "Check hospital charges against government price ceilings")]
pub struct Cli {
    /// Config file (default: platform config dir/fairbill.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema and load the sample catalog
    Init,

    /// List a catalog ordered by name
    Catalog {
        /// medicine | procedure
        item_type: ItemType,
    },

    /// Find catalog entries by partial name
    Search { item_type: ItemType, query: String },

    /// Check one charged price
    Check(CheckArgs),

    /// Verify every line of a bill
    Verify(VerifyArgs),

    /// List saved bills, newest first
    Bills,

    /// Show one bill with its items
    Bill { id: i64 },

    /// File an overcharge complaint
    Complain(ComplainArgs),

    /// List complaints, newest first
    Complaints,

    /// Dashboard counts
    Stats,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    pub item_type: ItemType,
    pub name: String,
    /// Charged price, e.g. 7.50
    pub price: Money,

    /// Record the check as a quick-check bill
    #[arg(long)]
    pub save: bool,

    /// Print the result card markup
    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Bill line as type:name:price (repeatable)
    #[arg(long = "item", value_name = "TYPE:NAME:PRICE", value_parser = parse_line_item, required = true)]
    pub items: Vec<BillLineItem>,

    #[arg(long)]
    pub patient: Option<String>,

    #[arg(long)]
    pub hospital: Option<String>,

    /// Bill date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Save the bill and its matched items
    #[arg(long, requires_all = ["patient", "hospital"])]
    pub save: bool,

    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug)]
pub struct ComplainArgs {
    #[arg(long)]
    pub patient: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub hospital: String,

    #[arg(long)]
    pub details: String,

    /// Overcharge amount, e.g. 250.00
    #[arg(long)]
    pub amount: Money,

    #[arg(long)]
    pub bill_id: Option<i64>,
}

impl From<ComplainArgs> for NewComplaint {
    fn from(args: ComplainArgs) -> Self {
        NewComplaint {
            bill_id: args.bill_id,
            patient_name: args.patient,
            patient_email: args.email,
            patient_phone: args.phone,
            hospital_name: args.hospital,
            complaint_details: args.details,
            overcharge_amount: args.amount,
        }
    }
}

// =============================================================================
// Run
// =============================================================================

/// Initializes the tracing subscriber. Logs go to stderr so command output
/// on stdout stays clean.
///
/// ## Log Levels
/// - Default: warnings only
/// - `--verbose`: `info,fairbill=debug,sqlx=warn`
/// - `RUST_LOG` overrides both
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,fairbill=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration (file and `FAIRBILL_*` environment), opens the
/// database and runs one command.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    run_with_config(cli, config).await
}

/// Runs one command with an already loaded configuration. Command-line
/// flags still take precedence.
pub async fn run_with_config(cli: Cli, mut config: AppConfig) -> anyhow::Result<String> {
    config.apply_flags(cli.db);
    config.validate()?;

    let db_config = config.db_config()?;
    debug!(path = ?db_config.database_path, "Opening database");
    let db = Database::new(db_config).await?;
    if !db.health_check().await {
        anyhow::bail!("Database is not responding");
    }

    let ctx = Context::new(db.clone(), config.currency_format(), cli.json);
    let output = dispatch(&ctx, &db, cli.command).await;

    db.close().await;
    info!("Database closed");
    output
}

async fn dispatch(ctx: &Context<Database>, db: &Database, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Init => commands::catalog::init(db).await,
        Command::Catalog { item_type } => commands::catalog::list(ctx, item_type).await,
        Command::Search { item_type, query } => {
            commands::catalog::search(ctx, item_type, &query).await
        }
        Command::Check(args) => {
            commands::check::check(ctx, args.item_type, &args.name, args.price, args.save, args.html)
                .await
        }
        Command::Verify(args) => {
            let target = match (args.save, args.patient, args.hospital) {
                (true, Some(patient), Some(hospital)) => Some(SaveTarget {
                    patient,
                    hospital,
                    date: args.date,
                }),
                _ => None,
            };
            commands::check::verify(ctx, args.items, target, args.html).await
        }
        Command::Bills => commands::bill::list(ctx).await,
        Command::Bill { id } => commands::bill::show(ctx, id).await,
        Command::Complain(args) => commands::complaint::file(ctx, args.into()).await,
        Command::Complaints => commands::complaint::list(ctx).await,
        Command::Stats => commands::bill::stats(ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "fairbill", "--json", "check", "medicine", "Paracetamol 500mg", "7.50", "--save",
        ])
        .unwrap();
        assert!(cli.json);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.item_type, ItemType::Medicine);
        assert_eq!(args.price, Money::from_minor(750));
        assert!(args.save);
    }

    #[test]
    fn test_verify_save_needs_header() {
        let result = Cli::try_parse_from([
            "fairbill", "verify", "--item", "medicine:Paracetamol:3", "--save",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "fairbill",
            "verify",
            "--item",
            "medicine:Paracetamol:3",
            "--item",
            "procedure:ECG:450",
            "--patient",
            "Asha Rao",
            "--hospital",
            "City Hospital",
            "--date",
            "2024-03-01",
            "--save",
        ])
        .unwrap();
        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.items.len(), 2);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[tokio::test]
    async fn test_run_against_file_database() {
        let dir = std::env::temp_dir().join(format!("fairbill-cli-{}", std::process::id()));
        let db_path = dir.join("fairbill.db");

        // Flags beat the loaded config; nothing is read from the environment
        let mut config = AppConfig::default();
        config.database.path = Some(dir.join("unused.db"));

        let cli = Cli::try_parse_from(["fairbill", "init"]).unwrap();
        let cli = Cli {
            db: Some(db_path.clone()),
            ..cli
        };
        let output = run_with_config(cli, config.clone()).await.unwrap();
        assert!(output.contains("seeded"));
        assert!(db_path.exists());
        assert!(!dir.join("unused.db").exists());

        let cli = Cli::try_parse_from(["fairbill", "stats"]).unwrap();
        let output = run_with_config(
            Cli {
                db: Some(db_path),
                ..cli
            },
            config,
        )
        .await
        .unwrap();
        assert!(output.contains("Total bills:       0"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_run_rejects_missing_config_file() {
        let missing = std::env::temp_dir().join("fairbill-no-such-dir").join("fairbill.toml");
        let cli = Cli::try_parse_from(["fairbill", "stats"]).unwrap();
        let err = run(Cli {
            config: Some(missing),
            ..cli
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
