use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendtrack::{
    export::export_csv,
    models::parse_date,
    stores::{TransactionStore, sqlite::create_sqlite_state},
};

/// Inspect and export data from a spendtrack database.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the SQLite database file. Created if it does not exist.
    #[arg(long, default_value = "spendtrack.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database tables and exit.
    Init,
    /// Print a rollup report as JSON.
    Report {
        /// Which rollup to print.
        #[arg(value_enum)]
        kind: ReportKind,
    },
    /// Write transactions as CSV, optionally restricted to a date range.
    Export {
        /// Earliest transaction date to include (inclusive), e.g. 2024-01-01.
        #[arg(long)]
        from: Option<String>,
        /// Latest transaction date to include (inclusive).
        #[arg(long)]
        to: Option<String>,
        /// File to write the CSV to. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    /// Totals grouped by the mid-level category tag.
    Category,
    /// Totals grouped by calendar month, oldest first.
    Monthly,
    /// Totals grouped by account name.
    Bank,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter::LevelFilter::INFO))
        .init();

    let cli = Cli::parse();

    let connection = Connection::open(&cli.db_path)?;
    let state = create_sqlite_state(connection)?;

    match cli.command {
        Command::Init => {
            // create_sqlite_state already ran the table setup.
            tracing::info!("initialized database at {}", cli.db_path.display());
        }
        Command::Report { kind } => {
            let rollup = match kind {
                ReportKind::Category => state.transaction_store.category_rollup()?,
                ReportKind::Monthly => state.transaction_store.monthly_rollup()?,
                ReportKind::Bank => state.transaction_store.bank_rollup()?,
            };

            println!("{}", serde_json::to_string_pretty(&rollup)?);
        }
        Command::Export { from, to, output } => {
            let transactions = match (from, to) {
                (None, None) => state.transaction_store.list()?,
                (from, to) => {
                    let start = match from {
                        Some(ref text) => parse_date(text)?,
                        None => time::Date::MIN,
                    };
                    let end = match to {
                        Some(ref text) => parse_date(text)?,
                        None => time::Date::MAX,
                    };

                    state.transaction_store.filter_by_date_range(start..=end)?
                }
            };

            let csv_text = export_csv(&transactions)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &csv_text)?;
                    tracing::info!(
                        "wrote {} transactions to {}",
                        transactions.len(),
                        path.display()
                    );
                }
                None => print!("{csv_text}"),
            }
        }
    }

    Ok(())
}
