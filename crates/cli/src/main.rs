use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "otc-recon")]
#[command(about = "OTC trade confirmation reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a matching batch over two confirmation exports
    Run {
        /// Bank-side confirmations CSV (row-aligned with the counterparty file)
        #[arg(long)]
        bank: Option<String>,
        /// Counterparty-side confirmations CSV
        #[arg(long)]
        counterparty: Option<String>,
        /// Load candidate records from the database partitions instead of files
        #[arg(long, default_value_t = false)]
        from_database: bool,
        /// Persist results and exceptions to the database
        #[arg(long, default_value_t = false)]
        store: bool,
        /// Write the full run output (summary, results, exceptions) as JSON
        #[arg(short, long)]
        output: Option<String>,
        /// Write match results as CSV
        #[arg(long)]
        results_csv: Option<String>,
        /// Append audit events to a JSONL journal
        #[arg(long)]
        journal: Option<String>,
        /// Config profile overlay (config/Config.<profile>.toml)
        #[arg(long)]
        profile: Option<String>,
    },
    /// Load a confirmation export into a source partition
    Ingest {
        /// Target partition: bank | counterparty
        #[arg(long)]
        source: String,
        /// Confirmations CSV file
        #[arg(short, long)]
        input: String,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Score and route pending exceptions using the learned policy
    Triage {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Mark an exception as assigned to an operator
    Assign {
        /// Exception identifier
        #[arg(long)]
        exception_id: String,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Record the resolution of an exception and apply the policy reward
    Resolve {
        /// Exception identifier
        #[arg(long)]
        exception_id: String,
        /// Destination where the exception was actually handled
        #[arg(long)]
        destination: String,
        /// Append audit events to a JSONL journal
        #[arg(long)]
        journal: Option<String>,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Re-render the report for a stored run output or recent results
    Report {
        /// Run output JSON written by `run --output`
        #[arg(short, long)]
        run: Option<String>,
        /// Render the N most recent results from the database instead
        #[arg(long)]
        latest: Option<i64>,
        #[arg(long)]
        profile: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            bank,
            counterparty,
            from_database,
            store,
            output,
            results_csv,
            journal,
            profile,
        } => {
            commands::run::execute(commands::run::RunArgs {
                bank,
                counterparty,
                from_database,
                store,
                output,
                results_csv,
                journal,
                profile,
            })
            .await
        }
        Commands::Ingest {
            source,
            input,
            profile,
        } => commands::ingest::execute(&source, &input, profile.as_deref()).await,
        Commands::Triage { profile } => commands::triage::execute(profile.as_deref()).await,
        Commands::Assign {
            exception_id,
            profile,
        } => commands::resolve::assign(&exception_id, profile.as_deref()).await,
        Commands::Resolve {
            exception_id,
            destination,
            journal,
            profile,
        } => {
            commands::resolve::execute(
                &exception_id,
                &destination,
                journal.as_deref(),
                profile.as_deref(),
            )
            .await
        }
        Commands::Report {
            run,
            latest,
            profile,
        } => commands::report::execute(run.as_deref(), latest, profile.as_deref()).await,
    }
}
