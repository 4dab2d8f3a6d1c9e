use anyhow::Result;
use biaslens_cli::OutputFormat;
use biaslens_cli::commands::{self, FilterArgs};
use biaslens_cli::settings::Settings;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "biaslens")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Reports on bias analyses of placement recruitment emails",
    long_about = "BiasLens reads stored bias analyses of recruitment texts and turns them into \
                  dashboards, daily trends, company breakdowns, pairwise comparisons and exports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Record store file
    #[arg(long, global = true, env = "BIASLENS_STORE", value_name = "FILE")]
    store: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/biaslens/config.json)
    #[arg(long, global = true, env = "BIASLENS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard: totals, rates, histograms, top companies and activity
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Treat this day as today when building the trend window
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
    },

    /// Show biased/clean submissions per day
    Trend {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of days in the window
        #[arg(long)]
        days: Option<usize>,

        /// Treat this day as today
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
    },

    /// Show the companies with the most analyses
    Groups {
        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum number of companies
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Compare two completed analyses
    Compare {
        /// Id of the left (earlier) analysis
        #[arg(value_name = "LEFT_ID")]
        left: String,

        /// Id of the right (later) analysis
        #[arg(value_name = "RIGHT_ID")]
        right: String,
    },

    /// Write the matching records as a new store
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export one row per analysis
    Export {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Record a submission and the classifier's reply
    Ingest {
        /// Source label, e.g. "TCS - SDE"
        #[arg(long)]
        label: String,

        /// File with the submitted text
        #[arg(long, value_name = "FILE")]
        text: PathBuf,

        /// File with the raw classifier reply
        #[arg(long, value_name = "FILE")]
        response: PathBuf,

        /// Id for the new analysis (generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Check that evidence quotes appear in the submitted texts
    Verify {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Delete analyses by id
    Delete {
        /// Ids to delete
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash: biaslens completion --shell bash >> ~/.bashrc\n  \
                            zsh:  biaslens completion --shell zsh >> ~/.zshrc")]
    Completion {
        /// Shell to generate for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if let Commands::Completion { shell } = cli.command {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let store = settings.resolve_store(cli.store)?;
    let builder = settings.report_builder();
    let format = cli.format;

    match cli.command {
        Commands::Summary { filters, as_of } => {
            commands::summary::execute(&store, &filters, &builder, as_of, format)
        }
        Commands::Trend {
            filters,
            days,
            as_of,
        } => commands::trend::execute(
            &store,
            &filters,
            days.unwrap_or(settings.trend_window_days),
            as_of,
            format,
        ),
        Commands::Groups { filters, limit } => commands::groups::execute(
            &store,
            &filters,
            limit.unwrap_or(settings.top_groups),
            format,
        ),
        Commands::Compare { left, right } => {
            commands::compare::execute(&store, &left, &right, format)
        }
        Commands::Filter { filters, output } => commands::filter::execute(&store, &filters, output),
        Commands::Export { filters } => commands::export::execute(&store, &filters, format),
        Commands::Ingest {
            label,
            text,
            response,
            id,
        } => commands::ingest::execute(
            &store,
            commands::ingest::IngestRequest {
                label: &label,
                text_file: &text,
                response_file: &response,
                id,
                submitted_at_ms: chrono::Utc::now().timestamp_millis(),
            },
            format,
        ),
        Commands::Verify { filters } => commands::verify::execute(&store, &filters, format),
        Commands::Delete { ids } => commands::delete::execute(&store, &ids).map(|_| ()),
        Commands::Completion { .. } => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("biaslens=debug,biaslens_cli=debug,biaslens_core=debug")
    } else {
        EnvFilter::new("biaslens=warn,biaslens_cli=warn,biaslens_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
