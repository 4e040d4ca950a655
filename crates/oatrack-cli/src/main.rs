use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "oatrack")]
#[command(about = "oatrack - record, filter and browse online-assessment answers", long_about = None)]
struct Cli {
    /// Keep config and data under this directory instead of the platform defaults
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of answers
    List {
        /// Case-insensitive text matched against company, question and answer
        #[arg(long)]
        search: Option<String>,
        /// Only answers from this company
        #[arg(long)]
        company: Option<String>,
        /// Earliest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Card layout instead of a table
        #[arg(long)]
        cards: bool,
    },
    /// Add an answer
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        favorite: bool,
    },
    /// Delete an answer
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Toggle the favorite star of an answer
    Favorite { id: String },
    /// List the companies seen so far
    Companies,
    /// Write every answer to answers.json
    Export {
        /// Target directory (defaults to the data directory's exports/)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = commands::Session::open(cli.config_dir.as_deref()).await?;

    let outcome = match cli.command {
        Commands::List {
            search,
            company,
            from,
            to,
            page,
            cards,
        } => {
            let args = commands::list::ListArgs {
                search,
                company,
                from,
                to,
                page,
                cards,
            };
            commands::list::run(&session, args).await
        }
        Commands::Add {
            company,
            date,
            question,
            answer,
            favorite,
        } => {
            commands::add::run(&session, company, date, question, answer, favorite).await
        }
        Commands::Delete { id, yes } => commands::delete::run(&session, &id, yes).await,
        Commands::Favorite { id } => commands::favorite::run(&session, &id).await,
        Commands::Companies => commands::companies::run(&session).await,
        Commands::Export { out } => commands::export::run(&session, out).await,
    };

    session.close().await;
    outcome
}
