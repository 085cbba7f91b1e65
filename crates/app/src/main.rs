//! `quiz`: terminal front end for the quiz engine.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use quiz_core::model::TicketNumber;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod play;

use config::{Overrides, QuizConfig};

#[derive(Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz trainer")]
struct Cli {
    /// Config file path (defaults to ./quiz.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON question bank
    #[arg(long, global = true, env = "QUIZ_QUESTIONS")]
    questions: Option<PathBuf>,

    /// SQLite URL or file path for saved progress
    #[arg(long, global = true, env = "QUIZ_DB_URL")]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show question and ticket totals
    Info,

    /// List tickets with their last result
    Tickets,

    /// Practice one ticket; the result is saved
    Ticket {
        /// Ticket number, starting at 1
        number: TicketNumber,
    },

    /// Take a random exam; the result is not saved
    Exam,

    /// Report why question records are rejected
    Validate,

    /// Set or toggle the dark theme preference
    Theme {
        #[arg(long, conflicts_with = "light")]
        dark: bool,

        #[arg(long)]
        light: bool,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,quiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = QuizConfig::load(
        cli.config.as_deref(),
        Overrides {
            questions: cli.questions,
            database: cli.db,
        },
    )?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Info => commands::info(&config).await,
        Commands::Tickets => commands::tickets(&config).await,
        Commands::Ticket { number } => commands::ticket(&config, number).await,
        Commands::Exam => commands::exam(&config).await,
        Commands::Validate => commands::validate(&config),
        Commands::Theme { dark, light } => {
            let choice = match (dark, light) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::theme(&config, choice).await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
