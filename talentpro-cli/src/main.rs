//! TalentPro CLI - talent agency management in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{demo, event, import, lesson, logs, sales, status, talent};
use talentpro_core::ImportKind;

/// TalentPro - talent agency management in your terminal
#[derive(Parser)]
#[command(name = "tp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a spreadsheet (CSV)
    Import {
        /// company-sales/current, company-sales/previous, talent-sales or talent-profile
        kind: ImportKind,
        /// Path to CSV file
        file: PathBuf,
        /// Show the result without saving
        #[arg(long)]
        preview: bool,
        /// Read the file with this encoding only (e.g. shift_jis, utf-8)
        #[arg(long)]
        encoding: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the talent roster
    Talent {
        #[command(subcommand)]
        command: talent::TalentCommands,
    },

    /// Show company sales and the talent ranking
    Sales {
        /// Number of talents in the ranking
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        command: lesson::LessonCommands,
    },

    /// Manage schedule events
    Event {
        #[command(subcommand)]
        command: event::EventCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status { .. } => "status",
            Commands::Import { .. } => "import",
            Commands::Talent { .. } => "talent",
            Commands::Sales { .. } => "sales",
            Commands::Lesson { .. } => "lesson",
            Commands::Event { .. } => "event",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Log commands must not log themselves, or `tp logs clear` would never be empty
    if !matches!(cli.command, Commands::Logs { .. }) {
        if let Some(logger) = commands::get_logger() {
            let _ = logger.log_command(cli.command.name());
        }
    }

    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Import {
            kind,
            file,
            preview,
            encoding,
            json,
        } => import::run(kind, &file, preview, encoding, json),
        Commands::Talent { command } => talent::run(command),
        Commands::Sales { limit, json } => sales::run(limit, json),
        Commands::Lesson { command } => lesson::run(command),
        Commands::Event { command } => event::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
