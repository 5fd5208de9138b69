//! Demo command - sample agency for trying TalentPro without real data

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, get_talentpro_dir, today};
use crate::output;
use talentpro_core::config::Config;
use talentpro_core::services::{DemoService, TalentSort};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Switch to the sample agency (recreates demo.duckdb)
    #[command(name = "on")]
    On,
    /// Switch back to the real roster
    #[command(name = "off")]
    Off {
        /// Also delete the demo database
        #[arg(long)]
        clean: bool,
    },
    /// Show whether demo mode is active
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let talentpro_dir = get_talentpro_dir()?;
    std::fs::create_dir_all(&talentpro_dir)?;
    let demo_service = DemoService::new(&talentpro_dir);

    match command.unwrap_or(DemoCommands::Status { json: false }) {
        DemoCommands::On => {
            demo_service.enable(today())?;

            let ctx = get_context()?;
            let talents = ctx.talent_service.list(TalentSort::Roster)?;
            let lessons = ctx.schedule_service.lessons()?;
            output::success("Demo mode enabled");
            println!(
                "Seeded {} talents and {} lessons. Run 'tp status' to see the sample agency.",
                talents.len(),
                lessons.len()
            );
        }
        DemoCommands::Off { clean } => {
            demo_service.disable(clean)?;
            println!("{}", "Demo mode disabled".yellow());
            if clean {
                println!("{}", "Demo database removed".dimmed());
            }
        }
        DemoCommands::Status { json } => {
            let config = Config::load(&talentpro_dir)?;
            let enabled = config.demo_mode;
            let database = config.db_filename();

            if json {
                println!(
                    "{}",
                    serde_json::json!({ "demoMode": enabled, "database": database })
                );
            } else if enabled {
                println!("Demo mode is {} ({})", "ON".green(), database);
            } else {
                println!("Demo mode is {} ({})", "OFF".yellow(), database);
            }
        }
    }
    Ok(())
}
