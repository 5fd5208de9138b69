//! Event command - important schedule entries per talent

use anyhow::{Context, Result};
use clap::Subcommand;
use uuid::Uuid;

use super::{get_context, today};
use crate::output;
use talentpro_core::ScheduleEvent;

#[derive(Subcommand)]
pub enum EventCommands {
    /// List events
    List {
        /// Include past events
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        #[arg(long)]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Talent name
        #[arg(long)]
        talent: String,
    },
    /// Remove an event by id
    Remove { id: String },
}

pub fn run(command: EventCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.schedule_service;

    match command {
        EventCommands::List { all, json } => {
            let events = service.events(if all { None } else { Some(today()) })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
                return Ok(());
            }
            if events.is_empty() {
                println!("No upcoming events.");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["Date", "Title", "Talent", "ID"]);
            for e in events {
                table.add_row(vec![e.date, e.title, e.talent, e.id.to_string()]);
            }
            println!("{}", table);
        }
        EventCommands::Add { title, date, talent } => {
            let event = ScheduleEvent::new(Uuid::new_v4(), title.trim(), date.trim(), talent.trim());
            let event = service.add_event(event)?;
            output::success(&format!("Added '{}' on {} ({})", event.title, event.date, event.id));
        }
        EventCommands::Remove { id } => {
            let id = Uuid::parse_str(id.trim()).context("Invalid event id")?;
            if service.remove_event(id)? {
                output::success("Event removed");
            } else {
                output::warning(&format!("Event not found: {}", id));
            }
        }
    }

    Ok(())
}
