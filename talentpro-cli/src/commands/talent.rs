//! Talent command - roster management

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use super::{get_context, today};
use crate::output;
use talentpro_core::services::TalentSort;
use talentpro_core::{Talent, TalentStatus};

#[derive(Subcommand)]
pub enum TalentCommands {
    /// List the roster
    List {
        /// Sort by roster, name, rating or sales
        #[arg(long, default_value = "roster")]
        sort: TalentSort,
        /// Only active talents
        #[arg(long)]
        active: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one talent by id or name
    Show {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a talent
    Add(AddArgs),
    /// Remove a talent
    Remove {
        /// Talent id or name
        query: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Record an evaluation
    Evaluate {
        /// Talent id or name
        query: String,
        /// Rating from 0 (unrated) to 5
        #[arg(long)]
        rating: u8,
        /// Evaluation note
        #[arg(long)]
        note: Option<String>,
    },
    /// Export the roster as CSV (talent-profile import layout)
    Export {
        /// Output file
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    contract_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    contract_end_date: Option<String>,
    #[arg(long)]
    inactive: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(command: TalentCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.talent_service;

    match command {
        TalentCommands::List { sort, active, json } => {
            let mut talents = service.list(sort)?;
            if active {
                talents.retain(|t| t.is_active());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&talents)?);
                return Ok(());
            }
            if talents.is_empty() {
                println!("No talents on the roster. Import a profile sheet with 'tp import talent-profile <file>'.");
                return Ok(());
            }

            let today = today();
            let mut table = output::create_table();
            table.set_header(vec!["Name", "Status", "Age", "Rating", "Sales", "Monthly avg", "Contract end"]);
            for t in &talents {
                let status = match t.status {
                    TalentStatus::Active => "active".green().to_string(),
                    TalentStatus::Inactive => "inactive".dimmed().to_string(),
                };
                let contract_end = if t.needs_renewal(today) {
                    t.contract_end_date.yellow().to_string()
                } else {
                    t.contract_end_date.clone()
                };
                table.add_row(vec![
                    t.name.clone(),
                    status,
                    t.age_on(today).map(|a| a.to_string()).unwrap_or_default(),
                    output::format_rating(t.rating),
                    output::format_yen(t.sales),
                    output::format_yen(t.display_monthly_average()),
                    contract_end,
                ]);
            }
            println!("{}", table);
            output::info(&format!("{} talents", talents.len()));
        }
        TalentCommands::Show { query, json } => {
            let talent = service.get(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&talent)?);
            } else {
                print_talent(&talent);
            }
        }
        TalentCommands::Add(args) => {
            let json = args.json;
            let mut talent = Talent::new(Uuid::new_v4(), args.name.trim());
            talent.gender = args.gender.unwrap_or_default();
            talent.email = args.email.unwrap_or_default();
            talent.birth_date = args.birth_date.unwrap_or_default();
            talent.contract_date = args.contract_date.unwrap_or_default();
            talent.contract_end_date = args.contract_end_date.unwrap_or_default();
            if args.inactive {
                talent.status = TalentStatus::Inactive;
            }

            let talent = service.add(talent)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&talent)?);
            } else {
                output::success(&format!("Added {} ({})", talent.name, talent.id));
            }
        }
        TalentCommands::Remove { query, force } => {
            let talent = service.get(&query)?;
            if !force {
                println!("\n{}", format!("This will remove '{}' from the roster.", talent.name).yellow());
                if !Confirm::new()
                    .with_prompt("Are you sure?")
                    .default(false)
                    .interact()?
                {
                    println!("{}\n", "Cancelled".dimmed());
                    return Ok(());
                }
            }
            service.remove(talent.id)?;
            output::success(&format!("Removed {}", talent.name));
        }
        TalentCommands::Evaluate { query, rating, note } => {
            let talent = service.evaluate(&query, rating, note.as_deref())?;
            output::success(&format!(
                "{}: {} {}",
                talent.name,
                output::format_rating(talent.rating),
                talent.evaluation_note
            ));
        }
        TalentCommands::Export { file } => {
            let count = ctx.export_service.export_roster(&file)?;
            output::success(&format!("Exported {} talents to {}", count, file.display()));
        }
    }

    Ok(())
}

fn print_talent(t: &Talent) {
    let today = today();
    println!("{}", t.name.bold());
    println!("  {:<16}{}", "ID", t.id.to_string().dimmed());
    println!("  {:<16}{}", "Status", t.status);
    let rows = [
        ("Gender", t.gender.clone()),
        ("Email", t.email.clone()),
        (
            "Birth date",
            match t.age_on(today) {
                Some(age) => format!("{} ({})", t.birth_date, age),
                None => t.birth_date.clone(),
            },
        ),
        ("Contract", format!("{} ~ {}", t.contract_date, t.contract_end_date)),
        ("Rating", output::format_rating(t.rating)),
        ("Evaluation", t.evaluation_note.clone()),
        ("Sales", output::format_yen(t.sales)),
        ("Monthly avg", output::format_yen(t.display_monthly_average())),
        (
            "Measurements",
            format!("{} cm / {} kg / B{} W{} H{} / {}", t.height, t.weight, t.bust, t.waist, t.hip, t.shoe_size),
        ),
        ("Specialty", t.specialty.clone()),
        ("Hobby", t.hobby.clone()),
        (
            "Bank",
            format!("{} {} {} {} {}", t.bank_name, t.branch_name, t.account_type, t.account_number, t.account_holder),
        ),
    ];
    for (label, value) in rows {
        println!("  {:<16}{}", label, value);
    }

    if t.needs_renewal(today) {
        println!();
        output::warning("Contract renewal due within 7 months");
    }
    if let Some(series) = &t.monthly_sales {
        println!();
        let mut table = output::create_table();
        table.set_header(talentpro_core::domain::FiscalMonth::ALL.map(|m| m.label_ja()).to_vec());
        table.add_row(series.as_slice().iter().map(|v| output::format_yen(*v)).collect::<Vec<_>>());
        println!("{}", table);
    }
}
