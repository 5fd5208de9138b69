//! Status command - dashboard summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{get_context, today};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status(today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let title = if ctx.config.demo_mode {
        format!("{} {}", "TalentPro Dashboard".bold(), "(demo)".yellow())
    } else {
        "TalentPro Dashboard".bold().to_string()
    };
    println!("{}", title);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Sales this year".to_string(), output::format_yen(status.current_year_sales)]);
    table.add_row(vec!["Sales last year".to_string(), output::format_yen(status.previous_year_sales)]);
    table.add_row(vec!["Growth".to_string(), output::format_growth(status.growth_percent)]);
    table.add_row(vec![
        "Active talents".to_string(),
        format!("{} / {}", status.active_talents, status.total_talents),
    ]);
    table.add_row(vec!["Lessons today".to_string(), status.lessons_today.to_string()]);
    table.add_row(vec!["Upcoming events".to_string(), status.upcoming_events.to_string()]);
    println!("{}", table);
    println!();

    if !status.top_talents.is_empty() {
        println!("{}", "Top Talents".bold());
        let mut table = output::create_table();
        table.set_header(vec!["#", "Name", "Sales", "Rating"]);
        for entry in &status.top_talents {
            table.add_row(vec![
                entry.rank.to_string(),
                entry.name.clone(),
                output::format_yen(entry.sales),
                output::format_rating(entry.rating),
            ]);
        }
        println!("{}", table);
        println!();
    }

    if !status.birthdays.is_empty() {
        println!("{}", "Birthdays This Week".bold());
        for b in &status.birthdays {
            match b.turning {
                Some(age) => println!("  • {} ({}, turning {})", b.name, b.birth_date, age),
                None => println!("  • {} ({})", b.name, b.birth_date),
            }
        }
        println!();
    }

    if !status.renewals.is_empty() {
        println!("{}", "Contract Renewals".yellow().bold());
        for r in &status.renewals {
            println!("  • {} (ends {})", r.name, r.contract_end_date);
        }
    }

    Ok(())
}
