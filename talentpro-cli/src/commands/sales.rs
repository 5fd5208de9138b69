//! Sales command - company series and talent ranking

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(limit: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let overview = ctx.sales_service.overview()?;
    let ranking = ctx.sales_service.ranking(Some(limit))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "overview": overview,
                "ranking": ranking,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Company Sales".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Month", "This year", "Last year"]);
    for month in &overview.months {
        table.add_row(vec![
            month.label.to_string(),
            output::format_yen(month.current),
            output::format_yen(month.previous),
        ]);
    }
    table.add_row(vec![
        "Total".bold().to_string(),
        output::format_yen(overview.current_total),
        output::format_yen(overview.previous_total),
    ]);
    println!("{}", table);
    println!("Growth: {}", output::format_growth(overview.growth_percent));
    println!();

    println!("{}", "Talent Ranking".bold());
    if ranking.is_empty() {
        println!("No active talents with sales yet.");
        return Ok(());
    }
    let mut table = output::create_table();
    table.set_header(vec!["#", "Name", "Sales", "Monthly avg"]);
    for entry in &ranking {
        table.add_row(vec![
            entry.rank.to_string(),
            entry.name.clone(),
            output::format_yen(entry.sales),
            output::format_yen(entry.monthly_average),
        ]);
    }
    println!("{}", table);

    Ok(())
}
