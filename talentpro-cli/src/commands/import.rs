//! Import command - spreadsheet imports

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_event, today};
use crate::output;
use talentpro_core::import::Field;
use talentpro_core::services::{ImportOptions, ImportResult};
use talentpro_core::{Error, ImportKind, ImportOutcome, LogEvent, OperationResult, SalesYear};

/// Records shown in a talent preview table
const PREVIEW_ROWS: usize = 20;

pub fn run(
    kind: ImportKind,
    file: &Path,
    preview: bool,
    encoding: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let mut options = ImportOptions::new(today());
    options.preview = preview;
    options.encoding = encoding;

    let result = match ctx.import_service.import_file(file, kind, &options) {
        Ok(result) => result,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("import_failed")
                    .with_import_kind(kind.as_str())
                    .with_command("import")
                    .with_error(Error::code_of(&e))
                    .with_error_details(format!("{:#}", e)),
            );
            if json {
                let context = HashMap::from([
                    ("kind".to_string(), serde_json::Value::from(kind.as_str())),
                    ("file".to_string(), serde_json::Value::from(file.display().to_string())),
                ]);
                let envelope = OperationResult::<ImportResult>::from_error(&e, context);
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            }
            return Err(e);
        }
    };

    if !preview {
        log_event(
            &logger,
            LogEvent::new("import_completed")
                .with_import_kind(kind.as_str())
                .with_command("import"),
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(result))?);
        return Ok(());
    }

    print_result(&result);
    Ok(())
}

fn print_result(result: &ImportResult) {
    let verb = if result.preview { "Preview" } else { "Imported" };
    println!(
        "{} {} ({})",
        verb.bold(),
        result.kind.description(),
        result.encoding.dimmed()
    );
    println!();

    match &result.outcome {
        ImportOutcome::CompanySales { year, series, sales } => {
            let mut table = output::create_table();
            table.set_header(vec!["Month", "Amount"]);
            for month in talentpro_core::domain::FiscalMonth::ALL {
                table.add_row(vec![month.label_ja().to_string(), output::format_yen(series.get(month))]);
            }
            table.add_row(vec!["Total".to_string(), output::format_yen(series.total())]);
            println!("{}", table);

            let label = match year {
                SalesYear::Current => "current",
                SalesYear::Previous => "previous",
            };
            println!();
            println!(
                "Replaced the {} fiscal year. Growth is now {}",
                label,
                output::format_growth(sales.growth_percent())
            );
        }
        ImportOutcome::Talents {
            records,
            summary,
            divisor,
            ..
        } => {
            let mut table = output::create_table();
            table.set_header(vec!["Row", "Name", "Sales", "Status"]);
            for record in records.iter().take(PREVIEW_ROWS) {
                let state = if summary.created.iter().any(|n| n == record.name().trim()) {
                    "new".green().to_string()
                } else {
                    "update".cyan().to_string()
                };
                let sales = record
                    .integer(Field::TotalSales)
                    .or_else(|| record.monthly_series().map(|s| s.total()))
                    .map(output::format_yen)
                    .unwrap_or_default();
                table.add_row(vec![
                    (record.source_row + 1).to_string(),
                    record.name().to_string(),
                    sales,
                    state,
                ]);
            }
            println!("{}", table);
            if records.len() > PREVIEW_ROWS {
                println!("{}", format!("... and {} more rows", records.len() - PREVIEW_ROWS).dimmed());
            }

            println!();
            if let Some(divisor) = divisor {
                println!("Months elapsed: {}", divisor);
            }
            println!(
                "{} updated, {} created",
                summary.updated.len().to_string().cyan(),
                summary.created.len().to_string().green()
            );
        }
    }

    if result.preview {
        println!();
        output::warning("Preview only - nothing was saved.");
    }
}
