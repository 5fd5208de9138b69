//! CLI command implementations

pub mod demo;
pub mod event;
pub mod import;
pub mod lesson;
pub mod logs;
pub mod sales;
pub mod status;
pub mod talent;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use talentpro_core::{EntryPoint, LogEvent, LoggingService, TalentProContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let talentpro_dir = get_talentpro_dir().ok()?;
    std::fs::create_dir_all(&talentpro_dir).ok()?;
    LoggingService::new(&talentpro_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// TalentPro directory from TALENTPRO_DIR, or ~/.talentpro
pub fn get_talentpro_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALENTPRO_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".talentpro"))
}

/// Get or create the TalentPro context
pub fn get_context() -> Result<TalentProContext> {
    let talentpro_dir = get_talentpro_dir()?;
    std::fs::create_dir_all(&talentpro_dir)
        .with_context(|| format!("Failed to create TalentPro directory: {:?}", talentpro_dir))?;

    TalentProContext::new(&talentpro_dir).context("Failed to initialize TalentPro context")
}

/// Reference date for ages, birthdays and renewals
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
