//! TalentPro Core - business logic for talent agency management
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: core entities (Talent, CompanySales, Lesson, ...)
//! - **import**: the pure spreadsheet import pipeline
//! - **ports**: the `TalentStore` persistence trait
//! - **services**: business logic orchestration
//! - **adapters**: concrete implementations (DuckDB, in-memory, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod import;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::TalentStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    CompanySales, ImportError, ImportKind, Lesson, MonthlySeries, SalesYear, ScheduleEvent,
    Talent, TalentStatus,
};
pub use import::ImportOutcome;
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for TalentPro operations
///
/// Holds the configuration, the roster database and every service bound to
/// it. Demo mode selects demo.duckdb instead of talentpro.duckdb.
pub struct TalentProContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub import_service: ImportService,
    pub talent_service: TalentService,
    pub sales_service: SalesService,
    pub schedule_service: ScheduleService,
    pub status_service: StatusService,
    pub export_service: ExportService,
}

impl TalentProContext {
    pub fn new(talentpro_dir: &Path) -> Result<Self> {
        let config = Config::load(talentpro_dir)?;

        let db_path = talentpro_dir.join(config.db_filename());
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);
        repository.ensure_schema()?;

        let store: Arc<dyn TalentStore> = repository.clone();

        Ok(Self {
            import_service: ImportService::new(Arc::clone(&store), config.import.clone()),
            talent_service: TalentService::new(Arc::clone(&store)),
            sales_service: SalesService::new(Arc::clone(&store)),
            schedule_service: ScheduleService::new(Arc::clone(&store)),
            status_service: StatusService::new(Arc::clone(&store)),
            export_service: ExportService::new(store),
            config,
            repository,
        })
    }
}
