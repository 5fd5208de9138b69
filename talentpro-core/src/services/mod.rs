//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod demo;
mod export;
pub mod import;
pub mod logging;
pub mod migration;
pub mod sales;
mod schedule;
mod status;
mod talent;

pub use demo::DemoService;
pub use export::ExportService;
pub use import::{ImportOptions, ImportResult, ImportService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use sales::{MonthComparison, RankedTalent, SalesOverview, SalesService};
pub use schedule::ScheduleService;
pub use status::{BirthdayEntry, RenewalEntry, StatusService, StatusSummary};
pub use talent::{TalentService, TalentSort};
