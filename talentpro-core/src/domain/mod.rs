//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation and derived-metric logic - no I/O or external dependencies.

pub mod import;
pub mod result;
pub mod sales;
mod schedule;
pub mod talent;

pub use import::{ImportError, ImportKind};
pub use sales::{CompanySales, FiscalMonth, MonthlySeries, SalesYear};
pub use schedule::{Lesson, ScheduleEvent};
pub use talent::{Talent, TalentStatus};
