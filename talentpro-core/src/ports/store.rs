//! Store port - persistence abstraction for the roster and schedules

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{CompanySales, Lesson, ScheduleEvent, Talent};

/// Persistence capability the services depend on
///
/// The roster is saved as a whole: an import produces the full reconciled
/// collection and `save_talents` replaces the stored roster atomically.
/// Collection order is preserved, since name matching is order sensitive.
pub trait TalentStore: Send + Sync {
    // === Talents ===

    /// Load the roster in stored order
    fn load_talents(&self) -> Result<Vec<Talent>>;

    /// Replace the whole roster in one transaction
    fn save_talents(&self, talents: &[Talent]) -> Result<()>;

    /// Insert or update a single talent, appending new ones at the end
    fn upsert_talent(&self, talent: &Talent) -> Result<()>;

    /// Delete a talent, returning whether it existed
    fn delete_talent(&self, id: Uuid) -> Result<bool>;

    // === Company sales ===

    fn load_company_sales(&self) -> Result<CompanySales>;

    /// Replace both years' series
    fn save_company_sales(&self, sales: &CompanySales) -> Result<()>;

    // === Lessons ===

    fn load_lessons(&self) -> Result<Vec<Lesson>>;

    fn upsert_lesson(&self, lesson: &Lesson) -> Result<()>;

    fn delete_lesson(&self, id: Uuid) -> Result<bool>;

    // === Events ===

    fn load_events(&self) -> Result<Vec<ScheduleEvent>>;

    fn upsert_event(&self, event: &ScheduleEvent) -> Result<()>;

    fn delete_event(&self, id: Uuid) -> Result<bool>;
}
