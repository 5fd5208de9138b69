//! In-memory store
//!
//! Holds everything behind a mutex for the lifetime of the process. Used
//! for previews that must not touch disk and as a test double for services.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{CompanySales, Lesson, ScheduleEvent, Talent};
use crate::ports::TalentStore;

#[derive(Debug, Default)]
struct State {
    talents: Vec<Talent>,
    company_sales: CompanySales,
    lessons: Vec<Lesson>,
    events: Vec<ScheduleEvent>,
}

/// A [`TalentStore`] that never persists
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }
}

fn upsert_by_id<T: Clone>(items: &mut Vec<T>, item: &T, id: impl Fn(&T) -> Uuid) {
    match items.iter().position(|existing| id(existing) == id(item)) {
        Some(idx) => items[idx] = item.clone(),
        None => items.push(item.clone()),
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, target: Uuid, id: impl Fn(&T) -> Uuid) -> bool {
    let before = items.len();
    items.retain(|item| id(item) != target);
    items.len() != before
}

impl TalentStore for MemoryStore {
    fn load_talents(&self) -> Result<Vec<Talent>> {
        Ok(self.lock()?.talents.clone())
    }

    fn save_talents(&self, talents: &[Talent]) -> Result<()> {
        self.lock()?.talents = talents.to_vec();
        Ok(())
    }

    fn upsert_talent(&self, talent: &Talent) -> Result<()> {
        upsert_by_id(&mut self.lock()?.talents, talent, |t| t.id);
        Ok(())
    }

    fn delete_talent(&self, id: Uuid) -> Result<bool> {
        Ok(remove_by_id(&mut self.lock()?.talents, id, |t| t.id))
    }

    fn load_company_sales(&self) -> Result<CompanySales> {
        Ok(self.lock()?.company_sales.clone())
    }

    fn save_company_sales(&self, sales: &CompanySales) -> Result<()> {
        self.lock()?.company_sales = sales.clone();
        Ok(())
    }

    fn load_lessons(&self) -> Result<Vec<Lesson>> {
        let mut lessons = self.lock()?.lessons.clone();
        lessons.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(lessons)
    }

    fn upsert_lesson(&self, lesson: &Lesson) -> Result<()> {
        upsert_by_id(&mut self.lock()?.lessons, lesson, |l| l.id);
        Ok(())
    }

    fn delete_lesson(&self, id: Uuid) -> Result<bool> {
        Ok(remove_by_id(&mut self.lock()?.lessons, id, |l| l.id))
    }

    fn load_events(&self) -> Result<Vec<ScheduleEvent>> {
        let mut events = self.lock()?.events.clone();
        events.sort_by(|a, b| (&a.date, &a.title).cmp(&(&b.date, &b.title)));
        Ok(events)
    }

    fn upsert_event(&self, event: &ScheduleEvent) -> Result<()> {
        upsert_by_id(&mut self.lock()?.events, event, |e| e.id);
        Ok(())
    }

    fn delete_event(&self, id: Uuid) -> Result<bool> {
        Ok(remove_by_id(&mut self.lock()?.events, id, |e| e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = MemoryStore::new();
        let mut a = Talent::new(Uuid::new_v4(), "A");
        store.upsert_talent(&a).unwrap();
        store.upsert_talent(&Talent::new(Uuid::new_v4(), "B")).unwrap();

        a.rating = 5;
        store.upsert_talent(&a).unwrap();

        let talents = store.load_talents().unwrap();
        assert_eq!(talents.len(), 2);
        assert_eq!(talents[0].rating, 5);
    }

    #[test]
    fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        let lesson = Lesson::new(Uuid::new_v4(), "Dance", "2024-01-01");
        store.upsert_lesson(&lesson).unwrap();
        assert!(store.delete_lesson(lesson.id).unwrap());
        assert!(!store.delete_lesson(lesson.id).unwrap());
    }
}
