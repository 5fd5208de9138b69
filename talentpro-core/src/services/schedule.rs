//! Schedule service - lessons and talent events

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::result::Error;
use crate::domain::{Lesson, ScheduleEvent};
use crate::ports::TalentStore;

pub struct ScheduleService {
    store: Arc<dyn TalentStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self { store }
    }

    // === Lessons ===

    /// All lessons, by date then start time
    pub fn lessons(&self) -> Result<Vec<Lesson>> {
        Ok(self.store.load_lessons()?)
    }

    /// Lessons taking place on `date`
    pub fn lessons_on(&self, date: NaiveDate) -> Result<Vec<Lesson>> {
        let day = date.format("%Y-%m-%d").to_string();
        Ok(self
            .store
            .load_lessons()?
            .into_iter()
            .filter(|l| l.date == day)
            .collect())
    }

    pub fn add_lesson(&self, lesson: Lesson) -> Result<Lesson> {
        if let Err(msg) = lesson.validate() {
            return Err(Error::validation(msg).into());
        }
        self.store.upsert_lesson(&lesson)?;
        Ok(lesson)
    }

    pub fn remove_lesson(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_lesson(id)?)
    }

    // === Events ===

    /// Events by date; past events are dropped when `upcoming_from` is set
    pub fn events(&self, upcoming_from: Option<NaiveDate>) -> Result<Vec<ScheduleEvent>> {
        let events = self.store.load_events()?;
        Ok(match upcoming_from {
            Some(today) => events.into_iter().filter(|e| e.is_upcoming(today)).collect(),
            None => events,
        })
    }

    pub fn add_event(&self, event: ScheduleEvent) -> Result<ScheduleEvent> {
        if let Err(msg) = event.validate() {
            return Err(Error::validation(msg).into());
        }
        self.store.upsert_event(&event)?;
        Ok(event)
    }

    pub fn remove_event(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_event(id)?)
    }
}
