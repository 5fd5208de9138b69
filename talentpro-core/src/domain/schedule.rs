//! Lesson and schedule event domain models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::talent::parse_canonical_date;

/// A scheduled lesson (acting, dance, vocal, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub location: String,
    pub instructor: String,
}

impl Lesson {
    pub fn new(id: Uuid, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            date: date.into(),
            start_time: String::new(),
            end_time: String::new(),
            lesson_type: String::new(),
            location: String::new(),
            instructor: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("lesson title cannot be empty");
        }
        if parse_canonical_date(&self.date).is_none() {
            return Err("lesson date must be YYYY-MM-DD");
        }
        if !self.start_time.is_empty()
            && !self.end_time.is_empty()
            && self.end_time < self.start_time
        {
            return Err("lesson cannot end before it starts");
        }
        Ok(())
    }

    /// Sort key: date, then start time
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.date, &self.start_time)
    }
}

/// An important schedule entry (audition, shoot, appearance) for a talent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: Uuid,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Talent name as displayed on the dashboard
    pub talent: String,
}

impl ScheduleEvent {
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        date: impl Into<String>,
        talent: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            date: date.into(),
            talent: talent.into(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("event title cannot be empty");
        }
        if parse_canonical_date(&self.date).is_none() {
            return Err("event date must be YYYY-MM-DD");
        }
        Ok(())
    }

    /// True when the event is on or after `today`
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        parse_canonical_date(&self.date).is_some_and(|d| d >= today)
    }
}
