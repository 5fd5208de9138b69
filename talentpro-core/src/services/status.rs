//! Status service - dashboard summary

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Talent;
use crate::ports::TalentStore;
use crate::services::sales::{rank_by_sales, RankedTalent};

/// Number of talents shown in the dashboard ranking
pub const TOP_TALENTS: usize = 10;

/// Days ahead checked for birthdays
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

/// Dashboard summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub today: NaiveDate,
    pub current_year_sales: i64,
    pub previous_year_sales: i64,
    pub growth_percent: f64,
    pub total_talents: usize,
    pub active_talents: usize,
    pub top_talents: Vec<RankedTalent>,
    pub birthdays: Vec<BirthdayEntry>,
    pub renewals: Vec<RenewalEntry>,
    pub lessons_today: usize,
    pub upcoming_events: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayEntry {
    pub name: String,
    pub birth_date: String,
    /// Age reached on the upcoming birthday
    pub turning: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalEntry {
    pub name: String,
    pub contract_end_date: String,
}

pub struct StatusService {
    store: Arc<dyn TalentStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self { store }
    }

    /// Build the dashboard as of `today`
    pub fn get_status(&self, today: NaiveDate) -> Result<StatusSummary> {
        let talents = self.store.load_talents()?;
        let sales = self.store.load_company_sales()?;
        let day = today.format("%Y-%m-%d").to_string();
        let lessons_today = self
            .store
            .load_lessons()?
            .iter()
            .filter(|l| l.date == day)
            .count();
        let upcoming_events = self
            .store
            .load_events()?
            .iter()
            .filter(|e| e.is_upcoming(today))
            .count();

        Ok(StatusSummary {
            today,
            current_year_sales: sales.current.total(),
            previous_year_sales: sales.previous.total(),
            growth_percent: sales.growth_percent(),
            total_talents: talents.len(),
            active_talents: talents.iter().filter(|t| t.is_active()).count(),
            top_talents: rank_by_sales(&talents, Some(TOP_TALENTS)),
            birthdays: birthdays(&talents, today),
            renewals: renewals(&talents, today),
            lessons_today,
            upcoming_events,
        })
    }
}

fn birthdays(talents: &[Talent], today: NaiveDate) -> Vec<BirthdayEntry> {
    talents
        .iter()
        .filter(|t| t.has_birthday_within(today, BIRTHDAY_WINDOW_DAYS))
        .map(|t| BirthdayEntry {
            name: t.name.clone(),
            birth_date: t.birth_date.clone(),
            turning: t
                .age_on(today + chrono::Duration::days(BIRTHDAY_WINDOW_DAYS))
                .filter(|age| *age > 0),
        })
        .collect()
}

fn renewals(talents: &[Talent], today: NaiveDate) -> Vec<RenewalEntry> {
    talents
        .iter()
        .filter(|t| t.is_active() && t.needs_renewal(today))
        .map(|t| RenewalEntry {
            name: t.name.clone(),
            contract_end_date: t.contract_end_date.clone(),
        })
        .collect()
}
