//! Talent domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sales::MonthlySeries;

/// Months ahead of a contract end date at which renewal is flagged
pub const RENEWAL_ALERT_MONTHS: i32 = 7;

/// Highest evaluation rating
pub const MAX_RATING: u8 = 5;

/// Roster status of a talent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TalentStatus {
    #[default]
    Active,
    Inactive,
}

impl TalentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TalentStatus::Active => "active",
            TalentStatus::Inactive => "inactive",
        }
    }

    /// Lenient parse for spreadsheet cells; anything unrecognized is active
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "inactive" | "休止" | "退所" | "契約終了" => TalentStatus::Inactive,
            _ => TalentStatus::Active,
        }
    }
}

impl fmt::Display for TalentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TalentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(TalentStatus::Active),
            "inactive" => Ok(TalentStatus::Inactive),
            other => Err(format!("unknown talent status: {}", other)),
        }
    }
}

/// A talent on the agency roster
///
/// Dates are stored as canonical `YYYY-MM-DD` strings (or empty) because
/// spreadsheet imports pass unparseable dates through unchanged.
/// Physical measurements are free text for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talent {
    pub id: Uuid,
    pub status: TalentStatus,
    pub name: String,
    pub gender: String,
    pub email: String,
    pub birth_date: String,
    pub contract_date: String,
    pub contract_end_date: String,

    // =========================================================================
    // Evaluation
    // =========================================================================
    /// 0 = not yet rated, 1-5 otherwise
    pub rating: u8,
    pub evaluation_note: String,

    // =========================================================================
    // Sales
    // =========================================================================
    /// Annual sales to date (yen)
    pub sales: i64,
    /// Monthly sales in fiscal order, if imported
    pub monthly_sales: Option<MonthlySeries>,
    /// Monthly average from the last talent-sales import
    pub monthly_average: Option<i64>,

    // =========================================================================
    // Profile
    // =========================================================================
    pub height: String,
    pub weight: String,
    pub bust: String,
    pub waist: String,
    pub hip: String,
    pub shoe_size: String,
    pub specialty: String,
    pub hobby: String,

    // =========================================================================
    // Bank details
    // =========================================================================
    pub bank_name: String,
    pub branch_name: String,
    pub account_type: String,
    pub account_number: String,
    pub account_holder: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Talent {
    /// Create a new active talent with empty profile fields
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: TalentStatus::Active,
            name: name.into(),
            gender: String::new(),
            email: String::new(),
            birth_date: String::new(),
            contract_date: String::new(),
            contract_end_date: String::new(),
            rating: 0,
            evaluation_note: String::new(),
            sales: 0,
            monthly_sales: None,
            monthly_average: None,
            height: String::new(),
            weight: String::new(),
            bust: String::new(),
            waist: String::new(),
            hip: String::new(),
            shoe_size: String::new(),
            specialty: String::new(),
            hobby: String::new(),
            bank_name: String::new(),
            branch_name: String::new(),
            account_type: String::new(),
            account_number: String::new(),
            account_holder: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TalentStatus::Active
    }

    /// Age on the given date, or None if the birth date is empty or unparseable
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_on(&self.birth_date, today)
    }

    /// Monthly average for display
    ///
    /// Imports without a months-elapsed divisor leave `monthly_average` unset;
    /// the display fallback is the annual figure spread over twelve months.
    pub fn display_monthly_average(&self) -> i64 {
        self.monthly_average.unwrap_or(self.sales / 12)
    }

    /// True when the contract ends within the renewal alert window
    pub fn needs_renewal(&self, today: NaiveDate) -> bool {
        needs_renewal(&self.contract_end_date, today)
    }

    /// True when this year's birthday falls within the next `days` days (inclusive)
    pub fn has_birthday_within(&self, today: NaiveDate, days: i64) -> bool {
        match next_birthday(&self.birth_date, today) {
            Some(next) => (next - today).num_days() <= days,
            None => false,
        }
    }

    /// Validate talent data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("talent name cannot be empty");
        }
        if self.rating > MAX_RATING {
            return Err("rating must be between 0 and 5");
        }
        Ok(())
    }

    /// Mark the record as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Parse a canonical `YYYY-MM-DD` date
pub fn parse_canonical_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Anniversary-based age: full years, minus one before this year's birthday
///
/// Empty, unparseable, or future birth dates yield None.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let birth = parse_canonical_date(birth_date)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Contract end is between 0 and 7 months away, by calendar-month difference
pub fn needs_renewal(contract_end_date: &str, today: NaiveDate) -> bool {
    let Some(end) = parse_canonical_date(contract_end_date) else {
        return false;
    };
    let diff_months = (end.year() - today.year()) * 12 + (end.month() as i32 - today.month() as i32);
    (0..=RENEWAL_ALERT_MONTHS).contains(&diff_months)
}

/// The next occurrence of the birthday on or after `today`
fn next_birthday(birth_date: &str, today: NaiveDate) -> Option<NaiveDate> {
    let birth = parse_canonical_date(birth_date)?;
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
            // Feb 29 birthdays fall on Mar 1 in common years
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    };
    let this_year = in_year(today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        in_year(today.year() + 1)
    }
}
