//! Import kinds and structural import failures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sales::SalesYear;

/// What a spreadsheet import produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "year", rename_all = "kebab-case")]
pub enum ImportKind {
    /// Company-wide monthly totals (PL sheet) for one fiscal year
    CompanySales(SalesYear),
    /// Per-talent annual and monthly sales, with a months-elapsed divisor in A1
    TalentSales,
    /// Full talent profile bulk import
    TalentProfile,
}

impl ImportKind {
    pub const ALL: [ImportKind; 4] = [
        ImportKind::CompanySales(SalesYear::Current),
        ImportKind::CompanySales(SalesYear::Previous),
        ImportKind::TalentSales,
        ImportKind::TalentProfile,
    ];

    /// Stable identifier used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::CompanySales(SalesYear::Current) => "company-sales/current",
            ImportKind::CompanySales(SalesYear::Previous) => "company-sales/previous",
            ImportKind::TalentSales => "talent-sales",
            ImportKind::TalentProfile => "talent-profile",
        }
    }

    /// Human-readable description for messages
    pub fn description(&self) -> &'static str {
        match self {
            ImportKind::CompanySales(SalesYear::Current) => "company sales (current year)",
            ImportKind::CompanySales(SalesYear::Previous) => "company sales (previous year)",
            ImportKind::TalentSales => "talent sales",
            ImportKind::TalentProfile => "talent profile",
        }
    }

    /// Only talent-sales sheets carry a months-elapsed divisor
    pub fn has_divisor(&self) -> bool {
        matches!(self, ImportKind::TalentSales)
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "company-sales" | "company-sales/current" | "pl" => {
                Ok(ImportKind::CompanySales(SalesYear::Current))
            }
            "company-sales/previous" => Ok(ImportKind::CompanySales(SalesYear::Previous)),
            "talent-sales" => Ok(ImportKind::TalentSales),
            "talent-profile" | "talents" => Ok(ImportKind::TalentProfile),
            _ => Err(format!(
                "unknown import kind '{}' (expected one of: {})",
                s,
                ImportKind::ALL.map(|k| k.as_str()).join(", ")
            )),
        }
    }
}

/// Structural import failures. Every variant aborts the whole import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Header row not found for {} import (looked for: {keywords})", .kind.description())]
    HeaderNotFound { kind: ImportKind, keywords: String },

    #[error("No data rows found after the header row for {} import", .kind.description())]
    NoDataRows { kind: ImportKind },

    #[error("Cell A1 must contain the number of months elapsed (found '{found}')")]
    InvalidDivisor { found: String },

    #[error(
        "Header row not found for {} import with either {primary} or {fallback} encoding (looked for: {keywords})",
        .kind.description()
    )]
    EncodingMismatch {
        kind: ImportKind,
        primary: String,
        fallback: String,
        keywords: String,
    },
}
