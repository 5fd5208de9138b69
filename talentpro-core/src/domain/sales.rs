//! Sales domain model - fiscal months and monthly series

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A month position within the fiscal year (October through September)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FiscalMonth {
    Oct,
    Nov,
    Dec,
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
}

impl FiscalMonth {
    /// All months in fiscal order
    pub const ALL: [FiscalMonth; 12] = [
        FiscalMonth::Oct,
        FiscalMonth::Nov,
        FiscalMonth::Dec,
        FiscalMonth::Jan,
        FiscalMonth::Feb,
        FiscalMonth::Mar,
        FiscalMonth::Apr,
        FiscalMonth::May,
        FiscalMonth::Jun,
        FiscalMonth::Jul,
        FiscalMonth::Aug,
        FiscalMonth::Sep,
    ];

    /// Zero-based position in the fiscal year (Oct = 0, Sep = 11)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Calendar month number (1-12)
    pub fn calendar_month(self) -> u32 {
        ((self.index() as u32 + 9) % 12) + 1
    }

    /// Japanese spreadsheet label, e.g. "10月"
    pub fn label_ja(self) -> &'static str {
        match self {
            FiscalMonth::Oct => "10月",
            FiscalMonth::Nov => "11月",
            FiscalMonth::Dec => "12月",
            FiscalMonth::Jan => "1月",
            FiscalMonth::Feb => "2月",
            FiscalMonth::Mar => "3月",
            FiscalMonth::Apr => "4月",
            FiscalMonth::May => "5月",
            FiscalMonth::Jun => "6月",
            FiscalMonth::Jul => "7月",
            FiscalMonth::Aug => "8月",
            FiscalMonth::Sep => "9月",
        }
    }
}

/// Twelve monthly totals in fiscal order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries(pub [i64; 12]);

impl MonthlySeries {
    pub fn new(values: [i64; 12]) -> Self {
        Self(values)
    }

    /// Build a series from a slice, zero-filling or truncating to twelve entries
    pub fn from_slice(values: &[i64]) -> Self {
        let mut months = [0i64; 12];
        for (slot, value) in months.iter_mut().zip(values) {
            *slot = *value;
        }
        Self(months)
    }

    pub fn get(&self, month: FiscalMonth) -> i64 {
        self.0[month.index()]
    }

    pub fn set(&mut self, month: FiscalMonth, value: i64) {
        self.0[month.index()] = value;
    }

    /// Sum of all months, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.0.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
    }

    pub fn max(&self) -> i64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

/// Which fiscal year a company series belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesYear {
    Current,
    Previous,
}

impl SalesYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesYear::Current => "current",
            SalesYear::Previous => "previous",
        }
    }
}

impl fmt::Display for SalesYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" => Ok(SalesYear::Current),
            "previous" => Ok(SalesYear::Previous),
            other => Err(format!("unknown sales year: {}", other)),
        }
    }
}

/// Company-wide monthly sales for the current and previous fiscal year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySales {
    pub current: MonthlySeries,
    pub previous: MonthlySeries,
}

impl CompanySales {
    pub fn series(&self, year: SalesYear) -> &MonthlySeries {
        match year {
            SalesYear::Current => &self.current,
            SalesYear::Previous => &self.previous,
        }
    }

    /// Replace the whole series for one year. There is no partial merge.
    pub fn replace(&mut self, year: SalesYear, series: MonthlySeries) {
        match year {
            SalesYear::Current => self.current = series,
            SalesYear::Previous => self.previous = series,
        }
    }

    /// Year-over-year growth in percent, rounded to one decimal place
    ///
    /// Returns 0.0 when the previous year has no sales.
    pub fn growth_percent(&self) -> f64 {
        let previous = self.previous.total();
        if previous <= 0 {
            return 0.0;
        }
        let current = self.current.total();
        let growth = (i128::from(current) - i128::from(previous)) as f64 / previous as f64 * 100.0;
        (growth * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiscal_order() {
        assert_eq!(FiscalMonth::Oct.index(), 0);
        assert_eq!(FiscalMonth::Sep.index(), 11);
        assert_eq!(FiscalMonth::Oct.calendar_month(), 10);
        assert_eq!(FiscalMonth::Jan.calendar_month(), 1);
        assert_eq!(FiscalMonth::Sep.calendar_month(), 9);
    }

    #[test]
    fn test_series_from_short_slice_zero_fills() {
        let series = MonthlySeries::from_slice(&[1, 2, 3]);
        assert_eq!(series.0, [1, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(series.total(), 6);
    }

    #[test]
    fn test_replace_is_whole_series() {
        let mut sales = CompanySales {
            current: MonthlySeries::new([5; 12]),
            previous: MonthlySeries::new([7; 12]),
        };
        sales.replace(SalesYear::Current, MonthlySeries::from_slice(&[1]));
        assert_eq!(sales.current.total(), 1);
        assert_eq!(sales.previous.total(), 84);
    }

    #[test]
    fn test_growth_percent() {
        let sales = CompanySales {
            current: MonthlySeries::from_slice(&[1100]),
            previous: MonthlySeries::from_slice(&[1000]),
        };
        assert_eq!(sales.growth_percent(), 10.0);

        let empty = CompanySales::default();
        assert_eq!(empty.growth_percent(), 0.0);
    }

    #[test]
    fn test_total_saturates_on_huge_months() {
        let series = MonthlySeries::from_slice(&[9_000_000_000_000_000_000, 9_000_000_000_000_000_000, 5]);
        assert_eq!(series.total(), i64::MAX);

        let sales = CompanySales {
            current: series,
            previous: MonthlySeries::from_slice(&[1]),
        };
        assert!(sales.growth_percent() > 0.0);
    }
}
