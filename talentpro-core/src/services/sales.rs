//! Sales service - company series, growth and talent ranking

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{FiscalMonth, Talent};
use crate::ports::TalentStore;

/// One fiscal month, both years side by side
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub month: FiscalMonth,
    pub label: &'static str,
    pub current: i64,
    pub previous: i64,
}

/// Company sales for both fiscal years
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub months: Vec<MonthComparison>,
    pub current_total: i64,
    pub previous_total: i64,
    pub growth_percent: f64,
}

/// A talent's place in the sales ranking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTalent {
    pub rank: usize,
    pub id: Uuid,
    pub name: String,
    pub sales: i64,
    pub monthly_average: i64,
    pub rating: u8,
}

/// Active talents ordered by annual sales, highest first
///
/// Ties keep roster order.
pub fn rank_by_sales(talents: &[Talent], limit: Option<usize>) -> Vec<RankedTalent> {
    let mut active: Vec<&Talent> = talents.iter().filter(|t| t.is_active()).collect();
    active.sort_by(|a, b| b.sales.cmp(&a.sales));
    active
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, t)| RankedTalent {
            rank: i + 1,
            id: t.id,
            name: t.name.clone(),
            sales: t.sales,
            monthly_average: t.display_monthly_average(),
            rating: t.rating,
        })
        .collect()
}

pub struct SalesService {
    store: Arc<dyn TalentStore>,
}

impl SalesService {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self { store }
    }

    pub fn overview(&self) -> Result<SalesOverview> {
        let sales = self.store.load_company_sales()?;
        let months = FiscalMonth::ALL
            .iter()
            .map(|&month| MonthComparison {
                month,
                label: month.label_ja(),
                current: sales.current.get(month),
                previous: sales.previous.get(month),
            })
            .collect();

        Ok(SalesOverview {
            months,
            current_total: sales.current.total(),
            previous_total: sales.previous.total(),
            growth_percent: sales.growth_percent(),
        })
    }

    pub fn ranking(&self, limit: Option<usize>) -> Result<Vec<RankedTalent>> {
        let talents = self.store.load_talents()?;
        Ok(rank_by_sales(&talents, limit))
    }
}
