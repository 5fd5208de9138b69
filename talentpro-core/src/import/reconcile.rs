//! Reconciliation - merging normalized rows into the caller's collection
//!
//! Matching is by exact name or mutual containment, first existing record
//! wins. Short names can match the wrong record ("田中" matches both
//! "田中太郎" and "田中次郎"); the first one in collection order is taken.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::talent::MAX_RATING;
use crate::domain::{CompanySales, MonthlySeries, SalesYear, Talent, TalentStatus};

use super::kind::Field;
use super::normalize::{NormalizedRecord, Value};

/// Names touched by an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub updated: Vec<String>,
    pub created: Vec<String>,
}

impl ReconcileSummary {
    fn record_update(&mut self, name: &str) {
        let known = self.updated.iter().chain(&self.created).any(|n| n == name);
        if !known {
            self.updated.push(name.to_string());
        }
    }

    fn record_create(&mut self, name: &str) {
        self.created.push(name.to_string());
    }

    pub fn total(&self) -> usize {
        self.updated.len() + self.created.len()
    }
}

/// Index of the first talent whose name equals or mutually contains `name`
///
/// Both sides are trimmed. Talents with an empty name never match.
pub fn find_match(talents: &[Talent], name: &str) -> Option<usize> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    talents.iter().position(|talent| {
        let existing = talent.name.trim();
        !existing.is_empty()
            && (existing == name || existing.contains(name) || name.contains(existing))
    })
}

/// `round(total / divisor)`, halves rounded up; divisor must be positive
///
/// Computed in i128 so totals near `i64::MAX` cannot overflow.
pub fn round_average(total: i64, divisor: i64) -> i64 {
    let (total, divisor) = (i128::from(total), i128::from(divisor));
    let average = (total * 2 + divisor) / (divisor * 2);
    i64::try_from(average).unwrap_or(if average < 0 { i64::MIN } else { i64::MAX })
}

/// Find or create the talent for a record, returning its index
fn upsert(talents: &mut Vec<Talent>, summary: &mut ReconcileSummary, name: &str) -> usize {
    match find_match(talents, name) {
        Some(idx) => {
            let existing = talents[idx].name.clone();
            summary.record_update(&existing);
            idx
        }
        None => {
            talents.push(Talent::new(Uuid::new_v4(), name.trim()));
            summary.record_create(name.trim());
            talents.len() - 1
        }
    }
}

/// Apply a talent-sales import
///
/// Matched talents get `sales`, `monthly_sales` and `monthly_average`
/// overwritten. The annual total comes from the total column, or from the
/// sum of the months when the sheet has none.
pub fn merge_talent_sales(
    current: Vec<Talent>,
    records: &[NormalizedRecord],
    divisor: i64,
) -> (Vec<Talent>, ReconcileSummary) {
    let mut talents = current;
    let mut summary = ReconcileSummary::default();

    for record in records {
        let series = record.monthly_series().unwrap_or_default();
        let total = if record.has(Field::TotalSales) {
            record.integer(Field::TotalSales).unwrap_or(0)
        } else {
            series.total()
        };

        let idx = upsert(&mut talents, &mut summary, record.name());
        let talent = &mut talents[idx];
        talent.sales = total;
        talent.monthly_sales = Some(series);
        talent.monthly_average = Some(round_average(total, divisor));
        talent.touch();
    }

    (talents, summary)
}

/// Apply a talent-profile bulk import
///
/// Only fields present in the sheet are overwritten. Importing sales clears
/// the stored monthly average since there is no divisor to recompute it.
pub fn merge_profiles(
    current: Vec<Talent>,
    records: &[NormalizedRecord],
) -> (Vec<Talent>, ReconcileSummary) {
    let mut talents = current;
    let mut summary = ReconcileSummary::default();

    for record in records {
        let idx = upsert(&mut talents, &mut summary, record.name());
        apply_profile(&mut talents[idx], record);
    }

    (talents, summary)
}

fn apply_profile(talent: &mut Talent, record: &NormalizedRecord) {
    for (field, value) in record.fields() {
        let text = || value.as_text().unwrap_or("").to_string();
        match field {
            // Matched by containment, so the stored name is kept
            Field::Name | Field::RowLabel | Field::Age | Field::Month(_) => {}
            Field::Status => talent.status = TalentStatus::from_cell(value.as_text().unwrap_or("")),
            Field::Gender => talent.gender = text(),
            Field::Email => talent.email = text(),
            Field::BirthDate => talent.birth_date = text(),
            Field::ContractDate => talent.contract_date = text(),
            Field::ContractEndDate => talent.contract_end_date = text(),
            Field::Rating => {
                let rating = value.as_integer().unwrap_or(0).clamp(0, i64::from(MAX_RATING));
                talent.rating = u8::try_from(rating).unwrap_or(0);
            }
            Field::EvaluationNote => talent.evaluation_note = text(),
            Field::TotalSales => {
                talent.sales = value.as_integer().unwrap_or(0);
                talent.monthly_average = None;
            }
            Field::Height => talent.height = text(),
            Field::Weight => talent.weight = text(),
            Field::Bust => talent.bust = text(),
            Field::Waist => talent.waist = text(),
            Field::Hip => talent.hip = text(),
            Field::ShoeSize => talent.shoe_size = text(),
            Field::Specialty => talent.specialty = text(),
            Field::Hobby => talent.hobby = text(),
            Field::BankName => talent.bank_name = text(),
            Field::BranchName => talent.branch_name = text(),
            Field::AccountType => talent.account_type = text(),
            Field::AccountNumber => talent.account_number = text(),
            Field::AccountHolder => talent.account_holder = text(),
        }
    }
    talent.touch();
}

/// Replace one year's company series wholesale
pub fn replace_company_series(
    current: &CompanySales,
    year: SalesYear,
    series: MonthlySeries,
) -> CompanySales {
    let mut sales = current.clone();
    sales.replace(year, series);
    sales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FiscalMonth;

    fn talent(name: &str) -> Talent {
        Talent::new(Uuid::new_v4(), name)
    }

    fn sales_record(name: &str, total: Option<i64>, months: &[i64]) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(2);
        record.insert(Field::Name, Value::Text(name.to_string()));
        if let Some(total) = total {
            record.insert(Field::TotalSales, Value::Integer(total));
        }
        for (month, value) in FiscalMonth::ALL.iter().zip(months) {
            record.insert(Field::Month(*month), Value::Integer(*value));
        }
        record
    }

    #[test]
    fn test_find_match_exact_and_containment() {
        let talents = vec![talent("佐藤花子"), talent("山田太郎")];
        assert_eq!(find_match(&talents, "山田太郎"), Some(1));
        assert_eq!(find_match(&talents, "山田"), Some(1));
        assert_eq!(find_match(&talents, " 山田太郎（新人） "), Some(1));
        assert_eq!(find_match(&talents, "鈴木"), None);
        assert_eq!(find_match(&talents, ""), None);
    }

    #[test]
    fn test_find_match_first_wins() {
        let talents = vec![talent("田中太郎"), talent("田中次郎")];
        assert_eq!(find_match(&talents, "田中"), Some(0));
    }

    #[test]
    fn test_find_match_skips_unnamed_records() {
        let talents = vec![talent(""), talent("山田")];
        assert_eq!(find_match(&talents, "山田"), Some(1));
    }

    #[test]
    fn test_round_average() {
        assert_eq!(round_average(600, 3), 200);
        assert_eq!(round_average(100, 3), 33);
        assert_eq!(round_average(5, 2), 3);
        assert_eq!(round_average(0, 7), 0);
    }

    #[test]
    fn test_round_average_of_largest_total() {
        assert_eq!(round_average(i64::MAX, 3), 3_074_457_345_618_258_602);
        assert_eq!(round_average(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_sales_updates_contained_name() {
        let existing = talent("山田太郎");
        let id = existing.id;
        let records = vec![sales_record("山田", Some(600), &[100, 200, 300])];

        let (talents, summary) = merge_talent_sales(vec![existing], &records, 3);

        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].id, id);
        assert_eq!(talents[0].name, "山田太郎");
        assert_eq!(talents[0].sales, 600);
        assert_eq!(talents[0].monthly_average, Some(200));
        assert_eq!(talents[0].monthly_sales.unwrap().get(FiscalMonth::Dec), 300);
        assert_eq!(summary.updated, vec!["山田太郎".to_string()]);
        assert!(summary.created.is_empty());
    }

    #[test]
    fn test_sales_creates_unmatched_with_defaults() {
        let records = vec![sales_record("鈴木一郎", Some(1200), &[])];
        let (talents, summary) = merge_talent_sales(vec![talent("山田太郎")], &records, 6);

        assert_eq!(talents.len(), 2);
        let created = &talents[1];
        assert_eq!(created.name, "鈴木一郎");
        assert_eq!(created.status, TalentStatus::Active);
        assert_eq!(created.rating, 0);
        assert_eq!(created.email, "");
        assert_eq!(created.height, "");
        assert_eq!(created.monthly_average, Some(200));
        assert_eq!(summary.created, vec!["鈴木一郎".to_string()]);
    }

    #[test]
    fn test_sales_total_falls_back_to_month_sum() {
        let records = vec![sales_record("山田", None, &[100, 200, 300])];
        let (talents, _) = merge_talent_sales(Vec::new(), &records, 3);
        assert_eq!(talents[0].sales, 600);
        assert_eq!(talents[0].monthly_average, Some(200));
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let records = vec![
            sales_record("山田", Some(100), &[]),
            sales_record("山田", Some(300), &[]),
        ];
        let (talents, summary) = merge_talent_sales(Vec::new(), &records, 1);
        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].sales, 300);
        assert_eq!(summary.created, vec!["山田".to_string()]);
        assert!(summary.updated.is_empty());
    }

    #[test]
    fn test_profile_overwrites_only_present_fields() {
        let mut existing = talent("山田太郎");
        existing.email = "yamada@example.com".to_string();
        existing.monthly_average = Some(50);
        existing.rating = 2;

        let mut record = NormalizedRecord::new(1);
        record.insert(Field::Name, Value::Text("山田太郎".to_string()));
        record.insert(Field::Specialty, Value::Text("ダンス".to_string()));
        record.insert(Field::Rating, Value::Integer(9));
        record.insert(Field::TotalSales, Value::Integer(2400));
        record.insert(Field::Status, Value::Text("休止".to_string()));

        let (talents, summary) = merge_profiles(vec![existing], &[record]);

        let t = &talents[0];
        assert_eq!(t.email, "yamada@example.com");
        assert_eq!(t.specialty, "ダンス");
        assert_eq!(t.rating, 5);
        assert_eq!(t.sales, 2400);
        assert_eq!(t.monthly_average, None);
        assert_eq!(t.display_monthly_average(), 200);
        assert_eq!(t.status, TalentStatus::Inactive);
        assert_eq!(summary.updated.len(), 1);
    }

    #[test]
    fn test_profile_empty_date_clears_field() {
        let mut existing = talent("山田");
        existing.birth_date = "2000-01-01".to_string();

        let mut record = NormalizedRecord::new(1);
        record.insert(Field::Name, Value::Text("山田".to_string()));
        record.insert(Field::BirthDate, Value::Empty);
        record.insert(Field::Age, Value::Empty);

        let (talents, _) = merge_profiles(vec![existing], &[record]);
        assert_eq!(talents[0].birth_date, "");
    }

    #[test]
    fn test_company_series_replaced_wholesale() {
        let mut current = CompanySales::default();
        current.current = MonthlySeries::new([1; 12]);
        current.previous = MonthlySeries::new([7; 12]);

        let mut series = MonthlySeries::default();
        series.set(FiscalMonth::Oct, 500);
        let updated = replace_company_series(&current, SalesYear::Current, series);

        assert_eq!(updated.current.total(), 500);
        assert_eq!(updated.previous, current.previous);
    }
}
