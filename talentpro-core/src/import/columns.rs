//! Column mapping from header labels to semantic fields

use std::collections::BTreeMap;

use crate::domain::FiscalMonth;

use super::header::contains_label;
use super::kind::{Field, FieldSpec};

/// Semantic field → zero-based column index (None when the header lacks it)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<Field, Option<usize>>,
}

impl ColumnMap {
    /// Map every field in `specs` against the header row
    ///
    /// Labels are compared case-insensitively on trimmed cells. Exact matches
    /// are resolved first for all fields, then substring matches in field
    /// order. A column claimed by either pass is not offered to later fields.
    /// Within each pass the leftmost matching column wins. Unmatched fields fall back to their
    /// field's fixed column if it has one, otherwise they are absent.
    pub fn build(header: &[String], specs: &[&FieldSpec]) -> Self {
        let cells: Vec<String> = header.iter().map(|c| c.trim().to_lowercase()).collect();
        let mut columns = BTreeMap::new();

        for spec in specs {
            let exact = cells
                .iter()
                .position(|cell| !cell.is_empty() && spec.labels.contains(&cell.as_str()));
            columns.insert(spec.field, exact);
        }

        let mut claimed: Vec<usize> = columns.values().flatten().copied().collect();

        for spec in specs {
            if columns.get(&spec.field).copied().flatten().is_some() {
                continue;
            }
            let contained = cells.iter().enumerate().position(|(idx, cell)| {
                !claimed.contains(&idx) && spec.labels.iter().any(|label| contains_label(cell, label))
            });
            claimed.extend(contained);
            columns.insert(spec.field, contained.or(spec.fallback_column));
        }

        Self { columns }
    }

    /// Column for a field, None when absent or not part of this import
    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied().flatten()
    }

    pub fn is_mapped(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Fields present in the header, with their columns
    pub fn mapped(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.columns
            .iter()
            .filter_map(|(field, column)| column.map(|c| (*field, c)))
    }

    /// Columns of the twelve months, in fiscal order
    pub fn month_columns(&self) -> [Option<usize>; 12] {
        FiscalMonth::ALL.map(|month| self.get(Field::Month(month)))
    }

    /// Shift the month block right when it overlaps `column`
    ///
    /// Talent-sales sheets often label the months starting at column A even
    /// though column A holds the talent name. When the leftmost mapped month
    /// sits at or before `column`, every month moves right so the block begins
    /// just after it.
    pub fn shift_months_past(&mut self, column: usize) {
        let Some(first) = self.month_columns().iter().flatten().copied().min() else {
            return;
        };
        if first > column {
            return;
        }
        let offset = column - first + 1;
        for month in FiscalMonth::ALL {
            if let Some(Some(idx)) = self.columns.get_mut(&Field::Month(month)) {
                *idx += offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImportKind, SalesYear};
    use crate::import::kind::ImportLayout;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_months_map_to_fiscal_positions() {
        let layout = ImportLayout::for_kind(ImportKind::CompanySales(SalesYear::Current));
        let row = header(&[
            "科目", "10月", "11月", "12月", "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月",
        ]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::RowLabel), Some(0));
        let months = map.month_columns();
        for (position, column) in months.iter().enumerate() {
            assert_eq!(*column, Some(position + 1));
        }
    }

    #[test]
    fn test_calendar_ordered_header_still_fiscal() {
        let layout = ImportLayout::for_kind(ImportKind::CompanySales(SalesYear::Current));
        let row = header(&["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Month(FiscalMonth::Oct)), Some(9));
        assert_eq!(map.get(Field::Month(FiscalMonth::Jan)), Some(0));
        assert_eq!(map.get(Field::Month(FiscalMonth::Sep)), Some(8));
    }

    #[test]
    fn test_year_prefixed_months_do_not_cross_match() {
        let layout = ImportLayout::for_kind(ImportKind::CompanySales(SalesYear::Current));
        let row = header(&["", "2024年10月", "2024年11月", "2024年12月", "2025年1月", "2025年2月"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Month(FiscalMonth::Nov)), Some(2));
        assert_eq!(map.get(Field::Month(FiscalMonth::Jan)), Some(4));
        assert_eq!(map.get(Field::Month(FiscalMonth::Feb)), Some(5));
        assert_eq!(map.get(Field::Month(FiscalMonth::Mar)), None);
    }

    #[test]
    fn test_missing_field_is_absent_not_error() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["氏名", "性別"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Name), Some(0));
        assert_eq!(map.get(Field::Gender), Some(1));
        assert!(!map.is_mapped(Field::BankName));
    }

    #[test]
    fn test_exact_label_beats_earlier_substring() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["氏名", "評価メモ", "評価"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Rating), Some(2));
        assert_eq!(map.get(Field::EvaluationNote), Some(1));
    }

    #[test]
    fn test_exact_claim_blocks_substring_match() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["氏名", "評価メモ"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::EvaluationNote), Some(1));
        assert_eq!(map.get(Field::Rating), None);
    }

    #[test]
    fn test_substring_claim_blocks_later_field() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["氏名", "銀行名/支店名"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::BankName), Some(1));
        assert_eq!(map.get(Field::BranchName), None);
    }

    #[test]
    fn test_first_matching_column_wins() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["氏名", "メールアドレス(会社)", "メールアドレス(個人)"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Email), Some(1));
    }

    #[test]
    fn test_labels_are_trimmed_and_case_insensitive() {
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);
        let row = header(&["  NAME ", " E-Mail"]);
        let map = ColumnMap::build(&row, &layout.fields);

        assert_eq!(map.get(Field::Name), Some(0));
        assert_eq!(map.get(Field::Email), Some(1));
    }

    #[test]
    fn test_shift_months_past_name_column() {
        let layout = ImportLayout::for_kind(ImportKind::TalentSales);
        let row = header(&[
            "10月", "11月", "12月", "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "", "合計",
        ]);
        let mut map = ColumnMap::build(&row, &layout.fields);
        assert_eq!(map.get(Field::Name), Some(0));
        assert_eq!(map.get(Field::TotalSales), Some(13));

        map.shift_months_past(0);
        assert_eq!(map.get(Field::Month(FiscalMonth::Oct)), Some(1));
        assert_eq!(map.get(Field::Month(FiscalMonth::Sep)), Some(12));
        assert_eq!(map.get(Field::TotalSales), Some(13));
    }

    #[test]
    fn test_shift_is_noop_when_months_follow_name() {
        let layout = ImportLayout::for_kind(ImportKind::TalentSales);
        let row = header(&["氏名", "10月", "11月", "12月"]);
        let mut map = ColumnMap::build(&row, &layout.fields);
        map.shift_months_past(0);
        assert_eq!(map.get(Field::Month(FiscalMonth::Oct)), Some(1));
    }
}
