//! Row normalization - cell cleansing, type conversion, and row admission
//!
//! Cell-level problems never fail an import. Bad currency becomes 0, bad
//! dates pass through unchanged, and empty text takes the field default.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::talent::age_on;
use crate::domain::{FiscalMonth, ImportError, MonthlySeries};

use super::columns::ColumnMap;
use super::decoder::RawTable;
use super::kind::{Field, FieldKind, ImportLayout};

/// Characters stripped from currency cells before parsing
const CURRENCY_NOISE: [char; 4] = [',', '¥', '円', '"'];

/// Half-width and full-width colons mark legend or footnote rows
const LABEL_MARKERS: [char; 2] = [':', '：'];

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    /// Canonical `YYYY-MM-DD`, or the original text when it could not be normalized
    Date(String),
    Empty,
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// One admitted data row, keyed by semantic field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Zero-based row index in the decoded table
    pub source_row: usize,
    values: BTreeMap<Field, Value>,
}

impl NormalizedRecord {
    pub fn new(source_row: usize) -> Self {
        Self {
            source_row,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: Field, value: Value) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn has(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Text of a field, or "" when absent
    pub fn text(&self, field: Field) -> &str {
        self.get(field).and_then(Value::as_text).unwrap_or("")
    }

    pub fn integer(&self, field: Field) -> Option<i64> {
        self.get(field).and_then(Value::as_integer)
    }

    pub fn name(&self) -> &str {
        self.text(Field::Name)
    }

    /// Twelve-month series if any month column was mapped; unmapped months are 0
    pub fn monthly_series(&self) -> Option<MonthlySeries> {
        let mut series = MonthlySeries::default();
        let mut any = false;
        for month in FiscalMonth::ALL {
            if let Some(value) = self.integer(Field::Month(month)) {
                series.set(month, value);
                any = true;
            }
        }
        any.then_some(series)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &Value)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(&field.key(), value)?;
        }
        map.end()
    }
}

// ============================================================================
// Cell conversions
// ============================================================================

/// Parse the leading run of ASCII digits, ignoring surrounding whitespace
///
/// Returns None when the text does not start with a digit.
pub fn parse_leading_integer(cell: &str) -> Option<u64> {
    let trimmed = cell.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

/// Currency text to a non-negative integer; anything unparseable is 0
///
/// `"¥1,234,567"` → 1234567, `""` → 0, `"abc"` → 0.
pub fn clean_currency(cell: &str) -> i64 {
    let cleaned: String = cell.trim().chars().filter(|c| !CURRENCY_NOISE.contains(c)).collect();
    parse_leading_integer(&cleaned)
        .and_then(|n| i64::try_from(n).ok())
        .unwrap_or(0)
}

/// True when the cell holds at least one digit after currency cleanup
fn is_numeric_cell(cell: &str) -> bool {
    let cleaned: String = cell.trim().chars().filter(|c| !CURRENCY_NOISE.contains(c)).collect();
    parse_leading_integer(&cleaned).is_some()
}

fn ymd_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid date pattern"))
}

/// Best-effort date canonicalization
///
/// `"2024/3/5"` → `"2024-03-05"`. Text that does not look like
/// year-month-day is returned unchanged (trimmed).
pub fn normalize_date(cell: &str) -> String {
    let trimmed = cell.trim();
    let dashed = trimmed.replace('/', "-");
    match ymd_pattern().captures(&dashed) {
        Some(caps) => format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]),
        None => trimmed.to_string(),
    }
}

/// Rows whose name contains a colon are legends or footnotes, not data
pub fn is_label_row(name: &str) -> bool {
    name.contains(LABEL_MARKERS)
}

/// Read the months-elapsed divisor from cell A1
pub fn read_divisor(table: &RawTable) -> Result<i64, ImportError> {
    let cell = table.cell(0, 0).unwrap_or("");
    match parse_leading_integer(cell).and_then(|n| i64::try_from(n).ok()) {
        Some(divisor) if divisor > 0 => Ok(divisor),
        _ => Err(ImportError::InvalidDivisor {
            found: cell.trim().to_string(),
        }),
    }
}

/// Convert one cell according to its field kind
pub fn convert_cell(kind: FieldKind, cell: &str) -> Value {
    match kind {
        FieldKind::Integer => Value::Integer(clean_currency(cell)),
        FieldKind::Date => {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                Value::Empty
            } else {
                Value::Date(normalize_date(trimmed))
            }
        }
        FieldKind::Text { default } => {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                Value::Text(default.to_string())
            } else {
                Value::Text(trimmed.to_string())
            }
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Normalize every row after the header
///
/// A row is admitted only if its name cell (trimmed) is non-empty when the
/// layout requires a name, it has no colon in its name cell, and it is not
/// entirely blank.
pub fn normalize_rows(
    table: &RawTable,
    header_row: usize,
    columns: &ColumnMap,
    layout: &ImportLayout,
    today: NaiveDate,
) -> Vec<NormalizedRecord> {
    let mut records = Vec::new();

    for (row_idx, row) in table.rows().iter().enumerate().skip(header_row + 1) {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let name = columns
            .get(layout.name_field)
            .and_then(|c| row.get(c))
            .map(|c| c.trim())
            .unwrap_or("");
        if (layout.require_name && name.is_empty()) || is_label_row(name) {
            continue;
        }

        let mut record = NormalizedRecord::new(row_idx);
        for (field, column) in columns.mapped() {
            let Some(spec) = layout.spec(field) else {
                continue;
            };
            let cell = row.get(column).map(|c| c.as_str()).unwrap_or("");
            record.insert(field, convert_cell(spec.kind, cell));
        }

        if columns.is_mapped(Field::BirthDate) {
            let age = age_on(record.text(Field::BirthDate), today)
                .map(|a| Value::Integer(i64::from(a)))
                .unwrap_or(Value::Empty);
            record.insert(Field::Age, age);
        }

        records.push(record);
    }

    records
}

/// Pick the PL row that carries company sales
///
/// The first record mentioning 売上/sales in any cell wins; failing that, the
/// first record with a numeric value in a mapped month column.
pub fn select_sales_row<'a>(
    table: &RawTable,
    columns: &ColumnMap,
    records: &'a [NormalizedRecord],
) -> Option<&'a NormalizedRecord> {
    let row_of = |record: &NormalizedRecord| table.row(record.source_row).unwrap_or(&[]);

    let mentions_sales = |record: &&NormalizedRecord| {
        row_of(record).iter().any(|cell| {
            let lower = cell.to_lowercase();
            lower.contains("売上") || lower.contains("sales")
        })
    };
    let has_numeric_month = |record: &&NormalizedRecord| {
        let row = row_of(record);
        columns
            .month_columns()
            .iter()
            .flatten()
            .any(|&c| row.get(c).is_some_and(|cell| is_numeric_cell(cell)))
    };

    records
        .iter()
        .find(mentions_sales)
        .or_else(|| records.iter().find(has_numeric_month))
}
