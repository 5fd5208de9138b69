//! Spreadsheet import pipeline
//!
//! Pure and synchronous: text in, reconciled data out. Reading files,
//! choosing encodings and persisting results belong to the caller
//! (see `services::import`).
//!
//! ```text
//! text → decode → [divisor] → locate_header → ColumnMap → normalize_rows → reconcile
//! ```

pub mod columns;
pub mod decoder;
pub mod header;
pub mod kind;
pub mod normalize;
pub mod reconcile;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CompanySales, ImportError, ImportKind, MonthlySeries, SalesYear, Talent};

pub use columns::ColumnMap;
pub use decoder::{decode, RawTable};
pub use kind::{Field, ImportLayout, HEADER_SCAN_ROWS};
pub use normalize::{NormalizedRecord, Value};
pub use reconcile::ReconcileSummary;

/// Tunables for one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Reference date for derived ages
    pub today: NaiveDate,
    /// Leading rows searched for a header
    pub header_scan_rows: usize,
}

impl PipelineOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            header_scan_rows: HEADER_SCAN_ROWS,
        }
    }

    pub fn with_header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows;
        self
    }
}

/// The caller's current data, read-only
#[derive(Debug, Clone, Copy)]
pub struct ImportInput<'a> {
    pub talents: &'a [Talent],
    pub company_sales: &'a CompanySales,
}

/// A sheet that has been decoded, mapped and normalized but not reconciled
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub kind: ImportKind,
    pub table: RawTable,
    pub header_row: usize,
    pub columns: ColumnMap,
    pub records: Vec<NormalizedRecord>,
    /// Months elapsed, talent-sales only
    pub divisor: Option<i64>,
}

/// Successful import result, handed back to the caller for persistence
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ImportOutcome {
    #[serde(rename_all = "camelCase")]
    CompanySales {
        year: SalesYear,
        series: MonthlySeries,
        /// Both years, with `year` replaced
        sales: CompanySales,
    },
    #[serde(rename_all = "camelCase")]
    Talents {
        talents: Vec<Talent>,
        records: Vec<NormalizedRecord>,
        summary: ReconcileSummary,
        divisor: Option<i64>,
    },
}

/// Decode, locate the header, map columns and normalize rows
///
/// For talent-sales sheets the divisor in A1 is validated before anything
/// else, so an invalid divisor is reported even when the header is fine.
pub fn parse_records(
    text: &str,
    kind: ImportKind,
    options: &PipelineOptions,
) -> Result<ParsedSheet, ImportError> {
    let table = decode(text);
    let layout = ImportLayout::for_kind(kind);

    let divisor = if kind.has_divisor() {
        Some(normalize::read_divisor(&table)?)
    } else {
        None
    };

    let header_row = header::locate_header(&table, layout.header, options.header_scan_rows)
        .ok_or_else(|| ImportError::HeaderNotFound {
            kind,
            keywords: layout.header.describe(),
        })?;

    let header_cells = table.row(header_row).unwrap_or(&[]);
    let mut columns = ColumnMap::build(header_cells, &layout.fields);

    if kind == ImportKind::TalentSales {
        if let Some(name_column) = columns.get(Field::Name) {
            if columns.month_columns().contains(&Some(name_column)) {
                columns.shift_months_past(name_column);
            }
        }
    }

    let records = normalize::normalize_rows(&table, header_row, &columns, &layout, options.today);
    if records.is_empty() {
        return Err(ImportError::NoDataRows { kind });
    }

    Ok(ParsedSheet {
        kind,
        table,
        header_row,
        columns,
        records,
        divisor,
    })
}

/// Run the whole pipeline for one import
///
/// On error nothing is applied; the caller's data is untouched.
pub fn run_import(
    text: &str,
    kind: ImportKind,
    input: ImportInput<'_>,
    options: &PipelineOptions,
) -> Result<ImportOutcome, ImportError> {
    let sheet = parse_records(text, kind, options)?;
    reconcile_sheet(sheet, input)
}

/// Reconcile an already parsed sheet against the caller's data
pub fn reconcile_sheet(sheet: ParsedSheet, input: ImportInput<'_>) -> Result<ImportOutcome, ImportError> {
    match sheet.kind {
        ImportKind::CompanySales(year) => {
            let row = normalize::select_sales_row(&sheet.table, &sheet.columns, &sheet.records)
                .ok_or(ImportError::NoDataRows { kind: sheet.kind })?;
            let series = row.monthly_series().unwrap_or_default();
            Ok(ImportOutcome::CompanySales {
                year,
                series,
                sales: reconcile::replace_company_series(input.company_sales, year, series),
            })
        }
        ImportKind::TalentSales => {
            let divisor = sheet.divisor.ok_or(ImportError::InvalidDivisor { found: String::new() })?;
            let (talents, summary) =
                reconcile::merge_talent_sales(input.talents.to_vec(), &sheet.records, divisor);
            Ok(ImportOutcome::Talents {
                talents,
                records: sheet.records,
                summary,
                divisor: Some(divisor),
            })
        }
        ImportKind::TalentProfile => {
            let (talents, summary) = reconcile::merge_profiles(input.talents.to_vec(), &sheet.records);
            Ok(ImportOutcome::Talents {
                talents,
                records: sheet.records,
                summary,
                divisor: None,
            })
        }
    }
}
