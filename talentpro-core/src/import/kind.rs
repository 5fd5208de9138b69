//! Declarative label tables per import kind
//!
//! Each import kind is described entirely by data: which keywords identify
//! its header row, and which header labels map to which semantic field.
//! Adding an import kind means adding a table here, not a new branch in the
//! pipeline.

use std::fmt;

use crate::domain::{FiscalMonth, ImportKind};

/// Default number of leading rows scanned for a header
pub const HEADER_SCAN_ROWS: usize = 30;

/// Default number of distinct keywords a header row must contain
pub const DEFAULT_MIN_KEYWORDS: usize = 3;

/// A semantic field an import can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    /// Caption column of a PL sheet ("売上高", "営業利益", ...)
    RowLabel,
    Status,
    Gender,
    Email,
    BirthDate,
    /// Derived from BirthDate, never read from a column
    Age,
    ContractDate,
    ContractEndDate,
    Rating,
    EvaluationNote,
    TotalSales,
    Month(FiscalMonth),
    Height,
    Weight,
    Bust,
    Waist,
    Hip,
    ShoeSize,
    Specialty,
    Hobby,
    BankName,
    BranchName,
    AccountType,
    AccountNumber,
    AccountHolder,
}

impl Field {
    /// Identifier matching the persisted record's camelCase keys
    pub fn key(&self) -> String {
        let key = match self {
            Field::Name => "name",
            Field::RowLabel => "label",
            Field::Status => "status",
            Field::Gender => "gender",
            Field::Email => "email",
            Field::BirthDate => "birthDate",
            Field::Age => "age",
            Field::ContractDate => "contractDate",
            Field::ContractEndDate => "contractEndDate",
            Field::Rating => "rating",
            Field::EvaluationNote => "evaluationNote",
            Field::TotalSales => "totalSales",
            Field::Month(month) => return format!("monthlySales[{}]", month.index()),
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Bust => "bust",
            Field::Waist => "waist",
            Field::Hip => "hip",
            Field::ShoeSize => "shoeSize",
            Field::Specialty => "specialty",
            Field::Hobby => "hobby",
            Field::BankName => "bankName",
            Field::BranchName => "branchName",
            Field::AccountType => "accountType",
            Field::AccountNumber => "accountNumber",
            Field::AccountHolder => "accountHolder",
        };
        key.to_string()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// How a cell is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text; `default` substitutes for an empty cell
    Text { default: &'static str },
    /// Currency or count; unparseable cells become 0
    Integer,
    /// Best-effort `YYYY-MM-DD`
    Date,
}

/// One row of a label table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub kind: FieldKind,
    /// Accepted header labels, lowercase
    pub labels: &'static [&'static str],
    /// Column to assume when no header cell matches
    pub fallback_column: Option<usize>,
}

impl FieldSpec {
    const fn text(field: Field, labels: &'static [&'static str], default: &'static str) -> Self {
        Self {
            field,
            kind: FieldKind::Text { default },
            labels,
            fallback_column: None,
        }
    }

    const fn integer(field: Field, labels: &'static [&'static str]) -> Self {
        Self {
            field,
            kind: FieldKind::Integer,
            labels,
            fallback_column: None,
        }
    }

    const fn date(field: Field, labels: &'static [&'static str]) -> Self {
        Self {
            field,
            kind: FieldKind::Date,
            labels,
            fallback_column: None,
        }
    }

    const fn or_column(self, column: usize) -> Self {
        Self {
            fallback_column: Some(column),
            ..self
        }
    }
}

/// Keywords that identify a header row
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub keywords: &'static [&'static str],
    pub min_matches: usize,
}

impl HeaderRule {
    /// Keyword list for user-facing messages
    pub fn describe(&self) -> String {
        self.keywords.join(", ")
    }
}

// ============================================================================
// Tables
// ============================================================================

static MONTH_KEYWORDS: [&str; 36] = [
    "10月", "11月", "12月", "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月",
    "oct", "nov", "dec", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep",
    "october", "november", "december", "january", "february", "march",
    "april", "june", "july", "august", "september", "sept",
];

static NAME_KEYWORDS: [&str; 3] = ["氏名", "名前", "タレント名"];

static MONTH_HEADER: HeaderRule = HeaderRule {
    keywords: &MONTH_KEYWORDS,
    min_matches: DEFAULT_MIN_KEYWORDS,
};

static PROFILE_HEADER: HeaderRule = HeaderRule {
    keywords: &NAME_KEYWORDS,
    min_matches: 1,
};

static MONTH_FIELDS: [FieldSpec; 12] = [
    FieldSpec::integer(Field::Month(FiscalMonth::Oct), &["10月", "oct", "october"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Nov), &["11月", "nov", "november"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Dec), &["12月", "dec", "december"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Jan), &["1月", "jan", "january"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Feb), &["2月", "feb", "february"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Mar), &["3月", "mar", "march"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Apr), &["4月", "apr", "april"]),
    FieldSpec::integer(Field::Month(FiscalMonth::May), &["5月", "may"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Jun), &["6月", "jun", "june"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Jul), &["7月", "jul", "july"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Aug), &["8月", "aug", "august"]),
    FieldSpec::integer(Field::Month(FiscalMonth::Sep), &["9月", "sep", "september", "sept"]),
];

static COMPANY_SALES_FIELDS: [FieldSpec; 1] = [FieldSpec::text(
    Field::RowLabel,
    &["勘定科目", "科目", "項目", "account"],
    "",
)
.or_column(0)];

static TALENT_SALES_FIELDS: [FieldSpec; 2] = [
    FieldSpec::text(Field::Name, &["氏名", "名前", "タレント名", "name"], "").or_column(0),
    FieldSpec::integer(Field::TotalSales, &["合計", "年間売上", "売上合計", "total"]),
];

static PROFILE_FIELDS: [FieldSpec; 23] = [
    FieldSpec::text(Field::Name, &["氏名", "名前", "タレント名", "name"], ""),
    FieldSpec::text(Field::Status, &["ステータス", "状態", "status"], "active"),
    FieldSpec::text(Field::Gender, &["性別", "gender"], ""),
    FieldSpec::text(Field::Email, &["メールアドレス", "メール", "email", "e-mail"], ""),
    FieldSpec::date(Field::BirthDate, &["生年月日", "誕生日", "birthday", "birth"]),
    FieldSpec::date(Field::ContractDate, &["契約開始日", "契約日", "契約開始"]),
    FieldSpec::date(Field::ContractEndDate, &["契約終了日", "契約満了日", "契約終了"]),
    FieldSpec::integer(Field::Rating, &["評価", "rating"]),
    FieldSpec::text(Field::EvaluationNote, &["評価メモ", "評価コメント", "評価備考"], "特になし"),
    FieldSpec::integer(Field::TotalSales, &["年間売上", "売上合計", "総売上", "sales"]),
    FieldSpec::text(Field::Height, &["身長", "height"], ""),
    FieldSpec::text(Field::Weight, &["体重", "weight"], ""),
    FieldSpec::text(Field::Bust, &["バスト", "bust"], ""),
    FieldSpec::text(Field::Waist, &["ウエスト", "waist"], ""),
    FieldSpec::text(Field::Hip, &["ヒップ", "hip"], ""),
    FieldSpec::text(Field::ShoeSize, &["靴のサイズ", "靴", "シューズ", "shoes"], ""),
    FieldSpec::text(Field::Specialty, &["特技", "specialty"], "なし"),
    FieldSpec::text(Field::Hobby, &["趣味", "hobby"], "なし"),
    FieldSpec::text(Field::BankName, &["銀行名", "金融機関", "bank"], ""),
    FieldSpec::text(Field::BranchName, &["支店名", "支店", "branch"], ""),
    FieldSpec::text(Field::AccountType, &["口座種別", "預金種目", "種別"], "普通"),
    FieldSpec::text(Field::AccountNumber, &["口座番号"], ""),
    FieldSpec::text(Field::AccountHolder, &["口座名義", "名義"], ""),
];

/// Everything the pipeline needs to know about one import kind
#[derive(Debug, Clone)]
pub struct ImportLayout {
    pub kind: ImportKind,
    pub header: &'static HeaderRule,
    pub fields: Vec<&'static FieldSpec>,
    /// Field checked by the row admission rule
    pub name_field: Field,
    /// Whether an empty name drops the row
    pub require_name: bool,
}

impl ImportLayout {
    pub fn for_kind(kind: ImportKind) -> Self {
        match kind {
            ImportKind::CompanySales(_) => Self {
                kind,
                header: &MONTH_HEADER,
                fields: COMPANY_SALES_FIELDS.iter().chain(MONTH_FIELDS.iter()).collect(),
                name_field: Field::RowLabel,
                require_name: false,
            },
            ImportKind::TalentSales => Self {
                kind,
                header: &MONTH_HEADER,
                fields: TALENT_SALES_FIELDS.iter().chain(MONTH_FIELDS.iter()).collect(),
                name_field: Field::Name,
                require_name: true,
            },
            ImportKind::TalentProfile => Self {
                kind,
                header: &PROFILE_HEADER,
                fields: PROFILE_FIELDS.iter().collect(),
                name_field: Field::Name,
                require_name: true,
            },
        }
    }

    pub fn spec(&self, field: Field) -> Option<&'static FieldSpec> {
        self.fields.iter().copied().find(|spec| spec.field == field)
    }

    /// Whether this layout carries a twelve-month series
    pub fn has_months(&self) -> bool {
        self.fields.iter().any(|spec| matches!(spec.field, Field::Month(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesYear;

    #[test]
    fn test_every_kind_has_a_layout() {
        for kind in ImportKind::ALL {
            let layout = ImportLayout::for_kind(kind);
            assert!(!layout.fields.is_empty());
            assert!(!layout.header.keywords.is_empty());
        }
    }

    #[test]
    fn test_month_layouts_cover_all_months() {
        let layout = ImportLayout::for_kind(ImportKind::CompanySales(SalesYear::Current));
        for month in FiscalMonth::ALL {
            assert!(layout.spec(Field::Month(month)).is_some());
        }
        assert!(layout.has_months());
        assert!(!ImportLayout::for_kind(ImportKind::TalentProfile).has_months());
    }

    #[test]
    fn test_labels_are_lowercase() {
        for kind in ImportKind::ALL {
            for spec in ImportLayout::for_kind(kind).fields {
                for label in spec.labels {
                    assert_eq!(*label, label.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::BirthDate.key(), "birthDate");
        assert_eq!(Field::Month(FiscalMonth::Oct).key(), "monthlySales[0]");
        assert_eq!(Field::Month(FiscalMonth::Sep).key(), "monthlySales[11]");
    }
}
