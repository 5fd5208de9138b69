//! Header row detection

use super::decoder::RawTable;
use super::kind::HeaderRule;

/// Find the first row (within `scan_rows`) that contains enough distinct
/// header keywords
///
/// Matching is case-insensitive against the row's cells joined by tabs.
/// Rows past the scan window are never considered.
pub fn locate_header(table: &RawTable, rule: &HeaderRule, scan_rows: usize) -> Option<usize> {
    table
        .rows()
        .iter()
        .take(scan_rows)
        .position(|row| keyword_hits(row, rule.keywords) >= rule.min_matches)
}

/// Number of distinct keywords present in a row
pub fn keyword_hits(row: &[String], keywords: &[&str]) -> usize {
    let text = row.join("\t").to_lowercase();
    keywords
        .iter()
        .filter(|keyword| contains_label(&text, &keyword.to_lowercase()))
        .count()
}

/// Substring test that respects numeric and word boundaries
///
/// A label starting with a digit does not match where the preceding
/// character is also a digit, so `1月` is not found inside `11月`. A label
/// that starts or ends with an ASCII letter must not touch another ASCII
/// letter or digit on that side, so `mar` is not found inside `summary`.
/// Both arguments are expected to be lowercased already.
pub fn contains_label(haystack: &str, label: &str) -> bool {
    if label.is_empty() {
        return false;
    }
    let leading_digit = label.starts_with(|c: char| c.is_ascii_digit());
    let leading_word = label.starts_with(|c: char| c.is_ascii_alphabetic());
    let trailing_word = label.ends_with(|c: char| c.is_ascii_alphabetic());

    haystack.match_indices(label).any(|(start, _)| {
        let prev = haystack[..start].chars().next_back();
        let next = haystack[start + label.len()..].chars().next();
        let blocked_before = match prev {
            Some(c) if leading_digit => c.is_ascii_digit(),
            Some(c) if leading_word => c.is_ascii_alphanumeric(),
            _ => false,
        };
        let blocked_after = trailing_word && next.is_some_and(|c| c.is_ascii_alphanumeric());
        !blocked_before && !blocked_after
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::decoder::decode;
    use crate::import::kind::ImportLayout;
    use crate::domain::{ImportKind, SalesYear};

    fn month_rule() -> &'static HeaderRule {
        ImportLayout::for_kind(ImportKind::CompanySales(SalesYear::Current)).header
    }

    #[test]
    fn test_contains_label_digit_boundary() {
        assert!(contains_label("1月", "1月"));
        assert!(contains_label("2024年1月", "1月"));
        assert!(!contains_label("11月", "1月"));
        assert!(!contains_label("12月", "2月"));
        assert!(contains_label("10月\t11月", "11月"));
        assert!(!contains_label("anything", ""));
    }

    #[test]
    fn test_contains_label_word_boundary() {
        assert!(contains_label("oct", "oct"));
        assert!(contains_label("sales (oct)", "oct"));
        assert!(contains_label("oct-24", "oct"));
        assert!(contains_label("talent name", "name"));
        assert!(contains_label("e-mail", "e-mail"));
        assert!(!contains_label("october", "oct"));
        assert!(!contains_label("summary", "mar"));
        assert!(!contains_label("decimal", "dec"));
        assert!(!contains_label("separator", "sep"));
        assert!(!contains_label("oct2024", "oct"));
        assert!(contains_label("10月売上", "10月"));
    }

    #[test]
    fn test_words_containing_month_abbreviations_are_not_a_header() {
        let table = decode("Summary,Decimal separator,Mayor\nItem,Oct,Nov,Dec\n");
        assert_eq!(keyword_hits(&table.rows()[0], month_rule().keywords), 0);
        assert_eq!(locate_header(&table, month_rule(), 30), Some(1));
    }

    #[test]
    fn test_full_month_names_form_a_header() {
        let table = decode("Item,October,November,December\n");
        assert_eq!(locate_header(&table, month_rule(), 30), Some(0));
    }

    #[test]
    fn test_finds_month_header() {
        let table = decode("3\n10月,11月,12月,1月,2月,3月\n山田,1,2,3,4,5");
        assert_eq!(locate_header(&table, month_rule(), 30), Some(1));
    }

    #[test]
    fn test_two_months_are_not_enough() {
        let table = decode("10月,11月\n1,2");
        assert_eq!(locate_header(&table, month_rule(), 30), None);
    }

    #[test]
    fn test_english_months_case_insensitive() {
        let table = decode("Item,OCT,Nov,dec");
        assert_eq!(locate_header(&table, month_rule(), 30), Some(0));
    }

    #[test]
    fn test_header_beyond_scan_window_is_ignored() {
        let mut text = String::new();
        for i in 0..30 {
            text.push_str(&format!("note {}\n", i));
        }
        text.push_str("10月,11月,12月\n");
        let table = decode(&text);
        assert_eq!(locate_header(&table, month_rule(), 30), None);
        assert_eq!(locate_header(&table, month_rule(), 31), Some(30));
    }

    #[test]
    fn test_profile_header_single_label() {
        let rule = ImportLayout::for_kind(ImportKind::TalentProfile).header;
        let table = decode("タレント一覧\n氏名,性別,生年月日\n山田,男,2000/1/1");
        assert_eq!(locate_header(&table, rule, 30), Some(1));
    }
}
