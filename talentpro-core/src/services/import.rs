//! Import service - spreadsheet import with encoding retry and persistence
//!
//! The pipeline in `crate::import` is pure. This service is its caller: it
//! reads the file, decodes the bytes, retries once with the fallback
//! encoding when no header is found, and persists the reconciled result.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use encoding_rs::Encoding;
use serde::Serialize;

use crate::config::ImportSettings;
use crate::domain::result::Error;
use crate::domain::{ImportError, ImportKind};
use crate::import::{run_import, ImportInput, ImportOutcome, PipelineOptions};
use crate::ports::TalentStore;

/// Per-call import options
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Reference date for derived ages
    pub today: NaiveDate,
    /// Run the pipeline but do not persist
    pub preview: bool,
    /// Force a single encoding; disables the fallback retry
    pub encoding: Option<String>,
}

impl ImportOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            preview: false,
            encoding: None,
        }
    }
}

/// Result of an import, persisted or previewed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub kind: ImportKind,
    /// Encoding the sheet was successfully read with
    pub encoding: String,
    pub preview: bool,
    pub outcome: ImportOutcome,
}

/// Import service for spreadsheet imports
pub struct ImportService {
    store: Arc<dyn TalentStore>,
    settings: ImportSettings,
}

/// Decode bytes with a WHATWG encoding label
///
/// Malformed sequences become U+FFFD; a wrong guess surfaces later as a
/// missing header rather than here.
pub fn decode_bytes(bytes: &[u8], label: &str) -> Result<(String, &'static Encoding)> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::Config(format!("unknown encoding '{}'", label)))?;
    let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
    Ok((text.into_owned(), encoding))
}

impl ImportService {
    pub fn new(store: Arc<dyn TalentStore>, settings: ImportSettings) -> Self {
        Self { store, settings }
    }

    /// Import a file from disk
    pub fn import_file(
        &self,
        path: &Path,
        kind: ImportKind,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.import_bytes(&bytes, kind, options)
    }

    /// Import an in-memory buffer
    pub fn import_bytes(
        &self,
        bytes: &[u8],
        kind: ImportKind,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let talents = self.store.load_talents()?;
        let company_sales = self.store.load_company_sales()?;
        let input = ImportInput {
            talents: &talents,
            company_sales: &company_sales,
        };
        let pipeline = PipelineOptions::new(options.today)
            .with_header_scan_rows(self.settings.header_scan_rows);

        let attempt = |label: &str| -> Result<std::result::Result<(ImportOutcome, String), ImportError>> {
            let (text, encoding) = decode_bytes(bytes, label)?;
            Ok(run_import(&text, kind, input, &pipeline)
                .map(|outcome| (outcome, encoding.name().to_string())))
        };

        let result = match &options.encoding {
            Some(label) => attempt(label.as_str())?,
            None => {
                let primary = &self.settings.primary_encoding;
                let fallback = &self.settings.fallback_encoding;
                match attempt(primary.as_str())? {
                    Err(ImportError::HeaderNotFound { .. }) => match attempt(fallback.as_str())? {
                        Err(ImportError::HeaderNotFound { keywords, .. }) => Err(ImportError::EncodingMismatch {
                            kind,
                            primary: primary.clone(),
                            fallback: fallback.clone(),
                            keywords,
                        }),
                        other => other,
                    },
                    other => other,
                }
            }
        };
        let (outcome, encoding) = result?;

        if !options.preview {
            self.persist(&outcome)
                .with_context(|| format!("Failed to save {} import", kind.description()))?;
        }

        Ok(ImportResult {
            kind,
            encoding,
            preview: options.preview,
            outcome,
        })
    }

    fn persist(&self, outcome: &ImportOutcome) -> Result<()> {
        match outcome {
            ImportOutcome::CompanySales { sales, .. } => self.store.save_company_sales(sales)?,
            ImportOutcome::Talents { talents, .. } => self.store.save_talents(talents)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::{SalesYear, Talent};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn service(store: &Arc<MemoryStore>) -> ImportService {
        ImportService::new(store.clone(), ImportSettings::default())
    }

    const COMPANY_SALES: &str = "科目,10月,11月,12月,1月,2月,3月,4月,5月,6月,7月,8月,9月\n\
        売上高,\"1,000\",2000,3000,4000,5000,6000,7000,8000,9000,10000,11000,12000\n";

    fn shift_jis(text: &str) -> Vec<u8> {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(text);
        bytes.into_owned()
    }

    #[test]
    fn test_shift_jis_sheet_reads_on_first_attempt() {
        let store = Arc::new(MemoryStore::new());
        let result = service(&store)
            .import_bytes(
                &shift_jis(COMPANY_SALES),
                ImportKind::CompanySales(SalesYear::Current),
                &ImportOptions::new(today()),
            )
            .unwrap();

        assert_eq!(result.encoding, "Shift_JIS");
        let saved = store.load_company_sales().unwrap();
        assert_eq!(saved.current.total(), 78_000);
        assert_eq!(saved.previous.total(), 0);
    }

    #[test]
    fn test_utf8_sheet_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let result = service(&store)
            .import_bytes(
                COMPANY_SALES.as_bytes(),
                ImportKind::CompanySales(SalesYear::Previous),
                &ImportOptions::new(today()),
            )
            .unwrap();

        assert_eq!(result.encoding, "UTF-8");
        assert_eq!(store.load_company_sales().unwrap().previous.total(), 78_000);
    }

    #[test]
    fn test_headerless_sheet_is_encoding_mismatch() {
        let store = Arc::new(MemoryStore::new());
        let err = service(&store)
            .import_bytes(
                "a,b,c\n1,2,3\n".as_bytes(),
                ImportKind::CompanySales(SalesYear::Current),
                &ImportOptions::new(today()),
            )
            .unwrap_err();

        match err.downcast_ref::<ImportError>() {
            Some(ImportError::EncodingMismatch { kind, keywords, .. }) => {
                assert_eq!(*kind, ImportKind::CompanySales(SalesYear::Current));
                assert!(keywords.contains("10月"));
                assert!(keywords.contains("oct"));
            }
            other => panic!("expected EncodingMismatch, got {:?}", other),
        }
        assert!(err.to_string().contains("looked for: 10月"));
    }

    #[test]
    fn test_forced_encoding_skips_retry() {
        let store = Arc::new(MemoryStore::new());
        let mut options = ImportOptions::new(today());
        options.encoding = Some("utf-8".to_string());

        let err = service(&store)
            .import_bytes(
                "a,b,c\n".as_bytes(),
                ImportKind::CompanySales(SalesYear::Current),
                &options,
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::HeaderNotFound { .. })
        ));

        options.encoding = Some("klingon".to_string());
        let err = service(&store)
            .import_bytes(b"", ImportKind::TalentSales, &options)
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
    }

    #[test]
    fn test_invalid_divisor_is_not_retried() {
        let store = Arc::new(MemoryStore::new());
        let err = service(&store)
            .import_bytes(
                "x\n10月,11月,12月\n".as_bytes(),
                ImportKind::TalentSales,
                &ImportOptions::new(today()),
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::InvalidDivisor { .. })
        ));
    }

    #[test]
    fn test_preview_does_not_persist() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_talents(&[Talent::new(Uuid::new_v4(), "山田太郎")])
            .unwrap();

        let mut options = ImportOptions::new(today());
        options.preview = true;
        let text = "2\n氏名,10月,11月,12月,合計\n山田太郎,100,200,0,300\n新人,50,50,0,100\n";

        let result = service(&store)
            .import_bytes(text.as_bytes(), ImportKind::TalentSales, &options)
            .unwrap();

        let ImportOutcome::Talents { talents, summary, .. } = &result.outcome else {
            panic!("expected talents outcome");
        };
        assert_eq!(talents.len(), 2);
        assert_eq!(summary.updated, vec!["山田太郎".to_string()]);
        assert_eq!(summary.created, vec!["新人".to_string()]);

        let stored = store.load_talents().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sales, 0);
    }
}
