//! Integration tests for the import workflow
//!
//! These tests run the full path a `tp import` takes: file on disk, encoding
//! retry, pipeline, and persistence into a real DuckDB file.
//!
//! Run with: cargo test --test import_workflow_test -- --nocapture

use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

use talentpro_core::services::{DemoService, ImportOptions, TalentSort};
use talentpro_core::{ImportError, ImportKind, ImportOutcome, SalesYear, Talent, TalentProContext};

// ============================================================================
// Test Helpers
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn shift_jis(text: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(text);
    bytes.into_owned()
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write sheet");
    path
}

fn open_context(dir: &TempDir) -> TalentProContext {
    TalentProContext::new(dir.path()).expect("Failed to open context")
}

const CURRENT_PL: &str = "損益計算書,,,,,,,,,,,,\n\
    科目,10月,11月,12月,1月,2月,3月,4月,5月,6月,7月,8月,9月\n\
    売上高,\"1,200,000\",1100000,1300000,900000,1000000,1000000,1000000,1000000,1000000,1000000,1000000,1000000\n\
    売上原価,500000,500000,500000,500000,500000,500000,500000,500000,500000,500000,500000,500000\n";

const TALENT_SALES: &str = "3\n\
    氏名,10月,11月,12月,合計\n\
    山田花子,\"¥100,000\",200000,300000,600000\n\
    佐藤美咲,50000,50000,0,100000\n\
    合計:,150000,250000,300000,700000\n";

// ============================================================================
// Company Sales
// ============================================================================

#[test]
fn test_company_sales_import_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let sheet = write_file(dir.path(), "pl.csv", &shift_jis(CURRENT_PL));

    {
        let ctx = open_context(&dir);
        let result = ctx
            .import_service
            .import_file(
                &sheet,
                ImportKind::CompanySales(SalesYear::Current),
                &ImportOptions::new(today()),
            )
            .unwrap();
        assert_eq!(result.encoding, "Shift_JIS");
        assert!(!result.preview);
    }

    let ctx = open_context(&dir);
    let overview = ctx.sales_service.overview().unwrap();
    assert_eq!(overview.current_total, 12_500_000);
    assert_eq!(overview.previous_total, 0);
    assert_eq!(overview.growth_percent, 0.0);
}

#[test]
fn test_both_years_give_growth() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir);
    let previous = CURRENT_PL.replace("\"1,200,000\"", "200000");

    ctx.import_service
        .import_bytes(
            CURRENT_PL.as_bytes(),
            ImportKind::CompanySales(SalesYear::Current),
            &ImportOptions::new(today()),
        )
        .unwrap();
    ctx.import_service
        .import_bytes(
            previous.as_bytes(),
            ImportKind::CompanySales(SalesYear::Previous),
            &ImportOptions::new(today()),
        )
        .unwrap();

    let overview = ctx.sales_service.overview().unwrap();
    assert_eq!(overview.current_total, 12_500_000);
    assert_eq!(overview.previous_total, 11_500_000);
    // (12.5M - 11.5M) / 11.5M = 8.695...
    assert_eq!(overview.growth_percent, 8.7);
}

// ============================================================================
// Talent Sales
// ============================================================================

#[test]
fn test_talent_sales_updates_existing_and_creates_new() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir);

    let mut existing = Talent::new(Uuid::new_v4(), "山田花子");
    existing.email = "hanako@example.com".to_string();
    existing.rating = 4;
    let existing = ctx.talent_service.add(existing).unwrap();

    let sheet = write_file(dir.path(), "talent_sales.csv", TALENT_SALES.as_bytes());
    let result = ctx
        .import_service
        .import_file(&sheet, ImportKind::TalentSales, &ImportOptions::new(today()))
        .unwrap();
    assert_eq!(result.encoding, "UTF-8");

    let ImportOutcome::Talents { summary, divisor, .. } = &result.outcome else {
        panic!("expected talents outcome");
    };
    assert_eq!(*divisor, Some(3));
    assert_eq!(summary.updated, vec!["山田花子".to_string()]);
    assert_eq!(summary.created, vec!["佐藤美咲".to_string()]);

    let roster = ctx.talent_service.list(TalentSort::Roster).unwrap();
    assert_eq!(roster.len(), 2);

    let hanako = &roster[0];
    assert_eq!(hanako.id, existing.id);
    assert_eq!(hanako.email, "hanako@example.com");
    assert_eq!(hanako.rating, 4);
    assert_eq!(hanako.sales, 600_000);
    assert_eq!(hanako.monthly_average, Some(200_000));
    let months = hanako.monthly_sales.as_ref().unwrap();
    assert_eq!(&months.as_slice()[..3], &[100_000, 200_000, 300_000]);

    let misaki = &roster[1];
    assert_eq!(misaki.name, "佐藤美咲");
    assert_eq!(misaki.rating, 0);
    assert!(misaki.is_active());
    assert_eq!(misaki.monthly_average, Some(33_333));
}

#[test]
fn test_failed_import_leaves_roster_untouched() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir);
    ctx.talent_service
        .add(Talent::new(Uuid::new_v4(), "山田花子"))
        .unwrap();

    let err = ctx
        .import_service
        .import_bytes(
            "0\n氏名,10月,11月,12月\n山田花子,1,2,3\n".as_bytes(),
            ImportKind::TalentSales,
            &ImportOptions::new(today()),
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImportError>(),
        Some(ImportError::InvalidDivisor { .. })
    ));

    let roster = ctx.talent_service.list(TalentSort::Roster).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].sales, 0);
}

#[test]
fn test_unreadable_sheet_reports_both_encodings() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir);

    let err = ctx
        .import_service
        .import_bytes(
            "no header here\n".as_bytes(),
            ImportKind::TalentProfile,
            &ImportOptions::new(today()),
        )
        .unwrap_err();

    match err.downcast_ref::<ImportError>() {
        Some(ImportError::EncodingMismatch { primary, fallback, .. }) => {
            assert_eq!(primary, "shift_jis");
            assert_eq!(fallback, "utf-8");
        }
        other => panic!("expected EncodingMismatch, got {:?}", other),
    }
}

// ============================================================================
// Profiles and Export
// ============================================================================

#[test]
fn test_profile_import_then_export_round_trips_into_new_agency() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir);

    let profile = "氏名,性別,生年月日,契約終了日,評価,特技\n\
        山田花子,女性,1998/4/3,2024/10/31,4,\n\
        鈴木一郎,男性,2001/12/25,,,ダンス\n";
    ctx.import_service
        .import_bytes(
            &shift_jis(profile),
            ImportKind::TalentProfile,
            &ImportOptions::new(today()),
        )
        .unwrap();

    let hanako = ctx.talent_service.get("山田花子").unwrap();
    assert_eq!(hanako.birth_date, "1998-04-03");
    assert_eq!(hanako.specialty, "なし");
    assert_eq!(hanako.rating, 4);
    assert_eq!(hanako.age_on(today()), Some(26));
    assert!(hanako.needs_renewal(today()));

    let export_path = dir.path().join("roster.csv");
    assert_eq!(ctx.export_service.export_roster(&export_path).unwrap(), 2);

    let other = TempDir::new().unwrap();
    let other_ctx = open_context(&other);
    other_ctx
        .import_service
        .import_file(&export_path, ImportKind::TalentProfile, &ImportOptions::new(today()))
        .unwrap();

    let copied = other_ctx.talent_service.list(TalentSort::Roster).unwrap();
    assert_eq!(copied.len(), 2);
    assert_eq!(copied[0].name, "山田花子");
    assert_eq!(copied[0].contract_end_date, "2024-10-31");
    assert_eq!(copied[1].name, "鈴木一郎");
    assert_eq!(copied[1].specialty, "ダンス");
}

// ============================================================================
// Demo Mode
// ============================================================================

#[test]
fn test_demo_mode_switches_database() {
    let dir = TempDir::new().unwrap();

    {
        let ctx = open_context(&dir);
        ctx.talent_service
            .add(Talent::new(Uuid::new_v4(), "本番タレント"))
            .unwrap();
    }

    let demo = DemoService::new(dir.path());
    demo.enable(today()).unwrap();
    assert!(dir.path().join("demo.duckdb").exists());

    {
        let ctx = open_context(&dir);
        assert!(ctx.config.demo_mode);
        let status = ctx.status_service.get_status(today()).unwrap();
        assert_eq!(status.total_talents, 15);
        assert!(ctx.talent_service.find("本番タレント").unwrap().is_none());
    }

    demo.disable(true).unwrap();
    assert!(!dir.path().join("demo.duckdb").exists());

    let ctx = open_context(&dir);
    let roster = ctx.talent_service.list(TalentSort::Roster).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "本番タレント");
}
