//! Demo service - manage demo mode
//!
//! Demo mode swaps the roster database for demo.duckdb, seeded with a
//! sample agency, so the dashboard can be explored without real data.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use crate::adapters::demo::{
    generate_demo_company_sales, generate_demo_events, generate_demo_lessons,
    generate_demo_talents,
};
use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;
use crate::ports::TalentStore;

const DEMO_DB: &str = "demo.duckdb";

/// Demo service for managing demo mode
pub struct DemoService {
    talentpro_dir: PathBuf,
}

impl DemoService {
    pub fn new(talentpro_dir: &Path) -> Self {
        Self {
            talentpro_dir: talentpro_dir.to_path_buf(),
        }
    }

    fn remove_demo_files(&self) -> Result<()> {
        for name in [DEMO_DB.to_string(), format!("{}.wal", DEMO_DB)] {
            let path = self.talentpro_dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Enable demo mode
    ///
    /// Recreates demo.duckdb from scratch, seeds it relative to `today`, and
    /// turns demo mode on in settings.
    pub fn enable(&self, today: NaiveDate) -> Result<()> {
        self.remove_demo_files()?;

        let mut config = Config::load(&self.talentpro_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.talentpro_dir)?;

        let repository = DuckDbRepository::new(&self.talentpro_dir.join(DEMO_DB))?;
        repository.ensure_schema()?;
        repository.save_talents(&generate_demo_talents(today))?;
        repository.save_company_sales(&generate_demo_company_sales())?;
        for lesson in generate_demo_lessons(today) {
            repository.upsert_lesson(&lesson)?;
        }
        for event in generate_demo_events(today) {
            repository.upsert_event(&event)?;
        }

        Ok(())
    }

    /// Disable demo mode, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.talentpro_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.talentpro_dir)?;

        if clean {
            self.remove_demo_files()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn saved_demo_flag(dir: &Path) -> bool {
        let content = std::fs::read_to_string(dir.join("settings.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        json["app"]["demoMode"].as_bool().unwrap()
    }

    #[test]
    fn test_enable_seeds_demo_database() {
        let dir = tempdir().unwrap();
        let service = DemoService::new(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        service.enable(today).unwrap();
        assert!(saved_demo_flag(dir.path()));

        let repo = DuckDbRepository::new(&dir.path().join(DEMO_DB)).unwrap();
        assert_eq!(repo.talent_count().unwrap(), 15);
        assert_eq!(repo.load_lessons().unwrap().len(), 5);
        drop(repo);

        service.disable(true).unwrap();
        assert!(!saved_demo_flag(dir.path()));
        assert!(!dir.path().join(DEMO_DB).exists());
    }
}
