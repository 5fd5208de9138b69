//! Configuration management
//!
//! Settings live in `<talentpro dir>/settings.json`:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "import": {
//!     "primaryEncoding": "shift_jis",
//!     "fallbackEncoding": "utf-8",
//!     "headerScanRows": 30
//!   }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::import::HEADER_SCAN_ROWS;

/// Environment variable overriding demo mode (for CI/testing)
pub const DEMO_MODE_ENV: &str = "TALENTPRO_DEMO_MODE";

const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_PRIMARY_ENCODING: &str = "shift_jis";
pub const DEFAULT_FALLBACK_ENCODING: &str = "utf-8";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    import: ImportSettingsFile,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportSettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback_encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_scan_rows: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Import pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    /// Encoding tried first (WHATWG label)
    pub primary_encoding: String,
    /// Encoding tried when the first attempt finds no header
    pub fallback_encoding: String,
    pub header_scan_rows: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            primary_encoding: DEFAULT_PRIMARY_ENCODING.to_string(),
            fallback_encoding: DEFAULT_FALLBACK_ENCODING.to_string(),
            header_scan_rows: HEADER_SCAN_ROWS,
        }
    }
}

/// TalentPro configuration (resolved view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub import: ImportSettings,
}

/// Parse a boolean environment override
fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn read_settings(dir: &Path) -> Result<SettingsFile> {
    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    // A malformed file falls back to defaults rather than blocking every command
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the TalentPro directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (`tp demo on`)
    /// 2. Environment variable TALENTPRO_DEMO_MODE
    pub fn load(dir: &Path) -> Result<Self> {
        let raw = read_settings(dir)?;
        let env_demo = std::env::var(DEMO_MODE_ENV).ok();
        Ok(Self::from_settings(raw, env_demo.as_deref()))
    }

    fn from_settings(raw: SettingsFile, env_demo: Option<&str>) -> Self {
        let defaults = ImportSettings::default();
        let import = ImportSettings {
            primary_encoding: raw.import.primary_encoding.unwrap_or(defaults.primary_encoding),
            fallback_encoding: raw.import.fallback_encoding.unwrap_or(defaults.fallback_encoding),
            header_scan_rows: raw
                .import
                .header_scan_rows
                .filter(|rows| *rows > 0)
                .unwrap_or(defaults.header_scan_rows),
        };

        Self {
            demo_mode: env_demo.and_then(parse_env_flag).unwrap_or(raw.app.demo_mode),
            import,
        }
    }

    /// Save config to the TalentPro directory
    ///
    /// Only the managed keys are rewritten; everything else in the file is kept.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let mut settings = read_settings(dir)?;

        settings.app.demo_mode = self.demo_mode;
        settings.import.primary_encoding = Some(self.import.primary_encoding.clone());
        settings.import.fallback_encoding = Some(self.import.fallback_encoding.clone());
        settings.import.header_scan_rows = Some(self.import.header_scan_rows);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// Database file for the current mode
    pub fn db_filename(&self) -> &'static str {
        if self.demo_mode {
            "demo.duckdb"
        } else {
            "talentpro.duckdb"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_settings(raw, None);

        assert!(!config.demo_mode);
        assert_eq!(config.import, ImportSettings::default());
        assert_eq!(config.import.header_scan_rows, 30);
        assert_eq!(config.db_filename(), "talentpro.duckdb");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"app":{"demoMode":false,"theme":"dark"},"import":{"headerScanRows":50},"desktop":{"window":1}}"#,
        )
        .unwrap();

        let mut config = Config::from_settings(read_settings(dir.path()).unwrap(), None);
        assert_eq!(config.import.header_scan_rows, 50);
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap())
                .unwrap();
        assert_eq!(saved["app"]["demoMode"], true);
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["desktop"]["window"], 1);
        assert_eq!(saved["import"]["primaryEncoding"], "shift_jis");
    }

    #[test]
    fn test_env_overrides_demo_mode() {
        let mut raw = SettingsFile::default();
        raw.app.demo_mode = true;

        assert!(!Config::from_settings(raw.clone(), Some("false")).demo_mode);
        assert!(Config::from_settings(raw.clone(), Some("garbage")).demo_mode);
        assert!(Config::from_settings(SettingsFile::default(), Some("YES")).demo_mode);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        let config = Config::from_settings(read_settings(dir.path()).unwrap(), None);
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_zero_scan_rows_falls_back() {
        let mut raw = SettingsFile::default();
        raw.import.header_scan_rows = Some(0);
        assert_eq!(Config::from_settings(raw, None).import.header_scan_rows, 30);
    }
}
