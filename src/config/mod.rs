use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{ExpenseError, Result},
    utils::{ensure_dir, PathResolver},
};
use crate::domain::{BudgetLimits, CurrencyCode};

const TMP_SUFFIX: &str = "tmp";

/// User preferences applied to every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: CurrencyCode,
    pub locale: String,
    /// Limits given to an owner that has never set a budget.
    pub default_budget: BudgetLimits,
    pub week_start: Weekday,
    pub recent_limit: usize,
    pub backup_retention: usize,
    /// Submit new expenses to the mock ledger and keep the returned reference.
    pub ledger_submission: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: "en-US".into(),
            default_budget: BudgetLimits::default(),
            week_start: Weekday::Sun,
            recent_limit: 5,
            backup_retention: 5,
            ledger_submission: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.recent_limit == 0 {
            return Err(ExpenseError::Config("recent_limit must be at least 1".into()));
        }
        if self.currency.as_str().len() != 3 {
            return Err(ExpenseError::Config(format!(
                "`{}` is not a three-letter currency code",
                self.currency
            )));
        }
        crate::core::services::BudgetService::validate_limits(&self.default_budget)
            .map_err(|err| ExpenseError::Config(format!("default_budget: {err}")))
    }
}

/// Loads and saves the configuration file under the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Returns defaults when no file exists yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| ExpenseError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.default_budget, BudgetLimits::new(25.0, 150.0, 600.0));
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            currency: CurrencyCode::new("eur"),
            week_start: Weekday::Mon,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency.as_str(), "EUR");
        assert_eq!(loaded.week_start, Weekday::Mon);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "recent_limit": 3 }"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.recent_limit, 3);
        assert_eq!(loaded.currency, CurrencyCode::default());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "recent_limit": 0 }"#).unwrap();
        assert!(matches!(manager.load(), Err(ExpenseError::Config(_))));
    }
}
