use crate::core::currency::{BASE_CURRENCY, CurrencyOverride, CurrencyOverrideProvider};
use crate::core::plan::Plans;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}

fn default_tier_count() -> u32 {
    15
}

fn default_departments() -> u32 {
    1
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub plans: Plans,
    /// Currency amounts are displayed in.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_tier_count")]
    pub tier_count: u32,
    #[serde(default = "default_departments")]
    pub departments: u32,
    #[serde(default)]
    pub currencies: Vec<CurrencyOverride>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "takerate", "takerate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .plans
            .validate()
            .with_context(|| format!("Invalid plans in config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

impl CurrencyOverrideProvider for AppConfig {
    fn currency_overrides(&self) -> Result<Vec<CurrencyOverride>> {
        Ok(self.currencies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
plans:
  launch:
    fixed_monthly: 99
    revenue_percentage: 0.02
  scale:
    fixed_monthly: 499
    per_department: 49
    base_take_rate: 0.015
currency: "NOK"
tier_count: 10
departments: 3
currencies:
  - code: "NOK"
    conversion_rate: 11.2
  - code: "CHF"
    symbol: "CHF"
    locale: "de-CH"
    conversion_rate: 0.88
    max_revenue: 44000000
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "NOK");
        assert_eq!(config.tier_count, 10);
        assert_eq!(config.departments, 3);
        assert_eq!(config.plans.launch.fixed_monthly, Decimal::from(99));
        assert_eq!(
            config.plans.scale.base_take_rate,
            "0.015".parse::<Decimal>().unwrap()
        );
        assert_eq!(config.currencies.len(), 2);
        assert_eq!(config.currencies[0].code, "NOK");
        assert_eq!(
            config.currencies[0].conversion_rate,
            Some("11.2".parse().unwrap())
        );
        assert!(config.currencies[0].symbol.is_none());
        assert_eq!(config.currencies[1].locale.as_deref(), Some("de-CH"));
        assert_eq!(config.currency_overrides().unwrap().len(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let yaml_str = r#"
plans:
  launch: { fixed_monthly: 99, revenue_percentage: 0.02 }
  scale: { fixed_monthly: 499, per_department: 49, base_take_rate: 0.015 }
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.tier_count, 15);
        assert_eq!(config.departments, 1);
        assert!(config.currencies.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_plans() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"
plans:
  launch: { fixed_monthly: -1, revenue_percentage: 0.02 }
  scale: { fixed_monthly: 499, per_department: 49, base_take_rate: 0.015 }
"#,
        )
        .unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid plans"));
        assert!(format!("{err:#}").contains("launch.fixed_monthly"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = AppConfig::load_from_path("/nonexistent/takerate.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
