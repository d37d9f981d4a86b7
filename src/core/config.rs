use crate::core::calculator::ReferenceRates;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MarketProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProvidersConfig {
    /// Rate sheet endpoint. The built-in reference sheet is used when absent.
    pub market: Option<MarketProviderConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub data_path: Option<String>,
    #[serde(default)]
    pub rates: ReferenceRates,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            data_path: None,
            rates: ReferenceRates::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "fintechora", "fintechora")
        .context("Could not determine project directories")
}

impl AppConfig {
    /// Loads the config from the default location, or defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "INR"
data_path: "/tmp/fintechora"
rates:
  savings: 3.0
  recurring_deposit: 7.25
providers:
  market:
    base_url: "http://example.com/rates"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/fintechora"));
        assert_eq!(config.rates.savings, dec!(3.0));
        assert_eq!(config.rates.recurring_deposit, dec!(7.25));
        assert_eq!(
            config.providers.market.unwrap().base_url,
            "http://example.com/rates"
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: USD\n").unwrap();
        assert_eq!(config.currency, "USD");
        assert!(config.data_path.is_none());
        assert_eq!(config.rates, ReferenceRates::default());
        assert!(config.providers.market.is_none());

        let partial: AppConfig = serde_yaml::from_str("rates:\n  savings: 2.5\n").unwrap();
        assert_eq!(partial.currency, "INR");
        assert_eq!(partial.rates.savings, dec!(2.5));
        assert_eq!(partial.rates.recurring_deposit, dec!(6.5));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_data_path_override() {
        let config = AppConfig {
            data_path: Some("/tmp/fintechora-data".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.data_path().unwrap(),
            PathBuf::from("/tmp/fintechora-data")
        );
    }
}
