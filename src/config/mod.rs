#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::horizon::DEFAULT_MAX_HORIZON_DAYS;
use crate::core::{ConfigProvider, ModelOrder};
use crate::utils::dates::default_date_formats;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

/// 合併預設值、TOML 檔與命令列之後的最終設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub permissive_cors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub directory: String,
    pub date_column: String,
    pub date_formats: Vec<String>,
    /// 目標日期最多可在最後一筆資料之後幾天
    pub max_horizon_days: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            permissive_cors: true,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: "./data".to_string(),
            date_column: "Date".to_string(),
            date_formats: default_date_formats(),
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            model: ModelOrder::default(),
        }
    }
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ConfigProvider for AppConfig {
    fn data_directory(&self) -> &str {
        &self.data.directory
    }

    fn date_column(&self) -> &str {
        &self.data.date_column
    }

    fn date_formats(&self) -> &[String] {
        &self.data.date_formats
    }

    fn model_order(&self) -> ModelOrder {
        self.model
    }

    fn max_horizon_days(&self) -> usize {
        self.data.max_horizon_days
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", self.server.port as usize, 1)?;

        validate_path("data.directory", &self.data.directory)?;
        validate_non_empty_string("data.date_column", &self.data.date_column)?;
        validate_positive_number("data.date_formats", self.data.date_formats.len(), 1)?;
        for format in &self.data.date_formats {
            validate_non_empty_string("data.date_formats", format)?;
        }
        validate_positive_number("data.max_horizon_days", self.data.max_horizon_days, 1)?;

        validate_range("model.p", self.model.p, 0, ModelOrder::MAX_AR)?;
        validate_range("model.d", self.model.d, 0, ModelOrder::MAX_DIFF)?;
        validate_range("model.q", self.model.q, 0, ModelOrder::MAX_MA)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.date_column(), "Date");
        assert_eq!(config.model_order(), ModelOrder::new(1, 1, 1));
        assert_eq!(config.max_horizon_days(), 3650);
        assert!(config.server.permissive_cors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.date_formats.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.model.d = 3;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.date_column = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.max_horizon_days = 0;
        assert!(config.validate().is_err());
    }
}
