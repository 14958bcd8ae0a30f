use crate::config::AppConfig;
use crate::core::ModelOrder;
use crate::utils::error::{ForecastError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub data: Option<DataSection>,
    pub model: Option<ModelSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub permissive_cors: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSection {
    pub directory: Option<String>,
    pub date_column: Option<String>,
    pub date_formats: Option<Vec<String>>,
    pub max_horizon_days: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FORECAST_DATA_DIR})，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 將檔案中有設定的欄位覆蓋到既有配置
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.server.host = host.clone();
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(cors) = server.permissive_cors {
                config.server.permissive_cors = cors;
            }
        }

        if let Some(data) = &self.data {
            if let Some(directory) = &data.directory {
                config.data.directory = directory.clone();
            }
            if let Some(column) = &data.date_column {
                config.data.date_column = column.clone();
            }
            if let Some(formats) = &data.date_formats {
                config.data.date_formats = formats.clone();
            }
            if let Some(days) = data.max_horizon_days {
                config.data.max_horizon_days = days;
            }
        }

        if let Some(model) = &self.model {
            let current = config.model;
            config.model = ModelOrder::new(
                model.p.unwrap_or(current.p),
                model.d.unwrap_or(current.d),
                model.q.unwrap_or(current.q),
            );
        }
    }

    pub fn into_app_config(self) -> AppConfig {
        let mut config = AppConfig::default();
        self.apply_to(&mut config);
        config
    }
}
