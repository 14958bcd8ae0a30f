use crate::config::{AppConfig, TomlConfig};
use crate::core::ModelOrder;
use crate::utils::error::{ForecastError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "commodity-forecast")]
#[command(about = "HTTP service forecasting commodity prices per region")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "FORECAST_CONFIG")]
    pub config: Option<String>,

    #[arg(long, env = "FORECAST_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "FORECAST_PORT")]
    pub port: Option<u16>,

    /// Directory holding one <commodity>.csv per commodity
    #[arg(long, env = "FORECAST_DATA_DIR")]
    pub data_dir: Option<String>,

    #[arg(long, env = "FORECAST_DATE_COLUMN")]
    pub date_column: Option<String>,

    /// Furthest target date allowed, in days after the last observation
    #[arg(long, env = "FORECAST_MAX_HORIZON_DAYS")]
    pub max_horizon_days: Option<usize>,

    /// ARIMA order as p,d,q
    #[arg(long, value_delimiter = ',', env = "FORECAST_MODEL_ORDER")]
    pub order: Option<Vec<usize>>,

    #[arg(long, help = "Disable permissive CORS headers")]
    pub no_cors: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 預設值 < TOML 檔 < 命令列/環境變數
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.into_app_config()
            }
            None => AppConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_cors {
            config.server.permissive_cors = false;
        }
        if let Some(dir) = &self.data_dir {
            config.data.directory = dir.clone();
        }
        if let Some(column) = &self.date_column {
            config.data.date_column = column.clone();
        }
        if let Some(days) = self.max_horizon_days {
            config.data.max_horizon_days = days;
        }
        if let Some(order) = &self.order {
            config.model = parse_order(order)?;
        }

        Ok(config)
    }
}

fn parse_order(values: &[usize]) -> Result<ModelOrder> {
    match values {
        [p, d, q] => Ok(ModelOrder::new(*p, *d, *q)),
        _ => Err(ForecastError::InvalidConfigValueError {
            field: "order".to_string(),
            value: format!("{:?}", values),
            reason: "Expected three comma-separated values: p,d,q".to_string(),
        }),
    }
}
