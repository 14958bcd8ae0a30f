pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::router, storage::LocalStorage};
pub use config::AppConfig;
pub use core::{arima::ArimaForecaster, service::ForecastService};
pub use utils::error::{ForecastError, Result};
