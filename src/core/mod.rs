pub mod arima;
pub mod horizon;
pub mod loader;
pub mod series;
pub mod service;

pub use crate::domain::model::{
    Dataset, DatasetRow, ForecastRequest, ForecastResult, ModelOrder, SeriesPoint, TimeSeries,
};
pub use crate::domain::ports::{ConfigProvider, Forecaster, Predictor, Storage};
pub use crate::utils::error::Result;
