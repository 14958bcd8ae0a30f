use crate::domain::model::{ForecastRequest, ForecastResult, ModelOrder, TimeSeries};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_directory(&self) -> &str;
    fn date_column(&self) -> &str;
    fn date_formats(&self) -> &[String];
    fn model_order(&self) -> ModelOrder;
    fn max_horizon_days(&self) -> usize;
}

/// 預測引擎：回傳恰好 `steps` 個逐日預測值
pub trait Forecaster: Send + Sync + 'static {
    fn forecast(&self, series: &TimeSeries, steps: usize) -> Result<Vec<f64>>;
}

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: ForecastRequest) -> Result<ForecastResult>;
}
