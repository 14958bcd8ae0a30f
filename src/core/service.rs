use crate::core::horizon::{compute_horizon, DEFAULT_MAX_HORIZON_DAYS};
use crate::core::loader::DatasetLoader;
use crate::core::series::prepare_series;
use crate::core::{
    ConfigProvider, ForecastRequest, ForecastResult, Forecaster, Predictor, Storage,
};
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub struct ForecastService<S: Storage, F: Forecaster> {
    loader: DatasetLoader<S>,
    forecaster: Arc<F>,
    max_horizon_days: usize,
}

impl<S: Storage, F: Forecaster> ForecastService<S, F> {
    pub fn new(loader: DatasetLoader<S>, forecaster: F) -> Self {
        Self {
            loader,
            forecaster: Arc::new(forecaster),
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }

    pub fn with_max_horizon_days(mut self, days: usize) -> Self {
        self.max_horizon_days = days;
        self
    }

    pub fn from_config<C: ConfigProvider>(storage: S, forecaster: F, config: &C) -> Self {
        let loader = DatasetLoader::new(
            storage,
            config.date_column().to_string(),
            config.date_formats().to_vec(),
        );
        Self::new(loader, forecaster).with_max_horizon_days(config.max_horizon_days())
    }

    pub async fn run(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        // Load
        let dataset = self.loader.load(&request.commodity).await?;

        // Prepare
        let series = prepare_series(&dataset, &request.region)?;
        tracing::debug!(
            "Prepared {} daily points for {}/{} ({:?} .. {:?})",
            series.len(),
            request.commodity,
            request.region,
            series.first_date(),
            series.last_date()
        );

        // Horizon
        let horizon = compute_horizon(&series, &request.date, self.max_horizon_days)?;
        tracing::debug!(
            "Forecasting {} steps from {} to {}",
            horizon.steps,
            horizon.last_observed,
            horizon.target_date
        );

        // Forecast（CPU 密集，放到 blocking 執行緒）
        let observations = series.len();
        let forecaster = Arc::clone(&self.forecaster);
        let steps = horizon.steps;
        let forecast = tokio::task::spawn_blocking(move || forecaster.forecast(&series, steps))
            .await
            .map_err(|e| ForecastError::internal(format!("Forecast task failed: {}", e)))??;

        let predicted_price = forecast.last().copied().ok_or_else(|| {
            ForecastError::model(format!("Forecaster returned no values for {} steps", steps))
        })?;

        Ok(ForecastResult {
            commodity: request.commodity.clone(),
            region: request.region.clone(),
            last_observed: horizon.last_observed,
            target_date: horizon.target_date,
            steps,
            observations,
            predicted_price,
        })
    }
}

#[async_trait]
impl<S: Storage, F: Forecaster> Predictor for ForecastService<S, F> {
    async fn predict(&self, request: ForecastRequest) -> Result<ForecastResult> {
        self.run(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arima::ArimaForecaster;
    use crate::core::{ModelOrder, TimeSeries};
    use crate::utils::dates::default_date_formats;
    use std::collections::HashMap;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: HashMap<String, Vec<u8>>,
    }

    impl MockStorage {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.as_bytes().to_vec());
            self
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.get(path).cloned().ok_or_else(|| {
                ForecastError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    /// 回傳 1..=steps，方便檢查取的是最後一步
    struct CountingForecaster;

    impl Forecaster for CountingForecaster {
        fn forecast(&self, _series: &TimeSeries, steps: usize) -> Result<Vec<f64>> {
            Ok((1..=steps).map(|s| s as f64).collect())
        }
    }

    struct FailingForecaster;

    impl Forecaster for FailingForecaster {
        fn forecast(&self, _series: &TimeSeries, _steps: usize) -> Result<Vec<f64>> {
            Err(ForecastError::model("did not converge"))
        }
    }

    fn wheat_csv() -> String {
        let mut csv = String::from("Date,X,Y\n");
        for day in 1..=31 {
            csv.push_str(&format!("2023-01-{:02},{},{}\n", day, 100 + day, 50));
        }
        csv
    }

    fn service<F: Forecaster>(forecaster: F) -> ForecastService<MockStorage, F> {
        let storage = MockStorage::default().with_file("wheat.csv", &wheat_csv());
        let loader = DatasetLoader::new(storage, "Date".to_string(), default_date_formats());
        ForecastService::new(loader, forecaster)
    }

    fn request(commodity: &str, region: &str, date: &str) -> ForecastRequest {
        ForecastRequest {
            commodity: commodity.to_string(),
            region: region.to_string(),
            date: date.to_string(),
        }
    }

    #[tokio::test]
    async fn test_uses_value_at_final_step() {
        let result = service(CountingForecaster)
            .run(&request("wheat", "X", "2023-02-10"))
            .await
            .unwrap();

        assert_eq!(result.steps, 10);
        assert_eq!(result.predicted_price, 10.0);
        assert_eq!(result.observations, 31);
        assert_eq!(result.last_observed.to_string(), "2023-01-31");
    }

    #[tokio::test]
    async fn test_arima_end_to_end() {
        let forecaster = ArimaForecaster::new(ModelOrder::default()).unwrap();
        let result = service(forecaster)
            .predict(request("wheat", "X", "2023-02-02"))
            .await
            .unwrap();

        // 線性序列每日 +1
        assert!((result.predicted_price - 133.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_short_circuits_on_missing_dataset() {
        let err = service(CountingForecaster)
            .run(&request("barley", "X", "2023-02-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::DatasetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_region() {
        let err = service(CountingForecaster)
            .run(&request("wheat", "Z", "2023-02-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::UnknownRegion { .. }));
    }

    #[tokio::test]
    async fn test_horizon_limit_stops_before_forecasting() {
        let err = service(FailingForecaster)
            .with_max_horizon_days(5)
            .run(&request("wheat", "X", "2023-02-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::ValidationError { .. }));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = service(FailingForecaster)
            .run(&request("wheat", "X", "2023-02-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelError { .. }));
    }
}
