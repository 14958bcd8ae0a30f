//! ARIMA (AutoRegressive Integrated Moving Average) forecaster
//!
//! - **AR**: coefficients from the Yule-Walker equations, solved with Levinson-Durbin
//! - **I**: the series is differenced `d` times and forecasts are integrated back
//! - **MA**: coefficients from the autocorrelation of the AR residuals
//!
//! Forecasting is recursive on the differenced scale with future shocks set to zero.

use crate::core::{Forecaster, ModelOrder, TimeSeries};
use crate::utils::error::{ForecastError, Result};

const EPSILON: f64 = 1e-10;
const MA_BOUND: f64 = 0.99;

#[derive(Debug, Clone)]
pub struct ArimaForecaster {
    order: ModelOrder,
}

/// 擬合後的模型參數
#[derive(Debug, Clone)]
pub struct FittedArima {
    order: ModelOrder,
    constant: f64,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    /// 每個差分層級（0..d）的最後一個值，用於還原原始尺度
    tails: Vec<f64>,
}

impl ArimaForecaster {
    pub fn new(order: ModelOrder) -> Result<Self> {
        let checks = [
            ("p", order.p, ModelOrder::MAX_AR),
            ("d", order.d, ModelOrder::MAX_DIFF),
            ("q", order.q, ModelOrder::MAX_MA),
        ];
        for (name, value, max) in checks {
            if value > max {
                return Err(ForecastError::InvalidConfigValueError {
                    field: format!("model.{}", name),
                    value: value.to_string(),
                    reason: format!("Order must be <= {}", max),
                });
            }
        }
        Ok(Self { order })
    }

    pub fn fit(&self, data: &[f64]) -> Result<FittedArima> {
        let ModelOrder { p, d, q } = self.order;

        let required = self.order.min_observations();
        if data.len() < required {
            return Err(ForecastError::model(format!(
                "Insufficient data for {}: need at least {} observations, got {}",
                self.order,
                required,
                data.len()
            )));
        }

        if data.iter().any(|x| !x.is_finite()) {
            return Err(ForecastError::model("Series contains NaN or infinite values"));
        }

        let mut tails = Vec::with_capacity(d);
        let mut differenced = data.to_vec();
        for _ in 0..d {
            tails.push(differenced[differenced.len() - 1]);
            differenced = differenced.windows(2).map(|w| w[1] - w[0]).collect();
        }

        let n = differenced.len();
        let constant = differenced.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = differenced.iter().map(|x| x - constant).collect();

        let ar_coeffs = yule_walker(&centered, p);

        let mut residuals = vec![0.0; n];
        for t in p..n {
            let prediction: f64 = ar_coeffs
                .iter()
                .enumerate()
                .map(|(i, phi)| phi * centered[t - i - 1])
                .sum();
            residuals[t] = centered[t] - prediction;
        }

        let ma_coeffs = residual_autocorrelation(&residuals[p..], q);

        tracing::debug!(
            "Fitted {} on {} points: constant={:.6}, ar={:?}, ma={:?}",
            self.order,
            data.len(),
            constant,
            ar_coeffs,
            ma_coeffs
        );

        Ok(FittedArima {
            order: self.order,
            constant,
            ar_coeffs,
            ma_coeffs,
            differenced,
            residuals,
            tails,
        })
    }
}

impl FittedArima {
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>> {
        if steps == 0 {
            return Err(ForecastError::model("Forecast horizon must be at least one step"));
        }

        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..steps {
            let mut next = self.constant;

            for (i, phi) in self.ar_coeffs.iter().enumerate() {
                next += phi * (extended[extended.len() - i - 1] - self.constant);
            }

            for (j, theta) in self.ma_coeffs.iter().enumerate() {
                if let Some(shock) = shocks.len().checked_sub(j + 1).map(|idx| shocks[idx]) {
                    next += theta * shock;
                }
            }

            extended.push(next);
            shocks.push(0.0);
        }

        let mut forecasts = extended.split_off(n);

        // 由最高差分層逐層累加回原始尺度
        for tail in self.tails.iter().rev() {
            let mut level = *tail;
            for value in forecasts.iter_mut() {
                level += *value;
                *value = level;
            }
        }

        if forecasts.iter().any(|x| !x.is_finite()) {
            return Err(ForecastError::model(format!(
                "{} produced a non-finite forecast",
                self.order
            )));
        }

        Ok(forecasts)
    }
}

impl Forecaster for ArimaForecaster {
    fn forecast(&self, series: &TimeSeries, steps: usize) -> Result<Vec<f64>> {
        self.fit(&series.values())?.forecast(steps)
    }
}

fn autocovariance(centered: &[f64], lag: usize) -> f64 {
    let n = centered.len();
    if lag >= n {
        return 0.0;
    }
    centered[lag..]
        .iter()
        .zip(centered)
        .map(|(a, b)| a * b)
        .sum::<f64>()
        / n as f64
}

/// Levinson-Durbin recursion over the sample autocovariances
fn yule_walker(centered: &[f64], p: usize) -> Vec<f64> {
    let mut phi = vec![0.0; p];
    if p == 0 {
        return phi;
    }

    let acov: Vec<f64> = (0..=p).map(|lag| autocovariance(centered, lag)).collect();
    if acov[0].abs() < EPSILON {
        return phi;
    }

    let mut variance = acov[0];
    for k in 0..p {
        let mut acc = acov[k + 1];
        for j in 0..k {
            acc -= phi[j] * acov[k - j];
        }

        let reflection = acc / variance;
        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }

        variance *= 1.0 - reflection * reflection;
        if variance.abs() < EPSILON {
            break;
        }
    }

    phi
}

fn residual_autocorrelation(residuals: &[f64], q: usize) -> Vec<f64> {
    let mut theta = vec![0.0; q];
    if q == 0 || residuals.is_empty() {
        return theta;
    }

    let mean = residuals.iter().sum::<f64>() / residuals.len() as f64;
    let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();
    let variance = autocovariance(&centered, 0);

    if variance.abs() > EPSILON {
        for (k, coeff) in theta.iter_mut().enumerate() {
            *coeff = (autocovariance(&centered, k + 1) / variance).clamp(-MA_BOUND, MA_BOUND);
        }
    }

    theta
}
