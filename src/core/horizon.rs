use crate::core::TimeSeries;
use crate::utils::dates::parse_date;
use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;

/// 請求日期只接受 ISO-8601（日期或日期時間）
const TARGET_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// 預設最多往後預測十年
pub const DEFAULT_MAX_HORIZON_DAYS: usize = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub last_observed: NaiveDate,
    pub target_date: NaiveDate,
    pub steps: usize,
}

pub fn parse_target_date(input: &str) -> Result<NaiveDate> {
    parse_date(input, TARGET_DATE_FORMATS)
        .ok_or_else(|| ForecastError::validation(format!("Invalid date format: {}", input)))
}

/// 步數即日曆天數，超過 `max_steps` 者拒絕，避免逐步遞迴耗盡記憶體
pub fn compute_horizon(series: &TimeSeries, target: &str, max_steps: usize) -> Result<Horizon> {
    let target_date = parse_target_date(target)?;
    let last_observed = series
        .last_date()
        .ok_or_else(|| ForecastError::validation("Series has no observations"))?;

    if target_date <= last_observed {
        return Err(ForecastError::validation(format!(
            "Prediction date must be after last available date: {}",
            last_observed.format("%Y-%m-%d")
        )));
    }

    let days = (target_date - last_observed).num_days();
    if days > i64::try_from(max_steps).unwrap_or(i64::MAX) {
        return Err(ForecastError::validation(format!(
            "Prediction date is too far ahead: {} days after {}, at most {} allowed",
            days,
            last_observed.format("%Y-%m-%d"),
            max_steps
        )));
    }

    let steps = days as usize;
    Ok(Horizon {
        last_observed,
        target_date,
        steps,
    })
}
