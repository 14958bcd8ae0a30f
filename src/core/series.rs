//! 將資料表中某地區的欄位整理成每日、無缺值的時間序列。
//!
//! 步驟：
//! 1. 確認地區欄位存在
//! 2. 依日期去重（保留檔案中第一筆），再依日期排序
//! 3. 向前補值、向後補值，仍缺值者刪除
//! 4. 以日為頻率重新取樣，新插入的日期向前補值

use crate::core::{Dataset, SeriesPoint, TimeSeries};
use crate::utils::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "None", "-"];

pub fn prepare_series(dataset: &Dataset, region: &str) -> Result<TimeSeries> {
    let unknown_region = || ForecastError::UnknownRegion {
        region: region.to_string(),
    };

    let column = dataset.region_index(region).ok_or_else(unknown_region)?;

    let mut seen = HashSet::new();
    let mut observations: Vec<(NaiveDate, Option<f64>)> = Vec::with_capacity(dataset.rows.len());
    for (idx, row) in dataset.rows.iter().enumerate() {
        if !seen.insert(row.date) {
            continue;
        }
        let raw = row.cells.get(column).map(String::as_str).unwrap_or_default();
        let value = parse_cell(raw).map_err(|_| ForecastError::DatasetParseError {
            commodity: dataset.commodity.clone(),
            message: format!("row {}: invalid value '{}' for region '{}'", idx + 1, raw, region),
        })?;
        observations.push((row.date, value));
    }

    // 穩定排序，去重後日期唯一
    observations.sort_by_key(|(date, _)| *date);

    let filled = fill_missing(observations);
    if filled.is_empty() {
        return Err(unknown_region());
    }

    Ok(TimeSeries::from_points(resample_daily(&filled)))
}

fn parse_cell(raw: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let raw = raw.trim();
    if MISSING_MARKERS.contains(&raw) {
        return Ok(None);
    }
    let value: f64 = raw.parse()?;
    Ok(value.is_finite().then_some(value))
}

fn fill_missing(observations: Vec<(NaiveDate, Option<f64>)>) -> Vec<SeriesPoint> {
    let mut values: Vec<Option<f64>> = observations.iter().map(|(_, v)| *v).collect();

    // 向前補值
    let mut last = None;
    for value in values.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => *value = last,
        }
    }

    // 向後補值（只會影響開頭的缺值）
    let mut next = None;
    for value in values.iter_mut().rev() {
        match value {
            Some(v) => next = Some(*v),
            None => *value = next,
        }
    }

    observations
        .iter()
        .zip(values)
        .filter_map(|((date, _), value)| value.map(|value| SeriesPoint { date: *date, value }))
        .collect()
}

fn resample_daily(points: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    let days = (last.date - first.date).num_days().max(0) as usize + 1;
    let mut resampled = Vec::with_capacity(days);
    let mut source = points.iter().peekable();
    let mut carry = first.value;
    let mut date = first.date;

    while date <= last.date {
        if let Some(point) = source.next_if(|p| p.date == date) {
            carry = point.value;
        }
        resampled.push(SeriesPoint { date, value: carry });
        date += Duration::days(1);
    }

    resampled
}
