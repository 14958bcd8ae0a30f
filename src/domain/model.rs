use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 單一商品的原始表格：一個日期欄位加上每個地區一欄
#[derive(Debug, Clone)]
pub struct Dataset {
    pub commodity: String,
    pub regions: Vec<String>,
    pub rows: Vec<DatasetRow>,
}

#[derive(Debug, Clone)]
pub struct DatasetRow {
    pub date: NaiveDate,
    /// 與 `Dataset::regions` 同順序的原始儲存格
    pub cells: Vec<String>,
}

impl Dataset {
    pub fn region_index(&self, region: &str) -> Option<usize> {
        let region = region.trim();
        self.regions.iter().position(|name| name == region)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// 每日一點、日期嚴格遞增且沒有缺值的序列
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// 呼叫端需保證日期嚴格遞增且逐日連續
    pub(crate) fn from_points(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// 已驗證的預測請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub commodity: String,
    pub region: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub commodity: String,
    pub region: String,
    pub last_observed: NaiveDate,
    pub target_date: NaiveDate,
    pub steps: usize,
    pub observations: usize,
    pub predicted_price: f64,
}

/// ARIMA 階數 (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ModelOrder {
    pub const MAX_AR: usize = 10;
    pub const MAX_DIFF: usize = 2;
    pub const MAX_MA: usize = 10;

    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// 擬合所需的最少觀測數
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 2
    }
}

impl Default for ModelOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl std::fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}
