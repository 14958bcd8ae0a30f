use crate::core::{Dataset, DatasetRow, Storage};
use crate::utils::dates::parse_date;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::validate_file_stem;

pub struct DatasetLoader<S: Storage> {
    storage: S,
    date_column: String,
    date_formats: Vec<String>,
}

impl<S: Storage> DatasetLoader<S> {
    pub fn new(storage: S, date_column: String, date_formats: Vec<String>) -> Self {
        Self {
            storage,
            date_column,
            date_formats,
        }
    }

    pub fn file_name(commodity: &str) -> String {
        format!("{}.csv", commodity)
    }

    /// 讀取 `<commodity>.csv` 並解析日期欄位
    pub async fn load(&self, commodity: &str) -> Result<Dataset> {
        validate_file_stem("commodity", commodity)?;

        let file_name = Self::file_name(commodity);
        tracing::debug!("Reading dataset file: {}", file_name);

        let bytes = self
            .storage
            .read_file(&file_name)
            .await
            .map_err(|e| match e {
                ForecastError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    ForecastError::DatasetNotFound {
                        commodity: commodity.to_string(),
                    }
                }
                other => other,
            })?;

        let dataset = parse_dataset(commodity, &bytes, &self.date_column, &self.date_formats)?;
        tracing::debug!(
            "Loaded dataset '{}': {} rows, {} regions",
            commodity,
            dataset.rows.len(),
            dataset.regions.len()
        );
        Ok(dataset)
    }
}

pub fn parse_dataset(
    commodity: &str,
    bytes: &[u8],
    date_column: &str,
    date_formats: &[String],
) -> Result<Dataset> {
    let parse_error = |message: String| ForecastError::DatasetParseError {
        commodity: commodity.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let date_index = headers
        .iter()
        .position(|h| h == date_column)
        .ok_or_else(|| parse_error(format!("missing date column '{}'", date_column)))?;

    let regions: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_index)
        .map(|(_, h)| h.clone())
        .collect();

    if regions.is_empty() {
        return Err(parse_error("no region columns".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_number = idx + 1;

        let raw_date = record.get(date_index).unwrap_or_default();
        let date = parse_date(raw_date, date_formats).ok_or_else(|| {
            parse_error(format!("row {}: unparseable date '{}'", row_number, raw_date))
        })?;

        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(_, cell)| cell.to_string())
            .collect();

        rows.push(DatasetRow { date, cells });
    }

    Ok(Dataset {
        commodity: commodity.to_string(),
        regions,
        rows,
    })
}
