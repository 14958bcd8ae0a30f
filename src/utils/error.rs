use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{message}")]
    ValidationError { message: String },

    #[error("No data found for region: {region}")]
    UnknownRegion { region: String },

    #[error("No dataset found for commodity: {commodity}")]
    DatasetNotFound { commodity: String },

    #[error("Malformed dataset '{commodity}': {message}")]
    DatasetParseError { commodity: String, message: String },

    #[error("Model error: {message}")]
    ModelError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// 錯誤分類，決定對外的 HTTP 狀態與日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Data,
    Model,
    Configuration,
    Internal,
}

impl ForecastError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::ModelError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::UnknownRegion { .. } => ErrorCategory::Validation,
            Self::DatasetNotFound { .. } => ErrorCategory::NotFound,
            Self::DatasetParseError { .. } | Self::CsvError(_) => ErrorCategory::Data,
            Self::ModelError { .. } => ErrorCategory::Model,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::InternalError { .. } => ErrorCategory::Internal,
        }
    }

    /// 呼叫端是否應修正請求（對應 4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound
        )
    }

    /// 回傳給客戶端的訊息；模型與內部錯誤不外洩細節
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Data => {
                self.to_string()
            }
            ErrorCategory::Model => "Error during prediction".to_string(),
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Check the commodity, state and date fields of the request"
            }
            ErrorCategory::NotFound => "Make sure <commodity>.csv exists in the data directory",
            ErrorCategory::Data => "Inspect the dataset file for malformed dates or values",
            ErrorCategory::Model => {
                "The series may be too short or degenerate for the configured model order"
            }
            ErrorCategory::Configuration => {
                "Review the TOML file, CLI flags and environment variables"
            }
            ErrorCategory::Internal => "Check the server logs for the underlying failure",
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
