use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown category id: {category_id}")]
    UnknownCategory { category_id: String },

    #[error("Taxonomy error: {message}")]
    TaxonomyError { message: String },

    #[error("Malformed input in {source_name}: {message}")]
    DataFormatError {
        source_name: String,
        message: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，用於日誌與告警
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    DataIntegrity,
    Processing,
    System,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SuggestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SuggestError::ConfigError { .. }
            | SuggestError::ConfigValidationError { .. }
            | SuggestError::InvalidConfigValueError { .. }
            | SuggestError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SuggestError::CsvError(_)
            | SuggestError::SerializationError(_)
            | SuggestError::DataFormatError { .. } => ErrorCategory::Input,
            SuggestError::UnknownCategory { .. } | SuggestError::TaxonomyError { .. } => {
                ErrorCategory::DataIntegrity
            }
            SuggestError::ProcessingError { .. } => ErrorCategory::Processing,
            SuggestError::IoError(_) | SuggestError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::DataIntegrity => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command-line flags or the TOML configuration file"
            }
            ErrorCategory::Input => {
                "Check that the input files follow the expected CSV/JSON layout"
            }
            ErrorCategory::DataIntegrity => {
                "Make sure the category file matches the one used to crawl the venues"
            }
            ErrorCategory::Processing => "Re-run with --verbose to see which pair failed",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SuggestError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("A required file could not be found: {}", e)
            }
            SuggestError::UnknownCategory { category_id } => format!(
                "Category '{}' is referenced by a venue but absent from the category tree",
                category_id
            ),
            other => other.to_string(),
        }
    }

    /// 檔案不存在（例如尚未抓取的場所 JSON）
    pub fn is_not_found(&self) -> bool {
        matches!(self, SuggestError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, SuggestError>;
