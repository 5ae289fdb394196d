use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data source '{source_name}' failed: {message}")]
    DataSourceError {
        source_name: String,
        message: String,
    },

    #[error("Remote snapshot error: {message}")]
    SnapshotError { message: String },

    #[error("Access code rejected")]
    InvalidAccessCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
    UserInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AtlasError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AtlasError::HttpError(_)
            | AtlasError::HttpStatusError { .. }
            | AtlasError::SnapshotError { .. } => ErrorCategory::Network,
            AtlasError::CsvError(_)
            | AtlasError::SerializationError(_)
            | AtlasError::DataSourceError { .. } => ErrorCategory::Data,
            AtlasError::IoError(_) => ErrorCategory::Storage,
            AtlasError::ConfigError { .. }
            | AtlasError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AtlasError::InvalidAccessCode => ErrorCategory::UserInput,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AtlasError::InvalidAccessCode => "Invalid access code. Please try again.".to_string(),
            AtlasError::HttpError(_) | AtlasError::HttpStatusError { .. } => {
                format!("Could not reach a remote service: {}", self)
            }
            AtlasError::IoError(e) => format!("Could not read or write local data: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and try again",
            ErrorCategory::Data => "Check that the dataset has the expected CSV header",
            ErrorCategory::Storage => "Check that the storage directory exists and is writable",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::UserInput => "Double-check the value you entered",
        }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
