use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatesError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid server URI: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed document: {message}")]
    DocumentError { message: String },

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

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Configuration,
    Io,
}

impl DatesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DatesError::HttpError(_) => ErrorCategory::Network,
            DatesError::XmlError(_)
            | DatesError::SerializationError(_)
            | DatesError::DocumentError { .. } => ErrorCategory::Parse,
            DatesError::IoError(_) => ErrorCategory::Io,
            DatesError::UrlError(_)
            | DatesError::ConfigError { .. }
            | DatesError::ConfigValidationError { .. }
            | DatesError::InvalidConfigValueError { .. }
            | DatesError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the map server is reachable and answers with HTTP 2xx"
            }
            ErrorCategory::Parse => "Check that the server returns a valid XML capabilities document",
            ErrorCategory::Configuration => {
                "Check the servers_urls lists and [http] settings in the config file"
            }
            ErrorCategory::Io => "Check that the file exists and is readable/writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, DatesError>;
