use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Cannot access file {}: {source}", .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("No geocoding match for row {row} (query: {query:?})")]
    GeocodeMissError { row: usize, query: String },

    #[error("Geocoding request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Geocoding service returned HTTP {status} for query {query:?}")]
    ServiceStatusError { status: u16, query: String },

    #[error("Shapefile encoding error: {0}")]
    ShapefileError(#[from] shapefile::Error),

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Geocoding,
    Network,
    Output,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl GeocodeError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.into(),
            source,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileError { .. } | Self::ParseError { .. } => ErrorCategory::Input,
            Self::GeocodeMissError { .. } => ErrorCategory::Geocoding,
            Self::NetworkError(_) | Self::ServiceStatusError { .. } => ErrorCategory::Network,
            Self::ShapefileError(_) => ErrorCategory::Output,
            Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NetworkError(_) | Self::ServiceStatusError { .. } => ErrorSeverity::Medium,
            Self::FileError { .. } | Self::ShapefileError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit status for a failed run: 2 retryable, 1 processing, 3 system.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::FileError { .. } => "Check that the path exists and that you have permission to read or write it",
            Self::ParseError { .. } => {
                "Check that the input is comma-separated text with a header row containing the name column"
            }
            Self::GeocodeMissError { .. } => {
                "Fix the place name in the input, or rerun with --on-miss skip to keep going past unmatched rows"
            }
            Self::NetworkError(_) | Self::ServiceStatusError { .. } => {
                "Check your connection and the geocoding endpoint, then retry; consider a larger --delay-secs"
            }
            Self::ShapefileError(_) => "Check that the output directory is writable and has free space",
            Self::InvalidConfigValueError { .. } => {
                "Run with --help to see the accepted flags and values"
            }
            Self::ProcessingError { .. } => "Rerun with --verbose and report the log output",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FileError { path, .. } => {
                format!("Could not access file: {}", path.display())
            }
            Self::GeocodeMissError { row, query } => {
                format!("No location found for {:?} (row {})", query, row)
            }
            Self::NetworkError(_) | Self::ServiceStatusError { .. } => {
                "The geocoding service could not be reached".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeocodeError>;
