use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report '{report}' requires parameter '{parameter}'")]
    ParameterMissing { report: String, parameter: String },

    #[error("Invalid value '{value}' for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Unknown report: {name}")]
    UnknownReport { name: String },

    #[error("Data store unavailable at '{path}': {message}")]
    DataStoreUnavailable { path: String, message: String },

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dataset load error in '{file}': {message}")]
    LoadError { file: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parameter,
    DataStore,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ParameterMissing { .. }
            | ReportError::InvalidParameter { .. }
            | ReportError::UnknownReport { .. } => ErrorCategory::Parameter,
            ReportError::DataStoreUnavailable { .. } | ReportError::Query(_) => {
                ErrorCategory::DataStore
            }
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::LoadError { .. } => ErrorCategory::Data,
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Parameter | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::DataStore => match self {
                ReportError::DataStoreUnavailable { .. } => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReportError::ParameterMissing { parameter, .. } => {
                format!("Pass --{} on the command line", parameter.replace('_', "-"))
            }
            ReportError::InvalidParameter { parameter, .. } => {
                format!("Check the value given for '{}'", parameter)
            }
            ReportError::UnknownReport { .. } => {
                "Run the `list` command to see the available reports".to_string()
            }
            ReportError::DataStoreUnavailable { .. } => {
                "Check the database path or create it with `init-db`".to_string()
            }
            ReportError::Query(_) => {
                "The database schema may be out of date; recreate it with `init-db`".to_string()
            }
            ReportError::IoError(_) => "Check file permissions and free disk space".to_string(),
            ReportError::CsvError(_) | ReportError::LoadError { .. } => {
                "Check the CSV headers and values of the dataset files".to_string()
            }
            ReportError::SerializationError(_) => "Try another output format".to_string(),
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::ParameterMissing { report, parameter } => {
                format!("The report '{}' needs a value for '{}'", report, parameter)
            }
            ReportError::DataStoreUnavailable { path, .. } => {
                format!("Could not open the tourism database at '{}'", path)
            }
            ReportError::UnknownReport { name } => format!("There is no report named '{}'", name),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
