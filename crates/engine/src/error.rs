use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TimberError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty name, duplicate region key, etc.).
    ConfigValidation(String),
    /// A date value could not be normalized to a calendar date.
    InvalidDate { value: String, cause: String },
    /// A region filter element is not a string.
    InvalidRegion { index: usize, value: String },
    /// Missing required column in input data.
    MissingColumn { column: String },
    /// Volume cell is not a number.
    VolumeParse { log_id: String, value: String },
    /// Volume is negative or not finite.
    NegativeVolume { log_id: String, value: f64 },
    /// Latitude/longitude cell is not a finite number.
    CoordinateParse { log_id: String, column: String, value: String },
    /// Two records share a log id.
    DuplicateLogId(String),
    /// IO error (file read, CSV framing, etc.).
    Io(String),
}

/// Coarse error category, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    InvalidDate,
    InvalidRegion,
    MissingColumn,
    InvalidRecord,
    Io,
}

impl TimberError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigParse(_) | Self::ConfigValidation(_) => ErrorKind::Config,
            Self::InvalidDate { .. } => ErrorKind::InvalidDate,
            Self::InvalidRegion { .. } => ErrorKind::InvalidRegion,
            Self::MissingColumn { .. } => ErrorKind::MissingColumn,
            Self::VolumeParse { .. }
            | Self::NegativeVolume { .. }
            | Self::CoordinateParse { .. }
            | Self::DuplicateLogId(_) => ErrorKind::InvalidRecord,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for TimberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidDate { value, cause } => {
                write!(f, "cannot parse date '{value}': {cause}")
            }
            Self::InvalidRegion { index, value } => {
                write!(f, "region filter element {index} is not a string: {value}")
            }
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::VolumeParse { log_id, value } => {
                write!(f, "record '{log_id}': cannot parse volume '{value}'")
            }
            Self::NegativeVolume { log_id, value } => {
                write!(f, "record '{log_id}': volume must be a non-negative number, got {value}")
            }
            Self::CoordinateParse { log_id, column, value } => {
                write!(f, "record '{log_id}': cannot parse {column} '{value}'")
            }
            Self::DuplicateLogId(id) => write!(f, "duplicate log id '{id}'"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for TimberError {}
