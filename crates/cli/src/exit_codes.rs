//! CLI Exit Code Registry
//!
//! Single source of truth for `timberline` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args, unreadable file)          |
//! | 60   | Invalid config (parse, validation, filter values)    |
//! | 61   | Input data error (missing column, bad cell, dup id)  |
//! | 62   | Overdue logs found (only with `--fail-on-overdue`)   |

use timberline_engine::{ErrorKind, TimberError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable input file.
pub const EXIT_USAGE: u8 = 2;

/// Config could not be parsed or failed validation, including bad
/// filter regions/date and a bad aging reference.
pub const EXIT_INVALID_CONFIG: u8 = 60;

/// The log table is missing a column or has an invalid cell/record.
pub const EXIT_INPUT_DATA: u8 = 61;

/// Overdue at-camp logs exist and `--fail-on-overdue` was given.
pub const EXIT_OVERDUE: u8 = 62;

/// Map an engine error to its exit code.
///
/// Date/region errors from a config file are config errors; the same kinds
/// raised while loading CSV cells are data errors, so callers pass the stage.
pub fn timber_exit_code(err: &TimberError, stage: Stage) -> u8 {
    match (err.kind(), stage) {
        (ErrorKind::Config, _) => EXIT_INVALID_CONFIG,
        (ErrorKind::InvalidDate | ErrorKind::InvalidRegion, Stage::Config) => EXIT_INVALID_CONFIG,
        (ErrorKind::InvalidDate | ErrorKind::InvalidRegion, Stage::Load) => EXIT_INPUT_DATA,
        (ErrorKind::MissingColumn | ErrorKind::InvalidRecord, _) => EXIT_INPUT_DATA,
        (ErrorKind::Io, _) => EXIT_USAGE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Load,
}

/// Structured error output for `--json` mode.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: ErrorKind,
    pub message: String,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn from_timber_error(err: &TimberError, stage: Stage) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
            exit_code: timber_exit_code(err, stage),
        }
    }
}
