//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                 |
//! |------|---------------------------------------------------------|
//! | 0    | Success                                                 |
//! | 2    | Usage error (bad arguments; raised by clap)             |
//! | 3    | Invalid config (TOML parse or validation failure)       |
//! | 4    | Input error (unreadable file, bad CSV, missing column)  |
//! | 5    | Output error (cannot render or write results)           |

use complink_linkage::{LinkageError, Stage};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Config file does not parse or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A dataset or the config file cannot be read, or a dataset is malformed.
pub const EXIT_INPUT: u8 = 4;

/// Results cannot be rendered or written.
pub const EXIT_OUTPUT: u8 = 5;

/// Map an engine error to its exit code.
pub fn linkage_exit_code(err: &LinkageError) -> u8 {
    match err {
        LinkageError::ConfigParse(_) | LinkageError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        LinkageError::MissingColumn { .. } | LinkageError::Csv { .. } => EXIT_INPUT,
        LinkageError::Io(_) => EXIT_OUTPUT,
        LinkageError::Stage { stage, source } => match stage {
            Stage::Extract => EXIT_INPUT,
            Stage::Load => EXIT_OUTPUT,
            Stage::Transform | Stage::Match => linkage_exit_code(source),
        },
    }
}
