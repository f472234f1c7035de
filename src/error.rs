//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file of the study or of the simulator output could not be read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid delimited text
    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// The external binary could not be started at all
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The marker announcing the output folder never appeared in the logs
    #[error("Could not parse output folder in output logs (marker: {marker:?})")]
    OutputFolderNotFound { marker: &'static str },

    /// A key looked up in the study input is absent
    #[error("no key '{key}' in section [{section}] of {}", file.display())]
    MissingInput {
        file: PathBuf,
        section: String,
        key: String,
    },

    /// Readable file whose content does not follow the expected layout
    #[error("malformed file {} (line {line}): {message}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Missing or invalid harness configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Step text the harness has no implementation for
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A checked value does not match its expectation
    #[error("check failed: {0}")]
    Check(String),
}

pub(crate) fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    Error::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Error {
    Error::Csv {
        path: path.into(),
        source,
    }
}

pub(crate) fn malformed(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Error {
    Error::Malformed {
        path: path.into(),
        line,
        message: message.into(),
    }
}

pub(crate) fn check_failed(message: impl Into<String>) -> Error {
    Error::Check(message.into())
}
