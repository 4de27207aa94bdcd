use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::db::errors::DbError;
use crate::import::ImportError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The experiment results file does not exist
    #[error("{} not found", .path.display())]
    ResultsFileNotFound { path: PathBuf },

    /// The results file exists but could not be read as CSV
    #[error("failed to read {}: {source}", .path.display())]
    ResultsFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Config file or environment could not be loaded
    #[error("invalid configuration: {0}")]
    Config(Box<figment::Error>),

    /// Bulk import failure
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Writing the command output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The line shown on standard output for this failure, if it has a dedicated one.
    ///
    /// Everything except a missing results file collapses into the generic failure signal of the
    /// command; the detail only goes to the log.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Error::ResultsFileNotFound { path } => {
                let name = path.file_name().unwrap_or(path.as_os_str());
                Some(format!("Error: {} not found", name.to_string_lossy()))
            }
            _ => None,
        }
    }

    /// Log the full error at a level matching its severity.
    pub fn log(&self, command: &str) {
        match self {
            Error::Database(db_err) | Error::Import(ImportError::Row { source: db_err, .. })
                if db_err.is_constraint_violation() =>
            {
                tracing::warn!(command, "Constraint violation: {:#}", self);
            }
            Error::ResultsFileNotFound { .. } => {
                tracing::debug!(command, "{}", self);
            }
            _ => {
                tracing::error!(command, "Command failed: {:#}", self);
            }
        }
    }
}

/// Type alias for command results
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
