//! Domain-specific errors for the fee record keeper.
//!
//! Contains error variants for common failure cases like:
//! - Record-related errors (duplicate id, not found, overpayment)
//! - Input validation errors (negative amounts, unparsable numbers)
//! - Storage errors (malformed lines on load, unwritable backing file)
//!
//! Every variant is recoverable at the operation boundary. Only
//! [`Error::StorageUnavailable`] returned from a save should abort the
//! operation that triggered it.

use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a student with id {0:?} already exists")]
    DuplicateId(String),

    #[error("no student with id {0:?}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("payment of {amount} exceeds the {fees_due} due for {id:?}")]
    Overpayment {
        id: String,
        fees_due: Decimal,
        amount: Decimal,
    },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecordLine { line: u64, reason: String },

    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Wraps a csv error as a storage failure, keeping the underlying io error
    /// when there is one.
    pub(crate) fn storage_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
        };
        Error::storage(path, source)
    }
}
