//! Backends and fixtures shared by unit tests.

use std::io;

use crate::stores::{Loaded, RecordBackend, StudentRecord};
use crate::Error;

/// Serves a fixed set of records but refuses every write.
pub(crate) struct ReadOnlyBackend(pub Vec<StudentRecord>);

impl RecordBackend for ReadOnlyBackend {
    fn load(&self) -> Loaded {
        Loaded {
            records: self.0.clone(),
            warnings: Vec::new(),
        }
    }

    fn append(&mut self, _record: &StudentRecord) -> Result<(), Error> {
        Err(Error::storage("read-only", io::ErrorKind::PermissionDenied.into()))
    }

    fn save_all(&mut self, _records: &[StudentRecord]) -> Result<(), Error> {
        Err(Error::storage("read-only", io::ErrorKind::PermissionDenied.into()))
    }
}
