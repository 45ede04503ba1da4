use crate::stores::StudentRecord;
use crate::Error;

/// Records read back from storage, plus everything that had to be skipped.
#[derive(Debug, Default)]
pub struct Loaded {
    pub records: Vec<StudentRecord>,
    pub warnings: Vec<Error>,
}

/// Persistence seam for the record store.
///
/// Loading never fails outright: missing or unreadable storage yields an empty
/// set, and bad entries are reported through [`Loaded::warnings`]. Writes do
/// fail, and callers must not assume the data reached storage unless they
/// return `Ok`.
pub trait RecordBackend {
    fn load(&self) -> Loaded;

    /// Adds a single record at the end of the storage.
    fn append(&mut self, record: &StudentRecord) -> Result<(), Error>;

    /// Replaces the whole storage with `records`, in order.
    fn save_all(&mut self, records: &[StudentRecord]) -> Result<(), Error>;
}

/// Keeps records in memory only. Used for sessions without a file and in tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Vec<StudentRecord>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }
}

impl RecordBackend for MemoryBackend {
    fn load(&self) -> Loaded {
        Loaded {
            records: self.records.clone(),
            warnings: Vec::new(),
        }
    }

    fn append(&mut self, record: &StudentRecord) -> Result<(), Error> {
        self.records.push(record.clone());
        Ok(())
    }

    fn save_all(&mut self, records: &[StudentRecord]) -> Result<(), Error> {
        self.records = records.to_vec();
        Ok(())
    }
}
