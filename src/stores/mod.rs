//! Storage layer for the fee record keeper. Provides:
//! - The in-memory record collection and its payment rules ([`RecordStore`])
//! - The persistence seam ([`RecordBackend`]) with a flat-file
//!   ([`CsvFileBackend`]) and an in-memory ([`MemoryBackend`]) implementation
//!
//! The store never touches storage itself; the ledger decides when to persist.

mod backend;
mod csv_file;
mod records;

pub use backend::{Loaded, MemoryBackend, RecordBackend};
pub use csv_file::CsvFileBackend;
pub use records::{PaymentPolicy, RecordStore, StudentRecord};
