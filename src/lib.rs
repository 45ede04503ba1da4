pub mod config;
mod csv_utils;
mod dto;
mod error;
mod ledger;
pub mod logging;
mod runner;
pub mod shell;
pub mod stores;
#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dto::{CommandRow, CommandType};
pub use error::Error;
pub use ledger::{Command, Ledger, Outcome};
pub use runner::{run, run_async};
pub use stores::{CsvFileBackend, MemoryBackend, PaymentPolicy, RecordBackend, RecordStore, StudentRecord};
