//! Runners replay a command script against a ledger and write the resulting
//! records as CSV to a writer.
//!
//! This module provides both a synchronous and an asynchronous runner implementations.
//!
mod async_runner;
mod sync_runner;

pub use async_runner::run as run_async;
pub use sync_runner::run;

use tracing::{debug, warn};

use crate::dto::CommandRow;
use crate::ledger::{Command, Ledger};
use crate::stores::RecordBackend;
use crate::Error;

/// Executes one script row. Rejected commands are logged and skipped; only a
/// storage failure is returned.
fn process_row<B: RecordBackend>(ledger: &mut Ledger<B>, row: CommandRow) -> Result<(), Error> {
    let result = Command::try_from(row).and_then(|command| ledger.execute(command));
    match result {
        Ok(outcome) => {
            debug!(?outcome, "command applied");
            Ok(())
        }
        Err(err @ Error::StorageUnavailable { .. }) => Err(err),
        Err(err) => {
            warn!(error = %err, "command rejected");
            Ok(())
        }
    }
}
