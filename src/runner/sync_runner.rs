use std::error::Error;
use std::io::Write;
use std::path::Path;

use crate::{
    csv_utils::{read_csv, write_csv},
    dto::CommandRow,
    stores::RecordBackend,
    Ledger,
};

use super::process_row;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Replays the command script at `script_path` against `ledger` and writes the
/// resulting records to the provided writer.
///
/// # Arguments
/// * `script_path` - Path to a CSV file with `command,id,name,amount` rows
/// * `ledger` - The session's ledger; every accepted command is persisted
/// * `writer` - Where to write the final records (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * The script cannot be read
/// * The CSV is malformed
/// * The ledger's storage rejects a write
/// * Writing to the output fails
pub fn run<P, W, B>(script_path: P, ledger: &mut Ledger<B>, writer: W) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
    B: RecordBackend,
{
    let rows = read_csv::<CommandRow, _>(script_path)?;
    for row in rows {
        // CSV parsing errors are critical - propagate them
        let row = row?;
        process_row(ledger, row)?;
    }

    write_csv(writer, ledger.records().iter())?;
    Ok(())
}
