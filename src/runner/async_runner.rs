use std::error::Error;
use std::io::Write;
use std::path::Path;

use crate::{csv_utils::write_csv, dto::CommandRow, stores::RecordBackend, Ledger};

use csv_async::{AsyncReaderBuilder, Error as CsvError, Trim};
use tokio::fs::File;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use super::process_row;

const BUFFER_SIZE: usize = 1024;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Replays the command script async against `ledger` and writes the resulting
/// records to the provided writer. Spawns two tasks:
/// * CSV reader - streams command rows from the script, deserializes them and sends them to the processor via channel.
/// * Processor - owns the ledger and applies the rows one at a time until the channel is closed.
///
/// The processor is the only task touching the ledger, so every mutation goes
/// through a single owner in arrival order.
///
/// Returns the ledger so the caller can keep using the session.
///
/// # Errors
/// Returns an error if:
/// * The script cannot be read
/// * The CSV is malformed
/// * The ledger's storage rejects a write
/// * Writing to the output fails
pub async fn run<P, W, B>(script_path: P, ledger: Ledger<B>, writer: W) -> Result<Ledger<B>>
where
    P: AsRef<Path>,
    W: Write,
    B: RecordBackend + Send + 'static,
{
    // Create channel for passing rows from reader to processor
    let (tx, rx) = mpsc::channel(BUFFER_SIZE);
    let script_path = script_path.as_ref().to_owned();

    let reader_handle = tokio::spawn(read_commands(script_path, tx));
    let processor_handle = tokio::spawn(process_commands(ledger, rx));

    // Wait for reader to finish and propagate any errors
    reader_handle.await??;

    // Get final ledger state
    let ledger = processor_handle.await??;

    write_csv(writer, ledger.records().iter())?;
    Ok(ledger)
}

/// Reads and deserializes command rows from a CSV file.
/// Returns them through the provided channel.
async fn read_commands(
    script_path: impl AsRef<Path> + Send,
    tx: mpsc::Sender<CommandRow>,
) -> Result<(), CsvError> {
    let file = File::open(script_path).await?;
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(file);

    let mut rows = csv_reader.deserialize::<CommandRow>();
    while let Some(result) = rows.next().await {
        match result {
            Ok(row) => {
                if tx.send(row).await.is_err() {
                    // Receiver dropped, exit gracefully
                    break;
                }
            }
            // CSV parsing errors are critical - propagate them
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Applies rows received through the channel.
/// Returns the ledger once the channel is closed by the reader, or the first
/// storage failure.
async fn process_commands<B: RecordBackend>(
    mut ledger: Ledger<B>,
    mut rx: mpsc::Receiver<CommandRow>,
) -> Result<Ledger<B>, crate::Error> {
    while let Some(row) = rx.recv().await {
        process_row(&mut ledger, row)?;
    }
    Ok(ledger)
}
