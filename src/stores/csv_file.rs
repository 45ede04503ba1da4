//! Flat-file persistence: one `name,id,fees_due` line per student, no header.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::stores::{Loaded, RecordBackend, StudentRecord};
use crate::Error;

const FIELDS_PER_LINE: usize = 3;

#[derive(Debug, Clone)]
pub struct CsvFileBackend {
    path: PathBuf,
}

impl CsvFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that a full rewrite goes to before being renamed into place.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn writer_for(file: File) -> csv::Writer<File> {
        csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file)
    }
}

impl RecordBackend for CsvFileBackend {
    fn load(&self) -> Loaded {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "record file not found, starting empty");
                return Loaded::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "record file unreadable, starting empty");
                return Loaded {
                    records: Vec::new(),
                    warnings: vec![Error::storage(&self.path, err)],
                };
            }
        };

        // Each line is parsed on its own so a broken line (an unbalanced
        // quote, say) cannot swallow the lines after it.
        let mut loaded = Loaded::default();
        for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
            let line_no = index as u64 + 1;
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(err) => {
                    let err = Error::storage(&self.path, err);
                    warn!(error = %err, "failed reading record file");
                    loaded.warnings.push(err);
                    break;
                }
            };
            if bytes.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match parse_line(&bytes) {
                Ok(record) => loaded.records.push(record),
                Err(reason) => {
                    warn!(line = line_no, %reason, "skipping malformed record line");
                    loaded.warnings.push(Error::MalformedRecordLine {
                        line: line_no,
                        reason,
                    });
                }
            }
        }

        info!(
            path = %self.path.display(),
            records = loaded.records.len(),
            skipped = loaded.warnings.len(),
            "records loaded"
        );
        loaded
    }

    fn append(&mut self, record: &StudentRecord) -> Result<(), Error> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| Error::storage(&self.path, err))?;

        // A hand-edited file may lack the final newline.
        if !ends_with_newline(&mut file).map_err(|err| Error::storage(&self.path, err))? {
            file.write_all(b"\n")
                .map_err(|err| Error::storage(&self.path, err))?;
        }

        let mut writer = Self::writer_for(file);
        writer
            .serialize(record)
            .map_err(|err| Error::storage_csv(&self.path, err))?;
        writer
            .flush()
            .map_err(|err| Error::storage(&self.path, err))?;
        Ok(())
    }

    fn save_all(&mut self, records: &[StudentRecord]) -> Result<(), Error> {
        let tmp = self.temp_path();
        let result = self.write_replacement(&tmp, records);
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result?;
        info!(path = %self.path.display(), records = records.len(), "records saved");
        Ok(())
    }
}

impl CsvFileBackend {
    /// Writes `records` to `tmp`, syncs it and renames it over the record file.
    fn write_replacement(&self, tmp: &Path, records: &[StudentRecord]) -> Result<(), Error> {
        let file = File::create(tmp).map_err(|err| Error::storage(tmp, err))?;

        let mut writer = Self::writer_for(file);
        for record in records {
            writer
                .serialize(record)
                .map_err(|err| Error::storage_csv(tmp, err))?;
        }
        writer.flush().map_err(|err| Error::storage(tmp, err))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|err| Error::storage(tmp, err))?;
        drop(writer);

        fs::rename(tmp, &self.path).map_err(|err| Error::storage(&self.path, err))
    }
}

/// Parses one line of the record file. The error is a human-readable reason.
fn parse_line(bytes: &[u8]) -> Result<StudentRecord, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let row = match reader.records().next() {
        Some(Ok(row)) => row,
        Some(Err(err)) => return Err(format!("unreadable line: {}", err)),
        None => return Err("empty line".to_string()),
    };
    if row.len() != FIELDS_PER_LINE {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS_PER_LINE,
            row.len()
        ));
    }
    row.deserialize::<StudentRecord>(None)
        .map_err(|_| format!("fee {:?} is not a number", &row[2]))
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
