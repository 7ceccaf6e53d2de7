//! Flat file functions
//!
//! The file has the following structure
//!
//! Header
//!   [Record]
//!
//! The Header is the literal line `Date Entered,Stock Label,Brand,Engine Number,Status`.
//! Each Record is a single line of 5 comma separated fields, in header order. Fields are not
//! quoted, so a field containing a comma can't be read back.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Loaded, Persistence};
use crate::record::FIELD_COUNT;
use crate::Record;

/// First line of every inventory file.
pub const HEADER: &str = "Date Entered,Stock Label,Brand,Engine Number,Status";

const DELIMITER: char = ',';

/// Flat file specific errors.
#[derive(Error, Debug, PartialEq)]
pub enum FlatFileError {
    /// A line didn't contain the expected number of fields
    #[error("line: {line} has {fields} fields, expected 5")]
    MalformedRecord {
        /// Line number (from 1, including the header)
        line: usize,
        /// Number of fields found
        fields: usize,
    },

    /// A line wasn't valid UTF-8
    #[error("line: {line} is not valid UTF-8")]
    InvalidText {
        /// Line number (from 1, including the header)
        line: usize,
    },
}

/// Comma delimited text file storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatFile;

impl FlatFile {
    /// Parse a single record line.
    pub fn parse_line(line: &str, number: usize) -> Result<Record, FlatFileError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let fields: [&str; FIELD_COUNT] =
            fields
                .try_into()
                .map_err(|fields: Vec<&str>| FlatFileError::MalformedRecord {
                    line: number,
                    fields: fields.len(),
                })?;
        Ok(Record::from_fields(fields))
    }

    fn create(path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("could not create: {}", path.display()))?;
        writeln!(file, "{HEADER}")?;
        file.flush()?;
        Ok(())
    }

    // Records are added to loaded as they are read, so a failure part way through still
    // leaves the earlier records available.
    fn read_into(path: &Path, loaded: &mut Loaded) -> Result<()> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Self::create(path)?;
                tracing::info!("Created inventory file at: {}", path.display());
                return Ok(());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("could not open: {}", path.display()))
            }
        };

        // An empty file gets a header, otherwise the first appended record would be read
        // back as the header
        if file.metadata()?.len() == 0 {
            drop(file);
            Self::create(path)?;
            tracing::info!("Wrote header to empty inventory file at: {}", path.display());
            return Ok(());
        }

        // The first line is the header, it isn't checked
        for (idx, bytes) in BufReader::new(file).split(b'\n').enumerate().skip(1) {
            let bytes = bytes.with_context(|| format!("could not read: {}", path.display()))?;
            let parsed = match String::from_utf8(bytes) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => Self::parse_line(&line, idx + 1),
                Err(_) => Err(FlatFileError::InvalidText { line: idx + 1 }),
            };
            match parsed {
                Ok(record) => loaded.records.push(record),
                Err(err) => {
                    tracing::warn!("Skipping record in {}: {err}", path.display());
                    loaded.skipped += 1;
                }
            }
        }
        Ok(())
    }

    fn write_records<'a, I>(path: &Path, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let file = File::create(path)
            .with_context(|| format!("could not create: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{HEADER}")?;
        let mut count = 0;
        for record in records {
            writeln!(writer, "{record}")?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    fn append_record(path: &Path, record: &Record) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .with_context(|| format!("could not open: {}", path.display()))?;

        // Don't let our record run on from an unterminated last line
        if file.metadata()?.len() > 0 {
            let mut last = [0; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }
        writeln!(file, "{record}")?;
        file.flush()?;
        Ok(())
    }
}

impl Persistence for FlatFile {
    fn load(&self, path: &Path) -> Loaded {
        let mut loaded = Loaded::default();
        if let Err(err) = Self::read_into(path, &mut loaded) {
            tracing::error!("Error loading inventory: {err:#}");
            loaded.error = Some(format!("{err:#}"));
        }
        tracing::info!(
            "Loaded {} records from: {} ({} skipped)",
            loaded.records.len(),
            path.display(),
            loaded.skipped
        );
        loaded
    }

    fn save<'a, I>(&self, path: &Path, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        match Self::write_records(path, records) {
            Ok(count) => {
                tracing::info!("Saved {count} records to: {}", path.display());
                Ok(())
            }
            Err(err) => {
                tracing::error!("Error saving inventory: {err:#}");
                Err(err)
            }
        }
    }

    fn append(&self, path: &Path, record: &Record) -> Result<()> {
        Self::append_record(path, record).map_err(|err| {
            tracing::error!("Error adding record to inventory: {err:#}");
            err
        })
    }
}
