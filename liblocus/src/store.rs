use crate::error::Result;
use crate::record::LocationRecord;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed column order of the record file. Readers are header-driven, so files
/// written with an older (shorter) header still load with defaults applied.
pub const CSV_HEADER: [&str; 8] = [
    "name",
    "address",
    "latitude",
    "longitude",
    "radius",
    "circleCenterLng",
    "circleCenterLat",
    "timestamp",
];

/// CSV-backed store for [`LocationRecord`]s.
///
/// The file is the sole source of truth; nothing is cached between calls and
/// no locking is performed. Single-writer access is a deployment assumption.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data directory and a header-only file if they don't exist
    /// yet. Idempotent, intended to run on every process start.
    pub fn init(&self) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        if !self.path.exists() {
            debug!("creating record file at '{}'", self.path.display());
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Append one row in fixed column order without re-emitting the header.
    pub fn append(&self, record: &LocationRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Read every row back in file order.
    pub fn read_all(&self) -> Result<Vec<LocationRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        debug!("read {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }

    /// Replace the whole file with the given records, stamping any record that
    /// arrives without a timestamp. Records absent from the input are gone for
    /// good.
    ///
    /// The new contents go to a temporary file in the same directory which is
    /// then renamed into place, so a failure mid-write leaves the previous
    /// file untouched.
    pub fn replace_all(&self, records: Vec<LocationRecord>) -> Result<usize> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        let count = records.len();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            writer.write_record(CSV_HEADER)?;
            for mut record in records {
                record.ensure_timestamp();
                writer.serialize(&record)?;
            }
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("rewrote '{}' with {count} records", self.path.display());
        Ok(count)
    }
}
