//! Persistence
//!
//! An inventory doesn't own its storage. A [`Persistence`] implementation is handed to
//! [`Inventory::open`](crate::Inventory::open) to seed the store, and the caller decides when
//! to save or append.

use std::path::Path;

use anyhow::Result;

use crate::Record;

// Re-export
pub use self::file::FlatFile;
pub use self::file::FlatFileError;
pub use self::file::HEADER;

mod file;

/// Records read by [`Persistence::load`].
#[derive(Debug, Default, PartialEq)]
pub struct Loaded {
    /// Records, in file order.
    pub records: Vec<Record>,
    /// Number of lines which couldn't be parsed and were dropped.
    pub skipped: usize,
    /// Why loading stopped early, if it did. Records read before the failure are kept.
    pub error: Option<String>,
}

/// Somewhere records can be loaded from and saved to.
pub trait Persistence {
    /// Load all records.
    ///
    /// Loading never fails. Unreadable records are skipped and I/O errors are logged, in
    /// which case whatever was read before the error is returned.
    fn load(&self, path: &Path) -> Loaded;

    /// Replace the stored records with the supplied records, in the supplied order.
    ///
    /// Failures are logged before being returned.
    fn save<'a, I>(&self, path: &Path, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>;

    /// Add a single record to the end of the stored records.
    ///
    /// Failures are logged before being returned.
    fn append(&self, path: &Path, record: &Record) -> Result<()>;
}
