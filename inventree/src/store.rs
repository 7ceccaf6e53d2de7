//! Inventory store
//!
//! This is the main data structure exposed by the library.
//!

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::io::Persistence;
use crate::lookup::Lookup;
use crate::tree::{AvlTree, Direction, TreeError};
use crate::Record;

/// Inventory specific errors.
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    /// A record with this engine number is already stored
    #[error("duplicate engine number: {0}")]
    DuplicateKey(String),

    /// No record with this engine number is stored
    #[error("engine number not found: {0}")]
    NotFound(String),

    /// The ordered and lookup indexes disagree
    #[error("indexes are inconsistent: {0}")]
    Inconsistent(String),

    /// The ordered index is malformed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// An inventory seeded from storage by [`Inventory::open`].
#[derive(Debug)]
pub struct Opened {
    /// The seeded inventory.
    pub inventory: Inventory,
    /// Lines dropped because they couldn't be parsed.
    pub skipped: usize,
    /// Records dropped because an earlier record had the same engine number.
    pub duplicates: usize,
    /// Why loading stopped early, if it did.
    pub error: Option<String>,
}

/// An inventory of records, ordered and looked up by engine number.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    ordered: AvlTree<String, Arc<Record>>,
    lookup: Lookup<String, Arc<Record>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from storage at the specified path and seed a new inventory with them.
    ///
    /// The storage isn't retained.
    pub fn open<P, Q>(persistence: &P, origin: Q) -> Opened
    where
        P: Persistence,
        Q: AsRef<Path>,
    {
        let path: &Path = origin.as_ref();

        tracing::info!("Opening inventory at: {}", path.display());

        let loaded = persistence.load(path);
        let (inventory, duplicates) = Self::from_records(loaded.records);
        Opened {
            inventory,
            skipped: loaded.skipped,
            duplicates,
            error: loaded.error,
        }
    }

    /// Build an inventory from records, keeping the first of any records which share an
    /// engine number.
    ///
    /// Returns the inventory and the number of records which were dropped.
    pub fn from_records<I>(records: I) -> (Self, usize)
    where
        I: IntoIterator<Item = Record>,
    {
        let mut inventory = Self::new();
        let mut duplicates = 0;
        for record in records {
            if let Err(err) = inventory.add(record) {
                tracing::warn!("Ignoring record: {err}");
                duplicates += 1;
            }
        }
        (inventory, duplicates)
    }

    /// Add a record.
    ///
    /// Fails, leaving the inventory unchanged, if the engine number is already present.
    pub fn add(&mut self, record: Record) -> Result<(), StoreError> {
        let key = record.engine_number().to_string();
        if self.lookup.contains(&key) {
            return Err(StoreError::DuplicateKey(key));
        }
        tracing::debug!("ADDING: {:?}", record);
        let record = Arc::new(record);
        self.ordered.insert(key.clone(), Arc::clone(&record));
        self.lookup.put(key, record);
        Ok(())
    }

    /// Delete a record and return it.
    pub fn delete(&mut self, engine_number: &str) -> Result<Record, StoreError> {
        let record = self
            .lookup
            .remove(engine_number)
            .ok_or_else(|| StoreError::NotFound(engine_number.to_string()))?;
        self.ordered.delete(engine_number);
        tracing::debug!("DELETED: {:?}", record);
        Ok(Arc::unwrap_or_clone(record))
    }

    /// Get the record with this engine number.
    pub fn get(&self, engine_number: &str) -> Result<&Record, StoreError> {
        self.lookup
            .get(engine_number)
            .map(Arc::as_ref)
            .ok_or_else(|| StoreError::NotFound(engine_number.to_string()))
    }

    /// Does the inventory contain this engine number?
    pub fn contains(&self, engine_number: &str) -> bool {
        self.lookup.contains(engine_number)
    }

    /// Records with this brand (ignoring case), in engine number order.
    pub fn find_by_brand(&self, brand: &str) -> Vec<&Record> {
        self.records(Direction::Ascending)
            .filter(|record| record.is_brand(brand))
            .collect()
    }

    /// All records in ascending engine number order.
    ///
    /// This is the form in which an inventory should be saved.
    pub fn list_sorted(&self) -> Vec<&Record> {
        self.records(Direction::Ascending).collect()
    }

    /// Iterate over records in the given direction.
    pub fn records(&self, direction: Direction) -> impl Iterator<Item = &Record> + '_ {
        self.ordered.values(direction).map(Arc::as_ref)
    }

    /// Return count of records.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Is the inventory empty?
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Log basic information about our inventory.
    pub fn info(&self) {
        tracing::info!(
            "records: {}, tree height: {}",
            self.len(),
            self.ordered.height()
        );
    }

    /// Verify the inventory.
    ///
    /// Checks the structure of the ordered index and that both indexes hold exactly the same
    /// records under the same keys.
    pub fn verify(&self) -> Result<(), StoreError> {
        self.ordered.verify()?;

        if self.ordered.len() != self.lookup.len() {
            return Err(StoreError::Inconsistent(format!(
                "ordered index holds {} records, lookup index holds {}",
                self.ordered.len(),
                self.lookup.len()
            )));
        }
        for (key, record) in &self.ordered {
            if record.engine_number() != key.as_str() {
                return Err(StoreError::Inconsistent(format!(
                    "record: {} is stored under: {key}",
                    record.engine_number()
                )));
            }
            match self.lookup.get(key) {
                Some(other) if Arc::ptr_eq(record, other) => (),
                Some(_) => {
                    return Err(StoreError::Inconsistent(format!(
                        "indexes hold different records for: {key}"
                    )))
                }
                None => {
                    return Err(StoreError::Inconsistent(format!(
                        "lookup index is missing: {key}"
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
