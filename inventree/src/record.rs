//! Inventory record
//!

use std::fmt;

use serde::Serialize;

/// Number of fields in a record.
pub(crate) const FIELD_COUNT: usize = 5;

/// A single inventory item.
///
/// The engine number is the unique key. A record is never modified once created, the only way
/// to "update" one is to delete it and add a replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    date_entered: String,
    stock_label: String,
    brand: String,
    engine_number: String,
    status: String,
}

impl Record {
    /// Create a new record.
    pub fn new(
        date_entered: impl Into<String>,
        stock_label: impl Into<String>,
        brand: impl Into<String>,
        engine_number: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            date_entered: date_entered.into(),
            stock_label: stock_label.into(),
            brand: brand.into(),
            engine_number: engine_number.into(),
            status: status.into(),
        }
    }

    /// When the item was entered into the inventory.
    pub fn date_entered(&self) -> &str {
        &self.date_entered
    }

    /// Stock label.
    pub fn stock_label(&self) -> &str {
        &self.stock_label
    }

    /// Brand.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Engine number (the key).
    pub fn engine_number(&self) -> &str {
        &self.engine_number
    }

    /// Status.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Does this record have the given brand (ignoring case)?
    pub fn is_brand(&self, brand: &str) -> bool {
        self.brand == brand || self.brand.to_lowercase() == brand.to_lowercase()
    }

    pub(crate) fn from_fields(fields: [&str; FIELD_COUNT]) -> Self {
        let [date_entered, stock_label, brand, engine_number, status] = fields;
        Self::new(date_entered, stock_label, brand, engine_number, status)
    }
}

// The flat file line form. Fields are written as is, embedded commas are not escaped.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.date_entered, self.stock_label, self.brand, self.engine_number, self.status
        )
    }
}
