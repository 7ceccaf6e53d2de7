#![warn(missing_docs)]
//! Inventree
//!
//! # Implementation Details
//!
//! Provides a small in-memory inventory of [`Record`]s, keyed by engine number, and backed by a
//! flat comma delimited file.
//!
//! Every record is indexed twice:
//!  - An AVL tree, which keeps the records sorted by key and gives logarithmic insert/delete
//!  - A hash map, which gives constant time lookup by key
//!
//! The two indexes share each record (an `Arc<Record>`) and the [`Inventory`] is the only thing
//! allowed to mutate them, so they always agree on which keys exist.
//!
//! (If you aren't sure what an AVL tree is, you can read more about them here: <https://en.wikipedia.org/wiki/AVL_tree>.)
//!
//! Persistence is kept outside the store. A [`io::Persistence`] implementation (normally
//! [`io::FlatFile`]) is used to seed an inventory when it is opened, and the caller decides
//! when the current state should be saved or appended to disk.
//!
//! Note: An inventory is a plain value with a single owner. Nothing is locked internally, so if
//! you need to share one between threads, wrap it in a `Mutex` yourself.
//!

pub mod io;
pub mod lookup;
pub mod tree;

mod record;
mod store;

// Re-export
pub use self::record::Record;
pub use self::store::Inventory;
pub use self::store::Opened;
pub use self::store::StoreError;
pub use self::tree::Direction;
