//! AVL tree implementation
//!

use strum::EnumString;

// Re-export
pub use self::avl::AvlKey;
pub use self::avl::AvlTree;
pub use self::avl::TreeError;
pub use self::iter::Iter;

pub mod avl;
mod iter;
mod node;

/// When accessing tree contents serially, ascending or descending order.
#[derive(Clone, Copy, Debug, Default, EnumString, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Process in ascending order.
    #[default]
    Ascending,
    /// Process in descending order.
    Descending,
}
