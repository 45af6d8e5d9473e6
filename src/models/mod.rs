//! Models module
//!
//! The table being inferred, its columns, and the ordered column registry.

pub mod collection;
pub mod column;
pub mod table;

pub use collection::ColumnCollection;
pub use column::Column;
pub use table::Table;
