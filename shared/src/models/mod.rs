//! Data models
//!
//! Catalog and table models as served by the menu backend. Field names are
//! camelCase on the wire; prices are decimal currency units.

pub mod category;
pub mod dining_table;
pub mod menu;
pub mod product;
pub mod restaurant;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use menu::*;
pub use product::*;
pub use restaurant::*;
