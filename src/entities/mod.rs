//! Entity module - Contains all SeaORM entity definitions for the record store.
//! These entities are the four collections the inventory core reads and writes.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod history;
pub mod item;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use history::{Column as HistoryColumn, Entity as History, Model as HistoryModel};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
