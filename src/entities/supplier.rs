//! Supplier entity - Reference data for where goods come from.
//!
//! When supplier tracking is enabled the supplier is part of a product's identity,
//! so the same name received from two suppliers is kept on two stock lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "AcmeCo"); unique
    #[sea_orm(unique)]
    pub name: String,
    /// Tax identification number
    pub tax_id: String,
}

/// `Supplier` has no declared relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
