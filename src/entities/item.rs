//! Item entity - One stock line on the warehouse floor.
//!
//! Several rows may describe the same product; the aggregation engine groups them.
//! Category and supplier references are plain nullable ids resolved by left join,
//! so a dangling reference is representable and shows up as a placeholder.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product name (e.g., "Widget"); not unique at storage level
    pub name: String,
    /// Units on hand
    pub quantity: i64,
    /// Unit price of the most recent receipt; NULL on rows written before prices existed
    pub price: Option<f64>,
    /// Category reference, if any
    pub category_id: Option<i64>,
    /// Supplier reference, if any
    pub supplier_id: Option<i64>,
}

/// Items carry no declared relations; references are joined in process
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
