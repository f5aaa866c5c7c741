//! Receiving and mutation business logic.
//!
//! Every mutation follows the same two steps: write the stock change to the
//! store, then try to append a history entry. The first step's errors are
//! returned to the caller; the second step only logs on failure, so a lost
//! history entry never undoes or fails a mutation.
//!
//! A receipt is a read followed by a write with no transaction around it. Two
//! sessions receiving the same product at the same moment can lose one of the
//! increments; single-operator use is assumed.

use crate::{
    config::settings::Settings,
    core::{audit, records::StockLine},
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Incoming goods to be put on the shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRequest {
    /// Product name
    pub name: String,
    /// Units received; must be positive
    pub quantity: i64,
    /// Unit purchase price; must be finite and non-negative
    pub price: f64,
    /// Category for a newly created line
    pub category_id: Option<i64>,
    /// Supplier the goods came from
    pub supplier_id: Option<i64>,
}

/// What a receipt did to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReceiptOutcome {
    /// An existing line was topped up
    Merged {
        /// Line that received the goods
        item_id: i64,
        /// Quantity before the receipt
        old_quantity: i64,
        /// Quantity after the receipt
        new_quantity: i64,
    },
    /// A new line was created
    Created {
        /// Id of the new line
        item_id: i64,
    },
}

/// What an edit, issue or deletion did to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MutationOutcome {
    /// Quantity and price were overwritten
    Updated {
        /// Edited line
        item_id: i64,
        /// Quantity before the edit
        old_quantity: i64,
        /// Quantity after the edit
        new_quantity: i64,
        /// Price before the edit
        old_price: f64,
        /// Price after the edit
        new_price: f64,
    },
    /// Goods left the warehouse
    Issued {
        /// Line the goods were taken from
        item_id: i64,
        /// Quantity before the issue
        old_quantity: i64,
        /// Quantity after the issue
        new_quantity: i64,
    },
    /// The line was removed permanently
    Deleted {
        /// Removed line
        item_id: i64,
    },
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Item name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidPrice { price });
    }
    Ok(())
}

/// Finds the line a receipt merges into.
///
/// Identity is the name, plus the supplier when supplier tracking is enabled. If
/// several stored lines share the identity the oldest one is used.
async fn find_merge_target(
    db: &DatabaseConnection,
    name: &str,
    supplier_id: Option<i64>,
    track_suppliers: bool,
) -> Result<Option<item::Model>> {
    let mut query = Item::find().filter(item::Column::Name.eq(name));
    if track_suppliers {
        query = match supplier_id {
            Some(id) => query.filter(item::Column::SupplierId.eq(id)),
            None => query.filter(item::Column::SupplierId.is_null()),
        };
    }
    query
        .order_by_asc(item::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_existing(db: &DatabaseConnection, item_id: i64) -> Result<item::Model> {
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })
}

/// Puts received goods on the shelf.
///
/// If a line with the same identity exists its quantity grows by the received
/// amount and its price is replaced by the received price. Otherwise a new line
/// is created. Either way a history entry is attempted afterwards.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The quantity is not positive
/// - The price is negative or not finite (NaN, infinity)
/// - The merged quantity would overflow
/// - Any store read or write of the stock line fails
#[instrument(skip(db, settings))]
pub async fn receive(
    db: &DatabaseConnection,
    settings: &Settings,
    request: ReceiptRequest,
) -> Result<ReceiptOutcome> {
    let name = validate_name(&request.name)?;
    if request.quantity <= 0 {
        return Err(Error::InvalidQuantity {
            quantity: request.quantity,
        });
    }
    validate_price(request.price)?;

    let existing =
        find_merge_target(db, &name, request.supplier_id, settings.track_suppliers).await?;

    if let Some(line) = existing {
        let item_id = line.id;
        let old_quantity = line.quantity;
        let new_quantity =
            old_quantity
                .checked_add(request.quantity)
                .ok_or_else(|| Error::QuantityOverflow {
                    what: format!("'{name}'"),
                })?;

        let mut active: item::ActiveModel = line.into();
        active.quantity = Set(new_quantity);
        active.price = Set(Some(request.price));
        active.update(db).await?;

        info!(
            "Restocked '{}' (ID: {}): {} -> {} at {:.2}",
            name, item_id, old_quantity, new_quantity, request.price
        );
        audit::append(
            db,
            &format!(
                "Restocked '{name}': {old_quantity} -> {new_quantity} pcs, price {:.2}",
                request.price
            ),
        )
        .await;

        Ok(ReceiptOutcome::Merged {
            item_id,
            old_quantity,
            new_quantity,
        })
    } else {
        let saved = item::ActiveModel {
            name: Set(name.clone()),
            quantity: Set(request.quantity),
            price: Set(Some(request.price)),
            category_id: Set(request.category_id),
            supplier_id: Set(request.supplier_id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(
            "Received new item '{}' (ID: {}): {} at {:.2}",
            name, saved.id, request.quantity, request.price
        );
        audit::append(
            db,
            &format!(
                "Received new item '{name}': {} pcs at {:.2}",
                request.quantity, request.price
            ),
        )
        .await;

        Ok(ReceiptOutcome::Created { item_id: saved.id })
    }
}

/// Overwrites the quantity and price of a stock line.
///
/// `name` is the label used in the history entry.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The quantity is negative
/// - The price is negative or not finite
/// - No line with `item_id` exists
/// - The store update fails
#[instrument(skip(db))]
pub async fn edit_item(
    db: &DatabaseConnection,
    item_id: i64,
    new_quantity: i64,
    new_price: f64,
    name: &str,
) -> Result<MutationOutcome> {
    let name = validate_name(name)?;
    if new_quantity < 0 {
        return Err(Error::InvalidQuantity {
            quantity: new_quantity,
        });
    }
    validate_price(new_price)?;

    let current = find_existing(db, item_id).await?;
    let before = StockLine::from(current.clone());

    let mut active: item::ActiveModel = current.into();
    active.quantity = Set(new_quantity);
    active.price = Set(Some(new_price));
    active.update(db).await?;

    info!(
        "Edited '{}' (ID: {}): quantity {} -> {}, price {:.2} -> {:.2}",
        name, item_id, before.quantity, new_quantity, before.price, new_price
    );
    audit::append(
        db,
        &format!(
            "Edited '{name}': quantity {} -> {new_quantity}, price {:.2} -> {new_price:.2}",
            before.quantity, before.price
        ),
    )
    .await;

    Ok(MutationOutcome::Updated {
        item_id,
        old_quantity: before.quantity,
        new_quantity,
        old_price: before.price,
        new_price,
    })
}

/// Takes goods off the shelf.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The quantity is not positive
/// - No line with `item_id` exists
/// - The line holds less than `quantity`
/// - The store update fails
#[instrument(skip(db))]
pub async fn issue_item(
    db: &DatabaseConnection,
    item_id: i64,
    quantity: i64,
    name: &str,
) -> Result<MutationOutcome> {
    let name = validate_name(name)?;
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let current = find_existing(db, item_id).await?;
    let old_quantity = current.quantity;
    if quantity > old_quantity {
        return Err(Error::InsufficientStock {
            available: old_quantity,
            requested: quantity,
        });
    }
    let new_quantity = old_quantity - quantity;

    let mut active: item::ActiveModel = current.into();
    active.quantity = Set(new_quantity);
    active.update(db).await?;

    info!(
        "Issued {} of '{}' (ID: {}): {} -> {}",
        quantity, name, item_id, old_quantity, new_quantity
    );
    audit::append(
        db,
        &format!("Issued '{name}': {quantity} pcs, {old_quantity} -> {new_quantity}"),
    )
    .await;

    Ok(MutationOutcome::Issued {
        item_id,
        old_quantity,
        new_quantity,
    })
}

/// Removes a stock line permanently. There is no soft delete.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - No line with `item_id` exists
/// - The store delete fails
#[instrument(skip(db))]
pub async fn delete_item(db: &DatabaseConnection, item_id: i64, name: &str) -> Result<MutationOutcome> {
    let name = validate_name(name)?;

    let result = Item::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound { id: item_id });
    }

    info!("Deleted '{}' (ID: {})", name, item_id);
    audit::append(db, &format!("Deleted '{name}' (ID: {item_id})")).await;

    Ok(MutationOutcome::Deleted { item_id })
}
