//! Catalog business logic - categories and suppliers.
//!
//! Reference sets are small and read whole. The core never mutates them while
//! handling stock; they are filled through the data-entry functions here, which
//! keep names unique so that name-based selection maps back to exactly one id.

use crate::{
    config::settings::Settings,
    entities::{Category, Supplier, category, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info};

/// Lists all categories ordered by id.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    let categories = Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} categories.", categories.len());
    Ok(categories)
}

/// Lists all suppliers ordered by id.
pub async fn list_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    let suppliers = Supplier::find()
        .order_by_asc(supplier::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} suppliers.", suppliers.len());
    Ok(suppliers)
}

/// Builds a name → id map for category selection.
///
/// If two rows share a name the last one seen wins.
#[must_use]
pub fn category_lookup(categories: &[category::Model]) -> HashMap<String, i64> {
    categories.iter().map(|c| (c.name.clone(), c.id)).collect()
}

/// Builds a name → id map for supplier selection.
///
/// If two rows share a name the last one seen wins.
#[must_use]
pub fn supplier_lookup(suppliers: &[supplier::Model]) -> HashMap<String, i64> {
    suppliers.iter().map(|s| (s.name.clone(), s.id)).collect()
}

fn validate_reference_name(name: &str, kind: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{kind} name cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Creates a category, rejecting empty or already used names.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - A category with the same name exists
/// - The database insert fails
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let name = validate_reference_name(name, "Category")?;

    let existing = Category::find()
        .filter(category::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateReference {
            kind: "category",
            name,
        });
    }

    let saved = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Added category '{}' (ID: {})", saved.name, saved.id);
    Ok(saved)
}

/// Creates a supplier, rejecting empty or already used names.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - A supplier with the same name exists
/// - The database insert fails
pub async fn create_supplier(
    db: &DatabaseConnection,
    name: &str,
    tax_id: &str,
) -> Result<supplier::Model> {
    let name = validate_reference_name(name, "Supplier")?;

    let existing = Supplier::find()
        .filter(supplier::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateReference {
            kind: "supplier",
            name,
        });
    }

    let saved = supplier::ActiveModel {
        name: Set(name),
        tax_id: Set(tax_id.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Added supplier '{}' (ID: {})", saved.name, saved.id);
    Ok(saved)
}

/// Inserts the categories and suppliers listed in the settings that are not yet stored.
///
/// Returns how many rows were added. Running it again adds nothing.
pub async fn seed_catalog(db: &DatabaseConnection, settings: &Settings) -> Result<usize> {
    let known_categories = category_lookup(&list_categories(db).await?);
    let known_suppliers = supplier_lookup(&list_suppliers(db).await?);
    let mut added = 0;

    for seed in &settings.categories {
        if !known_categories.contains_key(seed.name.trim()) {
            create_category(db, &seed.name).await?;
            added += 1;
        }
    }
    for seed in &settings.suppliers {
        if !known_suppliers.contains_key(seed.name.trim()) {
            create_supplier(db, &seed.name, &seed.tax_id).await?;
            added += 1;
        }
    }

    info!("Catalog seeding added {added} reference rows.");
    Ok(added)
}
