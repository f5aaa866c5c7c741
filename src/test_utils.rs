//! Shared test utilities for stockroom.
//!
//! This module provides helpers for setting up an in-memory record store and
//! creating reference data and stock lines with sensible defaults.

use crate::{
    config::settings::Settings,
    core::{catalog, receiving},
    entities::{category, item, supplier},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a category through the data-entry path.
pub async fn create_test_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    catalog::create_category(db, name).await
}

/// Creates a supplier through the data-entry path.
///
/// # Defaults
/// * `tax_id`: `"0000000000"`
pub async fn create_test_supplier(db: &DatabaseConnection, name: &str) -> Result<supplier::Model> {
    catalog::create_supplier(db, name, "0000000000").await
}

/// Receives goods with the default settings.
pub async fn receive_test_goods(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
    price: f64,
    category_id: Option<i64>,
    supplier_id: Option<i64>,
) -> Result<receiving::ReceiptOutcome> {
    receiving::receive(
        db,
        &Settings::default(),
        receiving::ReceiptRequest {
            name: name.to_string(),
            quantity,
            price,
            category_id,
            supplier_id,
        },
    )
    .await
}

/// Inserts a raw item row, bypassing the receiving rules.
/// Use this to build states receipts cannot produce (duplicates, NULL prices,
/// non-positive quantities, dangling references).
pub async fn insert_raw_item(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
    price: Option<f64>,
    category_id: Option<i64>,
    supplier_id: Option<i64>,
) -> Result<item::Model> {
    item::ActiveModel {
        name: Set(name.to_string()),
        quantity: Set(quantity),
        price: Set(price),
        category_id: Set(category_id),
        supplier_id: Set(supplier_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a store with one category ("Electronics") and one supplier ("AcmeCo").
/// Returns (db, category, supplier) for the common receiving scenarios.
pub async fn setup_with_catalog()
-> Result<(DatabaseConnection, category::Model, supplier::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Electronics").await?;
    let supplier = create_test_supplier(&db, "AcmeCo").await?;
    Ok((db, category, supplier))
}
