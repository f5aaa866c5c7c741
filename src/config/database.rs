//! Database configuration module for stockroom.
//!
//! This module opens the record store and creates its tables using `SeaORM`.
//! The store client is created once at startup and passed explicitly to every
//! operation. Table creation uses `Schema::create_table_from_entity`, so the
//! schema always matches the entity definitions without hand-written SQL.

use crate::config::settings::Settings;
use crate::entities::{Category, History, Item, Supplier};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::{path::Path, time::Duration};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/stockroom.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the record store.
///
/// Connect and acquire timeouts come from the settings, so an unreachable store
/// surfaces as a database error instead of hanging the operator.
pub async fn create_connection(database_url: &str, settings: &Settings) -> Result<DatabaseConnection> {
    let timeout = Duration::from_secs(settings.connect_timeout_secs);
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    debug!("Connecting to record store at {database_url}");
    Database::connect(options).await.map_err(Into::into)
}

/// Creates the parent directory of a file-backed `SQLite` store.
///
/// `SQLite` creates the database file on demand (`mode=rwc`) but not the
/// directory holding it. Other URLs, including in-memory stores, are left alone.
pub fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        debug!("Ensured store directory {}", parent.display());
    }
    Ok(())
}

/// Creates the `items`, `categories`, `suppliers` and `history` tables if they do not exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Supplier).await?;
    create_table(db, &schema, Item).await?;
    create_table(db, &schema, History).await?;

    info!("Record store tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
