//! Activity log business logic.
//!
//! The log is append-only. Writing to it is best-effort: a mutation that has
//! already reached the store stays successful even when its log entry cannot be
//! written, and the failure is reported on the operational tracing channel only.

use crate::{
    entities::{History, history},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, warn};

/// Writes one history entry stamped with the current UTC time.
///
/// # Errors
/// Returns an error if the insert fails.
pub async fn try_append<C>(db: &C, description: &str) -> Result<history::Model>
where
    C: ConnectionTrait,
{
    let entry = history::ActiveModel {
        description: Set(description.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = entry.insert(db).await?;
    debug!("History entry {} recorded: {}", saved.id, saved.description);
    Ok(saved)
}

/// Writes one history entry, swallowing any failure.
///
/// Returns whether the entry was persisted so callers can report it, but a
/// `false` never changes the outcome of the operation being logged.
pub async fn append<C>(db: &C, description: &str) -> bool
where
    C: ConnectionTrait,
{
    match try_append(db, description).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Failed to write history entry '{description}': {e}");
            false
        }
    }
}

/// Lists every history entry, newest first.
///
/// Entries written within the same clock tick are ordered by id, so the most
/// recent write still comes first.
pub async fn list_history(db: &DatabaseConnection) -> Result<Vec<history::Model>> {
    History::find()
        .order_by_desc(history::Column::CreatedAt)
        .order_by_desc(history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
