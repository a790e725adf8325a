//! Additive schema management
//!
//! Tables are created if absent; columns added in later revisions arrive via
//! a `PRAGMA table_info` presence check followed by `ALTER TABLE ADD COLUMN`.
//! Nothing here ever drops or rewrites existing data.

use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

/// Create missing tables and indexes, then apply additive column migrations.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS referrals (
            inviter_id INTEGER NOT NULL,
            inviter_name TEXT NOT NULL,
            invitee_id INTEGER NOT NULL,
            invitee_name TEXT NOT NULL,
            invite_code TEXT NOT NULL,
            joined_at TIMESTAMP NOT NULL,
            is_validated BOOLEAN NOT NULL DEFAULT 0,
            is_member_active BOOLEAN NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Historical rows reactivate instead of duplicating, so one row per invitee.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_referrals_invitee ON referrals (invitee_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS member_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            action TEXT NOT NULL,
            recorded_at TIMESTAMP NOT NULL,
            had_required_role BOOLEAN NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_member_history_member ON member_history (member_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_type TEXT NOT NULL,
            payload TEXT NOT NULL,
            severity TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS board_messages (
            guild_id INTEGER PRIMARY KEY,
            channel_id INTEGER NOT NULL,
            message_id INTEGER NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Columns added after the first deployed revision.
    add_column_if_missing(
        pool,
        "referrals",
        "was_previous_resident",
        "BOOLEAN NOT NULL DEFAULT 0",
    )
    .await?;

    info!("Database schema ready");
    Ok(())
}

/// Presence-check a column and `ALTER TABLE ADD COLUMN` when it is missing.
///
/// `table` and `column` are compile-time literals from this module, never
/// user input.
async fn add_column_if_missing(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), sqlx::Error> {
    if has_column(pool, table, column).await? {
        debug!(table, column, "Column already present");
        return Ok(());
    }

    sqlx::query(&format!(
        "ALTER TABLE {table} ADD COLUMN {column} {definition}"
    ))
    .execute(pool)
    .await?;

    info!(table, column, "Added column");
    Ok(())
}

async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .any(|row| row.get::<String, _>("name") == column))
}
