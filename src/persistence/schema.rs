//! `SQLite` schema bootstrap logic.
//!
//! Runs on every startup, including against database files written by
//! earlier deployments.

use sqlx::SqlitePool;

use crate::Result;

/// Apply the `notes` table definition to the connected `SQLite` database.
///
/// # Errors
///
/// Returns `AppError::Db` if the DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS notes (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title   TEXT UNIQUE,
    content TEXT
);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
