//! Note repository for `SQLite` persistence.
//!
//! Each operation borrows a pooled connection for its own duration only.
//! `create` runs inside an explicit transaction; dropping the transaction on
//! any early return rolls it back, so a failed or cancelled insert never
//! leaves a partial row behind.

use std::sync::Arc;

use sqlx::{Sqlite, Transaction};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::models::note::{validate_title, Note};
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for note records.
#[derive(Clone)]
pub struct NoteRepo {
    db: Arc<Database>,
}

impl NoteRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new note, failing if the title is already taken.
    ///
    /// Uniqueness is enforced by the `UNIQUE` constraint on `notes.title`, so
    /// of several racing inserts for one title exactly one commits. When
    /// `cancel` fires before the commit, the transaction is rolled back and
    /// storage is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank title,
    /// `AppError::Duplicate` if the title exists, `AppError::Cancelled` if
    /// aborted, or `AppError::Db` on storage faults.
    pub async fn create(
        &self,
        title: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<Note> {
        validate_title(title)?;

        let staged = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(aborted("create", title)),
            staged = self.stage_insert(title, content) => staged,
        };
        let (tx, id) = staged.map_err(|err| match err {
            AppError::Duplicate(_) => {
                AppError::Duplicate(format!("a note titled '{title}' already exists"))
            }
            other => other,
        })?;

        if cancel.is_cancelled() {
            tx.rollback().await?;
            return Err(aborted("create", title));
        }
        tx.commit().await?;

        debug!(id, title, "note committed");
        Ok(Note {
            id,
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    /// Fetch the content of the note with exactly this title.
    ///
    /// Returns `Ok(None)` when no such note exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cancelled` if aborted, or `AppError::Db` if the
    /// query fails.
    pub async fn get_content(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let query = sqlx::query_scalar::<_, Option<String>>(
            "SELECT content FROM notes WHERE title = ?1",
        )
        .bind(title)
        .fetch_optional(self.db.as_ref());

        let row = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(aborted("get", title)),
            row = query => row?,
        };

        // Rows written by older deployments may carry a NULL body.
        Ok(row.map(Option::unwrap_or_default))
    }

    /// List titles in insertion order, optionally filtered by substring.
    ///
    /// An empty `filter` matches every note. Matching is case-insensitive
    /// for ASCII letters and treats `%`, `_` and `\` literally.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cancelled` if aborted, or `AppError::Db` if the
    /// query fails.
    pub async fn list_titles(
        &self,
        filter: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let query = sqlx::query_scalar::<_, String>(
            "SELECT title FROM notes
             WHERE title IS NOT NULL AND title LIKE ?1 ESCAPE '\\'
             ORDER BY id ASC",
        )
        .bind(like_pattern(filter))
        .fetch_all(self.db.as_ref());

        let titles = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(aborted("list", filter)),
            titles = query => titles?,
        };

        Ok(titles)
    }

    async fn stage_insert(
        &self,
        title: &str,
        content: &str,
    ) -> Result<(Transaction<'static, Sqlite>, i64)> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("INSERT INTO notes (title, content) VALUES (?1, ?2)")
            .bind(title)
            .bind(content)
            .execute(&mut *tx)
            .await?;
        Ok((tx, result.last_insert_rowid()))
    }
}

fn aborted(operation: &str, subject: &str) -> AppError {
    AppError::Cancelled(format!("{operation} '{subject}' aborted by caller"))
}

/// Build a `LIKE` pattern matching `filter` anywhere in the title.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
