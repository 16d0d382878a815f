//! Integration tests for restart durability and idempotent schema bootstrap.

use std::sync::Arc;

use note_taker::mcp::handler::AppState;
use note_taker::persistence::db;
use tokio_util::sync::CancellationToken;

use super::test_helpers::{app_state_for, test_config};

#[tokio::test]
async fn notes_survive_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp.path().join("notes.db"));
    let ct = CancellationToken::new();

    {
        let state = app_state_for(config.clone()).await;
        state.notes.create("todo", "buy milk", &ct).await.expect("todo");
        state
            .notes
            .create("shopping", "eggs", &ct)
            .await
            .expect("shopping");
        state.db.close().await;
    }

    let reopened = app_state_for(config).await;
    assert_eq!(
        reopened
            .notes
            .get_content("todo", &ct)
            .await
            .expect("get")
            .as_deref(),
        Some("buy milk")
    );
    assert_eq!(
        reopened.notes.list_titles("", &ct).await.expect("list"),
        vec!["todo", "shopping"]
    );
}

#[tokio::test]
async fn uniqueness_enforced_after_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp.path().join("notes.db"));
    let ct = CancellationToken::new();

    let first = app_state_for(config.clone()).await;
    first.notes.create("todo", "buy milk", &ct).await.expect("todo");
    first.db.close().await;

    let second = app_state_for(config).await;
    assert!(second.notes.create("todo", "buy eggs", &ct).await.is_err());
    assert_eq!(
        second
            .notes
            .get_content("todo", &ct)
            .await
            .expect("get")
            .as_deref(),
        Some("buy milk")
    );
}

#[tokio::test]
async fn nested_db_directory_is_created() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("data").join("nested").join("notes.db");
    let config = test_config(&path);

    let database = db::connect(&config).await.expect("connect creates dirs");
    database.close().await;
    assert!(path.exists());
}

#[tokio::test]
async fn legacy_table_with_null_content_is_readable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp.path().join("legacy.db"));

    // Pre-populate the file the way an older deployment would have.
    {
        let database = db::connect(&config).await.expect("connect");
        sqlx::query("INSERT INTO notes (title, content) VALUES ('old', NULL)")
            .execute(&database)
            .await
            .expect("legacy insert");
        database.close().await;
    }

    let database = Arc::new(db::connect(&config).await.expect("reconnect"));
    let state = AppState::new(Arc::new(config), database);
    let ct = CancellationToken::new();

    assert_eq!(
        state.notes.get_content("old", &ct).await.expect("get").as_deref(),
        Some("")
    );
    assert_eq!(state.notes.list_titles("", &ct).await.expect("list"), vec!["old"]);
}
