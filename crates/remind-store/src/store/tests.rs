use super::Store;
use chrono::{NaiveDate, NaiveDateTime};
use remind_core::config::StoreConfig;
use remind_core::task::NewTask;
use remind_core::traits::TaskStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    // For in-memory, we need to bypass shellexpand and the data dir.
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

#[tokio::test]
async fn test_insert_and_get_by_due_at() {
    let store = test_store().await;
    let due = at(2022, 1, 1, 20, 0);
    let task = store
        .insert(NewTask::new(100, "01.01.2022 20:00 Wash dishes", due))
        .await
        .unwrap();
    assert!(task.id > 0);
    assert_eq!(task.chat_id, 100);

    let found = store.get_by_due_at(due).await.unwrap().unwrap();
    assert_eq!(found, task);
    assert_eq!(found.text, "01.01.2022 20:00 Wash dishes");
}

#[tokio::test]
async fn test_get_by_due_at_is_exact_minute_match() {
    let store = test_store().await;
    store
        .insert(NewTask::new(1, "x", at(2022, 1, 1, 20, 0)))
        .await
        .unwrap();

    assert!(store
        .get_by_due_at(at(2022, 1, 1, 19, 59))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get_by_due_at(at(2022, 1, 1, 20, 1))
        .await
        .unwrap()
        .is_none());

    // Seconds within the minute still match.
    let mid_minute = at(2022, 1, 1, 20, 0) + chrono::Duration::seconds(42);
    assert!(store.get_by_due_at(mid_minute).await.unwrap().is_some());
}

#[tokio::test]
async fn test_insert_truncates_seconds() {
    let store = test_store().await;
    let mut new = NewTask::new(1, "x", at(2022, 3, 4, 5, 6));
    new.due_at += chrono::Duration::seconds(30);
    let task = store.insert(new).await.unwrap();
    assert_eq!(task.due_at, at(2022, 3, 4, 5, 6));
    assert!(store
        .get_by_due_at(at(2022, 3, 4, 5, 6))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_same_minute_returns_oldest_only() {
    let store = test_store().await;
    let due = at(2022, 1, 1, 8, 0);
    let first = store.insert(NewTask::new(1, "first", due)).await.unwrap();
    let second = store.insert(NewTask::new(2, "second", due)).await.unwrap();

    let found = store.get_by_due_at(due).await.unwrap().unwrap();
    assert_eq!(found.id, first.id);

    assert!(store.delete(first.id).await.unwrap());
    let found = store.get_by_due_at(due).await.unwrap().unwrap();
    assert_eq!(found.id, second.id);
}

#[tokio::test]
async fn test_same_chat_may_hold_several_tasks() {
    let store = test_store().await;
    store
        .insert(NewTask::new(7, "a", at(2022, 1, 1, 8, 0)))
        .await
        .unwrap();
    store
        .insert(NewTask::new(7, "b", at(2022, 1, 1, 9, 0)))
        .await
        .unwrap();
    assert_eq!(store.pending_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete() {
    let store = test_store().await;
    let due = at(2022, 1, 1, 20, 0);
    let task = store.insert(NewTask::new(1, "x", due)).await.unwrap();

    assert!(store.delete(task.id).await.unwrap());
    assert!(store.get_by_due_at(due).await.unwrap().is_none());
    assert_eq!(store.pending_count().await.unwrap(), 0);

    // Deleting twice reports nothing removed.
    assert!(!store.delete(task.id).await.unwrap());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    store
        .insert(NewTask::new(1, "kept", at(2022, 1, 1, 20, 0)))
        .await
        .unwrap();
    Store::run_migrations(store.pool()).await.unwrap();
    assert_eq!(store.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_new_store_on_disk_persists_across_reopen() {
    let dir = std::env::temp_dir().join(format!("__remind_store_test_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = StoreConfig {
        db_path: dir.join("data/tasks.db").to_string_lossy().to_string(),
    };
    let due = at(2030, 6, 1, 12, 30);

    {
        let store = Store::new(&config).await.unwrap();
        store.insert(NewTask::new(5, "persist me", due)).await.unwrap();
        store.pool().close().await;
    }

    let store = Store::new(&config).await.unwrap();
    let found = store.get_by_due_at(due).await.unwrap().unwrap();
    assert_eq!(found.text, "persist me");
    assert_eq!(found.chat_id, 5);
    store.pool().close().await;

    let _ = std::fs::remove_dir_all(&dir);
}
