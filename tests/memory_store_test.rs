// tests/memory_store_test.rs


use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use vigil::memory::core::traits::MemoryStore;
use vigil::memory::core::types::MemoryKind;
use vigil::memory::storage::sqlite::SqliteMemoryStore;

#[tokio::test]
async fn expiration_is_ttl_after_creation() {
    let store = test_helpers::create_test_store().await;

    store
        .append_short_term(1, "hello", "hi there")
        .await
        .unwrap();

    let row = sqlx::query("SELECT created_at, expires_at FROM short_term_memories")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    let created_at: NaiveDateTime = row.get("created_at");
    let expires_at: NaiveDateTime = row.get("expires_at");

    assert_eq!(expires_at - created_at, Duration::hours(24));
}

#[tokio::test]
async fn expired_exchanges_are_never_returned() {
    let store = test_helpers::create_test_store().await;

    // Expired an hour ago; written directly since append always stamps now.
    let created = (Utc::now() - Duration::hours(25)).naive_utc();
    let expired = (Utc::now() - Duration::hours(1)).naive_utc();
    sqlx::query(
        "INSERT INTO short_term_memories (user_id, user_message, bot_response, created_at, expires_at)
         VALUES (1, 'old question', 'old answer', ?, ?)",
    )
    .bind(created)
    .bind(expired)
    .execute(&store.pool)
    .await
    .unwrap();

    store.append_short_term(1, "fresh", "reply").await.unwrap();

    let pairs = store.fetch_active_short_term(1, 10).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].user, "fresh");
}

#[tokio::test]
async fn purge_removes_expired_and_is_idempotent() {
    let store = test_helpers::create_test_store().await;

    let created = (Utc::now() - Duration::hours(30)).naive_utc();
    let expired = (Utc::now() - Duration::hours(6)).naive_utc();
    for n in 0..2 {
        sqlx::query(
            "INSERT INTO short_term_memories (user_id, user_message, bot_response, created_at, expires_at)
             VALUES (1, ?, 'gone', ?, ?)",
        )
        .bind(format!("stale {n}"))
        .bind(created)
        .bind(expired)
        .execute(&store.pool)
        .await
        .unwrap();
    }
    store.append_short_term(1, "current", "kept").await.unwrap();

    let first = store.purge_expired_short_term().await.unwrap();
    assert_eq!(first, 2);

    // Second consecutive run finds nothing.
    let second = store.purge_expired_short_term().await.unwrap();
    assert_eq!(second, 0);

    let pairs = store.fetch_active_short_term(1, 10).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].user, "current");
}

#[tokio::test]
async fn limit_returns_most_recent_in_chronological_order() {
    let store = test_helpers::create_test_store().await;

    for n in 1..=5 {
        store
            .append_short_term(7, &format!("question {n}"), &format!("answer {n}"))
            .await
            .unwrap();
    }

    let pairs = store.fetch_active_short_term(7, 3).await.unwrap();

    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0].user, "question 3");
    assert_eq!(pairs[1].user, "question 4");
    assert_eq!(pairs[2].user, "question 5");
    assert_eq!(pairs[2].assistant, "answer 5");
}

#[tokio::test]
async fn short_term_is_scoped_per_user() {
    let store = test_helpers::create_test_store().await;

    store.append_short_term(1, "mine", "yours").await.unwrap();
    store.append_short_term(2, "theirs", "ours").await.unwrap();

    let pairs = store.fetch_active_short_term(1, 10).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].user, "mine");
}

#[tokio::test]
async fn long_term_round_trip() {
    let store = test_helpers::create_test_store().await;

    store
        .append_long_term(1, Some(10), MemoryKind::Fact, "X", 3)
        .await
        .unwrap();

    let records = store.fetch_long_term(1, Some(10)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "X");
    assert_eq!(records[0].importance, 3);
    assert_eq!(records[0].kind, MemoryKind::Fact);
    assert_eq!(records[0].server_id, Some(10));
}

#[tokio::test]
async fn global_memories_are_visible_in_every_server_context() {
    let store = test_helpers::create_test_store().await;

    store
        .append_long_term(1, None, MemoryKind::Preference, "likes rain", 2)
        .await
        .unwrap();

    for server in [Some(10), Some(99), None] {
        let records = store.fetch_long_term(1, server).await.unwrap();
        assert_eq!(records.len(), 1, "missing for server {server:?}");
        assert_eq!(records[0].content, "likes rain");
    }
}

#[tokio::test]
async fn server_scoped_memories_stay_in_their_server() {
    let store = test_helpers::create_test_store().await;

    store
        .append_long_term(1, Some(10), MemoryKind::Fact, "guild thing", 1)
        .await
        .unwrap();

    let same_server = store.fetch_long_term(1, Some(10)).await.unwrap();
    assert_eq!(same_server.len(), 1);

    let other_server = store.fetch_long_term(1, Some(11)).await.unwrap();
    assert!(other_server.is_empty());
}

#[tokio::test]
async fn importance_is_clamped_on_append() {
    let store = test_helpers::create_test_store().await;

    store
        .append_long_term(1, None, MemoryKind::Fact, "too big", 9)
        .await
        .unwrap();
    store
        .append_long_term(1, None, MemoryKind::Fact, "too small", 0)
        .await
        .unwrap();

    let records = store.fetch_long_term(1, None).await.unwrap();
    let by_content = |c: &str| records.iter().find(|r| r.content == c).unwrap();
    assert_eq!(by_content("too big").importance, 5);
    assert_eq!(by_content("too small").importance, 1);
}

#[tokio::test]
async fn file_backed_store_creates_its_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.db");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    let store = SqliteMemoryStore::new(pool);
    store.run_migrations().await.unwrap();

    store
        .append_short_term(1, "persisted", "to disk")
        .await
        .unwrap();
    let pairs = store.fetch_active_short_term(1, 10).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(path.exists());
}

#[tokio::test]
async fn delete_respects_kind_filter() {
    let store = test_helpers::create_test_store().await;

    store
        .append_long_term(1, None, MemoryKind::Preference, "tea over coffee", 4)
        .await
        .unwrap();
    store
        .append_long_term(1, None, MemoryKind::Fact, "works nights", 2)
        .await
        .unwrap();

    let removed = store
        .delete_long_term(1, Some(MemoryKind::Preference))
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = store.fetch_long_term(1, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].kind, MemoryKind::Fact);

    let removed = store.delete_long_term(1, None).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.fetch_long_term(1, None).await.unwrap().is_empty());
}
