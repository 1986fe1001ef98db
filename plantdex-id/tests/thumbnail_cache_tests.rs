//! SQLite-backed thumbnail cache tests
//!
//! Each test gets its own database file under a TempDir.

use plantdex_common::db::init_database;
use plantdex_id::db::thumbnails;
use plantdex_id::services::{ThumbnailStore, SqliteThumbnailStore};
use plantdex_id::ThumbnailCache;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_sqlite_cache_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("plantdex.db")).await.unwrap();
    let cache = ThumbnailCache::sqlite(pool);

    cache.set("123", "http://thumb.com").await.unwrap();

    assert_eq!(cache.backend(), "sqlite");
    assert_eq!(cache.get("123").await.unwrap().as_deref(), Some("http://thumb.com"));
    assert_eq!(cache.get("999").await.unwrap(), None);
}

#[tokio::test]
async fn test_sqlite_cache_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("plantdex.db");

    {
        let pool = init_database(&db_path).await.unwrap();
        ThumbnailCache::sqlite(pool.clone())
            .set("dQw4w9WgXcQ", "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let cache = ThumbnailCache::sqlite(pool);

    assert_eq!(
        cache.get("dQw4w9WgXcQ").await.unwrap().as_deref(),
        Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
    );
}

#[tokio::test]
async fn test_sqlite_last_write_wins() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("plantdex.db")).await.unwrap();
    let cache = ThumbnailCache::sqlite(pool.clone());

    cache.set("abc", "http://old.jpg").await.unwrap();
    cache.set("abc", "http://new.jpg").await.unwrap();

    assert_eq!(cache.get("abc").await.unwrap().as_deref(), Some("http://new.jpg"));
    assert_eq!(thumbnails::count_thumbnails(&pool).await.unwrap(), 1);

    let entry = thumbnails::get_entry(&pool, "abc").await.unwrap().unwrap();
    assert_eq!(entry.url, "http://new.jpg");
}

#[tokio::test]
async fn test_sqlite_clear_removes_everything() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("plantdex.db")).await.unwrap();
    let store = SqliteThumbnailStore::new(pool.clone());

    store.set("a", "http://a.jpg").await.unwrap();
    store.set("b", "http://b.jpg").await.unwrap();

    assert_eq!(store.clear().await.unwrap(), 2);

    let cache = ThumbnailCache::new(Arc::new(store));
    assert_eq!(cache.get("a").await.unwrap(), None);
    assert_eq!(cache.get("b").await.unwrap(), None);
    assert_eq!(thumbnails::count_thumbnails(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_writers_share_one_cache() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("plantdex.db")).await.unwrap();
    let cache = ThumbnailCache::sqlite(pool);

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("video-{}", i);
            cache.set(&key, &format!("http://thumb/{}.jpg", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for i in 0..8 {
        let url = cache.get(&format!("video-{}", i)).await.unwrap();
        assert_eq!(url, Some(format!("http://thumb/{}.jpg", i)));
    }
}
