//! Thumbnail Cache
//!
//! Key → URL store for video thumbnails, keyed by video id. The storage
//! backend is injected; the cache itself is an explicit object handed to
//! whoever needs it rather than a global.
//!
//! # Lifecycle
//! - Create once at startup with the chosen backend
//! - `get` on an absent key is `Ok(None)`, never an error
//! - No TTL or eviction; keys are bounded by the caller
//! - `clear` wipes everything and exists for test isolation
//!
//! Concurrent `set` calls for one key are last-write-wins. Keys are content
//! addressed, so a collision writes the same value twice.

use crate::db::thumbnails;
use async_trait::async_trait;
use plantdex_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Storage backend for the thumbnail cache
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, url: &str) -> Result<()>;

    /// Remove all entries, returning how many were removed
    async fn clear(&self) -> Result<u64>;
}

/// In-process backend, lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryThumbnailStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryThumbnailStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, url: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), url.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}

/// Durable backend on the `thumbnail_cache` SQLite table
#[derive(Debug, Clone)]
pub struct SqliteThumbnailStore {
    db: SqlitePool,
}

impl SqliteThumbnailStore {
    /// Wrap a pool whose schema was created by `plantdex_common::db::init_database`
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ThumbnailStore for SqliteThumbnailStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        thumbnails::get_thumbnail(&self.db, key).await
    }

    async fn set(&self, key: &str, url: &str) -> Result<()> {
        thumbnails::set_thumbnail(&self.db, key, url).await
    }

    async fn clear(&self) -> Result<u64> {
        thumbnails::clear_thumbnails(&self.db).await
    }
}

/// Thumbnail cache over an injected backend
#[derive(Clone)]
pub struct ThumbnailCache {
    store: Arc<dyn ThumbnailStore>,
}

impl ThumbnailCache {
    pub fn new(store: Arc<dyn ThumbnailStore>) -> Self {
        debug!(backend = store.name(), "Thumbnail cache created");
        Self { store }
    }

    /// Cache backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryThumbnailStore::new()))
    }

    /// Cache backed by the SQLite pool
    pub fn sqlite(db: SqlitePool) -> Self {
        Self::new(Arc::new(SqliteThumbnailStore::new(db)))
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// Cached URL for `key`; absent keys are `Ok(None)`
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let url = self.store.get(key).await?;
        debug!(key, hit = url.is_some(), "Thumbnail cache lookup");
        Ok(url)
    }

    /// Store `url` under `key`, replacing any previous value
    pub async fn set(&self, key: &str, url: &str) -> Result<()> {
        self.store.set(key, url).await?;
        debug!(key, url, "Thumbnail cached");
        Ok(())
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        let removed = self.store.clear().await?;
        info!(backend = self.store.name(), removed, "Thumbnail cache cleared");
        Ok(())
    }
}
