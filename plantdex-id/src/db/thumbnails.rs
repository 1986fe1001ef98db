//! Thumbnail cache queries
//!
//! Key-value rows in `thumbnail_cache`. Writes are upserts, so the last
//! write for a key wins.

use chrono::{DateTime, Utc};
use plantdex_common::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Stored cache row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub url: String,
    pub cached_at: DateTime<Utc>,
}

/// URL cached under `key`, if any
pub async fn get_thumbnail(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT url FROM thumbnail_cache WHERE cache_key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    Ok(row.map(|(url,)| url))
}

/// Full row for `key`, if any
pub async fn get_entry(db: &Pool<Sqlite>, key: &str) -> Result<Option<CacheEntry>> {
    let row: Option<(String, String, String)> = sqlx::query_as(
        "SELECT cache_key, url, cached_at FROM thumbnail_cache WHERE cache_key = ?",
    )
    .bind(key)
    .fetch_optional(db)
    .await
    .map_err(Error::Database)?;

    match row {
        Some((key, url, cached_at)) => Ok(Some(CacheEntry {
            key,
            url,
            cached_at: parse_timestamp(&cached_at)?,
        })),
        None => Ok(None),
    }
}

/// Insert or replace the URL for `key`
pub async fn set_thumbnail(db: &Pool<Sqlite>, key: &str, url: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO thumbnail_cache (cache_key, url, cached_at) VALUES (?, ?, ?)
         ON CONFLICT(cache_key) DO UPDATE SET url = excluded.url, cached_at = excluded.cached_at",
    )
    .bind(key)
    .bind(url)
    .bind(Utc::now().format(SQLITE_TIMESTAMP).to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Delete every row, returning how many were removed
pub async fn clear_thumbnails(db: &Pool<Sqlite>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM thumbnail_cache")
        .execute(db)
        .await
        .map_err(Error::Database)?;

    Ok(result.rows_affected())
}

/// Number of cached rows
pub async fn count_thumbnails(db: &Pool<Sqlite>) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM thumbnail_cache")
        .fetch_one(db)
        .await
        .map_err(Error::Database)?;

    Ok(row.0)
}

// Same layout as SQLite's datetime('now') default
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(value, SQLITE_TIMESTAMP)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::Internal(format!("Bad cached_at '{}': {}", value, e)))
}

// ============================================================================
// Tests
// ============================================================================
