use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::model::WorkItem;

pub const CACHE_KEY: &str = "portfolio_works_cache";

/// Last successful fetch and when it happened (epoch millis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub data: Vec<WorkItem>,
}

impl CacheEntry {
    pub fn new(data: Vec<WorkItem>, now: DateTime<Utc>) -> Self {
        CacheEntry {
            timestamp: now.timestamp_millis(),
            data,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        Duration::milliseconds(now.timestamp_millis() - self.timestamp)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    pub ttl: Duration,
}

impl TtlPolicy {
    pub fn new(ttl: Duration) -> Self {
        TtlPolicy { ttl }
    }

    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        entry.age(now) < self.ttl
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy::new(Duration::hours(24))
    }
}

/// Single-slot store for the fetched collection.
pub trait ContentStore {
    fn get(&self) -> Result<Option<CacheEntry>>;
    fn put(&self, entry: &CacheEntry) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Key/value table in a local SQLite file; the entry is stored as JSON.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = SqliteStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_cache (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }
}

impl ContentStore for SqliteStore {
    fn get(&self) -> Result<Option<CacheEntry>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_cache WHERE key = ?1",
                [CACHE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|json| serde_json::from_str(&json).context("Corrupt cache entry"))
            .transpose()
    }

    fn put(&self, entry: &CacheEntry) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.conn.execute(
            "INSERT INTO kv_cache (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            rusqlite::params![CACHE_KEY, json],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_cache WHERE key = ?1", [CACHE_KEY])?;
        Ok(())
    }
}


// ── Tests ──
