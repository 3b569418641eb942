use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cache::{CacheEntry, ContentStore, TtlPolicy};
use crate::error::FetchError;
use crate::model::WorkItem;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Skip the fresh-cache shortcut and always hit the network.
    pub force_refresh: bool,
    pub policy: TtlPolicy,
}

/// Fresh cache, else one fetch (written back on success), else the stale
/// cache, else nothing. Never fails.
pub async fn load_works<S, F>(store: Option<&S>, fetch: F, opts: &LoadOptions) -> Vec<WorkItem>
where
    S: ContentStore,
    F: Future<Output = Result<Vec<WorkItem>, FetchError>>,
{
    let cached = store.and_then(read_cache);

    if !opts.force_refresh {
        if let Some(entry) = cached.as_ref().filter(|e| opts.policy.is_fresh(e, Utc::now())) {
            info!("Using cached works ({} items)", entry.data.len());
            return entry.data.clone();
        }
    }

    match fetch.await {
        Ok(works) => {
            if let Some(store) = store {
                if let Err(e) = store.put(&CacheEntry::new(works.clone(), Utc::now())) {
                    warn!("Failed to cache works: {:#}", e);
                }
            }
            works
        }
        Err(e) => {
            warn!("Failed to fetch works: {}", e);
            match cached {
                Some(entry) => {
                    warn!("Serving stale cache ({} items)", entry.data.len());
                    entry.data
                }
                None => Vec::new(),
            }
        }
    }
}

/// Cache-only read: the cached works while fresh, otherwise nothing.
pub fn cached_works<S: ContentStore>(store: &S, policy: &TtlPolicy, now: DateTime<Utc>) -> Vec<WorkItem> {
    read_cache(store)
        .filter(|entry| policy.is_fresh(entry, now))
        .map(|entry| entry.data)
        .unwrap_or_default()
}

fn read_cache<S: ContentStore>(store: &S) -> Option<CacheEntry> {
    match store.get() {
        Ok(entry) => entry,
        Err(e) => {
            warn!("Failed to read cache: {:#}", e);
            None
        }
    }
}

// ── Tests ──
