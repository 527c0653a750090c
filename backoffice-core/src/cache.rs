//! Shared list cache
//!
//! One entry per list key (`"categories"`, `"coupons@page"` …). Each entry holds the
//! last loaded value, when it was loaded, whether it is still fresh, and the token
//! of the fetch currently allowed to write into it.
//!
//! Fetch tokens are issued from a single counter, so they are unique across keys
//! and increase monotonically. Starting a new fetch for a key supersedes the one in
//! flight: only the holder of the latest token may complete it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Freshness of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Never loaded.
    Empty,
    /// Loaded and not invalidated since.
    Fresh,
    /// Invalidated by a mutation; the value is outdated but may still be shown.
    Stale,
}

/// Identity of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchToken(u64);

impl fmt::Display for FetchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of an entry's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub status: CacheStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    pub in_flight: bool,
}

struct InFlight {
    token: FetchToken,
    /// Invalidation generation when the fetch started.
    generation: u64,
}

struct CacheEntry {
    data: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Option<DateTime<Utc>>,
    status: CacheStatus,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            data: None,
            fetched_at: None,
            status: CacheStatus::Empty,
            in_flight: None,
            generation: 0,
        }
    }
}

/// Keyed cache shared by every list page and mutation coordinator.
pub struct ListCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    next_token: AtomicU64,
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    fn issue(&self) -> FetchToken {
        FetchToken(self.next_token.fetch_add(1, Ordering::Relaxed))
    }

    /// Start a fetch for `key`, superseding any fetch in flight.
    pub async fn begin_fetch(&self, key: &str) -> FetchToken {
        let token = self.issue();
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(CacheEntry::new);
        if let Some(previous) = &entry.in_flight {
            log::debug!("[{key}] fetch {} superseded by {token}", previous.token);
        }
        entry.in_flight = Some(InFlight {
            token,
            generation: entry.generation,
        });
        token
    }

    /// Start a revalidation of `key`.
    ///
    /// Returns `None` when a fetch is already in flight or the entry is fresh, so
    /// calling this repeatedly after one invalidation triggers exactly one fetch.
    pub async fn begin_refresh(&self, key: &str) -> Option<FetchToken> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(CacheEntry::new);
        if entry.in_flight.is_some() || entry.status == CacheStatus::Fresh {
            return None;
        }
        let token = self.issue();
        entry.in_flight = Some(InFlight {
            token,
            generation: entry.generation,
        });
        Some(token)
    }

    /// Store the result of fetch `token`. Returns `false` (and stores nothing) when
    /// the token was superseded or abandoned.
    ///
    /// If the key was invalidated while the fetch was running, the value is stored
    /// but the entry stays stale.
    pub async fn complete<T: Any + Send + Sync>(&self, key: &str, token: FetchToken, data: T) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        let Some(in_flight) = entry.in_flight.take_if(|f| f.token == token) else {
            log::debug!("[{key}] discarding result of stale fetch {token}");
            return false;
        };
        entry.data = Some(Arc::new(data));
        entry.fetched_at = Some(Utc::now());
        entry.status = if in_flight.generation == entry.generation {
            CacheStatus::Fresh
        } else {
            CacheStatus::Stale
        };
        true
    }

    /// Finish fetch `token` without a value (it failed). Returns whether it was current.
    pub async fn fail(&self, key: &str, token: FetchToken) -> bool {
        self.abandon(key, token).await
    }

    /// Give up fetch `token`; a later `complete` with it is ignored.
    pub async fn abandon(&self, key: &str, token: FetchToken) -> bool {
        let mut entries = self.entries.write().await;
        entries
            .get_mut(key)
            .and_then(|e| e.in_flight.take_if(|f| f.token == token))
            .is_some()
    }

    /// Mark `key` stale so the next revalidation refetches it.
    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        Self::invalidate_entry(&mut entries, key);
    }

    /// Invalidate several keys at once.
    pub async fn invalidate_many<S: AsRef<str>>(&self, keys: &[S]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            Self::invalidate_entry(&mut entries, key.as_ref());
        }
    }

    fn invalidate_entry(entries: &mut HashMap<String, CacheEntry>, key: &str) {
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(CacheEntry::new);
        entry.generation += 1;
        if entry.status == CacheStatus::Fresh {
            entry.status = CacheStatus::Stale;
        }
        log::debug!("[{key}] invalidated");
    }

    /// Last value stored under `key`, if it has type `T`.
    pub async fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)?
            .data
            .as_ref()?
            .downcast_ref::<T>()
            .cloned()
    }

    pub async fn snapshot(&self, key: &str) -> Option<CacheSnapshot> {
        self.entries.read().await.get(key).map(|e| CacheSnapshot {
            status: e.status,
            fetched_at: e.fetched_at,
            in_flight: e.in_flight.is_some(),
        })
    }

    pub async fn status(&self, key: &str) -> CacheStatus {
        self.snapshot(key)
            .await
            .map_or(CacheStatus::Empty, |s| s.status)
    }
}
