//! # Watchlist Store Module
//!
//! ## Purpose
//! Holds the current immutable snapshot of watchlist entries and source
//! metadata. Refreshes replace the snapshot wholesale with a single atomic
//! swap; readers either see the old snapshot in full or the new one in
//! full, never a mix.
//!
//! ## Input/Output Specification
//! - **Input**: Fully parsed snapshots from the refresh loader
//! - **Output**: Shared read access to the current snapshot and its stats
//! - **Lifecycle**: Empty -> Loading -> Ready; failed refreshes leave the
//!   prior state untouched
//!
//! ## Key Features
//! - Snapshots are never mutated in place; readers holding an `Arc` to an
//!   older snapshot keep using it safely
//! - A failed refresh never clears good data

use crate::{Entry, SourceMetaData};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One immutable, internally consistent load of the full entry list plus
/// source metadata.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistSnapshot {
    pub entries: Vec<Entry>,
    pub sources: Vec<SourceMetaData>,
}

/// Load state of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    /// No snapshot has ever loaded
    Empty,
    /// A refresh is in flight
    Loading,
    /// A snapshot is installed and serving queries
    Ready,
}

/// Store statistics for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub state: StoreState,
    pub entry_count: usize,
    pub source_count: usize,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Atomic holder for the current watchlist snapshot
pub struct WatchlistStore {
    snapshot: RwLock<Option<Arc<WatchlistSnapshot>>>,
    state: RwLock<StoreState>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl WatchlistStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            state: RwLock::new(StoreState::Empty),
            last_refresh: RwLock::new(None),
        }
    }

    /// Current snapshot, if any refresh has ever succeeded
    pub async fn current(&self) -> Option<Arc<WatchlistSnapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Whether no snapshot has ever been installed
    pub async fn is_empty(&self) -> bool {
        self.snapshot.read().await.is_none()
    }

    /// Current load state
    pub async fn state(&self) -> StoreState {
        *self.state.read().await
    }

    /// Mark a refresh as in flight, returning the prior state so a failed
    /// refresh can restore it.
    pub async fn begin_loading(&self) -> StoreState {
        let mut state = self.state.write().await;
        let prior = *state;
        *state = StoreState::Loading;
        prior
    }

    /// Restore the pre-refresh state after a failed refresh. `Empty` stays
    /// `Empty`, `Ready` stays on the old snapshot.
    pub async fn abort_loading(&self, prior: StoreState) {
        *self.state.write().await = prior;
    }

    /// Atomically install a new snapshot, replacing the previous one
    /// wholesale.
    pub async fn install(&self, snapshot: WatchlistSnapshot) {
        let snapshot = Arc::new(snapshot);
        let entry_count = snapshot.entries.len();

        *self.snapshot.write().await = Some(snapshot);
        *self.state.write().await = StoreState::Ready;
        *self.last_refresh.write().await = Some(Utc::now());

        tracing::info!("installed watchlist snapshot with {} entries", entry_count);
    }

    /// Store statistics for health reporting
    pub async fn stats(&self) -> StoreStats {
        let snapshot = self.snapshot.read().await;
        StoreStats {
            state: *self.state.read().await,
            entry_count: snapshot.as_ref().map_or(0, |s| s.entries.len()),
            source_count: snapshot.as_ref().map_or(0, |s| s.sources.len()),
            last_refresh: *self.last_refresh.read().await,
        }
    }
}

impl Default for WatchlistStore {
    fn default() -> Self {
        Self::new()
    }
}
