//! # Match Engine Module
//!
//! ## Purpose
//! Orchestrates the date window, name scorer, and field matcher over the
//! current watchlist snapshot to answer screening queries.
//!
//! ## Input/Output Specification
//! - **Input**: Minimum score threshold, screening query, optional type filter
//! - **Output**: Matches in snapshot iteration order (no cross-entry
//!   re-ranking), each carrying its name score when matched via name
//! - **Inclusion**: fuzzy name match at or above the threshold, or one exact
//!   secondary-field match; date-window exclusion is checked first and wins
//!   over everything
//!
//! ## Key Features
//! - Scores are returned alongside each match, never written to shared
//!   snapshot state, so concurrent searches cannot race
//! - An empty store triggers a blocking read-through load before the first
//!   query is answered

use crate::refresh::RefreshLoader;
use crate::store::WatchlistStore;
use crate::{date_window, field_match, name_score};
use crate::{Entry, ScreeningQuery, SourceMetaData};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

/// One search hit: the matched entry plus its transient name score.
///
/// `score` is present only when the entry matched via name; an entry
/// included on secondary-field corroboration alone carries no score.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningMatch {
    #[serde(flatten)]
    pub entry: Entry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Screening engine over the current watchlist snapshot
pub struct MatchEngine {
    store: Arc<WatchlistStore>,
    loader: Arc<RefreshLoader>,
}

impl MatchEngine {
    /// Create a new engine over the given store and loader
    pub fn new(store: Arc<WatchlistStore>, loader: Arc<RefreshLoader>) -> Self {
        Self { store, loader }
    }

    /// Search the current snapshot for entries matching the query.
    ///
    /// Results preserve snapshot iteration order. If no snapshot has ever
    /// loaded, a read-through refresh is attempted first; if that also
    /// fails the result is an empty list, not an error.
    pub async fn search(&self, minimum_score: u8, query: &ScreeningQuery) -> Vec<ScreeningMatch> {
        self.loader.ensure_loaded().await;

        let Some(snapshot) = self.store.current().await else {
            return Vec::new();
        };

        screen_entries(&snapshot.entries, minimum_score, query, Local::now().date_naive())
    }

    /// Search, then keep only entries whose type equals `entry_type`
    /// case-insensitively. Entries without a type never match any filter.
    pub async fn filter_by_type(
        &self,
        minimum_score: u8,
        query: &ScreeningQuery,
        entry_type: &str,
    ) -> Vec<ScreeningMatch> {
        let mut matches = self.search(minimum_score, query).await;
        matches.retain(|m| {
            m.entry
                .entry_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(entry_type))
        });
        matches
    }

    /// Source metadata from the current snapshot, with the same empty-store
    /// read-through as `search`.
    pub async fn source_data(&self) -> Vec<SourceMetaData> {
        self.loader.ensure_loaded().await;

        match self.store.current().await {
            Some(snapshot) => snapshot.sources.clone(),
            None => Vec::new(),
        }
    }
}

/// Screen a slice of entries against a query on the given date.
///
/// For each entry, in order: skip it when outside its date window; include
/// it with a score when the query name clears the threshold; otherwise
/// include it without a score when any secondary field matches exactly.
pub fn screen_entries(
    entries: &[Entry],
    minimum_score: u8,
    query: &ScreeningQuery,
    today: NaiveDate,
) -> Vec<ScreeningMatch> {
    entries
        .iter()
        .filter_map(|entry| {
            if date_window::is_excluded(entry, today) {
                return None;
            }

            if let Some(name) = query.name.as_deref() {
                let result = name_score::best_name_score(entry, name, minimum_score);
                if result.matched {
                    return Some(ScreeningMatch {
                        entry: entry.clone(),
                        score: Some(result.score),
                    });
                }
            }

            if field_match::matches_any(entry, query) {
                return Some(ScreeningMatch {
                    entry: entry.clone(),
                    score: None,
                });
            }

            None
        })
        .collect()
}
