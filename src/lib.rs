//! # Watchlist Screening Engine
//!
//! ## Overview
//! This library screens a query identity (name plus optional secondary
//! attributes) against a periodically refreshed sanctions-style watchlist,
//! returning candidate matches with fuzzy name scores and exact-attribute
//! corroboration.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `normalize`: String canonicalization for attribute comparison
//! - `date_window`: Effective-date exclusion of inactive entries
//! - `field_match`: Exact predicates for address, birth date, and identifiers
//! - `name_score`: Token-order-insensitive fuzzy name similarity
//! - `store`: Atomic snapshot holder for the current watchlist
//! - `refresh`: Scheduled fetch/parse/install of new snapshots
//! - `engine`: Query orchestration over the current snapshot
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Screening queries (attribute map plus minimum score)
//! - **Output**: Matched entries in list order, each with its name score
//! - **Refresh**: Hourly wholesale replacement from a remote or local source
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use watchlist_screening::{Config, MatchEngine, RefreshLoader, ScreeningQuery, WatchlistStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let store = Arc::new(WatchlistStore::new());
//!     let loader = Arc::new(RefreshLoader::new(config.watchlist.clone(), store.clone())?);
//!     let engine = MatchEngine::new(store, loader);
//!     let query = ScreeningQuery {
//!         name: Some("Luciano BRUNETTI".to_string()),
//!         ..Default::default()
//!     };
//!     let matches = engine.search(90, &query).await;
//!     println!("Found {} matches", matches.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod date_window;
pub mod engine;
pub mod errors;
pub mod field_match;
pub mod name_score;
pub mod normalize;
pub mod refresh;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use engine::{MatchEngine, ScreeningMatch};
pub use errors::{Result, ScreeningError};
pub use refresh::RefreshLoader;
pub use store::{WatchlistSnapshot, WatchlistStore};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One record on the screened watchlist (person, organization, or vessel).
///
/// Field names mirror the upstream consolidated list document; unknown
/// fields in the document are ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque upstream identifier, stable across refreshes when provided
    #[serde(default)]
    pub id: Option<String>,
    /// Entry classification (entity, individual, vessel); entries without
    /// one never match a type filter
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    /// Primary display name; may itself contain comma-separated forms
    #[serde(default)]
    pub name: String,
    /// Known aliases, in list order
    #[serde(default)]
    pub alt_names: Vec<String>,
    /// Known addresses
    #[serde(default)]
    pub addresses: Vec<EntryAddress>,
    /// Free-form date-of-birth strings (full date or bare year)
    #[serde(default)]
    pub dates_of_birth: Vec<String>,
    /// Identification documents
    #[serde(default)]
    pub ids: Vec<EntryId>,
    /// First day the entry is in force (yyyy-MM-dd)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last day the entry is in force (yyyy-MM-dd)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Upstream list that contributed this entry
    #[serde(default)]
    pub source: Option<String>,
    /// Sanction programs the entry is listed under
    #[serde(default)]
    pub programs: Vec<String>,
    /// Free-form upstream remarks
    #[serde(default)]
    pub remarks: Option<String>,
}

/// One address on a watchlist entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// One identification document on a watchlist entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryId {
    /// Document number; compared after stripping non-alphanumerics
    #[serde(default)]
    pub number: Option<String>,
    /// Document kind (passport, national ID, ...)
    #[serde(rename = "type", default)]
    pub id_type: Option<String>,
    /// Issuing country
    #[serde(default)]
    pub country: Option<String>,
}

/// Provenance record for one upstream source; passthrough, not used in
/// matching logic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetaData {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_last_updated: Option<String>,
    #[serde(default)]
    pub import_rate: Option<String>,
}

/// Inbound screening query: the recognized attribute keys, all optional.
///
/// `name` drives fuzzy matching; every other attribute is an exact,
/// normalized comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
}

/// Application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub engine: Arc<engine::MatchEngine>,
    pub store: Arc<store::WatchlistStore>,
}
