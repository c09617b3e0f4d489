//! modpaths Indexer
//!
//! This crate provides the indexing engine for modpaths, including:
//! - Directory walking with base-name exclusions
//! - Module resolution through a pluggable resolver (Go sources by default)
//! - An index store that publishes whole snapshots atomically
//! - Whole-segment suffix queries with valid/invalid fallback
//! - A periodic refresh scheduler

mod error;
mod exclusions;
mod query;
mod resolver;
mod scheduler;
mod store;
mod walker;

pub use error::IndexerError;
pub use exclusions::ExclusionSet;
pub use query::QueryKind;
pub use resolver::{GoResolver, ModuleResolver, Resolution};
pub use scheduler::{RefreshHandle, RefreshScheduler, DEFAULT_REFRESH_INTERVAL};
pub use store::{normalize_path, IndexEntry, IndexStore, RebuildStats, Snapshot};
pub use walker::Walker;
