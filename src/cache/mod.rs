//! In-process TTL cache.
//!
//! # Design Decisions
//! - Explicitly constructed and injected through application state
//! - Expired entries are removed lazily by the lookup that finds them
//! - No background sweep; the cache is advisory, never a source of truth

pub mod simple;

pub use simple::SimpleCache;
