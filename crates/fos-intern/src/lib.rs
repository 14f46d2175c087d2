//! fOS Intern
//!
//! String cache for streaming parsers. Names seen while tokenizing
//! (elements, attributes, namespace prefixes) are looked up by their raw
//! character window and resolved to one shared `Arc<str>` per content, so
//! repeated tokens cost a probe instead of an allocation.

mod cache;
mod config;
mod error;
mod hash;
mod metrics;

pub use cache::InternCache;
pub use config::CacheConfig;
pub use error::{InternError, Result};
pub use metrics::{CacheMetrics, CacheStats, StatsSnapshot};
