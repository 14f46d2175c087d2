//! Parser Configuration

use fos_intern::CacheConfig;
use serde::{Deserialize, Serialize};

/// When the string cache is cleared between documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheResetPolicy {
    /// Keep canonical names across documents
    #[default]
    Retain,
    /// Start every document with an empty cache
    PerDocument,
}

/// Parser configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// String cache sizing
    pub cache: CacheConfig,

    /// Initial state of the names-interned feature
    pub names_interned: bool,

    /// Initial state of the process-namespaces feature
    pub process_namespaces: bool,

    pub reset_policy: CacheResetPolicy,

    /// Characters requested from the source per buffer fill
    pub read_chunk: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            names_interned: true,
            process_namespaces: false,
            reset_policy: CacheResetPolicy::Retain,
            read_chunk: 4096,
        }
    }
}
