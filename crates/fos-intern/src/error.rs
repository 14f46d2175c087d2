//! Intern cache errors

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, InternError>;

/// Intern cache error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("Window {offset}+{length} is outside buffer of length {buffer_len}")]
    InvalidWindow {
        offset: usize,
        length: usize,
        buffer_len: usize,
    },

    #[error("Illegal initial capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Illegal load factor: {0}%")]
    InvalidLoadFactor(u8),

    #[error("Threshold {threshold} must be less than capacity {capacity}")]
    ThresholdNotBelowCapacity { threshold: usize, capacity: usize },

    #[error("Cannot grow cache beyond {0} slots")]
    CapacityOverflow(usize),

    /// Two slots held equal keys when the table was rehashed. The table
    /// was already inconsistent before the growth attempt.
    #[error("Internal cache error: duplicated key {key:?}")]
    DuplicateKey { key: String },
}
