//! Cache Configuration

use serde::{Deserialize, Serialize};

use crate::error::{InternError, Result};

/// Sizing parameters for an [`InternCache`](crate::InternCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of slots after construction and after every reset
    pub initial_capacity: usize,

    /// Occupancy, in percent of capacity, that triggers growth
    pub load_percent: u8,
}

impl CacheConfig {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 13;
    pub const DEFAULT_LOAD_PERCENT: u8 = 77;

    /// Check the parameters and return the initial threshold
    pub fn validate(&self) -> Result<usize> {
        if self.initial_capacity == 0 {
            return Err(InternError::InvalidCapacity(self.initial_capacity));
        }
        if self.load_percent == 0 || self.load_percent > 99 {
            return Err(InternError::InvalidLoadFactor(self.load_percent));
        }
        self.threshold_for(self.initial_capacity)
    }

    /// Occupancy limit for a table of `capacity` slots.
    ///
    /// Computed as `floor(capacity * load / 100)` without an intermediate
    /// product, so it is exact for every `usize` capacity.
    pub fn threshold_for(&self, capacity: usize) -> Result<usize> {
        let threshold = scaled_threshold(capacity, self.load_percent);
        if threshold >= capacity {
            return Err(InternError::ThresholdNotBelowCapacity { threshold, capacity });
        }
        Ok(threshold)
    }
}

pub(crate) const fn scaled_threshold(capacity: usize, load_percent: u8) -> usize {
    let load = load_percent as usize;
    (capacity / 100) * load + (capacity % 100) * load / 100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            load_percent: Self::DEFAULT_LOAD_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(CacheConfig::default().validate(), Ok(10));
    }

    #[test]
    fn test_threshold_for_grown_table() {
        let config = CacheConfig::default();
        assert_eq!(config.threshold_for(27), Ok(20));
        assert_eq!(config.threshold_for(55), Ok(42));
    }

    #[test]
    fn test_threshold_exact_for_huge_capacity() {
        let config = CacheConfig::default();
        let threshold = config.threshold_for(usize::MAX).unwrap();
        assert!(threshold < usize::MAX);
        assert_eq!(threshold as u128, usize::MAX as u128 * 77 / 100);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = CacheConfig { initial_capacity: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(InternError::InvalidCapacity(0)));
    }

    #[test]
    fn test_rejects_bad_load_factor() {
        for load_percent in [0, 100, 250] {
            let config = CacheConfig { load_percent, ..Default::default() };
            assert_eq!(config.validate(), Err(InternError::InvalidLoadFactor(load_percent)));
        }
    }

    #[test]
    fn test_tiny_table_has_zero_threshold() {
        let config = CacheConfig { initial_capacity: 1, load_percent: 50 };
        assert_eq!(config.validate(), Ok(0));
    }
}
