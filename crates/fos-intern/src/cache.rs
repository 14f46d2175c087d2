//! Intern Cache
//!
//! Open-addressing table from character windows to canonical strings.
//! A tokenizer hands in `(buffer, offset, length)` and gets back an
//! `Arc<str>`; every later window with the same content yields the same
//! `Arc` until the cache is reset.
//!
//! Layout:
//! - One slot per index, each either empty or holding the owned key
//!   characters, their hash, and the canonical string
//! - Linear probing with step 1, capacity kept odd by growing to `2n + 1`
//! - Growth happens on insert once `count` reaches `threshold`

use std::fmt;
use std::sync::Arc;

use crate::config::{CacheConfig, scaled_threshold};
use crate::error::{InternError, Result};
use crate::hash::{home_slot, window_hash};
use crate::metrics::CacheMetrics;

#[derive(Clone)]
struct Entry {
    hash: u32,
    key: Box<[char]>,
    value: Arc<str>,
}

impl Entry {
    #[inline]
    fn matches(&self, hash: u32, window: &[char]) -> bool {
        self.hash == hash && *self.key == *window
    }
}

/// String cache owned by a single parser.
///
/// Cloning produces an independent table: key characters and the slot
/// array are copied, canonical strings are shared. Growth or reset on one
/// copy is never visible through the other. An attached metrics sink is
/// shared by both copies.
///
/// ```
/// use fos_intern::InternCache;
///
/// let buffer: Vec<char> = "<div><div>".chars().collect();
/// let mut cache = InternCache::new();
///
/// let first = cache.intern_or_create(&buffer, 1, 3).unwrap();
/// let second = cache.intern_or_create(&buffer, 6, 3).unwrap();
///
/// assert_eq!(&*first, "div");
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone)]
pub struct InternCache {
    slots: Vec<Option<Entry>>,
    count: usize,
    threshold: usize,
    initial_threshold: usize,
    config: CacheConfig,
    interning: bool,
    metrics: Option<Arc<dyn CacheMetrics>>,
}

impl InternCache {
    /// Create an empty cache with the default configuration
    pub fn new() -> Self {
        let config = CacheConfig::default();
        let threshold = scaled_threshold(config.initial_capacity, config.load_percent);
        Self::from_parts(config, threshold)
    }

    /// Create an empty cache, rejecting invalid sizing parameters
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let threshold = config.validate()?;
        Ok(Self::from_parts(config, threshold))
    }

    fn from_parts(config: CacheConfig, threshold: usize) -> Self {
        Self {
            slots: empty_slots(config.initial_capacity),
            count: 0,
            threshold,
            initial_threshold: threshold,
            config,
            interning: true,
            metrics: None,
        }
    }

    /// Attach a metrics sink
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Replace or remove the metrics sink
    pub fn set_metrics(&mut self, metrics: Option<Arc<dyn CacheMetrics>>) {
        self.metrics = metrics;
    }

    /// Return a string equal to `buffer[offset..offset + length]`.
    ///
    /// With interning enabled the result is the canonical instance for that
    /// content; otherwise a fresh string is built and the table is left
    /// alone.
    pub fn intern_or_create(
        &mut self,
        buffer: &[char],
        offset: usize,
        length: usize,
    ) -> Result<Arc<str>> {
        let window = window(buffer, offset, length)?;
        if !self.interning {
            return Ok(materialize(window));
        }

        let hash = window_hash(window);
        let (mut slot, walks) = self.probe(hash, window);
        if let Some(entry) = &self.slots[slot] {
            self.report_lookup(walks, true);
            return Ok(Arc::clone(&entry.value));
        }
        self.report_lookup(walks, false);

        if self.count >= self.threshold {
            while self.count >= self.threshold {
                self.grow()?;
            }
            slot = self.probe(hash, window).0;
        }

        let value = materialize(window);
        self.slots[slot] = Some(Entry {
            hash,
            key: window.into(),
            value: Arc::clone(&value),
        });
        self.count += 1;
        Ok(value)
    }

    /// Canonical string for `window`, if cached. Never inserts or grows.
    pub fn lookup(&self, window: &[char]) -> Option<&Arc<str>> {
        let (slot, _) = self.probe(window_hash(window), window);
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    pub fn contains(&self, window: &[char]) -> bool {
        self.lookup(window).is_some()
    }

    /// Drop every entry and shrink back to the initial capacity.
    ///
    /// Strings handed out earlier stay valid; they are just no longer
    /// found, so equal content is allocated anew.
    pub fn reset(&mut self) {
        self.slots = empty_slots(self.config.initial_capacity);
        self.count = 0;
        self.threshold = self.initial_threshold;
        tracing::trace!(capacity = self.slots.len(), "intern cache reset");
        if let Some(metrics) = &self.metrics {
            metrics.record_reset();
        }
    }

    /// Switch canonicalization on or off. Turning it off clears the table.
    pub fn set_interning_enabled(&mut self, enabled: bool) {
        if self.interning && !enabled {
            self.reset();
        }
        self.interning = enabled;
    }

    pub fn is_interning_enabled(&self) -> bool {
        self.interning
    }

    /// Number of cached strings
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots in the table
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupancy at which the next insert grows the table
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cached canonical strings in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.slots.iter().flatten().map(|entry| &entry.value)
    }

    /// Slot holding `window`, or the empty slot where it would go.
    ///
    /// Terminates because `count <= threshold < capacity` leaves at least
    /// one empty slot.
    fn probe(&self, hash: u32, window: &[char]) -> (usize, usize) {
        let capacity = self.slots.len();
        let mut slot = home_slot(hash, capacity);
        let mut walks = 0;
        while let Some(entry) = &self.slots[slot] {
            if entry.matches(hash, window) {
                break;
            }
            slot = (slot + 1) % capacity;
            walks += 1;
        }
        (slot, walks)
    }

    /// Rehash into a table of `2n + 1` slots.
    ///
    /// Every entry is placed before any is moved, so on error the table is
    /// exactly as it was.
    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .ok_or(InternError::CapacityOverflow(old_capacity))?;
        let new_threshold = self.config.threshold_for(new_capacity)?;

        let mut placement: Vec<Option<usize>> = vec![None; new_capacity];
        for (index, entry) in self.slots.iter().enumerate() {
            let Some(entry) = entry else { continue };
            let mut slot = home_slot(entry.hash, new_capacity);
            while let Some(placed) = placement[slot] {
                let duplicate = self.slots[placed]
                    .as_ref()
                    .is_some_and(|other| other.matches(entry.hash, &entry.key));
                if duplicate {
                    let key: String = entry.key.iter().collect();
                    tracing::error!(%key, old_capacity, "duplicated key while rehashing intern cache");
                    return Err(InternError::DuplicateKey { key });
                }
                slot = (slot + 1) % new_capacity;
            }
            placement[slot] = Some(index);
        }

        let mut old = std::mem::take(&mut self.slots);
        self.slots = placement
            .into_iter()
            .map(|index| index.and_then(|i| old[i].take()))
            .collect();
        self.threshold = new_threshold;

        tracing::debug!(old_capacity, new_capacity, count = self.count, "intern cache resized");
        if let Some(metrics) = &self.metrics {
            metrics.record_grow(old_capacity, new_capacity);
        }
        Ok(())
    }

    #[inline]
    fn report_lookup(&self, walks: usize, hit: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(walks, hit);
        }
    }
}

impl Default for InternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternCache")
            .field("count", &self.count)
            .field("threshold", &self.threshold)
            .field("capacity", &self.slots.len())
            .field("interning", &self.interning)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

fn empty_slots(capacity: usize) -> Vec<Option<Entry>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

fn window(buffer: &[char], offset: usize, length: usize) -> Result<&[char]> {
    offset
        .checked_add(length)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(InternError::InvalidWindow {
            offset,
            length,
            buffer_len: buffer.len(),
        })
}

fn materialize(window: &[char]) -> Arc<str> {
    Arc::from(window.iter().collect::<String>())
}
