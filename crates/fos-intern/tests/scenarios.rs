//! Behavioral tests for fos-intern
//!
//! Growth, reset, interning mode and clone isolation as seen by a parser.

use std::sync::Arc;

use fos_intern::{CacheConfig, CacheStats, InternCache, InternError};

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn intern(cache: &mut InternCache, s: &str) -> Arc<str> {
    let buffer = chars(s);
    cache.intern_or_create(&buffer, 0, buffer.len()).unwrap()
}

const TOKENS: &[&str] = &[
    "id", "class", "div", "span", "a", "href", "src", "alt", "title", "data",
];

// ============================================================================
// GROWTH
// ============================================================================

#[test]
fn test_eleventh_token_triggers_single_growth() {
    let mut cache = InternCache::new();
    assert_eq!(cache.capacity(), 13);
    assert_eq!(cache.threshold(), 10);

    let mut handles = Vec::new();
    for token in TOKENS {
        handles.push(intern(&mut cache, token));
        assert_eq!(cache.capacity(), 13, "grew early at {token}");
    }
    assert_eq!(cache.len(), 10);

    handles.push(intern(&mut cache, "name"));
    assert_eq!(cache.capacity(), 27);
    assert_eq!(cache.threshold(), 20);
    assert_eq!(cache.len(), 11);

    for (token, handle) in TOKENS.iter().chain(["name"].iter()).zip(&handles) {
        let found = cache.lookup(&chars(token)).expect("entry lost in growth");
        assert_eq!(&**found, *token);
        assert!(Arc::ptr_eq(found, handle));
    }
}

#[test]
fn test_strings_survive_growth() {
    let mut cache = InternCache::new();
    let div = intern(&mut cache, "div");
    for i in 0..200 {
        intern(&mut cache, &format!("el-{i}"));
    }
    assert!(cache.capacity() > 13);
    assert_eq!(&*div, "div");
    assert!(Arc::ptr_eq(&div, &intern(&mut cache, "div")));
}

#[test]
fn test_capacity_stays_odd() {
    let mut cache = InternCache::new();
    for i in 0..500 {
        intern(&mut cache, &format!("n{i}"));
        assert_eq!(cache.capacity() % 2, 1);
        assert!(cache.len() <= cache.threshold());
        assert!(cache.threshold() < cache.capacity());
    }
}

// ============================================================================
// DEDUPLICATION
// ============================================================================

#[test]
fn test_same_token_twice() {
    let mut cache = InternCache::new();
    let before = cache.len();
    let first = intern(&mut cache, "div");
    let second = intern(&mut cache, "div");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), before + 1);
}

#[test]
fn test_windows_from_different_buffers() {
    let doc = chars("<svg:rect svg:x=\"1\"/>");
    let other = chars("svg");
    let mut cache = InternCache::new();

    let prefix = cache.intern_or_create(&doc, 1, 3).unwrap();
    let attr_prefix = cache.intern_or_create(&doc, 10, 3).unwrap();
    let standalone = cache.intern_or_create(&other, 0, 3).unwrap();

    assert!(Arc::ptr_eq(&prefix, &attr_prefix));
    assert!(Arc::ptr_eq(&prefix, &standalone));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_non_ascii_names() {
    let mut cache = InternCache::new();
    let a = intern(&mut cache, "élément");
    let b = intern(&mut cache, "élément");
    let c = intern(&mut cache, "element");
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(&*a, "élément");
}

// ============================================================================
// RESET AND INTERNING MODE
// ============================================================================

#[test]
fn test_reset_forgets_entries() {
    let mut cache = InternCache::new();
    for i in 0..40 {
        intern(&mut cache, &format!("k{i}"));
    }
    let old = intern(&mut cache, "div");
    cache.reset();

    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 13);
    assert_eq!(cache.threshold(), 10);

    let fresh = intern(&mut cache, "div");
    assert!(!Arc::ptr_eq(&old, &fresh));
    assert_eq!(&*old, "div");
    assert_eq!(old, fresh);
}

#[test]
fn test_disable_then_enable() {
    let mut cache = InternCache::new();
    intern(&mut cache, "div");
    assert_eq!(cache.len(), 1);

    cache.set_interning_enabled(false);
    assert!(!cache.is_interning_enabled());
    assert_eq!(cache.len(), 0);

    cache.set_interning_enabled(true);
    let div = intern(&mut cache, "div");
    assert_eq!(&*div, "div");
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_repeated_disable_resets_once() {
    let stats = Arc::new(CacheStats::new());
    let mut cache = InternCache::new().with_metrics(stats.clone());
    intern(&mut cache, "div");
    cache.set_interning_enabled(false);
    cache.set_interning_enabled(false);
    assert_eq!(stats.snapshot().resets, 1);
}

// ============================================================================
// CLONE ISOLATION
// ============================================================================

#[test]
fn test_clone_shares_strings_not_table() {
    let mut a = InternCache::new();
    let div = intern(&mut a, "div");
    let mut b = a.clone();

    assert!(Arc::ptr_eq(&div, &intern(&mut b, "div")));

    intern(&mut a, "only-in-a");
    assert!(!b.contains(&chars("only-in-a")));
    intern(&mut b, "only-in-b");
    assert!(!a.contains(&chars("only-in-b")));
}

#[test]
fn test_clone_growth_does_not_leak() {
    let mut a = InternCache::new();
    for token in TOKENS {
        intern(&mut a, token);
    }
    let mut b = a.clone();

    for i in 0..100 {
        intern(&mut b, &format!("b{i}"));
    }
    assert!(b.capacity() > 13);
    assert_eq!(a.capacity(), 13);
    assert_eq!(a.len(), 10);
    for token in TOKENS {
        assert_eq!(
            &**a.lookup(&chars(token)).unwrap(),
            &**b.lookup(&chars(token)).unwrap()
        );
    }
}

#[test]
fn test_clone_reset_independent() {
    let mut a = InternCache::new();
    let div = intern(&mut a, "div");
    let mut b = a.clone();
    b.reset();
    assert!(b.is_empty());
    assert!(Arc::ptr_eq(a.lookup(&chars("div")).unwrap(), &div));
}

// ============================================================================
// CONFIGURATION AND METRICS
// ============================================================================

#[test]
fn test_custom_config() {
    let config = CacheConfig { initial_capacity: 31, load_percent: 50 };
    let mut cache = InternCache::with_config(config).unwrap();
    assert_eq!(cache.threshold(), 15);
    for i in 0..16 {
        intern(&mut cache, &format!("c{i}"));
    }
    assert_eq!(cache.capacity(), 63);
    assert_eq!(cache.threshold(), 31);

    cache.reset();
    assert_eq!(cache.capacity(), 31);
    assert_eq!(cache.threshold(), 15);
}

#[test]
fn test_invalid_config_rejected() {
    let config = CacheConfig { initial_capacity: 13, load_percent: 100 };
    assert_eq!(
        InternCache::with_config(config).unwrap_err(),
        InternError::InvalidLoadFactor(100)
    );
}

#[test]
fn test_config_from_json() {
    let config: CacheConfig = serde_json::from_str(r#"{ "initial_capacity": 101 }"#).unwrap();
    assert_eq!(config.initial_capacity, 101);
    assert_eq!(config.load_percent, CacheConfig::DEFAULT_LOAD_PERCENT);
}

#[test]
fn test_metrics_sink() {
    let stats = Arc::new(CacheStats::new());
    let mut cache = InternCache::new().with_metrics(stats.clone());

    for token in TOKENS {
        intern(&mut cache, token);
    }
    intern(&mut cache, "div");
    intern(&mut cache, "name");
    cache.reset();

    let snap = stats.snapshot();
    assert_eq!(snap.calls, 12);
    assert_eq!(snap.hits, 1);
    assert_eq!(snap.rehashes, 1);
    assert_eq!(snap.resets, 1);
    assert!(snap.average_walk().is_some());
}

#[test]
fn test_disabled_lookups_not_counted() {
    let stats = Arc::new(CacheStats::new());
    let mut cache = InternCache::new().with_metrics(stats.clone());
    cache.set_interning_enabled(false);
    intern(&mut cache, "div");
    assert_eq!(stats.snapshot().calls, 0);

    cache.set_metrics(None);
    cache.set_interning_enabled(true);
    intern(&mut cache, "div");
    assert_eq!(stats.snapshot().calls, 0);
}

#[test]
fn test_stats_snapshot_serializes() {
    let stats = Arc::new(CacheStats::new());
    let mut cache = InternCache::new().with_metrics(stats.clone());
    intern(&mut cache, "div");
    intern(&mut cache, "div");
    let json = serde_json::to_value(stats.snapshot()).unwrap();
    assert_eq!(json["calls"], 2);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["rehashes"], 0);
}
