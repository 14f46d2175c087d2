//! Window hashing and key comparison

/// Rolling hash over a character window.
///
/// Equal windows always hash equal. Every character contributes, so keys
/// that share a prefix and suffix ("data-a", "data-b") still spread out.
#[inline]
pub(crate) fn window_hash(window: &[char]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &c in window {
        hash ^= c as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Home slot of `hash` in a table of `capacity` slots
#[inline]
pub(crate) fn home_slot(hash: u32, capacity: usize) -> usize {
    hash as usize % capacity
}
