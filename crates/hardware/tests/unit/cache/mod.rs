//! Cache hierarchy unit tests.

/// Per-set LRU ordering and set-associative placement.
pub mod lru;
