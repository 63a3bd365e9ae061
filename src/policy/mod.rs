//! Eviction policies.
//!
//! - [`byte_lfu`]: least-frequently-used eviction under a byte budget.

pub mod byte_lfu;
