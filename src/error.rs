//! Error types for the strcache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by cache operations (`get`, `set`, `del`).
//!   Every variant is recoverable and leaves the cache untouched.
//! - [`ConfigError`]: Returned when index or cache configuration parameters
//!   are invalid (e.g. zero max level, out-of-range probability).
//! - [`InvariantError`]: Returned by `check_invariants` methods when an
//!   internal data-structure invariant is violated.
//!
//! ## Example Usage
//!
//! ```
//! use strcache::error::CacheError;
//! use strcache::ByteLfuCache;
//!
//! let cache = ByteLfuCache::new(4);
//! let err = cache.set("big", b"too large").unwrap_err();
//! assert!(matches!(err, CacheError::NoSpace { needed: 9, capacity: 4 }));
//!
//! let err = cache.get("missing").unwrap_err();
//! assert_eq!(err.to_string(), "key not found: missing");
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key is not present in the cache.
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// A single value is larger than the total cache capacity.
    #[error("no space: value of {needed} bytes exceeds capacity of {capacity} bytes")]
    NoSpace { needed: usize, capacity: usize },
}

impl CacheError {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_owned(),
        }
    }

    /// Returns `true` for [`CacheError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`CacheError::NoSpace`].
    pub fn is_no_space(&self) -> bool {
        matches!(self, Self::NoSpace { .. })
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal invariants are violated.
///
/// Produced by `check_invariants` methods on
/// [`ScoreSkipList`](crate::ds::ScoreSkipList) and
/// [`ByteLfuCore`](crate::policy::byte_lfu::ByteLfuCore).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Produced by [`SkipListConfig::validate`](crate::ds::SkipListConfig::validate),
/// fallible constructors such as
/// [`ScoreSkipList::try_with_config`](crate::ds::ScoreSkipList::try_with_config),
/// and [`ByteLfuBuilder::try_build`](crate::builder::ByteLfuBuilder::try_build).
///
/// # Example
///
/// ```
/// use strcache::ds::SkipListConfig;
///
/// let config = SkipListConfig { max_level: 0, ..SkipListConfig::default() };
/// let err = config.validate().unwrap_err();
/// assert!(err.to_string().contains("max_level"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- CacheError -------------------------------------------------------

    #[test]
    fn not_found_display_names_key() {
        let err = CacheError::not_found("alpha");
        assert_eq!(err.to_string(), "key not found: alpha");
        assert!(err.is_not_found());
        assert!(!err.is_no_space());
    }

    #[test]
    fn no_space_display_reports_sizes() {
        let err = CacheError::NoSpace {
            needed: 11,
            capacity: 10,
        };
        assert_eq!(
            err.to_string(),
            "no space: value of 11 bytes exceeds capacity of 10 bytes"
        );
        assert!(err.is_no_space());
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("length mismatch");
        assert_eq!(err.to_string(), "length mismatch");
        assert_eq!(err.message(), "length mismatch");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("probability must be in (0, 1)");
        assert_eq!(err.to_string(), "probability must be in (0, 1)");
        assert_eq!(err.message(), "probability must be in (0, 1)");
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }
}
