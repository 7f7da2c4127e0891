//! Error types for the evictkit library.
//!
//! The error surface is deliberately small:
//!
//! - [`CacheError::InvalidConfiguration`]: construction-time rejection of bad
//!   parameters (zero capacity, zero K). Fatal; no instance is created.
//! - [`CacheError::KeyNotFound`]: `get` on a key the policy cannot resolve.
//!   Recoverable; callers retry, default, or treat it as a miss.
//! - [`CacheError::InternalConsistency`]: states that correct bookkeeping
//!   makes unreachable, surfaced instead of silently ignored because they
//!   signal a defect rather than a normal runtime outcome.
//!
//! Every error propagates synchronously to the caller of the triggering
//! operation; there is no deferred or background error channel, and no
//! operation is retried internally.

use thiserror::Error;

/// Errors produced by cache construction and operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A construction parameter failed validation.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCache;
    /// use evictkit::error::CacheError;
    ///
    /// let err = LruCache::<u32, String>::try_new(0).unwrap_err();
    /// assert!(matches!(err, CacheError::InvalidConfiguration(_)));
    /// ```
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested key is not resolvable by this policy.
    ///
    /// For the admission-gated engine this also covers keys that are merely
    /// tracked but not yet promoted.
    #[error("key not found")]
    KeyNotFound,

    /// Internal bookkeeping reached a state that should be unreachable.
    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_configuration_detail() {
        let err = CacheError::InvalidConfiguration("capacity must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: capacity must be greater than 0"
        );
    }

    #[test]
    fn key_not_found_is_comparable() {
        assert_eq!(CacheError::KeyNotFound, CacheError::KeyNotFound);
        assert_ne!(
            CacheError::KeyNotFound,
            CacheError::InternalConsistency("x".into())
        );
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<CacheError>();
    }
}
