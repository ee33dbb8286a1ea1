use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure type surfaced by [`CacheStore`](crate::cache::CacheStore)
/// implementations. Boxed so backends can report their own error types
/// without this crate knowing about them.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can abort an encode.
///
/// Nothing is swallowed or defaulted: any of these ends the in-progress
/// encode and reaches the caller. There is no partial-result mode.
#[derive(Debug, Error)]
pub enum Error {
    /// The extraction source has no readable field of this name.
    #[error("no attribute `{0}` on extraction source")]
    MissingAttribute(String),

    /// An operation was invoked against a target of the wrong kind,
    /// e.g. `set` while the current target is an array.
    #[error("expected {expected} target, found {found}")]
    InvalidTarget {
        expected: &'static str,
        found: &'static str,
    },

    /// The external cache failed on a read, write, or batch read.
    /// Surfaced as-is, never retried.
    #[error("cache backend failure: {0}")]
    CacheBackend(#[source] StoreError),

    /// Serializing a node to text, or reviving a stored fragment, failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
