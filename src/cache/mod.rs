//! Fragment caching - keys, the external store contract, and the
//! controller that splices stored subtrees into a build.

pub mod fragment;
pub mod key;
pub mod store;

pub use fragment::FragmentCache;
pub use key::{CacheIdent, CacheKey, KeyScheme};
pub use store::{CacheStore, MemoryCache};
