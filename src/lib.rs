//! # Kiln - ordered JSON document builder
//!
//! A programmatic builder for ordered JSON documents: issue attribute-setting
//! and nesting operations against a mutable [`Builder`], then serialize the
//! accumulated tree to JSON text. Useful for producing API responses and
//! structured fragments without a templating pass.
//!
//! ## Modules
//!
//! - **build**: the target-stack construction engine and attribute extraction
//! - **cache**: fragment caching against an injected key-value store
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! let json = kiln::encode(|json| {
//!     json.set("title", "hello")?;
//!     json.set_object("author", |json| {
//!         json.set("name", "David")?;
//!         json.set("age", 32)
//!     })
//! })?;
//!
//! assert_eq!(json, r#"{"title":"hello","author":{"name":"David","age":32}}"#);
//! # Ok(())
//! # }
//! ```
//!
//! ### Arrays and extraction
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Comment {
//!     content: String,
//!     id: u32,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let comments = vec![
//!     Comment { content: "hello".to_string(), id: 1 },
//!     Comment { content: "world".to_string(), id: 2 },
//! ];
//!
//! let json = kiln::encode(|json| {
//!     json.set("name", "Parent")?;
//!     json.set_array_extract("comments", &comments, &["content"])
//! })?;
//!
//! assert_eq!(json, r#"{"name":"Parent","comments":[{"content":"hello"},{"content":"world"}]}"#);
//! # Ok(())
//! # }
//! ```
//!
//! ### Cached fragments
//!
//! ```rust
//! use kiln::MemoryCache;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cache = MemoryCache::new();
//!
//! // second call with the same key serves the stored fragment and
//! // never runs the closure
//! for _ in 0..2 {
//!     let json = kiln::encode_with_cache(&cache, "12345", |json| {
//!         json.set("content", "hello")
//!     })?;
//!     assert_eq!(json, r#"{"content":"hello"}"#);
//! }
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod cache;
pub mod error;

// Re-export commonly used types for convenience
pub use build::{read_fields, Builder};
pub use cache::{CacheIdent, CacheKey, CacheStore, FragmentCache, KeyScheme, MemoryCache};
pub use error::{Error, Result, StoreError};

/// Main entry point: build a document and serialize it to JSON text.
///
/// The builder starts on an empty object root. Object key order in the
/// output matches insertion order, and `null`/`false`/`0`/`""` all render
/// as their literal JSON forms - a written key is never omitted.
pub fn encode<F>(build: F) -> Result<String>
where
    F: FnOnce(&mut Builder) -> Result<()>,
{
    let mut json = Builder::new();
    build(&mut json)?;
    Ok(serde_json::to_string(&json.into_value())?)
}

/// Like [`encode`], but the whole document is one cached fragment.
///
/// Root construction is delegated to [`FragmentCache::fetch`]: a stored
/// fragment under `key` is served without running `build` at all; a miss
/// builds the document and writes it back to `store`.
pub fn encode_with_cache<F>(
    store: &dyn CacheStore,
    key: impl Into<CacheKey>,
    build: F,
) -> Result<String>
where
    F: FnOnce(&mut Builder) -> Result<()>,
{
    let fragments = FragmentCache::new(store);
    let mut json = Builder::new();
    let root = fragments.fetch(&mut json, &key.into(), build)?;
    Ok(serde_json::to_string(&root)?)
}
