//! Fragment caching - splicing previously built subtrees past recomputation.

use crate::build::Builder;
use crate::cache::key::{CacheIdent, CacheKey, KeyScheme};
use crate::cache::store::CacheStore;
use crate::error::{Error, Result};
use serde_json::Value;

/// Wraps subtree construction with cache lookups against an injected
/// store.
///
/// A fetched fragment is revived into a node and handed back without the
/// build closure ever running; a miss builds the node in a scratch frame
/// and writes its serialized text back under the key. Fragments are
/// stored as the same JSON text the encoder emits.
pub struct FragmentCache<'s> {
    store: &'s dyn CacheStore,
    scheme: KeyScheme,
}

impl<'s> FragmentCache<'s> {
    pub fn new(store: &'s dyn CacheStore) -> Self {
        FragmentCache {
            store,
            scheme: KeyScheme::default(),
        }
    }

    /// Controller whose batch keys compose under a custom scheme.
    pub fn with_scheme(store: &'s dyn CacheStore, scheme: KeyScheme) -> Self {
        FragmentCache { store, scheme }
    }

    /// Build-or-fetch a single fragment under `key`.
    ///
    /// On a hit `build` is not invoked at all. Store failures surface as
    /// [`Error::CacheBackend`] without retry. No cross-call mutual
    /// exclusion: concurrent callers missing on the same key may both
    /// build and both write (see [`CacheStore`]).
    pub fn fetch<F>(&self, json: &mut Builder, key: &CacheKey, build: F) -> Result<Value>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        if let Some(stored) = self.store.get(key).map_err(Error::CacheBackend)? {
            return Ok(serde_json::from_str(&stored)?);
        }

        let node = json.scratch(build)?;
        self.store
            .put(key, &serde_json::to_string(&node)?)
            .map_err(Error::CacheBackend)?;
        Ok(node)
    }

    /// Batched build-or-fetch: one fragment per item, in item order.
    ///
    /// Keys for every item are composed up front and covered by a single
    /// `batch_get`. Misses are built as they are encountered; their
    /// write-backs are deferred until the whole array has resolved, so a
    /// late failure cannot leave the result order ragged. The returned
    /// nodes always line up with `items` regardless of which were hits.
    pub fn fetch_batch<T, F>(&self, json: &mut Builder, items: &[T], mut build: F) -> Result<Vec<Value>>
    where
        T: CacheIdent,
        F: FnMut(&mut Builder, &T) -> Result<()>,
    {
        let keys: Vec<CacheKey> = items
            .iter()
            .map(|item| self.scheme.compose(&item.cache_ident()))
            .collect();

        let mut stored = self.store.batch_get(&keys).map_err(Error::CacheBackend)?;

        let mut nodes = Vec::with_capacity(items.len());
        let mut pending: Vec<(CacheKey, String)> = Vec::new();
        for (item, key) in items.iter().zip(keys) {
            match stored.remove(&key) {
                Some(fragment) => nodes.push(serde_json::from_str(&fragment)?),
                None => {
                    let node = json.scratch(|json| build(json, item))?;
                    pending.push((key, serde_json::to_string(&node)?));
                    nodes.push(node);
                }
            }
        }

        for (key, fragment) in pending {
            self.store.put(&key, &fragment).map_err(Error::CacheBackend)?;
        }

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryCache;
    use crate::error::StoreError;
    use serde_json::json;
    use std::cell::Cell;

    struct Comment {
        content: String,
        id: u32,
    }

    impl CacheIdent for Comment {
        fn cache_ident(&self) -> String {
            format!("comment/{}", self.id)
        }
    }

    fn comments() -> Vec<Comment> {
        vec![
            Comment {
                content: "hello".to_string(),
                id: 1,
            },
            Comment {
                content: "world".to_string(),
                id: 2,
            },
        ]
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn get(&self, _key: &CacheKey) -> std::result::Result<Option<String>, StoreError> {
            Err(StoreError::from("backend down".to_string()))
        }

        fn put(&self, _key: &CacheKey, _fragment: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::from("backend down".to_string()))
        }
    }

    #[test]
    fn test_miss_builds_and_writes_back() {
        let cache = MemoryCache::new();
        let fragments = FragmentCache::new(&cache);
        let key = CacheKey::from("12345");

        let mut json = Builder::new();
        let node = fragments
            .fetch(&mut json, &key, |json| json.set("content", "hello"))
            .unwrap();

        assert_eq!(node, json!({"content": "hello"}));
        assert_eq!(
            cache.get(&key).unwrap().as_deref(),
            Some(r#"{"content":"hello"}"#)
        );
    }

    #[test]
    fn test_hit_skips_the_build_closure() {
        let cache = MemoryCache::new();
        let fragments = FragmentCache::new(&cache);
        let key = CacheKey::from("12345");
        cache.put(&key, r#"{"content":"stored"}"#).unwrap();

        let builds = Cell::new(0u32);
        let mut json = Builder::new();
        let node = fragments
            .fetch(&mut json, &key, |json| {
                builds.set(builds.get() + 1);
                json.set("content", "rebuilt")
            })
            .unwrap();

        assert_eq!(builds.get(), 0);
        assert_eq!(node, json!({"content": "stored"}));
    }

    #[test]
    fn test_batch_builds_only_misses_and_keeps_item_order() {
        let cache = MemoryCache::new();
        let fragments = FragmentCache::new(&cache);
        // pre-store item 1 under its composed key, with content that
        // proves the stored copy was used
        cache
            .put(&CacheKey::from("comment/1.json"), r#"{"content":"cached"}"#)
            .unwrap();

        let builds = Cell::new(0u32);
        let mut json = Builder::new();
        let nodes = fragments
            .fetch_batch(&mut json, &comments(), |json, comment| {
                builds.set(builds.get() + 1);
                json.set("content", comment.content.as_str())
            })
            .unwrap();

        assert_eq!(builds.get(), 1);
        assert_eq!(nodes[0], json!({"content": "cached"}));
        assert_eq!(nodes[1], json!({"content": "world"}));
        // the miss was written back under its own key
        assert_eq!(
            cache.get(&CacheKey::from("comment/2.json")).unwrap().as_deref(),
            Some(r#"{"content":"world"}"#)
        );
    }

    #[test]
    fn test_batch_second_pass_is_all_hits() {
        let cache = MemoryCache::new();
        let fragments = FragmentCache::new(&cache);

        let mut json = Builder::new();
        fragments
            .fetch_batch(&mut json, &comments(), |json, comment| {
                json.set("content", comment.content.as_str())
            })
            .unwrap();

        let builds = Cell::new(0u32);
        let mut json = Builder::new();
        let nodes = fragments
            .fetch_batch(&mut json, &comments(), |json, comment| {
                builds.set(builds.get() + 1);
                json.set("content", comment.content.as_str())
            })
            .unwrap();

        assert_eq!(builds.get(), 0);
        assert_eq!(nodes[0], json!({"content": "hello"}));
        assert_eq!(nodes[1], json!({"content": "world"}));
    }

    #[test]
    fn test_custom_scheme_namespaces_batch_keys() {
        let cache = MemoryCache::new();
        let scheme = KeyScheme {
            namespace: Some("v2".to_string()),
            suffix: String::from(".json"),
        };
        let fragments = FragmentCache::with_scheme(&cache, scheme);

        let mut json = Builder::new();
        fragments
            .fetch_batch(&mut json, &comments(), |json, comment| {
                json.set("content", comment.content.as_str())
            })
            .unwrap();

        assert!(cache
            .get(&CacheKey::from("v2/comment/1.json"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_backend_failure_surfaces_as_cache_backend_error() {
        let fragments = FragmentCache::new(&BrokenStore);

        let mut json = Builder::new();
        let err = fragments
            .fetch(&mut json, &CacheKey::from("12345"), |json| {
                json.set("content", "hello")
            })
            .unwrap_err();

        assert!(matches!(err, Error::CacheBackend(_)));
    }
}
