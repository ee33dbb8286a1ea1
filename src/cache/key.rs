//! Cache keys and the scheme that derives them for batch items.

use std::fmt;

/// Opaque key a serialized fragment is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(raw: impl Into<String>) -> Self {
        CacheKey(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        CacheKey(raw.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(raw: String) -> Self {
        CacheKey(raw)
    }
}

/// Source values that carry their own cache identity.
///
/// The batched fragment path derives one key per item from this identity.
/// Identical identities must yield identical keys, distinct identities
/// distinct keys; beyond that the string is opaque.
pub trait CacheIdent {
    fn cache_ident(&self) -> String;
}

/// How per-item identities compose into full cache keys.
///
/// An identity `ident` becomes `namespace/ident` + `suffix`, with the
/// namespace part omitted when unset. The suffix keeps fragment keys from
/// colliding with other renderings of the same identity stored in a
/// shared cache.
#[derive(Debug, Clone)]
pub struct KeyScheme {
    pub namespace: Option<String>,
    pub suffix: String,
}

impl Default for KeyScheme {
    fn default() -> Self {
        KeyScheme {
            namespace: None,
            suffix: String::from(".json"),
        }
    }
}

impl KeyScheme {
    pub fn compose(&self, ident: &str) -> CacheKey {
        let mut key = String::new();
        if let Some(namespace) = &self.namespace {
            key.push_str(namespace);
            key.push('/');
        }
        key.push_str(ident);
        key.push_str(&self.suffix);
        CacheKey(key)
    }
}
