// Public key cache
// Parsed public keys keyed by path, invalidated explicitly

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::public::load_public_key;
use crate::error::CryptorResult;
use crate::rsa::PublicKey;

/// Keys are inserted only once fully constructed and handed out as immutable
/// `Arc` snapshots. Private keys are never cached.
#[derive(Debug, Default)]
pub struct PublicKeyCache {
    entries: RwLock<HashMap<PathBuf, Arc<PublicKey>>>,
}

impl PublicKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached key for `path`, loading and caching it on a miss.
    ///
    /// Load errors are not cached.
    pub fn get_or_load(&self, path: &Path) -> CryptorResult<Arc<PublicKey>> {
        if let Some(key) = self.get(path) {
            return Ok(key);
        }

        // Parse outside the lock; concurrent misses may load twice, first insert wins
        let loaded = Arc::new(load_public_key(path)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let key = entries
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                debug!(path = %path.display(), "cached public key");
                loaded
            })
            .clone();
        Ok(key)
    }

    /// Cached key for `path`, if any
    pub fn get(&self, path: &Path) -> Option<Arc<PublicKey>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(path).cloned()
    }

    /// Drop the entry for `path` so the next lookup re-reads the file
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    const SPKI_PEM: &[u8] = include_bytes!("../../tests/fixtures/public_key.pem");
    const OTHER_PEM: &[u8] = include_bytes!("../../tests/fixtures/other_public_key.pem");

    #[test]
    fn test_hit_returns_same_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public.pem");
        fs::write(&path, SPKI_PEM).unwrap();

        let cache = PublicKeyCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public.pem");
        fs::write(&path, SPKI_PEM).unwrap();

        let cache = PublicKeyCache::new();
        let before = cache.get_or_load(&path).unwrap();

        // Rotated on disk: still stale until invalidated
        fs::write(&path, OTHER_PEM).unwrap();
        assert_eq!(*cache.get_or_load(&path).unwrap(), *before);

        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        let after = cache.get_or_load(&path).unwrap();
        assert_ne!(*after, *before);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.pem");

        let cache = PublicKeyCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        fs::write(&path, SPKI_PEM).unwrap();
        assert!(cache.get_or_load(&path).is_ok());
    }

    #[test]
    fn test_concurrent_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public.pem");
        fs::write(&path, SPKI_PEM).unwrap();

        let cache = Arc::new(PublicKeyCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                thread::spawn(move || cache.get_or_load(&path).unwrap())
            })
            .collect();

        let keys: Vec<Arc<PublicKey>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for key in &keys {
            assert!(Arc::ptr_eq(key, &cache.get(&path).unwrap()));
        }
        assert_eq!(cache.len(), 1);
    }
}
