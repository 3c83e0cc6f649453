//! In-memory cache

use std::collections::HashMap;

use super::{AnalysisCache, CacheKey};
use crate::error::Result;

/// Process-lifetime cache backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<CacheKey, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnalysisCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &CacheKey, payload: &str) -> Result<()> {
        self.entries.insert(key.clone(), payload.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &CacheKey) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut cache = MemoryCache::new();
        let key = CacheKey::analysis("abc");

        assert_eq!(cache.get(&key).unwrap(), None);
        cache.put(&key, "{}").unwrap();
        assert_eq!(cache.get(&key).unwrap().as_deref(), Some("{}"));
        assert_eq!(cache.get(&CacheKey::features("abc")).unwrap(), None);

        assert!(cache.remove(&key).unwrap());
        assert!(!cache.remove(&key).unwrap());
        assert!(cache.is_empty());
    }
}
