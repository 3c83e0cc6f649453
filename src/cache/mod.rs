//! Analysis Cache Module
//!
//! Raw analysis and feature payloads are cached by track so repeat lookups
//! skip the network. The cache is an injected dependency of the
//! repository; the organizing core never sees it.

pub mod file;
pub mod memory;
pub mod repository;

use std::fmt;

use crate::error::Result;

pub use file::{CacheUsage, FileCache};
pub use memory::MemoryCache;
pub use repository::{AnalysisRepository, AnalysisSource, DirectorySource};

/// What a cached payload is, and for which track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw audio analysis of a track
    Analysis(String),
    /// Track-level audio features
    Features(String),
}

impl CacheKey {
    pub fn analysis(track_id: impl Into<String>) -> Self {
        CacheKey::Analysis(track_id.into())
    }

    pub fn features(track_id: impl Into<String>) -> Self {
        CacheKey::Features(track_id.into())
    }

    pub fn track_id(&self) -> &str {
        match self {
            CacheKey::Analysis(id) | CacheKey::Features(id) => id,
        }
    }

    /// Storage key. Analysis and features never share one: both carry a
    /// kind segment, so no track id can make one read as the other.
    pub fn as_string(&self) -> String {
        match self {
            CacheKey::Analysis(id) => format!("track-analysis-{}", id),
            CacheKey::Features(id) => format!("track-features-{}", id),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Storage for raw JSON payloads.
pub trait AnalysisCache {
    /// Cached payload, or `None` if absent (or discarded as corrupt)
    fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store a payload, replacing any previous one
    fn put(&mut self, key: &CacheKey, payload: &str) -> Result<()>;

    /// Drop an entry. Returns whether it existed.
    fn remove(&mut self, key: &CacheKey) -> Result<bool>;

    /// Drop every entry
    fn clear(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct_per_payload() {
        let analysis = CacheKey::analysis("4uLU6hMCjMI75M1A2tKUQC");
        let features = CacheKey::features("4uLU6hMCjMI75M1A2tKUQC");

        assert_ne!(analysis.as_string(), features.as_string());
        assert_eq!(analysis.to_string(), "track-analysis-4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(features.to_string(), "track-features-4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(features.track_id(), "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_track_id_cannot_forge_other_kind() {
        let pairs = [
            (CacheKey::analysis("features-abc"), CacheKey::features("abc")),
            (CacheKey::features("analysis-abc"), CacheKey::analysis("abc")),
            (CacheKey::analysis("features-"), CacheKey::features("")),
        ];
        for (a, b) in &pairs {
            assert_ne!(a.as_string(), b.as_string());
        }
    }
}
