//! Analysis repository
//!
//! Looks payloads up in the injected cache first and falls back to the
//! injected source, caching whatever it fetches. The HTTP client for the
//! streaming service lives outside this crate and plugs in as an
//! `AnalysisSource`.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{AnalysisCache, CacheKey};
use crate::analysis::{AudioAnalysis, AudioFeatures, IntervalOrganizer, StructuredAudioAnalysis};
use crate::error::{BeatscriptError, Result};

/// Where uncached payloads come from.
pub trait AnalysisSource {
    /// Raw audio-analysis JSON for a track
    fn fetch_analysis(&self, track_id: &str) -> Result<String>;

    /// Raw audio-features JSON for a track
    fn fetch_features(&self, track_id: &str) -> Result<String>;
}

/// Reads `<id>.analysis.json` and `<id>.features.json` from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn read(&self, track_id: &str, kind: &str) -> Result<String> {
        // Ids name files directly inside the source directory
        if track_id.is_empty()
            || track_id.contains(['/', '\\'])
            || track_id.contains("..")
        {
            return Err(BeatscriptError::SourceUnavailable {
                track_id: track_id.to_string(),
                reason: "track id is not a plain file name".to_string(),
            });
        }

        let path = self.dir.join(format!("{}.{}.json", track_id, kind));
        if !path.exists() {
            return Err(BeatscriptError::SourceUnavailable {
                track_id: track_id.to_string(),
                reason: format!("{} not found", path.display()),
            });
        }
        fs::read_to_string(&path).map_err(|e| BeatscriptError::FileReadError { path, source: e })
    }
}

impl AnalysisSource for DirectorySource {
    fn fetch_analysis(&self, track_id: &str) -> Result<String> {
        self.read(track_id, "analysis")
    }

    fn fetch_features(&self, track_id: &str) -> Result<String> {
        self.read(track_id, "features")
    }
}

/// Cache-first access to a track's analysis and features.
pub struct AnalysisRepository<C, S> {
    cache: C,
    source: S,
    organizer: IntervalOrganizer,
}

impl<C: AnalysisCache, S: AnalysisSource> AnalysisRepository<C, S> {
    pub fn new(cache: C, source: S) -> Self {
        Self {
            cache,
            source,
            organizer: IntervalOrganizer::default(),
        }
    }

    /// Use a specific organizer for `structured`
    pub fn with_organizer(mut self, organizer: IntervalOrganizer) -> Self {
        self.organizer = organizer;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_parts(self) -> (C, S) {
        (self.cache, self.source)
    }

    /// Parse the cached payload for `key`, or fetch, parse and cache it.
    ///
    /// A cached payload that no longer parses is dropped and refetched.
    fn load<T>(
        &mut self,
        key: CacheKey,
        fetch: impl Fn(&S, &str) -> Result<String>,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<T> {
        if let Some(payload) = self.cache.get(&key)? {
            match parse(&payload) {
                Ok(value) => {
                    info!("Cache hit: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    warn!("Cached {} is unreadable ({}), refetching", key, e);
                    self.cache.remove(&key)?;
                }
            }
        }

        info!("Cache miss: {}, fetching", key);
        let payload = fetch(&self.source, key.track_id())?;
        let value = parse(&payload)?;
        self.cache.put(&key, &payload)?;
        Ok(value)
    }

    /// The flat audio analysis of a track
    pub fn analysis(&mut self, track_id: &str) -> Result<AudioAnalysis> {
        self.load(
            CacheKey::analysis(track_id),
            |source, id| source.fetch_analysis(id),
            AudioAnalysis::from_json,
        )
    }

    /// The audio features of a track
    pub fn features(&mut self, track_id: &str) -> Result<AudioFeatures> {
        self.load(
            CacheKey::features(track_id),
            |source, id| source.fetch_features(id),
            AudioFeatures::from_json,
        )
    }

    /// Features plus the organized analysis, as shown for the playing track.
    pub fn structured(&mut self, track_id: &str) -> Result<(AudioFeatures, StructuredAudioAnalysis)> {
        let analysis = self.analysis(track_id)?;
        let structured = self.organizer.organize(&analysis);
        let features = self.features(track_id)?;
        Ok((features, structured))
    }
}
