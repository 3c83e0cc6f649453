//! On-disk cache
//!
//! One `<sha256 of key>.json` file per payload plus a `manifest.json` recording when
//! each entry was written, its size and its SHA-256 checksum. Entries whose
//! contents no longer match their checksum are discarded on read.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use super::{AnalysisCache, CacheKey};
use crate::error::{BeatscriptError, Result};

const MANIFEST_FILE: &str = "manifest.json";

/// Cache disk usage.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheUsage {
    /// Number of payload files on disk
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
}

/// Metadata for one cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryInfo {
    pub file_name: String,
    pub cached_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Manifest of all cached payloads, keyed by storage key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheManifest {
    pub entries: HashMap<String, CacheEntryInfo>,
}

/// Cache stored in a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (or lazily create) a cache in `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn entry_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Load the manifest, or an empty one if the cache is new.
    ///
    /// An unreadable manifest is treated as empty; the next `put` rewrites
    /// it and `prune_untracked` reclaims the orphaned payloads.
    pub fn load_manifest(&self) -> Result<CacheManifest> {
        let manifest_path = self.manifest_path();

        if !manifest_path.exists() {
            return Ok(CacheManifest::default());
        }

        let content =
            fs::read_to_string(&manifest_path).map_err(|e| BeatscriptError::FileReadError {
                path: manifest_path.clone(),
                source: e,
            })?;

        match serde_json::from_str(&content) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                warn!(
                    "Cache manifest {} is corrupt ({}), starting empty",
                    manifest_path.display(),
                    e
                );
                Ok(CacheManifest::default())
            }
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| BeatscriptError::DirectoryCreateError {
                path: self.dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Write the manifest to disk.
    pub fn save_manifest(&self, manifest: &CacheManifest) -> Result<()> {
        self.ensure_dir()?;

        let manifest_path = self.manifest_path();
        let content = serde_json::to_string_pretty(manifest)?;

        fs::write(&manifest_path, content).map_err(|e| BeatscriptError::FileWriteError {
            path: manifest_path,
            source: e,
        })
    }

    /// Disk usage of the payload files (the manifest is not counted).
    pub fn usage(&self) -> Result<CacheUsage> {
        let mut file_count = 0;
        let mut total_size_bytes = 0;

        for path in self.payload_files() {
            let metadata = fs::metadata(&path).map_err(|e| BeatscriptError::FileReadError {
                path: path.clone(),
                source: e,
            })?;
            file_count += 1;
            total_size_bytes += metadata.len();
        }

        Ok(CacheUsage {
            file_count,
            total_size_bytes,
            total_size_mb: total_size_bytes as f64 / (1024.0 * 1024.0),
        })
    }

    /// Delete payload files the manifest does not know about.
    ///
    /// Returns the bytes freed.
    pub fn prune_untracked(&self) -> Result<u64> {
        let manifest = self.load_manifest()?;
        let mut bytes_freed = 0;

        for path in self.payload_files() {
            let tracked = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .map(|name| manifest.entries.values().any(|e| e.file_name == name))
                .unwrap_or(false);
            if tracked {
                continue;
            }

            if let Ok(metadata) = fs::metadata(&path) {
                bytes_freed += metadata.len();
            }
            fs::remove_file(&path).map_err(|e| BeatscriptError::FileWriteError {
                path: path.clone(),
                source: e,
            })?;
            debug!("Pruned untracked cache file {}", path.display());
        }

        Ok(bytes_freed)
    }

    /// JSON files directly in the cache directory, minus the manifest.
    fn payload_files(&self) -> Vec<PathBuf> {
        if !self.dir.exists() {
            return Vec::new();
        }

        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension().map_or(false, |ext| ext == "json")
                    && path.file_name().map_or(false, |name| name != MANIFEST_FILE)
            })
            .collect()
    }

    fn discard(&self, manifest: &mut CacheManifest, key: &str) -> Result<()> {
        if let Some(info) = manifest.entries.remove(key) {
            let path = self.entry_path(&info.file_name);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| BeatscriptError::FileWriteError {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }
        self.save_manifest(manifest)
    }
}

/// File name for a storage key. Distinct keys get distinct files.
fn file_name_for(key: &str) -> String {
    format!("{}.json", checksum(key))
}

fn checksum(payload: &str) -> String {
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

impl AnalysisCache for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let storage_key = key.as_string();
        let mut manifest = self.load_manifest()?;

        let info = match manifest.entries.get(&storage_key) {
            Some(info) => info.clone(),
            None => return Ok(None),
        };

        let path = self.entry_path(&info.file_name);
        if !path.exists() {
            warn!("Cache entry {} is missing its file, discarding", storage_key);
            self.discard(&mut manifest, &storage_key)?;
            return Ok(None);
        }

        let payload = fs::read_to_string(&path).map_err(|e| BeatscriptError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        if checksum(&payload) != info.sha256 {
            warn!("{}, discarding", BeatscriptError::CacheCorrupted { key: storage_key.clone() });
            self.discard(&mut manifest, &storage_key)?;
            return Ok(None);
        }

        Ok(Some(payload))
    }

    fn put(&mut self, key: &CacheKey, payload: &str) -> Result<()> {
        self.ensure_dir()?;

        let storage_key = key.as_string();
        let file_name = file_name_for(&storage_key);
        let path = self.entry_path(&file_name);

        fs::write(&path, payload).map_err(|e| BeatscriptError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;

        let mut manifest = self.load_manifest()?;
        manifest.entries.insert(
            storage_key,
            CacheEntryInfo {
                file_name,
                cached_at: Utc::now(),
                size_bytes: payload.len() as u64,
                sha256: checksum(payload),
            },
        );
        self.save_manifest(&manifest)
    }

    fn remove(&mut self, key: &CacheKey) -> Result<bool> {
        let storage_key = key.as_string();
        let mut manifest = self.load_manifest()?;
        if !manifest.entries.contains_key(&storage_key) {
            return Ok(false);
        }
        self.discard(&mut manifest, &storage_key)?;
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        for path in self.payload_files() {
            fs::remove_file(&path).map_err(|e| BeatscriptError::FileWriteError {
                path: path.clone(),
                source: e,
            })?;
        }
        self.save_manifest(&CacheManifest::default())
    }
}
