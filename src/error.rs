//! Error handling for Beatscript
//!
//! The organizing and scaling core never fails. Everything around it
//! (loading payloads, caching, configuration) reports through `BeatscriptError`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Beatscript operations
pub type Result<T> = std::result::Result<T, BeatscriptError>;

/// Main error type for Beatscript operations
#[derive(Error, Debug)]
pub enum BeatscriptError {
    // File Errors
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {}: {source}", path.display())]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {}: {source}", path.display())]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Payload Errors
    #[error("Invalid audio analysis: {reason}")]
    InvalidAnalysis { reason: String },

    #[error("Invalid funscript: {reason}")]
    InvalidFunscript { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Cache Errors
    #[error("Cache entry corrupted: {key}")]
    CacheCorrupted { key: String },

    // Source Errors
    #[error("Analysis source unavailable for track {track_id}: {reason}")]
    SourceUnavailable { track_id: String, reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BeatscriptError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            BeatscriptError::FileNotFound { .. } => "FILE_NOT_FOUND",
            BeatscriptError::FileReadError { .. } => "FILE_READ_ERROR",
            BeatscriptError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            BeatscriptError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            BeatscriptError::InvalidAnalysis { .. } => "INVALID_ANALYSIS",
            BeatscriptError::InvalidFunscript { .. } => "INVALID_FUNSCRIPT",
            BeatscriptError::InvalidConfig { .. } => "INVALID_CONFIG",
            BeatscriptError::CacheCorrupted { .. } => "CACHE_CORRUPTED",
            BeatscriptError::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            BeatscriptError::Io(_) => "IO_ERROR",
            BeatscriptError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the caller free to retry or fall back
    /// (e.g. refetch after a corrupted cache entry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BeatscriptError::FileNotFound { .. }
                | BeatscriptError::CacheCorrupted { .. }
                | BeatscriptError::SourceUnavailable { .. }
                | BeatscriptError::InvalidConfig { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            BeatscriptError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            BeatscriptError::InvalidAnalysis { .. } => vec![
                "Re-download the audio analysis for the track",
                "Check the payload has sections, bars and beats arrays",
            ],
            BeatscriptError::InvalidFunscript { .. } => vec![
                "Check the file has an `actions` array of {pos, at} entries",
            ],
            BeatscriptError::InvalidConfig { .. } => vec![
                "Check canvas width and height are positive",
                "Value domain minimum must be below its maximum",
            ],
            BeatscriptError::CacheCorrupted { .. } => vec![
                "The entry has been discarded and will be fetched again",
                "Run with an empty cache directory to rebuild the cache",
            ],
            BeatscriptError::SourceUnavailable { .. } => vec![
                "Check the track id is correct",
                "Verify the analysis source directory contains the track",
            ],
            _ => vec![],
        }
    }
}
