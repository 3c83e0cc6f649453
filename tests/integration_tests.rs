//! Integration Tests
//!
//! End-to-end: analysis files on disk → repository with an on-disk cache →
//! organized tree.

use std::fs;
use std::path::Path;

use beatscript::analysis::{IntervalOrganizer, JoinStrategy};
use beatscript::cache::{AnalysisCache, AnalysisRepository, CacheKey, DirectorySource, FileCache};
use beatscript::config::Config;

const TRACK_ID: &str = "3n3Ppam7vgaVa1iaRUc9Lp";

fn write_fixture(dir: &Path) {
    let bars: Vec<serde_json::Value> = (0..8)
        .map(|i| serde_json::json!({"start": i as f64 * 2.0, "duration": 2.0, "confidence": 0.5}))
        .collect();
    let beats: Vec<serde_json::Value> = (0..32)
        .map(|i| serde_json::json!({"start": i as f64 * 0.5, "duration": 0.5, "confidence": 0.9}))
        .collect();

    let analysis = serde_json::json!({
        "meta": {"analyzer_version": "4.0.0", "platform": "Linux", "status_code": 0},
        "track": {"duration": 16.0, "tempo": 120.0, "time_signature": 4, "key": 0, "mode": 1,
                  "rhythmstring": "eJxNmgmS"},
        "sections": [
            {"start": 0.0, "duration": 8.0, "confidence": 1.0, "tempo": 120.0},
            {"start": 8.0, "duration": 8.0, "confidence": 0.7, "tempo": 121.0}
        ],
        "bars": bars,
        "beats": beats,
        "segments": [{"start": 0.0, "duration": 0.31, "confidence": 1.0, "loudness_start": -60.0,
                      "loudness_max_time": 0.05, "loudness_max": -12.3, "loudness_end": 0.0,
                      "pitches": [1.0, 0.2, 0.1, 0.1, 0.3, 0.1, 0.1, 0.6, 0.1, 0.1, 0.2, 0.1],
                      "timbre": [42.1, 64.0, -12.3, 2.1, 10.0, -3.0, 1.2, 0.5, -6.4, 3.3, 0.0, -1.1]}],
        "tatums": [{"start": 0.0, "duration": 0.25, "confidence": 0.8}]
    });
    let features = serde_json::json!({
        "id": TRACK_ID, "danceability": 0.735, "energy": 0.578, "acousticness": 0.0119,
        "liveness": 0.159, "tempo": 120.0, "key": 0, "mode": 1, "duration_ms": 16000
    });

    fs::write(
        dir.join(format!("{}.analysis.json", TRACK_ID)),
        serde_json::to_string(&analysis).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join(format!("{}.features.json", TRACK_ID)),
        serde_json::to_string(&features).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_analyze_through_file_cache() {
    let source_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    write_fixture(source_dir.path());

    let mut repo = AnalysisRepository::new(
        FileCache::new(cache_dir.path()),
        DirectorySource::new(source_dir.path()),
    );
    let (features, structured) = repo.structured(TRACK_ID).unwrap();

    assert_eq!(features.danceability, 0.735);
    assert_eq!(structured.sections.len(), 2);
    assert!(structured.sections.iter().all(|s| s.bars.len() == 4));
    assert!(structured
        .sections
        .iter()
        .flat_map(|s| s.bars.iter())
        .all(|b| b.beats.len() == 4));
    assert_eq!(structured.segments[0].pitches[7], 0.6);

    // both payloads cached under their own keys
    let cache = FileCache::new(cache_dir.path());
    assert!(cache.get(&CacheKey::analysis(TRACK_ID)).unwrap().is_some());
    assert!(cache.get(&CacheKey::features(TRACK_ID)).unwrap().is_some());
    assert_eq!(cache.usage().unwrap().file_count, 2);
}

#[test]
fn test_cache_serves_after_source_removed() {
    let source_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    write_fixture(source_dir.path());

    let mut repo = AnalysisRepository::new(
        FileCache::new(cache_dir.path()),
        DirectorySource::new(source_dir.path()),
    );
    let first = repo.structured(TRACK_ID).unwrap();

    fs::remove_file(source_dir.path().join(format!("{}.analysis.json", TRACK_ID))).unwrap();
    fs::remove_file(source_dir.path().join(format!("{}.features.json", TRACK_ID))).unwrap();

    let mut repo = AnalysisRepository::new(
        FileCache::new(cache_dir.path()),
        DirectorySource::new(source_dir.path()),
    )
    .with_organizer(IntervalOrganizer::new(JoinStrategy::Linear));
    let second = repo.structured(TRACK_ID).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unknown_track() {
    let source_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();

    let mut repo = AnalysisRepository::new(
        FileCache::new(cache_dir.path()),
        DirectorySource::new(source_dir.path()),
    );
    let err = repo.analysis("nope").unwrap_err();
    assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");
    assert!(!err.recovery_suggestions().is_empty());
}

#[test]
fn test_structured_json_keeps_track_extras() {
    let source_dir = tempfile::tempdir().unwrap();
    write_fixture(source_dir.path());

    let config = Config::default();
    let mut repo = AnalysisRepository::new(
        beatscript::cache::MemoryCache::new(),
        DirectorySource::new(source_dir.path()),
    )
    .with_organizer(config.organizer());
    let analysis = repo.analysis(TRACK_ID).unwrap();
    let value = serde_json::to_value(beatscript::organize(&analysis)).unwrap();

    assert_eq!(value["track"]["rhythmstring"], "eJxNmgmS");
    assert_eq!(value["sections"][1]["bars"][3]["start"], 14.0);
    assert_eq!(value["sections"][1]["bars"][3]["beats"][3]["start"], 15.5);
}
