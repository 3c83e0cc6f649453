//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::analysis::{AudioAnalysis, StructuredAudioAnalysis};
use crate::cache::{AnalysisCache, AnalysisRepository, DirectorySource, FileCache, MemoryCache};
use crate::config::Config;
use crate::error::{BeatscriptError, Result};
use crate::funscript::Funscript;
use crate::plot::{format_time_tick, svg, SeriesScale};

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| BeatscriptError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Organize an analysis file, writing the result to `output` or stdout.
pub fn organize(input: &Path, output: Option<&Path>, config: &Config) -> Result<StructuredAudioAnalysis> {
    info!("Organizing analysis: {}", input.display());

    let analysis = AudioAnalysis::load(input)?;
    let structured = config.organizer().organize(&analysis);
    let json = serde_json::to_string_pretty(&structured)?;

    match output {
        Some(path) => {
            write_file(path, &json)?;
            println!("Structured analysis written: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(structured)
}

/// One line per section: time span, tempo, bar and beat counts.
pub fn summary_lines(structured: &StructuredAudioAnalysis) -> Vec<String> {
    structured
        .sections
        .iter()
        .enumerate()
        .map(|(i, nested)| {
            let section = &nested.section;
            format!(
                "#{:<3} {:>8.2}s +{:>7.2}s  {:>6.1} bpm  {:>3} bars  {:>4} beats",
                i + 1,
                section.start,
                section.duration,
                section.tempo,
                nested.bars.len(),
                nested.beat_count()
            )
        })
        .collect()
}

/// Print a per-section summary of an analysis file.
pub fn summary(input: &Path, config: &Config) -> Result<()> {
    let analysis = AudioAnalysis::load(input)?;
    let structured = config.organizer().organize(&analysis);

    println!(
        "Track: {:.2}s, {:.1} bpm, {} sections, {} bars, {} beats",
        structured.track.duration,
        structured.track.tempo,
        structured.sections.len(),
        structured.bars.len(),
        structured.beats.len()
    );
    println!("{:-<60}", "");
    for line in summary_lines(&structured) {
        println!("{}", line);
    }

    let unplaced = structured.unplaced_bar_count();
    if unplaced > 0 {
        warn!(
            "{} of {} bars fall outside every section",
            unplaced,
            structured.bars.len()
        );
    }

    Ok(())
}

/// Print the plot scales of a funscript and optionally render it as SVG.
pub fn plot(input: &Path, svg_output: Option<&Path>, config: &Config) -> Result<SeriesScale> {
    info!("Plotting funscript: {}", input.display());

    let script = Funscript::load(input)?;
    let points = script.points();
    let scale = SeriesScale::with_tick_cap(
        &points,
        config.value_domain,
        &config.canvas,
        config.max_time_ticks,
    );

    println!("Actions: {}", points.len());
    println!(
        "Time: 0..{} ms -> 0..{} px (axis 0..{})",
        scale.max_time(),
        config.canvas.width,
        scale.axis_scale().domain().1
    );
    println!(
        "Value: {}..{} -> {}..0 px",
        config.value_domain.min, config.value_domain.max, config.canvas.height
    );
    let labels: Vec<String> = scale.time_ticks().into_iter().map(format_time_tick).collect();
    println!("Ticks ({}): {}", labels.len(), labels.join(" "));

    if let Some(path) = svg_output {
        write_file(path, &svg::render(&points, &scale, &config.canvas))?;
        println!("SVG written: {}", path.display());
    }

    Ok(scale)
}

/// Fetch or load from cache, then organize, a track's analysis.
pub fn analyze(track_id: &str, source_dir: &Path, config: &Config) -> Result<()> {
    info!("Analyzing track {} from {}", track_id, source_dir.display());

    let source = DirectorySource::new(source_dir);
    let (features, structured) = match &config.cache_dir {
        Some(dir) => AnalysisRepository::new(FileCache::new(dir), source)
            .with_organizer(config.organizer())
            .structured(track_id)?,
        None => AnalysisRepository::new(MemoryCache::new(), source)
            .with_organizer(config.organizer())
            .structured(track_id)?,
    };

    println!("Danceability: {}", features.danceability);
    println!("Acousticness: {}", features.acousticness);
    println!("Energy: {}", features.energy);
    println!("Liveness: {}", features.liveness);
    println!("Tempo: {}", features.tempo);
    println!("{:-<60}", "");
    for line in summary_lines(&structured) {
        println!("{}", line);
    }

    Ok(())
}

/// Show cache usage; prune or clear on request.
pub fn cache(prune: bool, clear: bool, config: &Config) -> Result<()> {
    let dir = match &config.cache_dir {
        Some(dir) => dir,
        None => {
            println!("No cache directory configured (set cache_dir or BEATSCRIPT_CACHE_DIR)");
            return Ok(());
        }
    };

    let mut cache = FileCache::new(dir);
    if clear {
        cache.clear()?;
        println!("Cache cleared: {}", dir.display());
    } else if prune {
        let freed = cache.prune_untracked()?;
        println!("Pruned {} bytes", freed);
    }

    let usage = cache.usage()?;
    println!("Cache: {}", dir.display());
    println!("Entries: {}", usage.file_count);
    println!("Size: {:.1} MB", usage.total_size_mb);

    Ok(())
}
