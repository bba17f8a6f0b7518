// src/main.rs

mod config;
mod lane_fitting;
mod line_detection;
mod preprocessing;
mod road_overlay;
mod types;
mod video_processor;

use anyhow::Result;
use opencv::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};
use types::{Config, LanePair};
use video_processor::VideoProcessor;

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("lane_detection={}", config.logging.level))
        .init();

    info!("🛣️  Lane Line Detection Starting");
    info!("✓ Configuration loaded");

    let processor = VideoProcessor::new(config.clone());
    let videos = processor.find_video_files()?;

    if videos.is_empty() {
        error!("No video files found in {}", config.video.input_dir);
        return Ok(());
    }

    info!("Found {} video file(s) to process", videos.len());

    let start_time = Instant::now();

    for (idx, video_path) in videos.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            videos.len(),
            video_path.display()
        );

        let stats = process_video(video_path, &processor, &config)?;

        info!("✓ Video processed successfully!");
        info!("  Total frames: {}", stats.total_frames);
        info!(
            "  Frames with both lanes: {} ({:.1}%)",
            stats.frames_with_both_lanes,
            100.0 * stats.frames_with_both_lanes as f64 / stats.total_frames.max(1) as f64
        );
        info!("  Frames with one lane: {}", stats.frames_with_one_lane);
        info!("  Frames with no lane: {}", stats.frames_with_no_lane);
        info!("  Processing Speed: {:.1} FPS", stats.avg_fps);
    }

    info!("📊 Final Report:");
    info!(
        "  Total process time: {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    if let Some(peak_mb) = peak_memory_mb() {
        info!("  Total memory usage: {:.1} MB", peak_mb);
    }

    Ok(())
}

struct ProcessingStats {
    total_frames: u64,
    frames_with_both_lanes: u64,
    frames_with_one_lane: u64,
    frames_with_no_lane: u64,
    avg_fps: f64,
}

fn process_video(
    video_path: &Path,
    processor: &VideoProcessor,
    config: &Config,
) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    let mut reader = processor.open_video(video_path)?;
    let mut writer = processor.create_writer(video_path, reader.width, reader.height, reader.fps)?;

    let mut total_frames: u64 = 0;
    let mut frames_with_both_lanes: u64 = 0;
    let mut frames_with_one_lane: u64 = 0;
    let mut frames_with_no_lane: u64 = 0;

    // Strictly sequential: each frame is fully processed and written before
    // the next is read.
    while let Some(frame) = reader.read_frame()? {
        total_frames += 1;

        let lanes = process_frame(&frame, config)?;

        match (lanes.left.is_some(), lanes.right.is_some()) {
            (true, true) => frames_with_both_lanes += 1,
            (false, false) => {
                frames_with_no_lane += 1;
                debug!("Frame {}: no supporting segments on either side", total_frames);
            }
            _ => frames_with_one_lane += 1,
        }

        if total_frames % 50 == 0 {
            info!(
                "Progress: {:.1}% ({}/{})",
                reader.progress(),
                reader.current_frame,
                reader.total_frames
            );
        }

        if let Some(ref mut w) = writer {
            let annotated = road_overlay::draw_lane_lines(&frame, &lanes, &config.lane)?;
            w.write(&annotated)?;
        }
    }

    let duration = start_time.elapsed();
    let avg_fps = total_frames as f64 / duration.as_secs_f64().max(1e-6);

    Ok(ProcessingStats {
        total_frames,
        frames_with_both_lanes,
        frames_with_one_lane,
        frames_with_no_lane,
        avg_fps,
    })
}

/// One frame through the full pipeline: color selection, edge extraction,
/// region restriction, Hough transform, lane fit.
fn process_frame(frame: &Mat, config: &Config) -> Result<LanePair> {
    let color_selected = preprocessing::select_lane_colors(frame, &config.color)?;
    let edges = preprocessing::detect_edges(&color_selected, &config.edge)?;
    let restricted = preprocessing::restrict_to_region(&edges, &config.region)?;
    let segments = line_detection::detect_segments(&restricted, &config.hough)?;

    Ok(lane_fitting::fit_lane_lines(
        &segments,
        frame.rows(),
        config.lane.top_fraction,
    ))
}

/// Peak resident set size from /proc, where available. Diagnostic only.
fn peak_memory_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let kb: f64 = status
        .lines()
        .find(|line| line.starts_with("VmHWM:"))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()?;
    Some(kb / 1024.0)
}
