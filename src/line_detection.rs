// src/line_detection.rs

use crate::types::{HoughConfig, LineSegment};
use anyhow::Result;
use opencv::{core, imgproc, prelude::*};
use tracing::debug;

/// Run the probabilistic Hough transform over a restricted edge map.
///
/// An empty result is normal (unmarked road, occlusion) and not an error;
/// the fitter reports both sides absent for it.
pub fn detect_segments(edges: &Mat, config: &HoughConfig) -> Result<Vec<LineSegment>> {
    let mut lines = core::Vector::<core::Vec4i>::new();

    imgproc::hough_lines_p(
        edges,
        &mut lines,
        config.rho,
        config.theta_degrees.to_radians(),
        config.threshold,
        config.min_line_length,
        config.max_line_gap,
    )?;

    let segments: Vec<LineSegment> = lines
        .iter()
        .map(|l| LineSegment {
            x1: l[0],
            y1: l[1],
            x2: l[2],
            y2: l[3],
        })
        .collect();

    debug!("Hough transform returned {} segment(s)", segments.len());

    Ok(segments)
}
