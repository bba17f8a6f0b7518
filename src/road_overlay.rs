// src/road_overlay.rs

use crate::types::{LaneConfig, LanePair};
use anyhow::Result;
use opencv::{core, imgproc, prelude::*};

/// Draw the fitted lane lines onto a copy of the frame.
///
/// Lines go onto a black overlay first and are blended in with
/// `add_weighted`, so thick strokes keep the road texture underneath.
/// Absent sides are skipped silently.
pub fn draw_lane_lines(frame: &Mat, lanes: &LanePair, config: &LaneConfig) -> Result<Mat> {
    let mut overlay = Mat::zeros(frame.rows(), frame.cols(), frame.typ())?.to_mat()?;

    let color = core::Scalar::new(
        config.line_color[0] as f64,
        config.line_color[1] as f64,
        config.line_color[2] as f64,
        0.0,
    );

    for lane in [&lanes.left, &lanes.right].into_iter().flatten() {
        imgproc::line(
            &mut overlay,
            core::Point::new(lane.bottom.0, lane.bottom.1),
            core::Point::new(lane.top.0, lane.top.1),
            color,
            config.line_thickness,
            imgproc::LINE_AA,
            0,
        )?;
    }

    let mut annotated = Mat::default();
    core::add_weighted(frame, 1.0, &overlay, 1.0, 0.0, &mut annotated, -1)?;

    Ok(annotated)
}
