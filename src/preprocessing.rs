// src/preprocessing.rs
//
// Per-frame stages that run before line detection: HLS color selection,
// Canny edge extraction, and the trapezoidal region-of-interest mask.
// All stateless: one BGR frame in, one Mat out.

use crate::types::{ColorFilterConfig, EdgeConfig, RegionConfig};
use anyhow::Result;
use opencv::{core, imgproc, prelude::*};

/// Keep only pixels likely to be lane paint.
///
/// Converts to HLS, builds separate white and yellow masks with `in_range`,
/// ORs them and masks the original frame. Everything else goes black.
pub fn select_lane_colors(frame: &Mat, config: &ColorFilterConfig) -> Result<Mat> {
    let mut hls = Mat::default();
    imgproc::cvt_color(frame, &mut hls, imgproc::COLOR_BGR2HLS, 0)?;

    let mut white_mask = Mat::default();
    core::in_range(
        &hls,
        &core::Scalar::new(0.0, config.white_lightness_min as f64, 0.0, 0.0),
        &core::Scalar::new(255.0, 255.0, 255.0, 0.0),
        &mut white_mask,
    )?;

    let mut yellow_mask = Mat::default();
    core::in_range(
        &hls,
        &core::Scalar::new(
            config.yellow_hue_min as f64,
            0.0,
            config.yellow_saturation_min as f64,
            0.0,
        ),
        &core::Scalar::new(config.yellow_hue_max as f64, 255.0, 255.0, 0.0),
        &mut yellow_mask,
    )?;

    let mut mask = Mat::default();
    core::bitwise_or(&white_mask, &yellow_mask, &mut mask, &core::no_array())?;

    let mut selected = Mat::default();
    core::bitwise_and(frame, frame, &mut selected, &mask)?;

    Ok(selected)
}

/// Grayscale, Gaussian blur, Canny.
pub fn detect_edges(frame: &Mat, config: &EdgeConfig) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

    let kernel = core::Size::new(config.blur_kernel_size, config.blur_kernel_size);
    let mut blurred = Mat::default();
    imgproc::gaussian_blur(&gray, &mut blurred, kernel, 0.0, 0.0, core::BORDER_DEFAULT)?;

    let mut edges = Mat::default();
    imgproc::canny(
        &blurred,
        &mut edges,
        config.canny_low,
        config.canny_high,
        3,
        false,
    )?;

    Ok(edges)
}

/// Trapezoid vertices in pixel coordinates, in fill order
/// (bottom-left, top-left, top-right, bottom-right).
pub fn roi_vertices(width: i32, height: i32, config: &RegionConfig) -> [(i32, i32); 4] {
    let scale = |v: [f32; 2]| {
        (
            (width as f32 * v[0]) as i32,
            (height as f32 * v[1]) as i32,
        )
    };

    [
        scale(config.bottom_left),
        scale(config.top_left),
        scale(config.top_right),
        scale(config.bottom_right),
    ]
}

/// Zero every edge pixel outside the region-of-interest trapezoid.
pub fn restrict_to_region(edges: &Mat, config: &RegionConfig) -> Result<Mat> {
    let mut mask = Mat::zeros(edges.rows(), edges.cols(), core::CV_8UC1)?.to_mat()?;

    let mut polygon = core::Vector::<core::Point>::new();
    for (x, y) in roi_vertices(edges.cols(), edges.rows(), config) {
        polygon.push(core::Point::new(x, y));
    }
    let mut polygons = core::Vector::<core::Vector<core::Point>>::new();
    polygons.push(polygon);

    imgproc::fill_poly(
        &mut mask,
        &polygons,
        core::Scalar::all(255.0),
        imgproc::LINE_8,
        0,
        core::Point::new(0, 0),
    )?;

    let mut restricted = Mat::default();
    core::bitwise_and(edges, &mask, &mut restricted, &core::no_array())?;

    Ok(restricted)
}
