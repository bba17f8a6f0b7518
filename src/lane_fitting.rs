// src/lane_fitting.rs
//
// Averages the Hough segments of one frame into at most two lane lines.
//
// Segments are split by slope sign (negative = left lane, non-negative =
// right lane under the image convention that y grows downward), each side
// is reduced to a single length-weighted average (slope, intercept), and
// the average is back-projected to two pixel points spanning a fixed
// vertical range. Every frame is fit independently; nothing is carried
// across frames.

use crate::types::{FittedLine, LaneLine, LanePair, LineSegment};

/// Fit both lane lines from one frame's segments.
///
/// `top_fraction` is the fraction of `frame_height` where the drawn lines
/// stop; the bottom endpoint is always at `frame_height`.
pub fn fit_lane_lines(segments: &[LineSegment], frame_height: i32, top_fraction: f32) -> LanePair {
    let (left_fit, right_fit) = average_slope_intercept(segments);

    let y_bottom = frame_height as f64;
    let y_top = frame_height as f64 * top_fraction as f64;

    LanePair {
        left: left_fit.and_then(|fit| pixel_points(y_bottom, y_top, &fit)),
        right: right_fit.and_then(|fit| pixel_points(y_bottom, y_top, &fit)),
    }
}

/// Length-weighted average (slope, intercept) per lane side.
///
/// Longer segments carry higher detector confidence, so they dominate the
/// average. Vertical segments have no finite slope and are dropped. A side
/// with no supporting segment yields `None`.
pub fn average_slope_intercept(
    segments: &[LineSegment],
) -> (Option<FittedLine>, Option<FittedLine>) {
    let mut left = SideAccumulator::default();
    let mut right = SideAccumulator::default();

    for segment in segments {
        if segment.x1 == segment.x2 {
            continue;
        }

        let dx = (segment.x2 - segment.x1) as f64;
        let dy = (segment.y2 - segment.y1) as f64;
        let slope = dy / dx;
        let intercept = segment.y1 as f64 - slope * segment.x1 as f64;
        let length = dx.hypot(dy);

        if slope < 0.0 {
            left.add(slope, intercept, length);
        } else {
            right.add(slope, intercept, length);
        }
    }

    (left.average(), right.average())
}

/// Back-project a fitted line to integer pixel points at `y_bottom` and
/// `y_top`.
///
/// A zero slope has no finite x solution; that side is reported absent
/// rather than dividing through. Non-finite results are rejected the same
/// way.
pub fn pixel_points(y_bottom: f64, y_top: f64, line: &FittedLine) -> Option<LaneLine> {
    if line.slope == 0.0 {
        return None;
    }

    let x_bottom = (y_bottom - line.intercept) / line.slope;
    let x_top = (y_top - line.intercept) / line.slope;

    if !x_bottom.is_finite() || !x_top.is_finite() {
        return None;
    }

    Some(LaneLine {
        bottom: (x_bottom as i32, y_bottom as i32),
        top: (x_top as i32, y_top as i32),
    })
}

#[derive(Default)]
struct SideAccumulator {
    weighted_slope: f64,
    weighted_intercept: f64,
    total_length: f64,
}

impl SideAccumulator {
    fn add(&mut self, slope: f64, intercept: f64, length: f64) {
        self.weighted_slope += slope * length;
        self.weighted_intercept += intercept * length;
        self.total_length += length;
    }

    fn average(&self) -> Option<FittedLine> {
        if self.total_length > 0.0 {
            Some(FittedLine {
                slope: self.weighted_slope / self.total_length,
                intercept: self.weighted_intercept / self.total_length,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(x1: i32, y1: i32, x2: i32, y2: i32) -> LineSegment {
        LineSegment { x1, y1, x2, y2 }
    }

    fn length(s: &LineSegment) -> f64 {
        ((s.x2 - s.x1) as f64).hypot((s.y2 - s.y1) as f64)
    }

    #[test]
    fn test_side_partition_by_slope_sign() {
        // slope -1 goes left, slope +1 goes right, each untouched by the other
        let segments = vec![segment(100, 400, 200, 300), segment(300, 300, 400, 400)];
        let (left, right) = average_slope_intercept(&segments);

        let left = left.unwrap();
        assert!((left.slope - (-1.0)).abs() < 1e-9);
        assert!((left.intercept - 500.0).abs() < 1e-9);

        let right = right.unwrap();
        assert!((right.slope - 1.0).abs() < 1e-9);
        assert!((right.intercept - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_segment_goes_right() {
        // slope 0 is non-negative, so it lands in the right group
        let segments = vec![segment(0, 100, 50, 100)];
        let (left, right) = average_slope_intercept(&segments);
        assert!(left.is_none());
        let right = right.unwrap();
        assert_eq!(right.slope, 0.0);
        assert_eq!(right.intercept, 100.0);
    }

    #[test]
    fn test_vertical_segments_excluded() {
        let segments = vec![segment(50, 0, 50, 100), segment(200, 300, 200, 50)];
        let (left, right) = average_slope_intercept(&segments);
        assert!(left.is_none());
        assert!(right.is_none());
    }

    #[test]
    fn test_weighted_average_matches_explicit_formula() {
        // slope -1 intercept 100, and slope -2 intercept 200; the longer
        // second segment must dominate
        let a = segment(0, 100, 3, 97);
        let b = segment(0, 200, 6, 188);
        let (la, lb) = (length(&a), length(&b));

        let expected_slope = (-1.0 * la + -2.0 * lb) / (la + lb);
        let expected_intercept = (100.0 * la + 200.0 * lb) / (la + lb);

        let (left, right) = average_slope_intercept(&[a, b]);
        assert!(right.is_none());

        let left = left.unwrap();
        assert!((left.slope - expected_slope).abs() < 1e-9);
        assert!((left.intercept - expected_intercept).abs() < 1e-9);
    }

    #[test]
    fn test_equal_segments_average_to_themselves() {
        let a = segment(0, 100, 10, 90);
        let (left, _) = average_slope_intercept(&[a, a, a]);
        let left = left.unwrap();
        assert!((left.slope - (-1.0)).abs() < 1e-9);
        assert!((left.intercept - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_absence_propagation() {
        let (left, right) = average_slope_intercept(&[]);
        assert!(left.is_none());
        assert!(right.is_none());

        // only negative slopes: right stays absent
        let segments = vec![segment(0, 100, 10, 90), segment(0, 300, 10, 280)];
        let (left, right) = average_slope_intercept(&segments);
        assert!(left.is_some());
        assert!(right.is_none());
    }

    #[test]
    fn test_back_projection_round_trip() {
        let line = FittedLine {
            slope: -1.25,
            intercept: 800.0,
        };
        let lane = pixel_points(720.0, 432.0, &line).unwrap();

        // re-evaluating the line at the stored y values must reproduce the
        // stored x values within integer rounding
        for (x, y) in [lane.bottom, lane.top] {
            let x_exact = (y as f64 - line.intercept) / line.slope;
            assert!((x_exact - x as f64).abs() < 1.0);
        }
        assert_eq!(lane.bottom.1, 720);
        assert_eq!(lane.top.1, 432);
    }

    #[test]
    fn test_zero_slope_is_absent_not_a_fault() {
        let flat = FittedLine {
            slope: 0.0,
            intercept: 100.0,
        };
        assert!(pixel_points(720.0, 432.0, &flat).is_none());

        // end to end: a frame with only horizontal segments draws nothing
        // on the right and nothing on the left
        let lanes = fit_lane_lines(&[segment(0, 100, 50, 100)], 500, 0.6);
        assert!(lanes.left.is_none());
        assert!(lanes.right.is_none());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let segments = vec![
            segment(100, 400, 200, 300),
            segment(300, 300, 400, 400),
            segment(120, 380, 180, 320),
        ];
        let first = fit_lane_lines(&segments, 500, 0.6);
        let second = fit_lane_lines(&segments, 500, 0.6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_segment_per_side_end_to_end() {
        // left: slope -1, intercept 500; right: slope 1, intercept 0;
        // frame height 500 with top at 0.6 * 500 = 300
        let segments = vec![segment(100, 400, 200, 300), segment(300, 300, 400, 400)];
        let lanes = fit_lane_lines(&segments, 500, 0.6);

        let left = lanes.left.unwrap();
        assert_eq!(left.bottom, (0, 500));
        assert_eq!(left.top, (200, 300));

        let right = lanes.right.unwrap();
        assert_eq!(right.bottom, (500, 500));
        assert_eq!(right.top, (300, 300));
    }
}
