use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub video: VideoConfig,
    pub color: ColorFilterConfig,
    pub edge: EdgeConfig,
    pub region: RegionConfig,
    pub hough: HoughConfig,
    pub lane: LaneConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub save_annotated: bool,
}

/// HLS thresholds selecting pixels likely to be lane paint.
///
/// OpenCV HLS channel order is H, L, S with hue in [0, 180] for 8-bit images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorFilterConfig {
    /// White paint: lightness floor, any hue/saturation
    pub white_lightness_min: u8,
    pub yellow_hue_min: u8,
    pub yellow_hue_max: u8,
    /// Yellow paint: saturation floor within the hue window
    pub yellow_saturation_min: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Gaussian kernel side length, must be odd
    pub blur_kernel_size: i32,
    pub canny_low: f64,
    pub canny_high: f64,
}

/// Region-of-interest trapezoid, each vertex as [x, y] fractions of frame
/// width/height so one config works at any resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub bottom_left: [f32; 2],
    pub top_left: [f32; 2],
    pub top_right: [f32; 2],
    pub bottom_right: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoughConfig {
    /// Distance resolution of the accumulator in pixels
    pub rho: f64,
    /// Angle resolution of the accumulator in degrees
    pub theta_degrees: f64,
    /// Minimum accumulator votes for a line
    pub threshold: i32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Fraction of frame height where the drawn lane lines stop
    pub top_fraction: f32,
    /// BGR
    pub line_color: [u8; 3],
    pub line_thickness: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// A raw line segment from the Hough transform, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// `y = slope * x + intercept` in pixel space. Image coordinates: y grows
/// downward, so the left lane has negative slope and the right non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
}

/// A fitted lane line back-projected to two drawable pixel points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLine {
    pub bottom: (i32, i32),
    pub top: (i32, i32),
}

/// Per-frame fit result. Either side may be absent when no segment
/// supported it; the renderer skips absent sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePair {
    pub left: Option<LaneLine>,
    pub right: Option<LaneLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_from_yaml() {
        let yaml = r#"
video:
  input_dir: test_videos
  output_dir: output_videos
  save_annotated: true
color:
  white_lightness_min: 200
  yellow_hue_min: 10
  yellow_hue_max: 40
  yellow_saturation_min: 100
edge:
  blur_kernel_size: 13
  canny_low: 50.0
  canny_high: 150.0
region:
  bottom_left: [0.10, 0.95]
  top_left: [0.40, 0.60]
  top_right: [0.60, 0.60]
  bottom_right: [0.90, 0.95]
hough:
  rho: 1.0
  theta_degrees: 1.0
  threshold: 20
  min_line_length: 20.0
  max_line_gap: 300.0
lane:
  top_fraction: 0.6
  line_color: [0, 255, 0]
  line_thickness: 12
logging:
  level: info
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.color.white_lightness_min, 200);
        assert_eq!(config.edge.blur_kernel_size, 13);
        assert_eq!(config.region.top_left, [0.40, 0.60]);
        assert_eq!(config.hough.threshold, 20);
        assert_eq!(config.lane.line_thickness, 12);
        assert_eq!(config.logging.level, "info");
    }
}
