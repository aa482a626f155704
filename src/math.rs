//! Progress math shared by the progress widgets.
//!
//! Every function here is pure. Percentages are expressed on a 0-100 scale
//! and are always clamped, so rendered fills never overflow their track even
//! when the raw value reported to the host is out of range.
//!
//! ```rust
//! use bubbletea_progress::math::{percentage, ring_geometry, stroke_offset};
//!
//! assert_eq!(percentage(25.0, 200.0).unwrap(), 12.5);
//! assert_eq!(percentage(150.0, 100.0).unwrap(), 100.0);
//!
//! let ring = ring_geometry(100.0, 8.0).unwrap();
//! assert_eq!(ring.radius, 46.0);
//! assert_eq!(stroke_offset(100.0, ring.circumference), 0.0);
//! ```

use crate::error::{Error, Result};
use std::f64::consts::PI;

const SEGMENT_EPSILON: f64 = 1e-9;

/// Clamps `value` into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Checks that `max` can be used as a percentage denominator.
pub fn validate_max(max: f64) -> Result<f64> {
    if !max.is_finite() || max <= 0.0 {
        return Err(Error::invalid_configuration(
            "max",
            format!("must be a finite number greater than 0, got {}", max),
        ));
    }
    Ok(max)
}

/// Maps `value` out of `max` onto a percentage clamped to `[0, 100]`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when `max` is zero, negative or
/// not finite, since the ratio is undefined.
pub fn percentage(value: f64, max: f64) -> Result<f64> {
    let max = validate_max(max)?;
    Ok(clamp((value / max) * 100.0, 0.0, 100.0))
}

/// Returns `true` once `value` has reached `max`.
pub fn is_complete(value: f64, max: f64) -> bool {
    value >= max
}

/// Radius and circumference of a ring drawn inside a square of `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Distance from the center to the middle of the stroke.
    pub radius: f64,
    /// Length of the full stroke path.
    pub circumference: f64,
}

/// Computes the ring that fits a `size` box with a stroke of `stroke_width`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when the stroke is wider than the
/// box, which would give a negative radius.
pub fn ring_geometry(size: f64, stroke_width: f64) -> Result<RingGeometry> {
    let radius = (size - stroke_width) / 2.0;
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::invalid_configuration(
            "stroke_width",
            format!(
                "stroke width {} does not fit inside size {}",
                stroke_width, size
            ),
        ));
    }
    Ok(RingGeometry {
        radius,
        circumference: 2.0 * PI * radius,
    })
}

/// Dash offset for a ring stroke: the full circumference at 0% and 0 at 100%.
pub fn stroke_offset(percentage: f64, circumference: f64) -> f64 {
    circumference - (percentage / 100.0) * circumference
}

/// How many segments of a segmented bar are filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFill {
    /// Number of completely filled segments.
    pub filled: usize,
    /// Fill ratio `[0, 1)` of the segment right after the filled ones.
    pub partial: f64,
}

impl SegmentFill {
    /// Returns the fill ratio of segment `index`: 1.0, `partial` or 0.0.
    pub fn ratio(&self, index: usize) -> f64 {
        if index < self.filled {
            1.0
        } else if index == self.filled {
            self.partial
        } else {
            0.0
        }
    }
}

/// Splits a clamped percentage across `segments` equal cells.
///
/// Products within `1e-9` of a segment boundary snap to it, so `2/12` of
/// twelve segments fills two of them despite float rounding.
pub fn segment_fill(percentage: f64, segments: usize) -> SegmentFill {
    let exact = (clamp(percentage, 0.0, 100.0) / 100.0) * segments as f64;
    let filled = (exact + SEGMENT_EPSILON).floor();
    SegmentFill {
        filled: filled as usize,
        partial: (exact - filled).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(percentage(150.0, 100.0).unwrap(), 100.0);
        assert_eq!(percentage(-50.0, 100.0).unwrap(), 0.0);
        assert_eq!(percentage(25.0, 200.0).unwrap(), 12.5);
        assert_eq!(percentage(30.0, 100.0).unwrap(), 30.0);
    }

    #[test]
    fn test_percentage_rejects_bad_max() {
        assert!(percentage(10.0, 0.0).unwrap_err().is_invalid_configuration());
        assert!(percentage(10.0, -5.0).is_err());
        assert!(percentage(10.0, f64::NAN).is_err());
        assert!(percentage(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_is_complete() {
        assert!(!is_complete(99.9, 100.0));
        assert!(is_complete(100.0, 100.0));
        assert!(is_complete(120.0, 100.0));
    }

    #[test]
    fn test_ring_geometry() {
        let ring = ring_geometry(100.0, 8.0).unwrap();
        assert_eq!(ring.radius, 46.0);
        assert!((ring.circumference - 2.0 * PI * 46.0).abs() < 1e-9);

        assert!(ring_geometry(10.0, 12.0).is_err());
        assert_eq!(ring_geometry(8.0, 8.0).unwrap().circumference, 0.0);
    }

    #[test]
    fn test_stroke_offset_endpoints() {
        let c = 100.0;
        assert_eq!(stroke_offset(0.0, c), 100.0);
        assert_eq!(stroke_offset(25.0, c), 75.0);
        assert_eq!(stroke_offset(100.0, c), 0.0);
    }

    #[test]
    fn test_segment_fill() {
        let fill = segment_fill(50.0, 12);
        assert_eq!(fill.filled, 6);
        assert_eq!(fill.partial, 0.0);

        let fill = segment_fill(55.0, 10);
        assert_eq!(fill.filled, 5);
        assert!((fill.partial - 0.5).abs() < 1e-9);
        assert_eq!(fill.ratio(4), 1.0);
        assert!((fill.ratio(5) - 0.5).abs() < 1e-9);
        assert_eq!(fill.ratio(6), 0.0);

        assert_eq!(segment_fill(140.0, 4).filled, 4);
        assert_eq!(segment_fill(-10.0, 4).partial, 0.0);

        for value in 0..=12 {
            let pct = percentage(value as f64, 12.0).unwrap();
            assert_eq!(segment_fill(pct, 12).filled, value);
        }
        assert_eq!(segment_fill(-10.0, 4).filled, 0);
    }
}
