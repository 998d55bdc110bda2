//! Wheel geometry — angular spans per segment and polar placement.
//!
//! Angles are radians measured clockwise from twelve o'clock.

use std::f64::consts::{PI, TAU};

/// One slice of the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSegment {
    pub idx: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl WheelSegment {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Lay effective weights out around the full circle, in order.
pub fn wheel_segments(weights: &[f64], total: f64) -> Vec<WheelSegment> {
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    weights
        .iter()
        .enumerate()
        .map(|(idx, &w)| {
            let angle = w / total * TAU;
            let seg = WheelSegment {
                idx,
                start_angle: start,
                end_angle: start + angle,
            };
            start += angle;
            seg
        })
        .collect()
}

/// Point at `angle` on a circle of radius `r` around `(cx, cy)`, in a
/// y-down coordinate system (angle 0 is straight up).
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    let a = angle - PI / 2.0;
    (cx + r * a.cos(), cy + r * a.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn segments_are_proportional_and_contiguous() {
        let segs = wheel_segments(&[1.0, 1.0, 2.0], 4.0);
        assert_eq!(segs.len(), 3);
        assert!(close(segs[0].start_angle, 0.0));
        assert!(close(segs[0].end_angle, PI / 2.0));
        assert!(close(segs[2].end_angle - segs[2].start_angle, PI));
        assert!(close(segs[1].start_angle, segs[0].end_angle));
        assert!(close(segs[2].end_angle, TAU));
        assert!(close(segs[2].mid_angle(), 1.5 * PI));
    }

    #[test]
    fn empty_wheel_has_no_segments() {
        assert!(wheel_segments(&[], 0.0).is_empty());
    }

    #[test]
    fn zero_angle_points_up() {
        let (x, y) = polar_to_cartesian(160.0, 160.0, 100.0, 0.0);
        assert!(close(x, 160.0));
        assert!(close(y, 60.0));

        let (x, y) = polar_to_cartesian(0.0, 0.0, 1.0, PI / 2.0);
        assert!(close(x, 1.0));
        assert!(close(y, 0.0));
    }
}
