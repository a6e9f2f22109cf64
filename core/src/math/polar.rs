use crate::config::DisplayConfig;
use crate::prelude::ANGLE_OFFSET;
use serde::{Deserialize, Serialize};

/// Point in screen space (pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Maps a sweep angle (degrees) and a distance onto the screen.
///
/// The radial length is `radius * distance / max_range`; the drawing angle is
/// `angle - 90` degrees, so a sweep angle of 0 points straight up from `center`.
pub fn to_screen(
    angle: f32,
    distance: f32,
    center: ScreenPoint,
    radius: f32,
    max_range: f32,
) -> ScreenPoint {
    let length = radius * distance / max_range;
    let theta = (angle - ANGLE_OFFSET as f32).to_radians();
    ScreenPoint::new(
        center.x + length * theta.cos(),
        center.y + length * theta.sin(),
    )
}

/// Projection bound to one display geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarProjector {
    pub center: ScreenPoint,
    pub radius: f32,
    pub max_range: f32,
}

impl PolarProjector {
    pub fn new(center: ScreenPoint, radius: f32, max_range: f32) -> Self {
        Self {
            center,
            radius,
            max_range,
        }
    }

    pub fn from_display(display: &DisplayConfig) -> Self {
        Self::new(display.center, display.radius, display.max_range_cm as f32)
    }

    /// Projects a point `distance` centimetres out along `angle`.
    pub fn project(&self, angle: f32, distance: f32) -> ScreenPoint {
        to_screen(angle, distance, self.center, self.radius, self.max_range)
    }

    /// Projects a point at `pixels` from the center, independent of range.
    pub fn project_pixels(&self, angle: f32, pixels: f32) -> ScreenPoint {
        to_screen(angle, pixels, self.center, 1.0, 1.0)
    }

    /// Point on the outer edge of the scope.
    pub fn rim(&self, angle: f32) -> ScreenPoint {
        self.project(angle, self.max_range)
    }

    /// Radius in pixels of the ring at `distance` centimetres.
    pub fn ring_radius(&self, distance: f32) -> f32 {
        self.radius * distance / self.max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn assert_close(actual: ScreenPoint, expected: ScreenPoint) {
        assert!(
            actual.distance_to(expected) < EPS,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn zero_distance_projects_to_center_for_every_angle() {
        let center = ScreenPoint::new(700.0, 620.0);
        for angle in -90..=90 {
            let point = to_screen(angle as f32, 0.0, center, 460.0, 50.0);
            assert_close(point, center);
        }
    }

    #[test]
    fn straight_ahead_points_up() {
        let center = ScreenPoint::new(100.0, 100.0);
        let point = to_screen(0.0, 50.0, center, 40.0, 50.0);
        assert_close(point, ScreenPoint::new(100.0, 60.0));
    }

    #[test]
    fn extremes_lie_on_the_baseline() {
        let projector = PolarProjector::new(ScreenPoint::new(0.0, 0.0), 10.0, 5.0);
        assert_close(projector.rim(-90.0), ScreenPoint::new(-10.0, 0.0));
        assert_close(projector.rim(90.0), ScreenPoint::new(10.0, 0.0));
    }

    #[test]
    fn half_range_projects_half_radius() {
        let projector = PolarProjector::new(ScreenPoint::new(0.0, 0.0), 460.0, 50.0);
        let point = projector.project(30.0, 25.0);
        assert!((point.distance_to(projector.center) - 230.0).abs() < EPS);
        assert!((projector.ring_radius(25.0) - 230.0).abs() < EPS);
    }

    #[test]
    fn pixel_projection_ignores_range_scale() {
        let projector = PolarProjector::new(ScreenPoint::new(0.0, 0.0), 460.0, 50.0);
        let point = projector.project_pixels(0.0, 505.0);
        assert_close(point, ScreenPoint::new(0.0, -505.0));
    }
}
