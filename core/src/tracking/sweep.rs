use crate::config::DisplayConfig;
use crate::prelude::{ANGLE_MAX, ANGLE_MIN};
use serde::{Deserialize, Serialize};

/// Direction the sensor head is turning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    Increasing,
    Decreasing,
}

impl SweepDirection {
    pub fn sign(self) -> i32 {
        match self {
            SweepDirection::Increasing => 1,
            SweepDirection::Decreasing => -1,
        }
    }
}

/// One sample of the fading afterimage behind the sweep line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailStep {
    pub angle: f32,
    /// Linear fade, 1.0 at the sweep line down towards 0.0 at the tail.
    pub opacity: f32,
}

/// Current and previous sweep angle plus the inferred turning direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepState {
    current_angle: i32,
    previous_angle: i32,
    direction: SweepDirection,
}

impl Default for SweepState {
    fn default() -> Self {
        Self {
            current_angle: 0,
            previous_angle: 0,
            direction: SweepDirection::Increasing,
        }
    }
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly reported angle.
    ///
    /// Equal consecutive angles resolve to `Decreasing`.
    pub fn observe(&mut self, angle: i32) {
        self.previous_angle = self.current_angle;
        self.current_angle = angle;
        self.direction = if self.current_angle > self.previous_angle {
            SweepDirection::Increasing
        } else {
            SweepDirection::Decreasing
        };
    }

    pub fn current_angle(&self) -> i32 {
        self.current_angle
    }

    pub fn previous_angle(&self) -> i32 {
        self.previous_angle
    }

    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Samples `steps` angles behind the sweep line over `span_deg` degrees.
    ///
    /// Samples outside the sensor's field of view are dropped, not wrapped.
    pub fn trail(&self, span_deg: f32, steps: usize) -> Vec<TrailStep> {
        let sign = self.direction.sign() as f32;
        let current = self.current_angle as f32;
        (0..steps)
            .filter_map(|i| {
                let fraction = i as f32 / steps as f32;
                let angle = current - fraction * span_deg * sign;
                if angle < ANGLE_MIN as f32 || angle > ANGLE_MAX as f32 {
                    return None;
                }
                Some(TrailStep {
                    angle,
                    opacity: 1.0 - fraction,
                })
            })
            .collect()
    }

    pub fn trail_for(&self, display: &DisplayConfig) -> Vec<TrailStep> {
        self.trail(display.trail_span_deg, display.trail_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(angles: &[i32]) -> SweepState {
        let mut sweep = SweepState::new();
        for &angle in angles {
            sweep.observe(angle);
        }
        sweep
    }

    #[test]
    fn rising_angles_sweep_forward() {
        let sweep = after(&[10, 20]);
        assert_eq!(sweep.direction(), SweepDirection::Increasing);
        assert_eq!(sweep.previous_angle(), 10);
        assert_eq!(sweep.current_angle(), 20);
    }

    #[test]
    fn falling_angles_sweep_backward() {
        assert_eq!(after(&[20, 10]).direction(), SweepDirection::Decreasing);
    }

    // Repeated angles flip the trail to the decreasing side. This mirrors the
    // deployed display and may not be intentional; keep it until the sensor
    // firmware owners decide otherwise.
    #[test]
    fn repeated_angle_resolves_to_decreasing() {
        assert_eq!(after(&[20, 20]).direction(), SweepDirection::Decreasing);
        assert_eq!(after(&[0]).direction(), SweepDirection::Decreasing);
    }

    #[test]
    fn trail_fades_linearly_behind_sweep() {
        let trail = after(&[-1, 0]).trail(20.0, 100);
        assert_eq!(trail.len(), 100);
        assert_eq!(trail[0].angle, 0.0);
        assert_eq!(trail[0].opacity, 1.0);
        assert!((trail[50].angle + 10.0).abs() < 1e-4);
        assert!((trail[50].opacity - 0.5).abs() < 1e-6);
        assert!(trail.windows(2).all(|w| w[1].opacity < w[0].opacity));
    }

    #[test]
    fn trail_follows_decreasing_sweep() {
        let trail = after(&[10, 5]).trail(20.0, 4);
        let angles: Vec<f32> = trail.iter().map(|s| s.angle).collect();
        assert_eq!(angles, vec![5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn trail_is_clipped_at_field_edge() {
        let trail = after(&[-85, -80]).trail(20.0, 100);
        assert!(trail.iter().all(|s| s.angle >= -90.0));
        // i / 100 * 20 <= 10 keeps indices 0..=50
        assert_eq!(trail.len(), 51);
    }
}
