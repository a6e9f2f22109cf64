use crate::config::DisplayConfig;
use crate::display::layout::Segment;
use crate::math::polar::{PolarProjector, ScreenPoint};
use crate::tracking::{Detection, DetectionStore, SweepState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Peak trail opacity, just below the solid sweep line.
pub const TRAIL_PEAK_ALPHA: f32 = 220.0 / 255.0;
pub const NO_SIGNAL_MESSAGE: &str = "NO SIGNAL DETECTED";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSegment {
    pub segment: Segment,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetMarker {
    pub detection: Detection,
    pub center: ScreenPoint,
    pub radius: f32,
}

/// Everything that changes between frames while data is flowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveView {
    pub sweep: Segment,
    pub sweep_width: f32,
    pub trail: Vec<TrailSegment>,
    pub targets: Vec<TargetMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSignalView {
    pub message: String,
    pub message_visible: bool,
    pub anchor: ScreenPoint,
}

/// What the renderer draws this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scene {
    Live(LiveView),
    NoSignal(NoSignalView),
}

impl Scene {
    pub fn build(
        display: &DisplayConfig,
        detections: &DetectionStore,
        sweep: &SweepState,
        signal_active: bool,
        elapsed: Duration,
    ) -> Self {
        if !signal_active {
            return Scene::NoSignal(NoSignalView {
                message: NO_SIGNAL_MESSAGE.to_string(),
                message_visible: blink_visible(elapsed),
                anchor: ScreenPoint::new(display.width / 2.0, display.height / 2.0),
            });
        }

        let projector = PolarProjector::from_display(display);
        let center = projector.center;

        let trail = sweep
            .trail_for(display)
            .into_iter()
            .map(|step| TrailSegment {
                segment: Segment::new(center, projector.rim(step.angle)),
                alpha: step.opacity * TRAIL_PEAK_ALPHA,
            })
            .collect();

        let targets = detections
            .targets_within(display.max_range_cm)
            .map(|detection| TargetMarker {
                detection,
                center: projector.project(detection.angle as f32, detection.distance as f32),
                radius: display.dot_radius,
            })
            .collect();

        Scene::Live(LiveView {
            sweep: Segment::new(center, projector.rim(sweep.current_angle() as f32)),
            sweep_width: display.sweep_width,
            trail,
            targets,
        })
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Scene::Live(_))
    }
}

/// Alert text blinks at 1 Hz: shown for the first half of every second.
pub fn blink_visible(elapsed: Duration) -> bool {
    (elapsed.as_millis() / 500) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_signal_shows_alert() {
        let display = DisplayConfig::default();
        let scene = Scene::build(
            &display,
            &DetectionStore::new(),
            &SweepState::new(),
            false,
            Duration::from_millis(100),
        );
        match scene {
            Scene::NoSignal(view) => {
                assert!(view.message_visible);
                assert_eq!(view.message, NO_SIGNAL_MESSAGE);
                assert_eq!(view.anchor, ScreenPoint::new(700.0, 350.0));
            }
            Scene::Live(_) => panic!("expected no-signal view"),
        }
    }

    #[test]
    fn alert_blinks_every_half_second() {
        assert!(blink_visible(Duration::ZERO));
        assert!(blink_visible(Duration::from_millis(499)));
        assert!(!blink_visible(Duration::from_millis(500)));
        assert!(!blink_visible(Duration::from_millis(999)));
        assert!(blink_visible(Duration::from_millis(1000)));
    }

    #[test]
    fn live_scene_hides_out_of_range_targets() {
        let display = DisplayConfig::default();
        let mut store = DetectionStore::new();
        store.upsert(0, 25);
        store.upsert(30, 80);
        let mut sweep = SweepState::new();
        sweep.observe(10);

        let Scene::Live(view) = Scene::build(&display, &store, &sweep, true, Duration::ZERO)
        else {
            panic!("expected live view");
        };

        assert_eq!(view.targets.len(), 1);
        let marker = view.targets[0];
        assert_eq!(marker.detection.angle, 0);
        assert!((marker.center.x - display.center.x).abs() < 1e-3);
        assert!((marker.center.y - (display.center.y - 230.0)).abs() < 1e-3);
        assert_eq!(marker.radius, display.dot_radius);

        assert_eq!(view.trail.len(), display.trail_steps);
        assert!((view.trail[0].alpha - TRAIL_PEAK_ALPHA).abs() < 1e-6);
        assert_eq!(view.sweep.to, view.trail[0].segment.to);
    }
}
