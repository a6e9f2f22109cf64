use crate::config::DisplayConfig;
use crate::math::polar::{PolarProjector, ScreenPoint};
use crate::prelude::{ANGLE_MAX, ANGLE_MIN};
use serde::{Deserialize, Serialize};

const RING_ARC_STEP_DEG: usize = 2;
const GRID_STEP_DEG: usize = 30;
const ANGLE_TICK_STEP_DEG: usize = 5;
const MAJOR_TICK_DEG: i32 = 10;
const MAJOR_TICK_HALF_LEN: f32 = 18.0;
const MINOR_TICK_HALF_LEN: f32 = 10.0;
const ANGLE_LABEL_OFFSET: f32 = 45.0;
const DISTANCE_TICK_HALF_LEN: f32 = 14.0;
const DISTANCE_LABEL_GAP: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

impl Segment {
    pub fn new(from: ScreenPoint, to: ScreenPoint) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: ScreenPoint,
}

/// Half ring at a fixed distance, as a polyline from -90° to +90°.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRing {
    pub distance_cm: u32,
    /// The outermost ring, drawn brighter.
    pub major: bool,
    pub points: Vec<ScreenPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub segment: Segment,
    pub major: bool,
    pub label: Option<Label>,
}

/// Static scope furniture; depends only on the display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeLayout {
    pub rings: Vec<RangeRing>,
    pub baseline: Segment,
    pub distance_ticks: Vec<Tick>,
    pub grid: Vec<Segment>,
    pub angle_ticks: Vec<Tick>,
}

impl ScopeLayout {
    pub fn build(display: &DisplayConfig) -> Self {
        let projector = PolarProjector::from_display(display);
        let ring_count = display.max_range_cm / display.ring_step_cm;

        let rings = (1..=ring_count)
            .map(|i| {
                let distance_cm = i * display.ring_step_cm;
                RangeRing {
                    distance_cm,
                    major: distance_cm == display.max_range_cm,
                    points: field_angles(RING_ARC_STEP_DEG)
                        .map(|a| projector.project(a as f32, distance_cm as f32))
                        .collect(),
                }
            })
            .collect();

        let baseline = Segment::new(
            projector.rim(ANGLE_MIN as f32),
            projector.rim(ANGLE_MAX as f32),
        );

        let distance_ticks = (0..=ring_count)
            .flat_map(|i| {
                let distance_cm = i * display.ring_step_cm;
                [ANGLE_MIN, ANGLE_MAX].map(|side| {
                    let foot = projector.project(side as f32, distance_cm as f32);
                    Tick {
                        segment: Segment::new(
                            ScreenPoint::new(foot.x, foot.y - DISTANCE_TICK_HALF_LEN),
                            ScreenPoint::new(foot.x, foot.y + DISTANCE_TICK_HALF_LEN),
                        ),
                        major: true,
                        label: Some(Label {
                            text: format!("{distance_cm}cm"),
                            anchor: ScreenPoint::new(foot.x, foot.y + DISTANCE_LABEL_GAP),
                        }),
                    }
                })
            })
            .collect();

        let grid = field_angles(GRID_STEP_DEG)
            .map(|a| Segment::new(projector.center, projector.rim(a as f32)))
            .collect();

        let angle_ticks = field_angles(ANGLE_TICK_STEP_DEG)
            .map(|a| {
                let major = a % MAJOR_TICK_DEG == 0;
                let half = if major {
                    MAJOR_TICK_HALF_LEN
                } else {
                    MINOR_TICK_HALF_LEN
                };
                let angle = a as f32;
                Tick {
                    segment: Segment::new(
                        projector.project_pixels(angle, display.radius - half),
                        projector.project_pixels(angle, display.radius + half),
                    ),
                    major,
                    label: major.then(|| Label {
                        text: format!("{}°", a.abs()),
                        anchor: projector
                            .project_pixels(angle, display.radius + ANGLE_LABEL_OFFSET),
                    }),
                }
            })
            .collect();

        Self {
            rings,
            baseline,
            distance_ticks,
            grid,
            angle_ticks,
        }
    }
}

fn field_angles(step: usize) -> impl Iterator<Item = i32> {
    (ANGLE_MIN..=ANGLE_MAX).step_by(step)
}
