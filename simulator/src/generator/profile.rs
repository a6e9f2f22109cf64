use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sonarcore::prelude::{Reading, ANGLE_OFFSET, RAW_ANGLE_MAX, RAW_ANGLE_MIN};
use sonarcore::protocol;

/// Obstacle occupying a slice of the field of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// First sweep angle covered, degrees in `-90..=90`.
    pub from_angle: i32,
    /// Last sweep angle covered, inclusive.
    pub to_angle: i32,
    pub distance_cm: u32,
}

impl TargetSpec {
    fn covers(&self, angle: i32) -> bool {
        let (low, high) = if self.from_angle <= self.to_angle {
            (self.from_angle, self.to_angle)
        } else {
            (self.to_angle, self.from_angle)
        };
        (low..=high).contains(&angle)
    }
}

/// Configuration for the emulated sensor head.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepProfile {
    /// Servo step between readings, degrees.
    pub step_deg: u32,
    /// Delay between emitted lines when streaming.
    pub line_interval_ms: u64,
    /// Uniform jitter applied to echo distances.
    pub noise_cm: f32,
    pub seed: u64,
    pub targets: Vec<TargetSpec>,
    pub description: Option<String>,
}

impl Default for SweepProfile {
    fn default() -> Self {
        Self {
            step_deg: 1,
            line_interval_ms: 20,
            noise_cm: 1.0,
            seed: 0,
            targets: vec![
                TargetSpec {
                    from_angle: -40,
                    to_angle: -25,
                    distance_cm: 30,
                },
                TargetSpec {
                    from_angle: 15,
                    to_angle: 35,
                    distance_cm: 22,
                },
            ],
            description: None,
        }
    }
}

/// Endless back-and-forth sweep over the servo range.
pub struct SweepGenerator {
    profile: SweepProfile,
    rng: StdRng,
    raw_angle: i32,
    step: i32,
}

impl SweepGenerator {
    pub fn new(profile: SweepProfile) -> Self {
        let rng = StdRng::seed_from_u64(profile.seed);
        let step = profile.step_deg.max(1) as i32;
        Self {
            profile,
            rng,
            raw_angle: RAW_ANGLE_MIN,
            step,
        }
    }

    pub fn profile(&self) -> &SweepProfile {
        &self.profile
    }

    fn echo_at(&mut self, angle: i32) -> Option<u32> {
        let target = self.profile.targets.iter().find(|t| t.covers(angle))?;
        let base = target.distance_cm as f32;
        let noise = self.profile.noise_cm;
        let jitter = if noise > 0.0 {
            self.rng.gen_range(-noise..=noise)
        } else {
            0.0
        };
        Some((base + jitter).round().max(0.0) as u32)
    }

    fn advance(&mut self) {
        let next = self.raw_angle + self.step;
        if !(RAW_ANGLE_MIN..=RAW_ANGLE_MAX).contains(&next) {
            self.step = -self.step;
            self.raw_angle = (self.raw_angle + self.step).clamp(RAW_ANGLE_MIN, RAW_ANGLE_MAX);
        } else {
            self.raw_angle = next;
        }
    }

    /// Wire line for the next reading.
    pub fn next_line(&mut self) -> String {
        let reading = self.next_reading();
        protocol::encode(&reading)
    }

    pub fn next_reading(&mut self) -> Reading {
        let angle = self.raw_angle - ANGLE_OFFSET;
        let distance = self.echo_at(angle);
        self.advance();
        Reading { angle, distance }
    }
}

impl Iterator for SweepGenerator {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        Some(self.next_reading())
    }
}

pub fn build_lines(profile: &SweepProfile, count: usize) -> Vec<String> {
    let mut generator = SweepGenerator::new(profile.clone());
    (0..count).map(|_| generator.next_line()).collect()
}
