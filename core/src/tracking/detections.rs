use crate::prelude::Reading;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last reported echo at one sweep angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub angle: i32,
    pub distance: u32,
}

/// Last-known distance per sweep angle.
///
/// Entries never expire; they are replaced by a newer echo or removed by a
/// no-echo reading at the same angle. Out-of-range distances are kept as
/// reported and filtered when drawn.
#[derive(Debug, Clone, Default)]
pub struct DetectionStore {
    entries: HashMap<i32, u32>,
}

impl DetectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, angle: i32, distance: u32) {
        self.entries.insert(angle, distance);
    }

    pub fn clear(&mut self, angle: i32) {
        self.entries.remove(&angle);
    }

    /// Upserts on an echo, clears on a no-echo.
    pub fn apply(&mut self, reading: &Reading) {
        match reading.distance {
            Some(distance) => self.upsert(reading.angle, distance),
            None => self.clear(reading.angle),
        }
    }

    pub fn get(&self, angle: i32) -> Option<u32> {
        self.entries.get(&angle).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Detection> + '_ {
        self.entries
            .iter()
            .map(|(&angle, &distance)| Detection { angle, distance })
    }

    /// Copy of every entry. Order is unspecified.
    pub fn snapshot(&self) -> Vec<Detection> {
        self.iter().collect()
    }

    /// Entries whose distance is within `max_range` centimetres.
    pub fn targets_within(&self, max_range: u32) -> impl Iterator<Item = Detection> + '_ {
        self.iter().filter(move |d| d.distance <= max_range)
    }
}
