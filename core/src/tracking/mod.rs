pub mod detections;
pub mod signal;
pub mod sweep;

pub use detections::{Detection, DetectionStore};
pub use signal::SignalMonitor;
pub use sweep::{SweepDirection, SweepState, TrailStep};
