//! Screen-space description of the scope; drawing itself is left to the caller.

pub mod layout;
pub mod scene;

pub use layout::{Label, RangeRing, ScopeLayout, Segment, Tick};
pub use scene::{blink_visible, LiveView, NoSignalView, Scene, TargetMarker, TrailSegment};
