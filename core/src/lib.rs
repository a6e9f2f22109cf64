//! Ingestion and sweep-state core for the Rust sonar scope.
//!
//! A rotating rangefinder streams `angle,distance` lines over a serial port.
//! The crate keeps the link alive, decodes the lines, and maintains the
//! per-angle detection memory, sweep direction and signal state that an
//! operator display samples once per frame.

pub mod config;
pub mod display;
pub mod link;
pub mod math;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod telemetry;
pub mod tracking;

pub use config::SonarConfig;
pub use prelude::{LinkTransport, Reading, TransportOpener};
pub use session::SonarSession;
