use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;

/// Lowest raw angle reported by the sensor servo.
pub const RAW_ANGLE_MIN: i32 = 0;
/// Highest raw angle reported by the sensor servo.
pub const RAW_ANGLE_MAX: i32 = 180;
/// Offset that re-centres raw sensor angles so that 0 points straight ahead.
pub const ANGLE_OFFSET: i32 = 90;
/// Leftmost sweep angle after re-centring.
pub const ANGLE_MIN: i32 = RAW_ANGLE_MIN - ANGLE_OFFSET;
/// Rightmost sweep angle after re-centring.
pub const ANGLE_MAX: i32 = RAW_ANGLE_MAX - ANGLE_OFFSET;

/// One decoded sensor line: the sweep angle and the echo distance, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Sweep angle in degrees, `ANGLE_MIN..=ANGLE_MAX`.
    pub angle: i32,
    /// Echo distance in centimetres; `None` means no echo at this angle.
    pub distance: Option<u32>,
}

impl Reading {
    pub fn echo(angle: i32, distance: u32) -> Self {
        Self {
            angle,
            distance: Some(distance),
        }
    }

    pub fn no_echo(angle: i32) -> Self {
        Self {
            angle,
            distance: None,
        }
    }
}

/// Reasons a line from the sensor is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line is not valid utf-8")]
    InvalidUtf8,
    #[error("expected 2 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid angle field {0:?}")]
    InvalidAngle(String),
    #[error("angle {0} outside sensor range 0..=180")]
    AngleOutOfRange(i32),
    #[error("invalid distance field {0:?}")]
    InvalidDistance(String),
}

/// Failures raised while driving the serial link.
///
/// Every variant maps to the same recovery (drop the transport and reconnect
/// later); the variants stay separate so callers and tests can tell them apart.
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("cannot open {port}: {source}")]
    TransportOpen {
        port: String,
        #[source]
        source: io::Error,
    },
    #[error("transport i/o failure: {0}")]
    TransportIo(#[source] io::Error),
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),
}

/// Coarse classification of the most recent link fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    TransportOpen,
    TransportIo,
    Decode,
}

impl LinkError {
    pub fn kind(&self) -> FaultKind {
        match self {
            LinkError::TransportOpen { .. } => FaultKind::TransportOpen,
            LinkError::TransportIo(_) => FaultKind::TransportIo,
            LinkError::Decode(_) => FaultKind::Decode,
        }
    }
}

pub type LinkResult<T> = Result<T, LinkError>;

/// Byte-oriented connection to the sensor.
pub trait LinkTransport {
    /// Number of bytes that can be read without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;
    /// Reads up to and including the next `\n`, bounded by the read timeout.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;
}

/// Factory for transports; each call is one connection attempt.
pub trait TransportOpener {
    type Transport: LinkTransport;

    fn open(&mut self, port: &str, baud: u32, timeout: Duration) -> io::Result<Self::Transport>;
}
