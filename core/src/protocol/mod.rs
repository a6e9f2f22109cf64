//! Line protocol spoken by the rangefinder: `"<angle:0..180>,<distance-cm|->\n"`.

pub mod line;

pub use line::{encode, parse, parse_bytes, NO_ECHO};
