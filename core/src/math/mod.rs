pub mod polar;

pub use polar::{to_screen, PolarProjector, ScreenPoint};
