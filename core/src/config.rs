use crate::math::polar::ScreenPoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Serial link parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
    pub port: String,
    pub baud: u32,
    pub read_timeout_ms: u64,
    pub reconnect_interval_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "COM6".into(),
            baud: 9600,
            read_timeout_ms: 100,
            reconnect_interval_ms: 2000,
        }
    }
}

impl LinkConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    pub timeout_ms: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { timeout_ms: 1000 }
    }
}

impl SignalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Screen geometry and sweep rendering constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f32,
    pub height: f32,
    pub center: ScreenPoint,
    pub radius: f32,
    pub max_range_cm: u32,
    pub ring_step_cm: u32,
    pub trail_span_deg: f32,
    pub trail_steps: usize,
    pub sweep_width: f32,
    pub dot_radius: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let width = 1400.0;
        let height = 700.0;
        Self {
            width,
            height,
            center: ScreenPoint::new(width / 2.0, height - 80.0),
            radius: 460.0,
            max_range_cm: 50,
            ring_step_cm: 10,
            trail_span_deg: 20.0,
            trail_steps: 100,
            sweep_width: 5.0,
            dot_radius: 20.0,
        }
    }
}

/// Complete configuration, fixed at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SonarConfig {
    pub link: LinkConfig,
    pub signal: SignalConfig,
    pub display: DisplayConfig,
}

impl SonarConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: SonarConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        if self.link.baud == 0 {
            return Err(ConfigError::Invalid("link.baud must be positive".into()));
        }
        if display.max_range_cm == 0 {
            return Err(ConfigError::Invalid(
                "display.max_range_cm must be positive".into(),
            ));
        }
        if display.ring_step_cm == 0 {
            return Err(ConfigError::Invalid(
                "display.ring_step_cm must be positive".into(),
            ));
        }
        if display.trail_steps == 0 {
            return Err(ConfigError::Invalid(
                "display.trail_steps must be positive".into(),
            ));
        }
        if display.radius.is_nan() || display.radius <= 0.0 {
            return Err(ConfigError::Invalid("display.radius must be positive".into()));
        }
        Ok(())
    }
}
