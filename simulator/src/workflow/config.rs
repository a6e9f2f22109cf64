use crate::generator::profile::SweepProfile;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sonarcore::SonarConfig;
use std::fs;
use std::path::Path;

/// Offline replay settings: what the emulated sensor sends and how the
/// display loop is clocked.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub lines: usize,
    pub frame_ms: u64,
    /// Replace every Nth line with garbage to exercise reconnects.
    pub corrupt_every: Option<usize>,
    pub profile: SweepProfile,
    pub sonar: SonarConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            lines: 361,
            frame_ms: 16,
            corrupt_every: None,
            profile: SweepProfile::default(),
            sonar: SonarConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .sonar
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(lines: usize, profile: SweepProfile, sonar: SonarConfig) -> Self {
        Self {
            lines,
            profile,
            sonar,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_frame_defaults() {
        let cfg = WorkflowConfig::from_args(10, SweepProfile::default(), SonarConfig::default());
        assert_eq!(cfg.lines, 10);
        assert_eq!(cfg.frame_ms, 16);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"lines: 90\ncorrupt_every: 30\nprofile:\n  step_deg: 2\nsonar:\n  link:\n    port: sim0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.lines, 90);
        assert_eq!(cfg.corrupt_every, Some(30));
        assert_eq!(cfg.profile.step_deg, 2);
        assert_eq!(cfg.sonar.link.port, "sim0");
    }

    #[test]
    fn invalid_sonar_section_is_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"sonar:\n  display:\n    ring_step_cm: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
