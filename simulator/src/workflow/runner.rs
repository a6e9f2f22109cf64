use crate::generator::profile::build_lines;
use crate::workflow::config::WorkflowConfig;
use serde::Serialize;
use sonarcore::link::{ScriptEvent, ScriptedOpener};
use sonarcore::telemetry::LinkMetrics;
use sonarcore::tracking::{Detection, SweepDirection};
use sonarcore::SonarSession;
use std::time::{Duration, Instant};

const CORRUPT_LINE: &str = "#!garbage";

/// Outcome of one offline replay.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub frames: usize,
    pub elapsed_ms: u128,
    pub detections: Vec<Detection>,
    pub final_angle: i32,
    pub direction: SweepDirection,
    pub signal_active: bool,
    pub metrics: LinkMetrics,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Splits the line stream into connections; a corrupt line ends its
    /// connection because the display drops the link on it.
    fn build_opener(&self) -> ScriptedOpener {
        let lines = build_lines(&self.config.profile, self.config.lines);
        let mut opener = ScriptedOpener::new();
        let mut current = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let corrupt = self
                .config
                .corrupt_every
                .map(|n| n > 0 && (index + 1) % n == 0)
                .unwrap_or(false);
            if corrupt {
                current.push(ScriptEvent::line(CORRUPT_LINE));
                opener = opener.session(std::mem::take(&mut current));
            } else {
                current.push(ScriptEvent::Line(line.clone().into_bytes()));
            }
        }
        opener.session(current)
    }

    /// Replays the configured sweep against the core with a synthetic clock.
    ///
    /// Runs until every scripted connection is drained, then one more
    /// reconnect interval so the final state reflects a quiet link.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let frame = Duration::from_millis(self.config.frame_ms.max(1));
        let start = Instant::now();
        let mut session = SonarSession::new(self.config.sonar.clone(), self.build_opener(), start);

        let expected = self.config.lines;
        let patience = self.config.sonar.link.reconnect_interval() + frame;
        let mut now = start;
        let mut frames = 0usize;
        let mut last_progress = start;

        loop {
            frames += 1;
            let before = session.metrics();
            if session.tick(now).is_some() {
                last_progress = now;
            }
            let after = session.metrics();
            if after.connects != before.connects || after.disconnects() != before.disconnects() {
                last_progress = now;
            }

            let handled = after.readings + after.decode_faults;
            if handled >= expected && now.saturating_duration_since(last_progress) >= patience {
                break;
            }
            if now.saturating_duration_since(last_progress) > patience * 2 {
                anyhow::bail!(
                    "replay stalled after {} of {} lines",
                    handled,
                    expected
                );
            }
            now += frame;
        }

        let result = WorkflowResult {
            frames,
            elapsed_ms: session.elapsed(now).as_millis(),
            detections: session.detections().snapshot(),
            final_angle: session.sweep().current_angle(),
            direction: session.sweep().direction(),
            signal_active: session.signal_active(now),
            metrics: session.metrics(),
        };
        session.shutdown();
        Ok(result)
    }
}
