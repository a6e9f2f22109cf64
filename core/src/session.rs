use crate::config::SonarConfig;
use crate::display::Scene;
use crate::link::{SerialLink, SerialOpener};
use crate::prelude::{Reading, TransportOpener};
use crate::telemetry::LinkMetrics;
use crate::tracking::{DetectionStore, SignalMonitor, SweepState};
use std::time::{Duration, Instant};

/// Single-threaded ingestion loop state: one writer, sampled once per frame.
pub struct SonarSession<O: TransportOpener> {
    config: SonarConfig,
    link: SerialLink<O>,
    detections: DetectionStore,
    sweep: SweepState,
    signal: SignalMonitor,
    started: Instant,
}

impl SonarSession<SerialOpener> {
    /// Session reading from the physical port named in the config.
    pub fn serial(config: SonarConfig, now: Instant) -> Self {
        Self::new(config, SerialOpener, now)
    }
}

impl<O: TransportOpener> SonarSession<O> {
    pub fn new(config: SonarConfig, opener: O, now: Instant) -> Self {
        let link = SerialLink::new(opener, config.link.clone());
        let signal = SignalMonitor::new(config.signal.timeout());
        Self {
            config,
            link,
            detections: DetectionStore::new(),
            sweep: SweepState::new(),
            signal,
            started: now,
        }
    }

    /// Polls the link once and folds any reading into the model.
    pub fn tick(&mut self, now: Instant) -> Option<Reading> {
        let reading = self.link.poll(now)?;
        self.ingest(reading, now);
        Some(reading)
    }

    pub fn ingest(&mut self, reading: Reading, now: Instant) {
        self.sweep.observe(reading.angle);
        self.detections.apply(&reading);
        self.signal.record(now);
    }

    pub fn signal_active(&self, now: Instant) -> bool {
        self.signal.is_active(now)
    }

    pub fn scene(&self, now: Instant) -> Scene {
        Scene::build(
            &self.config.display,
            &self.detections,
            &self.sweep,
            self.signal_active(now),
            self.elapsed(now),
        )
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Releases the serial port.
    pub fn shutdown(&mut self) {
        self.link.disconnect();
    }

    pub fn config(&self) -> &SonarConfig {
        &self.config
    }

    pub fn link(&self) -> &SerialLink<O> {
        &self.link
    }

    pub fn detections(&self) -> &DetectionStore {
        &self.detections
    }

    pub fn sweep(&self) -> &SweepState {
        &self.sweep
    }

    pub fn metrics(&self) -> LinkMetrics {
        self.link.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{LinkState, ScriptEvent, ScriptedOpener};
    use crate::tracking::SweepDirection;
    use std::io::ErrorKind;

    #[test]
    fn three_line_sweep_scenario() {
        let opener = ScriptedOpener::new().session(vec![
            ScriptEvent::line("90,30"),
            ScriptEvent::line("95,-"),
            ScriptEvent::line("100,25"),
        ]);
        let start = Instant::now();
        let mut session = SonarSession::new(SonarConfig::default(), opener, start);

        // one reading per frame, like the operator display
        for frame in 0..3u64 {
            let now = start + Duration::from_millis(16 * frame);
            assert!(session.tick(now).is_some());
        }
        let mut snapshot = session.detections().snapshot();
        snapshot.sort_by_key(|d| d.angle);
        let pairs: Vec<(i32, u32)> = snapshot.iter().map(|d| (d.angle, d.distance)).collect();
        assert_eq!(pairs, vec![(0, 30), (10, 25)]);
        assert_eq!(session.sweep().current_angle(), 10);
        assert_eq!(session.sweep().direction(), SweepDirection::Increasing);
        assert!(session.signal_active(start + Duration::from_millis(40)));
        assert!(session.scene(start + Duration::from_millis(40)).is_live());
    }

    #[test]
    fn no_echo_clears_previous_target() {
        let opener = ScriptedOpener::new().session(vec![
            ScriptEvent::line("95,17"),
            ScriptEvent::line("95,-"),
        ]);
        let start = Instant::now();
        let mut session = SonarSession::new(SonarConfig::default(), opener, start);
        session.tick(start);
        assert_eq!(session.detections().get(5), Some(17));
        session.tick(start);
        assert_eq!(session.detections().get(5), None);
    }

    #[test]
    fn absent_device_is_retried_once_per_interval() {
        let opener = ScriptedOpener::new()
            .fail_open(ErrorKind::NotFound)
            .fail_open(ErrorKind::PermissionDenied)
            .fail_open(ErrorKind::NotFound);
        let config = SonarConfig::default();
        let interval = config.link.reconnect_interval();
        let start = Instant::now();
        let mut session = SonarSession::new(config, opener, start);

        // ~60 fps for just under three reconnect intervals
        let frame = Duration::from_millis(16);
        let mut now = start;
        while now < start + interval * 3 {
            assert_eq!(session.tick(now), None);
            assert_eq!(session.link().state(), LinkState::Disconnected);
            assert!(!session.signal_active(now));
            assert!(!session.scene(now).is_live());

            let elapsed = now - start;
            let allowed = (elapsed.as_millis() / interval.as_millis()) as usize + 1;
            assert!(session.link().opener().attempts() <= allowed);
            now += frame;
        }

        assert_eq!(session.link().opener().attempts(), 3);
        assert_eq!(session.metrics().open_failures, 3);
        assert_eq!(session.metrics().readings, 0);
    }

    #[test]
    fn signal_lapses_after_timeout() {
        let opener = ScriptedOpener::new().session(vec![ScriptEvent::line("120,44")]);
        let start = Instant::now();
        let mut session = SonarSession::new(SonarConfig::default(), opener, start);
        session.tick(start);

        assert!(session.signal_active(start + Duration::from_millis(999)));
        assert!(!session.signal_active(start + Duration::from_secs(1)));
        // the last-known target survives the outage
        assert_eq!(session.detections().get(30), Some(44));
    }

    #[test]
    fn shutdown_releases_link() {
        let opener = ScriptedOpener::new().session(vec![ScriptEvent::Quiet]);
        let start = Instant::now();
        let mut session = SonarSession::new(SonarConfig::default(), opener, start);
        session.tick(start);
        assert!(session.link().is_connected());
        session.shutdown();
        assert!(!session.link().is_connected());
    }
}
