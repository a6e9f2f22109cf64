use std::time::{Duration, Instant};

/// Tracks when the last good reading arrived.
#[derive(Debug, Clone)]
pub struct SignalMonitor {
    timeout: Duration,
    last_success: Option<Instant>,
}

impl SignalMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_success: None,
        }
    }

    pub fn record(&mut self, now: Instant) {
        self.last_success = Some(now);
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    /// True while less than the timeout has passed since the last reading.
    pub fn is_active(&self, now: Instant) -> bool {
        self.last_success
            .map(|last| now.saturating_duration_since(last) < self.timeout)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_before_first_reading() {
        let monitor = SignalMonitor::new(Duration::from_secs(1));
        assert!(!monitor.is_active(Instant::now()));
    }

    #[test]
    fn active_until_timeout_elapses() {
        let start = Instant::now();
        let mut monitor = SignalMonitor::new(Duration::from_secs(1));
        monitor.record(start);

        assert!(monitor.is_active(start));
        for millis in [1, 250, 500, 999] {
            assert!(monitor.is_active(start + Duration::from_millis(millis)));
        }
        assert!(!monitor.is_active(start + Duration::from_secs(1)));
        assert!(!monitor.is_active(start + Duration::from_millis(1500)));
    }

    #[test]
    fn new_reading_rearms_monitor() {
        let start = Instant::now();
        let mut monitor = SignalMonitor::new(Duration::from_millis(200));
        monitor.record(start);
        monitor.record(start + Duration::from_millis(150));
        assert!(monitor.is_active(start + Duration::from_millis(300)));
    }
}
