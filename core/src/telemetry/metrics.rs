use crate::prelude::FaultKind;
use serde::{Deserialize, Serialize};

/// Counters describing link health since start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetrics {
    pub readings: usize,
    pub connects: usize,
    pub open_failures: usize,
    pub io_faults: usize,
    pub decode_faults: usize,
}

impl LinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reading(&mut self) {
        self.readings += 1;
    }

    pub fn record_connect(&mut self) {
        self.connects += 1;
    }

    pub fn record_fault(&mut self, kind: FaultKind) {
        match kind {
            FaultKind::TransportOpen => self.open_failures += 1,
            FaultKind::TransportIo => self.io_faults += 1,
            FaultKind::Decode => self.decode_faults += 1,
        }
    }

    /// Faults that tore down an established connection.
    pub fn disconnects(&self) -> usize {
        self.io_faults + self.decode_faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_are_counted_by_kind() {
        let mut metrics = LinkMetrics::new();
        metrics.record_fault(FaultKind::TransportOpen);
        metrics.record_fault(FaultKind::Decode);
        metrics.record_fault(FaultKind::TransportIo);
        metrics.record_reading();
        assert_eq!(metrics.open_failures, 1);
        assert_eq!(metrics.disconnects(), 2);
        assert_eq!(metrics.readings, 1);
    }
}
