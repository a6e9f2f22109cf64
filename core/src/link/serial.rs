use crate::config::LinkConfig;
use crate::prelude::{
    FaultKind, LinkError, LinkResult, LinkTransport, Reading, TransportOpener,
};
use crate::protocol;
use crate::telemetry::{LinkMetrics, LogManager};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Connection lifecycle of the sensor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the sensor transport and turns it into a stream of readings.
///
/// A missing device is retried at most once per reconnect interval. Any read
/// or decode failure drops the transport so the next attempt starts from a
/// fresh connection.
pub struct SerialLink<O: TransportOpener> {
    opener: O,
    config: LinkConfig,
    transport: Option<O::Transport>,
    state: LinkState,
    last_attempt: Option<Instant>,
    last_success: Option<Instant>,
    last_fault: Option<FaultKind>,
    metrics: LinkMetrics,
    logger: LogManager,
}

impl<O: TransportOpener> SerialLink<O> {
    pub fn new(opener: O, config: LinkConfig) -> Self {
        Self {
            opener,
            config,
            transport: None,
            state: LinkState::Disconnected,
            last_attempt: None,
            last_success: None,
            last_fault: None,
            metrics: LinkMetrics::new(),
            logger: LogManager::new("serial-link"),
        }
    }

    /// Returns the next reading if one is ready, swallowing link faults.
    pub fn poll(&mut self, now: Instant) -> Option<Reading> {
        self.try_poll(now).unwrap_or(None)
    }

    /// Same as [`poll`](Self::poll) but reports the fault that tore the link down.
    pub fn try_poll(&mut self, now: Instant) -> LinkResult<Option<Reading>> {
        match self.step(now) {
            Ok(reading) => Ok(reading),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn step(&mut self, now: Instant) -> LinkResult<Option<Reading>> {
        if self.transport.is_none() {
            if !self.reconnect_due(now) {
                return Ok(None);
            }
            self.connect(now)?;
        }

        let Some(transport) = self.transport.as_mut() else {
            return Ok(None);
        };
        if transport.bytes_available().map_err(LinkError::TransportIo)? == 0 {
            return Ok(None);
        }
        let line = transport.read_line().map_err(LinkError::TransportIo)?;
        let reading = protocol::parse_bytes(&line)?;

        self.last_success = Some(now);
        self.metrics.record_reading();
        Ok(Some(reading))
    }

    fn reconnect_due(&self, now: Instant) -> bool {
        self.last_attempt
            .map(|last| now.saturating_duration_since(last) >= self.config.reconnect_interval())
            .unwrap_or(true)
    }

    fn connect(&mut self, now: Instant) -> LinkResult<()> {
        self.state = LinkState::Connecting;
        self.last_attempt = Some(now);
        let transport = self
            .opener
            .open(&self.config.port, self.config.baud, self.config.read_timeout())
            .map_err(|source| LinkError::TransportOpen {
                port: self.config.port.clone(),
                source,
            })?;

        self.transport = Some(transport);
        self.state = LinkState::Connected;
        self.metrics.record_connect();
        self.logger.record(&format!(
            "connected to {} at {} baud",
            self.config.port, self.config.baud
        ));
        Ok(())
    }

    fn fail(&mut self, err: &LinkError) {
        let kind = err.kind();
        match kind {
            FaultKind::TransportOpen => self.logger.trace(&err.to_string()),
            FaultKind::Decode => self.logger.trace(&format!("dropping link: {err}")),
            FaultKind::TransportIo => self.logger.record(&format!("link lost: {err}")),
        }
        self.transport = None;
        self.state = LinkState::Disconnected;
        self.last_fault = Some(kind);
        self.metrics.record_fault(kind);
    }

    /// Releases the transport; the next poll reconnects on schedule.
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            self.logger.record(&format!("released {}", self.config.port));
        }
        self.state = LinkState::Disconnected;
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    pub fn last_fault(&self) -> Option<FaultKind> {
        self.last_fault
    }

    pub fn metrics(&self) -> LinkMetrics {
        self.metrics
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }
}
