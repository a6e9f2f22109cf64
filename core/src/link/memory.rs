use crate::prelude::{LinkTransport, TransportOpener};
use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::time::Duration;

/// One scripted event on an in-memory connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// Raw bytes delivered as one line.
    Line(Vec<u8>),
    /// One poll with nothing to read.
    Quiet,
    /// The transport reports an I/O error.
    Fault(ErrorKind),
}

impl ScriptEvent {
    /// A text line; the newline terminator is appended.
    pub fn line(text: &str) -> Self {
        ScriptEvent::Line(format!("{text}\n").into_bytes())
    }
}

/// Transport that replays a fixed script and then stays quiet.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    events: VecDeque<ScriptEvent>,
}

impl MemoryTransport {
    pub fn new(events: impl IntoIterator<Item = ScriptEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl LinkTransport for MemoryTransport {
    fn bytes_available(&mut self) -> io::Result<usize> {
        match self.events.front() {
            Some(ScriptEvent::Line(bytes)) => Ok(bytes.len()),
            Some(ScriptEvent::Quiet) => {
                self.events.pop_front();
                Ok(0)
            }
            Some(ScriptEvent::Fault(kind)) => {
                let kind = *kind;
                self.events.pop_front();
                Err(io::Error::new(kind, "scripted transport fault"))
            }
            None => Ok(0),
        }
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        match self.events.pop_front() {
            Some(ScriptEvent::Line(bytes)) => Ok(bytes),
            Some(ScriptEvent::Fault(kind)) => {
                Err(io::Error::new(kind, "scripted transport fault"))
            }
            _ => Err(io::Error::new(ErrorKind::TimedOut, "no line before timeout")),
        }
    }
}

/// Opener that hands out scripted connections in order.
///
/// Each queued entry is either a connection script or an open failure. Once
/// the queue is empty every further attempt fails with `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedOpener {
    sessions: VecDeque<Result<Vec<ScriptEvent>, ErrorKind>>,
    attempts: usize,
}

impl ScriptedOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(mut self, events: Vec<ScriptEvent>) -> Self {
        self.sessions.push_back(Ok(events));
        self
    }

    pub fn fail_open(mut self, kind: ErrorKind) -> Self {
        self.sessions.push_back(Err(kind));
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl TransportOpener for ScriptedOpener {
    type Transport = MemoryTransport;

    fn open(&mut self, port: &str, _baud: u32, _timeout: Duration) -> io::Result<MemoryTransport> {
        self.attempts += 1;
        match self.sessions.pop_front() {
            Some(Ok(events)) => Ok(MemoryTransport::new(events)),
            Some(Err(kind)) => Err(io::Error::new(kind, format!("{port} unavailable"))),
            None => Err(io::Error::new(ErrorKind::NotFound, format!("{port} not present"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_replays_then_goes_quiet() {
        let mut transport =
            MemoryTransport::new(vec![ScriptEvent::Quiet, ScriptEvent::line("1,2")]);
        assert_eq!(transport.bytes_available().unwrap(), 0);
        assert_eq!(transport.bytes_available().unwrap(), 4);
        assert_eq!(transport.read_line().unwrap(), b"1,2\n".to_vec());
        assert_eq!(transport.bytes_available().unwrap(), 0);
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn opener_fails_once_script_is_exhausted() {
        let mut opener = ScriptedOpener::new().session(Vec::new());
        assert!(opener.open("sim", 9600, Duration::ZERO).is_ok());
        let err = opener.open("sim", 9600, Duration::ZERO).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(opener.attempts(), 2);
    }
}
