use crate::prelude::{LinkTransport, TransportOpener};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, ErrorKind, Read};
use std::time::Duration;

/// Longest line accepted before the stream is considered out of sync.
const MAX_LINE_BYTES: usize = 64;

/// Serial port connection backed by the `serialport` crate.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl LinkTransport for SerialTransport {
    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::with_capacity(16);
        let mut byte = [0u8; 1];
        loop {
            // times out with `TimedOut` once the port's read timeout elapses
            self.port.read_exact(&mut byte)?;
            line.push(byte[0]);
            if byte[0] == b'\n' {
                return Ok(line);
            }
            if line.len() >= MAX_LINE_BYTES {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("no line terminator within {MAX_LINE_BYTES} bytes"),
                ));
            }
        }
    }
}

/// Opens physical serial ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialOpener;

impl TransportOpener for SerialOpener {
    type Transport = SerialTransport;

    fn open(&mut self, port: &str, baud: u32, timeout: Duration) -> io::Result<SerialTransport> {
        let serial = serialport::new(port, baud).timeout(timeout).open()?;
        // stale bytes from before the connection would desync framing
        serial.clear(ClearBuffer::Input)?;
        Ok(SerialTransport::new(serial))
    }
}

/// Names of the serial ports currently visible to the OS.
pub fn available_ports() -> io::Result<Vec<String>> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|info| info.port_name).collect())
}
