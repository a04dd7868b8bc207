//! Serial transport for the wand's USB-serial bridge.

use std::io::{ErrorKind, Read};
use std::time::Duration;

use airpoint_traits::{BoxError, LineSource};
use serialport::SerialPort;
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::LineBuffer;

const READ_CHUNK: usize = 256;

pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    name: String,
    baud: u32,
    lines: LineBuffer,
}

impl SerialLineSource {
    /// Open `port` at `baud`; every read blocks at most `timeout`.
    pub fn open(port: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let mut serial = serialport::new(port, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| HwError::SerialOpen {
                port: port.to_string(),
                reason: e.to_string(),
            })?;

        // Keep modem lines low so attaching does not reset the wand's MCU.
        let _ = serial.write_data_terminal_ready(false);
        let _ = serial.write_request_to_send(false);

        Ok(Self {
            port: serial,
            name: port.to_string(),
            baud,
            lines: LineBuffer::new(),
        })
    }

    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0u8; READ_CHUNK];
        match self.port.read(&mut chunk) {
            Ok(0) => Ok(false),
            Ok(n) => {
                trace!(bytes = n, "serial chunk");
                self.lines.push(&chunk[..n]);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                Ok(false)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(false),
            Err(e) => Err(HwError::SerialRead(e.to_string())),
        }
    }
}

impl LineSource for SerialLineSource {
    fn read_line(&mut self) -> std::result::Result<Option<Vec<u8>>, BoxError> {
        if let Some(line) = self.lines.pop_line() {
            return Ok(Some(line));
        }
        // One bounded read per call so the reader can observe its stop flag.
        self.fill()?;
        Ok(self.lines.pop_line())
    }

    fn describe(&self) -> String {
        format!("{} @ {}", self.name, self.baud)
    }
}
