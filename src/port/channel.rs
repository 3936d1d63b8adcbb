use super::collector::ChunkSource;
use super::TimedPort;
use crate::config::{port_parameters, PortParameters, Timeouts};
use crate::error::{ProbeError, Result};
use log::{debug, info, trace};
use serial::prelude::*;
use std::io::{self, ErrorKind};
use std::time::{Duration, Instant};

impl TimedPort for serial::SystemPort {
    fn set_io_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        SerialPort::set_timeout(self, timeout).map_err(io::Error::from)
    }
}

/// Opens the named device for exclusive read/write access. Line settings
/// are only touched when some were asked for.
pub fn open_port(parameters: &PortParameters) -> Result<serial::SystemPort> {
    let port_name = &parameters.port_name;
    let mut port = serial::open(port_name).map_err(|source| ProbeError::PortOpen {
        port: port_name.clone(),
        source,
    })?;
    info!("Opened serial port {}", port_name);

    if parameters.changes_settings() {
        debug!("Applying line settings {:?}", parameters);
        port.reconfigure(&|settings: &mut dyn SerialPortSettings| {
            if let Some(baud_rate) = parameters.baud_rate {
                settings.set_baud_rate(serial::BaudRate::from_speed(baud_rate))?;
            }
            if let Some(data_bits) = parameters.data_bits {
                settings.set_char_size(port_parameters::decode_char_size(data_bits));
            }
            if let Some(parity) = parameters.parity {
                settings.set_parity(port_parameters::decode_parity(parity));
            }
            if let Some(stop_bits) = parameters.stop_bits {
                settings.set_stop_bits(port_parameters::decode_stop_bits(stop_bits));
            }
            if let Some(flow_control) = parameters.flow_control {
                settings.set_flow_control(port_parameters::decode_flow_control(flow_control));
            }
            Ok(())
        })
        .map_err(|source| ProbeError::PortConfig {
            port: port_name.clone(),
            source,
        })?;
    }
    Ok(port)
}

/// The one open connection of a run. Dropping it closes the port, so every
/// exit path releases the device exactly once.
pub struct SerialChannel<P: TimedPort> {
    port: P,
    name: String,
    timeouts: Timeouts,
}

impl<P: TimedPort> SerialChannel<P> {
    pub fn new(port: P, name: &str, timeouts: Timeouts) -> SerialChannel<P> {
        debug!(
            "Channel {}: inter-byte {:?}, read ceiling {:?}, write ceiling {:?}",
            name, timeouts.inter_byte, timeouts.read_total, timeouts.write_total
        );
        SerialChannel {
            port,
            name: name.to_string(),
            timeouts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes as much of the payload as the port takes before the write
    /// ceiling. Running out of time is not an error, the short count is
    /// returned instead.
    pub fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let deadline = Instant::now() + self.timeouts.write_total;
        let mut written = 0;
        while written < payload.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Write ceiling reached after {} byte(s)", written);
                break;
            }
            self.port
                .set_io_timeout(remaining)
                .map_err(ProbeError::WriteFault)?;
            match self.port.write(&payload[written..]) {
                Ok(0) => break,
                Ok(n) => {
                    trace!("Wrote {} byte(s) to {}", n, self.name);
                    written += n;
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => {
                    debug!("Write timed out after {} byte(s)", written);
                    break;
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ProbeError::WriteFault(e)),
            }
        }
        Ok(written)
    }

    /// Fills `buf` until the line goes quiet for longer than the inter-byte
    /// timeout, the read ceiling passes or the buffer is full. The wait for
    /// the first byte is bounded by the ceiling only. Zero bytes is a valid
    /// result.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let deadline = Instant::now() + self.timeouts.read_total;
        let mut filled = 0;
        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Read ceiling reached after {} byte(s)", filled);
                break;
            }
            let wait = if filled == 0 {
                remaining
            } else {
                self.timeouts.inter_byte.min(remaining)
            };
            self.port
                .set_io_timeout(wait)
                .map_err(ProbeError::ReadFault)?;
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    trace!("Read {} byte(s) from {}", n, self.name);
                    filled += n;
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => break,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ProbeError::ReadFault(e)),
            }
        }
        Ok(filled)
    }

    pub fn close(self) {
        drop(self);
    }
}

impl<P: TimedPort> ChunkSource for SerialChannel<P> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        SerialChannel::read_chunk(self, buf)
    }
}

impl<P: TimedPort> Drop for SerialChannel<P> {
    fn drop(&mut self) {
        info!("Closing serial port {}", self.name);
    }
}
