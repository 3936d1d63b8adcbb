use std::io::{Read, Write};
use std::time::Duration;

pub mod collector;
#[cfg(test)]
pub mod fake;
pub mod channel;

/// A byte stream whose blocking calls give up after a timeout with
/// `io::ErrorKind::TimedOut`. The same timeout covers reads and writes.
pub trait TimedPort: Read + Write {
    fn set_io_timeout(&mut self, timeout: Duration) -> std::io::Result<()>;
}
