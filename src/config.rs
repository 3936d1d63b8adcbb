// Run configuration, built once from the command line and read-only afterwards.
use std::time::Duration;

pub mod port_parameters;

pub use port_parameters::PortParameters;

/// Upper bound on a single read chunk, however steadily bytes trickle in.
pub const DEFAULT_READ_CEILING_MS: u64 = 10_000;
/// Upper bound on writing the payload.
pub const DEFAULT_WRITE_CEILING_MS: u64 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Longest allowed gap between two received bytes.
    pub inter_byte: Duration,
    pub read_total: Duration,
    pub write_total: Duration,
}

impl Timeouts {
    pub fn from_millis(inter_byte_ms: u64, read_total_ms: u64, write_total_ms: u64) -> Timeouts {
        Timeouts {
            inter_byte: Duration::from_millis(inter_byte_ms),
            read_total: Duration::from_millis(read_total_ms),
            write_total: Duration::from_millis(write_total_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub port: PortParameters,
    pub payload: Vec<u8>,
    pub timeouts: Timeouts,
    pub output: OutputFormat,
}

impl Configuration {
    pub fn payload_length(&self) -> usize {
        self.payload.len()
    }
}
