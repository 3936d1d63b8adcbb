use thiserror::Error;

/// Everything that can end a run early. Read and write timeouts are not
/// here: a quiet port is a normal outcome.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid hex input {input:?}: {source}")]
    InvalidHexInput {
        input: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Error in opening serial port {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: serial::Error,
    },

    #[error("Failed to configure serial port {port}: {source}")]
    PortConfig {
        port: String,
        #[source]
        source: serial::Error,
    },

    #[error("Write fault: {0}")]
    WriteFault(#[source] std::io::Error),

    #[error("Read fault: {0}")]
    ReadFault(#[source] std::io::Error),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to open log file: {0}")]
    LogFile(#[source] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
