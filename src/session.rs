// One write-then-listen exchange over an open channel.
use crate::clock::Stopwatch;
use crate::config::Configuration;
use crate::error::Result;
use crate::port::channel::SerialChannel;
use crate::port::collector::ResponseCollector;
use crate::port::TimedPort;
use crate::report::{self, Reporter, Summary};
use chrono::{DateTime, Local};
use log::{debug, info};
use std::io::Write;

/// Sends the payload, collects the reply and reports it. The channel is
/// consumed, so the port is closed when this returns, fault or not.
pub fn run_session<P: TimedPort, W: Write>(
    mut channel: SerialChannel<P>,
    config: &Configuration,
    collector: &ResponseCollector,
    clock: &Stopwatch,
    started_at: DateTime<Local>,
    reporter: &mut Reporter<W>,
) -> Result<Summary> {
    let write_started_ms = clock.elapsed_ms();
    let bytes_written = channel.write(&config.payload)?;
    let write_finished_ms = clock.elapsed_ms();
    if bytes_written < config.payload_length() {
        info!(
            "Only {} of {} byte(s) written to {}",
            bytes_written,
            config.payload_length(),
            channel.name()
        );
    }
    reporter.bytes_written(bytes_written)?;

    let response = collector.collect(&mut channel, clock, |chunk| reporter.chunk_read(chunk))?;
    channel.close();
    debug!("Response grew {} time(s)", response.growth_events);
    if let Some(last) = response.last_chunk() {
        debug!(
            "Last chunk: {} byte(s) between {} ms and {} ms",
            last.bytes, last.started_ms, last.finished_ms
        );
    }

    let summary = Summary {
        port: config.port.clone(),
        started_at,
        bytes_written,
        write_started_ms,
        write_finished_ms,
        chunks: response.chunks,
        response_len: response.bytes.len(),
        response: report::render_response(&response.bytes),
    };
    reporter.finish(&summary)?;
    Ok(summary)
}
