// Renders a run to stdout, either as progress lines or as one JSON document.
use crate::config::{OutputFormat, PortParameters};
use crate::error::Result;
use crate::hex_codec;
use crate::port::collector::ChunkRead;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;

/// Everything known about a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub port: PortParameters,
    pub started_at: DateTime<Local>,
    pub bytes_written: usize,
    pub write_started_ms: u64,
    pub write_finished_ms: u64,
    pub chunks: Vec<ChunkRead>,
    pub response_len: usize,
    /// Uppercase hex of the whole response.
    pub response: String,
}

pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Reporter<W> {
        Reporter { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn port_opened(&mut self, port_name: &str) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Opened serial port {}", port_name)?;
        }
        Ok(())
    }

    pub fn bytes_written(&mut self, count: usize) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Written {} byte(s)", count)?;
        }
        Ok(())
    }

    /// Progress line for one read chunk, written while collection goes on.
    pub fn chunk_read(&mut self, chunk: &ChunkRead) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(
                self.out,
                "{} bytes read. Started at {} ms, finished at {} ms",
                chunk.bytes, chunk.started_ms, chunk.finished_ms
            )?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn finish(&mut self, summary: &Summary) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "Response: {}", summary.response)?;
                writeln!(
                    self.out,
                    "Start: {}",
                    summary.started_at.format("%H:%M:%S%.3f")
                )?;
                writeln!(self.out, "WriteStart: {} ms", summary.write_started_ms)?;
                writeln!(self.out, "WriteEnd: {} ms", summary.write_finished_ms)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, summary)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Hex dump of a response as printed after the `Response:` label.
pub fn render_response(bytes: &[u8]) -> String {
    hex_codec::encode_upper(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary() -> Summary {
        Summary {
            port: PortParameters::new("COM3"),
            started_at: Local.with_ymd_and_hms(2021, 1, 4, 12, 30, 15).unwrap(),
            bytes_written: 2,
            write_started_ms: 3,
            write_finished_ms: 5,
            chunks: vec![ChunkRead {
                requested: 65536,
                bytes: 3,
                started_ms: 5,
                finished_ms: 60,
            }],
            response_len: 3,
            response: render_response(&[0x00, 0xAB, 0xFF]),
        }
    }

    #[test]
    fn renders_uppercase_hex() {
        assert_eq!(render_response(&[0x00, 0xAB, 0xFF]), "00ABFF");
        assert_eq!(render_response(&[]), "");
    }

    #[test]
    fn text_report_lines_in_order() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Text);
        reporter.port_opened("COM3").unwrap();
        reporter.bytes_written(2).unwrap();
        let summary = summary();
        for chunk in &summary.chunks {
            reporter.chunk_read(chunk).unwrap();
        }
        reporter.finish(&summary).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Opened serial port COM3",
                "Written 2 byte(s)",
                "3 bytes read. Started at 5 ms, finished at 60 ms",
                "Response: 00ABFF",
                "Start: 12:30:15.000",
                "WriteStart: 3 ms",
                "WriteEnd: 5 ms",
            ]
        );
    }

    #[test]
    fn json_report_is_a_single_document() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Json);
        reporter.port_opened("COM3").unwrap();
        reporter.bytes_written(2).unwrap();
        let summary = summary();
        reporter.chunk_read(&summary.chunks[0]).unwrap();
        reporter.finish(&summary).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["response"], "00ABFF");
        assert_eq!(value["response_len"], 3);
        assert_eq!(value["bytes_written"], 2);
        assert_eq!(value["port"]["port_name"], "COM3");
        assert_eq!(value["chunks"][0]["finished_ms"], 60);
    }

    #[test]
    fn finish_does_not_repeat_chunk_lines() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Text);
        reporter.finish(&summary()).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!text.contains("bytes read"));
        assert!(text.starts_with("Response: 00ABFF\n"));
    }
}
