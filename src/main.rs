use chrono::{DateTime, Local};
use clap::{CommandFactory, Parser};
use log::{error, info, trace};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

mod clock;
mod config;
mod error;
mod hex_codec;
mod port;
mod report;
mod session;

use config::port_parameters::{DataBits, FlowControl, Parity, StopBits};
use config::{Configuration, OutputFormat, PortParameters, Timeouts};
use error::ProbeError;

const USAGE_EXIT_CODE: i32 = 2;
const FAILURE_EXIT_CODE: i32 = 1;

/// Writes a hex payload to a serial port and prints whatever comes back
/// before the line goes quiet.
#[derive(Parser, Debug)]
#[command(version, about, args_override_self = true)]
struct Cli {
    /// Inter-byte timeout in ms: reading stops once the line is quiet this long
    #[arg(short = 't', value_name = "TIMEOUT_MS")]
    timeout: u64,

    /// Serial port name, e.g. COM3 or /dev/ttyUSB0
    #[arg(short = 'p', value_name = "PORT")]
    port: String,

    /// Payload to send as hex digits, e.g. 00ABC8DF
    #[arg(short = 'w', value_name = "HEX", value_parser = hex_codec::parse_payload)]
    payload: hex_codec::Payload,

    /// Baud rate to set on the port
    #[arg(long)]
    baud: Option<usize>,

    #[arg(long, value_enum)]
    data_bits: Option<DataBits>,

    #[arg(long, value_enum)]
    parity: Option<Parity>,

    #[arg(long, value_enum)]
    stop_bits: Option<StopBits>,

    #[arg(long, value_enum)]
    flow_control: Option<FlowControl>,

    /// Longest a single read may take, however steadily data arrives
    #[arg(long, value_name = "MS", default_value_t = config::DEFAULT_READ_CEILING_MS)]
    read_ceiling_ms: u64,

    /// Longest writing the payload may take
    #[arg(long, value_name = "MS", default_value_t = config::DEFAULT_WRITE_CEILING_MS)]
    write_ceiling_ms: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// 0 = off .. 5 = trace; logs go to stderr
    #[arg(short, long, default_value = "2")]
    verbosity: u8,

    /// Also write the log to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl From<Cli> for Configuration {
    fn from(cli: Cli) -> Configuration {
        Configuration {
            port: PortParameters {
                port_name: cli.port,
                baud_rate: cli.baud,
                data_bits: cli.data_bits,
                parity: cli.parity,
                stop_bits: cli.stop_bits,
                flow_control: cli.flow_control,
            },
            payload: cli.payload.0,
            timeouts: Timeouts::from_millis(cli.timeout, cli.read_ceiling_ms, cli.write_ceiling_ms),
            output: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<(), ProbeError> {
    let log_level = match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            log_level,
            Config::default(),
            File::create(path).map_err(ProbeError::LogFile)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", Cli::command().render_help())
}

/// Prints the usage banner and leaves. Help and version requests are not
/// failures.
fn usage_exit(err: clap::Error) -> ! {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            eprintln!("{}", err);
            if let Err(e) = write_usage(&mut io::stdout()) {
                eprintln!("Failed to print usage: {}", e);
            }
            process::exit(USAGE_EXIT_CODE);
        }
    }
}

/// Parses the command line, leaving the process on a usage error.
fn parse_args<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).unwrap_or_else(|e| usage_exit(e))
}

fn run(
    config: &Configuration,
    clock: &clock::Stopwatch,
    started_at: DateTime<Local>,
) -> Result<(), ProbeError> {
    let stdout = io::stdout();
    let mut reporter = report::Reporter::new(stdout.lock(), config.output);

    let device = port::channel::open_port(&config.port)?;
    let channel = port::channel::SerialChannel::new(device, &config.port.port_name, config.timeouts);
    reporter.port_opened(channel.name())?;

    let collector = port::collector::ResponseCollector::default();
    session::run_session(channel, config, &collector, clock, started_at, &mut reporter)?;
    Ok(())
}

fn main() {
    let clock = clock::Stopwatch::start();
    let started_at = Local::now();
    let args = parse_args(std::env::args_os());
    if let Err(e) = init_logging(args.verbosity, args.log_file.as_deref()) {
        eprintln!("{}", e);
        process::exit(FAILURE_EXIT_CODE);
    }
    trace!("Starting up");

    let config = Configuration::from(args);
    trace!("Configuration: {:?}", config);
    match run(&config, &clock, started_at) {
        Ok(()) => info!("Done"),
        Err(e) => {
            error!("{}", e);
            println!("{}", e);
            process::exit(FAILURE_EXIT_CODE);
        }
    }
}
