use std::path::PathBuf;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use mediacaps::capability::CapabilityProbe;
use mediacaps::codec::{parse_codec_descriptor, parse_hex_record};
use mediacaps::common::{self, AnyResult};
use mediacaps::configs::Config;
use mediacaps::host::ProfileHost;
use mediacaps::rate::{MonotonicClock, RateSampler, format_rate, observe_reader};
use tracing::{info, warn};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe every capability of the configured host and print a JSON report
    Probe,
    /// Derive the codec string from a hex-encoded AVC configuration record
    Codec { record: String },
    /// Measure the throughput of stdin
    Rate {
        /// Read size per observation
        #[arg(long, default_value_t = 4096)]
        chunk: usize,
    },
}

fn main() -> AnyResult<()> {
    let args = Cli::parse();

    let (config, defaulted) = match &args.config {
        Some(path) => (Config::load_from(path)?, false),
        None => match Config::load_optional()? {
            Some(config) => (config, false),
            None => (Config::default(), true),
        },
    };
    common::logger::init(&config);
    if defaulted {
        warn!("no config.toml or config.default.toml found, using built-in defaults");
    }

    match args.command {
        Command::Probe => probe(config),
        Command::Codec { record } => codec(&record),
        Command::Rate { chunk } => rate(chunk),
    }
}

fn probe(config: Config) -> AnyResult<()> {
    let host = ProfileHost::new(config.host);
    let mut surface = host.surface();
    let report = CapabilityProbe::new(&host).probe_all(&mut surface);

    for (capability, available) in report.iter() {
        info!("{:?}: {}", capability, available);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn codec(record: &str) -> AnyResult<()> {
    let record = Bytes::from(parse_hex_record(record)?);
    let descriptor = parse_codec_descriptor(record)?;
    info!(
        "profile {} compatibility {:#04x} level {}",
        descriptor.profile(),
        descriptor.compatibility(),
        descriptor.level()
    );
    println!("{}", descriptor.codec());
    println!("{}", descriptor.mime_type());
    Ok(())
}

fn rate(chunk: usize) -> AnyResult<()> {
    let mut sampler = RateSampler::new(MonotonicClock::new(), |bytes_per_sec: f64| {
        println!("{}", format_rate(Some(bytes_per_sec)));
    });

    let total = observe_reader(&mut sampler, std::io::stdin().lock(), chunk)?;

    info!(
        "stdin closed after {} bytes, {} left in the open window",
        total,
        sampler.accumulated_bytes()
    );
    Ok(())
}
