//! Lean cuckoo-cycle miner.
//!
//! Usage:
//!   lean-miner -h test -n 0 -r 4 -t 8      # text header, nonces 0..4, 8 threads
//!   lean-miner -x 74657374 -e 16            # hex header, 2^16 edges
//!   lean-miner --config miner.json --json   # settings from a file, JSON report

use clap::{ArgAction, Parser};
use cuckoo_core::display::{format_banner, format_report};
use cuckoo_core::{Miner, MinerConfig, MinerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Searches cuckoo graphs for cycles of a fixed length.
#[derive(Parser, Debug)]
#[command(name = "lean-miner", version, disable_help_flag = true)]
struct Cli {
    /// Header text, at most 80 bytes.
    #[arg(short = 'h', long, conflicts_with = "hex_header")]
    header: Option<String>,

    /// Header as hex bytes.
    #[arg(short = 'x', long = "hex-header")]
    hex_header: Option<String>,

    /// Worker threads.
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Trimming rounds.
    #[arg(short = 'm', long)]
    trims: Option<u32>,

    /// First nonce.
    #[arg(short = 'n', long)]
    nonce: Option<u32>,

    /// Number of nonces to try.
    #[arg(short = 'r', long)]
    range: Option<u32>,

    /// log2 of the edge count.
    #[arg(short = 'e', long)]
    edge_bits: Option<u32>,

    /// log2 of the counter sub-partitions.
    #[arg(short = 'p', long)]
    part_bits: Option<u32>,

    /// Cycle length to look for.
    #[arg(long)]
    proof_size: Option<usize>,

    /// JSON file with miner settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn miner_config(&self) -> Result<MinerConfig, MinerError> {
        let mut config = match &self.config {
            Some(path) => MinerConfig::from_json_file(path)?,
            None => MinerConfig::default(),
        };
        if let Some(threads) = self.threads { config.threads = threads; }
        if let Some(trims) = self.trims { config.ntrims = Some(trims); }
        if let Some(nonce) = self.nonce { config.nonce = nonce; }
        if let Some(range) = self.range { config.range = range; }
        if let Some(edge_bits) = self.edge_bits { config.edge_bits = edge_bits; }
        if let Some(part_bits) = self.part_bits { config.part_bits = part_bits; }
        if let Some(proof_size) = self.proof_size { config.proof_size = proof_size; }
        config.validate()?;
        Ok(config)
    }

    /// Header bytes plus the label shown in the banner.
    fn header(&self) -> Result<(Vec<u8>, String), MinerError> {
        match (&self.header, &self.hex_header) {
            (_, Some(hex_str)) => Ok((hex::decode(hex_str)?, hex_str.clone())),
            (Some(text), None) => Ok((text.as_bytes().to_vec(), text.clone())),
            (None, None) => Ok((Vec::new(), String::new())),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: &Cli) -> Result<(), MinerError> {
    let config = cli.miner_config()?;
    let (header, label) = cli.header()?;
    let mut miner = Miner::new(config.clone())?;

    if !cli.json {
        print!("{}", format_banner(&config, &label, &miner.footprint()));
    }
    let report = miner.mine(&header, None)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lean-miner: {e}");
            ExitCode::FAILURE
        }
    }
}
