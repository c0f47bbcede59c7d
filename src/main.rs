use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use mos6502_sim::metrics::{gather_metrics, init_metrics};
use mos6502_sim::{Emulator, SimConfig, Snapshot, StdoutConsole};

#[derive(Parser, Debug)]
#[command(
    name = "mos6502_sim",
    version,
    about = "Run a raw 6502 binary (2-byte little-endian load address + code) until BRK"
)]
struct Cli {
    /// Program image to load
    program: PathBuf,

    /// Entry address in hex (defaults to the load address)
    #[arg(short, long, value_name = "HEX", value_parser = parse_hex)]
    entry: Option<u16>,

    /// Address whose JSR prints the accumulator, in hex
    #[arg(short, long, value_name = "HEX", value_parser = parse_hex)]
    print_address: Option<u16>,

    /// Abort after this many instructions without reaching BRK
    #[arg(short, long, value_name = "N")]
    max_steps: Option<u64>,

    /// JSON config file; flags given here win over it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the final CPU state as JSON to stderr
    #[arg(long)]
    dump_state: bool,

    /// Write a snapshot of the machine to FILE after the run
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,
}

fn parse_hex(text: &str) -> Result<u16, String> {
    let digits = text.trim_start_matches('$').trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{}': {}", text, e))
}

fn build_config(cli: &Cli) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(address) = cli.print_address {
        config.print_address = address;
    }
    if cli.max_steps.is_some() {
        config.max_steps = cli.max_steps;
    }
    if cli.entry.is_some() {
        config.entry = cli.entry;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(cli)?;
    let mut emulator = Emulator::new(config, StdoutConsole);

    let origin = emulator.load_file(&cli.program)?;
    info!("loaded {} at ${:04X}", cli.program.display(), origin);

    let outcome = emulator.run();

    if cli.dump_state {
        eprintln!("{}", serde_json::to_string_pretty(&emulator.get_state())?);
    }
    if let Some(path) = &cli.snapshot {
        let snapshot = Snapshot::capture(&emulator, &cli.program.display().to_string());
        fs::write(path, snapshot.to_json()?)?;
        info!("snapshot {} written to {}", snapshot.id, path.display());
    }
    if cli.metrics {
        eprint!("{}", gather_metrics()?);
    }

    let report = outcome?;
    info!("halted after {} instructions", report.instructions_executed);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = init_metrics() {
        error!("metrics unavailable: {}", err);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
