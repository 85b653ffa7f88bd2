use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use dragon_core::core::HaltSignal;
use dragon_core::cpu::m6809::{TraceRecord, TraceSink};
use dragon_machines::registry::{self, MachineOptions};
use log::{info, warn};

mod config;
mod emulator;
mod input;
mod output;
mod rom_path;

use config::Config;
use emulator::Settings;

const DEFAULT_EOF_GRACE_MS: u64 = 500;

/// Headless MC6809E emulator: Dragon 32/64, Tandy CoCo and a single-board
/// 6809 with a serial console. Stdin is the keyboard; the text screen or
/// serial output goes to stdout.
#[derive(Debug, Parser)]
#[command(name = "dragon", version)]
struct Cli {
    /// Machine to run (see --list).
    machine: Option<String>,

    /// ROM directory, ZIP archive or single image.
    rom_path: Option<PathBuf>,

    /// List the available machines and the ROMs each expects.
    #[arg(long)]
    list: bool,

    /// Clock as a multiple of the machine's nominal rate.
    #[arg(long, value_parser = parse_speed, conflicts_with = "turbo")]
    speed: Option<f64>,

    /// Run as fast as the host allows.
    #[arg(long)]
    turbo: bool,

    /// Write one trace line per instruction to FILE.
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Config file to use instead of the default.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after N instructions.
    #[arg(long, value_name = "N")]
    max_ops: Option<u64>,

    /// Accept ROM images whose checksum is unknown.
    #[arg(long)]
    no_verify: bool,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_speed(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{s} is not a positive number")),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn list_machines() {
    for entry in registry::all() {
        let roms: Vec<_> = entry
            .roms
            .entries
            .iter()
            .map(|r| if r.optional { format!("[{}]", r.name) } else { r.name.to_string() })
            .collect();
        println!("{:<12} {:<44} {}", entry.name, entry.description, roms.join(" "));
    }
}

fn trace_sink(path: &Path) -> io::Result<TraceSink> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut failed = false;
    Ok(Box::new(move |record: &TraceRecord| {
        if let Err(e) = writeln!(out, "{record}")
            && !failed
        {
            warn!("trace output failed: {e}");
            failed = true;
        }
    }))
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        list_machines();
        return Ok(());
    }
    let config = Config::load(cli.config.as_deref())?;

    let name = cli
        .machine
        .or(config.machine)
        .ok_or("no machine given (try --list)")?;
    let entry = registry::find(&name).ok_or_else(|| {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        format!("unknown machine {name}; available: {}", names.join(", "))
    })?;
    let rom_path = cli
        .rom_path
        .or(config.rom_path)
        .ok_or("no ROM path given")?;

    let rom_set = rom_path::load_rom_set(entry.name, &rom_path)?;
    let defaults = MachineOptions::default();
    let options = MachineOptions {
        verify_checksums: !cli.no_verify,
        queue_capacity: config
            .keyboard
            .queue_capacity
            .unwrap_or(defaults.queue_capacity),
    };
    let mut machine = (entry.create)(&rom_set, &options)?;
    info!("{}: {}", entry.name, entry.description);

    if let Some(path) = cli.trace.or(config.trace.path) {
        machine.set_trace_sink(Some(trace_sink(&path)?));
        info!("tracing to {}", path.display());
    }

    let settings = Settings::resolve(
        cli.speed,
        cli.turbo,
        cli.max_ops,
        &config.run,
        machine.cycles_per_second(),
    );
    let grace = Duration::from_millis(
        config
            .keyboard
            .eof_grace_ms
            .unwrap_or(DEFAULT_EOF_GRACE_MS),
    );

    let halt = HaltSignal::new();
    input::spawn_stdin(machine.input_sender(), halt.clone(), grace)?;
    let emulator = emulator::spawn(machine, settings, halt.clone())?;
    let result = emulator
        .join()
        .map_err(|_| "emulator thread panicked")?;
    halt.raise();
    result?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dragon: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "dragon", "dragon32", "roms", "--speed", "2", "--trace", "t.log", "--max-ops", "500",
            "--no-verify", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.machine.as_deref(), Some("dragon32"));
        assert_eq!(cli.rom_path, Some(PathBuf::from("roms")));
        assert_eq!(cli.speed, Some(2.0));
        assert_eq!(cli.trace, Some(PathBuf::from("t.log")));
        assert_eq!(cli.max_ops, Some(500));
        assert!(cli.no_verify);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn speed_and_turbo_conflict() {
        assert!(Cli::try_parse_from(["dragon", "coco", "roms", "--speed", "2", "--turbo"]).is_err());
    }

    #[test]
    fn speed_must_be_positive() {
        assert!(Cli::try_parse_from(["dragon", "coco", "roms", "--speed", "0"]).is_err());
        assert!(Cli::try_parse_from(["dragon", "coco", "roms", "--speed", "fast"]).is_err());
    }

    #[test]
    fn list_needs_no_machine() {
        let cli = Cli::try_parse_from(["dragon", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.machine.is_none());
    }
}
