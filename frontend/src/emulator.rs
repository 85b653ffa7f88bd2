use std::io::{self, IsTerminal, Write};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use dragon_core::core::machine::Machine;
use dragon_core::core::{HaltSignal, Throttle};
use dragon_core::cpu::m6809::RunLimits;
use log::info;

use crate::config::RunConfig;
use crate::output::Output;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub limits: RunLimits,
    /// Stop after this many steps in total.
    pub max_ops: Option<u64>,
}

impl Settings {
    /// Combine command-line choices with the `[run]` table. `speed` is a
    /// multiple of the machine's `nominal` clock; `turbo` removes the limit.
    pub fn resolve(
        speed: Option<f64>,
        turbo: bool,
        max_ops: Option<u64>,
        run: &RunConfig,
        nominal: u64,
    ) -> Self {
        let defaults = RunLimits::default();
        let target = if turbo {
            None
        } else if let Some(factor) = speed {
            Some((nominal as f64 * factor).round() as u64)
        } else {
            match run.cycles_per_sec {
                Some(0) => None,
                Some(rate) => Some(rate),
                None => Some(nominal),
            }
        };
        Self {
            limits: RunLimits {
                burst_op_count: run.burst_op_count.unwrap_or(defaults.burst_op_count),
                max_run_time: run
                    .max_run_time_ms
                    .map_or(defaults.max_run_time, Duration::from_millis),
                target_cycles_per_sec: target,
            },
            max_ops,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub ops: u64,
    pub cycles: u64,
    pub elapsed: Duration,
    /// Stopped by the halt signal rather than `max_ops`.
    pub halted: bool,
}

fn drain<W: Write>(machine: &mut dyn Machine, output: &mut Output<W>) -> io::Result<()> {
    let serial = machine.take_serial_output();
    if !serial.is_empty() {
        output.serial(&serial)?;
    }
    if let Some(rows) = machine.take_display() {
        output.screen(rows)?;
    }
    Ok(())
}

/// Burst loop: run, show output, pace, until halted or out of steps.
pub fn run<W: Write>(
    machine: &mut dyn Machine,
    settings: &Settings,
    halt: &HaltSignal,
    output: &mut Output<W>,
) -> io::Result<Summary> {
    let throttle = Throttle::new(settings.limits.target_cycles_per_sec);
    let start = Instant::now();
    let mut summary = Summary::default();

    loop {
        let mut limits = settings.limits.clone();
        if let Some(max) = settings.max_ops {
            let left = max.saturating_sub(summary.ops);
            if left == 0 {
                break;
            }
            limits.burst_op_count = limits
                .burst_op_count
                .min(u32::try_from(left).unwrap_or(u32::MAX));
        }

        let report = machine.run_burst(&limits, halt);
        summary.ops += u64::from(report.ops);
        summary.cycles += report.cycles;
        drain(machine, output)?;

        if report.halted {
            summary.halted = true;
            break;
        }
        throttle.pace(report.cycles, report.elapsed);
    }

    output.finish()?;
    summary.elapsed = start.elapsed();
    info!(
        "{}: {} steps, {} cycles in {:.2?}, stopped at {}",
        machine.name(),
        summary.ops,
        summary.cycles,
        summary.elapsed,
        machine.cpu_state()
    );
    Ok(summary)
}

/// Run `machine` on its own thread, writing to stdout.
pub fn spawn(
    mut machine: Box<dyn Machine>,
    settings: Settings,
    halt: HaltSignal,
) -> io::Result<JoinHandle<io::Result<Summary>>> {
    thread::Builder::new()
        .name("emulator".to_string())
        .spawn(move || {
            let stdout = io::stdout();
            let ansi = stdout.is_terminal();
            let mut output = Output::new(stdout.lock(), ansi);
            run(machine.as_mut(), &settings, &halt, &mut output)
        })
}
