use std::time::{Duration, Instant};

use log::trace;

use super::M6809;
use crate::core::{Bus, BusMaster, HaltSignal, Throttle};

// Instant::now() is far slower than one instruction
const CLOCK_CHECK_INTERVAL: u32 = 64;

/// Bounds on one burst of the run loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLimits {
    /// Instructions per burst.
    pub burst_op_count: u32,
    /// Wall-clock budget per burst.
    pub max_run_time: Duration,
    /// Speed limit; `None` runs flat out.
    pub target_cycles_per_sec: Option<u64>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            burst_op_count: 10_000,
            max_run_time: Duration::from_millis(20),
            target_cycles_per_sec: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurstReport {
    /// Steps taken (instructions, interrupt entries or idle SYNC/CWAI cycles).
    pub ops: u32,
    pub cycles: u64,
    pub elapsed: Duration,
    /// The burst stopped because the halt signal was raised.
    pub halted: bool,
}

impl M6809 {
    /// Run instructions until `burst_op_count` have executed, `max_run_time`
    /// has elapsed, or `halt` is raised. Never sleeps.
    pub fn run_burst<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        limits: &RunLimits,
        halt: &HaltSignal,
    ) -> BurstReport {
        let start = Instant::now();
        let start_cycles = self.cycles;
        let mut ops = 0;
        let mut halted = false;

        while ops < limits.burst_op_count {
            if halt.is_raised() {
                halted = true;
                break;
            }
            self.step(bus, master);
            ops += 1;
            if ops % CLOCK_CHECK_INTERVAL == 0 && start.elapsed() >= limits.max_run_time {
                break;
            }
        }

        let report = BurstReport {
            ops,
            cycles: self.cycles - start_cycles,
            elapsed: start.elapsed(),
            halted,
        };
        trace!(
            "burst: {} ops, {} cycles in {:?}{}",
            report.ops,
            report.cycles,
            report.elapsed,
            if halted { " (halted)" } else { "" }
        );
        report
    }

    /// One burst followed by whatever sleep `throttle` needs to hold its
    /// target rate.
    pub fn run<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        limits: &RunLimits,
        halt: &HaltSignal,
        throttle: &Throttle,
    ) -> BurstReport {
        let report = self.run_burst(bus, master, limits, halt);
        if !report.halted {
            throttle.pace(report.cycles, report.elapsed);
        }
        report
    }
}
