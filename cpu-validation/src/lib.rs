//! Validation tooling for the 6809 core: a bus that records every access,
//! JSON single-step test vectors, and a differ for reference traces.

use dragon_core::core::bus::InterruptState;
use dragon_core::core::{Bus, BusMaster};
use dragon_core::cpu::m6809::M6809;
use serde::{Deserialize, Serialize};

pub mod trace_diff;
pub mod vectors;

pub use trace_diff::{TraceMismatch, diff_traces};
pub use vectors::{load_test_file, test_files, write_test_file};

// --- TracingBus: flat 64KB memory with access recording ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusOp {
    Read,
    Write,
    Internal,
}

impl BusOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BusOp::Read => "read",
            BusOp::Write => "write",
            BusOp::Internal => "internal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusCycle {
    pub addr: u16,
    pub data: u8,
    pub op: BusOp,
}

pub struct TracingBus {
    pub memory: [u8; 0x10000],
    pub cycles: Vec<BusCycle>,
}

impl TracingBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            cycles: Vec::new(),
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.memory[addr.wrapping_add(i as u16) as usize] = byte;
        }
    }

    pub fn clear_cycles(&mut self) {
        self.cycles.clear();
    }
}

impl Default for TracingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for TracingBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let data = self.memory[addr as usize];
        self.cycles.push(BusCycle {
            addr,
            data,
            op: BusOp::Read,
        });
        data
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
        self.cycles.push(BusCycle {
            addr,
            data,
            op: BusOp::Write,
        });
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState::default()
    }
}

// --- JSON test vector types ---

/// One instruction: state before, state after, and every bus cycle in
/// between. Accesses come first in order; `internal` entries pad the list to
/// the instruction's cycle count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub initial: CpuState,
    #[serde(rename = "final")]
    pub final_state: CpuState,
    pub cycles: Vec<(u16, u8, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub pc: u16,
    pub s: u16,
    pub u: u16,
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub cc: u8,
    pub ram: Vec<(u16, u8)>,
}

impl CpuState {
    /// Registers of `cpu`; `ram` is left empty.
    pub fn capture(cpu: &M6809) -> Self {
        Self {
            pc: cpu.pc,
            s: cpu.s,
            u: cpu.u,
            a: cpu.a,
            b: cpu.b,
            dp: cpu.dp,
            x: cpu.x,
            y: cpu.y,
            cc: cpu.cc,
            ram: Vec::new(),
        }
    }

    /// Load registers into `cpu` and `ram` into `bus`.
    pub fn apply(&self, cpu: &mut M6809, bus: &mut TracingBus) {
        cpu.pc = self.pc;
        cpu.s = self.s;
        cpu.u = self.u;
        cpu.a = self.a;
        cpu.b = self.b;
        cpu.dp = self.dp;
        cpu.x = self.x;
        cpu.y = self.y;
        cpu.cc = self.cc;
        for &(addr, value) in &self.ram {
            bus.memory[addr as usize] = value;
        }
    }
}

/// Run `tc` on a fresh CPU and describe the first difference, if any.
pub fn check_case(tc: &TestCase) -> Result<(), String> {
    let mut cpu = M6809::new();
    let mut bus = TracingBus::new();
    tc.initial.apply(&mut cpu, &mut bus);

    let cycles = cpu.step(&mut bus, BusMaster::Cpu(0)) as usize;

    let mut actual = CpuState::capture(&cpu);
    actual.ram = tc
        .final_state
        .ram
        .iter()
        .map(|&(addr, _)| (addr, bus.memory[addr as usize]))
        .collect();
    if actual != tc.final_state {
        return Err(format!(
            "{}: final state\n  expected {:?}\n  actual   {:?}",
            tc.name, tc.final_state, actual
        ));
    }

    if cycles != tc.cycles.len() {
        return Err(format!(
            "{}: took {cycles} cycles, expected {}",
            tc.name,
            tc.cycles.len()
        ));
    }

    let expected = tc.cycles.iter().filter(|(_, _, op)| op != "internal");
    let mut seen = 0;
    for (index, (addr, data, op)) in expected.enumerate() {
        let Some(access) = bus.cycles.get(index) else {
            return Err(format!("{}: access {index} missing", tc.name));
        };
        if access.addr != *addr || access.data != *data || access.op.as_str() != op {
            return Err(format!(
                "{}: access {index} expected {op} {addr:04X}={data:02X}, got {} {:04X}={:02X}",
                tc.name,
                access.op.as_str(),
                access.addr,
                access.data
            ));
        }
        seen += 1;
    }
    if seen != bus.cycles.len() {
        return Err(format!(
            "{}: {} accesses, expected {seen}",
            tc.name,
            bus.cycles.len()
        ));
    }
    Ok(())
}
