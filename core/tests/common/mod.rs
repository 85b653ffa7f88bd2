#![allow(dead_code)]

use dragon_core::core::{Bus, BusMaster, bus::InterruptState};
use dragon_core::cpu::m6809::M6809;

/// Minimal bus for testing: flat 64KB read/write memory, no peripherals,
/// interrupt lines driven directly by the test.
pub struct TestBus {
    pub memory: [u8; 0x10000],
    pub lines: InterruptState,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            lines: InterruptState::default(),
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    /// Store a big-endian vector (or any word).
    pub fn set_word(&mut self, addr: u16, value: u16) {
        self.load(addr, &value.to_be_bytes());
    }

    pub fn word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([
            self.memory[addr as usize],
            self.memory[addr.wrapping_add(1) as usize],
        ])
    }
}

impl Bus for TestBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        self.lines
    }
}

/// Execute one instruction; returns the cycles it took.
pub fn step(cpu: &mut M6809, bus: &mut TestBus) -> u32 {
    cpu.step(bus, BusMaster::Cpu(0))
}

/// Execute `n` instructions; returns the total cycles.
pub fn run(cpu: &mut M6809, bus: &mut TestBus, n: usize) -> u64 {
    (0..n).map(|_| step(cpu, bus) as u64).sum()
}

pub fn flag(cpu: &M6809, flag: dragon_core::cpu::m6809::CcFlag) -> bool {
    cpu.cc & (flag as u8) != 0
}
