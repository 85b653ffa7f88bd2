//! Register snapshots handed to hosts and test harnesses.

use std::fmt;

use crate::cpu::m6809::format_cc;

/// A CPU that can report its registers by value.
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
}

/// Programmer-visible 6809 registers at an instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct M6809State {
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    /// Hardware (system) stack pointer.
    pub s: u16,
    pub pc: u16,
    pub cc: u8,
}

impl M6809State {
    /// The D register view over A:B.
    pub fn d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }
}

impl fmt::Display for M6809State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC={:04X} A={:02X} B={:02X} DP={:02X} X={:04X} Y={:04X} U={:04X} S={:04X} CC={}",
            self.pc,
            self.a,
            self.b,
            self.dp,
            self.x,
            self.y,
            self.u,
            self.s,
            format_cc(self.cc)
        )
    }
}
