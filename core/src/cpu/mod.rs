use crate::core::bus::InterruptState;

/// Generic CPU interface
pub trait Cpu: CpuStateTrait {
    /// Latch interrupt lines; they are sampled at the next instruction boundary.
    fn signal_interrupt(&mut self, int: InterruptState);

    /// Query if CPU is waiting for an interrupt (SYNC, CWAI)
    fn is_sleeping(&self) -> bool;

    /// Total cycles executed since power-on.
    fn cycles(&self) -> u64;
}

pub mod state;
pub use state::{CpuStateTrait, M6809State};

pub mod m6809;
pub use m6809::M6809;
