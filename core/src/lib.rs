pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::{
        Bus, BusMaster, HaltSignal, InterruptState, KeyPress, Machine, MemoryBus, Throttle,
    };
    pub use crate::cpu::m6809::{CcFlag, M6809, Register, RunLimits};
    pub use crate::cpu::{Cpu, CpuStateTrait};
}
