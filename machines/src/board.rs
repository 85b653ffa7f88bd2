//! Shared board plumbing: a [`MemoryBus`] plus the peripheral state its MMIO
//! callbacks act on.
//!
//! Peripherals live behind an `Arc<Mutex<_>>` so that the closures installed
//! on the memory bus and the machine itself see the same chips. Everything
//! still runs on the emulation thread; the mutex is never contended.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dragon_core::core::{Bus, BusMaster, InterruptState, MemoryBus};

/// The peripheral side of a board.
pub trait Peripherals: Send {
    /// Advance free-running timers (field sync, key repeat) to `cycles`.
    fn tick(&mut self, _cycles: u64) {}

    /// Interrupt lines currently driven towards the CPU.
    fn lines(&mut self) -> InterruptState;

    fn reset(&mut self) {}
}

pub type Shared<P> = Arc<Mutex<P>>;

/// Lock shared peripheral state. A poisoned lock only means a callback
/// panicked mid-update; the chip state is still usable.
pub fn lock<P>(shared: &Mutex<P>) -> MutexGuard<'_, P> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Board<P: Peripherals> {
    pub mem: MemoryBus,
    pub io: Shared<P>,
}

impl<P: Peripherals> Board<P> {
    pub fn new(mem: MemoryBus, io: P) -> Self {
        Self {
            mem,
            io: Arc::new(Mutex::new(io)),
        }
    }

    pub fn io(&self) -> MutexGuard<'_, P> {
        lock(&self.io)
    }

    /// A handle for MMIO closures.
    pub fn shared(&self) -> Shared<P> {
        Arc::clone(&self.io)
    }
}

impl<P: Peripherals> Bus for Board<P> {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.mem.read_byte(addr)
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.mem.write_byte(addr, data)
    }

    fn begin_instruction(&mut self, cycles: u64, op_addr: u16) {
        self.mem.begin_instruction(cycles, op_addr);
        self.io().tick(cycles);
    }

    fn idle_cycle(&mut self, cycles: u64) {
        self.io().tick(cycles);
    }

    fn check_interrupts(&self, target: BusMaster) -> InterruptState {
        self.mem.check_interrupts(target).merge(self.io().lines())
    }
}
