/// Identifies who is accessing the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    Cpu(usize), // CPU 0, CPU 1, etc.
    Host,       // Debuggers, loaders and trace readers poking memory from outside
}

/// Generic bus interface between a CPU and the memory/peripheral fabric.
pub trait Bus {
    type Address: Copy + Into<u64>; // u16 for 8-bit CPUs
    type Data; // u8 for 8-bit CPUs

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Called by the CPU before each instruction fetch with its running cycle
    /// count and the address of the instruction about to execute. Buses that
    /// dispatch to peripheral callbacks forward both values to them.
    fn begin_instruction(&mut self, _cycles: u64, _op_addr: Self::Address) {}

    /// Called once per cycle the CPU spends idle in SYNC or CWAI, so that
    /// timers driving the wake-up interrupt keep running.
    fn idle_cycle(&mut self, _cycles: u64) {}

    /// Generic interrupt query. CPUs pick what they need.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

/// Interrupt lines as seen by a CPU between two instructions.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterruptState {
    pub reset: bool,
    pub nmi: bool,
    pub firq: bool,
    pub irq: bool,
}

impl InterruptState {
    pub fn any(&self) -> bool {
        self.reset || self.nmi || self.firq || self.irq
    }

    /// Combine two line sets (wired-OR, as on the real board).
    pub fn merge(self, other: InterruptState) -> InterruptState {
        InterruptState {
            reset: self.reset || other.reset,
            nmi: self.nmi || other.nmi,
            firq: self.firq || other.firq,
            irq: self.irq || other.irq,
        }
    }
}
