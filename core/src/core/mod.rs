pub mod bus;
pub mod host;
pub mod machine;
pub mod memory;
pub mod throttle;

pub use bus::{Bus, BusMaster, InterruptState};
pub use host::{HaltSignal, InputReceiver, InputSender, KeyPress, input_queue};
pub use machine::Machine;
pub use memory::{MemoryBus, MemoryError, ReadCallback, Region, WriteCallback};
pub use throttle::Throttle;
