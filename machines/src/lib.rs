pub mod acia;
pub mod board;
pub mod dragon;
pub mod keyboard;
pub mod pia;
pub mod registry;
pub mod rom_loader;
pub mod sam;
pub mod screen;
pub mod simple6809;

pub use dragon::{DragonConfig, DragonModel, DragonSystem};
pub use registry::{MachineEntry, MachineOptions};
pub use rom_loader::{RomLoadError, RomSet};
pub use simple6809::{Simple6809Config, Simple6809System};
