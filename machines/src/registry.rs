//! Machine registry for front-end discovery.
//!
//! Each machine self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] holding its CLI name, a description, the ROM images it
//! expects and a factory. The front-end finds them at runtime without any
//! central list.

use dragon_core::core::machine::Machine;

use crate::rom_loader::{RomLoadError, RomRegion, RomSet};

/// Host choices that apply to every machine.
#[derive(Clone, Debug)]
pub struct MachineOptions {
    /// Reject ROM images whose CRC-32 matches no known dump.
    pub verify_checksums: bool,
    /// Pending keypresses the input queue holds before senders block.
    pub queue_capacity: usize,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            queue_capacity: 256,
        }
    }
}

pub type Factory = fn(&RomSet, &MachineOptions) -> Result<Box<dyn Machine>, RomLoadError>;

pub struct MachineEntry {
    /// CLI name (e.g. "dragon32").
    pub name: &'static str,
    pub description: &'static str,
    /// Images looked up in the ROM set, for listings and error messages.
    pub roms: &'static RomRegion,
    /// Build and reset a machine from a loaded ROM set.
    pub create: Factory,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        roms: &'static RomRegion,
        create: Factory,
    ) -> Self {
        Self {
            name,
            description,
            roms,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// All registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
}
