//! Flat 64 KiB memory bus with RAM/ROM regions and per-address callbacks.
//!
//! Every address is RAM, ROM or unmapped. On top of the backing store any
//! address may carry a chain of read and/or write callbacks: peripherals use
//! them for memory-mapped I/O, and because a chain sees the backing byte as
//! its input it can also act as middleware over RAM or ROM (observing video
//! RAM writes, overlaying registers on top of a ROM image, ...).

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

use log::debug;
use thiserror::Error;

use super::bus::{Bus, BusMaster, InterruptState};

/// Read callback: `(cpu_cycles, last_op_addr, addr, value) -> value`.
///
/// `value` is the backing byte for the first callback in a chain and the
/// previous callback's result for the rest.
pub type ReadCallback = Box<dyn FnMut(u64, u16, u16, u8) -> u8 + Send>;

/// Write callback: `(cpu_cycles, last_op_addr, addr, value) -> Option<value>`.
///
/// Returning `Some(v)` passes `v` on (to the next callback, then to the
/// backing store); `None` vetoes the write.
pub type WriteCallback = Box<dyn FnMut(u64, u16, u16, u8) -> Option<u8> + Send>;

const ADDRESS_SPACE: usize = 0x10000;

const HOOK_READ: u8 = 0x01;
const HOOK_WRITE: u8 = 0x02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Unmapped,
    Ram,
    Rom,
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("{len} bytes at ${addr:04X} run past the end of the address space")]
    Overflow { addr: u16, len: usize },

    #[error("cannot load into unmapped address ${0:04X}")]
    Unmapped(u16),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct MemoryBus {
    mem: Box<[u8]>,
    regions: Box<[Region]>,
    // HOOK_READ / HOOK_WRITE per address, so plain RAM never touches the maps
    hooked: Box<[u8]>,

    read_callbacks: Vec<ReadCallback>,
    write_callbacks: Vec<WriteCallback>,
    read_chains: HashMap<u16, Vec<usize>>,
    write_chains: HashMap<u16, Vec<usize>>,

    // Context forwarded to callbacks, set by the CPU before each instruction
    cycles: u64,
    last_op_addr: u16,

    accesses: u64,
    lines: InterruptState,
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus {
    /// An empty bus: every address unmapped, no callbacks.
    pub fn new() -> Self {
        Self {
            mem: vec![0; ADDRESS_SPACE].into_boxed_slice(),
            regions: vec![Region::Unmapped; ADDRESS_SPACE].into_boxed_slice(),
            hooked: vec![0; ADDRESS_SPACE].into_boxed_slice(),
            read_callbacks: Vec::new(),
            write_callbacks: Vec::new(),
            read_chains: HashMap::new(),
            write_chains: HashMap::new(),
            cycles: 0,
            last_op_addr: 0,
            accesses: 0,
            lines: InterruptState::default(),
        }
    }

    /// A bus whose whole address space is RAM.
    pub fn with_flat_ram() -> Self {
        let mut bus = Self::new();
        bus.add_ram(0x0000..=0xFFFF);
        bus
    }

    pub fn add_ram(&mut self, range: RangeInclusive<u16>) {
        self.set_region(range, Region::Ram);
    }

    pub fn add_rom(&mut self, range: RangeInclusive<u16>) {
        self.set_region(range, Region::Rom);
    }

    fn set_region(&mut self, range: RangeInclusive<u16>, region: Region) {
        let (start, end) = (*range.start() as usize, *range.end() as usize);
        self.regions[start..=end].fill(region);
    }

    pub fn region(&self, addr: u16) -> Region {
        self.regions[addr as usize]
    }

    /// Copy `data` into the backing store at `addr`, ignoring ROM protection.
    /// Every target address must already be mapped.
    pub fn load(&mut self, addr: u16, data: &[u8]) -> Result<(), MemoryError> {
        let start = addr as usize;
        let end = start + data.len();
        if end > ADDRESS_SPACE {
            return Err(MemoryError::Overflow {
                addr,
                len: data.len(),
            });
        }
        if let Some(offset) = self.regions[start..end]
            .iter()
            .position(|&r| r == Region::Unmapped)
        {
            return Err(MemoryError::Unmapped((start + offset) as u16));
        }
        self.mem[start..end].copy_from_slice(data);
        debug!("loaded {} bytes at ${addr:04X}", data.len());
        Ok(())
    }

    /// Load a host file into the backing store at `addr`.
    pub fn load_file(&mut self, addr: u16, path: &Path) -> Result<usize, MemoryError> {
        let data = std::fs::read(path).map_err(|source| MemoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load(addr, &data)?;
        Ok(data.len())
    }

    /// Backing byte at `addr`, without callbacks or access counting.
    pub fn peek(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    /// Store into the backing array regardless of region or callbacks.
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }

    /// Total number of byte accesses made through `read_byte`/`write_byte`.
    pub fn access_count(&self) -> u64 {
        self.accesses
    }

    pub fn last_op_addr(&self) -> u16 {
        self.last_op_addr
    }

    pub fn read_byte(&mut self, addr: u16) -> u8 {
        self.accesses += 1;
        let a = addr as usize;
        let hooked = self.hooked[a] & HOOK_READ != 0;

        let backing = match self.regions[a] {
            Region::Ram | Region::Rom => self.mem[a],
            Region::Unmapped => {
                if !hooked {
                    debug!("read from unmapped ${addr:04X} (op at ${:04X})", self.last_op_addr);
                }
                0
            }
        };
        if !hooked {
            return backing;
        }

        let mut value = backing;
        if let Some(chain) = self.read_chains.get(&addr) {
            for &index in chain {
                value = (self.read_callbacks[index])(self.cycles, self.last_op_addr, addr, value);
            }
        }
        value
    }

    /// Big-endian word read; the second byte wraps to $0000 after $FFFF.
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let hi = self.read_byte(addr);
        let lo = self.read_byte(addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.accesses += 1;
        let a = addr as usize;
        let hooked = self.hooked[a] & HOOK_WRITE != 0;

        let mut value = value;
        if hooked && let Some(chain) = self.write_chains.get(&addr) {
            for &index in chain {
                match (self.write_callbacks[index])(self.cycles, self.last_op_addr, addr, value) {
                    Some(v) => value = v,
                    None => return,
                }
            }
        }

        match self.regions[a] {
            Region::Ram => self.mem[a] = value,
            Region::Rom => debug!(
                "write ${value:02X} to ROM at ${addr:04X} dropped (op at ${:04X})",
                self.last_op_addr
            ),
            Region::Unmapped => {
                if !hooked {
                    debug!(
                        "write ${value:02X} to unmapped ${addr:04X} dropped (op at ${:04X})",
                        self.last_op_addr
                    );
                }
            }
        }
    }

    /// Big-endian word write; the second byte wraps to $0000 after $FFFF.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_byte(addr, hi);
        self.write_byte(addr.wrapping_add(1), lo);
    }

    /// Install a read callback on a single address, after any already there.
    pub fn register_read_callback(&mut self, addr: u16, callback: ReadCallback) {
        self.register_read_callback_range(addr..=addr, callback);
    }

    /// Install one read callback shared by every address in `range`.
    pub fn register_read_callback_range(
        &mut self,
        range: RangeInclusive<u16>,
        callback: ReadCallback,
    ) {
        let index = self.read_callbacks.len();
        self.read_callbacks.push(callback);
        for addr in range {
            self.read_chains.entry(addr).or_default().push(index);
            self.hooked[addr as usize] |= HOOK_READ;
        }
    }

    /// Install a write callback on a single address, after any already there.
    pub fn register_write_callback(&mut self, addr: u16, callback: WriteCallback) {
        self.register_write_callback_range(addr..=addr, callback);
    }

    /// Install one write callback shared by every address in `range`.
    pub fn register_write_callback_range(
        &mut self,
        range: RangeInclusive<u16>,
        callback: WriteCallback,
    ) {
        let index = self.write_callbacks.len();
        self.write_callbacks.push(callback);
        for addr in range {
            self.write_chains.entry(addr).or_default().push(index);
            self.hooked[addr as usize] |= HOOK_WRITE;
        }
    }

    pub fn has_read_callback(&self, addr: u16) -> bool {
        self.hooked[addr as usize] & HOOK_READ != 0
    }

    pub fn has_write_callback(&self, addr: u16) -> bool {
        self.hooked[addr as usize] & HOOK_WRITE != 0
    }

    /// Interrupt lines currently driven by peripherals.
    pub fn lines(&self) -> InterruptState {
        self.lines
    }

    pub fn set_lines(&mut self, lines: InterruptState) {
        self.lines = lines;
    }

    pub fn lines_mut(&mut self) -> &mut InterruptState {
        &mut self.lines
    }
}

impl Bus for MemoryBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.read_byte(addr)
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.write_byte(addr, data)
    }

    fn begin_instruction(&mut self, cycles: u64, op_addr: u16) {
        self.cycles = cycles;
        self.last_op_addr = op_addr;
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        self.lines
    }
}
