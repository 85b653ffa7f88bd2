//! Single-board 6809 computer with a serial console.
//!
//! RAM fills $0000-$7FFF. A 16 KiB monitor/BASIC image sits at $C000, a
//! 32 KiB one at $8000; either way the image supplies the vectors at the top
//! of memory. An MC6850 ACIA overlays the ROM at $FF04-$FF07 (status and
//! control on even addresses, data on odd).

use dragon_core::core::machine::Machine;
use dragon_core::core::{
    BusMaster, HaltSignal, InputSender, InterruptState, MemoryBus, input_queue,
};
use dragon_core::cpu::CpuStateTrait;
use dragon_core::cpu::m6809::{BurstReport, M6809, RunLimits, TraceSink};
use dragon_core::cpu::state::M6809State;
use log::info;

use crate::acia::Acia6850;
use crate::board::{Board, Peripherals, lock};
use crate::registry::{MachineEntry, MachineOptions};
use crate::rom_loader::{RomLoadError, RomRegion, RomSet, RomSpec};

/// Nominal clock of a 3.6864 MHz crystal divided by 4.
pub const CPU_CLOCK: u64 = 921_600;

const ACIA_BASE: u16 = 0xFF04;
const ACIA_END: u16 = 0xFF07;

pub static SIMPLE6809_ROM: RomRegion = RomRegion {
    size: 0x4000,
    entries: &[RomSpec::new("simple6809.rom", 0x4000, 0x0000)],
};

#[derive(Clone, Debug)]
pub struct Simple6809Config {
    pub queue_capacity: usize,
    /// Deliver host newlines as carriage returns.
    pub lf_to_cr: bool,
}

impl Default for Simple6809Config {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            lf_to_cr: true,
        }
    }
}

pub struct SerialIo {
    pub acia: Acia6850,
}

impl Peripherals for SerialIo {
    fn lines(&mut self) -> InterruptState {
        InterruptState {
            irq: self.acia.irq(),
            ..InterruptState::default()
        }
    }

    fn reset(&mut self) {
        self.acia.reset();
    }
}

pub struct Simple6809System {
    cpu: M6809,
    board: Board<SerialIo>,
    input: InputSender,
}

impl Default for Simple6809System {
    fn default() -> Self {
        Self::new(&Simple6809Config::default())
    }
}

impl Simple6809System {
    pub fn new(config: &Simple6809Config) -> Self {
        let (input, receiver) = input_queue(config.queue_capacity);
        let mut mem = MemoryBus::new();
        mem.add_ram(0x0000..=0x7FFF);

        let io = SerialIo {
            acia: Acia6850::new(receiver, config.lf_to_cr),
        };
        let mut sys = Self {
            cpu: M6809::new(),
            board: Board::new(mem, io),
            input,
        };
        sys.map_acia();
        sys
    }

    fn map_acia(&mut self) {
        let io = self.board.shared();
        self.board.mem.register_read_callback_range(
            ACIA_BASE..=ACIA_END,
            Box::new(move |_, _, addr, _| {
                let mut io = lock(&io);
                if addr & 1 == 0 {
                    io.acia.status()
                } else {
                    io.acia.read_data()
                }
            }),
        );
        let io = self.board.shared();
        self.board.mem.register_write_callback_range(
            ACIA_BASE..=ACIA_END,
            Box::new(move |_, _, addr, value| {
                let mut io = lock(&io);
                if addr & 1 == 0 {
                    io.acia.write_control(value);
                } else {
                    io.acia.write_data(value);
                }
                None
            }),
        );
    }

    /// Map a 16 or 32 KiB image so that it ends at $FFFF.
    pub fn load_rom(&mut self, image: &[u8]) -> Result<(), RomLoadError> {
        let base: u16 = match image.len() {
            0x4000 => 0xC000,
            0x8000 => 0x8000,
            actual => {
                return Err(RomLoadError::SizeMismatch {
                    file: "simple6809 ROM".to_string(),
                    expected: 0x4000,
                    actual,
                });
            }
        };
        self.board.mem.add_rom(base..=0xFFFF);
        self.board.mem.load(base, image)?;
        info!("simple6809: {} KiB ROM at ${base:04X}", image.len() / 1024);
        Ok(())
    }

    /// Use the image named `simple6809.rom`, or the only image in the set.
    pub fn load_rom_set(&mut self, rom_set: &RomSet) -> Result<(), RomLoadError> {
        let name = SIMPLE6809_ROM.entries[0].name;
        match rom_set.get(name) {
            Some(image) => self.load_rom(image),
            None => match rom_set.sole_file() {
                Some((_, image)) => self.load_rom(image),
                None => Err(RomLoadError::MissingFile(name.to_string())),
            },
        }
    }

    pub fn cpu(&self) -> &M6809 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut M6809 {
        &mut self.cpu
    }

    pub fn memory(&mut self) -> &mut MemoryBus {
        &mut self.board.mem
    }
}

impl Machine for Simple6809System {
    fn name(&self) -> &'static str {
        "simple6809"
    }

    fn cycles_per_second(&self) -> u64 {
        CPU_CLOCK
    }

    fn reset(&mut self) {
        self.board.io().reset();
        self.cpu.reset(&mut self.board, BusMaster::Cpu(0));
    }

    fn run_burst(&mut self, limits: &RunLimits, halt: &HaltSignal) -> BurstReport {
        self.cpu
            .run_burst(&mut self.board, BusMaster::Cpu(0), limits, halt)
    }

    fn cpu_state(&self) -> M6809State {
        self.cpu.snapshot()
    }

    fn set_trace_sink(&mut self, sink: Option<TraceSink>) {
        self.cpu.set_trace_sink(sink);
    }

    fn input_sender(&self) -> InputSender {
        self.input.clone()
    }

    fn take_serial_output(&mut self) -> Vec<u8> {
        self.board.io().acia.take_output()
    }
}

fn create_machine(
    rom_set: &RomSet,
    options: &MachineOptions,
) -> Result<Box<dyn Machine>, RomLoadError> {
    let config = Simple6809Config {
        queue_capacity: options.queue_capacity,
        ..Simple6809Config::default()
    };
    let mut sys = Simple6809System::new(&config);
    sys.load_rom_set(rom_set)?;
    sys.reset();
    Ok(Box::new(sys))
}

inventory::submit! {
    MachineEntry::new(
        "simple6809",
        "Single-board 6809 with ACIA serial console",
        &SIMPLE6809_ROM,
        create_machine
    )
}
