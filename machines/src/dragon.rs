//! Dragon 32, Dragon 64 and Tandy Color Computer.
//!
//! Memory map (32K RAM mode):
//!
//! | Range           | Contents                                    |
//! |-----------------|---------------------------------------------|
//! | $0000-$7FFF     | RAM (text screen at $0400-$05FF)             |
//! | $8000-$BFFF     | BASIC ROM                                   |
//! | $C000-$FEFF     | Cartridge ROM                               |
//! | $FF00-$FF1F     | PIA-0: keyboard matrix, field sync IRQ      |
//! | $FF20-$FF3F     | PIA-1: DAC, cassette, VDG mode, cart FIRQ   |
//! | $FFC0-$FFDF     | SAM control bits                            |
//! | $FFF0-$FFFF     | Vectors, mirrored from $BFF0-$BFFF          |

use dragon_core::core::machine::Machine;
use dragon_core::core::{
    BusMaster, HaltSignal, InputSender, InterruptState, MemoryBus, input_queue,
};
use dragon_core::cpu::CpuStateTrait;
use dragon_core::cpu::m6809::{BurstReport, M6809, RunLimits, TraceSink};
use dragon_core::cpu::state::M6809State;
use log::{debug, info, trace};

use crate::board::{Board, Peripherals, lock};
use crate::keyboard::{Keyboard, Layout};
use crate::pia::Pia6821;
use crate::registry::{MachineEntry, MachineOptions};
use crate::rom_loader::{RomLoadError, RomRegion, RomSet, RomSpec};
use crate::sam::{SAM_BASE, SAM_END, Sam};
use crate::screen::{TEXT_BASE, TEXT_END, TextScreen};

/// 14.31818 MHz crystal divided by 16.
pub const CPU_CLOCK: u64 = 894_886;

const PIA0_BASE: u16 = 0xFF00;
const PIA1_BASE: u16 = 0xFF20;
const BASIC_BASE: u16 = 0x8000;
const CART_BASE: u16 = 0xC000;
const CART_END: u16 = 0xFEFF;
const VECTORS: u16 = 0xFFF0;

// ---------------------------------------------------------------------------
// ROM sets
// ---------------------------------------------------------------------------

pub static DRAGON32_ROM: RomRegion = RomRegion {
    size: 0x4000,
    entries: &[RomSpec::new("d32.rom", 0x4000, 0x0000).with_crc(&[0xE387_9310])],
};

/// Only the 32K-mode BASIC; the 64K-mode image is not mapped.
pub static DRAGON64_ROM: RomRegion = RomRegion {
    size: 0x4000,
    entries: &[RomSpec::new("d64_1.rom", 0x4000, 0x0000).with_crc(&[0x60A4_634C])],
};

/// Extended Color BASIC at $8000, Color BASIC at $A000.
pub static COCO_ROM: RomRegion = RomRegion {
    size: 0x4000,
    entries: &[
        RomSpec::new("extbas11.rom", 0x2000, 0x0000)
            .with_crc(&[0xA82A_6254])
            .optional(),
        RomSpec::new("bas13.rom", 0x2000, 0x2000).with_crc(&[0xD8F4_D15E]),
    ],
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragonModel {
    Dragon32,
    Dragon64,
    CoCo,
}

impl DragonModel {
    pub fn name(self) -> &'static str {
        match self {
            DragonModel::Dragon32 => "dragon32",
            DragonModel::Dragon64 => "dragon64",
            DragonModel::CoCo => "coco",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            DragonModel::CoCo => Layout::CoCo,
            _ => Layout::Dragon,
        }
    }

    /// PAL Dragons run 50 fields a second, the NTSC CoCo 60.
    pub fn field_rate(self) -> u64 {
        match self {
            DragonModel::CoCo => 60,
            _ => 50,
        }
    }

    pub fn rom_region(self) -> &'static RomRegion {
        match self {
            DragonModel::Dragon32 => &DRAGON32_ROM,
            DragonModel::Dragon64 => &DRAGON64_ROM,
            DragonModel::CoCo => &COCO_ROM,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DragonConfig {
    pub model: DragonModel,
    /// Pulse field sync into PIA-0 CB1 every field.
    pub field_sync: bool,
    pub queue_capacity: usize,
    /// Fields a typed key is held down, then released before the next one.
    pub key_hold_fields: u64,
    pub key_gap_fields: u64,
}

impl Default for DragonConfig {
    fn default() -> Self {
        Self {
            model: DragonModel::Dragon32,
            field_sync: true,
            queue_capacity: 256,
            key_hold_fields: 3,
            key_gap_fields: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Peripherals
// ---------------------------------------------------------------------------

pub struct DragonIo {
    pub pia0: Pia6821,
    pub pia1: Pia6821,
    pub sam: Sam,
    pub keyboard: Keyboard,
    pub screen: TextScreen,
    field_sync: bool,
    field_cycles: u64,
    next_field: u64,
    fields: u64,
}

impl DragonIo {
    fn read_pia0(&mut self, offset: u8) -> u8 {
        if offset == 0 {
            let rows = self.keyboard.rows(self.pia0.output_b());
            self.pia0.set_port_a_input(rows);
        }
        self.pia0.read(offset)
    }

    fn write_pia1(&mut self, offset: u8, value: u8) {
        self.pia1.write(offset, value);
        match offset {
            0 => trace!("DAC <- {:02X}", self.pia1.output_a() >> 2),
            2 => {
                let vdg = self.pia1.output_b();
                debug!(
                    "VDG: {} GM={} CSS={}",
                    if vdg & 0x80 != 0 { "graphics" } else { "text" },
                    (vdg >> 4) & 0x07,
                    (vdg >> 3) & 1
                );
            }
            _ => {}
        }
    }

    /// Fields seen since power-on.
    pub fn fields(&self) -> u64 {
        self.fields
    }
}

impl Peripherals for DragonIo {
    fn tick(&mut self, cycles: u64) {
        while self.field_sync && cycles >= self.next_field {
            // Both edges, so CRB bit 1 picks whichever it wants
            self.pia0.set_cb1(true);
            self.pia0.set_cb1(false);
            self.next_field += self.field_cycles;
            self.fields += 1;
        }
        self.keyboard.update(cycles);
    }

    fn lines(&mut self) -> InterruptState {
        InterruptState {
            irq: self.pia0.irq_a() || self.pia0.irq_b(),
            firq: self.pia1.irq_a() || self.pia1.irq_b(),
            ..InterruptState::default()
        }
    }

    fn reset(&mut self) {
        self.pia0.reset();
        self.pia1.reset();
        self.sam.reset();
        self.keyboard.release_all();
    }
}

// ---------------------------------------------------------------------------
// DragonSystem
// ---------------------------------------------------------------------------

pub struct DragonSystem {
    cpu: M6809,
    board: Board<DragonIo>,
    model: DragonModel,
    input: InputSender,
}

impl DragonSystem {
    /// A machine with empty ROM space. Load ROMs, then [`Machine::reset`].
    pub fn new(config: &DragonConfig) -> Self {
        let model = config.model;
        let (input, receiver) = input_queue(config.queue_capacity);
        let field_cycles = CPU_CLOCK / model.field_rate();

        let mut mem = MemoryBus::new();
        mem.add_ram(0x0000..=0x7FFF);
        mem.add_rom(BASIC_BASE..=CART_END);
        mem.add_rom(VECTORS..=0xFFFF);

        let io = DragonIo {
            pia0: Pia6821::new(),
            pia1: Pia6821::new(),
            sam: Sam::new(),
            keyboard: Keyboard::new(
                model.layout(),
                receiver,
                config.key_hold_fields * field_cycles,
                config.key_gap_fields * field_cycles,
            ),
            screen: TextScreen::new(),
            field_sync: config.field_sync,
            field_cycles,
            next_field: field_cycles,
            fields: 0,
        };

        let mut sys = Self {
            cpu: M6809::new(),
            board: Board::new(mem, io),
            model,
            input,
        };
        sys.map_io();
        sys
    }

    fn map_io(&mut self) {
        let mem = &mut self.board.mem;

        let io = self.board.io.clone();
        mem.register_read_callback_range(
            PIA0_BASE..=PIA0_BASE + 0x1F,
            Box::new(move |_, _, addr, _| lock(&io).read_pia0((addr & 0x03) as u8)),
        );
        let io = self.board.io.clone();
        mem.register_write_callback_range(
            PIA0_BASE..=PIA0_BASE + 0x1F,
            Box::new(move |_, _, addr, value| {
                lock(&io).pia0.write((addr & 0x03) as u8, value);
                None
            }),
        );

        let io = self.board.io.clone();
        mem.register_read_callback_range(
            PIA1_BASE..=PIA1_BASE + 0x1F,
            Box::new(move |_, _, addr, _| lock(&io).pia1.read((addr & 0x03) as u8)),
        );
        let io = self.board.io.clone();
        mem.register_write_callback_range(
            PIA1_BASE..=PIA1_BASE + 0x1F,
            Box::new(move |_, _, addr, value| {
                lock(&io).write_pia1((addr & 0x03) as u8, value);
                None
            }),
        );

        let io = self.board.io.clone();
        mem.register_write_callback_range(
            SAM_BASE..=SAM_END,
            Box::new(move |_, _, addr, _| {
                lock(&io).sam.write(addr);
                None
            }),
        );

        let io = self.board.io.clone();
        mem.register_write_callback_range(
            TEXT_BASE..=TEXT_END,
            Box::new(move |_, _, addr, value| {
                lock(&io).screen.write(addr, value);
                Some(value)
            }),
        );
    }

    /// Chain a host hook onto video RAM writes. It sees
    /// `(cycles, op_addr, addr, value)` and returns the byte to store.
    pub fn add_display_hook(&mut self, mut hook: Box<dyn FnMut(u64, u16, u16, u8) -> u8 + Send>) {
        self.board.mem.register_write_callback_range(
            TEXT_BASE..=TEXT_END,
            Box::new(move |cycles, op_addr, addr, value| Some(hook(cycles, op_addr, addr, value))),
        );
    }

    /// Install BASIC (and mirror its vectors) from a ROM set.
    pub fn load_rom_set(&mut self, rom_set: &RomSet, verify: bool) -> Result<(), RomLoadError> {
        let region = self.model.rom_region();
        let image = if verify {
            region.load(rom_set)?
        } else {
            region.load_skip_checksums(rom_set)?
        };
        self.load_basic(&image)
    }

    /// Install a 16 KiB BASIC image at $8000.
    pub fn load_basic(&mut self, image: &[u8]) -> Result<(), RomLoadError> {
        if image.len() != 0x4000 {
            return Err(RomLoadError::SizeMismatch {
                file: "BASIC".to_string(),
                expected: 0x4000,
                actual: image.len(),
            });
        }
        self.board.mem.load(BASIC_BASE, image)?;
        self.board.mem.load(VECTORS, &image[0x3FF0..])?;
        info!("{}: BASIC loaded", self.model.name());
        Ok(())
    }

    /// Install a cartridge image at $C000.
    pub fn load_cartridge(&mut self, image: &[u8]) -> Result<(), RomLoadError> {
        let max = (CART_END - CART_BASE) as usize + 1;
        if image.len() > max {
            return Err(RomLoadError::SizeMismatch {
                file: "cartridge".to_string(),
                expected: max,
                actual: image.len(),
            });
        }
        self.board.mem.load(CART_BASE, image)?;
        Ok(())
    }

    pub fn model(&self) -> DragonModel {
        self.model
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

    pub fn io(&self) -> std::sync::MutexGuard<'_, DragonIo> {
        self.board.io()
    }
}

impl Machine for DragonSystem {
    fn name(&self) -> &'static str {
        self.model.name()
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

    fn take_display(&mut self) -> Option<Vec<String>> {
        self.board.io().screen.take_if_changed()
    }
}

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create(
    model: DragonModel,
    rom_set: &RomSet,
    options: &MachineOptions,
) -> Result<Box<dyn Machine>, RomLoadError> {
    let config = DragonConfig {
        model,
        queue_capacity: options.queue_capacity,
        ..DragonConfig::default()
    };
    let mut sys = DragonSystem::new(&config);
    sys.load_rom_set(rom_set, options.verify_checksums)?;
    sys.reset();
    Ok(Box::new(sys))
}

fn create_dragon32(rom_set: &RomSet, options: &MachineOptions) -> Result<Box<dyn Machine>, RomLoadError> {
    create(DragonModel::Dragon32, rom_set, options)
}

fn create_dragon64(rom_set: &RomSet, options: &MachineOptions) -> Result<Box<dyn Machine>, RomLoadError> {
    create(DragonModel::Dragon64, rom_set, options)
}

fn create_coco(rom_set: &RomSet, options: &MachineOptions) -> Result<Box<dyn Machine>, RomLoadError> {
    create(DragonModel::CoCo, rom_set, options)
}

inventory::submit! {
    MachineEntry::new("dragon32", "Dragon 32 (32K, PAL)", &DRAGON32_ROM, create_dragon32)
}

inventory::submit! {
    MachineEntry::new("dragon64", "Dragon 64 in 32K mode", &DRAGON64_ROM, create_dragon64)
}

inventory::submit! {
    MachineEntry::new("coco", "Tandy Color Computer (NTSC)", &COCO_ROM, create_coco)
}
