mod addressing;
mod alu;
mod branch;
mod interrupt;
mod load_store;
pub mod opcodes;
mod registers;
mod run;
mod stack;
mod trace;
mod transfer;

pub use alu::{half_carry8, overflow8, overflow16};
pub use opcodes::{Opcode, lookup};
pub use registers::Register;
pub use run::{BurstReport, RunLimits};
pub use trace::{TraceRecord, TraceSink, format_cc};

use log::warn;

use crate::core::{Bus, BusMaster, bus::InterruptState};
use crate::cpu::{
    Cpu,
    state::{CpuStateTrait, M6809State},
};
use addressing::Operand;
use opcodes::Instr;

pub const RESET_VECTOR: u16 = 0xFFFE;
pub const NMI_VECTOR: u16 = 0xFFFC;
pub const SWI_VECTOR: u16 = 0xFFFA;
pub const IRQ_VECTOR: u16 = 0xFFF8;
pub const FIRQ_VECTOR: u16 = 0xFFF6;
pub const SWI2_VECTOR: u16 = 0xFFF4;
pub const SWI3_VECTOR: u16 = 0xFFF2;

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum CcFlag {
    C = 0x01, // Carry
    V = 0x02, // Overflow
    Z = 0x04, // Zero
    N = 0x08, // Negative
    I = 0x10, // IRQ mask
    H = 0x20, // Half carry
    F = 0x40, // FIRQ mask
    E = 0x80, // Entire
}

/// What the CPU is doing between instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WaitState {
    #[default]
    Running,
    /// SYNC: halted until any interrupt line is asserted.
    Sync,
    /// CWAI: state already stacked, waiting for an unmasked interrupt.
    Cwai,
}

/// Why an instruction could not be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalKind {
    /// No instruction behind this (possibly prefixed) opcode.
    Opcode,
    /// The opcode is valid but its indexed post-byte is not.
    IndexedPostbyte(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalInstruction {
    /// Address of the first byte of the offending instruction.
    pub addr: u16,
    /// `$00..$FF`, or `$10xx`/`$11xx` for prefixed opcodes.
    pub opcode: u16,
    pub kind: IllegalKind,
}

/// What the CPU does after reporting an illegal instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IllegalPolicy {
    /// Continue with the next byte.
    #[default]
    Skip,
    /// Take the SWI vector, as a trap.
    Swi,
}

pub type IllegalObserver = Box<dyn FnMut(&IllegalInstruction) + Send>;

/// Bytes consumed by the instruction being executed (prefix included).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Fetched {
    bytes: [u8; 5],
    len: usize,
}

impl Fetched {
    fn clear(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, byte: u8) {
        if self.len < self.bytes.len() {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

pub struct M6809 {
    // Registers (a,b,x,y,u,s,pc,cc)
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
    pub cc: u8,

    pub(crate) cycles: u64,
    pub(crate) instructions: u64,
    pub(crate) wait: WaitState,

    // Interrupts latched by the host, cleared on acknowledgement
    pub(crate) latched: InterruptState,
    // Previous level of the bus NMI and RESET lines (both edge triggered)
    pub(crate) nmi_line: bool,
    pub(crate) reset_line: bool,
    pub(crate) nmi_armed: bool,

    pub(crate) last_op_addr: u16,
    pub(crate) fetched: Fetched,

    trace: Option<TraceSink>,
    illegal_observer: Option<IllegalObserver>,
    illegal_policy: IllegalPolicy,
}

impl Default for M6809 {
    fn default() -> Self {
        Self::new()
    }
}

impl M6809 {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            dp: 0,
            x: 0,
            y: 0,
            u: 0,
            s: 0,
            pc: 0,
            cc: 0,
            cycles: 0,
            instructions: 0,
            wait: WaitState::Running,
            latched: InterruptState::default(),
            nmi_line: false,
            reset_line: false,
            nmi_armed: false,
            last_op_addr: 0,
            fetched: Fetched::default(),
            trace: None,
            illegal_observer: None,
            illegal_policy: IllegalPolicy::Skip,
        }
    }

    pub fn get_d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }

    pub fn set_d(&mut self, val: u16) {
        let bytes = val.to_be_bytes();
        self.a = bytes[0];
        self.b = bytes[1];
    }

    #[inline]
    pub(crate) fn set_flag(&mut self, flag: CcFlag, set: bool) {
        if set {
            self.cc |= flag as u8
        } else {
            self.cc &= !(flag as u8)
        }
    }

    #[inline]
    pub fn flag(&self, flag: CcFlag) -> bool {
        self.cc & (flag as u8) != 0
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Instructions executed since power-on.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn wait_state(&self) -> WaitState {
        self.wait
    }

    pub fn sync_flag(&self) -> bool {
        self.wait == WaitState::Sync
    }

    pub fn cwai_flag(&self) -> bool {
        self.wait == WaitState::Cwai
    }

    /// NMI is ignored until the program first loads S.
    pub fn nmi_armed(&self) -> bool {
        self.nmi_armed
    }

    /// Address of the first byte of the last instruction started.
    pub fn last_op_addr(&self) -> u16 {
        self.last_op_addr
    }

    pub fn set_trace_sink(&mut self, sink: Option<TraceSink>) {
        self.trace = sink;
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    pub fn set_illegal_observer(&mut self, observer: Option<IllegalObserver>) {
        self.illegal_observer = observer;
    }

    pub fn set_illegal_policy(&mut self, policy: IllegalPolicy) {
        self.illegal_policy = policy;
    }

    /// Execute one instruction, or service one interrupt, or idle one cycle
    /// while waiting in SYNC/CWAI. Returns the cycles consumed.
    pub fn step<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        let start = self.cycles;
        let lines = bus.check_interrupts(master);
        let pending = self.sample_lines(lines);

        if pending.reset {
            self.latched.reset = false;
            self.reset(bus, master);
            return (self.cycles - start) as u32;
        }

        match self.wait {
            WaitState::Sync => {
                if !(pending.nmi || pending.firq || pending.irq) {
                    self.cycles += 1;
                    bus.idle_cycle(self.cycles);
                    return 1;
                }
                self.wait = WaitState::Running;
                self.acknowledge_masked(pending);
            }
            WaitState::Cwai => {
                if !self.service_interrupts(bus, master, pending) {
                    self.cycles += 1;
                    bus.idle_cycle(self.cycles);
                    return 1;
                }
                return (self.cycles - start) as u32;
            }
            WaitState::Running => {}
        }

        if !self.service_interrupts(bus, master, pending) {
            self.execute_next(bus, master);
        }
        (self.cycles - start) as u32
    }

    #[inline]
    pub(crate) fn fetch_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u8 {
        let byte = bus.read(master, self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.fetched.push(byte);
        byte
    }

    #[inline]
    pub(crate) fn fetch_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u16 {
        let hi = self.fetch_byte(bus, master);
        let lo = self.fetch_byte(bus, master);
        u16::from_be_bytes([hi, lo])
    }

    #[inline]
    pub(crate) fn read_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        addr: u16,
    ) -> u16 {
        let hi = bus.read(master, addr);
        let lo = bus.read(master, addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    #[inline]
    pub(crate) fn write_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        addr: u16,
        val: u16,
    ) {
        let [hi, lo] = val.to_be_bytes();
        bus.write(master, addr, hi);
        bus.write(master, addr.wrapping_add(1), lo);
    }

    fn execute_next<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        let op_addr = self.pc;
        self.last_op_addr = op_addr;
        bus.begin_instruction(self.cycles, op_addr);
        self.fetched.clear();

        let mut code = self.fetch_byte(bus, master) as u16;
        if code == 0x10 || code == 0x11 {
            code = (code << 8) | self.fetch_byte(bus, master) as u16;
        }

        let Some(op) = opcodes::lookup(code) else {
            self.illegal(bus, master, op_addr, code, IllegalKind::Opcode);
            return;
        };

        let operand = match self.resolve_operand(bus, master, op.mode) {
            Ok(operand) => operand,
            Err(postbyte) => {
                self.illegal(bus, master, op_addr, code, IllegalKind::IndexedPostbyte(postbyte));
                return;
            }
        };

        self.cycles += op.cycles as u64;
        self.execute(bus, master, op.instr, operand);
        self.instructions += 1;
        self.emit_trace(op_addr, op.mnemonic);
    }

    fn execute<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        instr: Instr,
        operand: Operand,
    ) {
        match instr {
            Instr::Unary(kind, target) => self.op_unary(bus, master, kind, target, operand),
            Instr::Alu(kind, acc) => {
                let m = self.operand_byte(bus, master, operand);
                self.op_alu(kind, acc, m);
            }
            Instr::Load(acc) => {
                let m = self.operand_byte(bus, master, operand);
                self.op_load(acc, m);
            }
            Instr::Store(acc) => self.op_store(bus, master, acc, operand.addr()),
            Instr::AluWord(kind, reg) => {
                let m = self.operand_word(bus, master, operand);
                self.op_alu_word(kind, reg, m);
            }
            Instr::LoadWord(reg) => {
                let m = self.operand_word(bus, master, operand);
                self.op_load_word(reg, m);
            }
            Instr::StoreWord(reg) => self.op_store_word(bus, master, reg, operand.addr()),
            Instr::Lea(reg) => self.op_lea(reg, operand.addr()),
            Instr::Branch(cond) => self.op_branch(cond, operand.addr()),
            Instr::LongBranch(cond) => self.op_long_branch(cond, operand.addr()),
            Instr::Bsr | Instr::Jsr => self.op_jsr(bus, master, operand.addr()),
            Instr::Jmp => self.pc = operand.addr(),
            Instr::Rts => self.op_rts(bus, master),
            Instr::Push(stack) => self.op_push(bus, master, stack, operand.byte()),
            Instr::Pull(stack) => self.op_pull(bus, master, stack, operand.byte()),
            Instr::Tfr => self.op_tfr(operand.byte()),
            Instr::Exg => self.op_exg(operand.byte()),
            Instr::Nop => {}
            Instr::Sync => self.wait = WaitState::Sync,
            Instr::Daa => self.op_daa(),
            Instr::Orcc => self.cc |= operand.byte(),
            Instr::Andcc => self.cc &= operand.byte(),
            Instr::Sex => self.op_sex(),
            Instr::Abx => self.x = self.x.wrapping_add(self.b as u16),
            Instr::Mul => self.op_mul(),
            Instr::Rti => self.op_rti(bus, master),
            Instr::Cwai => self.op_cwai(bus, master, operand.byte()),
            Instr::Swi => self.op_swi(bus, master, SWI_VECTOR, true),
            Instr::Swi2 => self.op_swi(bus, master, SWI2_VECTOR, false),
            Instr::Swi3 => self.op_swi(bus, master, SWI3_VECTOR, false),
        }
    }

    fn illegal<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        addr: u16,
        opcode: u16,
        kind: IllegalKind,
    ) {
        let event = IllegalInstruction { addr, opcode, kind };
        match kind {
            IllegalKind::Opcode => warn!("illegal opcode ${opcode:02X} at ${addr:04X}"),
            IllegalKind::IndexedPostbyte(post) => {
                warn!("illegal indexed post-byte ${post:02X} (opcode ${opcode:02X}) at ${addr:04X}")
            }
        }
        if let Some(observer) = self.illegal_observer.as_mut() {
            observer(&event);
        }

        self.cycles += 2;
        self.instructions += 1;
        self.emit_trace(addr, "???");

        if self.illegal_policy == IllegalPolicy::Swi {
            self.cycles += 19;
            self.op_swi(bus, master, SWI_VECTOR, true);
        }
    }

    fn emit_trace(&mut self, pc: u16, mnemonic: &'static str) {
        if self.trace.is_none() {
            return;
        }
        let record = TraceRecord::capture(self, pc, mnemonic);
        if let Some(sink) = self.trace.as_mut() {
            sink(&record);
        }
    }
}

impl Cpu for M6809 {
    fn signal_interrupt(&mut self, int: InterruptState) {
        self.latched = self.latched.merge(int);
    }

    fn is_sleeping(&self) -> bool {
        self.wait != WaitState::Running
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl CpuStateTrait for M6809 {
    type Snapshot = M6809State;

    fn snapshot(&self) -> M6809State {
        M6809State {
            a: self.a,
            b: self.b,
            dp: self.dp,
            x: self.x,
            y: self.y,
            u: self.u,
            s: self.s,
            pc: self.pc,
            cc: self.cc,
        }
    }
}
