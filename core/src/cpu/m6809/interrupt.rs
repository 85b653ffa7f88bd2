//! Reset and interrupt acknowledgement.
//!
//! Pending interrupts come from two places: lines driven by the bus
//! (sampled before every instruction) and requests latched through
//! [`Cpu::signal_interrupt`](crate::cpu::Cpu::signal_interrupt). IRQ and FIRQ
//! are level sensitive on the bus; NMI and RESET fire on a rising edge.
//! Latched requests stay pending until acknowledged.
//!
//! Priority is NMI, then FIRQ, then IRQ. NMI is ignored until S has been
//! loaded once after reset.

use log::debug;

use super::opcodes::Stack;
use super::stack::PC_AND_CC;
use super::{CcFlag, FIRQ_VECTOR, IRQ_VECTOR, M6809, NMI_VECTOR, RESET_VECTOR, WaitState};
use crate::core::{Bus, BusMaster, bus::InterruptState};

/// Entry cost of IRQ and NMI (entire state stacked).
const ENTRY_CYCLES_ENTIRE: u64 = 19;
/// Entry cost of FIRQ (PC and CC stacked).
const ENTRY_CYCLES_FAST: u64 = 10;
/// Vector fetch after CWAI, where the state is already on the stack.
const ENTRY_CYCLES_CWAI: u64 = 7;

impl M6809 {
    /// Hard reset: clear every register including CC, disarm NMI and load
    /// PC from the reset vector. The cycle counter keeps running.
    pub fn reset<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.a = 0;
        self.b = 0;
        self.dp = 0;
        self.x = 0;
        self.y = 0;
        self.u = 0;
        self.s = 0;
        self.cc = 0;
        self.wait = WaitState::Running;
        self.latched = InterruptState::default();
        self.nmi_armed = false;
        self.pc = self.read_word(bus, master, RESET_VECTOR);
        debug!("reset: PC=${:04X}", self.pc);
    }

    /// Merge the bus lines into the pending set and return what is pending.
    pub(crate) fn sample_lines(&mut self, lines: InterruptState) -> InterruptState {
        if lines.nmi && !self.nmi_line {
            self.latched.nmi = true;
        }
        if lines.reset && !self.reset_line {
            self.latched.reset = true;
        }
        self.nmi_line = lines.nmi;
        self.reset_line = lines.reset;

        InterruptState {
            reset: self.latched.reset,
            nmi: self.latched.nmi,
            firq: self.latched.firq || lines.firq,
            irq: self.latched.irq || lines.irq,
        }
    }

    /// Leaving SYNC on a masked interrupt consumes its latched request.
    pub(crate) fn acknowledge_masked(&mut self, pending: InterruptState) {
        if pending.firq && self.flag(CcFlag::F) {
            self.latched.firq = false;
        }
        if pending.irq && self.flag(CcFlag::I) {
            self.latched.irq = false;
        }
        if pending.nmi && !self.nmi_armed {
            self.latched.nmi = false;
        }
    }

    /// Take the highest-priority unmasked interrupt, if any.
    pub(crate) fn service_interrupts<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        pending: InterruptState,
    ) -> bool {
        if pending.nmi {
            // an NMI arriving before the first LDS is lost
            self.latched.nmi = false;
            if self.nmi_armed {
                let mask = CcFlag::I as u8 | CcFlag::F as u8;
                self.enter_interrupt(bus, master, true, mask, NMI_VECTOR);
                return true;
            }
        }
        if pending.firq && !self.flag(CcFlag::F) {
            self.latched.firq = false;
            self.enter_interrupt(bus, master, false, CcFlag::I as u8 | CcFlag::F as u8, FIRQ_VECTOR);
            return true;
        }
        if pending.irq && !self.flag(CcFlag::I) {
            self.latched.irq = false;
            self.enter_interrupt(bus, master, true, CcFlag::I as u8, IRQ_VECTOR);
            return true;
        }
        false
    }

    fn enter_interrupt<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        entire: bool,
        mask: u8,
        vector: u16,
    ) {
        if self.wait == WaitState::Cwai {
            // CWAI already stacked everything with E set
            self.cycles += ENTRY_CYCLES_CWAI;
        } else if entire {
            self.push_entire_state(bus, master);
            self.cycles += ENTRY_CYCLES_ENTIRE;
        } else {
            self.set_flag(CcFlag::E, false);
            self.push_registers(bus, master, Stack::S, PC_AND_CC);
            self.cycles += ENTRY_CYCLES_FAST;
        }
        self.wait = WaitState::Running;
        self.cc |= mask;
        self.pc = self.read_word(bus, master, vector);
    }
}
