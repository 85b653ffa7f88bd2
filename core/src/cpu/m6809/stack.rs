use super::opcodes::Stack;
use super::{CcFlag, M6809, WaitState};
use crate::core::{Bus, BusMaster};

// PSH/PUL post-byte bits, PC first when pushing:
// PC(7) U/S(6) Y(5) X(4) DP(3) B(2) A(1) CC(0).
// Both stacks grow downward; 16-bit values are pushed low byte first so the
// high byte ends up at the lower address.

/// Post-byte covering every register: what SWI and IRQ/NMI stack.
pub(crate) const ENTIRE_STATE: u8 = 0xFF;
/// PC and CC only: what FIRQ stacks.
pub(crate) const PC_AND_CC: u8 = 0x81;

impl M6809 {
    fn stack_ptr(&self, stack: Stack) -> u16 {
        match stack {
            Stack::S => self.s,
            Stack::U => self.u,
        }
    }

    fn set_stack_ptr(&mut self, stack: Stack, val: u16) {
        match stack {
            Stack::S => self.s = val,
            Stack::U => self.u = val,
        }
    }

    fn push_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        val: u8,
    ) {
        let sp = self.stack_ptr(stack).wrapping_sub(1);
        self.set_stack_ptr(stack, sp);
        bus.write(master, sp, val);
    }

    fn push_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        val: u16,
    ) {
        let [hi, lo] = val.to_be_bytes();
        self.push_byte(bus, master, stack, lo);
        self.push_byte(bus, master, stack, hi);
    }

    fn pull_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
    ) -> u8 {
        let sp = self.stack_ptr(stack);
        let val = bus.read(master, sp);
        self.set_stack_ptr(stack, sp.wrapping_add(1));
        val
    }

    fn pull_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
    ) -> u16 {
        let hi = self.pull_byte(bus, master, stack);
        let lo = self.pull_byte(bus, master, stack);
        u16::from_be_bytes([hi, lo])
    }

    pub(crate) fn push_word_s<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        val: u16,
    ) {
        self.push_word(bus, master, Stack::S, val);
    }

    pub(crate) fn pull_word_s<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u16 {
        self.pull_word(bus, master, Stack::S)
    }

    /// Push the registers selected by `mask` onto `stack`.
    /// Returns the number of bytes pushed.
    pub(crate) fn push_registers<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        mask: u8,
    ) -> u64 {
        let mut bytes = 0;
        if mask & 0x80 != 0 {
            self.push_word(bus, master, stack, self.pc);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            // the "other" stack pointer
            let other = match stack {
                Stack::S => self.u,
                Stack::U => self.s,
            };
            self.push_word(bus, master, stack, other);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.push_word(bus, master, stack, self.y);
            bytes += 2;
        }
        if mask & 0x10 != 0 {
            self.push_word(bus, master, stack, self.x);
            bytes += 2;
        }
        if mask & 0x08 != 0 {
            self.push_byte(bus, master, stack, self.dp);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.push_byte(bus, master, stack, self.b);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.push_byte(bus, master, stack, self.a);
            bytes += 1;
        }
        if mask & 0x01 != 0 {
            self.push_byte(bus, master, stack, self.cc);
            bytes += 1;
        }
        bytes
    }

    /// Pull the registers selected by `mask` from `stack`, CC first.
    /// Returns the number of bytes pulled.
    pub(crate) fn pull_registers<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        mask: u8,
    ) -> u64 {
        let mut bytes = 0;
        if mask & 0x01 != 0 {
            self.cc = self.pull_byte(bus, master, stack);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.a = self.pull_byte(bus, master, stack);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.b = self.pull_byte(bus, master, stack);
            bytes += 1;
        }
        if mask & 0x08 != 0 {
            self.dp = self.pull_byte(bus, master, stack);
            bytes += 1;
        }
        if mask & 0x10 != 0 {
            self.x = self.pull_word(bus, master, stack);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.y = self.pull_word(bus, master, stack);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            let other = self.pull_word(bus, master, stack);
            match stack {
                Stack::S => self.u = other,
                Stack::U => self.s = other,
            }
            bytes += 2;
        }
        if mask & 0x80 != 0 {
            self.pc = self.pull_word(bus, master, stack);
            bytes += 2;
        }
        bytes
    }

    /// PSHS/PSHU: one extra cycle per byte pushed.
    pub(crate) fn op_push<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        mask: u8,
    ) {
        self.cycles += self.push_registers(bus, master, stack, mask);
    }

    /// PULS/PULU: one extra cycle per byte pulled.
    pub(crate) fn op_pull<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: Stack,
        mask: u8,
    ) {
        self.cycles += self.pull_registers(bus, master, stack, mask);
    }

    /// Set E and stack every register on S (SWI, IRQ, NMI, CWAI).
    pub(crate) fn push_entire_state<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.set_flag(CcFlag::E, true);
        self.push_registers(bus, master, Stack::S, ENTIRE_STATE);
    }

    /// SWI/SWI2/SWI3. Only SWI masks interrupts.
    pub(crate) fn op_swi<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        vector: u16,
        mask_interrupts: bool,
    ) {
        self.push_entire_state(bus, master);
        if mask_interrupts {
            self.cc |= CcFlag::I as u8 | CcFlag::F as u8;
        }
        self.pc = self.read_word(bus, master, vector);
    }

    /// RTI: pull CC, then the rest of the state if E was set (9 extra cycles)
    /// or just PC.
    pub(crate) fn op_rti<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.pull_registers(bus, master, Stack::S, 0x01);
        if self.flag(CcFlag::E) {
            self.pull_registers(bus, master, Stack::S, ENTIRE_STATE & !0x01);
            self.cycles += 9;
        } else {
            self.pull_registers(bus, master, Stack::S, 0x80);
        }
    }

    /// CWAI: clear CC bits, stack the entire state and wait for an interrupt.
    pub(crate) fn op_cwai<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        mask: u8,
    ) {
        self.cc &= mask;
        self.push_entire_state(bus, master);
        self.wait = WaitState::Cwai;
    }
}
