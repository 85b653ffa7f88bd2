use super::opcodes::Cond;
use super::{CcFlag, M6809};
use crate::core::{Bus, BusMaster};

impl M6809 {
    /// Evaluate a branch condition against the current CC.
    pub fn condition(&self, cond: Cond) -> bool {
        let c = self.flag(CcFlag::C);
        let v = self.flag(CcFlag::V);
        let z = self.flag(CcFlag::Z);
        let n = self.flag(CcFlag::N);
        match cond {
            Cond::Always => true,
            Cond::Never => false,
            Cond::Hi => !(c || z),
            Cond::Ls => c || z,
            Cond::Cc => !c,
            Cond::Cs => c,
            Cond::Ne => !z,
            Cond::Eq => z,
            Cond::Vc => !v,
            Cond::Vs => v,
            Cond::Pl => !n,
            Cond::Mi => n,
            Cond::Ge => n == v,
            Cond::Lt => n != v,
            Cond::Gt => !z && n == v,
            Cond::Le => z || n != v,
        }
    }

    pub(crate) fn op_branch(&mut self, cond: Cond, target: u16) {
        if self.condition(cond) {
            self.pc = target;
        }
    }

    /// Long conditional branches take one extra cycle when they fall through;
    /// LBRA does not.
    pub(crate) fn op_long_branch(&mut self, cond: Cond, target: u16) {
        if self.condition(cond) {
            self.pc = target;
        } else if cond != Cond::Always {
            self.cycles += 1;
        }
    }

    /// BSR, LBSR and JSR: push the return address on S and jump.
    pub(crate) fn op_jsr<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        target: u16,
    ) {
        let ret = self.pc;
        self.push_word_s(bus, master, ret);
        self.pc = target;
    }

    pub(crate) fn op_rts<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.pc = self.pull_word_s(bus, master);
    }
}
