use crate::cpu::m6809::opcodes::{Wide, WordOp};
use crate::cpu::m6809::{CcFlag, M6809};

impl M6809 {
    #[inline]
    pub(crate) fn wide(&self, reg: Wide) -> u16 {
        match reg {
            Wide::D => self.get_d(),
            Wide::X => self.x,
            Wide::Y => self.y,
            Wide::U => self.u,
            Wide::S => self.s,
        }
    }

    /// Writing S (by any means) arms NMI.
    #[inline]
    pub(crate) fn set_wide(&mut self, reg: Wide, val: u16) {
        match reg {
            Wide::D => self.set_d(val),
            Wide::X => self.x = val,
            Wide::Y => self.y = val,
            Wide::U => self.u = val,
            Wide::S => {
                self.s = val;
                self.nmi_armed = true;
            }
        }
    }

    /// ADDD, SUBD and the 16-bit compares (CMPD/X/Y/U/S).
    pub(crate) fn op_alu_word(&mut self, kind: WordOp, reg: Wide, m: u16) {
        let (a, b) = (self.wide(reg) as u32, m as u32);
        match kind {
            WordOp::Add => {
                let r = a + b;
                self.update_nzvc16(a, b, r);
                self.set_wide(reg, r as u16);
            }
            WordOp::Sub => {
                let r = a.wrapping_sub(b);
                self.update_nzvc16(a, b, r);
                self.set_wide(reg, r as u16);
            }
            WordOp::Cmp => {
                let r = a.wrapping_sub(b);
                self.update_nzvc16(a, b, r);
            }
        }
    }

    /// MUL: D = A * B (unsigned). Z from the 16-bit result, C = bit 7 of B.
    pub(crate) fn op_mul(&mut self) {
        let result = self.a as u16 * self.b as u16;
        self.set_d(result);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::C, result & 0x8000 != 0);
    }
}
