use crate::cpu::m6809::M6809;
use crate::cpu::m6809::opcodes::{Acc, AluOp};

impl M6809 {
    #[inline]
    pub(crate) fn acc(&self, acc: Acc) -> u8 {
        match acc {
            Acc::A => self.a,
            Acc::B => self.b,
        }
    }

    #[inline]
    pub(crate) fn set_acc(&mut self, acc: Acc, val: u8) {
        match acc {
            Acc::A => self.a = val,
            Acc::B => self.b = val,
        }
    }

    /// Two-operand 8-bit ALU instruction: `acc <- acc op m`.
    /// CMP and BIT only set flags.
    pub(crate) fn op_alu(&mut self, kind: AluOp, acc: Acc, m: u8) {
        let a = self.acc(acc);
        let (wa, wm) = (a as u16, m as u16);
        match kind {
            AluOp::Add => {
                let r = wa + wm;
                self.update_hnzvc8(wa, wm, r);
                self.set_acc(acc, r as u8);
            }
            AluOp::Adc => {
                let r = wa + wm + self.carry() as u16;
                self.update_hnzvc8(wa, wm, r);
                self.set_acc(acc, r as u8);
            }
            AluOp::Sub => {
                let r = wa.wrapping_sub(wm);
                self.update_nzvc8(wa, wm, r);
                self.set_acc(acc, r as u8);
            }
            AluOp::Sbc => {
                let r = wa.wrapping_sub(wm).wrapping_sub(self.carry() as u16);
                self.update_nzvc8(wa, wm, r);
                self.set_acc(acc, r as u8);
            }
            AluOp::Cmp => {
                let r = wa.wrapping_sub(wm);
                self.update_nzvc8(wa, wm, r);
            }
            AluOp::And => {
                let r = a & m;
                self.update_nz0_8(r);
                self.set_acc(acc, r);
            }
            AluOp::Bit => self.update_nz0_8(a & m),
            AluOp::Eor => {
                let r = a ^ m;
                self.update_nz0_8(r);
                self.set_acc(acc, r);
            }
            AluOp::Or => {
                let r = a | m;
                self.update_nz0_8(r);
                self.set_acc(acc, r);
            }
        }
    }
}
