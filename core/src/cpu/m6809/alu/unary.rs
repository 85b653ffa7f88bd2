use crate::core::{Bus, BusMaster};
use crate::cpu::m6809::addressing::Operand;
use crate::cpu::m6809::opcodes::{Target, UnaryOp};
use crate::cpu::m6809::{CcFlag, M6809};

impl M6809 {
    // --- Internal Unary Helpers ---

    #[inline]
    fn perform_neg(&mut self, val: u8) -> u8 {
        let r = 0u16.wrapping_sub(val as u16);
        self.update_nzvc8(0, val as u16, r);
        r as u8
    }

    #[inline]
    fn perform_com(&mut self, val: u8) -> u8 {
        let result = !val;
        self.update_nz0_8(result);
        self.set_flag(CcFlag::C, true);
        result
    }

    #[inline]
    fn perform_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.update_nz8(result);
        self.set_flag(CcFlag::V, val == 0x7F);
        result
    }

    #[inline]
    fn perform_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.update_nz8(result);
        self.set_flag(CcFlag::V, val == 0x80);
        result
    }

    fn perform_unary(&mut self, kind: UnaryOp, val: u8) -> u8 {
        match kind {
            UnaryOp::Neg => self.perform_neg(val),
            UnaryOp::Com => self.perform_com(val),
            UnaryOp::Lsr => self.perform_lsr(val),
            UnaryOp::Ror => self.perform_ror(val),
            UnaryOp::Asr => self.perform_asr(val),
            UnaryOp::Asl => self.perform_asl(val),
            UnaryOp::Rol => self.perform_rol(val),
            UnaryOp::Dec => self.perform_dec(val),
            UnaryOp::Inc => self.perform_inc(val),
            UnaryOp::Tst => {
                self.update_nz0_8(val);
                val
            }
            UnaryOp::Clr => {
                self.update_0100();
                0
            }
        }
    }

    /// Read-modify-write on A, B or memory. TST never writes back.
    pub(crate) fn op_unary<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        kind: UnaryOp,
        target: Target,
        operand: Operand,
    ) {
        match target {
            Target::A => self.a = self.perform_unary(kind, self.a),
            Target::B => self.b = self.perform_unary(kind, self.b),
            Target::Mem => {
                let ea = operand.addr();
                let val = bus.read(master, ea);
                let result = self.perform_unary(kind, val);
                if kind != UnaryOp::Tst {
                    bus.write(master, ea, result);
                }
            }
        }
    }

    /// DAA: decimal-adjust A after a BCD add. V is left unchanged.
    pub(crate) fn op_daa(&mut self) {
        let a = self.a;
        let lsn = a & 0x0F;
        let msn = a & 0xF0;
        let carry = self.flag(CcFlag::C);
        let half = self.flag(CcFlag::H);

        let mut correction: u8 = 0;
        let mut new_carry = carry;
        if lsn > 0x09 || half {
            correction |= 0x06;
        }
        if msn > 0x90 || carry || (msn > 0x80 && lsn > 0x09) {
            correction |= 0x60;
            new_carry = true;
        }

        let (result, overflowed) = a.overflowing_add(correction);
        self.a = result;
        self.update_nz8(result);
        self.set_flag(CcFlag::C, new_carry || overflowed);
    }

    /// SEX: sign-extend B into A.
    pub(crate) fn op_sex(&mut self) {
        self.a = if self.b & 0x80 != 0 { 0xFF } else { 0x00 };
        self.update_nz16(self.get_d());
    }
}
