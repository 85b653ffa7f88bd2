use crate::cpu::m6809::{CcFlag, M6809};

// Left shifts go through the add flag logic (r = val + val [+ C]), which
// yields V = b7 ^ b6 and C = b7. Right shifts leave V alone.

impl M6809 {
    #[inline]
    pub(super) fn perform_asl(&mut self, val: u8) -> u8 {
        let r = (val as u16) << 1;
        self.update_nzvc8(val as u16, val as u16, r);
        r as u8
    }

    #[inline]
    pub(super) fn perform_rol(&mut self, val: u8) -> u8 {
        let r = ((val as u16) << 1) | self.carry() as u16;
        self.update_nzvc8(val as u16, val as u16, r);
        r as u8
    }

    #[inline]
    pub(super) fn perform_asr(&mut self, val: u8) -> u8 {
        let result = ((val as i8) >> 1) as u8;
        self.update_nz8(result);
        self.set_flag(CcFlag::C, val & 0x01 != 0);
        result
    }

    #[inline]
    pub(super) fn perform_lsr(&mut self, val: u8) -> u8 {
        let result = val >> 1;
        self.update_nz8(result);
        self.set_flag(CcFlag::C, val & 0x01 != 0);
        result
    }

    #[inline]
    pub(super) fn perform_ror(&mut self, val: u8) -> u8 {
        let result = (val >> 1) | (self.carry() << 7);
        self.update_nz8(result);
        self.set_flag(CcFlag::C, val & 0x01 != 0);
        result
    }
}
