use super::{M6809, Register};

// TFR/EXG post-byte: source in the high nibble, destination in the low.
// Codes 0-7 name 16-bit registers, 8-F 8-bit ones.
//
// Mixed widths: an 8-bit value moving into a 16-bit register arrives as
// $FF00 | value, a 16-bit value moving into an 8-bit register is cut to its
// low byte. Undefined codes read as all ones and ignore writes.

fn is_wide(code: u8) -> bool {
    code & 0x08 == 0
}

impl M6809 {
    fn transfer_source(&self, code: u8, wide_dest: bool) -> u16 {
        let Some(reg) = Register::from_code(code) else {
            return if wide_dest { 0xFFFF } else { 0x00FF };
        };
        let val = self.get(reg);
        match (reg.width() == 16, wide_dest) {
            (false, true) => 0xFF00 | val,
            (true, false) => val & 0x00FF,
            _ => val,
        }
    }

    fn transfer_dest(&mut self, code: u8, val: u16) {
        if let Some(reg) = Register::from_code(code) {
            self.set(reg, val as u32);
            if reg == Register::S {
                self.nmi_armed = true;
            }
        }
    }

    pub(crate) fn op_tfr(&mut self, post: u8) {
        let (src, dst) = (post >> 4, post & 0x0F);
        let val = self.transfer_source(src, is_wide(dst));
        self.transfer_dest(dst, val);
    }

    pub(crate) fn op_exg(&mut self, post: u8) {
        let (r1, r2) = (post >> 4, post & 0x0F);
        let v1 = self.transfer_source(r1, is_wide(r2));
        let v2 = self.transfer_source(r2, is_wide(r1));
        self.transfer_dest(r1, v2);
        self.transfer_dest(r2, v1);
    }
}
