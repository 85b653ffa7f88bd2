use super::opcodes::{Acc, Wide};
use super::{CcFlag, M6809};
use crate::core::{Bus, BusMaster};

impl M6809 {
    pub(crate) fn op_load(&mut self, acc: Acc, val: u8) {
        self.set_acc(acc, val);
        self.update_nz0_8(val);
    }

    pub(crate) fn op_store<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        acc: Acc,
        ea: u16,
    ) {
        let val = self.acc(acc);
        bus.write(master, ea, val);
        self.update_nz0_8(val);
    }

    /// LDD/LDX/LDY/LDU/LDS. Loading S arms NMI.
    pub(crate) fn op_load_word(&mut self, reg: Wide, val: u16) {
        self.set_wide(reg, val);
        self.update_nz0_16(val);
    }

    pub(crate) fn op_store_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        reg: Wide,
        ea: u16,
    ) {
        let val = self.wide(reg);
        self.write_word(bus, master, ea, val);
        self.update_nz0_16(val);
    }

    /// LEAX/LEAY set Z from the result; LEAU/LEAS touch no flags.
    pub(crate) fn op_lea(&mut self, reg: Wide, ea: u16) {
        match reg {
            Wide::X | Wide::Y => {
                self.set_wide(reg, ea);
                self.set_flag(CcFlag::Z, ea == 0);
            }
            // only LDS, TFR and EXG arm NMI
            Wide::S => self.s = ea,
            _ => self.set_wide(reg, ea),
        }
    }
}
