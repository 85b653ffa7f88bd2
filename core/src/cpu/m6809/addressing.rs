use super::M6809;
use super::opcodes::AddrMode;
use crate::core::{Bus, BusMaster};

/// A decoded operand, after all operand bytes have been fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    None,
    Imm8(u8),
    Imm16(u16),
    /// Effective address (direct, extended, indexed) or branch target.
    Addr(u16),
}

impl Operand {
    #[inline]
    pub(crate) fn addr(self) -> u16 {
        match self {
            Operand::Addr(ea) => ea,
            Operand::Imm16(v) => v,
            Operand::Imm8(v) => v as u16,
            Operand::None => 0,
        }
    }

    #[inline]
    pub(crate) fn byte(self) -> u8 {
        match self {
            Operand::Imm8(v) => v,
            Operand::Imm16(v) | Operand::Addr(v) => v as u8,
            Operand::None => 0,
        }
    }
}

/// 5-bit two's complement offset from the low bits of an indexed post-byte.
#[inline]
fn offset5(post: u8) -> u16 {
    (((post << 3) as i8) >> 3) as i16 as u16
}

impl M6809 {
    /// Fetch operand bytes for `mode`. Fails with the post-byte when an
    /// indexed post-byte does not encode a valid mode.
    pub(crate) fn resolve_operand<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        mode: AddrMode,
    ) -> Result<Operand, u8> {
        let operand = match mode {
            AddrMode::Inherent => Operand::None,
            AddrMode::Immediate8 => Operand::Imm8(self.fetch_byte(bus, master)),
            AddrMode::Immediate16 => Operand::Imm16(self.fetch_word(bus, master)),
            AddrMode::Direct => {
                let lo = self.fetch_byte(bus, master);
                Operand::Addr(u16::from_be_bytes([self.dp, lo]))
            }
            AddrMode::Extended => Operand::Addr(self.fetch_word(bus, master)),
            AddrMode::Indexed => Operand::Addr(self.resolve_indexed(bus, master)?),
            AddrMode::Relative8 => {
                let offset = self.fetch_byte(bus, master) as i8 as u16;
                Operand::Addr(self.pc.wrapping_add(offset))
            }
            AddrMode::Relative16 => {
                let offset = self.fetch_word(bus, master);
                Operand::Addr(self.pc.wrapping_add(offset))
            }
        };
        Ok(operand)
    }

    /// Decode an indexed post-byte and return the effective address, adding
    /// the mode's extra cycles.
    ///
    /// Post-byte layout: `1 RR I MMMM`, or `0 RR nnnnn` for a 5-bit offset.
    /// RR selects X, Y, U or S; I requests indirection.
    pub(crate) fn resolve_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> Result<u16, u8> {
        let post = self.fetch_byte(bus, master);
        let sel = (post >> 5) & 0x03;
        let reg = self.index_reg(sel);

        if post & 0x80 == 0 {
            self.cycles += 1;
            return Ok(reg.wrapping_add(offset5(post)));
        }

        let indirect = post & 0x10 != 0;
        let (ea, extra) = match post & 0x0F {
            // ,R+ (no indirect form)
            0x0 if !indirect => {
                self.set_index_reg(sel, reg.wrapping_add(1));
                (reg, 2)
            }
            // ,R++
            0x1 => {
                self.set_index_reg(sel, reg.wrapping_add(2));
                (reg, 3)
            }
            // ,-R (no indirect form)
            0x2 if !indirect => {
                let ea = reg.wrapping_sub(1);
                self.set_index_reg(sel, ea);
                (ea, 2)
            }
            // ,--R
            0x3 => {
                let ea = reg.wrapping_sub(2);
                self.set_index_reg(sel, ea);
                (ea, 3)
            }
            0x4 => (reg, 0),
            0x5 => (reg.wrapping_add(self.b as i8 as u16), 1),
            0x6 => (reg.wrapping_add(self.a as i8 as u16), 1),
            0x8 => {
                let offset = self.fetch_byte(bus, master) as i8 as u16;
                (reg.wrapping_add(offset), 1)
            }
            0x9 => {
                let offset = self.fetch_word(bus, master);
                (reg.wrapping_add(offset), 4)
            }
            0xB => (reg.wrapping_add(self.get_d()), 4),
            // n8,PCR: relative to the PC after the offset byte
            0xC => {
                let offset = self.fetch_byte(bus, master) as i8 as u16;
                (self.pc.wrapping_add(offset), 1)
            }
            0xD => {
                let offset = self.fetch_word(bus, master);
                (self.pc.wrapping_add(offset), 5)
            }
            // [n]: extended indirect, the RR bits are ignored
            0xF if indirect => (self.fetch_word(bus, master), 2),
            _ => return Err(post),
        };

        self.cycles += extra;
        if indirect {
            self.cycles += 3;
            Ok(self.read_word(bus, master, ea))
        } else {
            Ok(ea)
        }
    }

    fn index_reg(&self, sel: u8) -> u16 {
        match sel {
            0 => self.x,
            1 => self.y,
            2 => self.u,
            _ => self.s,
        }
    }

    fn set_index_reg(&mut self, sel: u8, val: u16) {
        match sel {
            0 => self.x = val,
            1 => self.y = val,
            2 => self.u = val,
            _ => self.s = val,
        }
    }

    /// 8-bit operand value: the immediate byte or the byte at the EA.
    pub(crate) fn operand_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        operand: Operand,
    ) -> u8 {
        match operand {
            Operand::Imm8(v) => v,
            Operand::Addr(ea) => bus.read(master, ea),
            other => other.byte(),
        }
    }

    /// 16-bit operand value: the immediate word or the word at the EA.
    pub(crate) fn operand_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        operand: Operand,
    ) -> u16 {
        match operand {
            Operand::Imm16(v) => v,
            Operand::Addr(ea) => self.read_word(bus, master, ea),
            other => other.addr(),
        }
    }
}
