//! MC6883 Synchronous Address Multiplexer, as far as the CPU can see it.
//!
//! The SAM has no readable registers. Its sixteen control bits are set and
//! cleared by writing (any value) to a pair of addresses in $FFC0-$FFDF: the
//! even address clears the bit, the odd one sets it.

use log::debug;

pub const SAM_BASE: u16 = 0xFFC0;
pub const SAM_END: u16 = 0xFFDF;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sam {
    bits: u16,
}

impl Sam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.bits = 0;
    }

    /// Handle a write anywhere in $FFC0-$FFDF.
    pub fn write(&mut self, addr: u16) {
        let offset = addr.wrapping_sub(SAM_BASE) & 0x1F;
        let bit = 1u16 << (offset >> 1);
        let old = self.bits;
        if offset & 1 != 0 {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
        if self.bits != old {
            debug!(
                "SAM: mode {} display base ${:04X} rate {} map type {}",
                self.vdg_mode(),
                self.display_base(),
                self.rate(),
                self.map_type()
            );
        }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    /// V0-V2: display mode counter.
    pub fn vdg_mode(&self) -> u8 {
        (self.bits & 0x07) as u8
    }

    /// F0-F6 select the display base in 512-byte steps.
    pub fn display_base(&self) -> u16 {
        ((self.bits >> 3) & 0x7F) << 9
    }

    /// R0-R1: CPU rate (0 = 0.89 MHz).
    pub fn rate(&self) -> u8 {
        ((self.bits >> 11) & 0x03) as u8
    }

    /// TY: 1 selects the all-RAM map.
    pub fn map_type(&self) -> bool {
        self.bits & 0x8000 != 0
    }
}
