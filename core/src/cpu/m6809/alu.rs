use super::{CcFlag, M6809};

mod binary;
mod shift;
mod unary;
mod word;

/// Signed overflow of an 8-bit add or subtract, given both operands and
/// the unmasked result (bit 8 holds the carry or borrow out).
#[inline]
pub fn overflow8(a: u16, b: u16, r: u16) -> bool {
    (a ^ b ^ r ^ (r >> 1)) & 0x80 != 0
}

/// Signed overflow of a 16-bit add or subtract (bit 16 of `r` is the carry).
#[inline]
pub fn overflow16(a: u32, b: u32, r: u32) -> bool {
    (a ^ b ^ r ^ (r >> 1)) & 0x8000 != 0
}

/// Carry out of bit 3 of an 8-bit add.
#[inline]
pub fn half_carry8(a: u16, b: u16, r: u16) -> bool {
    (a ^ b ^ r) & 0x10 != 0
}

impl M6809 {
    #[inline]
    pub(crate) fn update_nz8(&mut self, r: u8) {
        self.set_flag(CcFlag::N, r & 0x80 != 0);
        self.set_flag(CcFlag::Z, r == 0);
    }

    #[inline]
    pub(crate) fn update_nz16(&mut self, r: u16) {
        self.set_flag(CcFlag::N, r & 0x8000 != 0);
        self.set_flag(CcFlag::Z, r == 0);
    }

    /// N and Z from the result, V cleared (loads, stores, logic ops).
    #[inline]
    pub(crate) fn update_nz0_8(&mut self, r: u8) {
        self.update_nz8(r);
        self.set_flag(CcFlag::V, false);
    }

    #[inline]
    pub(crate) fn update_nz0_16(&mut self, r: u16) {
        self.update_nz16(r);
        self.set_flag(CcFlag::V, false);
    }

    /// N Z V C for an 8-bit add/subtract; `r` is the unmasked result.
    #[inline]
    pub(crate) fn update_nzvc8(&mut self, a: u16, b: u16, r: u16) {
        self.update_nz8(r as u8);
        self.set_flag(CcFlag::V, overflow8(a, b, r));
        self.set_flag(CcFlag::C, r & 0x100 != 0);
    }

    #[inline]
    pub(crate) fn update_nzvc16(&mut self, a: u32, b: u32, r: u32) {
        self.update_nz16(r as u16);
        self.set_flag(CcFlag::V, overflow16(a, b, r));
        self.set_flag(CcFlag::C, r & 0x1_0000 != 0);
    }

    /// As `update_nzvc8`, plus the half carry (ADD/ADC only).
    #[inline]
    pub(crate) fn update_hnzvc8(&mut self, a: u16, b: u16, r: u16) {
        self.set_flag(CcFlag::H, half_carry8(a, b, r));
        self.update_nzvc8(a, b, r);
    }

    /// CLR: N=0 Z=1 V=0 C=0.
    #[inline]
    pub(crate) fn update_0100(&mut self) {
        self.cc &= !(CcFlag::N as u8 | CcFlag::V as u8 | CcFlag::C as u8);
        self.cc |= CcFlag::Z as u8;
    }

    #[inline]
    pub(crate) fn carry(&self) -> u8 {
        self.cc & CcFlag::C as u8
    }
}
