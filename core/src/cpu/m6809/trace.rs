use std::fmt;

use super::M6809;

/// Receives one record per executed instruction, after it completes.
pub type TraceSink = Box<dyn FnMut(&TraceRecord) + Send>;

/// One executed instruction and the register state it left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Address of the first instruction byte.
    pub pc: u16,
    /// Every byte fetched, prefix and operands included.
    pub bytes: Vec<u8>,
    pub mnemonic: &'static str,
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub cc: u8,
    pub cycles: u64,
}

impl TraceRecord {
    pub(crate) fn capture(cpu: &M6809, pc: u16, mnemonic: &'static str) -> Self {
        Self {
            pc,
            bytes: cpu.fetched.as_slice().to_vec(),
            mnemonic,
            a: cpu.a,
            b: cpu.b,
            dp: cpu.dp,
            x: cpu.x,
            y: cpu.y,
            u: cpu.u,
            s: cpu.s,
            cc: cpu.cc,
            cycles: cpu.cycles,
        }
    }
}

/// `EFHINZVC`, with `.` for each clear bit.
pub fn format_cc(cc: u8) -> String {
    "EFHINZVC"
        .chars()
        .enumerate()
        .map(|(i, name)| if cc & (0x80 >> i) != 0 { name } else { '.' })
        .collect()
}

impl fmt::Display for TraceRecord {
    /// `PPPP| BYTES      | MNEMO | A=.. B=.. DP=.. X=.... Y=.... U=.... S=.... CC=EFHINZVC`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: String = self.bytes.iter().map(|b| format!("{b:02X}")).collect();
        write!(
            f,
            "{:04X}| {:<10} | {:<5} | A={:02X} B={:02X} DP={:02X} X={:04X} Y={:04X} U={:04X} S={:04X} CC={}",
            self.pc,
            bytes,
            self.mnemonic,
            self.a,
            self.b,
            self.dp,
            self.x,
            self.y,
            self.u,
            self.s,
            format_cc(self.cc),
        )
    }
}
