//! MC6809 opcode table.
//!
//! One [`Opcode`] entry per documented instruction, across three pages:
//! page 0 (single-byte opcodes), page 1 (`$10` prefix) and page 2 (`$11`
//! prefix). The list is folded into a dense 768-slot table at compile time,
//! indexed by `page * 256 + opcode`. Empty slots are illegal instructions.
//!
//! `cycles` is the base cost. Indexed instructions add the post-byte
//! surcharge, PSH/PUL add one cycle per byte moved, conditional long
//! branches add one when they fall through, and RTI adds nine when it pulls the
//! entire state.
//!
//! `flags` is the H N Z V C effect signature: `-` unaffected, `0`/`1`
//! forced, `a` computed, `u` undefined (this core leaves undefined flags
//! unchanged).

use AddrMode::*;
use Instr::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrMode {
    Inherent,
    Immediate8,
    Immediate16,
    Direct,
    Extended,
    Indexed,
    Relative8,
    Relative16,
}

impl AddrMode {
    /// Operand bytes following the opcode (indexed: post-byte only).
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Inherent => 0,
            Immediate8 | Direct | Indexed | Relative8 => 1,
            Immediate16 | Extended | Relative16 => 2,
        }
    }
}

/// Accumulator operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acc {
    A,
    B,
}

/// Destination of a read-modify-write operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    A,
    B,
    Mem,
}

/// 16-bit register operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wide {
    D,
    X,
    Y,
    U,
    S,
}

/// Which hardware stack a PSH/PUL works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stack {
    S,
    U,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Always,
    Never,
    Hi,
    Ls,
    Cc,
    Cs,
    Ne,
    Eq,
    Vc,
    Vs,
    Pl,
    Mi,
    Ge,
    Lt,
    Gt,
    Le,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Sub,
    Cmp,
    Sbc,
    And,
    Bit,
    Eor,
    Adc,
    Or,
    Add,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Com,
    Lsr,
    Ror,
    Asr,
    Asl,
    Rol,
    Dec,
    Inc,
    Tst,
    Clr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOp {
    Add,
    Sub,
    Cmp,
}

/// What an opcode does, independent of how its operand is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    Unary(UnaryOp, Target),
    Alu(AluOp, Acc),
    Load(Acc),
    Store(Acc),
    AluWord(WordOp, Wide),
    LoadWord(Wide),
    StoreWord(Wide),
    Lea(Wide),
    Branch(Cond),
    LongBranch(Cond),
    Bsr,
    Jmp,
    Jsr,
    Rts,
    Push(Stack),
    Pull(Stack),
    Tfr,
    Exg,
    Nop,
    Sync,
    Daa,
    Orcc,
    Andcc,
    Sex,
    Abx,
    Mul,
    Rti,
    Cwai,
    Swi,
    Swi2,
    Swi3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    /// `$00..$FF`, `$10xx` or `$11xx`.
    pub code: u16,
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    pub cycles: u8,
    /// Minimum encoded length, prefix included.
    pub bytes: u8,
    /// H N Z V C effect signature.
    pub flags: &'static str,
    pub instr: Instr,
}

impl Opcode {
    /// Index into the flag signature for one of H, N, Z, V, C.
    pub fn flag_effect(&self, flag: char) -> Option<char> {
        let index = "HNZVC".find(flag)?;
        self.flags.chars().nth(index)
    }
}

const fn op(
    code: u16,
    mnemonic: &'static str,
    mode: AddrMode,
    cycles: u8,
    flags: &'static str,
    instr: Instr,
) -> Opcode {
    let prefix = if code > 0xFF { 1 } else { 0 };
    Opcode {
        code,
        mnemonic,
        mode,
        cycles,
        bytes: prefix + 1 + mode.operand_bytes(),
        flags,
        instr,
    }
}

/// Page-0 byte values with no instruction behind them.
pub const ILLEGAL_PAGE0: [u8; 33] = [
    0x01, 0x02, 0x05, 0x0B, 0x14, 0x15, 0x18, 0x1B, 0x38, 0x3E, 0x41, 0x42, 0x45, 0x4B, 0x4E,
    0x51, 0x52, 0x55, 0x5B, 0x5E, 0x61, 0x62, 0x65, 0x6B, 0x71, 0x72, 0x75, 0x7B, 0x87, 0x8F,
    0xC7, 0xCD, 0xCF,
];

const NZ0: &str = "-aa0-";
const NZVC: &str = "-aaaa";
const HNZVC: &str = "aaaaa";
const SUB8: &str = "uaaaa";
const NONE: &str = "-----";
const WHOLE: &str = "aaaaa"; // CC replaced wholesale (ANDCC, PULS CC, RTI, ...)

#[rustfmt::skip]
pub const OPCODES: &[Opcode] = &[
    // Direct-page read-modify-write
    op(0x00, "NEG",   Direct, 6, SUB8, Unary(UnaryOp::Neg, Target::Mem)),
    op(0x03, "COM",   Direct, 6, "-aa01", Unary(UnaryOp::Com, Target::Mem)),
    op(0x04, "LSR",   Direct, 6, "-0a-a", Unary(UnaryOp::Lsr, Target::Mem)),
    op(0x06, "ROR",   Direct, 6, "-aa-a", Unary(UnaryOp::Ror, Target::Mem)),
    op(0x07, "ASR",   Direct, 6, "uaa-a", Unary(UnaryOp::Asr, Target::Mem)),
    op(0x08, "ASL",   Direct, 6, SUB8, Unary(UnaryOp::Asl, Target::Mem)),
    op(0x09, "ROL",   Direct, 6, NZVC, Unary(UnaryOp::Rol, Target::Mem)),
    op(0x0A, "DEC",   Direct, 6, "-aaa-", Unary(UnaryOp::Dec, Target::Mem)),
    op(0x0C, "INC",   Direct, 6, "-aaa-", Unary(UnaryOp::Inc, Target::Mem)),
    op(0x0D, "TST",   Direct, 6, NZ0, Unary(UnaryOp::Tst, Target::Mem)),
    op(0x0E, "JMP",   Direct, 3, NONE, Jmp),
    op(0x0F, "CLR",   Direct, 6, "-0100", Unary(UnaryOp::Clr, Target::Mem)),

    // Misc
    op(0x12, "NOP",   Inherent, 2, NONE, Nop),
    op(0x13, "SYNC",  Inherent, 4, NONE, Sync),
    op(0x16, "LBRA",  Relative16, 5, NONE, LongBranch(Cond::Always)),
    op(0x17, "LBSR",  Relative16, 9, NONE, Bsr),
    op(0x19, "DAA",   Inherent, 2, "-aaua", Daa),
    op(0x1A, "ORCC",  Immediate8, 3, WHOLE, Orcc),
    op(0x1C, "ANDCC", Immediate8, 3, WHOLE, Andcc),
    op(0x1D, "SEX",   Inherent, 2, "-aa--", Sex),
    op(0x1E, "EXG",   Immediate8, 8, WHOLE, Exg),
    op(0x1F, "TFR",   Immediate8, 6, WHOLE, Tfr),

    // Short branches
    op(0x20, "BRA",   Relative8, 3, NONE, Branch(Cond::Always)),
    op(0x21, "BRN",   Relative8, 3, NONE, Branch(Cond::Never)),
    op(0x22, "BHI",   Relative8, 3, NONE, Branch(Cond::Hi)),
    op(0x23, "BLS",   Relative8, 3, NONE, Branch(Cond::Ls)),
    op(0x24, "BCC",   Relative8, 3, NONE, Branch(Cond::Cc)),
    op(0x25, "BCS",   Relative8, 3, NONE, Branch(Cond::Cs)),
    op(0x26, "BNE",   Relative8, 3, NONE, Branch(Cond::Ne)),
    op(0x27, "BEQ",   Relative8, 3, NONE, Branch(Cond::Eq)),
    op(0x28, "BVC",   Relative8, 3, NONE, Branch(Cond::Vc)),
    op(0x29, "BVS",   Relative8, 3, NONE, Branch(Cond::Vs)),
    op(0x2A, "BPL",   Relative8, 3, NONE, Branch(Cond::Pl)),
    op(0x2B, "BMI",   Relative8, 3, NONE, Branch(Cond::Mi)),
    op(0x2C, "BGE",   Relative8, 3, NONE, Branch(Cond::Ge)),
    op(0x2D, "BLT",   Relative8, 3, NONE, Branch(Cond::Lt)),
    op(0x2E, "BGT",   Relative8, 3, NONE, Branch(Cond::Gt)),
    op(0x2F, "BLE",   Relative8, 3, NONE, Branch(Cond::Le)),

    // LEA, stacks, subroutine and interrupt control
    op(0x30, "LEAX",  Indexed, 4, "--a--", Lea(Wide::X)),
    op(0x31, "LEAY",  Indexed, 4, "--a--", Lea(Wide::Y)),
    op(0x32, "LEAS",  Indexed, 4, NONE, Lea(Wide::S)),
    op(0x33, "LEAU",  Indexed, 4, NONE, Lea(Wide::U)),
    op(0x34, "PSHS",  Immediate8, 5, NONE, Push(Stack::S)),
    op(0x35, "PULS",  Immediate8, 5, WHOLE, Pull(Stack::S)),
    op(0x36, "PSHU",  Immediate8, 5, NONE, Push(Stack::U)),
    op(0x37, "PULU",  Immediate8, 5, WHOLE, Pull(Stack::U)),
    op(0x39, "RTS",   Inherent, 5, NONE, Rts),
    op(0x3A, "ABX",   Inherent, 3, NONE, Abx),
    op(0x3B, "RTI",   Inherent, 6, WHOLE, Rti),
    op(0x3C, "CWAI",  Immediate8, 20, WHOLE, Cwai),
    op(0x3D, "MUL",   Inherent, 11, "--a-a", Mul),
    op(0x3F, "SWI",   Inherent, 19, NONE, Swi),

    // Accumulator A inherent
    op(0x40, "NEGA",  Inherent, 2, SUB8, Unary(UnaryOp::Neg, Target::A)),
    op(0x43, "COMA",  Inherent, 2, "-aa01", Unary(UnaryOp::Com, Target::A)),
    op(0x44, "LSRA",  Inherent, 2, "-0a-a", Unary(UnaryOp::Lsr, Target::A)),
    op(0x46, "RORA",  Inherent, 2, "-aa-a", Unary(UnaryOp::Ror, Target::A)),
    op(0x47, "ASRA",  Inherent, 2, "uaa-a", Unary(UnaryOp::Asr, Target::A)),
    op(0x48, "ASLA",  Inherent, 2, SUB8, Unary(UnaryOp::Asl, Target::A)),
    op(0x49, "ROLA",  Inherent, 2, NZVC, Unary(UnaryOp::Rol, Target::A)),
    op(0x4A, "DECA",  Inherent, 2, "-aaa-", Unary(UnaryOp::Dec, Target::A)),
    op(0x4C, "INCA",  Inherent, 2, "-aaa-", Unary(UnaryOp::Inc, Target::A)),
    op(0x4D, "TSTA",  Inherent, 2, NZ0, Unary(UnaryOp::Tst, Target::A)),
    op(0x4F, "CLRA",  Inherent, 2, "-0100", Unary(UnaryOp::Clr, Target::A)),

    // Accumulator B inherent
    op(0x50, "NEGB",  Inherent, 2, SUB8, Unary(UnaryOp::Neg, Target::B)),
    op(0x53, "COMB",  Inherent, 2, "-aa01", Unary(UnaryOp::Com, Target::B)),
    op(0x54, "LSRB",  Inherent, 2, "-0a-a", Unary(UnaryOp::Lsr, Target::B)),
    op(0x56, "RORB",  Inherent, 2, "-aa-a", Unary(UnaryOp::Ror, Target::B)),
    op(0x57, "ASRB",  Inherent, 2, "uaa-a", Unary(UnaryOp::Asr, Target::B)),
    op(0x58, "ASLB",  Inherent, 2, SUB8, Unary(UnaryOp::Asl, Target::B)),
    op(0x59, "ROLB",  Inherent, 2, NZVC, Unary(UnaryOp::Rol, Target::B)),
    op(0x5A, "DECB",  Inherent, 2, "-aaa-", Unary(UnaryOp::Dec, Target::B)),
    op(0x5C, "INCB",  Inherent, 2, "-aaa-", Unary(UnaryOp::Inc, Target::B)),
    op(0x5D, "TSTB",  Inherent, 2, NZ0, Unary(UnaryOp::Tst, Target::B)),
    op(0x5F, "CLRB",  Inherent, 2, "-0100", Unary(UnaryOp::Clr, Target::B)),

    // Indexed read-modify-write
    op(0x60, "NEG",   Indexed, 6, SUB8, Unary(UnaryOp::Neg, Target::Mem)),
    op(0x63, "COM",   Indexed, 6, "-aa01", Unary(UnaryOp::Com, Target::Mem)),
    op(0x64, "LSR",   Indexed, 6, "-0a-a", Unary(UnaryOp::Lsr, Target::Mem)),
    op(0x66, "ROR",   Indexed, 6, "-aa-a", Unary(UnaryOp::Ror, Target::Mem)),
    op(0x67, "ASR",   Indexed, 6, "uaa-a", Unary(UnaryOp::Asr, Target::Mem)),
    op(0x68, "ASL",   Indexed, 6, SUB8, Unary(UnaryOp::Asl, Target::Mem)),
    op(0x69, "ROL",   Indexed, 6, NZVC, Unary(UnaryOp::Rol, Target::Mem)),
    op(0x6A, "DEC",   Indexed, 6, "-aaa-", Unary(UnaryOp::Dec, Target::Mem)),
    op(0x6C, "INC",   Indexed, 6, "-aaa-", Unary(UnaryOp::Inc, Target::Mem)),
    op(0x6D, "TST",   Indexed, 6, NZ0, Unary(UnaryOp::Tst, Target::Mem)),
    op(0x6E, "JMP",   Indexed, 3, NONE, Jmp),
    op(0x6F, "CLR",   Indexed, 6, "-0100", Unary(UnaryOp::Clr, Target::Mem)),

    // Extended read-modify-write
    op(0x70, "NEG",   Extended, 7, SUB8, Unary(UnaryOp::Neg, Target::Mem)),
    op(0x73, "COM",   Extended, 7, "-aa01", Unary(UnaryOp::Com, Target::Mem)),
    op(0x74, "LSR",   Extended, 7, "-0a-a", Unary(UnaryOp::Lsr, Target::Mem)),
    op(0x76, "ROR",   Extended, 7, "-aa-a", Unary(UnaryOp::Ror, Target::Mem)),
    op(0x77, "ASR",   Extended, 7, "uaa-a", Unary(UnaryOp::Asr, Target::Mem)),
    op(0x78, "ASL",   Extended, 7, SUB8, Unary(UnaryOp::Asl, Target::Mem)),
    op(0x79, "ROL",   Extended, 7, NZVC, Unary(UnaryOp::Rol, Target::Mem)),
    op(0x7A, "DEC",   Extended, 7, "-aaa-", Unary(UnaryOp::Dec, Target::Mem)),
    op(0x7C, "INC",   Extended, 7, "-aaa-", Unary(UnaryOp::Inc, Target::Mem)),
    op(0x7D, "TST",   Extended, 7, NZ0, Unary(UnaryOp::Tst, Target::Mem)),
    op(0x7E, "JMP",   Extended, 4, NONE, Jmp),
    op(0x7F, "CLR",   Extended, 7, "-0100", Unary(UnaryOp::Clr, Target::Mem)),

    // A / D / X, immediate
    op(0x80, "SUBA",  Immediate8, 2, SUB8, Alu(AluOp::Sub, Acc::A)),
    op(0x81, "CMPA",  Immediate8, 2, SUB8, Alu(AluOp::Cmp, Acc::A)),
    op(0x82, "SBCA",  Immediate8, 2, SUB8, Alu(AluOp::Sbc, Acc::A)),
    op(0x83, "SUBD",  Immediate16, 4, NZVC, AluWord(WordOp::Sub, Wide::D)),
    op(0x84, "ANDA",  Immediate8, 2, NZ0, Alu(AluOp::And, Acc::A)),
    op(0x85, "BITA",  Immediate8, 2, NZ0, Alu(AluOp::Bit, Acc::A)),
    op(0x86, "LDA",   Immediate8, 2, NZ0, Load(Acc::A)),
    op(0x88, "EORA",  Immediate8, 2, NZ0, Alu(AluOp::Eor, Acc::A)),
    op(0x89, "ADCA",  Immediate8, 2, HNZVC, Alu(AluOp::Adc, Acc::A)),
    op(0x8A, "ORA",   Immediate8, 2, NZ0, Alu(AluOp::Or, Acc::A)),
    op(0x8B, "ADDA",  Immediate8, 2, HNZVC, Alu(AluOp::Add, Acc::A)),
    op(0x8C, "CMPX",  Immediate16, 4, NZVC, AluWord(WordOp::Cmp, Wide::X)),
    op(0x8D, "BSR",   Relative8, 7, NONE, Bsr),
    op(0x8E, "LDX",   Immediate16, 3, NZ0, LoadWord(Wide::X)),

    // A / D / X, direct
    op(0x90, "SUBA",  Direct, 4, SUB8, Alu(AluOp::Sub, Acc::A)),
    op(0x91, "CMPA",  Direct, 4, SUB8, Alu(AluOp::Cmp, Acc::A)),
    op(0x92, "SBCA",  Direct, 4, SUB8, Alu(AluOp::Sbc, Acc::A)),
    op(0x93, "SUBD",  Direct, 6, NZVC, AluWord(WordOp::Sub, Wide::D)),
    op(0x94, "ANDA",  Direct, 4, NZ0, Alu(AluOp::And, Acc::A)),
    op(0x95, "BITA",  Direct, 4, NZ0, Alu(AluOp::Bit, Acc::A)),
    op(0x96, "LDA",   Direct, 4, NZ0, Load(Acc::A)),
    op(0x97, "STA",   Direct, 4, NZ0, Store(Acc::A)),
    op(0x98, "EORA",  Direct, 4, NZ0, Alu(AluOp::Eor, Acc::A)),
    op(0x99, "ADCA",  Direct, 4, HNZVC, Alu(AluOp::Adc, Acc::A)),
    op(0x9A, "ORA",   Direct, 4, NZ0, Alu(AluOp::Or, Acc::A)),
    op(0x9B, "ADDA",  Direct, 4, HNZVC, Alu(AluOp::Add, Acc::A)),
    op(0x9C, "CMPX",  Direct, 6, NZVC, AluWord(WordOp::Cmp, Wide::X)),
    op(0x9D, "JSR",   Direct, 7, NONE, Jsr),
    op(0x9E, "LDX",   Direct, 5, NZ0, LoadWord(Wide::X)),
    op(0x9F, "STX",   Direct, 5, NZ0, StoreWord(Wide::X)),

    // A / D / X, indexed
    op(0xA0, "SUBA",  Indexed, 4, SUB8, Alu(AluOp::Sub, Acc::A)),
    op(0xA1, "CMPA",  Indexed, 4, SUB8, Alu(AluOp::Cmp, Acc::A)),
    op(0xA2, "SBCA",  Indexed, 4, SUB8, Alu(AluOp::Sbc, Acc::A)),
    op(0xA3, "SUBD",  Indexed, 6, NZVC, AluWord(WordOp::Sub, Wide::D)),
    op(0xA4, "ANDA",  Indexed, 4, NZ0, Alu(AluOp::And, Acc::A)),
    op(0xA5, "BITA",  Indexed, 4, NZ0, Alu(AluOp::Bit, Acc::A)),
    op(0xA6, "LDA",   Indexed, 4, NZ0, Load(Acc::A)),
    op(0xA7, "STA",   Indexed, 4, NZ0, Store(Acc::A)),
    op(0xA8, "EORA",  Indexed, 4, NZ0, Alu(AluOp::Eor, Acc::A)),
    op(0xA9, "ADCA",  Indexed, 4, HNZVC, Alu(AluOp::Adc, Acc::A)),
    op(0xAA, "ORA",   Indexed, 4, NZ0, Alu(AluOp::Or, Acc::A)),
    op(0xAB, "ADDA",  Indexed, 4, HNZVC, Alu(AluOp::Add, Acc::A)),
    op(0xAC, "CMPX",  Indexed, 6, NZVC, AluWord(WordOp::Cmp, Wide::X)),
    op(0xAD, "JSR",   Indexed, 7, NONE, Jsr),
    op(0xAE, "LDX",   Indexed, 5, NZ0, LoadWord(Wide::X)),
    op(0xAF, "STX",   Indexed, 5, NZ0, StoreWord(Wide::X)),

    // A / D / X, extended
    op(0xB0, "SUBA",  Extended, 5, SUB8, Alu(AluOp::Sub, Acc::A)),
    op(0xB1, "CMPA",  Extended, 5, SUB8, Alu(AluOp::Cmp, Acc::A)),
    op(0xB2, "SBCA",  Extended, 5, SUB8, Alu(AluOp::Sbc, Acc::A)),
    op(0xB3, "SUBD",  Extended, 7, NZVC, AluWord(WordOp::Sub, Wide::D)),
    op(0xB4, "ANDA",  Extended, 5, NZ0, Alu(AluOp::And, Acc::A)),
    op(0xB5, "BITA",  Extended, 5, NZ0, Alu(AluOp::Bit, Acc::A)),
    op(0xB6, "LDA",   Extended, 5, NZ0, Load(Acc::A)),
    op(0xB7, "STA",   Extended, 5, NZ0, Store(Acc::A)),
    op(0xB8, "EORA",  Extended, 5, NZ0, Alu(AluOp::Eor, Acc::A)),
    op(0xB9, "ADCA",  Extended, 5, HNZVC, Alu(AluOp::Adc, Acc::A)),
    op(0xBA, "ORA",   Extended, 5, NZ0, Alu(AluOp::Or, Acc::A)),
    op(0xBB, "ADDA",  Extended, 5, HNZVC, Alu(AluOp::Add, Acc::A)),
    op(0xBC, "CMPX",  Extended, 7, NZVC, AluWord(WordOp::Cmp, Wide::X)),
    op(0xBD, "JSR",   Extended, 8, NONE, Jsr),
    op(0xBE, "LDX",   Extended, 6, NZ0, LoadWord(Wide::X)),
    op(0xBF, "STX",   Extended, 6, NZ0, StoreWord(Wide::X)),

    // B / D / U, immediate
    op(0xC0, "SUBB",  Immediate8, 2, SUB8, Alu(AluOp::Sub, Acc::B)),
    op(0xC1, "CMPB",  Immediate8, 2, SUB8, Alu(AluOp::Cmp, Acc::B)),
    op(0xC2, "SBCB",  Immediate8, 2, SUB8, Alu(AluOp::Sbc, Acc::B)),
    op(0xC3, "ADDD",  Immediate16, 4, NZVC, AluWord(WordOp::Add, Wide::D)),
    op(0xC4, "ANDB",  Immediate8, 2, NZ0, Alu(AluOp::And, Acc::B)),
    op(0xC5, "BITB",  Immediate8, 2, NZ0, Alu(AluOp::Bit, Acc::B)),
    op(0xC6, "LDB",   Immediate8, 2, NZ0, Load(Acc::B)),
    op(0xC8, "EORB",  Immediate8, 2, NZ0, Alu(AluOp::Eor, Acc::B)),
    op(0xC9, "ADCB",  Immediate8, 2, HNZVC, Alu(AluOp::Adc, Acc::B)),
    op(0xCA, "ORB",   Immediate8, 2, NZ0, Alu(AluOp::Or, Acc::B)),
    op(0xCB, "ADDB",  Immediate8, 2, HNZVC, Alu(AluOp::Add, Acc::B)),
    op(0xCC, "LDD",   Immediate16, 3, NZ0, LoadWord(Wide::D)),
    op(0xCE, "LDU",   Immediate16, 3, NZ0, LoadWord(Wide::U)),

    // B / D / U, direct
    op(0xD0, "SUBB",  Direct, 4, SUB8, Alu(AluOp::Sub, Acc::B)),
    op(0xD1, "CMPB",  Direct, 4, SUB8, Alu(AluOp::Cmp, Acc::B)),
    op(0xD2, "SBCB",  Direct, 4, SUB8, Alu(AluOp::Sbc, Acc::B)),
    op(0xD3, "ADDD",  Direct, 6, NZVC, AluWord(WordOp::Add, Wide::D)),
    op(0xD4, "ANDB",  Direct, 4, NZ0, Alu(AluOp::And, Acc::B)),
    op(0xD5, "BITB",  Direct, 4, NZ0, Alu(AluOp::Bit, Acc::B)),
    op(0xD6, "LDB",   Direct, 4, NZ0, Load(Acc::B)),
    op(0xD7, "STB",   Direct, 4, NZ0, Store(Acc::B)),
    op(0xD8, "EORB",  Direct, 4, NZ0, Alu(AluOp::Eor, Acc::B)),
    op(0xD9, "ADCB",  Direct, 4, HNZVC, Alu(AluOp::Adc, Acc::B)),
    op(0xDA, "ORB",   Direct, 4, NZ0, Alu(AluOp::Or, Acc::B)),
    op(0xDB, "ADDB",  Direct, 4, HNZVC, Alu(AluOp::Add, Acc::B)),
    op(0xDC, "LDD",   Direct, 5, NZ0, LoadWord(Wide::D)),
    op(0xDD, "STD",   Direct, 5, NZ0, StoreWord(Wide::D)),
    op(0xDE, "LDU",   Direct, 5, NZ0, LoadWord(Wide::U)),
    op(0xDF, "STU",   Direct, 5, NZ0, StoreWord(Wide::U)),

    // B / D / U, indexed
    op(0xE0, "SUBB",  Indexed, 4, SUB8, Alu(AluOp::Sub, Acc::B)),
    op(0xE1, "CMPB",  Indexed, 4, SUB8, Alu(AluOp::Cmp, Acc::B)),
    op(0xE2, "SBCB",  Indexed, 4, SUB8, Alu(AluOp::Sbc, Acc::B)),
    op(0xE3, "ADDD",  Indexed, 6, NZVC, AluWord(WordOp::Add, Wide::D)),
    op(0xE4, "ANDB",  Indexed, 4, NZ0, Alu(AluOp::And, Acc::B)),
    op(0xE5, "BITB",  Indexed, 4, NZ0, Alu(AluOp::Bit, Acc::B)),
    op(0xE6, "LDB",   Indexed, 4, NZ0, Load(Acc::B)),
    op(0xE7, "STB",   Indexed, 4, NZ0, Store(Acc::B)),
    op(0xE8, "EORB",  Indexed, 4, NZ0, Alu(AluOp::Eor, Acc::B)),
    op(0xE9, "ADCB",  Indexed, 4, HNZVC, Alu(AluOp::Adc, Acc::B)),
    op(0xEA, "ORB",   Indexed, 4, NZ0, Alu(AluOp::Or, Acc::B)),
    op(0xEB, "ADDB",  Indexed, 4, HNZVC, Alu(AluOp::Add, Acc::B)),
    op(0xEC, "LDD",   Indexed, 5, NZ0, LoadWord(Wide::D)),
    op(0xED, "STD",   Indexed, 5, NZ0, StoreWord(Wide::D)),
    op(0xEE, "LDU",   Indexed, 5, NZ0, LoadWord(Wide::U)),
    op(0xEF, "STU",   Indexed, 5, NZ0, StoreWord(Wide::U)),

    // B / D / U, extended
    op(0xF0, "SUBB",  Extended, 5, SUB8, Alu(AluOp::Sub, Acc::B)),
    op(0xF1, "CMPB",  Extended, 5, SUB8, Alu(AluOp::Cmp, Acc::B)),
    op(0xF2, "SBCB",  Extended, 5, SUB8, Alu(AluOp::Sbc, Acc::B)),
    op(0xF3, "ADDD",  Extended, 7, NZVC, AluWord(WordOp::Add, Wide::D)),
    op(0xF4, "ANDB",  Extended, 5, NZ0, Alu(AluOp::And, Acc::B)),
    op(0xF5, "BITB",  Extended, 5, NZ0, Alu(AluOp::Bit, Acc::B)),
    op(0xF6, "LDB",   Extended, 5, NZ0, Load(Acc::B)),
    op(0xF7, "STB",   Extended, 5, NZ0, Store(Acc::B)),
    op(0xF8, "EORB",  Extended, 5, NZ0, Alu(AluOp::Eor, Acc::B)),
    op(0xF9, "ADCB",  Extended, 5, HNZVC, Alu(AluOp::Adc, Acc::B)),
    op(0xFA, "ORB",   Extended, 5, NZ0, Alu(AluOp::Or, Acc::B)),
    op(0xFB, "ADDB",  Extended, 5, HNZVC, Alu(AluOp::Add, Acc::B)),
    op(0xFC, "LDD",   Extended, 6, NZ0, LoadWord(Wide::D)),
    op(0xFD, "STD",   Extended, 6, NZ0, StoreWord(Wide::D)),
    op(0xFE, "LDU",   Extended, 6, NZ0, LoadWord(Wide::U)),
    op(0xFF, "STU",   Extended, 6, NZ0, StoreWord(Wide::U)),

    // Page 1 ($10): long branches
    op(0x1021, "LBRN", Relative16, 5, NONE, LongBranch(Cond::Never)),
    op(0x1022, "LBHI", Relative16, 5, NONE, LongBranch(Cond::Hi)),
    op(0x1023, "LBLS", Relative16, 5, NONE, LongBranch(Cond::Ls)),
    op(0x1024, "LBCC", Relative16, 5, NONE, LongBranch(Cond::Cc)),
    op(0x1025, "LBCS", Relative16, 5, NONE, LongBranch(Cond::Cs)),
    op(0x1026, "LBNE", Relative16, 5, NONE, LongBranch(Cond::Ne)),
    op(0x1027, "LBEQ", Relative16, 5, NONE, LongBranch(Cond::Eq)),
    op(0x1028, "LBVC", Relative16, 5, NONE, LongBranch(Cond::Vc)),
    op(0x1029, "LBVS", Relative16, 5, NONE, LongBranch(Cond::Vs)),
    op(0x102A, "LBPL", Relative16, 5, NONE, LongBranch(Cond::Pl)),
    op(0x102B, "LBMI", Relative16, 5, NONE, LongBranch(Cond::Mi)),
    op(0x102C, "LBGE", Relative16, 5, NONE, LongBranch(Cond::Ge)),
    op(0x102D, "LBLT", Relative16, 5, NONE, LongBranch(Cond::Lt)),
    op(0x102E, "LBGT", Relative16, 5, NONE, LongBranch(Cond::Gt)),
    op(0x102F, "LBLE", Relative16, 5, NONE, LongBranch(Cond::Le)),
    op(0x103F, "SWI2", Inherent, 20, NONE, Swi2),

    // Page 1 ($10): D / Y / S
    op(0x1083, "CMPD", Immediate16, 5, NZVC, AluWord(WordOp::Cmp, Wide::D)),
    op(0x108C, "CMPY", Immediate16, 5, NZVC, AluWord(WordOp::Cmp, Wide::Y)),
    op(0x108E, "LDY",  Immediate16, 4, NZ0, LoadWord(Wide::Y)),
    op(0x1093, "CMPD", Direct, 7, NZVC, AluWord(WordOp::Cmp, Wide::D)),
    op(0x109C, "CMPY", Direct, 7, NZVC, AluWord(WordOp::Cmp, Wide::Y)),
    op(0x109E, "LDY",  Direct, 6, NZ0, LoadWord(Wide::Y)),
    op(0x109F, "STY",  Direct, 6, NZ0, StoreWord(Wide::Y)),
    op(0x10A3, "CMPD", Indexed, 7, NZVC, AluWord(WordOp::Cmp, Wide::D)),
    op(0x10AC, "CMPY", Indexed, 7, NZVC, AluWord(WordOp::Cmp, Wide::Y)),
    op(0x10AE, "LDY",  Indexed, 6, NZ0, LoadWord(Wide::Y)),
    op(0x10AF, "STY",  Indexed, 6, NZ0, StoreWord(Wide::Y)),
    op(0x10B3, "CMPD", Extended, 8, NZVC, AluWord(WordOp::Cmp, Wide::D)),
    op(0x10BC, "CMPY", Extended, 8, NZVC, AluWord(WordOp::Cmp, Wide::Y)),
    op(0x10BE, "LDY",  Extended, 7, NZ0, LoadWord(Wide::Y)),
    op(0x10BF, "STY",  Extended, 7, NZ0, StoreWord(Wide::Y)),
    op(0x10CE, "LDS",  Immediate16, 4, NZ0, LoadWord(Wide::S)),
    op(0x10DE, "LDS",  Direct, 6, NZ0, LoadWord(Wide::S)),
    op(0x10DF, "STS",  Direct, 6, NZ0, StoreWord(Wide::S)),
    op(0x10EE, "LDS",  Indexed, 6, NZ0, LoadWord(Wide::S)),
    op(0x10EF, "STS",  Indexed, 6, NZ0, StoreWord(Wide::S)),
    op(0x10FE, "LDS",  Extended, 7, NZ0, LoadWord(Wide::S)),
    op(0x10FF, "STS",  Extended, 7, NZ0, StoreWord(Wide::S)),

    // Page 2 ($11): U / S compares, SWI3
    op(0x113F, "SWI3", Inherent, 20, NONE, Swi3),
    op(0x1183, "CMPU", Immediate16, 5, NZVC, AluWord(WordOp::Cmp, Wide::U)),
    op(0x118C, "CMPS", Immediate16, 5, NZVC, AluWord(WordOp::Cmp, Wide::S)),
    op(0x1193, "CMPU", Direct, 7, NZVC, AluWord(WordOp::Cmp, Wide::U)),
    op(0x119C, "CMPS", Direct, 7, NZVC, AluWord(WordOp::Cmp, Wide::S)),
    op(0x11A3, "CMPU", Indexed, 7, NZVC, AluWord(WordOp::Cmp, Wide::U)),
    op(0x11AC, "CMPS", Indexed, 7, NZVC, AluWord(WordOp::Cmp, Wide::S)),
    op(0x11B3, "CMPU", Extended, 8, NZVC, AluWord(WordOp::Cmp, Wide::U)),
    op(0x11BC, "CMPS", Extended, 8, NZVC, AluWord(WordOp::Cmp, Wide::S)),
];

const TABLE_SIZE: usize = 3 * 256;

/// Slot in the dense table for a (possibly prefixed) opcode.
pub const fn slot(code: u16) -> Option<usize> {
    let low = (code & 0xFF) as usize;
    match code >> 8 {
        0x00 => Some(low),
        0x10 => Some(0x100 + low),
        0x11 => Some(0x200 + low),
        _ => None,
    }
}

const fn build_table() -> [Option<Opcode>; TABLE_SIZE] {
    let mut table = [None; TABLE_SIZE];
    let mut i = 0;
    while i < OPCODES.len() {
        let entry = OPCODES[i];
        match slot(entry.code) {
            Some(index) => {
                assert!(table[index].is_none(), "duplicate opcode entry");
                table[index] = Some(entry);
            }
            None => panic!("opcode outside pages 0-2"),
        }
        i += 1;
    }
    table
}

static TABLE: [Option<Opcode>; TABLE_SIZE] = build_table();

/// Look up a page-0 opcode (`$00..$FF`) or a prefixed one (`$10xx`, `$11xx`).
pub fn lookup(code: u16) -> Option<&'static Opcode> {
    slot(code).and_then(|index| TABLE[index].as_ref())
}

/// True if decoding `code` raises an illegal-instruction event.
pub fn is_illegal(code: u16) -> bool {
    lookup(code).is_none()
}

/// Every defined opcode, in table order.
pub fn all() -> impl Iterator<Item = &'static Opcode> {
    TABLE.iter().filter_map(Option::as_ref)
}
