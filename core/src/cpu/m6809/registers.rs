use super::M6809;

/// A programmer-visible register, addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    B,
    D,
    X,
    Y,
    U,
    S,
    PC,
    DP,
    CC,
}

impl Register {
    pub const ALL: [Register; 10] = [
        Register::A,
        Register::B,
        Register::D,
        Register::X,
        Register::Y,
        Register::U,
        Register::S,
        Register::PC,
        Register::DP,
        Register::CC,
    ];

    /// Width in bits: 8 or 16.
    pub fn width(self) -> u32 {
        match self {
            Register::A | Register::B | Register::DP | Register::CC => 8,
            _ => 16,
        }
    }

    pub fn mask(self) -> u16 {
        if self.width() == 8 { 0xFF } else { 0xFFFF }
    }

    /// Decode a TFR/EXG register nibble. Codes 6, 7 and $C-$F are undefined.
    pub fn from_code(code: u8) -> Option<Register> {
        match code & 0x0F {
            0x0 => Some(Register::D),
            0x1 => Some(Register::X),
            0x2 => Some(Register::Y),
            0x3 => Some(Register::U),
            0x4 => Some(Register::S),
            0x5 => Some(Register::PC),
            0x8 => Some(Register::A),
            0x9 => Some(Register::B),
            0xA => Some(Register::CC),
            0xB => Some(Register::DP),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
            Register::D => "D",
            Register::X => "X",
            Register::Y => "Y",
            Register::U => "U",
            Register::S => "S",
            Register::PC => "PC",
            Register::DP => "DP",
            Register::CC => "CC",
        }
    }
}

impl M6809 {
    pub fn get(&self, reg: Register) -> u16 {
        match reg {
            Register::A => self.a as u16,
            Register::B => self.b as u16,
            Register::D => self.get_d(),
            Register::X => self.x,
            Register::Y => self.y,
            Register::U => self.u,
            Register::S => self.s,
            Register::PC => self.pc,
            Register::DP => self.dp as u16,
            Register::CC => self.cc as u16,
        }
    }

    /// Store `value` reduced modulo 2^width. Does not arm NMI; see
    /// [`M6809::nmi_armed`].
    pub fn set(&mut self, reg: Register, value: u32) {
        let v = (value & reg.mask() as u32) as u16;
        match reg {
            Register::A => self.a = v as u8,
            Register::B => self.b = v as u8,
            Register::D => self.set_d(v),
            Register::X => self.x = v,
            Register::Y => self.y = v,
            Register::U => self.u = v,
            Register::S => self.s = v,
            Register::PC => self.pc = v,
            Register::DP => self.dp = v as u8,
            Register::CC => self.cc = v as u8,
        }
    }
}
