//! MC6821 Peripheral Interface Adapter.
//!
//! Two identical sides, A and B, each with an output register, a data
//! direction register (0 = input, 1 = output per bit), a control register and
//! two control lines. Bit 2 of the control register selects whether offset
//! 0/2 addresses the DDR or the data port.
//!
//! | Offset | CRx.2 | Register     |
//! |--------|-------|--------------|
//! | 0      | 0     | DDRA         |
//! | 0      | 1     | Port A data  |
//! | 1      | x     | CRA          |
//! | 2      | 0     | DDRB         |
//! | 2      | 1     | Port B data  |
//! | 3      | x     | CRB          |

const CR_C1_ENABLE: u8 = 0x01;
const CR_C1_RISING: u8 = 0x02;
const CR_DATA_SELECT: u8 = 0x04;
const CR_C2_ENABLE: u8 = 0x08;
const CR_C2_RISING: u8 = 0x10;
const CR_C2_OUTPUT: u8 = 0x20;

#[derive(Clone, Debug, Default)]
struct Side {
    output: u8,
    ddr: u8,
    // Bits 5:0 only; 7:6 are the interrupt flags below
    ctrl: u8,
    input: u8,
    irq1: bool,
    irq2: bool,
    c1: bool,
    c2: bool,
}

impl Side {
    fn read_data(&mut self) -> u8 {
        self.irq1 = false;
        self.irq2 = false;
        (self.input & !self.ddr) | (self.output & self.ddr)
    }

    fn read(&mut self, reg: u8) -> u8 {
        if reg == 0 {
            if self.ctrl & CR_DATA_SELECT != 0 {
                self.read_data()
            } else {
                self.ddr
            }
        } else {
            ((self.irq1 as u8) << 7) | ((self.irq2 as u8) << 6) | self.ctrl
        }
    }

    fn write(&mut self, reg: u8, data: u8) {
        if reg == 0 {
            if self.ctrl & CR_DATA_SELECT != 0 {
                self.output = data;
            } else {
                self.ddr = data;
            }
        } else {
            self.ctrl = data & 0x3F;
        }
    }

    fn set_c1(&mut self, level: bool) {
        if edge(self.c1, level, self.ctrl & CR_C1_RISING != 0) {
            self.irq1 = true;
        }
        self.c1 = level;
    }

    fn set_c2(&mut self, level: bool) {
        if self.ctrl & CR_C2_OUTPUT != 0 {
            return;
        }
        if edge(self.c2, level, self.ctrl & CR_C2_RISING != 0) {
            self.irq2 = true;
        }
        self.c2 = level;
    }

    fn irq(&self) -> bool {
        let c1 = self.irq1 && self.ctrl & CR_C1_ENABLE != 0;
        let c2 = self.irq2 && self.ctrl & CR_C2_OUTPUT == 0 && self.ctrl & CR_C2_ENABLE != 0;
        c1 || c2
    }

    /// Level driven on C2 in output mode (CRx bits 5:4 = 11 drives bit 3).
    fn c2_output(&self) -> bool {
        self.ctrl & (CR_C2_OUTPUT | CR_C2_RISING) == (CR_C2_OUTPUT | CR_C2_RISING)
            && self.ctrl & CR_C2_ENABLE != 0
    }
}

fn edge(old: bool, new: bool, rising: bool) -> bool {
    if rising { !old && new } else { old && !new }
}

#[derive(Clone, Debug, Default)]
pub struct Pia6821 {
    a: Side,
    b: Side,
}

impl Pia6821 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on state: every pin an input, all interrupts disabled.
    pub fn reset(&mut self) {
        let (input_a, input_b) = (self.a.input, self.b.input);
        *self = Self::default();
        self.a.input = input_a;
        self.b.input = input_b;
    }

    /// `offset` is RS1:RS0. Reading a data port clears that side's flags.
    pub fn read(&mut self, offset: u8) -> u8 {
        match offset & 0x03 {
            0 => self.a.read(0),
            1 => self.a.read(1),
            2 => self.b.read(0),
            _ => self.b.read(1),
        }
    }

    pub fn write(&mut self, offset: u8, data: u8) {
        match offset & 0x03 {
            0 => self.a.write(0, data),
            1 => self.a.write(1, data),
            2 => self.b.write(0, data),
            _ => self.b.write(1, data),
        }
    }

    /// Levels on the port A input pins, set by board logic.
    pub fn set_port_a_input(&mut self, data: u8) {
        self.a.input = data;
    }

    pub fn set_port_b_input(&mut self, data: u8) {
        self.b.input = data;
    }

    /// Bits the CPU drives on port A (ORA masked by DDRA).
    pub fn output_a(&self) -> u8 {
        self.a.output & self.a.ddr
    }

    pub fn output_b(&self) -> u8 {
        self.b.output & self.b.ddr
    }

    pub fn ctrl_a(&self) -> u8 {
        self.a.ctrl
    }

    pub fn ctrl_b(&self) -> u8 {
        self.b.ctrl
    }

    pub fn set_ca1(&mut self, level: bool) {
        self.a.set_c1(level);
    }

    pub fn set_ca2(&mut self, level: bool) {
        self.a.set_c2(level);
    }

    pub fn set_cb1(&mut self, level: bool) {
        self.b.set_c1(level);
    }

    pub fn set_cb2(&mut self, level: bool) {
        self.b.set_c2(level);
    }

    pub fn irq_a(&self) -> bool {
        self.a.irq()
    }

    pub fn irq_b(&self) -> bool {
        self.b.irq()
    }

    pub fn ca2_output(&self) -> bool {
        self.a.c2_output()
    }

    pub fn cb2_output(&self) -> bool {
        self.b.c2_output()
    }
}
