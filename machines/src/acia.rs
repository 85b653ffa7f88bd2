//! MC6850 ACIA reduced to what a serial console needs: a receive register fed
//! from the host input queue and a transmit register that collects output.
//! Baud rate, framing and modem lines are accepted and ignored.

use dragon_core::core::{InputReceiver, KeyPress};
use log::{debug, trace};

pub const STATUS_RDRF: u8 = 0x01;
pub const STATUS_TDRE: u8 = 0x02;
pub const STATUS_IRQ: u8 = 0x80;

const CONTROL_MASTER_RESET: u8 = 0x03;
const CONTROL_RX_IRQ: u8 = 0x80;

#[derive(Debug)]
pub struct Acia6850 {
    control: u8,
    input: InputReceiver,
    output: Vec<u8>,
    lf_to_cr: bool,
}

impl Acia6850 {
    pub fn new(input: InputReceiver, lf_to_cr: bool) -> Self {
        Self {
            control: 0,
            input,
            output: Vec::new(),
            lf_to_cr,
        }
    }

    pub fn reset(&mut self) {
        self.control = 0;
    }

    fn rx_ready(&mut self) -> bool {
        !self.input.is_empty()
    }

    pub fn irq(&mut self) -> bool {
        self.control & CONTROL_RX_IRQ != 0 && self.rx_ready()
    }

    pub fn status(&mut self) -> u8 {
        let mut status = STATUS_TDRE;
        if self.rx_ready() {
            status |= STATUS_RDRF;
        }
        if self.irq() {
            status |= STATUS_IRQ;
        }
        status
    }

    /// Pop the received byte; 0 when nothing is waiting.
    pub fn read_data(&mut self) -> u8 {
        match self.input.try_recv() {
            Some(KeyPress::Ascii(b'\n')) if self.lf_to_cr => b'\r',
            Some(KeyPress::Ascii(byte)) => byte,
            Some(KeyPress::Scan { code, .. }) => code,
            None => 0,
        }
    }

    pub fn write_control(&mut self, value: u8) {
        if value & CONTROL_MASTER_RESET == CONTROL_MASTER_RESET {
            debug!("ACIA master reset");
        }
        self.control = value;
    }

    pub fn write_data(&mut self, value: u8) {
        trace!("ACIA TX {value:02X}");
        self.output.push(value);
    }

    /// Everything transmitted since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}
