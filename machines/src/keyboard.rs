//! Keyboard matrix behind PIA-0.
//!
//! The ROM drives column strobes (active low) on port B and reads row bits
//! (active low) back on port A. Host keypresses come off the input queue one
//! at a time: each is held down long enough for the ROM's scan and debounce
//! to see it, then released for a gap before the next one.

use dragon_core::core::{InputReceiver, KeyPress};
use log::trace;

/// Row and column of the SHIFT key (same on both layouts).
const SHIFT: (u8, u8) = (6, 7);

// How often an idle keyboard looks at the input queue
const POLL_INTERVAL: u64 = 1_000;

/// Physical matrix wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Dragon 32/64: digits and punctuation on rows 0-1, letters on rows 2-5.
    Dragon,
    /// Tandy CoCo: letters on rows 0-3, digits and punctuation on rows 4-5.
    CoCo,
}

/// Keys without a printable character, as raw matrix positions.
pub mod keys {
    pub const UP: (u8, u8) = (5, 3);
    pub const DOWN: (u8, u8) = (5, 4);
    pub const LEFT: (u8, u8) = (5, 5);
    pub const RIGHT: (u8, u8) = (5, 6);
    pub const ENTER: (u8, u8) = (6, 0);
    pub const CLEAR: (u8, u8) = (6, 1);
    pub const BREAK: (u8, u8) = (6, 2);
}

/// Matrix position of `ch` on the Dragon layout, plus whether SHIFT is held.
fn dragon_position(ch: u8) -> Option<((u8, u8), bool)> {
    let ch = ch.to_ascii_uppercase();
    let plain = |pos| Some((pos, false));
    match ch {
        b'0'..=b'7' => plain((0, ch - b'0')),
        b'8'..=b'9' => plain((1, ch - b'8')),
        b':' => plain((1, 2)),
        b';' => plain((1, 3)),
        b',' => plain((1, 4)),
        b'-' => plain((1, 5)),
        b'.' => plain((1, 6)),
        b'/' => plain((1, 7)),
        b'@'..=b'Z' => {
            let index = ch - b'@';
            plain((2 + index / 8, index % 8))
        }
        b' ' => plain((5, 7)),
        b'\r' | b'\n' => plain(keys::ENTER),
        0x08 | 0x7F => plain(keys::LEFT),
        0x03 | 0x1B => plain(keys::BREAK),
        0x0C => plain(keys::CLEAR),
        b'^' => plain(keys::UP),
        // Shifted digits and punctuation sit 16 codes away from their key
        b'!'..=b'+' => dragon_position(ch + 0x10).map(|(pos, _)| (pos, true)),
        b'<'..=b'?' => dragon_position(ch - 0x10).map(|(pos, _)| (pos, true)),
        _ => None,
    }
}

impl Layout {
    /// Matrix position of an ASCII character and whether it needs SHIFT.
    pub fn position(self, ch: u8) -> Option<((u8, u8), bool)> {
        let ((row, col), shift) = dragon_position(ch)?;
        let row = match self {
            Layout::Dragon => row,
            Layout::CoCo => match row {
                0 | 1 => row + 4,
                2..=5 => row - 2,
                _ => row,
            },
        };
        Some(((row, col), shift))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle { next_poll: u64 },
    Held { until: u64 },
    Gap { until: u64 },
}

#[derive(Debug)]
pub struct Keyboard {
    layout: Layout,
    input: InputReceiver,
    // Pressed rows per column
    columns: [u8; 8],
    phase: Phase,
    hold_cycles: u64,
    gap_cycles: u64,
}

impl Keyboard {
    pub fn new(layout: Layout, input: InputReceiver, hold_cycles: u64, gap_cycles: u64) -> Self {
        Self {
            layout,
            input,
            columns: [0; 8],
            phase: Phase::Idle { next_poll: 0 },
            hold_cycles,
            gap_cycles,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn release_all(&mut self) {
        self.columns = [0; 8];
    }

    /// Press a key at a matrix position until the next release.
    pub fn press(&mut self, (row, col): (u8, u8)) {
        if let Some(rows) = self.columns.get_mut(col as usize) {
            *rows |= 1 << (row & 0x07);
        }
    }

    /// Move the typing state machine on to `cycles`.
    pub fn update(&mut self, cycles: u64) {
        match self.phase {
            Phase::Idle { next_poll } if cycles >= next_poll => match self.input.try_recv() {
                Some(key) => self.start(key, cycles),
                None => {
                    self.phase = Phase::Idle {
                        next_poll: cycles + POLL_INTERVAL,
                    }
                }
            },
            Phase::Held { until } if cycles >= until => {
                self.release_all();
                self.phase = Phase::Gap {
                    until: cycles + self.gap_cycles,
                };
            }
            Phase::Gap { until } if cycles >= until => {
                self.phase = Phase::Idle { next_poll: cycles };
            }
            _ => {}
        }
    }

    fn start(&mut self, key: KeyPress, cycles: u64) {
        let pressed = match key {
            KeyPress::Ascii(ch) => self.layout.position(ch),
            // Raw scancodes are row * 8 + column; modifier bit 0 is SHIFT
            KeyPress::Scan { modifier, code } => Some(((code >> 3, code & 0x07), modifier & 1 != 0)),
        };
        match pressed {
            Some((pos, shift)) => {
                trace!("key {key:?} -> row {} col {} shift {shift}", pos.0, pos.1);
                self.press(pos);
                if shift {
                    self.press(SHIFT);
                }
                self.phase = Phase::Held {
                    until: cycles + self.hold_cycles,
                };
            }
            None => {
                trace!("key {key:?} has no matrix position");
                self.phase = Phase::Idle { next_poll: cycles };
            }
        }
    }

    /// Row inputs seen on port A for the column strobes on port B. Bit 7 is
    /// the joystick comparator and reads high.
    pub fn rows(&self, strobe: u8) -> u8 {
        let pressed = self
            .columns
            .iter()
            .enumerate()
            .filter(|(col, _)| strobe & (1 << col) == 0)
            .fold(0u8, |acc, (_, rows)| acc | rows);
        0x80 | (!pressed & 0x7F)
    }
}
