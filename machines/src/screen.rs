//! MC6847 alphanumeric screen: 32 columns by 16 rows of video RAM decoded to
//! text for a terminal host.

pub const COLUMNS: usize = 32;
pub const ROWS: usize = 16;
pub const TEXT_BASE: u16 = 0x0400;
pub const TEXT_END: u16 = TEXT_BASE + (COLUMNS * ROWS) as u16 - 1;

// Semigraphics-4 quadrants, indexed by bits TL TR BL BR
const QUADRANTS: [char; 16] = [
    ' ', '▗', '▖', '▄', '▝', '▐', '▞', '▟', '▘', '▚', '▌', '▙', '▀', '▜', '▛', '█',
];

/// Character shown for one video RAM byte.
///
/// Bit 7 selects a semigraphics block. Otherwise the low six bits index the
/// VDG's 64-character ROM (`@A-Z[\]^_` then ASCII space to `?`) and bit 6
/// clear means inverse video, which BASIC uses for lower case.
pub fn decode(byte: u8) -> char {
    if byte & 0x80 != 0 {
        return QUADRANTS[(byte & 0x0F) as usize];
    }
    let code = byte & 0x3F;
    let ch = if code < 0x20 { b'@' + code } else { code } as char;
    if byte & 0x40 == 0 {
        ch.to_ascii_lowercase()
    } else {
        ch
    }
}

#[derive(Clone, Debug)]
pub struct TextScreen {
    cells: [u8; COLUMNS * ROWS],
    dirty: bool,
}

impl Default for TextScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScreen {
    pub fn new() -> Self {
        Self {
            cells: [0x60; COLUMNS * ROWS],
            dirty: true,
        }
    }

    /// Record a video RAM write; addresses outside the screen are ignored.
    pub fn write(&mut self, addr: u16, value: u8) {
        let Some(index) = addr.checked_sub(TEXT_BASE).map(usize::from) else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(index)
            && *cell != value
        {
            *cell = value;
            self.dirty = true;
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(COLUMNS)
            .map(|row| row.iter().map(|&b| decode(b)).collect())
            .collect()
    }

    /// The rows if anything changed since the last call.
    pub fn take_if_changed(&mut self) -> Option<Vec<String>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.rows())
    }
}
