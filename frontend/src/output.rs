//! Terminal output: the machine's text screen and its serial stream.
//!
//! On a terminal the screen is redrawn in place whenever it changes. When
//! stdout is a pipe or file only the final screen is printed, so captured
//! output stays readable.

use std::io::{self, Write};

const CLEAR_HOME: &str = "\x1b[H\x1b[2J";

pub struct Output<W: Write> {
    out: W,
    ansi: bool,
    last_screen: Option<Vec<String>>,
}

fn border(width: usize) -> String {
    format!("+{}+", "-".repeat(width))
}

/// `rows` inside an ASCII box.
pub fn frame(rows: &[String]) -> String {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut text = border(width);
    text.push('\n');
    for row in rows {
        text.push('|');
        text.push_str(row);
        text.push_str("|\n");
    }
    text.push_str(&border(width));
    text.push('\n');
    text
}

impl<W: Write> Output<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            last_screen: None,
        }
    }

    pub fn screen(&mut self, rows: Vec<String>) -> io::Result<()> {
        if self.ansi {
            write!(self.out, "{CLEAR_HOME}{}", frame(&rows))?;
            self.out.flush()?;
        }
        self.last_screen = Some(rows);
        Ok(())
    }

    pub fn serial(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()
    }

    /// Print the last screen if it has not been shown yet.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.ansi
            && let Some(rows) = self.last_screen.take()
        {
            write!(self.out, "{}", frame(&rows))?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
