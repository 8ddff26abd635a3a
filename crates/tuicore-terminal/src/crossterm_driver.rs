//! [`CrosstermDriver`]: a [`crate::TerminalDriver`] that batches crossterm
//! commands into an in-memory buffer and writes them to stdout on
//! `flush()`, the same batch-then-flush shape as the teacher's `Writer`.
//!
//! A few operations crossterm has no `Command` for (erase-N-cells,
//! scroll-region scrolling, application keypad mode) are emitted as raw
//! escape sequences, written directly into the same buffer so ordering
//! relative to the crossterm-issued commands is preserved.

use std::io::Write;

use crossterm::cursor::{DisableBlinking, EnableBlinking, Hide, MoveRight, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::queue;

use tuicore_pen::PenValue;

use crate::{TerminalDriver, TerminalMode};

pub struct CrosstermDriver {
    buf: Vec<u8>,
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn queue_pen(&mut self, pen: &PenValue) {
        let _ = queue!(self.buf, SetAttribute(Attribute::Reset));
        if let Some(fg) = pen.fg {
            let _ = queue!(self.buf, SetForegroundColor(Color::AnsiValue(fg)));
        }
        if let Some(bg) = pen.bg {
            let _ = queue!(self.buf, SetBackgroundColor(Color::AnsiValue(bg)));
        }
        if pen.bold {
            let _ = queue!(self.buf, SetAttribute(Attribute::Bold));
        }
        if pen.under {
            let _ = queue!(self.buf, SetAttribute(Attribute::Underlined));
        }
        if pen.italic {
            let _ = queue!(self.buf, SetAttribute(Attribute::Italic));
        }
        if pen.reverse {
            let _ = queue!(self.buf, SetAttribute(Attribute::Reverse));
        }
        if pen.strike {
            let _ = queue!(self.buf, SetAttribute(Attribute::CrossedOut));
        }
        // altfont has no standard SGR equivalent; intentionally not emitted.
    }
}

impl TerminalDriver for CrosstermDriver {
    fn goto(&mut self, line: u32, col: u32) {
        let _ = queue!(self.buf, MoveTo(col as u16, line as u16));
    }

    fn print(&mut self, text: &str, pen: &PenValue) {
        self.queue_pen(pen);
        let _ = queue!(self.buf, Print(text));
    }

    fn erasech(&mut self, count: u32, move_end: Option<bool>, pen: &PenValue) {
        if count == 0 {
            return;
        }
        self.queue_pen(pen);
        let _ = write!(self.buf, "\x1b[{count}X");
        if move_end == Some(true) {
            let _ = queue!(self.buf, MoveRight(count as u16));
        }
    }

    fn clear(&mut self) {
        let _ = queue!(self.buf, Clear(ClearType::All));
    }

    fn scrollrect(&mut self, top: u32, left: u32, lines: u32, cols: u32, down: i32, right: i32) -> bool {
        if right != 0 {
            return false; // horizontal scroll needs DECSLRM; not attempted without capability probing
        }
        let (_rows, term_cols) = self.get_size();
        if left != 0 || cols != term_cols {
            return false; // only full-width scroll regions are attempted
        }
        if down == 0 {
            return true; // no-op scroll trivially succeeds
        }
        let bottom = top + lines;
        let _ = write!(self.buf, "\x1b[{};{}r", top + 1, bottom);
        if down > 0 {
            let _ = write!(self.buf, "\x1b[{down}T");
        } else {
            let _ = write!(self.buf, "\x1b[{}S", -down);
        }
        let _ = write!(self.buf, "\x1b[r");
        true
    }

    fn setpen(&mut self, pen: &PenValue) {
        self.queue_pen(pen);
    }

    fn set_mode(&mut self, mode: TerminalMode, enabled: bool) {
        match (mode, enabled) {
            (TerminalMode::AltScreen, true) => {
                let _ = queue!(self.buf, EnterAlternateScreen);
            }
            (TerminalMode::AltScreen, false) => {
                let _ = queue!(self.buf, LeaveAlternateScreen);
            }
            (TerminalMode::CursorVis, true) => {
                let _ = queue!(self.buf, Show);
            }
            (TerminalMode::CursorVis, false) => {
                let _ = queue!(self.buf, Hide);
            }
            (TerminalMode::Mouse, true) => {
                let _ = queue!(self.buf, EnableMouseCapture);
            }
            (TerminalMode::Mouse, false) => {
                let _ = queue!(self.buf, DisableMouseCapture);
            }
            (TerminalMode::CursorBlink, true) => {
                let _ = queue!(self.buf, EnableBlinking);
            }
            (TerminalMode::CursorBlink, false) => {
                let _ = queue!(self.buf, DisableBlinking);
            }
            (TerminalMode::KeypadApp, true) => {
                let _ = write!(self.buf, "\x1b=");
            }
            (TerminalMode::KeypadApp, false) => {
                let _ = write!(self.buf, "\x1b>");
            }
        }
    }

    fn set_ctl(&mut self, name: &str, value: &str) {
        match name {
            "title" => {
                let _ = queue!(self.buf, SetTitle(value));
            }
            "icon" => {
                let _ = write!(self.buf, "\x1b]1;{value}\x07");
            }
            _ => {
                tracing::debug!(target: "terminal.ctl", name, "unknown set_ctl name ignored");
            }
        }
    }

    fn get_size(&self) -> (u32, u32) {
        match crossterm::terminal::size() {
            Ok((cols, rows)) => (rows as u32, cols as u32),
            Err(_) => (24, 80),
        }
    }

    fn flush(&mut self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(&self.buf);
        let _ = out.flush();
        self.buf.clear();
    }
}
