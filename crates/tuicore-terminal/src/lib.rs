//! Terminal driver abstraction: the single point where rendering output
//! actually leaves the process.
//!
//! [`TerminalDriver`] is consumed, not implemented, by the rest of this
//! crate family (`tuicore-render`, `tuicore-window`) — it is an opaque
//! sink of cell-level operations. Two implementations live here:
//! [`CrosstermDriver`], which emits real terminal escape sequences, and
//! [`RecordingDriver`], an in-memory op log for tests that would otherwise
//! need a real TTY.
//!
//! Terminal capability probing is explicitly out of scope: `scrollrect`
//! simply declines (returns `false`) whenever it can't satisfy a request
//! without probing, and callers fall back to a full-rect expose.

mod crossterm_driver;
mod guard;
mod recording;

pub use crossterm_driver::CrosstermDriver;
pub use guard::{CrosstermBackend, TerminalGuard};
pub use recording::{DriverOp, RecordingDriver};

use tuicore_pen::PenValue;

/// A mode `set_mode` can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalMode {
    AltScreen,
    CursorVis,
    Mouse,
    KeypadApp,
    CursorBlink,
}

/// Abstract sink for cell-level terminal output. Coordinates are 0-based.
pub trait TerminalDriver {
    fn goto(&mut self, line: u32, col: u32);
    fn print(&mut self, text: &str, pen: &PenValue);
    fn erasech(&mut self, count: u32, move_end: Option<bool>, pen: &PenValue);
    fn clear(&mut self);
    fn scrollrect(&mut self, top: u32, left: u32, lines: u32, cols: u32, down: i32, right: i32) -> bool;
    fn setpen(&mut self, pen: &PenValue);
    fn set_mode(&mut self, mode: TerminalMode, enabled: bool);
    fn set_ctl(&mut self, name: &str, value: &str);
    fn get_size(&self) -> (u32, u32);
    fn flush(&mut self);
}
