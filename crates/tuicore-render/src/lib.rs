//! The off-screen rendering surface: buffered cell grid, pen/clip/mask state
//! frames, and line-drawing built on `tuicore-linemask`.
//!
//! Nothing here touches a terminal directly. Every drawing operation writes
//! into a [`RenderBuffer`]'s in-memory grid; [`RenderBuffer::flush`] is the
//! single point where that grid turns into a minimal sequence of
//! `tuicore_terminal::TerminalDriver` calls.

mod buffer;
mod cell;
mod error;
mod frame;

pub use buffer::{Caps, RenderBuffer};
pub use cell::Cell;
pub use error::RenderError;
