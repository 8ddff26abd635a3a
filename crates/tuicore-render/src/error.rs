//! Concrete realization of the `ProgrammerError`/`Detached` taxonomy from
//! the rendering spec: preconditions the caller violated, surfaced as
//! `Result` rather than a silent corrupted buffer.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// A `goto`/`text_at`/`char_at`/... targeted a cell outside the
    /// buffer's fixed `lines x cols` extent.
    #[error("position ({line}, {col}) is out of bounds for a {lines}x{cols} buffer")]
    OutOfBounds { line: i64, col: i64, lines: u32, cols: u32 },
}
