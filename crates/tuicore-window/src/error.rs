//! Precondition failures a caller can observe. Everything else in the error
//! taxonomy (illegal text, an unresolvable line mask, an unsupported scroll,
//! an op on a detached window) is handled in place — truncate, fall back to
//! a substitute glyph, return `false`, or silently no-op — rather than
//! surfaced as a `Result`, per the "errors never cross the event-loop
//! boundary" design.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Zero/negative geometry, a `goto` outside the window, a scroll rect
    /// not entirely inside the window, and similar caller-side precondition
    /// violations.
    #[error("precondition violated: {0}")]
    ProgrammerError(String),
}
