//! Unicode-aware column measurement: display width, column↔grapheme mapping,
//! and column-based string slicing.
//!
//! Everything here treats the grapheme cluster (EGC), not the Unicode
//! scalar value, as the atomic "character": a cursor position, a column
//! count, or a slice boundary that split a multi-codepoint cluster (a
//! flag, a ZWJ emoji sequence, a base + combining mark) would be
//! meaningless on a terminal grid. `width::egc_width` is the sole authority
//! on how many columns a cluster occupies; every other function here is
//! built on top of it.

mod measure;
mod width;

pub use measure::{CountLimit, MeasureError, Position, chars2cols, cols2chars, string_count, substr_cols, textwidth};
pub use width::egc_width;
