//! Column/grapheme/codepoint/byte measurement over Unicode strings.

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::width::egc_width;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeasureError {
    #[error("illegal codepoint in string at byte {index}")]
    IllegalCodepoint { index: usize },
}

/// A caller-owned cursor into a string, tracked in all four units at once:
/// codepoints, grapheme clusters, display columns, and bytes. Reused across
/// repeated [`string_count`] calls so a caller (the window print path) can
/// walk a string incrementally, stopping wherever a visibility span ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub chars: usize,
    pub graphemes: usize,
    pub cols: usize,
    pub bytes: usize,
}

/// Which counter (if any) bounds a [`string_count`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLimit {
    Chars(usize),
    Graphemes(usize),
    Cols(usize),
    Bytes(usize),
    EndOfString,
}

fn limit_reached(pos: &Position, limit: CountLimit) -> bool {
    match limit {
        CountLimit::Chars(n) => pos.chars >= n,
        CountLimit::Graphemes(n) => pos.graphemes >= n,
        CountLimit::Cols(n) => pos.cols >= n,
        CountLimit::Bytes(n) => pos.bytes >= n,
        CountLimit::EndOfString => false,
    }
}

/// Advance `pos` through `s`, starting at `pos.bytes`, one grapheme cluster
/// at a time, updating all four counters, until `limit` is reached or the
/// string is exhausted. Returns the number of bytes consumed by this call.
pub fn string_count(s: &str, pos: &mut Position, limit: CountLimit) -> Result<usize, MeasureError> {
    let start_bytes = pos.bytes;
    for g in s[pos.bytes..].graphemes(true) {
        let w = egc_width(g, pos.bytes)?;
        pos.chars += g.chars().count();
        pos.graphemes += 1;
        pos.cols += w as usize;
        pos.bytes += g.len();
        if limit_reached(pos, limit) {
            break;
        }
    }
    Ok(pos.bytes - start_bytes)
}

/// Total display width of `s`, or the byte offset of the first illegal
/// codepoint.
pub fn textwidth(s: &str) -> Result<usize, MeasureError> {
    let mut total = 0usize;
    let mut byte = 0usize;
    for g in s.graphemes(true) {
        total += egc_width(g, byte)? as usize;
        byte += g.len();
    }
    Ok(total)
}

struct Measured {
    widths: Vec<u16>,
    /// `prefix[i]` is the column count before grapheme `i`; `prefix[len]` is
    /// the string's total width.
    prefix: Vec<usize>,
}

fn measure_all(s: &str) -> Result<Measured, MeasureError> {
    let mut widths = Vec::new();
    let mut prefix = vec![0usize];
    let mut byte = 0usize;
    for g in s.graphemes(true) {
        let w = egc_width(g, byte)?;
        widths.push(w);
        prefix.push(prefix.last().unwrap() + w as usize);
        byte += g.len();
    }
    Ok(Measured { widths, prefix })
}

/// For each grapheme-cluster index in `char_indices` (required
/// non-decreasing), the column immediately past that character.
pub fn chars2cols(s: &str, char_indices: &[usize]) -> Result<Vec<usize>, MeasureError> {
    debug_assert!(
        char_indices.windows(2).all(|w| w[0] <= w[1]),
        "chars2cols requires non-decreasing indices"
    );
    let m = measure_all(s)?;
    Ok(char_indices
        .iter()
        .map(|&i| m.prefix.get(i + 1).copied().unwrap_or(*m.prefix.last().unwrap()))
        .collect())
}

/// Grapheme-cluster index for a single column query: the first index whose
/// cumulative column is already at or past `target_col`, or the index of a
/// wide glyph straddling it (never split a wide glyph across the boundary).
fn cols2char_one(m: &Measured, target_col: usize) -> usize {
    let n = m.widths.len();
    for i in 0..n {
        if m.prefix[i] >= target_col {
            return i;
        }
        if m.prefix[i] + m.widths[i] as usize > target_col {
            return i;
        }
    }
    n
}

/// For each column query in `col_widths` (required non-decreasing), the
/// grapheme-cluster index that column maps to.
pub fn cols2chars(s: &str, col_widths: &[usize]) -> Result<Vec<usize>, MeasureError> {
    debug_assert!(
        col_widths.windows(2).all(|w| w[0] <= w[1]),
        "cols2chars requires non-decreasing columns"
    );
    let m = measure_all(s)?;
    Ok(col_widths.iter().map(|&c| cols2char_one(&m, c)).collect())
}

/// Column-based slice of `s`: `[start_col, start_col + width_cols)`, or to
/// the end of the string if `width_cols` is `None`. If either boundary
/// falls inside a wide glyph, `replacement` pads the gap so the returned
/// string's width matches the requested column range exactly.
pub fn substr_cols(
    s: &str,
    start_col: usize,
    width_cols: Option<usize>,
    replacement: char,
) -> Result<String, MeasureError> {
    let m = measure_all(s)?;
    let total = *m.prefix.last().unwrap();
    let end_col = width_cols.map(|w| start_col + w).unwrap_or(total).min(total.max(start_col));

    let graphemes: Vec<&str> = s.graphemes(true).collect();
    let start_idx = cols2char_one(&m, start_col);
    let end_idx = cols2char_one(&m, end_col);

    let mut out = String::new();

    // If the start boundary cuts into start_idx's glyph, that glyph can't
    // be shown partially: pad for its visible remainder and skip it whole.
    let straddles_start = start_idx < graphemes.len() && m.prefix[start_idx] < start_col;
    if straddles_start {
        let gap = start_col - m.prefix[start_idx];
        for _ in 0..gap {
            out.push(replacement);
        }
    }
    let content_start = if straddles_start { start_idx + 1 } else { start_idx };

    for g in &graphemes[content_start.min(graphemes.len())..end_idx.min(graphemes.len())] {
        out.push_str(g);
    }

    if end_idx < graphemes.len() && m.prefix[end_idx] < end_col {
        let gap = end_col - m.prefix[end_idx];
        let fill = gap.min(m.widths[end_idx] as usize);
        for _ in 0..fill {
            out.push(replacement);
        }
    }

    Ok(out)
}
