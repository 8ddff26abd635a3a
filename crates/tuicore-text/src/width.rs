//! `egc_width`: the terminal column width of a single grapheme cluster.
//!
//! Precedence order:
//! 1. Static override table, for sequences `unicode-width` measures wrong
//!    (ZWJ emoji, flags, keycaps, skin-tone modifiers).
//! 2. Heuristic classifier (semantic kind -> width).
//! 3. Conservative widen: a pictographic/regional-indicator signal present
//!    but classified as width 1 is widened to 2, since under-estimating
//!    causes visible drift and over-estimating only wastes a blank cell.
//!
//! Classifier is deliberately light: range checks for Extended Pictographic
//! and combining-mark blocks rather than a full Unicode property table.

use crate::measure::MeasureError;

/// Semantic classification of a grapheme cluster, used to pick a width when
/// the override table has no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    EmojiSimple,
    EmojiModifier,
    EmojiKeycap,
    EmojiFlag,
    EmojiZwj,
    Combining(bool),
    Other,
}

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

/// Codepoints the measurement layer refuses outright: Unicode noncharacters
/// (valid scalar values, but disallowed in interchange text — a real UTF-16
/// surrogate cannot occur in a Rust `&str`, so noncharacters are this
/// layer's representable form of "illegal codepoint"), and anything
/// `unicode_width` reports no column width for — C0/C1 control characters,
/// `wcwidth == -1` in the terminfo sense. `classify` is only ever reached
/// once every char in the cluster has cleared this check, so its width
/// lookups can never actually see a `None`.
fn is_illegal_codepoint(c: char) -> bool {
    let v = c as u32;
    (0xFDD0..=0xFDEF).contains(&v) || (v & 0xFFFE) == 0xFFFE || unicode_width::UnicodeWidthChar::width(c).is_none()
}

/// Width overrides for sequences the classifier alone gets wrong, kept
/// sorted by sequence for binary search.
const OVERRIDES: &[(&str, u16)] = &[
    ("1️⃣", 2),
    ("⚙", 1),
    ("⚙️", 1),
    ("👍🏻", 2),
    ("👨‍👩‍👧‍👦", 2),
    ("🇺🇸", 2),
];

fn override_width(egc: &str) -> Option<u16> {
    OVERRIDES
        .binary_search_by(|&(seq, _)| seq.cmp(egc))
        .ok()
        .map(|i| OVERRIDES[i].1)
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Other;
    };
    if chars.next().is_none() {
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        if is_extended_pictographic(first) {
            return EgcKind::EmojiSimple;
        }
        if unicode_width::UnicodeWidthChar::width(first).unwrap_or(1) == 2 {
            return EgcKind::Wide;
        }
        return EgcKind::Narrow;
    }

    let mut count_ep = 0usize;
    let mut count_ri = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut keycap_base_seen = false;
    let mut ends_with_keycap = false;
    let mut any_wide = false;
    let mut base_wide_or_emoji = false;
    let mut saw_non_mark_base = false;

    let total = egc.chars().count();
    for (i, c) in egc.chars().enumerate() {
        if is_extended_pictographic(c) {
            count_ep += 1;
        }
        if is_regional_indicator(c) {
            count_ri += 1;
        }
        if c == ZWJ {
            has_zwj = true;
        }
        if is_skin_tone_modifier(c) {
            has_skin = true;
        }
        if is_combining_mark(c) {
            has_combining = true;
        }
        if c == KEYCAP_COMBINING && i == total - 1 {
            ends_with_keycap = true;
        }
        if !keycap_base_seen && (c.is_ascii_digit() || c == '#' || c == '*') {
            keycap_base_seen = true;
        }
        if unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2 {
            any_wide = true;
        }
        if !saw_non_mark_base && !is_combining_mark(c) {
            saw_non_mark_base = true;
            if is_extended_pictographic(c) || unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2 {
                base_wide_or_emoji = true;
            }
        }
    }

    if ends_with_keycap && keycap_base_seen {
        return EgcKind::EmojiKeycap;
    }
    if count_ri == 2 && total == 2 {
        return EgcKind::EmojiFlag;
    }
    if has_zwj && count_ep >= 2 {
        return EgcKind::EmojiZwj;
    }
    if count_ep >= 1 && has_skin {
        return EgcKind::EmojiModifier;
    }
    if count_ep == 1 && !has_zwj {
        return EgcKind::EmojiSimple;
    }
    if has_combining {
        return EgcKind::Combining(base_wide_or_emoji);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    if count_ep > 0 {
        return EgcKind::EmojiSimple;
    }
    EgcKind::Narrow
}

fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Ascii | EgcKind::Narrow => 1,
        EgcKind::Wide
        | EgcKind::EmojiSimple
        | EgcKind::EmojiModifier
        | EgcKind::EmojiKeycap
        | EgcKind::EmojiFlag
        | EgcKind::EmojiZwj => 2,
        EgcKind::Combining(base_wide) => {
            if base_wide {
                2
            } else {
                1
            }
        }
        EgcKind::Other => 1,
    }
}

/// Column width of one grapheme cluster. `egc` must be a single cluster;
/// callers segment before calling (this does not re-segment).
pub fn egc_width(egc: &str, byte_offset: usize) -> Result<u16, MeasureError> {
    if egc.is_empty() {
        return Ok(0);
    }
    if let Some(c) = egc.chars().find(|&c| is_illegal_codepoint(c)) {
        let _ = c;
        return Err(MeasureError::IllegalCodepoint { index: byte_offset });
    }

    if let Some(w) = override_width(egc) {
        return Ok(w);
    }

    let kind = classify(egc);
    let mut width = width_for_kind(kind);

    if width == 1 && egc.chars().any(|c| is_extended_pictographic(c) || is_regional_indicator(c)) {
        width = 2;
    }
    Ok(width)
}
