//! Box-drawing line masks and the table that resolves them to codepoints.
//!
//! [`LineMask`] packs a line style per border (north/east/south/west) into
//! one byte. [`LineMaskTable`] maps every one of the 256 possible masks to a
//! Unicode box-drawing codepoint, built once from a literal seed table and
//! two downgrade rules, and proven total at construction time rather than
//! trusted to be total at lookup time.
//!
//! Bit layout is this crate's own convention (the source spec leaves it
//! unspecified): two bits per direction, ordered N, E, S, W from the low
//! byte up, each holding a [`LineStyle`] discriminant.

use std::sync::LazyLock;

mod table;

pub use table::LineMaskTable;

/// One of the four borders a cell's box-drawing glyph can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn shift(self) -> u32 {
        match self {
            Direction::North => 0,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 6,
        }
    }
}

/// Line weight/doubling for one direction of a [`LineMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    None,
    Single,
    Double,
    Thick,
}

impl LineStyle {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LineStyle::None,
            1 => LineStyle::Single,
            2 => LineStyle::Double,
            _ => LineStyle::Thick,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            LineStyle::None => 0,
            LineStyle::Single => 1,
            LineStyle::Double => 2,
            LineStyle::Thick => 3,
        }
    }
}

/// An 8-bit per-cell line-segment mask: one [`LineStyle`] per [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineMask(u8);

impl LineMask {
    pub const EMPTY: LineMask = LineMask(0);

    pub fn from_bits(bits: u8) -> Self {
        LineMask(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn get(self, dir: Direction) -> LineStyle {
        LineStyle::from_bits(self.0 >> dir.shift())
    }

    #[must_use]
    pub fn set(self, dir: Direction, style: LineStyle) -> LineMask {
        let shift = dir.shift();
        let cleared = self.0 & !(0b11 << shift);
        LineMask(cleared | (style.to_bits() << shift))
    }

    pub fn from_directions(entries: &[(Direction, LineStyle)]) -> LineMask {
        entries
            .iter()
            .fold(LineMask::EMPTY, |m, &(d, s)| m.set(d, s))
    }

    /// Per-direction merge: `new`'s style wins unless `new` has `None` there,
    /// in which case `old`'s style is kept.
    pub fn merge(old: LineMask, new: LineMask) -> LineMask {
        Direction::ALL.iter().fold(LineMask::EMPTY, |acc, &d| {
            let s = match new.get(d) {
                LineStyle::None => old.get(d),
                other => other,
            };
            acc.set(d, s)
        })
    }

    fn downgrade_all(self, from: LineStyle, to: LineStyle) -> LineMask {
        Direction::ALL.iter().fold(self, |m, &d| {
            if m.get(d) == from { m.set(d, to) } else { m }
        })
    }
}

/// Global box-drawing codepoint table, resolved once.
pub static TABLE: LazyLock<LineMaskTable> = LazyLock::new(LineMaskTable::build);
