//! `Rect`: an immutable, non-negative integer rectangle.
//!
//! Fields are `top`, `left`, `lines`, `cols`; `bottom`/`right` are derived
//! (`top + lines`, `left + cols`). A rect with zero `lines` or `cols` cannot
//! be constructed — callers get `GeomError::ZeroExtent` instead of a
//! degenerate value that would need special-casing everywhere downstream.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum GeomError {
    #[error("rect extent must be non-zero (lines={lines}, cols={cols})")]
    ZeroExtent { lines: u32, cols: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rect {
    pub top: u32,
    pub left: u32,
    pub lines: u32,
    pub cols: u32,
}

impl Rect {
    /// Construct a rect, rejecting zero extent in either dimension.
    pub fn new(top: u32, left: u32, lines: u32, cols: u32) -> Result<Self, GeomError> {
        if lines == 0 || cols == 0 {
            return Err(GeomError::ZeroExtent { lines, cols });
        }
        Ok(Self {
            top,
            left,
            lines,
            cols,
        })
    }

    #[inline]
    pub fn bottom(&self) -> u32 {
        self.top + self.lines
    }

    #[inline]
    pub fn right(&self) -> u32 {
        self.left + self.cols
    }

    /// Point containment: treats `[top, bottom)` x `[left, right)` as the
    /// occupied cell grid, so a rect contains its own last row/column.
    pub fn contains_point(&self, line: u32, col: u32) -> bool {
        line >= self.top && line < self.bottom() && col >= self.left && col < self.right()
    }

    /// True if `other` is fully covered by `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.top >= self.top
            && other.left >= self.left
            && other.bottom() <= self.bottom()
            && other.right() <= self.right()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.top < other.bottom()
            && other.top < self.bottom()
            && self.left < other.right()
            && other.left < self.right()
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        if top < bottom && left < right {
            Some(Rect {
                top,
                left,
                lines: bottom - top,
                cols: right - left,
            })
        } else {
            None
        }
    }

    pub fn translate(&self, dy: i64, dx: i64) -> Rect {
        let top = (self.top as i64 + dy).max(0) as u32;
        let left = (self.left as i64 + dx).max(0) as u32;
        Rect {
            top,
            left,
            lines: self.lines,
            cols: self.cols,
        }
    }

    /// Inclusive line range `[min, max]` clamped to this rect's vertical
    /// extent, returning `None` if the range falls entirely outside.
    pub fn linerange(&self, min: u32, max: u32) -> Option<(u32, u32)> {
        let lo = min.max(self.top);
        let hi = max.min(self.bottom().saturating_sub(1));
        if lo > hi { None } else { Some((lo, hi)) }
    }

    /// Union of `self` and `other`, covering them with the minimum number of
    /// non-overlapping rects: 1 if equal, 2 if they form a clean strip union
    /// (share one full edge at equal perpendicular extent), 3 otherwise
    /// (split into three non-overlapping strips).
    pub fn add(&self, other: &Rect) -> Vec<Rect> {
        if self == other {
            return vec![*self];
        }

        // Strip union: same rows, horizontally adjacent or overlapping, columns concatenate.
        if self.top == other.top && self.bottom() == other.bottom() {
            if let Some(u) = horizontal_strip_union(self, other) {
                return vec![u];
            }
        }
        // Strip union: same cols, vertically adjacent or overlapping, rows concatenate.
        if self.left == other.left && self.right() == other.right() {
            if let Some(u) = vertical_strip_union(self, other) {
                return vec![u];
            }
        }

        three_way_split(self, other)
    }

    /// Difference `self - other`: 0 rects if `other` fully covers `self`, up
    /// to 4 rects (top band, bottom band, left band, right band of the
    /// remaining ring) otherwise.
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        let Some(i) = self.intersect(other) else {
            return vec![*self];
        };
        if i == *self {
            return vec![];
        }

        let mut out = Vec::with_capacity(4);
        // Top band: full width, above the intersection.
        if i.top > self.top {
            out.push(Rect {
                top: self.top,
                left: self.left,
                lines: i.top - self.top,
                cols: self.cols,
            });
        }
        // Bottom band: full width, below the intersection.
        if i.bottom() < self.bottom() {
            out.push(Rect {
                top: i.bottom(),
                left: self.left,
                lines: self.bottom() - i.bottom(),
                cols: self.cols,
            });
        }
        // Left band: restricted to the intersection's row span.
        if i.left > self.left {
            out.push(Rect {
                top: i.top,
                left: self.left,
                lines: i.lines,
                cols: i.left - self.left,
            });
        }
        // Right band: restricted to the intersection's row span.
        if i.right() < self.right() {
            out.push(Rect {
                top: i.top,
                left: i.right(),
                lines: i.lines,
                cols: self.right() - i.right(),
            });
        }
        out
    }
}

fn horizontal_strip_union(a: &Rect, b: &Rect) -> Option<Rect> {
    let (left_r, right_r) = if a.left <= b.left { (a, b) } else { (b, a) };
    if right_r.left <= left_r.right() {
        let right = left_r.right().max(right_r.right());
        Some(Rect {
            top: a.top,
            left: left_r.left,
            lines: a.lines,
            cols: right - left_r.left,
        })
    } else {
        None
    }
}

fn vertical_strip_union(a: &Rect, b: &Rect) -> Option<Rect> {
    let (top_r, bot_r) = if a.top <= b.top { (a, b) } else { (b, a) };
    if bot_r.top <= top_r.bottom() {
        let bottom = top_r.bottom().max(bot_r.bottom());
        Some(Rect {
            top: top_r.top,
            left: a.left,
            lines: bottom - top_r.top,
            cols: a.cols,
        })
    } else {
        None
    }
}

/// Fallback union: split the bounding box into up to three horizontal
/// strips (above / overlapping-row-band / below) each as wide as whichever
/// of the two rects is active in that band. This always covers the union
/// with non-overlapping rects, though it is not unique.
fn three_way_split(a: &Rect, b: &Rect) -> Vec<Rect> {
    let top = a.top.min(b.top);
    let bottom = a.bottom().max(b.bottom());
    let mut bands: Vec<u32> = vec![top, bottom];
    for r in [a, b] {
        if r.top > top && r.top < bottom {
            bands.push(r.top);
        }
        if r.bottom() > top && r.bottom() < bottom {
            bands.push(r.bottom());
        }
    }
    bands.sort_unstable();
    bands.dedup();

    let mut out = Vec::with_capacity(3);
    for w in bands.windows(2) {
        let (band_top, band_bottom) = (w[0], w[1]);
        let mid = band_top + (band_bottom - band_top) / 2;
        let a_active = mid >= a.top && mid < a.bottom();
        let b_active = mid >= b.top && mid < b.bottom();
        let (left, right) = match (a_active, b_active) {
            (true, true) => (a.left.min(b.left), a.right().max(b.right())),
            (true, false) => (a.left, a.right()),
            (false, true) => (b.left, b.right()),
            (false, false) => continue,
        };
        out.push(Rect {
            top: band_top,
            left,
            lines: band_bottom - band_top,
            cols: right - left,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(top: u32, left: u32, lines: u32, cols: u32) -> Rect {
        Rect::new(top, left, lines, cols).unwrap()
    }

    #[test]
    fn zero_extent_rejected() {
        assert!(Rect::new(0, 0, 0, 5).is_err());
        assert!(Rect::new(0, 0, 5, 0).is_err());
    }

    #[test]
    fn derived_edges() {
        let a = r(2, 3, 4, 5);
        assert_eq!(a.bottom(), 6);
        assert_eq!(a.right(), 8);
    }

    #[test]
    fn self_intersect_contains_subtract() {
        let a = r(0, 0, 5, 5);
        assert_eq!(a.intersect(&a), Some(a));
        assert!(a.contains(&a));
        assert_eq!(a.subtract(&a), vec![]);
    }

    #[test]
    fn translate_round_trip() {
        let a = r(5, 5, 3, 3);
        let moved = a.translate(4, -2).translate(-4, 2);
        assert_eq!(moved, a);
    }

    #[test]
    fn translate_clamps_negative_to_zero() {
        let a = r(1, 1, 3, 3);
        let moved = a.translate(-5, -5);
        assert_eq!(moved.top, 0);
        assert_eq!(moved.left, 0);
    }

    #[test]
    fn intersects_disjoint() {
        let a = r(0, 0, 5, 5);
        let b = r(5, 5, 5, 5);
        assert!(!a.intersects(&b));
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn add_equal_rect_single() {
        let a = r(0, 0, 3, 3);
        assert_eq!(a.add(&a), vec![a]);
    }

    #[test]
    fn add_horizontal_strip_union() {
        let a = r(0, 0, 3, 3);
        let b = r(0, 3, 3, 3);
        let u = a.add(&b);
        assert_eq!(u, vec![r(0, 0, 3, 6)]);
    }

    #[test]
    fn add_vertical_strip_union() {
        let a = r(0, 0, 3, 4);
        let b = r(3, 0, 2, 4);
        let u = a.add(&b);
        assert_eq!(u, vec![r(0, 0, 5, 4)]);
    }

    #[test]
    fn add_disjoint_three_way_split() {
        let a = r(0, 0, 2, 2);
        let b = r(5, 5, 2, 2);
        let u = a.add(&b);
        assert!(u.len() <= 3 && !u.is_empty());
        // Every original cell must be covered by exactly one output rect's raster.
        for (ty, tx) in [(0u32, 0u32), (1, 1), (5, 5), (6, 6)] {
            assert!(u.iter().any(|x| x.contains_point(ty, tx)));
        }
    }

    #[test]
    fn subtract_hole_in_middle_four_rects() {
        let a = r(0, 0, 10, 10);
        let hole = r(4, 4, 2, 2);
        let diff = a.subtract(&hole);
        assert_eq!(diff.len(), 4);
        for d in &diff {
            assert!(a.contains(d));
            assert!(!d.intersects(&hole));
        }
    }

    #[test]
    fn subtract_full_cover_empty() {
        let a = r(2, 2, 3, 3);
        let covering = r(0, 0, 10, 10);
        assert_eq!(a.subtract(&covering), vec![]);
    }

    #[test]
    fn subtract_no_overlap_returns_self() {
        let a = r(0, 0, 3, 3);
        let b = r(10, 10, 3, 3);
        assert_eq!(a.subtract(&b), vec![a]);
    }

    #[test]
    fn linerange_clamped() {
        let a = r(2, 0, 5, 10); // rows 2..7
        assert_eq!(a.linerange(0, 3), Some((2, 3)));
        assert_eq!(a.linerange(10, 20), None);
        assert_eq!(a.linerange(0, 100), Some((2, 6)));
    }
}
