//! `RectSet`: an ordered, non-overlapping, eagerly-merged collection of
//! `Rect`s used for damage tracking and window occlusion.
//!
//! Invariant: at every point after a public mutator returns, the stored
//! rects are pairwise non-intersecting and sorted by `(top, left)`. Debug
//! builds assert this explicitly after `add`/`subtract`.

use crate::Rect;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectSet {
    rects: Vec<Rect>,
}

impl RectSet {
    pub fn new() -> Self {
        Self { rects: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Stored rects in sorted `(top, left)` order.
    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    /// True if any stored rect intersects `q`.
    pub fn intersects(&self, q: &Rect) -> bool {
        self.rects.iter().any(|r| r.intersects(q))
    }

    /// True if the union of stored rects fully covers `q`. Implemented by
    /// repeatedly subtracting every intersecting stored rect from the
    /// still-uncovered remainder of `q`; `q` is covered iff nothing remains.
    /// This is equivalent to (and cheaper than) rasterizing `q` and checking
    /// every cell lands in some stored rect.
    pub fn contains(&self, q: &Rect) -> bool {
        let mut remaining = vec![*q];
        for r in &self.rects {
            if remaining.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for rem in remaining {
                if r.intersects(&rem) {
                    next.extend(r_subtract_clip(&rem, r));
                } else {
                    next.push(rem);
                }
            }
            remaining = next;
        }
        remaining.is_empty()
    }

    /// Insert `new`, merging with any overlapping or edge-adjacent stored
    /// rect and re-inserting the result so the non-overlapping, sorted
    /// invariant holds afterward.
    pub fn add(&mut self, new: Rect) {
        self.add_rect(new);
        debug_assert!(self.invariant_holds(), "RectSet invariant violated by add");
    }

    fn add_rect(&mut self, new: Rect) {
        // Fully covered by an existing rect: nothing to do.
        if self.rects.iter().any(|r| r.contains(&new)) {
            return;
        }

        if let Some(idx) = self
            .rects
            .iter()
            .position(|r| r.intersects(&new) || mergeable_adjacent(r, &new))
        {
            let r = self.rects.remove(idx);
            for piece in r.add(&new) {
                self.add_rect(piece);
            }
            return;
        }

        let pos = self
            .rects
            .partition_point(|r| (r.top, r.left) < (new.top, new.left));
        self.rects.insert(pos, new);
    }

    /// Remove the intersection of `target` from every stored rect, splitting
    /// as needed (`Rect::subtract`, 0–4 pieces per affected rect).
    pub fn subtract(&mut self, target: Rect) {
        let mut out = Vec::with_capacity(self.rects.len());
        for r in self.rects.drain(..) {
            if r.intersects(&target) {
                out.extend(r.subtract(&target));
            } else {
                out.push(r);
            }
        }
        out.sort_by_key(|r| (r.top, r.left));
        self.rects = out;
        debug_assert!(
            self.invariant_holds(),
            "RectSet invariant violated by subtract"
        );
    }

    fn invariant_holds(&self) -> bool {
        for w in self.rects.windows(2) {
            if (w[0].top, w[0].left) > (w[1].top, w[1].left) {
                return false;
            }
        }
        for i in 0..self.rects.len() {
            for j in (i + 1)..self.rects.len() {
                if self.rects[i].intersects(&self.rects[j]) {
                    return false;
                }
            }
        }
        true
    }
}

/// Same-edge strip adjacency: `r` and `new` share a full top/bottom (or
/// left/right) edge and are horizontally (or vertically) contiguous without
/// overlapping, so `Rect::add` can fold them into one strip.
fn mergeable_adjacent(r: &Rect, new: &Rect) -> bool {
    (r.top == new.top && r.bottom() == new.bottom() && (r.right() == new.left || new.right() == r.left))
        || (r.left == new.left
            && r.right() == new.right()
            && (r.bottom() == new.top || new.bottom() == r.top))
}

fn r_subtract_clip(rem: &Rect, cutter: &Rect) -> Vec<Rect> {
    rem.subtract(cutter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(top: u32, left: u32, lines: u32, cols: u32) -> Rect {
        Rect::new(top, left, lines, cols).unwrap()
    }

    #[test]
    fn add_single_then_contains() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 5, 5));
        assert!(s.contains(&r(1, 1, 2, 2)));
        assert!(!s.contains(&r(4, 4, 3, 3)));
    }

    #[test]
    fn add_merges_adjacent_strips() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 3, 3));
        s.add(r(0, 3, 3, 3));
        assert_eq!(s.len(), 1);
        assert_eq!(s.rects().next(), Some(&r(0, 0, 3, 6)));
    }

    #[test]
    fn add_discards_fully_covered_rect() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 10, 10));
        s.add(r(2, 2, 3, 3));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn add_disjoint_rects_stay_sorted() {
        let mut s = RectSet::new();
        s.add(r(5, 5, 2, 2));
        s.add(r(0, 0, 2, 2));
        let v: Vec<_> = s.rects().cloned().collect();
        assert_eq!(v, vec![r(0, 0, 2, 2), r(5, 5, 2, 2)]);
    }

    #[test]
    fn subtract_splits_and_preserves_invariant() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 10, 10));
        s.subtract(r(4, 4, 2, 2));
        assert!(s.invariant_holds());
        assert!(!s.contains(&r(4, 4, 2, 2)));
        assert!(s.contains(&r(0, 0, 4, 10)));
    }

    #[test]
    fn add_subtract_round_trip_equivalent() {
        let mut s = RectSet::new();
        let target = r(2, 2, 3, 3);
        s.add(target);
        s.subtract(target);
        assert!(s.is_empty());
    }

    #[test]
    fn contains_via_union_of_two_rects() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 5, 5));
        s.add(r(0, 5, 5, 5));
        assert!(s.contains(&r(0, 0, 5, 10)));
    }

    #[test]
    fn intersects_basic() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 5, 5));
        assert!(s.intersects(&r(4, 4, 2, 2)));
        assert!(!s.intersects(&r(10, 10, 2, 2)));
    }

    #[test]
    fn clear_empties_set() {
        let mut s = RectSet::new();
        s.add(r(0, 0, 5, 5));
        s.clear();
        assert!(s.is_empty());
    }
}
