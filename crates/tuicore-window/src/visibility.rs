//! The occlusion query every window drawing op is built on: given a point,
//! how far does the current visible-or-obscured state run before it
//! changes?
//!
//! Ascends from the queried window toward the root. At each level, floating
//! visible siblings that precede the window the previous level ascended
//! through (z-order: earlier in the children list is frontmost, matching
//! `make_float`'s prepend) can obscure the point; once obscured, the state
//! only ever gets *re-bounded* tighter on the way up, never flips back to
//! visible.

use crate::window::{Window, index_of};

pub(crate) fn visibility_span(win: &Window, line: i64, col: i64) -> (bool, Option<u32>) {
    let mut cur = win.clone();
    let mut cur_line = line;
    let mut cur_col = col;
    let mut length: Option<u32> = None;
    let mut visible = true;
    let mut exclude: Option<Window> = None;

    loop {
        let (lines, cols) = (cur.lines(), cur.cols());
        if cur_line < 0 || cur_line >= lines as i64 || cur_col < 0 || cur_col >= cols as i64 {
            return (false, None);
        }

        let edge = (cols as i64 - cur_col) as u32;
        length = Some(length.map_or(edge, |l| l.min(edge)));

        if visible {
            let exclude_idx = exclude.as_ref().and_then(|e| index_of(&cur, e));
            let mut cover_run: Option<u32> = None;
            let mut gap_run: Option<u32> = None;
            for (i, child) in cur.children().into_iter().enumerate() {
                if let Some(ei) = exclude_idx {
                    if i >= ei {
                        continue;
                    }
                }
                if !child.is_float() || !child.is_visible() {
                    continue;
                }
                let f = child.frame();
                if cur_line < f.top as i64 || cur_line >= f.bottom() as i64 {
                    continue;
                }
                if cur_col >= f.left as i64 && cur_col < f.right() as i64 {
                    let run = (f.right() as i64 - cur_col) as u32;
                    cover_run = Some(cover_run.map_or(run, |r| r.max(run)));
                } else if (f.left as i64) > cur_col {
                    let run = (f.left as i64 - cur_col) as u32;
                    gap_run = Some(gap_run.map_or(run, |r| r.min(run)));
                }
            }
            if let Some(cr) = cover_run {
                visible = false;
                length = Some(length.unwrap().min(cr));
            } else if let Some(g) = gap_run {
                length = Some(length.unwrap().min(g));
            }
        }

        match cur.parent() {
            None => return (visible, length),
            Some(parent) => {
                cur_line += cur.top() as i64;
                cur_col += cur.left() as i64;
                exclude = Some(cur.clone());
                cur = parent;
            }
        }
    }
}
