//! [`RenderBuffer`]: the off-screen, operation-buffered drawing surface.
//!
//! Fixed `lines x cols` at construction, reused across frames via
//! [`RenderBuffer::reset`]. Every operation writes into the in-memory
//! [`Cell`] grid (after translation, clip, and mask are applied); nothing
//! reaches the terminal until [`RenderBuffer::flush`] walks the grid in
//! reading order and emits the minimal `goto`/`print`/`erasech` sequence a
//! [`TerminalDriver`] needs.

use unicode_segmentation::UnicodeSegmentation;

use tuicore_geom::Rect;
use tuicore_linemask::{Direction, LineMask, LineStyle, TABLE};
use tuicore_pen::PenValue;
use tuicore_terminal::TerminalDriver;
use tuicore_text::egc_width;

use crate::cell::Cell;
use crate::error::RenderError;
use crate::frame::FrameStack;

/// Which end of a line-drawing run gets its outbound half drawn. The
/// inbound side (facing the other endpoint) is always drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caps {
    pub start: bool,
    pub end: bool,
}

impl Caps {
    pub const NONE: Caps = Caps { start: false, end: false };
}

pub struct RenderBuffer {
    lines: u32,
    cols: u32,
    cells: Vec<Cell>,
    texts: Vec<String>,
    frame: FrameStack,
}

impl RenderBuffer {
    pub fn new(lines: u32, cols: u32) -> Self {
        RenderBuffer {
            lines,
            cols,
            cells: vec![Cell::Skip; (lines as usize) * (cols as usize)],
            texts: Vec::new(),
            frame: FrameStack::default(),
        }
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, line: u32, col: u32) -> usize {
        line as usize * self.cols as usize + col as usize
    }

    /// Current cell at `(line, col)`, for tests and introspection.
    pub fn get_cell(&self, line: u32, col: u32) -> &Cell {
        &self.cells[self.index(line, col)]
    }

    // --- state-frame stack -------------------------------------------------

    pub fn save(&mut self) {
        self.frame.save();
    }

    pub fn savepen(&mut self) {
        self.frame.savepen();
    }

    pub fn restore(&mut self) {
        self.frame.restore();
    }

    pub fn reset(&mut self) {
        self.frame.reset();
        self.texts.clear();
        for c in &mut self.cells {
            *c = Cell::Skip;
        }
    }

    pub fn clip(&mut self, rect: Rect) {
        let (t, l) = self.frame.to_absolute(rect.top as i64, rect.left as i64);
        let abs = clamp_rect_to_i64(t, l, rect.lines, rect.cols);
        let combined = match self.frame.state.clip {
            Some(cur) => cur.intersect(&abs),
            None => Some(abs),
        };
        self.frame.state.clip = Some(combined.unwrap_or_else(|| self.empty_clip_sentinel()));
    }

    /// A 1x1 rect positioned just past the buffer's extent: guaranteed to
    /// never `contains_point` any in-bounds cell, used when a `clip()` call
    /// intersects down to nothing.
    fn empty_clip_sentinel(&self) -> Rect {
        Rect::new(self.lines.max(1), self.cols.max(1), 1, 1).expect("sentinel extent is non-zero")
    }

    pub fn mask(&mut self, rect: Rect) {
        let (t, l) = self.frame.to_absolute(rect.top as i64, rect.left as i64);
        let abs = clamp_rect_to_i64(t, l, rect.lines, rect.cols);
        self.frame.state.masks.push(abs);
    }

    pub fn translate(&mut self, dy: i64, dx: i64) {
        self.frame.state.dy += dy;
        self.frame.state.dx += dx;
    }

    pub fn setpen(&mut self, pen: PenValue) {
        self.frame.state.pen = PenValue::merge(&self.frame.state.pen, &pen);
    }

    pub fn goto(&mut self, line: i64, col: i64) {
        if !self.in_buffer(line, col) {
            let err = RenderError::OutOfBounds { line, col, lines: self.lines, cols: self.cols };
            tracing::warn!(target: "render.buffer", %err, "goto() targeted a cell outside the buffer, ignoring");
            return;
        }
        self.frame.state.cursor = Some((line, col));
    }

    pub fn goto_unset(&mut self) {
        self.frame.state.cursor = None;
    }

    fn cursor(&self) -> (i64, i64) {
        self.frame.state.cursor.unwrap_or((0, 0))
    }

    // --- bounds / clip / mask checks ---------------------------------------

    fn in_buffer(&self, line: i64, col: i64) -> bool {
        line >= 0 && col >= 0 && (line as u32) < self.lines && (col as u32) < self.cols
    }

    fn passes(&self, line: i64, col: i64) -> bool {
        if !self.in_buffer(line, col) {
            return false;
        }
        if let Some(clip) = self.frame.state.clip
            && !clip.contains_point(line as u32, col as u32)
        {
            return false;
        }
        if self
            .frame
            .state
            .masks
            .iter()
            .any(|m| m.contains_point(line as u32, col as u32))
        {
            return false;
        }
        true
    }

    /// If the cell at `(line, col)` is a `Continuation` whose leader lies
    /// outside `[op_start, op_end)`, invalidate that leader to `Skip`
    /// (its run is being partially overwritten by a write this op doesn't
    /// also cover).
    fn invalidate_displaced_leader(&mut self, line: u32, col: u32, op_start: u32, op_end: u32) {
        let idx = self.index(line, col);
        if let Cell::Continuation { start_col } = self.cells[idx]
            && !(op_start <= start_col && start_col < op_end)
        {
            let leader_idx = self.index(line, start_col);
            self.cells[leader_idx] = Cell::Skip;
        }
    }

    // --- skip ---------------------------------------------------------------

    pub fn skip(&mut self, n: u32) {
        let (line, col) = self.cursor();
        self.skip_at_internal(line, col, n);
        self.frame.state.cursor = Some((line, col + n as i64));
    }

    pub fn skip_at(&mut self, line: i64, col: i64, n: u32) {
        self.skip_at_internal(line, col, n);
    }

    pub fn skip_to(&mut self, col: i64) {
        let (line, cur_col) = self.cursor();
        let n = (col - cur_col).max(0) as u32;
        self.skip_at_internal(line, cur_col, n);
        self.frame.state.cursor = Some((line, col));
    }

    fn skip_at_internal(&mut self, line: i64, col: i64, n: u32) {
        let (aline, acol) = self.frame.to_absolute(line, col);
        let op_start = acol.max(0) as u32;
        let op_end = op_start + n;
        for i in 0..n {
            let c = acol + i as i64;
            if !self.passes(aline, c) {
                continue;
            }
            let (lu, cu) = (aline as u32, c as u32);
            self.invalidate_displaced_leader(lu, cu, op_start, op_end);
            let idx = self.index(lu, cu);
            self.cells[idx] = Cell::Skip;
        }
    }

    // --- erase ---------------------------------------------------------------

    pub fn erase(&mut self, n: u32, pen: PenValue) {
        let (line, col) = self.cursor();
        self.erase_at_internal(line, col, n, pen);
        self.frame.state.cursor = Some((line, col + n as i64));
    }

    pub fn erase_at(&mut self, line: i64, col: i64, n: u32, pen: PenValue) {
        self.erase_at_internal(line, col, n, pen);
    }

    pub fn erase_to(&mut self, col: i64, pen: PenValue) {
        let (line, cur_col) = self.cursor();
        let n = (col - cur_col).max(0) as u32;
        self.erase_at_internal(line, cur_col, n, pen);
        self.frame.state.cursor = Some((line, col));
    }

    pub fn eraserect(&mut self, rect: Rect, pen: PenValue) {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        for line in rect.top..rect.bottom() {
            self.erase_row_local(line as i64, rect.left as i64, rect.cols, effective);
        }
    }

    pub fn clear(&mut self, pen: PenValue) {
        let rect = Rect::new(0, 0, self.lines, self.cols).expect("buffer extent is non-zero");
        self.eraserect(rect, pen);
    }

    fn erase_at_internal(&mut self, line: i64, col: i64, n: u32, pen: PenValue) {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        self.erase_row_local(line, col, n, effective);
    }

    fn erase_row_local(&mut self, line: i64, col: i64, n: u32, effective_pen: PenValue) {
        let (aline, acol) = self.frame.to_absolute(line, col);
        let op_start = acol.max(0) as u32;
        let op_end = op_start + n;
        for i in 0..n {
            let c = acol + i as i64;
            if !self.passes(aline, c) {
                continue;
            }
            let (lu, cu) = (aline as u32, c as u32);
            self.invalidate_displaced_leader(lu, cu, op_start, op_end);
            let idx = self.index(lu, cu);
            self.cells[idx] = Cell::Erase(effective_pen);
        }
    }

    // --- text / char -----------------------------------------------------

    /// Write `s` starting at the cursor; returns the number of columns
    /// produced (which may be less than `textwidth(s)` if clipped).
    pub fn text(&mut self, s: &str, pen: PenValue) -> u32 {
        let (line, col) = self.cursor();
        let produced = self.text_at_internal(line, col, s, pen);
        self.frame.state.cursor = Some((line, col + produced as i64));
        produced
    }

    pub fn text_at(&mut self, line: i64, col: i64, s: &str, pen: PenValue) -> u32 {
        self.text_at_internal(line, col, s, pen)
    }

    fn text_at_internal(&mut self, line: i64, col: i64, s: &str, pen: PenValue) -> u32 {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        let (aline, acol) = self.frame.to_absolute(line, col);

        let text_id = self.texts.len();
        self.texts.push(s.to_string());

        let op_start = acol.max(0) as u32;
        let mut cursor_col = acol;
        let mut produced: u32 = 0;
        let mut byte = 0usize;
        for g in s.graphemes(true) {
            let w = match egc_width(g, byte) {
                Ok(w) => w,
                Err(_) => break, // illegal codepoint: stop, produce what we have so far
            };
            byte += g.len();
            if w == 0 {
                continue;
            }
            let op_end = op_start + produced + w as u32;
            if self.passes(aline, cursor_col) {
                let (lu, cu) = (aline as u32, cursor_col as u32);
                self.invalidate_displaced_leader(lu, cu, op_start, op_end);
                let idx = self.index(lu, cu);
                self.cells[idx] = Cell::Text {
                    text_id,
                    col_offset: produced,
                    pen: effective,
                };
                for k in 1..w {
                    let cc = cursor_col + k as i64;
                    if self.passes(aline, cc) {
                        let cu2 = cc as u32;
                        self.invalidate_displaced_leader(lu, cu2, op_start, op_end);
                        let idx2 = self.index(lu, cu2);
                        self.cells[idx2] = Cell::Continuation { start_col: cu };
                    }
                }
            }
            cursor_col += w as i64;
            produced += w as u32;
        }
        produced
    }

    pub fn char(&mut self, cp: char, pen: PenValue) {
        let (line, col) = self.cursor();
        self.char_at_internal(line, col, cp, pen);
        self.frame.state.cursor = Some((line, col + 1));
    }

    pub fn char_at(&mut self, line: i64, col: i64, cp: char, pen: PenValue) {
        self.char_at_internal(line, col, cp, pen);
    }

    fn char_at_internal(&mut self, line: i64, col: i64, cp: char, pen: PenValue) {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        let (aline, acol) = self.frame.to_absolute(line, col);
        if !self.passes(aline, acol) {
            return;
        }
        let (lu, cu) = (aline as u32, acol as u32);
        self.invalidate_displaced_leader(lu, cu, cu, cu + 1);
        let idx = self.index(lu, cu);
        self.cells[idx] = Cell::Char(cp, effective);
    }

    // --- line drawing ------------------------------------------------------

    fn write_line_cell(&mut self, line: i64, col: i64, new_mask: LineMask, pen: PenValue) {
        let (aline, acol) = self.frame.to_absolute(line, col);
        if !self.passes(aline, acol) {
            return;
        }
        let (lu, cu) = (aline as u32, acol as u32);
        let idx = self.index(lu, cu);
        match self.cells[idx] {
            Cell::Line(old_mask, _) => {
                self.cells[idx] = Cell::Line(LineMask::merge(old_mask, new_mask), pen);
            }
            _ => {
                self.invalidate_displaced_leader(lu, cu, cu, cu + 1);
                self.cells[idx] = Cell::Line(new_mask, pen);
            }
        }
    }

    pub fn hline_at(&mut self, line: i64, c0: i64, c1: i64, style: LineStyle, pen: PenValue, caps: Caps) {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        let (lo, hi) = (c0.min(c1), c0.max(c1));
        for col in lo..=hi {
            let mut m = LineMask::EMPTY;
            if col > lo || caps.start {
                m = m.set(Direction::West, style);
            }
            if col < hi || caps.end {
                m = m.set(Direction::East, style);
            }
            self.write_line_cell(line, col, m, effective);
        }
    }

    pub fn vline_at(&mut self, l0: i64, l1: i64, col: i64, style: LineStyle, pen: PenValue, caps: Caps) {
        let effective = PenValue::merge(&self.frame.state.pen, &pen);
        let (lo, hi) = (l0.min(l1), l0.max(l1));
        for line in lo..=hi {
            let mut m = LineMask::EMPTY;
            if line > lo || caps.start {
                m = m.set(Direction::North, style);
            }
            if line < hi || caps.end {
                m = m.set(Direction::South, style);
            }
            self.write_line_cell(line, col, m, effective);
        }
    }

    pub fn linebox_at(&mut self, l0: i64, l1: i64, c0: i64, c1: i64, style: LineStyle, pen: PenValue) {
        self.hline_at(l0, c0, c1, style, pen, Caps::NONE);
        self.hline_at(l1, c0, c1, style, pen, Caps::NONE);
        self.vline_at(l0, l1, c0, style, pen, Caps::NONE);
        self.vline_at(l0, l1, c1, style, pen, Caps::NONE);
    }

    // --- flush ---------------------------------------------------------------

    /// Emit the minimal terminal op sequence for the current grid, then
    /// reset the buffer (per spec: "after flush, the buffer resets").
    pub fn flush(&mut self, driver: &mut dyn TerminalDriver) {
        for line in 0..self.lines {
            self.flush_line(line, driver);
        }
        driver.flush();
        self.reset();
    }

    fn flush_line(&self, line: u32, driver: &mut dyn TerminalDriver) {
        let mut col = 0u32;
        let mut need_goto = true;
        while col < self.cols {
            let cell = self.get_cell(line, col);
            match *cell {
                Cell::Skip | Cell::Continuation { .. } => {
                    need_goto = true;
                    col += 1;
                }
                Cell::Erase(pen) => {
                    let start = col;
                    let mut end = col + 1;
                    while end < self.cols && matches!(self.get_cell(line, end), Cell::Erase(p) if *p == pen) {
                        end += 1;
                    }
                    if need_goto {
                        driver.goto(line, start);
                        need_goto = false;
                    }
                    // move_end=true only when there's further visible content
                    // on this line to the right; otherwise the driver would
                    // move the cursor past the last real column.
                    let move_end = end < self.cols && !matches!(self.get_cell(line, end), Cell::Skip);
                    driver.erasech(end - start, Some(move_end), &pen);
                    col = end;
                }
                Cell::Char(cp0, pen0) => {
                    let start = col;
                    let mut end = col + 1;
                    // concatenate adjacent same-pen Char cells into one print
                    let mut s = String::new();
                    s.push(cp0);
                    while end < self.cols {
                        match self.get_cell(line, end) {
                            Cell::Char(cp, p) if *p == pen0 => {
                                s.push(*cp);
                                end += 1;
                            }
                            _ => break,
                        }
                    }
                    if need_goto {
                        driver.goto(line, start);
                        need_goto = false;
                    }
                    driver.print(&s, &pen0);
                    col = end;
                }
                Cell::Line(_, _) => {
                    let start = col;
                    let pen0 = match self.get_cell(line, start) {
                        Cell::Line(_, p) => *p,
                        _ => unreachable!(),
                    };
                    let mut s = String::new();
                    let mut end = start;
                    while end < self.cols {
                        match self.get_cell(line, end) {
                            Cell::Line(mask, p) if *p == pen0 => {
                                s.push(TABLE.get(*mask));
                                end += 1;
                            }
                            _ => break,
                        }
                    }
                    if need_goto {
                        driver.goto(line, start);
                        need_goto = false;
                    }
                    driver.print(&s, &pen0);
                    col = end;
                }
                Cell::Text { text_id, col_offset, pen } => {
                    let start = col;
                    let mut end = col + 1;
                    while end < self.cols {
                        match self.get_cell(line, end) {
                            Cell::Text { text_id: t, pen: p, .. } if *t == text_id && *p == pen => {
                                end += 1;
                            }
                            Cell::Continuation { .. } => {
                                end += 1;
                            }
                            _ => break,
                        }
                    }
                    let run_cols = end - start;
                    let stored = &self.texts[text_id];
                    let slice = tuicore_text::substr_cols(stored, col_offset as usize, Some(run_cols as usize), ' ')
                        .unwrap_or_default();
                    if need_goto {
                        driver.goto(line, start);
                        need_goto = false;
                    }
                    driver.print(&slice, &pen);
                    col = end;
                }
            }
        }
    }
}

fn clamp_rect_to_i64(top: i64, left: i64, lines: u32, cols: u32) -> Rect {
    let t = top.max(0) as u32;
    let l = left.max(0) as u32;
    Rect::new(t, l, lines.max(1), cols.max(1)).unwrap_or_else(|_| Rect::new(0, 0, 1, 1).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuicore_linemask::LineStyle::Single;
    use tuicore_terminal::{DriverOp, RecordingDriver};

    fn p() -> PenValue {
        PenValue::new()
    }

    #[test]
    fn linebox_corners_and_runs() {
        let mut b = RenderBuffer::new(5, 10);
        b.linebox_at(0, 4, 0, 9, Single, p());
        assert_eq!(*b.get_cell(0, 0), Cell::Line(LineMask::EMPTY.set(Direction::South, Single).set(Direction::East, Single), p()));
        assert_eq!(*b.get_cell(0, 9), Cell::Line(LineMask::EMPTY.set(Direction::South, Single).set(Direction::West, Single), p()));
        assert_eq!(*b.get_cell(4, 0), Cell::Line(LineMask::EMPTY.set(Direction::North, Single).set(Direction::East, Single), p()));
        assert_eq!(*b.get_cell(4, 9), Cell::Line(LineMask::EMPTY.set(Direction::North, Single).set(Direction::West, Single), p()));
        // top run interior
        assert_eq!(
            *b.get_cell(0, 5),
            Cell::Line(LineMask::EMPTY.set(Direction::East, Single).set(Direction::West, Single), p())
        );
        // left run interior
        assert_eq!(
            *b.get_cell(2, 0),
            Cell::Line(LineMask::EMPTY.set(Direction::North, Single).set(Direction::South, Single), p())
        );
    }

    #[test]
    fn hline_vline_merge_to_cross() {
        let mut b = RenderBuffer::new(5, 5);
        b.hline_at(2, 0, 4, Single, p(), Caps::NONE);
        b.vline_at(0, 4, 2, Single, p(), Caps::NONE);
        let cross = LineMask::EMPTY
            .set(Direction::North, Single)
            .set(Direction::South, Single)
            .set(Direction::East, Single)
            .set(Direction::West, Single);
        assert_eq!(*b.get_cell(2, 2), Cell::Line(cross, p()));
    }

    #[test]
    fn wide_char_overwrite_turns_leader_into_skip() {
        let mut b = RenderBuffer::new(1, 10);
        b.text_at(0, 2, "日", p());
        assert!(matches!(b.get_cell(0, 2), Cell::Text { .. }));
        assert_eq!(*b.get_cell(0, 3), Cell::Continuation { start_col: 2 });

        b.text_at(0, 3, "X", p());
        assert_eq!(*b.get_cell(0, 2), Cell::Skip);
        assert!(matches!(b.get_cell(0, 3), Cell::Text { .. }));

        let mut driver = RecordingDriver::new((1, 10));
        b.flush(&mut driver);
        assert_eq!(driver.ops, vec![DriverOp::Goto(0, 3), DriverOp::Print("X".into(), p()), DriverOp::Flush]);
    }

    #[test]
    fn save_restore_is_observably_unchanged() {
        let mut b = RenderBuffer::new(3, 3);
        b.setpen(PenValue::new().with_bold(true));
        b.goto(1, 1);
        b.clip(Rect::new(0, 0, 2, 2).unwrap());
        let before = b.frame.state.clone();
        b.save();
        b.restore();
        assert_eq!(b.frame.state, before);
    }

    #[test]
    fn savepen_restore_only_reverts_pen() {
        let mut b = RenderBuffer::new(3, 3);
        b.goto(1, 1);
        b.savepen();
        b.setpen(PenValue::new().with_bold(true));
        b.goto(2, 2);
        b.restore();
        assert!(!b.frame.state.pen.bold);
        assert_eq!(b.frame.state.cursor, Some((2, 2)));
    }

    #[test]
    fn masked_write_is_silent_no_op() {
        let mut b = RenderBuffer::new(3, 3);
        b.mask(Rect::new(1, 1, 1, 1).unwrap());
        b.char_at(1, 1, 'X', p());
        assert_eq!(*b.get_cell(1, 1), Cell::Skip);
    }

    #[test]
    fn clipped_write_is_silent_no_op() {
        let mut b = RenderBuffer::new(3, 3);
        b.clip(Rect::new(0, 0, 1, 1).unwrap());
        b.char_at(2, 2, 'X', p());
        assert_eq!(*b.get_cell(2, 2), Cell::Skip);
    }

    #[test]
    fn erase_runs_combine_into_one_erasech() {
        let mut b = RenderBuffer::new(1, 5);
        b.erase_at(0, 0, 5, p());
        let mut driver = RecordingDriver::new((1, 5));
        b.flush(&mut driver);
        // nothing follows the erase on this line, so the driver must not be
        // told to move its cursor past the last real column.
        assert_eq!(
            driver.ops,
            vec![DriverOp::Goto(0, 0), DriverOp::Erasech(5, Some(false), p()), DriverOp::Flush]
        );
    }

    #[test]
    fn erase_run_followed_by_text_sets_move_end() {
        let mut b = RenderBuffer::new(1, 5);
        b.erase_at(0, 0, 3, p());
        b.char_at(0, 3, 'Y', p());
        let mut driver = RecordingDriver::new((1, 5));
        b.flush(&mut driver);
        assert_eq!(
            driver.ops,
            vec![
                DriverOp::Goto(0, 0),
                DriverOp::Erasech(3, Some(true), p()),
                DriverOp::Print("Y".into(), p()),
                DriverOp::Flush,
            ]
        );
    }

    #[test]
    fn erase_run_followed_by_skip_does_not_set_move_end() {
        let mut b = RenderBuffer::new(1, 5);
        b.erase_at(0, 0, 3, p());
        let mut driver = RecordingDriver::new((1, 5));
        b.flush(&mut driver);
        assert_eq!(
            driver.ops,
            vec![DriverOp::Goto(0, 0), DriverOp::Erasech(3, Some(false), p()), DriverOp::Flush]
        );
    }

    #[test]
    fn goto_out_of_bounds_is_a_no_op() {
        let mut b = RenderBuffer::new(3, 3);
        b.goto(1, 1);
        b.goto(10, 10);
        assert_eq!(b.frame.state.cursor, Some((1, 1)));
        b.goto(-1, 0);
        assert_eq!(b.frame.state.cursor, Some((1, 1)));
    }

    #[test]
    fn skip_causes_a_later_goto() {
        let mut b = RenderBuffer::new(1, 5);
        b.skip_at(0, 0, 2);
        b.char_at(0, 2, 'Y', p());
        let mut driver = RecordingDriver::new((1, 5));
        b.flush(&mut driver);
        assert_eq!(driver.ops, vec![DriverOp::Goto(0, 2), DriverOp::Print("Y".into(), p()), DriverOp::Flush]);
    }
}
