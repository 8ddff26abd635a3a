//! The window tree: clipped drawing regions, damage-tracked expose
//! scheduling, float occlusion, and input routing.
//!
//! A [`Window`] is a cheap handle (`Rc<RefCell<WindowInner>>`) to a node.
//! Parent holds strong references to children; a child's `parent` field is a
//! `Weak` back-reference, so the tree has no ownership cycles and drops
//! cleanly from the root down. Callbacks are plain function pointers — no
//! boxed closures, no captured state beyond what the window itself carries
//! — matching how the rest of this crate family keeps dispatch static where
//! it can.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tuicore_events::{KeyInput, MouseEvent};
use tuicore_geom::{Rect, RectSet};
use tuicore_pen::{MutablePen, PenValue};
use tuicore_text::{CountLimit, Position, string_count};

use crate::root::RootShared;
use crate::visibility::visibility_span;

pub type KeyHandler = fn(&Window, &KeyInput) -> bool;
pub type MouseHandler = fn(&Window, &MouseEvent) -> bool;
pub type ExposeHandler = fn(&Window, Rect);
pub type GeomChangedHandler = fn(&Window);
pub type FocusHandler = fn(&Window, bool);

pub(crate) struct WindowInner {
    parent: Option<Weak<RefCell<WindowInner>>>,
    children: Vec<Window>,
    top: u32,
    left: u32,
    lines: u32,
    cols: u32,
    visible: bool,
    is_float: bool,
    steal_input: bool,
    pen: MutablePen,
    cursor: Option<(i64, i64)>,
    damage: RectSet,
    focused_child: Option<Window>,
    focus_pos: Option<(u32, u32)>,
    on_key: Option<KeyHandler>,
    on_mouse: Option<MouseHandler>,
    on_expose: Option<ExposeHandler>,
    on_geom_changed: Option<GeomChangedHandler>,
    on_focus: Option<FocusHandler>,
    root_shared: Rc<RefCell<RootShared>>,
    closed: bool,
}

impl WindowInner {
    pub(crate) fn new_root(lines: u32, cols: u32, root_shared: Rc<RefCell<RootShared>>) -> Self {
        WindowInner {
            parent: None,
            children: Vec::new(),
            top: 0,
            left: 0,
            lines,
            cols,
            visible: true,
            is_float: false,
            steal_input: false,
            pen: MutablePen::new(PenValue::new()),
            cursor: None,
            damage: RectSet::new(),
            focused_child: None,
            focus_pos: None,
            on_key: None,
            on_mouse: None,
            on_expose: None,
            on_geom_changed: None,
            on_focus: None,
            root_shared,
            closed: false,
        }
    }
}

/// A node in the window tree. Cloning shares the same underlying node
/// (`Rc::clone`), not a copy of it.
#[derive(Clone)]
pub struct Window(pub(crate) Rc<RefCell<WindowInner>>);

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Window {
    fn validate_geometry(lines: u32, cols: u32) -> Result<(), crate::WindowError> {
        if lines == 0 || cols == 0 {
            return Err(crate::WindowError::ProgrammerError(format!(
                "window extent must be non-zero (lines={lines}, cols={cols})"
            )));
        }
        Ok(())
    }

    fn new_child(&self, top: u32, left: u32, lines: u32, cols: u32, visible: bool) -> Result<Window, crate::WindowError> {
        Self::validate_geometry(lines, cols)?;
        let inner = self.0.borrow();
        let child = WindowInner {
            parent: Some(Rc::downgrade(&self.0)),
            children: Vec::new(),
            top,
            left,
            lines,
            cols,
            visible,
            is_float: false,
            steal_input: false,
            pen: MutablePen::new(PenValue::new()),
            cursor: None,
            damage: RectSet::new(),
            focused_child: None,
            focus_pos: None,
            on_key: None,
            on_mouse: None,
            on_expose: None,
            on_geom_changed: None,
            on_focus: None,
            root_shared: inner.root_shared.clone(),
            closed: false,
        };
        drop(inner);
        Ok(Window(Rc::new(RefCell::new(child))))
    }

    /// Append a visible child at `(top, left, lines, cols)` relative to
    /// `self`.
    pub fn make_sub(&self, top: u32, left: u32, lines: u32, cols: u32) -> Result<Window, crate::WindowError> {
        let child = self.new_child(top, left, lines, cols, true)?;
        self.0.borrow_mut().children.push(child.clone());
        Ok(child)
    }

    /// Like `make_sub`, but the child starts out invisible.
    pub fn make_hidden_sub(&self, top: u32, left: u32, lines: u32, cols: u32) -> Result<Window, crate::WindowError> {
        let child = self.new_child(top, left, lines, cols, false)?;
        self.0.borrow_mut().children.push(child.clone());
        Ok(child)
    }

    /// Prepend a floating child: drawn in front of, and occluding, the
    /// non-floating siblings that follow it.
    pub fn make_float(&self, top: u32, left: u32, lines: u32, cols: u32) -> Result<Window, crate::WindowError> {
        let child = self.new_child(top, left, lines, cols, true)?;
        child.0.borrow_mut().is_float = true;
        self.0.borrow_mut().children.insert(0, child.clone());
        Ok(child)
    }

    /// Walk up to the root and prepend a float there, at the absolute
    /// position `(top, left)` computed relative to `self`, with the
    /// steal-input flag set.
    pub fn make_popup(&self, top: u32, left: u32, lines: u32, cols: u32) -> Result<Window, crate::WindowError> {
        Self::validate_geometry(lines, cols)?;
        let (abs_top, abs_left) = self.to_absolute(top as i64, left as i64);
        let root = self.root_window();
        let child = root.new_child(abs_top, abs_left, lines, cols, true)?;
        {
            let mut inner = child.0.borrow_mut();
            inner.is_float = true;
            inner.steal_input = true;
        }
        root.0.borrow_mut().children.insert(0, child.clone());
        Ok(child)
    }

    fn root_window(&self) -> Window {
        let mut cur = self.clone();
        while let Some(p) = cur.parent() {
            cur = p;
        }
        cur
    }

    /// Detach from the parent and recursively close all descendants.
    pub fn close(&self) {
        let children: Vec<Window> = self.0.borrow().children.clone();
        for c in &children {
            c.close();
        }
        let parent = self.parent();
        {
            let mut inner = self.0.borrow_mut();
            inner.closed = true;
            inner.children.clear();
            inner.on_key = None;
            inner.on_mouse = None;
            inner.on_expose = None;
            inner.on_geom_changed = None;
            inner.on_focus = None;
        }
        if let Some(p) = parent {
            p.0.borrow_mut().children.retain(|c| c != self);
            let mut pi = p.0.borrow_mut();
            if pi.focused_child.as_ref() == Some(self) {
                pi.focused_child = None;
            }
        }
        let mut rs = self.root_shared();
        let mut rs = rs.borrow_mut();
        if rs.current_focus().as_ref() == Some(self) {
            rs.set_current_focus(None);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }

    // -- geometry -----------------------------------------------------

    pub fn top(&self) -> u32 {
        self.0.borrow().top
    }

    pub fn left(&self) -> u32 {
        self.0.borrow().left
    }

    pub fn lines(&self) -> u32 {
        self.0.borrow().lines
    }

    pub fn cols(&self) -> u32 {
        self.0.borrow().cols
    }

    pub fn frame(&self) -> Rect {
        let i = self.0.borrow();
        Rect::new(i.top, i.left, i.lines, i.cols).expect("window extent is non-zero")
    }

    pub fn is_visible(&self) -> bool {
        self.0.borrow().visible
    }

    pub fn is_float(&self) -> bool {
        self.0.borrow().is_float
    }

    pub fn steal_input(&self) -> bool {
        self.0.borrow().steal_input
    }

    pub fn parent(&self) -> Option<Window> {
        self.0.borrow().parent.as_ref().and_then(Weak::upgrade).map(Window)
    }

    pub fn children(&self) -> Vec<Window> {
        self.0.borrow().children.clone()
    }

    /// True iff every ancestor (including `self`) is visible — visibility
    /// at one level says nothing about whether the containing branch of
    /// the tree is actually reachable on screen.
    pub fn is_effectively_visible(&self) -> bool {
        let mut cur = self.clone();
        loop {
            if !cur.is_visible() {
                return false;
            }
            match cur.parent() {
                Some(p) => cur = p,
                None => return true,
            }
        }
    }

    /// Update position and/or size; fires `on_geom_changed` if anything
    /// actually changed. Rejects non-positive extent or negative position
    /// (both arrive as `u32` here, so "negative" means the caller already
    /// failed to construct one — this only rejects zero extent).
    pub fn change_geometry(&self, top: u32, left: u32, lines: u32, cols: u32) -> Result<(), crate::WindowError> {
        Self::validate_geometry(lines, cols)?;
        let changed = {
            let mut inner = self.0.borrow_mut();
            let changed = inner.top != top || inner.left != left || inner.lines != lines || inner.cols != cols;
            inner.top = top;
            inner.left = left;
            inner.lines = lines;
            inner.cols = cols;
            changed
        };
        if changed {
            if let Some(h) = self.0.borrow().on_geom_changed {
                h(self);
            }
        }
        Ok(())
    }

    pub fn reposition(&self, top: u32, left: u32) -> Result<(), crate::WindowError> {
        let (lines, cols) = (self.lines(), self.cols());
        self.change_geometry(top, left, lines, cols)
    }

    pub fn resize(&self, lines: u32, cols: u32) -> Result<(), crate::WindowError> {
        let (top, left) = (self.top(), self.left());
        self.change_geometry(top, left, lines, cols)
    }

    pub fn set_visible(&self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }

    // -- callbacks ------------------------------------------------------

    pub fn set_on_key(&self, f: KeyHandler) {
        self.0.borrow_mut().on_key = Some(f);
    }

    pub fn set_on_mouse(&self, f: MouseHandler) {
        self.0.borrow_mut().on_mouse = Some(f);
    }

    pub fn set_on_expose(&self, f: ExposeHandler) {
        self.0.borrow_mut().on_expose = Some(f);
    }

    pub fn set_on_geom_changed(&self, f: GeomChangedHandler) {
        self.0.borrow_mut().on_geom_changed = Some(f);
    }

    pub fn set_on_focus(&self, f: FocusHandler) {
        self.0.borrow_mut().on_focus = Some(f);
    }

    // -- pen --------------------------------------------------------------

    pub fn pen(&self) -> MutablePen {
        self.0.borrow().pen.clone()
    }

    pub(crate) fn pen_snapshot(&self) -> PenValue {
        self.0.borrow().pen.snapshot()
    }

    /// Merge this window's pen with every ancestor's, nearer windows
    /// winning where they define an attribute.
    pub fn effective_pen(&self) -> PenValue {
        let mut chain = Vec::new();
        let mut cur = Some(self.clone());
        while let Some(w) = cur {
            chain.push(w.pen_snapshot());
            cur = w.parent();
        }
        chain.into_iter().rev().fold(PenValue::new(), |base, p| PenValue::merge(&base, &p))
    }

    // -- root / driver access --------------------------------------------

    pub(crate) fn root_shared(&self) -> Rc<RefCell<RootShared>> {
        self.0.borrow().root_shared.clone()
    }

    /// Absolute terminal coordinates for a point given in `self`'s local
    /// coordinates.
    pub fn to_absolute(&self, line: i64, col: i64) -> (u32, u32) {
        let mut l = line;
        let mut c = col;
        let mut cur = self.clone();
        while let Some(parent) = cur.parent() {
            l += cur.top() as i64;
            c += cur.left() as i64;
            cur = parent;
        }
        (l.max(0) as u32, c.max(0) as u32)
    }

    // -- visibility (see visibility.rs) -----------------------------------

    /// Longest run starting at `(line, col)` (local coordinates) during
    /// which visibility doesn't change, and whether that run is visible.
    pub fn visibility_span(&self, line: i64, col: i64) -> (bool, Option<u32>) {
        visibility_span(self, line, col)
    }

    // -- drawing ------------------------------------------------------------

    pub fn goto(&self, line: i64, col: i64) {
        self.0.borrow_mut().cursor = Some((line, col));
    }

    fn cursor(&self) -> (i64, i64) {
        self.0.borrow().cursor.unwrap_or((0, 0))
    }

    pub fn print(&self, text: &str, pen: PenValue) -> u32 {
        let (line, col) = self.cursor();
        let n = self.print_at(line, col, text, pen);
        self.0.borrow_mut().cursor = Some((line, col + n as i64));
        n
    }

    /// Walk `text` column by column, asking for a visibility span at each
    /// step and emitting one `goto`+`print` per visible run. Illegal
    /// codepoints truncate the walk at the offending byte.
    pub fn print_at(&self, line: i64, col: i64, text: &str, pen: PenValue) -> u32 {
        if self.is_closed() {
            return 0;
        }
        let eff_pen = PenValue::merge(&self.effective_pen(), &pen);
        let mut pos = Position::default();
        let mut cur_col = col;
        loop {
            if pos.bytes >= text.len() {
                break;
            }
            let (visible, length) = self.visibility_span(line, cur_col);
            let length = match length {
                Some(l) if l > 0 => l,
                _ => break,
            };
            let start_bytes = pos.bytes;
            match string_count(text, &mut pos, CountLimit::Cols(pos.cols + length as usize)) {
                Ok(consumed) if consumed > 0 => {
                    let chunk = &text[start_bytes..pos.bytes];
                    if visible {
                        let (abs_line, abs_col) = self.to_absolute(line, cur_col);
                        let shared = self.root_shared();
                        let mut shared = shared.borrow_mut();
                        shared.driver_mut().goto(abs_line, abs_col);
                        shared.driver_mut().print(chunk, &eff_pen);
                    }
                }
                _ => break,
            }
            cur_col += length as i64;
        }
        pos.cols as u32
    }

    pub fn erasech(&self, n: u32, pen: PenValue) {
        let (line, col) = self.cursor();
        self.erasech_at(line, col, n, pen);
        self.0.borrow_mut().cursor = Some((line, col + n as i64));
    }

    pub fn erasech_at(&self, line: i64, col: i64, n: u32, pen: PenValue) {
        if n == 0 || self.is_closed() {
            return;
        }
        let eff_pen = PenValue::merge(&self.effective_pen(), &pen);
        let mut remaining = n as i64;
        let mut cur_col = col;
        while remaining > 0 {
            let (visible, length) = self.visibility_span(line, cur_col);
            let length = match length {
                Some(l) if l > 0 => l as i64,
                _ => break,
            };
            let take = length.min(remaining);
            if visible {
                let (abs_line, abs_col) = self.to_absolute(line, cur_col);
                let shared = self.root_shared();
                let mut shared = shared.borrow_mut();
                shared.driver_mut().goto(abs_line, abs_col);
                shared.driver_mut().erasech(take as u32, None, &eff_pen);
            }
            cur_col += take;
            remaining -= take;
        }
    }

    pub fn clearline(&self, line: i64, pen: PenValue) {
        self.erasech_at(line, 0, self.cols(), pen);
    }

    pub fn clearrect(&self, rect: Rect, pen: PenValue) {
        for line in rect.top..rect.bottom() {
            self.erasech_at(line as i64, rect.left as i64, rect.cols, pen);
        }
    }

    pub fn clear(&self, pen: PenValue) {
        for line in 0..self.lines() {
            self.clearline(line as i64, pen);
        }
    }

    /// Scroll `rect` (local coordinates) by `(dy, dx)`. Declines (and
    /// posts a whole-rect expose instead) when a visible floating child
    /// overlaps the region, or when the driver itself can't perform the
    /// scroll. `pen` blanks the bands newly scrolled into view immediately,
    /// ahead of whatever repaint the follow-up expose drives.
    pub fn scrollrect(&self, rect: Rect, dy: i32, dx: i32, pen: PenValue) -> bool {
        if self.is_closed() {
            return false;
        }
        let bounds = Rect::new(0, 0, self.lines(), self.cols()).expect("window extent is non-zero");
        if !bounds.contains(&rect) {
            tracing::warn!(target: "window", "scrollrect rect is not entirely inside the window");
            return false;
        }
        let obscured = self
            .children()
            .iter()
            .any(|c| c.is_float() && c.is_visible() && c.frame().intersects(&rect));
        if obscured {
            self.expose(rect);
            return false;
        }

        let (abs_top, abs_left) = self.to_absolute(rect.top as i64, rect.left as i64);
        let ok = {
            let shared = self.root_shared();
            let mut shared = shared.borrow_mut();
            shared.driver_mut().scrollrect(abs_top, abs_left, rect.lines, rect.cols, dy, dx)
        };

        if !ok {
            self.expose(rect);
            return false;
        }

        if self.root_shared().borrow().expose_after_scroll() {
            self.translate_damage_for_scroll(rect, dy as i64, dx as i64);
            for band in exposed_bands(rect, dy, dx) {
                self.clearrect(band, pen);
                self.expose(band);
            }
        }
        true
    }

    fn translate_damage_for_scroll(&self, rect: Rect, dy: i64, dx: i64) {
        let mut inner = self.0.borrow_mut();
        let old: Vec<Rect> = inner.damage.rects().copied().collect();
        inner.damage.clear();
        drop(inner);
        let mut inner = self.0.borrow_mut();
        for r in old {
            if let Some(inside) = r.intersect(&rect) {
                let moved = inside.translate(dy, dx);
                if let Some(clipped) = moved.intersect(&rect) {
                    inner.damage.add(clipped);
                }
            }
            for outside in r.subtract(&rect) {
                inner.damage.add(outside);
            }
        }
    }

    // -- expose / damage --------------------------------------------------

    /// Add `rect` to this window's damage set and ensure a single coalesced
    /// flush task is queued for the round. A no-op if an ancestor's damage
    /// set already fully covers `rect` (its repaint absorbs this one).
    pub fn expose(&self, rect: Rect) {
        if self.is_closed() {
            return;
        }
        if self.covered_by_ancestor_damage(rect) {
            return;
        }
        self.0.borrow_mut().damage.add(rect);

        let root_shared = self.root_shared();
        let already_scheduled = root_shared.borrow().expose_scheduled();
        if already_scheduled {
            return;
        }
        root_shared.borrow_mut().set_expose_scheduled(true);
        let root_window = self.root_window();
        root_shared.borrow_mut().later(move || {
            root_window.root_shared().borrow_mut().set_expose_scheduled(false);
            run_expose_pass(&root_window);
            let root = crate::root::Root::from_window(root_window.clone());
            root.restore();
        });
    }

    fn covered_by_ancestor_damage(&self, rect: Rect) -> bool {
        let mut cur_rect = rect;
        let mut cur = self.clone();
        while let Some(parent) = cur.parent() {
            cur_rect = cur_rect.translate(cur.top() as i64, cur.left() as i64);
            if parent.0.borrow().damage.contains(&cur_rect) {
                return true;
            }
            cur = parent;
        }
        false
    }

    // -- focus --------------------------------------------------------------

    pub fn focus_pos(&self) -> Option<(u32, u32)> {
        self.0.borrow().focus_pos
    }

    pub fn focused_child(&self) -> Option<Window> {
        self.0.borrow().focused_child.clone()
    }

    /// Set the focus cursor position within this window and mark it as the
    /// focused child of its parent, transitively up to root. Fires
    /// `on_focus(true)` on `self` and `on_focus(false)` on whichever window
    /// previously held the single tree-wide focus, if that differs.
    pub fn focus(&self, line: u32, col: u32) {
        if self.is_closed() {
            return;
        }
        self.0.borrow_mut().focus_pos = Some((line, col));

        let mut child = self.clone();
        while let Some(parent) = child.parent() {
            parent.0.borrow_mut().focused_child = Some(child.clone());
            child = parent;
        }

        let shared = self.root_shared();
        let prev = shared.borrow().current_focus();
        if prev.as_ref() != Some(self) {
            shared.borrow_mut().set_current_focus(Some(self.clone()));
            if let Some(p) = &prev {
                if let Some(h) = p.0.borrow().on_focus {
                    h(p, false);
                }
            }
            if let Some(h) = self.0.borrow().on_focus {
                h(self, true);
            }
        }
    }

    // -- input routing --------------------------------------------------

    /// Popup steal-input -> focused child -> own `on_key` -> broadcast to
    /// every other child in order.
    pub fn dispatch_key(&self, input: &KeyInput) -> bool {
        if self.is_closed() {
            return false;
        }
        let stealing_popup = self.children().into_iter().next().filter(|c| c.is_float() && c.steal_input() && c.is_visible());
        if let Some(popup) = &stealing_popup {
            if popup.dispatch_key(input) {
                return true;
            }
        }

        let focused = self.focused_child();
        if let Some(f) = &focused {
            if f.dispatch_key(input) {
                return true;
            }
        }

        if let Some(h) = self.0.borrow().on_key {
            if h(self, input) {
                return true;
            }
        }

        for child in self.children() {
            if stealing_popup.as_ref() == Some(&child) || focused.as_ref() == Some(&child) {
                continue;
            }
            if child.dispatch_key(input) {
                return true;
            }
        }
        false
    }

    /// Frame-containment descent, floats first by child-list order; a
    /// popup with steal-input always gets first crack regardless of
    /// whether the event falls inside its frame.
    pub fn dispatch_mouse(&self, ev: &MouseEvent) -> bool {
        if self.is_closed() {
            return false;
        }
        let stealing_popup = self.children().into_iter().next().filter(|c| c.is_float() && c.steal_input() && c.is_visible());
        if let Some(popup) = &stealing_popup {
            let local = translate_mouse(ev, popup.top(), popup.left());
            if popup.dispatch_mouse(&local) {
                return true;
            }
        }

        for child in self.children() {
            if !child.is_visible() || stealing_popup.as_ref() == Some(&child) {
                continue;
            }
            let f = child.frame();
            if ev.line >= f.top && ev.line < f.bottom() && ev.col >= f.left && ev.col < f.right() {
                let local = translate_mouse(ev, f.top, f.left);
                if child.dispatch_mouse(&local) {
                    return true;
                }
            }
        }

        if let Some(h) = self.0.borrow().on_mouse {
            return h(self, ev);
        }
        false
    }
}

fn translate_mouse(ev: &MouseEvent, top: u32, left: u32) -> MouseEvent {
    MouseEvent {
        kind: ev.kind,
        line: ev.line.saturating_sub(top),
        col: ev.col.saturating_sub(left),
        mods: ev.mods,
    }
}

fn exposed_bands(rect: Rect, dy: i32, dx: i32) -> Vec<Rect> {
    let mut bands = Vec::new();
    if dy > 0 {
        let n = (dy as u32).min(rect.lines);
        bands.push(Rect::new(rect.bottom() - n, rect.left, n, rect.cols).expect("band extent is non-zero"));
    } else if dy < 0 {
        let n = ((-dy) as u32).min(rect.lines);
        bands.push(Rect::new(rect.top, rect.left, n, rect.cols).expect("band extent is non-zero"));
    }
    if dx > 0 {
        let n = (dx as u32).min(rect.cols);
        bands.push(Rect::new(rect.top, rect.right() - n, rect.lines, n).expect("band extent is non-zero"));
    } else if dx < 0 {
        let n = ((-dx) as u32).min(rect.cols);
        bands.push(Rect::new(rect.top, rect.left, rect.lines, n).expect("band extent is non-zero"));
    }
    bands
}

/// Parent-before-children, siblings in `(top, left)` order (already the
/// children vec's invariant... except float-before-non-float storage order
/// doesn't guarantee `(top, left)` order, so sort explicitly here).
fn run_expose_pass(window: &Window) {
    run_expose_pass_inner(window, &[]);
}

fn run_expose_pass_inner(window: &Window, inherited: &[Rect]) {
    if !window.is_visible() || window.is_closed() {
        return;
    }
    let own: Vec<Rect> = {
        let mut inner = window.0.borrow_mut();
        let own = inner.damage.rects().copied().collect();
        inner.damage.clear();
        own
    };
    let mut all = inherited.to_vec();
    all.extend(own);
    for rect in &all {
        if let Some(h) = window.0.borrow().on_expose {
            h(window, *rect);
        }
    }
    if all.is_empty() {
        return;
    }

    let mut children = window.children();
    children.sort_by_key(|c| (c.top(), c.left()));
    for child in children {
        let frame = child.frame();
        let child_incoming: Vec<Rect> = all
            .iter()
            .filter_map(|r| r.intersect(&frame))
            .map(|ix| ix.translate(-(frame.top as i64), -(frame.left as i64)))
            .collect();
        if !child_incoming.is_empty() {
            run_expose_pass_inner(&child, &child_incoming);
        }
    }
}

pub(crate) fn index_of(parent: &Window, child: &Window) -> Option<usize> {
    parent.0.borrow().children.iter().position(|c| c == child)
}
