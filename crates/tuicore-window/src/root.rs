//! The root window's extra baggage: the owned terminal driver, the
//! deferred-task queue, and the single notion of "the focused window".
//!
//! Every [`Window`] in a tree holds a clone of the same `Rc<RefCell<RootShared>>`
//! so drawing/expose/focus operations never need to walk up to the root to
//! find the driver — grounded in the render scheduler's "producers report,
//! a single consumer decides" shape (`core-render::scheduler::RenderScheduler`
//! in the sibling crate family), generalized here from a redraw-intent queue
//! to an arbitrary deferred-task queue.

use std::cell::RefCell;
use std::rc::Rc;

use tuicore_terminal::{TerminalDriver, TerminalMode};

use crate::window::{Window, WindowInner};

pub(crate) struct RootShared {
    driver: Box<dyn TerminalDriver>,
    tasks: Vec<Box<dyn FnOnce()>>,
    expose_scheduled: bool,
    expose_after_scroll: bool,
    current_focus: Option<Window>,
}

impl RootShared {
    pub(crate) fn later(&mut self, task: impl FnOnce() + 'static) {
        self.tasks.push(Box::new(task));
    }

    pub(crate) fn driver_mut(&mut self) -> &mut dyn TerminalDriver {
        self.driver.as_mut()
    }

    pub(crate) fn expose_scheduled(&self) -> bool {
        self.expose_scheduled
    }

    pub(crate) fn set_expose_scheduled(&mut self, v: bool) {
        self.expose_scheduled = v;
    }

    pub(crate) fn expose_after_scroll(&self) -> bool {
        self.expose_after_scroll
    }

    pub(crate) fn current_focus(&self) -> Option<Window> {
        self.current_focus.clone()
    }

    pub(crate) fn set_current_focus(&mut self, w: Option<Window>) {
        self.current_focus = w;
    }
}

/// The tree's root: a [`Window`] plus the driver binding and scheduler every
/// descendant reaches through a shared handle.
pub struct Root {
    window: Window,
}

impl Root {
    /// Bind a fresh root window of `lines x cols` to `driver`.
    pub fn new(driver: Box<dyn TerminalDriver>, lines: u32, cols: u32) -> Self {
        let shared = Rc::new(RefCell::new(RootShared {
            driver,
            tasks: Vec::new(),
            expose_scheduled: false,
            expose_after_scroll: false,
            current_focus: None,
        }));
        let window = Window(Rc::new(RefCell::new(WindowInner::new_root(lines, cols, shared))));
        Root { window }
    }

    /// Enable (or disable) posting an expose for the bands a successful
    /// scroll moved into view, instead of leaving them to whatever the
    /// caller repaints explicitly.
    pub fn set_expose_after_scroll(&self, enabled: bool) {
        self.window.root_shared().borrow_mut().expose_after_scroll = enabled;
    }

    /// Passthrough to the bound driver's `set_mode`, for toggles (mouse
    /// capture, cursor blink, application keypad) that have no dedicated
    /// window-tree API of their own.
    pub fn set_mode(&self, mode: TerminalMode, enabled: bool) {
        self.window.root_shared().borrow_mut().driver_mut().set_mode(mode, enabled);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Wrap an existing root-level [`Window`] handle back into a `Root`, so
    /// code holding only a `Window` (e.g. a task queued via `later`) can
    /// still reach `restore`.
    pub(crate) fn from_window(window: Window) -> Self {
        Root { window }
    }

    /// Queue `task` to run on the next [`Root::run_scheduled`] call. Exposed
    /// mainly so a host event loop can coalesce its own deferred work onto
    /// the same round boundary the window tree uses for repaint.
    pub fn later(&self, task: impl FnOnce() + 'static) {
        self.window.root_shared().borrow_mut().later(task);
    }

    /// Drain and run every task queued via `later` (including the coalesced
    /// expose-and-flush task `Window::expose` schedules). A host event loop
    /// calls this once per round, before polling for the next input event.
    pub fn run_scheduled(&self) {
        let tasks: Vec<Box<dyn FnOnce()>> = {
            let mut shared = self.window.root_shared().borrow_mut();
            std::mem::take(&mut shared.tasks)
        };
        for task in tasks {
            task();
        }
    }

    /// Place the terminal cursor at the focus position of the deepest
    /// focused descendant, set cursor visibility accordingly, and flush.
    pub fn restore(&self) {
        let focus = self.window.root_shared().borrow().current_focus();
        let placed = focus.and_then(|w| w.focus_pos().map(|(l, c)| (w, l, c)));

        let mut shared = self.window.root_shared().borrow_mut();
        match placed {
            Some((w, l, c)) if w.is_effectively_visible() => {
                drop(shared);
                let (abs_l, abs_c) = w.to_absolute(l as i64, c as i64);
                let mut shared = self.window.root_shared().borrow_mut();
                shared.driver_mut().goto(abs_l, abs_c);
                shared.driver_mut().set_mode(TerminalMode::CursorVis, true);
            }
            _ => {
                shared.driver_mut().set_mode(TerminalMode::CursorVis, false);
            }
        }
        self.window.root_shared().borrow_mut().driver_mut().flush();
    }
}

impl std::ops::Deref for Root {
    type Target = Window;

    fn deref(&self) -> &Window {
        &self.window
    }
}
