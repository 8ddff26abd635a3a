//! Black-box coverage of the window-tree scenarios, built entirely on the
//! public `Window`/`Root`/`RecordingDriver` surface — driver op sequences
//! stay private to `Root`, so these exercise observable tree behavior
//! instead: expose-callback counts, `visibility_span`, and `scrollrect`'s
//! return value.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tuicore_geom::Rect;
use tuicore_pen::PenValue;
use tuicore_terminal::RecordingDriver;
use tuicore_window::{Root, Window};

fn pen() -> PenValue {
    PenValue::new()
}

#[test]
fn overlapping_exposes_in_one_round_coalesce_to_a_single_callback() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static LAST_RECT: Mutex<Option<Rect>> = Mutex::new(None);
    fn record(_win: &Window, rect: Rect) {
        CALLS.fetch_add(1, Ordering::SeqCst);
        *LAST_RECT.lock().unwrap() = Some(rect);
    }

    let root = Root::new(Box::new(RecordingDriver::new((10, 20))), 10, 20);
    let child = root.window().make_sub(0, 0, 10, 20).unwrap();
    child.set_on_expose(record);

    child.expose(Rect::new(0, 0, 3, 20).unwrap());
    child.expose(Rect::new(2, 0, 3, 20).unwrap());
    root.run_scheduled();

    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(*LAST_RECT.lock().unwrap(), Some(Rect::new(0, 0, 5, 20).unwrap()));
}

#[test]
fn a_visible_float_occludes_the_columns_it_covers_for_a_later_sibling() {
    let root = Root::new(Box::new(RecordingDriver::new((5, 20))), 5, 20);
    let float = root.window().make_float(2, 5, 1, 5).unwrap();
    let bg = root.window().make_sub(0, 0, 5, 20).unwrap();

    let (visible_before, run_before) = bg.visibility_span(2, 3);
    assert!(visible_before);
    assert_eq!(run_before, Some(2)); // runs up to the float's left edge at col 5

    let (visible_under, run_under) = bg.visibility_span(2, 5);
    assert!(!visible_under);
    assert_eq!(run_under, Some(5)); // occluded for the float's full width

    let (visible_off_row, _) = bg.visibility_span(0, 5);
    assert!(visible_off_row); // the float only covers row 2

    drop(float);
}

#[test]
fn hiding_the_float_restores_visibility_underneath_it() {
    let root = Root::new(Box::new(RecordingDriver::new((5, 20))), 5, 20);
    let float = root.window().make_float(2, 5, 1, 5).unwrap();
    let bg = root.window().make_sub(0, 0, 5, 20).unwrap();

    assert!(!bg.visibility_span(2, 5).0);
    float.set_visible(false);
    assert!(bg.visibility_span(2, 5).0);
}

#[test]
fn scroll_with_expose_after_scroll_exposes_the_newly_revealed_band() {
    static CALLS: Mutex<Vec<Rect>> = Mutex::new(Vec::new());
    fn record(_win: &Window, rect: Rect) {
        CALLS.lock().unwrap().push(rect);
    }

    let root = Root::new(Box::new(RecordingDriver::new((10, 10))), 10, 10);
    root.set_expose_after_scroll(true);
    let win = root.window().make_sub(0, 0, 10, 10).unwrap();
    win.set_on_expose(record);

    let rect = Rect::new(0, 0, 10, 10).unwrap();
    let ok = win.scrollrect(rect, 2, 0, pen());
    assert!(ok);
    root.run_scheduled();

    let calls = CALLS.lock().unwrap();
    assert_eq!(&*calls, &[Rect::new(8, 0, 2, 10).unwrap()]);
}

#[test]
fn scroll_declines_and_exposes_whole_rect_when_a_float_overlaps_it() {
    static CALLS: Mutex<Vec<Rect>> = Mutex::new(Vec::new());
    fn record(_win: &Window, rect: Rect) {
        CALLS.lock().unwrap().push(rect);
    }

    let root = Root::new(Box::new(RecordingDriver::new((10, 10))), 10, 10);
    root.set_expose_after_scroll(true);
    let win = root.window().make_sub(0, 0, 10, 10).unwrap();
    win.set_on_expose(record);
    win.make_float(0, 0, 3, 3).unwrap();

    let rect = Rect::new(0, 0, 10, 10).unwrap();
    let ok = win.scrollrect(rect, 2, 0, pen());
    assert!(!ok);
    root.run_scheduled();

    let calls = CALLS.lock().unwrap();
    assert_eq!(&*calls, &[rect]);
}
