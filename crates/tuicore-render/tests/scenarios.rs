//! Black-box coverage of the render-buffer scenarios: built entirely on the
//! public `RenderBuffer`/`RecordingDriver` surface, not internal state.

use tuicore_linemask::LineStyle::Single;
use tuicore_pen::PenValue;
use tuicore_render::{Caps, Cell, RenderBuffer};
use tuicore_terminal::{DriverOp, RecordingDriver};

fn pen() -> PenValue {
    PenValue::new()
}

#[test]
fn line_drawing_box_emits_box_drawing_glyphs() {
    let mut buf = RenderBuffer::new(5, 10);
    buf.linebox_at(0, 4, 0, 9, Single, pen());

    let mut driver = RecordingDriver::new((5, 10));
    buf.flush(&mut driver);

    assert_eq!(
        driver.ops,
        vec![
            DriverOp::Goto(0, 0),
            DriverOp::Print("┌────────┐".into(), pen()),
            DriverOp::Goto(1, 0),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(1, 9),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(2, 0),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(2, 9),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(3, 0),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(3, 9),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(4, 0),
            DriverOp::Print("└────────┘".into(), pen()),
            DriverOp::Flush,
        ]
    );
}

#[test]
fn line_merging_produces_a_cross() {
    let mut buf = RenderBuffer::new(5, 5);
    buf.hline_at(2, 0, 4, Single, pen(), Caps::NONE);
    buf.vline_at(0, 4, 2, Single, pen(), Caps::NONE);

    let mut driver = RecordingDriver::new((5, 5));
    buf.flush(&mut driver);

    assert_eq!(
        driver.ops,
        vec![
            DriverOp::Goto(0, 2),
            DriverOp::Print("╷".into(), pen()),
            DriverOp::Goto(1, 2),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(2, 0),
            DriverOp::Print("╶─┼─╴".into(), pen()),
            DriverOp::Goto(3, 2),
            DriverOp::Print("│".into(), pen()),
            DriverOp::Goto(4, 2),
            DriverOp::Print("╵".into(), pen()),
            DriverOp::Flush,
        ]
    );
}

#[test]
fn wide_char_overwrite_only_emits_the_surviving_write() {
    let mut buf = RenderBuffer::new(1, 10);
    buf.text_at(0, 2, "日", pen());
    buf.text_at(0, 3, "X", pen());

    let mut driver = RecordingDriver::new((1, 10));
    buf.flush(&mut driver);

    assert_eq!(
        driver.ops,
        vec![DriverOp::Goto(0, 3), DriverOp::Print("X".into(), pen()), DriverOp::Flush]
    );
}

#[test]
fn text_at_inside_clip_and_unmasked_is_visible() {
    let mut buf = RenderBuffer::new(3, 3);
    buf.text_at(1, 1, "X", pen());
    assert!(matches!(buf.get_cell(1, 1), Cell::Text { .. }));
}

#[test]
fn save_then_restore_leaves_cursor_and_pen_unchanged() {
    let mut buf = RenderBuffer::new(4, 4);
    buf.goto(1, 1);
    buf.save();
    buf.goto(3, 3);
    buf.setpen(PenValue::new().with_bold(true));
    buf.restore();

    buf.text("Z", pen());
    assert!(matches!(buf.get_cell(1, 1), Cell::Text { .. }));
    assert_eq!(*buf.get_cell(3, 3), Cell::Skip);
}
