//! Smoke-test harness for the core rendering engine: a root window, two
//! side-by-side sub-windows, and a floating popup, driven by a real
//! terminal through [`tuicore_window::Root`]. No style sheet, no
//! container layout, no widgets beyond hand-drawn boxes and text — this
//! exercises the window tree and its input/expose/scroll pipeline end to
//! end, nothing more.

mod config;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, Event as CtEvent, KeyCode as CtKeyCode, KeyEventKind as CtKeyEventKind,
    KeyModifiers as CtKeyModifiers, MouseButton as CtMouseButton, MouseEventKind as CtMouseEventKind,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tuicore_events::{KeyCode, KeyEvent as TuiKeyEvent, KeyInput, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tuicore_geom::Rect;
use tuicore_pen::{Color, PenValue};
use tuicore_terminal::{CrosstermBackend, CrosstermDriver, TerminalDriver, TerminalMode};
use tuicore_window::{Root, Window};

use config::Config;

/// Set from `on_key_root`/`on_key_popup` on quit keys; polled by the event
/// loop. File-scope mutable state for a demonstration callback only —
/// window callbacks are plain function pointers with no captured state,
/// and this is the one piece of state the demo needs across calls.
static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);

#[derive(Parser, Debug)]
#[command(name = "tuicore-demo", version, about = "tuicore rendering engine smoke-test harness")]
struct Args {
    /// Path to a `tuicore.toml`; defaults to `./tuicore.toml` if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force the alternate screen on, overriding config.
    #[arg(long, conflicts_with = "no_altscreen")]
    altscreen: bool,

    /// Force the alternate screen off, overriding config.
    #[arg(long)]
    no_altscreen: bool,

    /// Write logs to this file instead of stderr (or set `TUICORE_LOG_FILE`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_deref())?;
    tracing::info!(target: "runtime", "startup");

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;
    let altscreen = if args.no_altscreen {
        false
    } else if args.altscreen {
        true
    } else {
        config.altscreen
    };

    let mut backend = CrosstermBackend::new();
    backend.set_title("tuicore-demo").context("setting terminal title")?;
    let _guard = altscreen.then(|| backend.enter_guard()).transpose().context("entering alternate screen")?;

    let driver = CrosstermDriver::new();
    let (lines, cols) = driver.get_size();
    let root = Root::new(Box::new(driver), lines, cols);
    root.set_expose_after_scroll(config.expose_after_scroll);
    if config.mouse {
        root.set_mode(TerminalMode::Mouse, true);
    }

    let layout = build_windows(root.window()).context("laying out demo windows")?;
    wire_callbacks(&layout);
    layout.left.focus(0, 0);

    for w in [&layout.left, &layout.right, &layout.popup] {
        w.expose(local_rect(w));
    }
    root.run_scheduled();

    run_event_loop(&root, &layout)?;

    if config.mouse {
        root.set_mode(TerminalMode::Mouse, false);
    }
    tracing::info!(target: "runtime", "shutdown");
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let path = log_file
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("TUICORE_LOG_FILE").map(PathBuf::from));

    match path {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt().with_env_filter(env_filter).with_ansi(false).with_writer(writer).init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

/// The three windows the demo draws into, kept around so the event loop
/// can react to terminal resize by re-laying them out.
struct Layout {
    left: Window,
    right: Window,
    popup: Window,
}

fn build_windows(root: &Window) -> Result<Layout, tuicore_window::WindowError> {
    let (lines, cols) = (root.lines(), root.cols());
    let body_lines = lines.saturating_sub(2).max(1);
    let left_cols = (cols / 2).max(1);
    let right_left = left_cols;
    let right_cols = cols.saturating_sub(right_left).max(1);

    let left = root.make_sub(1, 0, body_lines, left_cols)?;
    let right = root.make_sub(1, right_left, body_lines, right_cols)?;

    let popup_lines = (lines / 3).max(3).min(lines);
    let popup_cols = (cols / 3).max(12).min(cols);
    let popup = root.make_popup(lines / 4, cols / 4, popup_lines, popup_cols)?;

    Ok(Layout { left, right, popup })
}

fn wire_callbacks(layout: &Layout) {
    layout.left.set_on_expose(on_expose_left);
    layout.right.set_on_expose(on_expose_right);
    layout.popup.set_on_expose(on_expose_popup);
    layout.popup.set_on_key(on_key_popup);

    layout.left.set_on_geom_changed(on_geom_changed_reexpose);
    layout.right.set_on_geom_changed(on_geom_changed_reexpose);

    if let Some(root) = layout.left.parent() {
        root.set_on_key(on_key_root);
        root.set_on_geom_changed(on_geom_changed_reexpose);
    }
}

fn local_rect(win: &Window) -> Rect {
    Rect::new(0, 0, win.lines().max(1), win.cols().max(1)).expect("window extent is non-zero")
}

fn paint_pane(win: &Window, label: &str, pen: PenValue) {
    let (lines, cols) = (win.lines(), win.cols());
    if lines == 0 || cols == 0 {
        return;
    }

    win.clear(pen);
    win.goto(0, 0);
    win.print(&format!("┌{}┐", "─".repeat(cols.saturating_sub(2) as usize)), pen);
    for l in 1..lines.saturating_sub(1) {
        win.goto(l as i64, 0);
        win.print("│", pen);
        win.goto(l as i64, (cols.saturating_sub(1)) as i64);
        win.print("│", pen);
    }
    if lines > 1 {
        win.goto((lines - 1) as i64, 0);
        win.print(&format!("└{}┘", "─".repeat(cols.saturating_sub(2) as usize)), pen);
    }

    let label_col = ((cols as i64 - label.chars().count() as i64) / 2).max(1);
    win.goto((lines / 2) as i64, label_col);
    win.print(label, pen);
}

fn on_expose_left(win: &Window, _rect: Rect) {
    paint_pane(win, "left pane — q to quit", PenValue::new().with_fg(Color::Index(4)));
}

fn on_expose_right(win: &Window, _rect: Rect) {
    paint_pane(win, "right pane", PenValue::new().with_fg(Color::Index(2)));
}

fn on_expose_popup(win: &Window, _rect: Rect) {
    paint_pane(win, "popup (Esc closes)", PenValue::new().with_fg(Color::Index(3)).with_reverse(true));
}

fn on_geom_changed_reexpose(win: &Window) {
    win.expose(local_rect(win));
}

fn on_key_popup(win: &Window, input: &KeyInput) -> bool {
    if is_quit_combo(input) {
        win.close();
        true
    } else {
        false
    }
}

fn on_key_root(_win: &Window, input: &KeyInput) -> bool {
    if is_quit_combo(input) {
        QUIT_REQUESTED.store(true, Ordering::Relaxed);
        true
    } else {
        false
    }
}

fn is_quit_combo(input: &KeyInput) -> bool {
    matches!(
        input,
        KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('q'), .. }) | KeyInput::Key(TuiKeyEvent { code: KeyCode::Esc, .. })
    ) || matches!(
        input,
        KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('c'), mods }) if mods.contains(KeyModifiers::CTRL)
    )
}

fn run_event_loop(root: &Root, layout: &Layout) -> Result<()> {
    while !QUIT_REQUESTED.load(Ordering::Relaxed) {
        if event::poll(Duration::from_millis(100)).context("polling terminal events")? {
            match event::read().context("reading terminal event")? {
                CtEvent::Key(k) => {
                    if let Some(input) = decode_key(k) {
                        root.window().dispatch_key(&input);
                    }
                }
                CtEvent::Mouse(m) => {
                    if let Some(ev) = decode_mouse(m) {
                        root.window().dispatch_mouse(&ev);
                    }
                }
                CtEvent::Resize(w, h) => {
                    root.window().change_geometry(0, 0, h as u32, w as u32).ok();
                    relayout(root.window(), layout).context("relaying out demo windows after resize")?;
                }
                _ => {}
            }
        }
        root.run_scheduled();
    }
    Ok(())
}

fn relayout(root: &Window, layout: &Layout) -> Result<()> {
    let (lines, cols) = (root.lines(), root.cols());
    let body_lines = lines.saturating_sub(2).max(1);
    let left_cols = (cols / 2).max(1);
    let right_cols = cols.saturating_sub(left_cols).max(1);
    layout.left.change_geometry(1, 0, body_lines, left_cols).context("relaying out left pane")?;
    layout.right.change_geometry(1, left_cols, body_lines, right_cols).context("relaying out right pane")?;
    Ok(())
}

fn decode_key(ev: crossterm::event::KeyEvent) -> Option<KeyInput> {
    if ev.kind == CtKeyEventKind::Release {
        return None;
    }
    let mods = decode_mods(ev.modifiers);
    let code = match ev.code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Esc,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(KeyInput::Key(TuiKeyEvent { code, mods }))
}

fn decode_mods(m: CtKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CtKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CtKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CtKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

fn decode_mouse(ev: crossterm::event::MouseEvent) -> Option<MouseEvent> {
    let kind = match ev.kind {
        CtMouseEventKind::Down(b) => MouseEventKind::Down(decode_button(b)),
        CtMouseEventKind::Up(b) => MouseEventKind::Up(decode_button(b)),
        CtMouseEventKind::Drag(b) => MouseEventKind::Drag(decode_button(b)),
        CtMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CtMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        CtMouseEventKind::Moved => MouseEventKind::Moved,
        _ => return None,
    };
    Some(MouseEvent {
        kind,
        line: ev.row as u32,
        col: ev.column as u32,
        mods: decode_mods(ev.modifiers),
    })
}

fn decode_button(b: CtMouseButton) -> MouseButton {
    match b {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Right => MouseButton::Right,
        CtMouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuicore_terminal::RecordingDriver;

    #[test]
    fn quit_combo_matches_q_esc_and_ctrl_c() {
        assert!(is_quit_combo(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('q'), mods: KeyModifiers::empty() })));
        assert!(is_quit_combo(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Esc, mods: KeyModifiers::empty() })));
        assert!(is_quit_combo(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('c'), mods: KeyModifiers::CTRL })));
        assert!(!is_quit_combo(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('c'), mods: KeyModifiers::empty() })));
    }

    #[test]
    fn build_windows_splits_body_into_two_columns() {
        let driver = RecordingDriver::new((24, 80));
        let root = Root::new(Box::new(driver), 24, 80);
        let layout = build_windows(root.window()).unwrap();
        assert_eq!(layout.left.top(), 1);
        assert_eq!(layout.left.left(), 0);
        assert_eq!(layout.right.left(), layout.left.cols());
        assert_eq!(layout.left.cols() + layout.right.cols(), 80);
    }

    #[test]
    fn build_windows_popup_is_a_float_with_steal_input() {
        let driver = RecordingDriver::new((24, 80));
        let root = Root::new(Box::new(driver), 24, 80);
        let layout = build_windows(root.window()).unwrap();
        assert!(layout.popup.is_float());
        assert!(layout.popup.steal_input());
    }

    #[test]
    fn popup_steals_quit_key_and_closes_instead_of_quitting() {
        let driver = RecordingDriver::new((24, 80));
        let root = Root::new(Box::new(driver), 24, 80);
        let layout = build_windows(root.window()).unwrap();
        wire_callbacks(&layout);
        QUIT_REQUESTED.store(false, Ordering::Relaxed);
        let handled = root.window().dispatch_key(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('q'), mods: KeyModifiers::empty() }));
        assert!(handled);
        assert!(layout.popup.is_closed());
        assert!(!QUIT_REQUESTED.load(Ordering::Relaxed));
    }

    #[test]
    fn wired_root_key_handler_sets_quit_flag_once_popup_is_closed() {
        let driver = RecordingDriver::new((24, 80));
        let root = Root::new(Box::new(driver), 24, 80);
        let layout = build_windows(root.window()).unwrap();
        wire_callbacks(&layout);
        layout.popup.close();
        QUIT_REQUESTED.store(false, Ordering::Relaxed);
        let handled = root.window().dispatch_key(&KeyInput::Key(TuiKeyEvent { code: KeyCode::Char('q'), mods: KeyModifiers::empty() }));
        assert!(handled);
        assert!(QUIT_REQUESTED.load(Ordering::Relaxed));
        QUIT_REQUESTED.store(false, Ordering::Relaxed);
    }
}
