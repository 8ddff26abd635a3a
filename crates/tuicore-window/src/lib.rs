//! The window tree: clipped drawing regions over a terminal driver,
//! damage-tracked expose scheduling, occlusion under floating children, and
//! key/mouse input routing.
//!
//! Unlike `tuicore-render`'s `RenderBuffer` (an offscreen grid a widget
//! fills then flushes in one shot), a [`Window`] talks to the terminal
//! driver directly, op by op, consulting a [`Window::visibility_span`]
//! query before every emission so an occluding float or an off-parent
//! position never has to be modeled as a grid cell.

mod error;
mod root;
mod visibility;
mod window;

pub use error::WindowError;
pub use root::Root;
pub use window::{ExposeHandler, FocusHandler, GeomChangedHandler, KeyHandler, MouseHandler, Window};
