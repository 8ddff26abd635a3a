//! `Pen`: a partial map from rendering-attribute kind to value.
//!
//! [`PenValue`] is the immutable, value-semantics, freely-shared form.
//! [`MutablePen`] wraps one behind a shared, observed cell: any attribute
//! change synchronously notifies weakly-held subscribers, the way the
//! window tree and render buffer need to react when a pen they're holding a
//! shared reference to is mutated out from under them.
//!
//! Absent means "inherit from whatever pen sits beneath this one" for every
//! attribute. For the five boolean attributes the data model collapses
//! "explicitly false" and "absent" into one state, by design: a boolean
//! overlay can only ever assert `true`, never force a `false` over an
//! inherited `true`. `fg`, `bg`, and `altfont` carry real values, so they
//! keep a genuine `Option`.

mod mutable;
mod value;

pub use mutable::MutablePen;
pub use value::{Attr, AttrValue, Color, PenValue};
