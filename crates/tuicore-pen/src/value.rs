//! [`PenValue`]: the plain, immutable attribute map.

/// Which attribute a [`PenValue`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Fg,
    Bg,
    Bold,
    Under,
    Italic,
    Reverse,
    Strike,
    Altfont,
}

/// A value for one [`Attr`], used by the generic `chattr`/`getattr` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue {
    Color(u8),
    Bool(bool),
    Font(u8),
}

/// Input to a color-valued setter: a raw palette index or a named color,
/// optionally `hi-`-prefixed for the bright variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    Index(u8),
    Named(String),
}

impl Color {
    /// Resolve to a palette index, or `None` if `Named` doesn't match one of
    /// the eight base color names (with an optional `hi-` prefix).
    pub fn resolve(&self) -> Option<u8> {
        match self {
            Color::Index(v) => Some(*v),
            Color::Named(name) => named_color_index(name),
        }
    }
}

fn named_color_index(name: &str) -> Option<u8> {
    let (base, bump) = match name.strip_prefix("hi-") {
        Some(rest) => (rest, 8),
        None => (name, 0),
    };
    let idx = match base {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        _ => return None,
    };
    Some(idx + bump)
}

/// A partial map from [`Attr`] to value.
///
/// `fg`/`bg`/`altfont` are genuinely optional (any value including 0 is
/// meaningful, so absence needs its own state). The five booleans fold
/// "absent" and "false" into one: an overlay can assert `true` but can never
/// force a `false` over a `true` inherited from a lower pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PenValue {
    pub fg: Option<u8>,
    pub bg: Option<u8>,
    pub bold: bool,
    pub under: bool,
    pub italic: bool,
    pub reverse: bool,
    pub strike: bool,
    pub altfont: Option<u8>,
}

impl PenValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color.resolve();
        self
    }

    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color.resolve();
        self
    }

    pub fn with_bold(mut self, v: bool) -> Self {
        self.bold = v;
        self
    }

    pub fn with_under(mut self, v: bool) -> Self {
        self.under = v;
        self
    }

    pub fn with_italic(mut self, v: bool) -> Self {
        self.italic = v;
        self
    }

    pub fn with_reverse(mut self, v: bool) -> Self {
        self.reverse = v;
        self
    }

    pub fn with_strike(mut self, v: bool) -> Self {
        self.strike = v;
        self
    }

    /// `0..=9`; out of range is stored absent, same as never having set it.
    pub fn with_altfont(mut self, v: u8) -> Self {
        self.altfont = (v <= 9).then_some(v);
        self
    }

    /// Set (or, with `None`, clear) one attribute generically. A value of
    /// the wrong kind for `attr` is ignored (no-op), and `Bool(false)` is
    /// equivalent to clearing, per the boolean canonicalization rule.
    pub fn chattr(&mut self, attr: Attr, value: Option<AttrValue>) {
        match (attr, value) {
            (Attr::Fg, Some(AttrValue::Color(v))) => self.fg = Some(v),
            (Attr::Fg, None) => self.fg = None,
            (Attr::Bg, Some(AttrValue::Color(v))) => self.bg = Some(v),
            (Attr::Bg, None) => self.bg = None,
            (Attr::Bold, Some(AttrValue::Bool(v))) => self.bold = v,
            (Attr::Bold, None) => self.bold = false,
            (Attr::Under, Some(AttrValue::Bool(v))) => self.under = v,
            (Attr::Under, None) => self.under = false,
            (Attr::Italic, Some(AttrValue::Bool(v))) => self.italic = v,
            (Attr::Italic, None) => self.italic = false,
            (Attr::Reverse, Some(AttrValue::Bool(v))) => self.reverse = v,
            (Attr::Reverse, None) => self.reverse = false,
            (Attr::Strike, Some(AttrValue::Bool(v))) => self.strike = v,
            (Attr::Strike, None) => self.strike = false,
            (Attr::Altfont, Some(AttrValue::Font(v))) => self.altfont = (v <= 9).then_some(v),
            (Attr::Altfont, None) => self.altfont = None,
            _ => {}
        }
    }

    pub fn getattr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Fg => self.fg.map(AttrValue::Color),
            Attr::Bg => self.bg.map(AttrValue::Color),
            Attr::Bold => self.bold.then_some(AttrValue::Bool(true)),
            Attr::Under => self.under.then_some(AttrValue::Bool(true)),
            Attr::Italic => self.italic.then_some(AttrValue::Bool(true)),
            Attr::Reverse => self.reverse.then_some(AttrValue::Bool(true)),
            Attr::Strike => self.strike.then_some(AttrValue::Bool(true)),
            Attr::Altfont => self.altfont.map(AttrValue::Font),
        }
    }

    pub fn hasattr(&self, attr: Attr) -> bool {
        self.getattr(attr).is_some()
    }

    pub fn delattr(&mut self, attr: Attr) {
        self.chattr(attr, None);
    }

    /// Layer `over` on top of `base`: every attribute `over` defines wins,
    /// everything else falls through to `base`.
    pub fn merge(base: &PenValue, over: &PenValue) -> PenValue {
        PenValue {
            fg: over.fg.or(base.fg),
            bg: over.bg.or(base.bg),
            bold: base.bold || over.bold,
            under: base.under || over.under,
            italic: base.italic || over.italic,
            reverse: base.reverse || over.reverse,
            strike: base.strike || over.strike,
            altfont: over.altfont.or(base.altfont),
        }
    }

    /// Fill in, in place, every attribute `self` leaves unset from `other`.
    /// Attributes `self` already defines are left untouched.
    pub fn default_from(&mut self, other: &PenValue) {
        *self = PenValue::merge(other, self);
    }

    /// Replace every attribute of `self` with `other`'s, wholesale.
    pub fn copy_from(&mut self, other: &PenValue) {
        *self = *other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_color_resolves_base_and_hi() {
        assert_eq!(Color::Named("red".into()).resolve(), Some(1));
        assert_eq!(Color::Named("hi-red".into()).resolve(), Some(9));
        assert_eq!(Color::Named("nope".into()).resolve(), None);
    }

    #[test]
    fn chattr_getattr_round_trip_color() {
        let mut p = PenValue::new();
        p.chattr(Attr::Fg, Some(AttrValue::Color(4)));
        assert_eq!(p.getattr(Attr::Fg), Some(AttrValue::Color(4)));
        assert!(p.hasattr(Attr::Fg));
    }

    #[test]
    fn chattr_getattr_round_trip_bold_true() {
        let mut p = PenValue::new();
        p.chattr(Attr::Bold, Some(AttrValue::Bool(true)));
        assert_eq!(p.getattr(Attr::Bold), Some(AttrValue::Bool(true)));
    }

    #[test]
    fn chattr_none_clears_attribute() {
        let mut p = PenValue::new().with_fg(Color::Index(2));
        assert!(p.hasattr(Attr::Fg));
        p.chattr(Attr::Fg, None);
        assert!(!p.hasattr(Attr::Fg));
    }

    #[test]
    fn delattr_of_absent_attribute_is_noop() {
        let mut p = PenValue::new();
        assert!(!p.hasattr(Attr::Strike));
        p.delattr(Attr::Strike);
        assert!(!p.hasattr(Attr::Strike));
    }

    #[test]
    fn bold_false_is_indistinguishable_from_absent() {
        let mut p = PenValue::new();
        p.chattr(Attr::Bold, Some(AttrValue::Bool(false)));
        assert!(!p.hasattr(Attr::Bold));
        assert_eq!(p, PenValue::new());
    }

    #[test]
    fn altfont_out_of_range_is_ignored_to_absent() {
        let mut p = PenValue::new();
        p.chattr(Attr::Altfont, Some(AttrValue::Font(20)));
        assert!(!p.hasattr(Attr::Altfont));
    }

    #[test]
    fn merge_over_wins_where_defined() {
        let base = PenValue::new().with_fg(Color::Index(1)).with_bold(true);
        let over = PenValue::new().with_fg(Color::Index(2));
        let merged = PenValue::merge(&base, &over);
        assert_eq!(merged.fg, Some(2));
        assert!(merged.bold);
    }

    #[test]
    fn merge_bool_is_monotonic_or() {
        let base = PenValue::new().with_under(true);
        let over = PenValue::new();
        assert!(PenValue::merge(&base, &over).under);
    }

    #[test]
    fn default_from_fills_only_unset_attributes() {
        let mut p = PenValue::new().with_fg(Color::Index(3));
        let fallback = PenValue::new().with_fg(Color::Index(9)).with_bg(Color::Index(0));
        p.default_from(&fallback);
        assert_eq!(p.fg, Some(3));
        assert_eq!(p.bg, Some(0));
    }

    #[test]
    fn copy_from_replaces_wholesale() {
        let mut p = PenValue::new().with_fg(Color::Index(3));
        let other = PenValue::new().with_bg(Color::Index(1));
        p.copy_from(&other);
        assert_eq!(p, other);
    }
}
