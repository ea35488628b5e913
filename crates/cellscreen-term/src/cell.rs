// SPDX-License-Identifier: MIT
//
// Cell — one character position of the screen.
//
// A cell holds a character, a canonical foreground and background color,
// and a style set. Cells are plain `Copy` values: the frame buffer owns
// them, writes overwrite them in place, and the differential flush compares
// them with the derived `PartialEq`.
//
// Style names ("bold", "reverse", ...) are resolved through the fixed
// `STYLE_NAMES` table below. The table is the only place a name becomes a
// flag; nothing else in the stack parses style strings.

use crate::color::CellColor;

// ─── Style Set ───────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Canonical style set stored as a compact bitfield.
    ///
    /// Combine with bitwise OR:
    ///
    /// ```
    /// use cellscreen_term::cell::StyleSet;
    ///
    /// let style = StyleSet::BOLD | StyleSet::UNDERLINE;
    /// assert!(style.contains(StyleSet::BOLD));
    /// assert!(!style.contains(StyleSet::REVERSE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct StyleSet: u8 {
        /// Increased intensity.
        const BOLD          = 1 << 0;
        /// Decreased intensity.
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        /// Swap foreground and background.
        const REVERSE       = 1 << 5;
        const HIDDEN        = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// Fixed style-name table.
///
/// `blink` is accepted as an alias for `blinking`.
pub const STYLE_NAMES: &[(&str, StyleSet)] = &[
    ("bold", StyleSet::BOLD),
    ("dim", StyleSet::DIM),
    ("italic", StyleSet::ITALIC),
    ("underline", StyleSet::UNDERLINE),
    ("blinking", StyleSet::BLINK),
    ("blink", StyleSet::BLINK),
    ("reverse", StyleSet::REVERSE),
    ("hidden", StyleSet::HIDDEN),
    ("strikethrough", StyleSet::STRIKETHROUGH),
];

impl StyleSet {
    /// Look up a single style name.
    ///
    /// Matching is ASCII case-insensitive and tolerates a leading `:`
    /// (keyword spelling). Returns `None` for names not in the table.
    ///
    /// ```
    /// use cellscreen_term::cell::StyleSet;
    ///
    /// assert_eq!(StyleSet::lookup("bold"), Some(StyleSet::BOLD));
    /// assert_eq!(StyleSet::lookup(":Reverse"), Some(StyleSet::REVERSE));
    /// assert_eq!(StyleSet::lookup("sparkly"), None);
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.strip_prefix(':').unwrap_or(name);
        STYLE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, style)| style)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single styled character position.
///
/// # Examples
///
/// ```
/// use cellscreen_term::cell::{Cell, StyleSet};
/// use cellscreen_term::color::CellColor;
///
/// let cell = Cell::new('x')
///     .with_fg(CellColor::Indexed(1))
///     .with_styles(StyleSet::BOLD);
/// assert_eq!(cell.ch, 'x');
/// assert!(!cell.is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Character to display.
    pub ch: char,

    /// Foreground (text) color.
    pub fg: CellColor,

    /// Background color.
    pub bg: CellColor,

    /// Style flags (bold, underline, reverse, ...).
    pub styles: StyleSet,
}

impl Cell {
    /// A blank cell: space, default colors, no styles.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: CellColor::Default,
        bg: CellColor::Default,
        styles: StyleSet::empty(),
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// Create a cell with full styling.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, styles: StyleSet) -> Self {
        Self { ch, fg, bg, styles }
    }

    /// Whether this cell is blank (space, default colors, no styles).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Whether two cells share colors and styles, ignoring the character.
    ///
    /// The crossterm device uses this to skip redundant SGR output.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.styles == other.styles
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_styles(self, styles: StyleSet) -> Self {
        Self { styles, ..self }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if !self.fg.is_default() {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.styles.is_empty() {
            write!(f, ", {:?}", self.styles)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Style names ──────────────────────────────────────────────────────

    #[test]
    fn every_table_entry_resolves_to_itself() {
        for &(name, style) in STYLE_NAMES {
            assert_eq!(StyleSet::lookup(name), Some(style), "{name}");
        }
    }

    #[test]
    fn style_lookup_ignores_case_and_keyword_colon() {
        assert_eq!(StyleSet::lookup("UNDERLINE"), Some(StyleSet::UNDERLINE));
        assert_eq!(StyleSet::lookup(":bold"), Some(StyleSet::BOLD));
    }

    #[test]
    fn blink_alias_matches_blinking() {
        assert_eq!(StyleSet::lookup("blink"), StyleSet::lookup("blinking"));
    }

    #[test]
    fn lookup_uses_the_name_table_not_flag_identifiers() {
        // bitflags' own parser only knows the constant identifiers.
        assert_eq!(StyleSet::from_name("bold"), None);
        assert_eq!(StyleSet::lookup("bold"), Some(StyleSet::BOLD));
        assert_eq!(StyleSet::from_name("blinking"), None);
        assert_eq!(StyleSet::lookup("blinking"), Some(StyleSet::BLINK));
    }

    #[test]
    fn unknown_style_is_none() {
        assert_eq!(StyleSet::lookup("glow"), None);
        assert_eq!(StyleSet::lookup(""), None);
    }

    #[test]
    fn style_flags_fill_one_byte() {
        assert_eq!(StyleSet::all().bits(), 0xFF);
        assert_eq!(std::mem::size_of::<StyleSet>(), 1);
    }

    // ── Cell ─────────────────────────────────────────────────────────────

    #[test]
    fn default_cell_is_empty() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell, Cell::EMPTY);
    }

    #[test]
    fn styled_cell_has_all_fields() {
        let cell = Cell::styled(
            'Z',
            CellColor::Rgb(255, 255, 0),
            CellColor::Indexed(4),
            StyleSet::BOLD | StyleSet::REVERSE,
        );
        assert_eq!(cell.ch, 'Z');
        assert_eq!(cell.fg, CellColor::Rgb(255, 255, 0));
        assert_eq!(cell.bg, CellColor::Indexed(4));
        assert!(cell.styles.contains(StyleSet::REVERSE));
        assert!(!cell.styles.contains(StyleSet::DIM));
    }

    #[test]
    fn space_with_color_is_not_empty() {
        assert!(!Cell::EMPTY.with_bg(CellColor::Indexed(2)).is_empty());
        assert!(!Cell::EMPTY.with_styles(StyleSet::UNDERLINE).is_empty());
    }

    #[test]
    fn same_style_ignores_character() {
        let a = Cell::new('A').with_fg(CellColor::Indexed(1));
        let b = Cell::new('B').with_fg(CellColor::Indexed(1));
        assert!(a.same_style(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn different_styles_are_not_same_style() {
        let a = Cell::new('A').with_styles(StyleSet::BOLD);
        let b = Cell::new('A').with_styles(StyleSet::ITALIC);
        assert!(!a.same_style(&b));
    }

    #[test]
    fn debug_omits_defaults() {
        assert_eq!(format!("{:?}", Cell::new('q')), "Cell('q')");
        let dbg = format!("{:?}", Cell::new('q').with_fg(CellColor::Indexed(9)));
        assert!(dbg.contains("fg="));
    }
}
