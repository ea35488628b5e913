// SPDX-License-Identifier: MIT
//
// Canonical cell colors and the named-color table.
//
// `CellColor` is the opaque device color token every color input resolves
// to. It is small and cheap to compare because the differential flush
// compares it for every cell of every frame.
//
// Named colors map onto the first sixteen entries of the indexed palette
// instead of fixed RGB values, so they follow the user's terminal theme.

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Canonical color stored in a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,

    /// Indexed palette entry (0–255).
    Indexed(u8),

    /// 24-bit literal color.
    Rgb(u8, u8, u8),
}

impl CellColor {
    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Look up a color name in [`NAMED_COLORS`].
    ///
    /// Matching is ASCII case-insensitive and tolerates a leading `:`
    /// (keyword spelling).
    ///
    /// ```
    /// use cellscreen_term::color::CellColor;
    ///
    /// assert_eq!(CellColor::from_name("red"), Some(CellColor::Indexed(1)));
    /// assert_eq!(CellColor::from_name(":bright-blue"), Some(CellColor::Indexed(12)));
    /// assert_eq!(CellColor::from_name("default"), Some(CellColor::Default));
    /// assert_eq!(CellColor::from_name("chartreuse"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix(':').unwrap_or(name);
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, color)| color)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Indexed(idx) => write!(f, "#{idx}"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Named Colors ────────────────────────────────────────────────────────────

/// Fixed color-name table.
pub const NAMED_COLORS: &[(&str, CellColor)] = &[
    ("default", CellColor::Default),
    ("black", CellColor::Indexed(0)),
    ("red", CellColor::Indexed(1)),
    ("green", CellColor::Indexed(2)),
    ("yellow", CellColor::Indexed(3)),
    ("blue", CellColor::Indexed(4)),
    ("magenta", CellColor::Indexed(5)),
    ("cyan", CellColor::Indexed(6)),
    ("white", CellColor::Indexed(7)),
    ("bright-black", CellColor::Indexed(8)),
    ("bright-red", CellColor::Indexed(9)),
    ("bright-green", CellColor::Indexed(10)),
    ("bright-yellow", CellColor::Indexed(11)),
    ("bright-blue", CellColor::Indexed(12)),
    ("bright-magenta", CellColor::Indexed(13)),
    ("bright-cyan", CellColor::Indexed(14)),
    ("bright-white", CellColor::Indexed(15)),
];

// ─── Tests ───────────────────────────────────────────────────────────────────
