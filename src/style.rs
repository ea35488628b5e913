// SPDX-License-Identifier: MIT
//
// Color and style resolution.
//
// Client code describes colors loosely: a name ("red", ":bright-blue"), an
// indexed palette entry ("#5"), a literal RGB triplet ("#a1a1a1"), or an
// already-canonical `CellColor`. `ColorSpec::parse` classifies a string once
// at the API boundary; after that nothing re-inspects string shapes.
//
// `Resolver` turns specs into canonical colors and style names into a
// `StyleSet`. Resolution is total and pure:
//
//   - an unrecognized color resolves to the resolver's fallback color
//   - an unknown style name is omitted
//
// so a draw call can never be aborted by its decoration.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use cellscreen_term::{Cell, CellColor, StyleSet};
use regex::Regex;
use serde::Deserialize;

/// `#` followed by either a 1–3 digit palette index or six hex digits.
///
/// The index alternative is tried first, so `#123` is palette entry 123,
/// never a short hex form.
static COLOR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:(\d{1,3})|([0-9A-Fa-f]{6}))$").expect("color literal pattern is valid")
});

// ─── ColorSpec ──────────────────────────────────────────────────────────────

/// A color as the client wrote it.
///
/// # Examples
///
/// ```
/// use cellscreen::style::ColorSpec;
///
/// assert_eq!(ColorSpec::parse("#5"), ColorSpec::Indexed(5));
/// assert_eq!(ColorSpec::parse("#a1a1a1"), ColorSpec::Rgb(161, 161, 161));
/// assert_eq!(ColorSpec::parse("red"), ColorSpec::Named("red".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ColorSpec {
    /// Already canonical; passes through resolution unchanged.
    Canonical(CellColor),
    /// A symbolic name, looked up in the named-color table.
    Named(String),
    /// An indexed palette entry.
    Indexed(u8),
    /// A literal RGB triplet.
    Rgb(u8, u8, u8),
}

impl ColorSpec {
    /// Classify a color string.
    ///
    /// Anything that is not a palette index or hex literal is kept as a
    /// name; whether that name exists is decided at resolution time. An
    /// out-of-range index such as `#300` is therefore an unknown name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(caps) = COLOR_LITERAL.captures(input) {
            if let Some(index) = caps.get(1) {
                if let Ok(index) = index.as_str().parse::<u8>() {
                    return Self::Indexed(index);
                }
            } else if let Some(hex) = caps.get(2) {
                let hex = hex.as_str();
                let byte = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (byte(0), byte(2), byte(4)) {
                    return Self::Rgb(r, g, b);
                }
            }
        }
        Self::Named(input.to_owned())
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Canonical(CellColor::Default)
    }
}

impl From<&str> for ColorSpec {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl From<String> for ColorSpec {
    fn from(input: String) -> Self {
        Self::parse(&input)
    }
}

impl From<CellColor> for ColorSpec {
    fn from(color: CellColor) -> Self {
        Self::Canonical(color)
    }
}

// ─── DrawOptions ────────────────────────────────────────────────────────────

/// Foreground, background and style names for a draw call.
///
/// Every field defaults: default colors, no styles. Deserializes from
/// `{"fg": "red", "bg": "#5", "styles": ["bold"]}` (`foreground` and
/// `background` are accepted as field aliases).
///
/// ```
/// use cellscreen::style::DrawOptions;
///
/// let opts = DrawOptions::new().fg("red").bg("#000000").style("bold");
/// assert!(opts.styles.contains("bold"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawOptions {
    #[serde(alias = "foreground")]
    pub fg: ColorSpec,
    #[serde(alias = "background")]
    pub bg: ColorSpec,
    pub styles: BTreeSet<String>,
}

impl DrawOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fg(mut self, color: impl Into<ColorSpec>) -> Self {
        self.fg = color.into();
        self
    }

    #[must_use]
    pub fn bg(mut self, color: impl Into<ColorSpec>) -> Self {
        self.bg = color.into();
        self
    }

    /// Add one style name.
    #[must_use]
    pub fn style(mut self, name: impl Into<String>) -> Self {
        self.styles.insert(name.into());
        self
    }
}

// ─── Pen ────────────────────────────────────────────────────────────────────

/// Fully resolved colors and styles, ready to stamp onto characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen {
    pub fg: CellColor,
    pub bg: CellColor,
    pub styles: StyleSet,
}

impl Pen {
    /// A cell holding `ch` in this pen's colors and styles.
    #[inline]
    #[must_use]
    pub const fn cell(self, ch: char) -> Cell {
        Cell::styled(ch, self.fg, self.bg, self.styles)
    }
}

// ─── Resolver ───────────────────────────────────────────────────────────────

/// Resolves color specs and style names against the fixed tables.
///
/// ```
/// use cellscreen::style::{ColorSpec, Resolver};
/// use cellscreen_term::CellColor;
///
/// let resolver = Resolver::new(CellColor::Indexed(7));
/// assert_eq!(resolver.resolve_color(&"blue".into()), CellColor::Indexed(4));
/// assert_eq!(resolver.resolve_color(&"mauve-ish".into()), CellColor::Indexed(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolver {
    fallback: CellColor,
}

impl Resolver {
    /// A resolver that maps unrecognized colors to `fallback`.
    #[must_use]
    pub const fn new(fallback: CellColor) -> Self {
        Self { fallback }
    }

    /// A resolver whose fallback is itself given as a color spec.
    ///
    /// The spec is resolved against the terminal default, so an
    /// unrecognized fallback means "terminal default".
    #[must_use]
    pub fn with_fallback(fallback: &ColorSpec) -> Self {
        Self::new(Self::default().resolve_color(fallback))
    }

    /// The color unrecognized input resolves to.
    #[must_use]
    pub const fn fallback(&self) -> CellColor {
        self.fallback
    }

    /// Resolve one color spec.
    #[must_use]
    pub fn resolve_color(&self, spec: &ColorSpec) -> CellColor {
        match spec {
            ColorSpec::Canonical(color) => *color,
            ColorSpec::Named(name) => CellColor::from_name(name).unwrap_or_else(|| {
                tracing::debug!(%name, fallback = %self.fallback, "unrecognized color");
                self.fallback
            }),
            ColorSpec::Indexed(index) => CellColor::Indexed(*index),
            ColorSpec::Rgb(r, g, b) => CellColor::Rgb(*r, *g, *b),
        }
    }

    /// Resolve a set of style names. Unknown names are omitted.
    pub fn resolve_styles<I>(&self, names: I) -> StyleSet
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names.into_iter().fold(StyleSet::empty(), |set, name| {
            let name = name.as_ref();
            StyleSet::lookup(name).map_or_else(
                || {
                    tracing::trace!(%name, "unknown style omitted");
                    set
                },
                |style| set | style,
            )
        })
    }

    /// Resolve a whole [`DrawOptions`] into a [`Pen`].
    #[must_use]
    pub fn resolve(&self, options: &DrawOptions) -> Pen {
        Pen {
            fg: self.resolve_color(&options.fg),
            bg: self.resolve_color(&options.bg),
            styles: self.resolve_styles(&options.styles),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
