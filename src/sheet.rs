// SPDX-License-Identifier: MIT
//
// Sheet — a 2-D block of heterogeneously styled text.
//
// A sheet is a list of rows. A row is either one plain string or a list of
// items, and an item is a character, a string, or content paired with its
// own `DrawOptions`. Rows are independent: nothing pads or truncates one row
// to match another.
//
// The shape is closed, so drawing a `Sheet` never meets an unknown item.
// Loose input (JSON arrays of strings and `[content, options]` pairs) is
// checked once, in `Sheet::from_json`, and rejected there if it does not fit.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::style::DrawOptions;

// ─── Content / Item / Row ───────────────────────────────────────────────────

/// The text half of a styled item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Char(char),
    Text(String),
}

impl Content {
    /// Columns this content occupies (one per character).
    #[must_use]
    pub fn columns(&self) -> usize {
        match self {
            Self::Char(_) => 1,
            Self::Text(text) => text.chars().count(),
        }
    }
}

impl From<char> for Content {
    fn from(ch: char) -> Self {
        Self::Char(ch)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// One entry of an item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A single character in default colors.
    Char(char),
    /// A string in default colors.
    Text(String),
    /// Content drawn with its own options.
    Styled(Content, DrawOptions),
}

impl Item {
    /// Content with its own draw options.
    pub fn styled(content: impl Into<Content>, options: DrawOptions) -> Self {
        Self::Styled(content.into(), options)
    }

    /// Columns this item occupies (one per character).
    #[must_use]
    pub fn columns(&self) -> usize {
        match self {
            Self::Char(_) => 1,
            Self::Text(text) => text.chars().count(),
            Self::Styled(content, _) => content.columns(),
        }
    }
}

impl From<char> for Item {
    fn from(ch: char) -> Self {
        Self::Char(ch)
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<C: Into<Content>> From<(C, DrawOptions)> for Item {
    fn from((content, options): (C, DrawOptions)) -> Self {
        Self::Styled(content.into(), options)
    }
}

/// One row of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Plain text in default colors.
    Text(String),
    /// Items drawn left to right, each starting where the previous ended.
    Items(Vec<Item>),
}

impl From<&str> for Row {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Row {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Item>> for Row {
    fn from(items: Vec<Item>) -> Self {
        Self::Items(items)
    }
}

impl FromIterator<Item> for Row {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::Items(iter.into_iter().collect())
    }
}

// ─── Sheet ──────────────────────────────────────────────────────────────────

/// Rows of styled text, drawn top to bottom from one origin.
///
/// ```
/// use cellscreen::sheet::{Item, Sheet};
/// use cellscreen::style::DrawOptions;
///
/// let sheet = Sheet::new()
///     .row("title")
///     .row(vec![Item::from('>'), Item::styled("ok", DrawOptions::new().fg("green"))]);
/// assert_eq!(sheet.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Sheet {
    rows: Vec<Row>,
}

impl Sheet {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row.
    #[must_use]
    pub fn row(mut self, row: impl Into<Row>) -> Self {
        self.rows.push(row.into());
        self
    }

    /// Append a row in place.
    pub fn push(&mut self, row: impl Into<Row>) {
        self.rows.push(row.into());
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // ─── JSON boundary ──────────────────────────────────────────────────

    /// Build a sheet from its loose JSON form.
    ///
    /// The value must be an array of rows. A row is a string or an array of
    /// items; an item is a string or a two-element `[content, options]`
    /// array whose content is a string and whose options is an object.
    /// Single-character strings become character items.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if `value` is not an array, or an options object has
    ///   fields `DrawOptions` does not know.
    /// - [`Error::UnrecognizedRow`] for a row of any other shape.
    /// - [`Error::UnrecognizedItem`] for an item of any other shape.
    pub fn from_json(value: &Value) -> Result<Self> {
        let rows = value.as_array().ok_or_else(|| {
            Error::Json(serde::de::Error::custom(format!(
                "a sheet must be an array of rows, found {value}"
            )))
        })?;
        rows.iter()
            .enumerate()
            .map(|(row, value)| parse_row(row, value))
            .collect()
    }

    /// Parse JSON text and build a sheet from it.
    ///
    /// # Errors
    ///
    /// As [`from_json`](Self::from_json), plus [`Error::Json`] for malformed
    /// JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }
}

impl<R: Into<Row>> FromIterator<R> for Sheet {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<Row>> for Sheet {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl TryFrom<Value> for Sheet {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

fn parse_row(row: usize, value: &Value) -> Result<Row> {
    match value {
        Value::String(text) => Ok(Row::Text(text.clone())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_item(row, index, item))
            .collect(),
        other => Err(Error::UnrecognizedRow {
            row,
            found: other.to_string(),
        }),
    }
}

fn parse_item(row: usize, index: usize, value: &Value) -> Result<Item> {
    let unrecognized = || Error::UnrecognizedItem {
        row,
        index,
        found: value.to_string(),
    };
    match value {
        Value::String(text) => Ok(match single_char(text) {
            Some(ch) => Item::Char(ch),
            None => Item::Text(text.clone()),
        }),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(text), options @ Value::Object(_)] => {
                let options = DrawOptions::deserialize(options)?;
                let content =
                    single_char(text).map_or_else(|| Content::Text(text.clone()), Content::Char);
                Ok(Item::Styled(content, options))
            }
            _ => Err(unrecognized()),
        },
        _ => Err(unrecognized()),
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ColorSpec;
    use pretty_assertions::assert_eq;

    fn fg(color: &str) -> DrawOptions {
        DrawOptions::new().fg(color)
    }

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn builder_and_collect_agree() {
        let built = Sheet::new().row("ab").row("xyz");
        let collected: Sheet = ["ab", "xyz"].into_iter().collect();
        assert_eq!(built, collected);
        assert_eq!(built.len(), 2);
    }

    #[test]
    fn item_conversions() {
        assert_eq!(Item::from('x'), Item::Char('x'));
        assert_eq!(Item::from("xy"), Item::Text("xy".into()));
        assert_eq!(
            Item::from(('r', fg("red"))),
            Item::Styled(Content::Char('r'), fg("red"))
        );
        assert_eq!(
            Item::from(("ok", fg("green"))),
            Item::Styled(Content::Text("ok".into()), fg("green"))
        );
    }

    #[test]
    fn columns_count_characters() {
        assert_eq!(Item::from('x').columns(), 1);
        assert_eq!(Item::from("héllo").columns(), 5);
        assert_eq!(Item::styled("", DrawOptions::new()).columns(), 0);
    }

    #[test]
    fn empty_sheet() {
        assert!(Sheet::new().is_empty());
        assert!(Sheet::default().rows().is_empty());
    }

    // ── JSON ────────────────────────────────────────────────────────

    #[test]
    fn json_plain_rows() {
        let sheet = Sheet::from_json_str(r#"["ab", "xyz"]"#).unwrap();
        assert_eq!(sheet, Sheet::new().row("ab").row("xyz"));
    }

    #[test]
    fn json_styled_pairs() {
        let sheet = Sheet::from_json_str(
            r#"[[["r", {"fg": "red"}], ["g", {"fg": "green"}]], [["b", {"fg": "blue"}]]]"#,
        )
        .unwrap();
        let expected = Sheet::new()
            .row(vec![Item::from(('r', fg("red"))), Item::from(('g', fg("green")))])
            .row(vec![Item::from(('b', fg("blue")))]);
        assert_eq!(sheet, expected);
    }

    #[test]
    fn json_mixed_items() {
        let json = r##"[["a", "bc", ["de", {"bg": "#5", "styles": ["bold"]}]]]"##;
        let sheet = Sheet::from_json_str(json).unwrap();
        let Row::Items(items) = &sheet.rows()[0] else {
            panic!("expected an item row");
        };
        assert_eq!(items[0], Item::Char('a'));
        assert_eq!(items[1], Item::Text("bc".into()));
        let Item::Styled(Content::Text(text), options) = &items[2] else {
            panic!("expected a styled text item");
        };
        assert_eq!(text, "de");
        assert_eq!(options.bg, ColorSpec::Indexed(5));
        assert!(options.styles.contains("bold"));
    }

    #[test]
    fn json_rejects_bad_rows() {
        let err = Sheet::from_json_str(r#"["ok", 42]"#).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedRow { row: 1, ref found } if found == "42"));
    }

    #[test]
    fn json_rejects_bad_items() {
        for json in [
            r#"[["a", 7]]"#,
            r#"[["a", ["x"]]]"#,
            r#"[["a", ["x", "red"]]]"#,
            r#"[["a", ["x", {}, {}]]]"#,
            r#"[["a", [3, {}]]]"#,
        ] {
            let err = Sheet::from_json_str(json).unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedItem { row: 0, index: 1, .. }),
                "{json}: {err}"
            );
        }
    }

    #[test]
    fn json_rejects_non_array() {
        assert!(matches!(
            Sheet::from_json_str(r#"{"rows": []}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(Sheet::from_json_str("[\"a\""), Err(Error::Json(_))));
    }

    #[test]
    fn json_rejects_unknown_option_fields() {
        assert!(matches!(
            Sheet::from_json_str(r#"[[["x", {"colour": "red"}]]]"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn sheet_deserializes_through_serde() {
        let sheet: Sheet = serde_json::from_str(r#"["hi", [["!", {"fg": "red"}]]]"#).unwrap();
        assert_eq!(sheet.len(), 2);
        assert!(serde_json::from_str::<Sheet>("[1]").is_err());
    }
}
