// SPDX-License-Identifier: MIT
//
// Canvas — the cell, text and sheet writers.
//
// Every drawing operation reduces to writing single cells into a
// `FrameBuffer`. Text is written one cell per character, advancing one
// column each, with colors and styles resolved once for the whole call.
// Sheets are written row by row, each item starting where the previous item
// of the same row ended.
//
// No writer validates coordinates: the buffer clips anything outside its
// bounds. Columns past `u16::MAX` cannot be addressed at all, so a run that
// reaches them stops there.

use cellscreen_term::{Cell, FrameBuffer};

use crate::sheet::{Content, Item, Row, Sheet};
use crate::style::{DrawOptions, Pen, Resolver};

/// Writers over a borrowed buffer.
///
/// ```
/// use cellscreen::canvas::Canvas;
/// use cellscreen::style::{DrawOptions, Resolver};
/// use cellscreen_term::FrameBuffer;
///
/// let mut buf = FrameBuffer::new(8, 1);
/// let resolver = Resolver::default();
/// Canvas::new(&mut buf, &resolver).put_string(1, 0, "hey", &DrawOptions::default());
/// assert_eq!(buf.row_text(0).as_deref(), Some(" hey    "));
/// ```
pub struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    resolver: &'a Resolver,
}

impl<'a> Canvas<'a> {
    pub const fn new(buf: &'a mut FrameBuffer, resolver: &'a Resolver) -> Self {
        Self { buf, resolver }
    }

    /// Write an already resolved cell. Returns `false` if it was clipped.
    pub fn put_cell(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        self.buf.set(x, y, cell)
    }

    /// Write one character.
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, options: &DrawOptions) {
        let pen = self.resolver.resolve(options);
        self.buf.set(x, y, pen.cell(ch));
    }

    /// Write `text` left to right from `(x, y)`.
    pub fn put_string(&mut self, x: u16, y: u16, text: &str, options: &DrawOptions) {
        let pen = self.resolver.resolve(options);
        self.stamp(x, y, text.chars(), pen);
    }

    /// Write every row of `sheet`, row `i` landing on line `y + i`.
    ///
    /// Short rows leave the rest of their line untouched.
    pub fn put_sheet(&mut self, x: u16, y: u16, sheet: &Sheet) {
        let plain = self.resolver.resolve(&DrawOptions::default());
        for (offset, row) in sheet.rows().iter().enumerate() {
            let Some(line) = u16::try_from(offset).ok().and_then(|i| y.checked_add(i)) else {
                break;
            };
            match row {
                Row::Text(text) => {
                    self.stamp(x, line, text.chars(), plain);
                }
                Row::Items(items) => self.put_items(x, line, items, plain),
            }
        }
    }

    fn put_items(&mut self, x: u16, y: u16, items: &[Item], plain: Pen) {
        let mut col = Some(x);
        for item in items {
            let Some(at) = col else { break };
            col = match item {
                Item::Char(ch) => self.stamp(at, y, [*ch], plain),
                Item::Text(text) => self.stamp(at, y, text.chars(), plain),
                Item::Styled(content, options) => {
                    let pen = self.resolver.resolve(options);
                    match content {
                        Content::Char(ch) => self.stamp(at, y, [*ch], pen),
                        Content::Text(text) => self.stamp(at, y, text.chars(), pen),
                    }
                }
            };
        }
    }

    /// Write `chars` in `pen` from `(x, y)`, one column each.
    ///
    /// Returns the column after the last character, or `None` once the run
    /// has left the addressable range.
    fn stamp(
        &mut self,
        x: u16,
        y: u16,
        chars: impl IntoIterator<Item = char>,
        pen: Pen,
    ) -> Option<u16> {
        let mut col = Some(x);
        for ch in chars {
            let at = col?;
            self.buf.set(at, y, pen.cell(ch));
            col = at.checked_add(1);
        }
        col
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cellscreen_term::{CellColor, StyleSet};
    use pretty_assertions::assert_eq;

    fn fg(color: &str) -> DrawOptions {
        DrawOptions::new().fg(color)
    }

    // ── Cells and text ──────────────────────────────────────────────

    #[test]
    fn put_cell_reports_clipping() {
        let mut buf = FrameBuffer::new(2, 2);
        let resolver = Resolver::default();
        let mut canvas = Canvas::new(&mut buf, &resolver);
        assert!(canvas.put_cell(1, 1, Cell::new('x')));
        assert!(!canvas.put_cell(2, 0, Cell::new('y')));
        assert_eq!(buf.get(1, 1), Some(&Cell::new('x')));
    }

    #[test]
    fn put_char_resolves_options() {
        let mut buf = FrameBuffer::new(3, 1);
        let resolver = Resolver::default();
        Canvas::new(&mut buf, &resolver).put_char(2, 0, 'z', &fg("#a1a1a1").style("bold"));
        assert_eq!(
            buf.get(2, 0),
            Some(&Cell::styled(
                'z',
                CellColor::Rgb(161, 161, 161),
                CellColor::Default,
                StyleSet::BOLD,
            ))
        );
    }

    #[test]
    fn text_reads_back_with_one_style() {
        let mut buf = FrameBuffer::new(10, 3);
        let resolver = Resolver::default();
        let options = DrawOptions::new().fg("red").bg("#5").style("underline");
        Canvas::new(&mut buf, &resolver).put_string(3, 1, "hello", &options);

        let expected = resolver.resolve(&options);
        let written: String = (3..8)
            .map(|x| {
                let cell = buf.get(x, 1).unwrap();
                assert_eq!(
                    (cell.fg, cell.bg, cell.styles),
                    (expected.fg, expected.bg, expected.styles)
                );
                cell.ch
            })
            .collect();
        assert_eq!(written, "hello");
        assert_eq!(buf.get(2, 1), Some(&Cell::EMPTY));
        assert_eq!(buf.get(8, 1), Some(&Cell::EMPTY));
    }

    #[test]
    fn text_overwrites_previous_cells() {
        let mut buf = FrameBuffer::new(4, 1);
        let resolver = Resolver::default();
        let mut canvas = Canvas::new(&mut buf, &resolver);
        canvas.put_string(0, 0, "abcd", &fg("red"));
        canvas.put_string(1, 0, "XY", &DrawOptions::default());
        assert_eq!(buf.row_text(0).as_deref(), Some("aXYd"));
        assert_eq!(buf.get(0, 0).unwrap().fg, CellColor::Indexed(1));
        assert_eq!(buf.get(1, 0).unwrap().fg, CellColor::Default);
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut buf = FrameBuffer::new(4, 1);
        let resolver = Resolver::default();
        Canvas::new(&mut buf, &resolver).put_string(2, 0, "long", &DrawOptions::default());
        assert_eq!(buf.row_text(0).as_deref(), Some("  lo"));
    }

    #[test]
    fn text_at_the_last_column_stops() {
        let mut buf = FrameBuffer::new(4, 1);
        let resolver = Resolver::default();
        Canvas::new(&mut buf, &resolver).put_string(u16::MAX, 0, "xyz", &DrawOptions::default());
        assert!(buf.iter().all(|(_, _, cell)| cell.is_empty()));
    }

    #[test]
    fn unknown_color_uses_fallback() {
        let mut buf = FrameBuffer::new(1, 1);
        let resolver = Resolver::new(CellColor::Indexed(9));
        Canvas::new(&mut buf, &resolver).put_char(0, 0, '?', &fg("ultraviolet"));
        assert_eq!(buf.get(0, 0).unwrap().fg, CellColor::Indexed(9));
    }

    // ── Sheets ──────────────────────────────────────────────────────

    #[test]
    fn sheet_rows_are_not_padded() {
        let mut buf = FrameBuffer::new(4, 2);
        buf.set(2, 0, Cell::new('#'));
        let resolver = Resolver::default();
        let sheet: Sheet = ["ab", "xyz"].into_iter().collect();
        Canvas::new(&mut buf, &resolver).put_sheet(0, 0, &sheet);
        assert_eq!(buf.row_text(0).as_deref(), Some("ab# "));
        assert_eq!(buf.row_text(1).as_deref(), Some("xyz "));
    }

    #[test]
    fn sheet_styled_items_keep_their_colors() {
        let mut buf = FrameBuffer::new(4, 2);
        let resolver = Resolver::default();
        let sheet = Sheet::new()
            .row(vec![Item::from(('r', fg("red"))), Item::from(('g', fg("green")))])
            .row(vec![Item::from(('b', fg("blue")))]);
        Canvas::new(&mut buf, &resolver).put_sheet(1, 0, &sheet);

        let at = |x: u16, y: u16| {
            let cell = buf.get(x, y).unwrap();
            (cell.ch, cell.fg)
        };
        assert_eq!(at(1, 0), ('r', CellColor::Indexed(1)));
        assert_eq!(at(2, 0), ('g', CellColor::Indexed(2)));
        assert_eq!(at(1, 1), ('b', CellColor::Indexed(4)));
        assert_eq!(buf.get(0, 0), Some(&Cell::EMPTY));
        assert_eq!(buf.get(2, 1), Some(&Cell::EMPTY));
    }

    #[test]
    fn sheet_items_advance_by_their_length() {
        let mut buf = FrameBuffer::new(10, 1);
        let resolver = Resolver::default();
        let sheet = Sheet::new().row(vec![
            Item::from("ab"),
            Item::from('c'),
            Item::styled("def", DrawOptions::new().style("bold")),
            Item::from(""),
            Item::from('g'),
        ]);
        Canvas::new(&mut buf, &resolver).put_sheet(2, 0, &sheet);
        assert_eq!(buf.row_text(0).as_deref(), Some("  abcdefg "));
        assert_eq!(buf.get(5, 0).unwrap().styles, StyleSet::BOLD);
        assert_eq!(buf.get(8, 0).unwrap().styles, StyleSet::empty());
    }

    #[test]
    fn sheet_rows_below_the_buffer_are_clipped() {
        let mut buf = FrameBuffer::new(3, 1);
        let resolver = Resolver::default();
        let sheet: Sheet = ["one", "two"].into_iter().collect();
        Canvas::new(&mut buf, &resolver).put_sheet(0, 0, &sheet);
        assert_eq!(buf.row_text(0).as_deref(), Some("one"));
    }

    #[test]
    fn sheet_from_json_draws_the_same() {
        let json = r#"[[["r", {"fg": "red"}], ["g", {"fg": "green"}]], [["b", {"fg": "blue"}]]]"#;
        let resolver = Resolver::default();

        let mut from_json = FrameBuffer::new(3, 2);
        let loaded = Sheet::from_json_str(json).unwrap();
        Canvas::new(&mut from_json, &resolver).put_sheet(1, 0, &loaded);

        let mut typed = FrameBuffer::new(3, 2);
        let sheet = Sheet::new()
            .row(vec![Item::from(('r', fg("red"))), Item::from(('g', fg("green")))])
            .row(vec![Item::from(('b', fg("blue")))]);
        Canvas::new(&mut typed, &resolver).put_sheet(1, 0, &sheet);

        assert!(from_json.changes(&typed).next().is_none());
    }
}
