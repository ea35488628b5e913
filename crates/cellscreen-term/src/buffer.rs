// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D cell grid that all drawing lands in.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous, so comparing two rows is a single slice comparison and
//     left-to-right iteration is a linear scan.
//
//   - Writes are bounds-checked and report whether they landed. Anything
//     outside the grid is dropped: the drawing layer never pre-validates
//     coordinates, it relies on this.
//
//   - `resize` keeps whatever content fits in the new dimensions, so a
//     terminal resize doesn't wipe a screen the client hasn't redrawn yet.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::device::Size;

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// A 2D buffer of cells.
///
/// # Examples
///
/// ```
/// use cellscreen_term::buffer::FrameBuffer;
/// use cellscreen_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert!(buf.set(5, 3, Cell::new('X')));
/// assert!(!buf.set(80, 3, Cell::new('X')));
/// assert_eq!(buf.get(5, 3).map(|c| c.ch), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    /// Create a buffer sized to a terminal [`Size`].
    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self::new(size.cols, size.rows)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Buffer dimensions as a [`Size`].
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size {
            cols: self.width,
            rows: self.height,
        }
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of row `y` as a string, or `None` if out of bounds.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y).map(|row| row.iter().map(|cell| cell.ch).collect())
    }

    /// Iterate cells with their `(x, y)` coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let w = usize::from(self.width).max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            // x < width and y < height, both u16.
            let x = (i % w) as u16;
            let y = (i / w) as u16;
            (x, y, cell)
        })
    }

    /// Cells that differ from `previous`, with their coordinates.
    ///
    /// Unchanged rows are skipped with one slice comparison. If the two
    /// buffers have different dimensions every cell counts as changed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn changes<'a>(
        &'a self,
        previous: &'a Self,
    ) -> impl Iterator<Item = (u16, u16, &'a Cell)> + 'a {
        let same_shape = self.width == previous.width && self.height == previous.height;
        (0..self.height).flat_map(move |y| {
            let row = self.row(y).unwrap_or_default();
            let prev = if same_shape { previous.row(y) } else { None };
            let unchanged_row = prev == Some(row);
            row.iter()
                .enumerate()
                .filter(move |&(x, cell)| {
                    !unchanged_row && prev.is_none_or(|prev| prev[x] != *cell)
                })
                // x < width, a u16.
                .map(move |(x, cell)| (x as u16, y, cell))
        })
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Write a cell. Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, keeping the content of the overlapping region.
    ///
    /// Newly exposed cells are blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        let mut next = Self::new(width, height);
        let keep_w = usize::from(self.width.min(width));
        for y in 0..self.height.min(height) {
            let src = self.index(0, y);
            let dst = next.index(0, y);
            next.cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        *self = next;
    }

    /// Make this buffer an exact copy of `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        if self.cells.len() == other.cells.len() {
            self.cells.copy_from_slice(&other.cells);
            self.width = other.width;
            self.height = other.height;
        } else {
            self.clone_from(other);
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────────

/// Display width of a character in terminal columns.
///
/// Returns 0 for control characters, 1 for most characters, and 2 for
/// wide characters (CJK, some emoji).
///
/// ```
/// use cellscreen_term::buffer::char_width;
///
/// assert_eq!(char_width('a'), 1);
/// assert_eq!(char_width('中'), 2);
/// assert_eq!(char_width('\n'), 0);
/// ```
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

// ─── Tests ──────────────────────────────────────────────────────────────────────
