// SPDX-License-Identifier: MIT
//
// The device boundary.
//
// A `Device` is whatever actually shows cells and produces input: a real
// terminal (`CrosstermDevice`) or an in-memory stand-in (`HeadlessDevice`).
// The screen above it only ever asks for six things: enter/leave the
// drawing mode, report the size, hand over one pending input event without
// blocking, accept cells at coordinates, place and report the cursor, and
// present what it was given.

use std::io;

use crate::cell::Cell;
use crate::key::Key;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }
}

// ─── Event ──────────────────────────────────────────────────────────────────

/// A canonical input event, already translated from the device's raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(Key),
    /// The viewport changed to a new size.
    Resize(Size),
}

// ─── Device ─────────────────────────────────────────────────────────────────

/// A terminal-like output and input device.
///
/// Drawing calls may be buffered by the device; nothing is guaranteed to be
/// visible until [`present`](Device::present) returns.
pub trait Device {
    /// Switch the device into drawing mode (raw input, private screen).
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be initialized.
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the device to the state it had before [`enter`](Device::enter).
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be restored.
    fn leave(&mut self) -> io::Result<()>;

    /// Current viewport size.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn size(&mut self) -> io::Result<Size>;

    /// Pop one pending input event, or `None` if nothing is queued.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    fn read_event(&mut self) -> io::Result<Option<Event>>;

    /// Draw one cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn draw_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()>;

    /// Blank the whole viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn clear(&mut self) -> io::Result<()>;

    /// Place the visible cursor at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()>;

    /// Where the visible cursor was last placed.
    ///
    /// # Errors
    ///
    /// Returns an error if the position cannot be determined.
    fn cursor_position(&mut self) -> io::Result<(u16, u16)>;

    /// Make everything drawn so far visible.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn present(&mut self) -> io::Result<()>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
