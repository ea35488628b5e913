// SPDX-License-Identifier: MIT
//
// HeadlessDevice — a terminal that only exists in memory.
//
// Drawn cells land in a `FrameBuffer` that stands in for the physical
// screen, but only become visible there on `present`, exactly like a real
// terminal that buffers output. Input is whatever the owner queued with
// `push_key` / `push_resize`. Counters record how much drawing happened so
// callers can assert on differential behavior, and `fail_next` makes one
// chosen operation return an I/O error.

use std::collections::VecDeque;
use std::io;

use crate::buffer::FrameBuffer;
use crate::cell::Cell;
use crate::device::{Device, Event, Size};
use crate::key::Key;

/// A [`Device`] operation, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOp {
    Enter,
    Leave,
    Size,
    ReadEvent,
    DrawCell,
    Clear,
    SetCursor,
    CursorPosition,
    Present,
}

/// An in-memory [`Device`].
///
/// # Example
///
/// ```
/// use cellscreen_term::cell::Cell;
/// use cellscreen_term::device::{Device, Size};
/// use cellscreen_term::headless::HeadlessDevice;
///
/// let mut device = HeadlessDevice::new(Size::new(10, 2));
/// device.draw_cell(0, 1, &Cell::new('!'))?;
/// assert_eq!(device.row_text(1).as_deref(), Some("          "));
/// device.present()?;
/// assert_eq!(device.row_text(1).as_deref(), Some("!         "));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessDevice {
    size: Size,
    staged: FrameBuffer,
    visible: FrameBuffer,
    cursor: (u16, u16),
    events: VecDeque<Event>,
    failures: Vec<DeviceOp>,
    active: bool,
    enter_count: usize,
    cells_drawn: usize,
    presents: usize,
}

impl HeadlessDevice {
    /// A blank device of the given size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            staged: FrameBuffer::with_size(size),
            visible: FrameBuffer::with_size(size),
            cursor: (0, 0),
            events: VecDeque::new(),
            failures: Vec::new(),
            active: false,
            enter_count: 0,
            cells_drawn: 0,
            presents: 0,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Queue a key press.
    pub fn push_key(&mut self, key: impl Into<Key>) {
        self.events.push_back(Event::Key(key.into()));
    }

    /// Change the viewport size and queue the matching resize event.
    pub fn push_resize(&mut self, size: Size) {
        self.size = size;
        self.staged.resize(size.cols, size.rows);
        self.visible.resize(size.cols, size.rows);
        self.events.push_back(Event::Resize(size));
    }

    /// Number of events still queued.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ─── Failures ────────────────────────────────────────────────────────

    /// Make the next call of `op` fail with an I/O error.
    ///
    /// Each call arms one failure; arming the same op twice fails it twice.
    pub fn fail_next(&mut self, op: DeviceOp) {
        self.failures.push(op);
    }

    fn check(&mut self, op: DeviceOp) -> io::Result<()> {
        match self.failures.iter().position(|&armed| armed == op) {
            Some(at) => {
                self.failures.remove(at);
                Err(io::Error::other(format!("{op:?} failed")))
            }
            None => Ok(()),
        }
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    /// The presented cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.visible.get(x, y)
    }

    /// The presented characters of row `y`.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.visible.row_text(y)
    }

    /// Everything presented so far.
    #[must_use]
    pub const fn screen(&self) -> &FrameBuffer {
        &self.visible
    }

    /// Last cursor position set.
    #[must_use]
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Whether the device is between `enter` and `leave`.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// How many times `enter` switched the device on.
    #[must_use]
    pub const fn enter_count(&self) -> usize {
        self.enter_count
    }

    /// Total `draw_cell` calls.
    #[must_use]
    pub const fn cells_drawn(&self) -> usize {
        self.cells_drawn
    }

    /// Total `present` calls.
    #[must_use]
    pub const fn presents(&self) -> usize {
        self.presents
    }
}

impl Device for HeadlessDevice {
    fn enter(&mut self) -> io::Result<()> {
        self.check(DeviceOp::Enter)?;
        if !self.active {
            self.active = true;
            self.cursor = (0, 0);
            self.enter_count += 1;
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        // A failed leave still gives the device up, like a real terminal
        // whose restore sequence was lost.
        self.active = false;
        self.check(DeviceOp::Leave)
    }

    fn size(&mut self) -> io::Result<Size> {
        self.check(DeviceOp::Size)?;
        Ok(self.size)
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        self.check(DeviceOp::ReadEvent)?;
        Ok(self.events.pop_front())
    }

    fn draw_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        self.check(DeviceOp::DrawCell)?;
        self.staged.set(x, y, *cell);
        self.cells_drawn += 1;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.check(DeviceOp::Clear)?;
        self.staged.clear();
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.check(DeviceOp::SetCursor)?;
        self.cursor = (x, y);
        Ok(())
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        self.check(DeviceOp::CursorPosition)?;
        Ok(self.cursor)
    }

    fn present(&mut self) -> io::Result<()> {
        self.check(DeviceOp::Present)?;
        self.visible.copy_from(&self.staged);
        self.presents += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyCode;

    #[test]
    fn draws_are_invisible_until_present() {
        let mut dev = HeadlessDevice::new(Size::new(3, 1));
        dev.draw_cell(1, 0, &Cell::new('x')).unwrap();
        assert_eq!(dev.cell(1, 0), Some(&Cell::EMPTY));
        dev.present().unwrap();
        assert_eq!(dev.cell(1, 0), Some(&Cell::new('x')));
        assert_eq!(dev.cells_drawn(), 1);
        assert_eq!(dev.presents(), 1);
    }

    #[test]
    fn out_of_bounds_draw_is_clipped() {
        let mut dev = HeadlessDevice::new(Size::new(2, 2));
        dev.draw_cell(5, 5, &Cell::new('x')).unwrap();
        dev.present().unwrap();
        assert!(dev.screen().iter().all(|(_, _, c)| c.is_empty()));
    }

    #[test]
    fn events_pop_in_order() {
        let mut dev = HeadlessDevice::new(Size::new(2, 2));
        dev.push_key(Key::char('a'));
        dev.push_key(KeyCode::Enter);
        assert_eq!(dev.pending_events(), 2);
        assert_eq!(dev.read_event().unwrap(), Some(Event::Key(Key::char('a'))));
        assert_eq!(
            dev.read_event().unwrap(),
            Some(Event::Key(Key::new(KeyCode::Enter)))
        );
        assert_eq!(dev.read_event().unwrap(), None);
    }

    #[test]
    fn push_resize_changes_size_and_queues_event() {
        let mut dev = HeadlessDevice::new(Size::new(2, 2));
        dev.push_resize(Size::new(9, 4));
        assert_eq!(dev.size().unwrap(), Size::new(9, 4));
        assert_eq!(dev.screen().size(), Size::new(9, 4));
        assert_eq!(
            dev.read_event().unwrap(),
            Some(Event::Resize(Size::new(9, 4)))
        );
    }

    #[test]
    fn enter_is_counted_once_per_activation() {
        let mut dev = HeadlessDevice::new(Size::new(1, 1));
        dev.enter().unwrap();
        dev.enter().unwrap();
        assert_eq!(dev.enter_count(), 1);
        dev.leave().unwrap();
        assert!(!dev.is_active());
        dev.enter().unwrap();
        assert_eq!(dev.enter_count(), 2);
    }

    #[test]
    fn clear_blanks_on_next_present() {
        let mut dev = HeadlessDevice::new(Size::new(2, 1));
        dev.draw_cell(0, 0, &Cell::new('q')).unwrap();
        dev.present().unwrap();
        dev.clear().unwrap();
        dev.present().unwrap();
        assert_eq!(dev.row_text(0).as_deref(), Some("  "));
    }

    #[test]
    fn cursor_is_tracked() {
        let mut dev = HeadlessDevice::new(Size::new(4, 4));
        dev.set_cursor(3, 2).unwrap();
        assert_eq!(dev.cursor(), (3, 2));
        assert_eq!(dev.cursor_position().unwrap(), (3, 2));
    }

    // ── Failure injection ───────────────────────────────────────────

    #[test]
    fn armed_failure_fires_once() {
        let mut dev = HeadlessDevice::new(Size::new(2, 1));
        dev.fail_next(DeviceOp::DrawCell);
        assert!(dev.draw_cell(0, 0, &Cell::new('a')).is_err());
        assert_eq!(dev.cells_drawn(), 0);
        dev.draw_cell(0, 0, &Cell::new('a')).unwrap();
        assert_eq!(dev.cells_drawn(), 1);
    }

    #[test]
    fn failures_only_hit_their_op() {
        let mut dev = HeadlessDevice::new(Size::new(2, 1));
        dev.fail_next(DeviceOp::Present);
        dev.size().unwrap();
        dev.set_cursor(1, 0).unwrap();
        let err = dev.present().unwrap_err();
        assert_eq!(err.to_string(), "Present failed");
    }

    #[test]
    fn failed_leave_still_deactivates() {
        let mut dev = HeadlessDevice::new(Size::new(1, 1));
        dev.enter().unwrap();
        dev.fail_next(DeviceOp::Leave);
        assert!(dev.leave().is_err());
        assert!(!dev.is_active());
    }

    #[test]
    fn failed_enter_stays_inactive() {
        let mut dev = HeadlessDevice::new(Size::new(1, 1));
        dev.fail_next(DeviceOp::Enter);
        assert!(dev.enter().is_err());
        assert!(!dev.is_active());
        assert_eq!(dev.enter_count(), 0);
    }
}
