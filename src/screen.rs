// SPDX-License-Identifier: MIT
//
// Screen — lifecycle, double buffering, input and viewport.
//
// A started screen owns two frame buffers. Drawing goes into the back
// buffer; `flush` sends the cells that differ from the front buffer (what
// the device currently shows) and then makes the front a copy of the back.
// The back buffer survives a flush, so a frame can be patched and flushed
// again.
//
// Device events are drained lazily, on `poll_key` and at the start of
// `flush`. A resize reshapes the back buffer, schedules a full repaint and
// notifies listeners. Keys found while flushing are queued for `poll_key`.
//
// Lifecycle is strict: `start` on a started screen and any buffer or device
// operation on a stopped one fail with a `LifecycleError`. A stopped screen
// can be started again and comes back blank.

use std::collections::VecDeque;
use std::io;
use std::ops::{Deref, DerefMut};

use cellscreen_term::{Cell, CrosstermDevice, Device, Event, FrameBuffer, Key, Size};

use crate::canvas::Canvas;
use crate::config::ScreenConfig;
use crate::error::{Error, LifecycleError, Result};
use crate::listener::{ListenerId, ResizeListeners};
use crate::sheet::Sheet;
use crate::style::{DrawOptions, Resolver};
use crate::wait::{WaitOptions, try_wait_for};

// ─── Frame ──────────────────────────────────────────────────────────────────

/// Buffers that only exist while the screen is started.
#[derive(Debug)]
struct Frame {
    back: FrameBuffer,
    front: FrameBuffer,
    full_redraw: bool,
}

impl Frame {
    fn new(size: Size) -> Self {
        Self {
            back: FrameBuffer::with_size(size),
            front: FrameBuffer::with_size(size),
            full_redraw: true,
        }
    }
}

/// What one flush sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
    /// Cells written to the device.
    pub cells_drawn: usize,
    /// Cells left alone because the device already showed them.
    pub cells_skipped: usize,
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// A double-buffered character grid on top of a [`Device`].
///
/// ```
/// use cellscreen::{DrawOptions, Screen};
/// use cellscreen_term::{HeadlessDevice, Size};
///
/// let mut screen = Screen::new(HeadlessDevice::new(Size::new(12, 2)));
/// screen.run(|screen| {
///     screen.put_string(0, 0, "hello", &DrawOptions::new().fg("green"))?;
///     screen.flush()?;
///     Ok::<_, cellscreen::Error>(())
/// })?;
/// assert_eq!(screen.device().row_text(0).as_deref(), Some("hello       "));
/// # Ok::<(), cellscreen::Error>(())
/// ```
#[derive(Debug)]
pub struct Screen<D: Device> {
    device: D,
    resolver: Resolver,
    wait: WaitOptions,
    frame: Option<Frame>,
    cursor: (u16, u16),
    pending: VecDeque<Key>,
    listeners: ResizeListeners,
}

impl Screen<CrosstermDevice> {
    /// A screen on the process's terminal, configured by `config`.
    #[must_use]
    pub fn crossterm(config: &ScreenConfig) -> Self {
        Self::with_config(CrosstermDevice::new(config.alternate_screen), config)
    }
}

impl<D: Device> Screen<D> {
    /// A stopped screen with default resolution and wait settings.
    pub fn new(device: D) -> Self {
        Self {
            device,
            resolver: Resolver::default(),
            wait: WaitOptions::default(),
            frame: None,
            cursor: (0, 0),
            pending: VecDeque::new(),
            listeners: ResizeListeners::new(),
        }
    }

    /// A stopped screen using `config`'s fallback color and wait settings.
    pub fn with_config(device: D, config: &ScreenConfig) -> Self {
        Self::new(device)
            .with_resolver(config.resolver())
            .with_wait_options(config.wait_options())
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub const fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    pub const fn device(&self) -> &D {
        &self.device
    }

    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Take over the device and allocate blank buffers at its current size.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyStarted`] if the screen is running, or the
    /// device's error if it cannot be entered or sized. A device that was
    /// entered is left again before the error is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.frame.is_some() {
            return Err(LifecycleError::AlreadyStarted.into());
        }
        self.device.enter()?;
        let size = match self.device.size() {
            Ok(size) => size,
            Err(err) => {
                if let Err(leave) = self.device.leave() {
                    tracing::warn!(error = %leave, "leaving device after failed start");
                }
                return Err(err.into());
            }
        };
        self.frame = Some(Frame::new(size));
        self.cursor = (0, 0);
        self.pending.clear();
        tracing::debug!(cols = size.cols, rows = size.rows, "screen started");
        Ok(())
    }

    /// Release the device and discard all buffered cells.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] if the screen is not running, or the
    /// device's error if it cannot be restored. The screen counts as stopped
    /// either way.
    pub fn stop(&mut self) -> Result<()> {
        if self.frame.take().is_none() {
            return Err(LifecycleError::NotStarted.into());
        }
        self.pending.clear();
        self.device.leave()?;
        tracing::debug!("screen stopped");
        Ok(())
    }

    pub const fn is_started(&self) -> bool {
        self.frame.is_some()
    }

    /// Start the screen and return a guard that stops it when dropped.
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start).
    pub fn session(&mut self) -> Result<Session<'_, D>> {
        self.start()?;
        Ok(Session {
            screen: self,
            armed: true,
        })
    }

    /// Start the screen, run `work`, and stop the screen however `work` ends.
    ///
    /// An error from `work` wins over an error from stopping. A panic in
    /// `work` still stops the screen while unwinding.
    ///
    /// # Errors
    ///
    /// Whatever `work` returns, or a start/stop error converted into `E`.
    pub fn run<T, E>(&mut self, work: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<Error>,
    {
        let mut session = self.session()?;
        let outcome = work(&mut *session);
        let stopped = session.finish();
        let value = outcome?;
        stopped?;
        Ok(value)
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    fn frame_mut(&mut self) -> Result<&mut Frame> {
        self.frame
            .as_mut()
            .ok_or(Error::Lifecycle(LifecycleError::NotStarted))
    }

    fn canvas(&mut self) -> Result<Canvas<'_>> {
        let frame = self
            .frame
            .as_mut()
            .ok_or(Error::Lifecycle(LifecycleError::NotStarted))?;
        Ok(Canvas::new(&mut frame.back, &self.resolver))
    }

    /// Buffer one already resolved cell. Returns `false` if it was clipped.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen.
    pub fn put_cell(&mut self, x: u16, y: u16, cell: Cell) -> Result<bool> {
        Ok(self.canvas()?.put_cell(x, y, cell))
    }

    /// Buffer one character.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen.
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, options: &DrawOptions) -> Result<()> {
        self.canvas()?.put_char(x, y, ch, options);
        Ok(())
    }

    /// Buffer `text` left to right from `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen.
    pub fn put_string(&mut self, x: u16, y: u16, text: &str, options: &DrawOptions) -> Result<()> {
        self.canvas()?.put_string(x, y, text, options);
        Ok(())
    }

    /// Buffer a whole sheet with its top-left corner at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen.
    pub fn put_sheet(&mut self, x: u16, y: u16, sheet: &Sheet) -> Result<()> {
        self.canvas()?.put_sheet(x, y, sheet);
        Ok(())
    }

    /// Blank the back buffer. The device changes on the next flush.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen.
    pub fn clear(&mut self) -> Result<()> {
        self.frame_mut()?.back.clear();
        Ok(())
    }

    /// Buffered cell at `(x, y)`, if started and in bounds.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.frame.as_ref()?.back.get(x, y).copied()
    }

    /// Buffered characters of row `y`, if started and in bounds.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.frame.as_ref()?.back.row_text(y)
    }

    // ─── Flush ───────────────────────────────────────────────────────────

    /// Send buffered changes to the device and present them.
    ///
    /// If the device fails partway, what it shows is unknown, so the next
    /// flush repaints every cell.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen, or the device's
    /// error if reading events or drawing fails.
    pub fn flush(&mut self) -> Result<FlushStats> {
        if self.frame.is_none() {
            return Err(LifecycleError::NotStarted.into());
        }
        self.drain_events()?;
        let cursor = self.cursor;
        let Self { device, frame, .. } = self;
        let frame = frame
            .as_mut()
            .ok_or(Error::Lifecycle(LifecycleError::NotStarted))?;
        let full = frame.full_redraw;
        let total = frame.back.total_cells();

        let drawn = match paint(device, frame, cursor) {
            Ok(drawn) => drawn,
            Err(err) => {
                frame.full_redraw = true;
                tracing::debug!(error = %err, "flush failed, next flush repaints");
                return Err(err.into());
            }
        };
        frame.front.copy_from(&frame.back);
        frame.full_redraw = false;

        let stats = FlushStats {
            cells_drawn: drawn,
            cells_skipped: total - drawn,
        };
        tracing::trace!(full, drawn = stats.cells_drawn, skipped = stats.cells_skipped, "flush");
        Ok(stats)
    }

    /// Repaint every cell on the next flush, then flush.
    ///
    /// # Errors
    ///
    /// As [`flush`](Self::flush).
    pub fn redraw(&mut self) -> Result<FlushStats> {
        self.frame_mut()?.full_redraw = true;
        self.flush()
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    /// Current device size.
    ///
    /// # Errors
    ///
    /// The device's error if the size cannot be queried.
    pub fn size(&mut self) -> Result<Size> {
        Ok(self.device.size()?)
    }

    /// Where the device's cursor currently sits.
    ///
    /// The answer also becomes the position flushes restore, so a cursor
    /// moved on the device directly stays put.
    ///
    /// # Errors
    ///
    /// The device's error if the position cannot be queried.
    pub fn get_cursor(&mut self) -> Result<(u16, u16)> {
        self.cursor = self.device.cursor_position()?;
        Ok(self.cursor)
    }

    /// Move the visible cursor now. Flushes leave it in the same place.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen, or the device's
    /// error if output fails.
    pub fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        if self.frame.is_none() {
            return Err(LifecycleError::NotStarted.into());
        }
        self.device.set_cursor(x, y)?;
        self.device.present()?;
        self.cursor = (x, y);
        Ok(())
    }

    /// Register a callback for viewport size changes.
    pub fn add_resize_listener(&mut self, callback: impl FnMut(Size) + 'static) -> ListenerId {
        let id = self.listeners.add(callback);
        tracing::debug!(?id, "resize listener added");
        id
    }

    /// Deregister a resize callback. Returns `false` if `id` is unknown.
    pub fn remove_resize_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        tracing::debug!(?id, removed, "resize listener removed");
        removed
    }

    fn handle_resize(&mut self, size: Size) {
        if let Some(frame) = self.frame.as_mut() {
            frame.back.resize(size.cols, size.rows);
            frame.full_redraw = true;
        }
        tracing::debug!(cols = size.cols, rows = size.rows, "viewport resized");
        self.listeners.notify(size);
    }

    /// Read every pending device event, queueing keys.
    fn drain_events(&mut self) -> Result<()> {
        while let Some(event) = self.device.read_event()? {
            match event {
                Event::Key(key) => self.pending.push_back(key),
                Event::Resize(size) => self.handle_resize(size),
            }
        }
        Ok(())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Next key press, or `None` if none is waiting. Never blocks.
    ///
    /// Resize events met on the way are handled before returning.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotStarted`] on a stopped screen, or the device's
    /// error if reading input fails.
    pub fn poll_key(&mut self) -> Result<Option<Key>> {
        if self.frame.is_none() {
            return Err(LifecycleError::NotStarted.into());
        }
        if let Some(key) = self.pending.pop_front() {
            return Ok(Some(key));
        }
        loop {
            match self.device.read_event()? {
                None => return Ok(None),
                Some(Event::Key(key)) => return Ok(Some(key)),
                Some(Event::Resize(size)) => self.handle_resize(size),
            }
        }
    }

    /// Poll for a key every `options.interval` until one arrives or
    /// `options.timeout` passes.
    ///
    /// # Errors
    ///
    /// As [`poll_key`](Self::poll_key).
    pub fn wait_key(&mut self, options: WaitOptions) -> Result<Option<Key>> {
        try_wait_for(options, || self.poll_key())
    }

    /// [`wait_key`](Self::wait_key) with the screen's configured options.
    ///
    /// # Errors
    ///
    /// As [`poll_key`](Self::poll_key).
    pub fn wait_key_default(&mut self) -> Result<Option<Key>> {
        self.wait_key(self.wait)
    }
}

/// Draw `frame` onto `device` and present it, returning the cells sent.
fn paint<D: Device>(device: &mut D, frame: &Frame, (x, y): (u16, u16)) -> io::Result<usize> {
    let mut drawn = 0;
    if frame.full_redraw {
        device.clear()?;
        for (cx, cy, cell) in frame.back.iter() {
            device.draw_cell(cx, cy, cell)?;
            drawn += 1;
        }
    } else {
        for (cx, cy, cell) in frame.back.changes(&frame.front) {
            device.draw_cell(cx, cy, cell)?;
            drawn += 1;
        }
    }
    device.set_cursor(x, y)?;
    device.present()?;
    Ok(drawn)
}

// ─── Session ────────────────────────────────────────────────────────────────

/// A started screen that stops itself when dropped.
///
/// Dereferences to the [`Screen`]. Use [`finish`](Session::finish) to see
/// the error from stopping; dropping logs it instead.
#[derive(Debug)]
pub struct Session<'a, D: Device> {
    screen: &'a mut Screen<D>,
    armed: bool,
}

impl<D: Device> Session<'_, D> {
    /// Stop the screen now.
    ///
    /// Succeeds without doing anything if the screen was already stopped
    /// inside the session.
    ///
    /// # Errors
    ///
    /// The device's error if it cannot be restored.
    pub fn finish(mut self) -> Result<()> {
        self.armed = false;
        if self.screen.is_started() {
            self.screen.stop()
        } else {
            Ok(())
        }
    }
}

impl<D: Device> Deref for Session<'_, D> {
    type Target = Screen<D>;

    fn deref(&self) -> &Screen<D> {
        &*self.screen
    }
}

impl<D: Device> DerefMut for Session<'_, D> {
    fn deref_mut(&mut self) -> &mut Screen<D> {
        &mut *self.screen
    }
}

impl<D: Device> Drop for Session<'_, D> {
    fn drop(&mut self) {
        if self.armed && self.screen.is_started() {
            if let Err(err) = self.screen.stop() {
                tracing::warn!(error = %err, "stopping screen on session drop");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
