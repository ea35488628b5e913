// SPDX-License-Identifier: MIT
//
// CrosstermDevice — a real terminal behind the `Device` trait.
//
// Raw mode, the alternate screen, escape sequence generation and input
// decoding are all delegated to crossterm. What this module adds:
//
//   - Pen tracking. The device remembers where the terminal cursor is and
//     which colors/styles are active, so drawing a run of same-styled
//     adjacent cells emits only the characters, with no cursor moves or SGR.
//
//   - Event translation. crossterm key and resize events become canonical
//     `Event`s; releases, mouse, focus and paste events are dropped.
//
//   - RAII restore. Dropping an entered device leaves raw mode and the
//     alternate screen. A panic hook (installed once per process) does the
//     same before the panic message prints, so the message is readable.

use std::io::{self, Stdout, Write};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ::crossterm::event::{self as ct_event, KeyEventKind, KeyModifiers};
use ::crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use ::crossterm::terminal::{self as ct_terminal, ClearType};
use ::crossterm::{cursor, execute, queue};

use crate::buffer::char_width;
use crate::cell::{Cell, StyleSet};
use crate::color::CellColor;
use crate::device::{Device, Event, Size};
use crate::key::{Key, KeyCode, Modifiers};

/// Size reported when the terminal cannot be queried (pipes, CI).
const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

/// Style flag → SGR attribute, applied after a reset.
const STYLE_ATTRIBUTES: [(StyleSet, Attribute); 8] = [
    (StyleSet::BOLD, Attribute::Bold),
    (StyleSet::DIM, Attribute::Dim),
    (StyleSet::ITALIC, Attribute::Italic),
    (StyleSet::UNDERLINE, Attribute::Underlined),
    (StyleSet::BLINK, Attribute::SlowBlink),
    (StyleSet::REVERSE, Attribute::Reverse),
    (StyleSet::HIDDEN, Attribute::Hidden),
    (StyleSet::STRIKETHROUGH, Attribute::CrossedOut),
];

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Set while some device is in raw mode; read by the panic hook.
static RAW_ACTIVE: AtomicBool = AtomicBool::new(false);

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if RAW_ACTIVE.swap(false, Ordering::SeqCst) {
                let _ = execute!(
                    io::stdout(),
                    SetAttribute(Attribute::Reset),
                    ResetColor,
                    cursor::Show,
                    ct_terminal::LeaveAlternateScreen
                );
                let _ = ct_terminal::disable_raw_mode();
            }
            original(info);
        }));
    });
}

// ─── Pen ────────────────────────────────────────────────────────────────────

/// What the terminal is known to be doing right now.
///
/// `None` means unknown; the next draw re-emits that piece of state.
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    cursor: Option<(u16, u16)>,
    style: Option<Cell>,
}

// ─── CrosstermDevice ────────────────────────────────────────────────────────

/// A terminal device driven by crossterm.
///
/// Output goes to `W` (stdout by default). Input always comes from the
/// process's controlling terminal.
///
/// # Example
///
/// ```no_run
/// use cellscreen_term::cell::Cell;
/// use cellscreen_term::device::Device;
/// use cellscreen_term::terminal::CrosstermDevice;
///
/// let mut device = CrosstermDevice::new(true);
/// device.enter()?;
/// device.draw_cell(0, 0, &Cell::new('@'))?;
/// device.present()?;
/// device.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CrosstermDevice<W: Write = Stdout> {
    out: W,
    alternate_screen: bool,
    active: bool,
    pen: Pen,
    /// Last `set_cursor` target. Drawing moves the real cursor, but the
    /// screen always puts it back here before presenting.
    placed: (u16, u16),
}

impl CrosstermDevice<Stdout> {
    /// A device writing to stdout.
    #[must_use]
    pub fn new(alternate_screen: bool) -> Self {
        Self::with_writer(io::stdout(), alternate_screen)
    }
}

impl<W: Write> CrosstermDevice<W> {
    /// A device writing to an arbitrary sink.
    pub fn with_writer(out: W, alternate_screen: bool) -> Self {
        Self {
            out,
            alternate_screen,
            active: false,
            pen: Pen::default(),
            placed: (0, 0),
        }
    }

    /// Whether the device is in drawing mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The output sink.
    #[inline]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// `enter` with the raw-mode switch supplied by the caller.
    ///
    /// Once raw mode is on the device counts as active, so a failure while
    /// writing the setup sequence is undone by `leave` before returning.
    fn enter_with(&mut self, enable_raw: fn() -> io::Result<()>) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();

        enable_raw()?;
        RAW_ACTIVE.store(true, Ordering::SeqCst);
        self.active = true;
        self.pen = Pen::default();
        self.placed = (0, 0);

        if let Err(err) = self.write_setup() {
            tracing::warn!(error = %err, "terminal setup failed");
            if let Err(leave) = self.leave() {
                tracing::warn!(error = %leave, "restoring terminal after failed setup");
            }
            return Err(err);
        }
        tracing::debug!(alternate_screen = self.alternate_screen, "terminal entered");
        Ok(())
    }

    fn write_setup(&mut self) -> io::Result<()> {
        if self.alternate_screen {
            queue!(self.out, ct_terminal::EnterAlternateScreen)?;
        }
        queue!(
            self.out,
            ct_terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        self.out.flush()
    }

    fn write_restore(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show
        )?;
        if self.alternate_screen {
            queue!(self.out, ct_terminal::LeaveAlternateScreen)?;
        }
        self.out.flush()
    }

    fn write_style(&mut self, cell: &Cell) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_crossterm_color(cell.fg)),
            SetBackgroundColor(to_crossterm_color(cell.bg))
        )?;
        for (flag, attribute) in STYLE_ATTRIBUTES {
            if cell.styles.contains(flag) {
                queue!(self.out, SetAttribute(attribute))?;
            }
        }
        self.pen.style = Some(*cell);
        Ok(())
    }
}

impl<W: Write> Device for CrosstermDevice<W> {
    fn enter(&mut self) -> io::Result<()> {
        self.enter_with(ct_terminal::enable_raw_mode)
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        // Raw mode is dropped even when the restore sequence cannot be
        // written, so the shell gets a usable terminal back.
        let restored = self.write_restore();
        let raw = ct_terminal::disable_raw_mode();
        RAW_ACTIVE.store(false, Ordering::SeqCst);

        self.active = false;
        tracing::debug!("terminal left");
        restored.and(raw)
    }

    fn size(&mut self) -> io::Result<Size> {
        Ok(ct_terminal::size().map_or(FALLBACK_SIZE, |(cols, rows)| Size { cols, rows }))
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        while ct_event::poll(Duration::ZERO)? {
            let raw = ct_event::read()?;
            if let Some(event) = translate_event(&raw) {
                return Ok(Some(event));
            }
            tracing::trace!(?raw, "dropped terminal event");
        }
        Ok(None)
    }

    fn draw_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.pen.cursor != Some((x, y)) {
            queue!(self.out, cursor::MoveTo(x, y))?;
        }
        if !self.pen.style.is_some_and(|pen| pen.same_style(cell)) {
            self.write_style(cell)?;
        }

        // Control characters would move the terminal cursor on their own.
        let ch = if cell.ch.is_control() { ' ' } else { cell.ch };
        queue!(self.out, Print(ch))?;

        // Width is 0, 1 or 2.
        #[allow(clippy::cast_possible_truncation)]
        let advance = char_width(ch) as u16;
        self.pen.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            ct_terminal::Clear(ClearType::All)
        )?;
        self.pen = Pen::default();
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(x, y))?;
        self.pen.cursor = Some((x, y));
        self.placed = (x, y);
        Ok(())
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        Ok(self.placed)
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for CrosstermDevice<W> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Translation ────────────────────────────────────────────────────────────

const fn to_crossterm_color(color: CellColor) -> Color {
    match color {
        CellColor::Default => Color::Reset,
        CellColor::Indexed(idx) => Color::AnsiValue(idx),
        CellColor::Rgb(r, g, b) => Color::Rgb { r, g, b },
    }
}

/// Translate a crossterm event into a canonical [`Event`].
///
/// Returns `None` for events the screen has no use for (key releases,
/// mouse, focus, paste) and for keys with no canonical code.
#[must_use]
pub fn translate_event(event: &ct_event::Event) -> Option<Event> {
    match event {
        ct_event::Event::Key(key) if key.kind != KeyEventKind::Release => {
            translate_key(key).map(Event::Key)
        }
        ct_event::Event::Resize(cols, rows) => Some(Event::Resize(Size::new(*cols, *rows))),
        _ => None,
    }
}

/// Translate a crossterm key event into a canonical [`Key`].
///
/// Shift is dropped for character keys (the character already carries its
/// case) and for back-tab (which implies it).
#[must_use]
pub fn translate_key(key: &ct_event::KeyEvent) -> Option<Key> {
    use ct_event::KeyCode as Ct;

    let code = match key.code {
        Ct::Char(ch) => KeyCode::Char(ch),
        Ct::Enter => KeyCode::Enter,
        Ct::Esc => KeyCode::Escape,
        Ct::Backspace => KeyCode::Backspace,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Insert => KeyCode::Insert,
        Ct::Delete => KeyCode::Delete,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Home => KeyCode::Home,
        Ct::End => KeyCode::End,
        Ct::PageUp => KeyCode::PageUp,
        Ct::PageDown => KeyCode::PageDown,
        Ct::F(n @ 1..=24) => KeyCode::F(n),
        _ => return None,
    };

    let mut modifiers = Modifiers::empty();
    for (ct, flag) in [
        (KeyModifiers::SHIFT, Modifiers::SHIFT),
        (KeyModifiers::ALT, Modifiers::ALT),
        (KeyModifiers::CONTROL, Modifiers::CTRL),
        (KeyModifiers::SUPER, Modifiers::SUPER),
    ] {
        if key.modifiers.contains(ct) {
            modifiers.insert(flag);
        }
    }
    if matches!(code, KeyCode::Char(_) | KeyCode::BackTab) {
        modifiers.remove(Modifiers::SHIFT);
    }

    Some(Key { code, modifiers })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
