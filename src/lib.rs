// SPDX-License-Identifier: MIT
//
// cellscreen — a double-buffered character-grid screen.
//
// Client code writes styled text into a buffer and flushes it to a terminal
// when a frame is ready. The pieces, leaves first:
//
//   style    → color specs, draw options, and their resolution to cells
//   sheet    → 2-D blocks of mixed plain and styled items
//   canvas   → cell, text and sheet writers over any frame buffer
//   wait     → timed retry of a non-blocking poll
//   listener → resize callbacks addressed by handle
//   config   → TOML configuration
//   screen   → lifecycle, flush, viewport, key input
//
// Drawing flows:
//
//   put_string / put_sheet → canvas → back buffer
//   flush → changed cells → Device (cellscreen-term) → terminal
//
// Input flows the other way: Device::read_event → poll_key, or wait_key
// around it.

pub mod canvas;
pub mod config;
pub mod error;
pub mod listener;
pub mod screen;
pub mod sheet;
pub mod style;
pub mod wait;

pub use cellscreen_term as term;
pub use cellscreen_term::{
    Cell, CellColor, CrosstermDevice, Device, HeadlessDevice, Key, KeyCode, Modifiers, Size,
    StyleSet,
};

pub use canvas::Canvas;
pub use config::ScreenConfig;
pub use error::{Error, LifecycleError, Result};
pub use listener::ListenerId;
pub use screen::{FlushStats, Screen, Session};
pub use sheet::{Content, Item, Row, Sheet};
pub use style::{ColorSpec, DrawOptions, Pen, Resolver};
pub use wait::{WaitOptions, try_wait_for, wait_for};
