// SPDX-License-Identifier: MIT
//
// cellscreen-term — the device layer underneath cellscreen.
//
// Everything the drawing model treats as "given" lives here: the cell and
// its canonical color and style representations, the fixed name tables
// those are looked up in, the frame buffer grid, canonical key events, and
// the `Device` trait with two implementations:
//
//   CrosstermDevice → a real terminal (raw mode, alternate screen, input)
//   HeadlessDevice  → an in-memory terminal for tests and embedding
//
// The drawing model on top never emits escape sequences itself. It writes
// cells into buffers and hands changed cells to a device.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod device;
pub mod headless;
pub mod key;
pub mod terminal;

pub use buffer::FrameBuffer;
pub use cell::{Cell, StyleSet};
pub use color::CellColor;
pub use device::{Device, Event, Size};
pub use headless::{DeviceOp, HeadlessDevice};
pub use key::{Key, KeyCode, Modifiers};
pub use terminal::CrosstermDevice;
