// SPDX-License-Identifier: MIT
//
// cellscreen demo — a key viewer drawn with sheets.
//
// Draws a small styled panel, then echoes every key press until `q` or
// Escape. Resize the terminal to see the listener fire. Reads an optional
// TOML config from the first argument.
//
// Usage:
//   cargo run --example demo [config.toml]

use std::cell::Cell as Flag;
use std::env;
use std::rc::Rc;

use cellscreen::{DrawOptions, Item, KeyCode, Screen, ScreenConfig, Sheet, Size};

fn banner() -> Sheet {
    Sheet::new()
        .row(vec![
            Item::styled(
                " cellscreen ",
                DrawOptions::new().fg("black").bg("cyan").style("bold"),
            ),
            Item::from(' '),
            Item::styled("demo", DrawOptions::new().fg("bright-yellow")),
        ])
        .row("")
        .row(vec![
            Item::from("press "),
            Item::styled('q', DrawOptions::new().fg("red").style("underline")),
            Item::from(" or "),
            Item::styled("esc", DrawOptions::new().fg("red").style("underline")),
            Item::from(" to quit"),
        ])
}

fn main() -> cellscreen::Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => ScreenConfig::load(path)?,
        None => ScreenConfig::default(),
    };

    let mut screen = Screen::crossterm(&config);
    let resized = Rc::new(Flag::new(None::<Size>));
    let sink = Rc::clone(&resized);
    screen.add_resize_listener(move |size| sink.set(Some(size)));

    screen.run(|screen| {
        let mut count = 0u32;
        let mut last = String::from("(none yet)");
        loop {
            let size = screen.size()?;
            screen.clear()?;
            screen.put_sheet(2, 1, &banner())?;
            let status = format!("keys: {count}   last: {last}");
            screen.put_string(2, 5, &status, &DrawOptions::new())?;
            if let Some(size) = resized.get() {
                let note = format!("resized to {}x{}", size.cols, size.rows);
                screen.put_string(2, 6, &note, &DrawOptions::new().fg("#244"))?;
            }
            let footer = format!("{}x{}", size.cols, size.rows);
            let bottom = size.rows.saturating_sub(1);
            screen.put_string(2, bottom, &footer, &DrawOptions::new().style("dim"))?;
            screen.flush()?;

            let Some(key) = screen.wait_key_default()? else {
                continue;
            };
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Escape) {
                return Ok(());
            }
            count += 1;
            last = key.to_string();
        }
    })
}
