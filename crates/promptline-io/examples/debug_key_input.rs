//! Key Input Debug Example
//!
//! Prints every decoded keypress with its raw bytes and the action it maps to.
//!
//! Usage: cargo run -p promptline-io --example debug_key_input
//! Press Ctrl+C to exit.

use promptline_core::{decode, Key};
use promptline_io::{create_console_io, ConsoleResult};
use std::sync::mpsc;

/// Format raw bytes for display
fn format_bytes(bytes: &[u8]) -> String {
    let hex: String = bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");

    let ascii: String = bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect();

    format!("[{hex}] \"{ascii}\"")
}

fn main() -> ConsoleResult<()> {
    promptline_io::debug::init();

    let (input, output) = create_console_io()?;
    let _raw_guard = input.enable_raw_mode()?;

    output.write_text("Press keys to inspect them. Ctrl+C exits.\r\n")?;
    output.flush()?;

    let (tx, rx) = mpsc::channel();
    input.on_key_pressed(Box::new(move |event| {
        let _ = tx.send(event);
    }));
    input.start_event_loop()?;

    for event in rx {
        let line = format!(
            "Key: {:<10} ctrl={} meta={} shift={} | Raw: {} | Action: {:?}\r\n",
            event.name(),
            event.ctrl,
            event.meta,
            event.shift,
            format_bytes(&event.raw),
            decode(&event),
        );
        output.write_text(&line)?;
        output.flush()?;

        if event.ctrl && event.key == Key::Char('c') {
            break;
        }
    }

    input.remove_key_listener();
    input.stop_event_loop()?;
    Ok(())
}
