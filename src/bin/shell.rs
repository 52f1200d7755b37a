use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::info;
use std::io::{self, Read, Write};

use remote_connect::core::keys::{EscapeFilter, KeyAction};
use remote_connect::core::session::Session;
use remote_connect::utils::logging::init_logging;
use remote_connect::{get_connection, ConnectionError};

/// Enable raw mode via crossterm, throwing an error if it fails.
/// This disables line-buffering and echo on all supported platforms.
fn set_raw_mode() -> Result<(), ConnectionError> {
    enable_raw_mode()
        .map_err(|e| ConnectionError::Other(format!("Failed to enable raw mode: {}", e)))
}

/// Restore normal terminal mode.
/// crossterm internally remembers the previous mode and restores it.
fn restore_mode() {
    let _ = disable_raw_mode();
}

/// Forwards keystrokes to the connection until Ctrl+A then 'x'.
fn run() -> Result<(), ConnectionError> {
    let connection = get_connection()?;

    let mut session = Session::new(connection, |byte| {
        let mut out = io::stdout();
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    });
    session.start();

    info!("Enable raw mode. Press Ctrl+A then 'x' to exit the program.");
    set_raw_mode()?;

    let mut filter = EscapeFilter::new();
    let mut buf = [0u8; 1];
    let mut stdin = io::stdin();
    let result = loop {
        match stdin.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
        match filter.feed(buf[0]) {
            KeyAction::Pending => continue,
            KeyAction::Exit => break Ok(()),
            KeyAction::Send(bytes) => {
                if let Err(e) = session.write_bytes(&bytes) {
                    break Err(e);
                }
            }
        }
    };

    restore_mode();
    session.stop();
    info!("Terminal mode restored.");
    result
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("remote-shell error: {}", e);
        std::process::exit(1);
    }
}
