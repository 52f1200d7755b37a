use log::info;
use std::sync::Arc;

use remote_connect::utils::logging::init_logging;
use remote_connect::{get_connection, ConnectionError};

/// Opens the connection and shows that a second lookup returns the cached handle.
fn run() -> Result<(), ConnectionError> {
    let first = get_connection()?;
    let second = get_connection()?;
    let same = Arc::ptr_eq(&first, &second);
    info!("Second call returned the cached connection: {}", same);
    println!("connected (cached: {})", same);
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("remote-info error: {}", e);
        std::process::exit(1);
    }
}
