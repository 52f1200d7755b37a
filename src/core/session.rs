use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::connections::errors::ConnectionError;
use crate::core::context::SharedConnection;
use log::{debug, error};

/// A struct that represents a running session over a shared connection:
/// - Spawns a background thread to read from the connection
/// - Invokes a user-provided callback for each byte read
/// - Exposes `write_bytes` for sending data, and `stop` to end the reader
///
/// The connection stays open after `stop`; whoever cached it owns it.
pub struct Session {
    connection: SharedConnection,
    stop_flag: Arc<AtomicBool>,
    reader_thread: Option<thread::JoinHandle<()>>,

    // A callback used for new bytes
    on_byte: Arc<Mutex<dyn FnMut(u8) + Send>>,
}

impl Session {
    /// Create (but not start) a Session. `on_byte` is a closure that will run for each byte read.
    pub fn new(connection: SharedConnection, on_byte: impl FnMut(u8) + Send + 'static) -> Self {
        Self {
            connection,
            stop_flag: Arc::new(AtomicBool::new(false)),
            reader_thread: None,
            on_byte: Arc::new(Mutex::new(on_byte)),
        }
    }

    /// Start the background thread to read from the connection.
    /// Calling it again after `stop`, or after the reader ended on an error, starts a new reader.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        if let Some(handle) = self.reader_thread.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::SeqCst);
        let stop_clone = self.stop_flag.clone();
        let conn_clone = self.connection.clone();
        let callback_clone = self.on_byte.clone();

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 256];
            while !stop_clone.load(Ordering::SeqCst) {
                let result = {
                    let mut conn = conn_clone.lock().unwrap_or_else(PoisonError::into_inner);
                    conn.read(&mut buf)
                };
                match result {
                    Ok(0) => {
                        // no data
                    }
                    Ok(n) => {
                        debug!("Ok(n): {} bytes arrived", n);
                        let mut cb = callback_clone.lock().unwrap_or_else(PoisonError::into_inner);
                        for &byte in &buf[..n] {
                            cb(byte);
                        }
                    }
                    Err(e) => {
                        error!("Read error, stopping reader: {}", e);
                        break;
                    }
                }
                // Give writers a chance at the lock.
                thread::sleep(Duration::from_millis(1));
            }
            debug!("Reader thread stopped.");
        });
        self.reader_thread = Some(handle);
    }

    pub fn is_running(&self) -> bool {
        self.reader_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Write data to the connection.
    pub fn write_bytes(&self, data: &[u8]) -> Result<usize, ConnectionError> {
        let mut conn = self.connection.lock().unwrap_or_else(PoisonError::into_inner);
        conn.write(data)
    }

    /// Stop the reader thread and wait for it.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
