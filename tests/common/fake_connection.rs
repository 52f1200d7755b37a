//! A deterministic **in-process stand-in** for any type that implements
//! `remote_connect::connections::connection::Connection`, plus a connector
//! that hands it out and counts how often it was asked.
//!
//! * Push "incoming" data into the connection with `test_to_fake_tx.send(bytes)`.
//! * Receive everything written to it on `fake_to_test_rx`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use remote_connect::connections::{Connection, ConnectionError};
use remote_connect::Connector;

pub struct FakeConnection {
    /// Bytes *pushed by the test* → appear as data read from the remote.
    test_to_fake_rx: Receiver<Vec<u8>>,
    /// Bytes written through the connection → sent back to the test.
    fake_to_test_tx: Sender<Vec<u8>>,

    pub connected: bool,
    pub disconnected: bool,
}

impl FakeConnection {
    /// Returns the fake plus the two helper channel ends:
    /// `test_to_fake_tx` (simulated remote input) and `fake_to_test_rx` (observed writes).
    pub fn new() -> (Self, Sender<Vec<u8>>, Receiver<Vec<u8>>) {
        let (test_to_fake_tx, test_to_fake_rx) = mpsc::channel();
        let (fake_to_test_tx, fake_to_test_rx) = mpsc::channel();

        (
            Self {
                test_to_fake_rx,
                fake_to_test_tx,
                connected: false,
                disconnected: false,
            },
            test_to_fake_tx,
            fake_to_test_rx,
        )
    }
}

impl Connection for FakeConnection {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        self.disconnected = true;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError> {
        let _ = self.fake_to_test_tx.send(data.to_vec());
        Ok(data.len())
    }

    fn read(&mut self, destination_buffer: &mut [u8]) -> Result<usize, ConnectionError> {
        match self.test_to_fake_rx.recv_timeout(Duration::from_millis(20)) {
            Ok(incoming_chunk) => {
                // Tests keep chunks smaller than the reader's buffer.
                let n = incoming_chunk.len().min(destination_buffer.len());
                destination_buffer[..n].copy_from_slice(&incoming_chunk[..n]);
                Ok(n)
            }
            Err(RecvTimeoutError::Timeout) => Ok(0),
            Err(RecvTimeoutError::Disconnected) => Err(ConnectionError::Other(
                "test cancelled the channel; no more data".into(),
            )),
        }
    }
}

/// What the connector saw on each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectCall {
    pub target: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Hands out a fresh `FakeConnection` per call, or fails every call when `failing`.
#[derive(Clone, Default)]
pub struct CountingConnector {
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<ConnectCall>>>,
    pub failing: bool,
}

impl CountingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Connector for CountingConnector {
    fn connect(
        &self,
        target: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection + Send>, ConnectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(ConnectCall {
            target: target.to_string(),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        });
        if self.failing {
            return Err(ConnectionError::Other(format!("refused: {}", target)));
        }
        let (mut conn, ..) = FakeConnection::new();
        conn.connect()?;
        Ok(Box::new(conn))
    }
}
