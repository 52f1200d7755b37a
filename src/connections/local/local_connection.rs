use log::{debug, error, info};
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::connections::connection::Connection;
use crate::connections::errors::ConnectionError;

pub const DEFAULT_SHELL: &str = "sh";

/// A shell subprocess on this machine, driven through its stdin and stdout.
///
/// Two pump threads forward stdout and stderr chunks into one channel so reads
/// never block longer than the receive timeout.
pub struct LocalConnection {
    shell: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    read_rx: Option<Receiver<Vec<u8>>>,
    leftovers: VecDeque<u8>,
    pumps: Vec<thread::JoinHandle<()>>,
}

impl LocalConnection {
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        LocalConnection {
            shell: shell.into(),
            child: None,
            stdin: None,
            read_rx: None,
            leftovers: VecDeque::new(),
            pumps: Vec::new(),
        }
    }
}

impl Default for LocalConnection {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_pump(
    name: &'static str,
    mut source: impl Read + Send + 'static,
    tx: Sender<Vec<u8>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 1024];
        loop {
            match source.read(&mut buf) {
                Ok(0) => {
                    debug!("Local shell {} closed", name);
                    break;
                }
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break; // receiver gone
                    }
                }
                Err(e) => {
                    error!("Local shell {} read error: {}", name, e);
                    break;
                }
            }
        }
    })
}

impl Connection for LocalConnection {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        info!("Spawning local shell '{}'", self.shell);
        let mut child = Command::new(&self.shell)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(stdout), Some(stderr)) = (stdin, stdout, stderr) else {
            let _ = child.kill();
            return Err(ConnectionError::Other("Local shell pipes unavailable".into()));
        };

        let (read_tx, read_rx) = mpsc::channel::<Vec<u8>>();
        self.pumps = vec![
            spawn_pump("stdout", stdout, read_tx.clone()),
            spawn_pump("stderr", stderr, read_tx),
        ];
        self.stdin = Some(stdin);
        self.read_rx = Some(read_rx);
        self.child = Some(child);
        info!("Local shell started.");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        // Closing stdin lets a well-behaved shell exit on its own.
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                thread::sleep(Duration::from_millis(50));
                if child.try_wait()?.is_none() {
                    let _ = child.kill();
                }
            }
            let status = child.wait()?;
            info!("Local shell exited with {}", status);
        }
        for pump in self.pumps.drain(..) {
            let _ = pump.join();
        }
        self.read_rx = None;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError> {
        let Some(stdin) = self.stdin.as_mut() else {
            error!("Local shell not started!");
            return Err(ConnectionError::Other("Not connected".into()));
        };
        stdin.write_all(data)?;
        stdin.flush()?;
        debug!("Wrote {} bytes to local shell", data.len());
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, ConnectionError> {
        // serve leftovers first
        if !self.leftovers.is_empty() {
            let n = std::cmp::min(buffer.len(), self.leftovers.len());
            for (dst, src) in buffer.iter_mut().take(n).zip(self.leftovers.drain(..n)) {
                *dst = src;
            }
            return Ok(n);
        }

        let Some(rx) = self.read_rx.as_ref() else {
            error!("Local shell not started!");
            return Err(ConnectionError::Other("Not connected".into()));
        };
        match rx.recv_timeout(Duration::from_millis(500)) {
            Ok(mut chunk) => {
                let n = std::cmp::min(buffer.len(), chunk.len());
                buffer[..n].copy_from_slice(&chunk[..n]);
                if chunk.len() > n {
                    self.leftovers.extend(chunk.split_off(n));
                }
                Ok(n)
            }
            Err(RecvTimeoutError::Timeout) => Ok(0),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ConnectionError::Other("Local shell closed".into()))
            }
        }
    }
}
