use log::{debug, error, info};
use ssh2::{Channel, Session};
use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::connections::connection::Connection;
use crate::connections::errors::ConnectionError;

/// A blocking SSH connection using the ssh2 library.
///
/// Without a password the session authenticates through the running SSH agent.
pub struct SshConnection {
    pub host: String,
    pub port: u16,
    pub username: String,
    password: Option<String>,
    inner: Option<Channel>,
    session: Option<Session>,
}

impl SshConnection {
    pub fn new(host: String, port: u16, username: String, password: Option<String>) -> Self {
        SshConnection {
            host,
            port,
            username,
            password,
            inner: None,
            session: None,
        }
    }

    fn authenticate(&self, session: &Session) -> Result<(), ConnectionError> {
        match &self.password {
            Some(password) => session
                .userauth_password(&self.username, password)
                .map_err(|e| ConnectionError::SshError(format!("Authentication error: {}", e)))?,
            None => {
                debug!("No password given, trying the SSH agent for '{}'", self.username);
                session
                    .userauth_agent(&self.username)
                    .map_err(|e| ConnectionError::SshError(format!("Agent authentication error: {}", e)))?
            }
        }

        if !session.authenticated() {
            return Err(ConnectionError::SshError("SSH authentication failed".into()));
        }
        Ok(())
    }
}

impl Connection for SshConnection {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        let address = format!("{}:{}", self.host, self.port);
        info!("Connecting to SSH server at {}", address);

        let tcp = TcpStream::connect(&address)?;
        tcp.set_read_timeout(Some(Duration::from_millis(500)))?;
        tcp.set_write_timeout(Some(Duration::from_millis(500)))?;

        let mut session = Session::new()
            .map_err(|e| ConnectionError::SshError(format!("Failed to create SSH session: {}", e)))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| ConnectionError::SshError(format!("Handshake error: {}", e)))?;
        self.authenticate(&session)?;

        // Create the channel while still in blocking mode.
        let mut channel = session
            .channel_session()
            .map_err(|e| ConnectionError::SshError(format!("Channel session error: {}", e)))?;
        channel
            .request_pty("xterm", None, Some((80, 24, 0, 0)))
            .map_err(|e| ConnectionError::SshError(format!("Request pty error: {}", e)))?;
        channel
            .shell()
            .map_err(|e| ConnectionError::SshError(format!("Shell error: {}", e)))?;

        session.set_blocking(false);

        self.inner = Some(channel);
        self.session = Some(session);
        info!("SSH connection established and shell channel opened.");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        if let Some(session) = &self.session {
            session.set_blocking(true);
        }
        if let Some(mut channel) = self.inner.take() {
            channel
                .close()
                .map_err(|e| ConnectionError::SshError(format!("Close channel error: {}", e)))?;
            channel
                .wait_close()
                .map_err(|e| ConnectionError::SshError(format!("Wait close error: {}", e)))?;
            info!("SSH channel closed.");
        }
        self.session = None;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError> {
        let Some(channel) = self.inner.as_mut() else {
            error!("SSH connection not established!");
            return Err(ConnectionError::Other("Not connected".into()));
        };

        let mut written = 0;
        while written < data.len() {
            match channel.write(&data[written..]) {
                Ok(n) => written += n,
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(2));
                }
                Err(e) => return Err(ConnectionError::Other(format!("Write error: {}", e))),
            }
        }
        loop {
            match channel.flush() {
                Ok(()) => break,
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(2));
                }
                Err(e) => return Err(ConnectionError::Other(format!("Flush error: {}", e))),
            }
        }
        debug!("Wrote {} bytes to ssh server", written);
        Ok(written)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, ConnectionError> {
        let Some(channel) = self.inner.as_mut() else {
            error!("SSH connection not established!");
            return Err(ConnectionError::Other("Not connected".into()));
        };

        match channel.read(buffer) {
            Ok(0) if channel.eof() => {
                info!("SSH channel reached EOF.");
                Err(ConnectionError::Other("Connection closed by peer".into()))
            }
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock && channel.eof() => {
                Err(ConnectionError::Other("Connection closed by peer".into()))
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(ConnectionError::Other(format!("Read error: {}", e))),
        }
    }
}
