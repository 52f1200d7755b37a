use log::{debug, error, info};
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::connections::connection::Connection;
use crate::connections::errors::ConnectionError;

/// A plain TCP byte stream.
pub struct TcpConnection {
    pub host: String,
    pub port: u16,
    stream: Option<TcpStream>,
}

impl TcpConnection {
    pub fn new(host: String, port: u16) -> Self {
        TcpConnection {
            host,
            port,
            stream: None,
        }
    }
}

impl Connection for TcpConnection {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        let address = format!("{}:{}", self.host, self.port);
        info!("Connecting to TCP endpoint at {}", address);

        let stream = TcpStream::connect(&address)?;
        stream.set_read_timeout(Some(Duration::from_millis(500)))?;
        stream.set_write_timeout(Some(Duration::from_millis(500)))?;
        stream.set_nodelay(true)?;

        self.stream = Some(stream);
        info!("TCP connection established.");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        if let Some(stream) = self.stream.take() {
            match stream.shutdown(Shutdown::Both) {
                Ok(()) => info!("TCP connection closed."),
                // Peer already gone.
                Err(ref e) if e.kind() == ErrorKind::NotConnected => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError> {
        let Some(stream) = self.stream.as_mut() else {
            error!("TCP connection not established!");
            return Err(ConnectionError::Other("Not connected".into()));
        };
        stream.write_all(data)?;
        stream.flush()?;
        debug!("Wrote {} bytes to tcp endpoint", data.len());
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, ConnectionError> {
        let Some(stream) = self.stream.as_mut() else {
            error!("TCP connection not established!");
            return Err(ConnectionError::Other("Not connected".into()));
        };
        match stream.read(buffer) {
            // A zero-byte read into a non-empty buffer is the peer's FIN.
            Ok(0) if !buffer.is_empty() => {
                info!("TCP peer closed the connection.");
                Err(ConnectionError::Other("Connection closed by peer".into()))
            }
            Ok(n) => Ok(n),
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
