use super::errors::ConnectionError;

/// A trait representing a generic connection (SSH, TCP, local shell).
///
/// `read` returns `Ok(0)` when nothing arrived within the transport's timeout,
/// and an error once the remote side has closed the connection.
pub trait Connection: Send {
    fn connect(&mut self) -> Result<(), ConnectionError>;
    fn disconnect(&mut self) -> Result<(), ConnectionError>;

    fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError>;
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, ConnectionError>;
}
