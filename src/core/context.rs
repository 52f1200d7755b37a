use log::{debug, info};
use std::ffi::OsString;
use std::sync::{Arc, Mutex, PoisonError};

use crate::connections::connection::Connection;
use crate::connections::errors::ConnectionError;
use crate::core::connector::{Connector, TransportConnector};
use crate::core::options::{self, Options};

/// The memoized connection. Every caller gets a clone of the same `Arc`.
pub type SharedConnection = Arc<Mutex<Box<dyn Connection + Send>>>;

/// Caller-owned cache for a single connection.
///
/// Arguments are parsed and the connector is called on the first
/// [`get_connection`](Context::get_connection) only. A failed connect is
/// returned as-is and leaves the cache empty.
pub struct Context<C: Connector> {
    connector: C,
    args: Option<Vec<OsString>>,
    connection: Option<SharedConnection>,
}

impl<C: Connector> Context<C> {
    /// Parses the process arguments on first use.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            args: None,
            connection: None,
        }
    }

    /// Parses `args` (program name first) on first use instead of the process arguments.
    pub fn with_args<I, T>(connector: C, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            connector,
            args: Some(args.into_iter().map(Into::into).collect()),
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn get_connection(&mut self) -> Result<SharedConnection, ConnectionError> {
        if let Some(conn) = &self.connection {
            debug!("Reusing cached connection");
            return Ok(Arc::clone(conn));
        }

        let options = match &self.args {
            Some(args) => options::parse_args_from(args.iter().cloned()),
            None => options::parse_args(),
        };
        let conn = open(&self.connector, &options)?;
        self.connection = Some(Arc::clone(&conn));
        Ok(conn)
    }
}

fn open<C: Connector>(connector: &C, options: &Options) -> Result<SharedConnection, ConnectionError> {
    let conn = connector.connect(
        &options.target,
        options.username.as_deref(),
        options.password.as_deref(),
    )?;
    info!("Connected to '{}'", options.target);
    Ok(Arc::new(Mutex::new(conn)))
}

static CONNECTION: Mutex<Option<SharedConnection>> = Mutex::new(None);

/// Process-wide connection, opened from the process arguments on first call.
///
/// The lock is held across the connect, so concurrent first calls still open
/// a single connection.
pub fn get_connection() -> Result<SharedConnection, ConnectionError> {
    let mut cached = CONNECTION.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(conn) = cached.as_ref() {
        return Ok(Arc::clone(conn));
    }

    let options = options::parse_args();
    let conn = open(&TransportConnector::new(), &options)?;
    *cached = Some(Arc::clone(&conn));
    Ok(conn)
}
