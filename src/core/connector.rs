use log::{debug, info};

use crate::connections::connection::Connection;
use crate::connections::errors::ConnectionError;
use crate::connections::local::LocalConnection;
use crate::connections::ssh::SshConnection;
use crate::connections::target::Target;
use crate::connections::tcp::TcpConnection;

/// Opens a connection to a target. The returned connection is already connected.
pub trait Connector {
    fn connect(
        &self,
        target: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection + Send>, ConnectionError>;
}

/// Picks the transport from the target string (see [`Target`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct TransportConnector;

impl TransportConnector {
    pub fn new() -> Self {
        TransportConnector
    }

    /// Build the transport for `target` without connecting it.
    pub fn build(
        &self,
        target: &Target,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection + Send>, ConnectionError> {
        match target {
            Target::Ssh { host, port } => {
                let username = match username {
                    Some(name) => name.to_string(),
                    None => default_username()?,
                };
                Ok(Box::new(SshConnection::new(
                    host.clone(),
                    *port,
                    username,
                    password.map(str::to_string),
                )))
            }
            Target::Tcp { host, port } => {
                ignore_credentials(target, username, password);
                Ok(Box::new(TcpConnection::new(host.clone(), *port)))
            }
            Target::Local => {
                ignore_credentials(target, username, password);
                Ok(Box::new(LocalConnection::new()))
            }
        }
    }
}

impl Connector for TransportConnector {
    fn connect(
        &self,
        target: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection + Send>, ConnectionError> {
        let target = Target::parse(target)?;
        info!("Opening connection to {}", target);
        let mut conn = self.build(&target, username, password)?;
        conn.connect()?;
        Ok(conn)
    }
}

fn default_username() -> Result<String, ConnectionError> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .map_err(|_| ConnectionError::Other("No username given and $USER is not set".into()))
}

fn ignore_credentials(target: &Target, username: Option<&str>, password: Option<&str>) {
    if username.is_some() || password.is_some() {
        debug!("Credentials are not used by {}", target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_target_fails_before_any_io() {
        let err = TransportConnector::new()
            .connect("tcp:nohost", None, None)
            .err()
            .expect("a tcp target without a port must be rejected");
        assert!(matches!(err, ConnectionError::InvalidTarget(_)));
    }

    #[test]
    fn explicit_username_builds_ssh_without_env() {
        let target = Target::parse("ssh:example.com").unwrap();
        assert!(TransportConnector::new()
            .build(&target, Some("alice"), Some("secret"))
            .is_ok());
    }
}
