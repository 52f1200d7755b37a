//! Target strings of the form `transport:address`.
//!
//! ```text
//! ssh:example.com          ssh to port 22
//! ssh:example.com:2222
//! tcp:127.0.0.1:7878
//! local:                   a local `sh` subprocess
//! example.com              same as ssh:example.com
//! ```

use std::fmt::{self, Display};

use super::errors::ConnectionError;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// A parsed target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Ssh { host: String, port: u16 },
    Tcp { host: String, port: u16 },
    Local,
}

impl Target {
    pub fn parse(target: &str) -> Result<Self, ConnectionError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ConnectionError::InvalidTarget("empty target".into()));
        }

        let (transport, address) = match target.split_once(':') {
            Some((transport, rest)) if is_transport(transport) => (transport, rest),
            _ if target == "local" => ("local", ""),
            _ => ("ssh", target),
        };

        match transport {
            "ssh" => {
                let (host, port) = split_host_port(target, address)?;
                Ok(Target::Ssh {
                    host,
                    port: port.unwrap_or(DEFAULT_SSH_PORT),
                })
            }
            "tcp" => match split_host_port(target, address)? {
                (host, Some(port)) => Ok(Target::Tcp { host, port }),
                (_, None) => Err(ConnectionError::InvalidTarget(format!(
                    "'{}': tcp targets need a port",
                    target
                ))),
            },
            "local" => {
                if address.is_empty() {
                    Ok(Target::Local)
                } else {
                    Err(ConnectionError::InvalidTarget(format!(
                        "'{}': local targets take no address",
                        target
                    )))
                }
            }
            other => Err(ConnectionError::InvalidTarget(format!(
                "unknown transport '{}'",
                other
            ))),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Ssh { host, port } => write!(f, "ssh:{}:{}", host, port),
            Target::Tcp { host, port } => write!(f, "tcp:{}:{}", host, port),
            Target::Local => write!(f, "local:"),
        }
    }
}

fn is_transport(prefix: &str) -> bool {
    matches!(prefix, "ssh" | "tcp" | "local")
}

fn split_host_port(target: &str, address: &str) -> Result<(String, Option<u16>), ConnectionError> {
    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|e| {
                ConnectionError::InvalidTarget(format!("'{}': bad port '{}': {}", target, port, e))
            })?;
            (host, Some(port))
        }
        None => (address, None),
    };

    if host.is_empty() {
        return Err(ConnectionError::InvalidTarget(format!(
            "'{}': missing host",
            target
        )));
    }
    Ok((host.to_string(), port))
}
