pub mod connections;
pub mod core;
pub mod utils;

// re-export ergonomic entry points
pub use crate::connections::{Connection, ConnectionError, Target};
pub use crate::core::context::{get_connection, Context, SharedConnection};
pub use crate::core::connector::{Connector, TransportConnector};
pub use crate::core::options::{parse_args, Options};
