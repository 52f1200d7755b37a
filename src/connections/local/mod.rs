pub mod local_connection;

pub use local_connection::LocalConnection;
