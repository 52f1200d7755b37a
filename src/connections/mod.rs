pub mod connection;
pub mod errors;
pub mod local;
pub mod ssh;
pub mod target;
pub mod tcp;

// Re-export the modules here for easy import elsewhere.
pub use connection::*;
pub use errors::*;
pub use target::Target;
