pub mod connector;
pub mod context;
pub mod keys;
pub mod options;
pub mod session;

// Re-export the modules here for easy import elsewhere.
pub use connector::*;
pub use context::*;
pub use keys::*;
pub use options::*;
pub use session::*;
