//! Collaborator contracts consumed by the authenticating transport.
//!
//! The pipeline only depends on these traits; the crate ships default implementations in
//! [`credential`](crate::credential), and callers may inject their own through
//! [`TransportBuilder`](crate::builder::TransportBuilder).

pub mod installation;
pub mod secret_server;
pub mod token_accessor;

pub use installation::*;
pub use secret_server::*;
pub use token_accessor::*;
