//! The httpfromtcp server: an accept loop and its routes on top of `tcp_http`.
//!
//! - [`Server`]: binds a listener and serves every connection on its own task
//! - [`Router`]: the route handlers, including the chunked [`Proxy`]
//! - [`Cli`] and [`ServerConfig`]: command line arguments and configuration

pub mod config;
pub mod error;
pub mod proxy;
pub mod router;
pub mod server;

pub use config::{Cli, ServerConfig};
pub use error::{ProxyError, ServerError};
pub use proxy::Proxy;
pub use router::Router;
pub use server::Server;
