//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: drives one exchange over a connection:
//!   - reads and decodes a single request
//!   - hands it to a [`Handler`](crate::handler::Handler)
//!   - answers parse failures with `400 Bad Request`
//!   - closes the connection afterwards
//! - [`ResponseWriter`]: writes a response to the connection part by part,
//!   rejecting parts written out of order

mod http_connection;
mod response_writer;

pub use http_connection::{HttpConnection, INIT_BUFFER_SIZE};
pub use response_writer::ResponseWriter;
