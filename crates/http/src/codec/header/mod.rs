//! HTTP header processing for both directions of the connection
//!
//! - [`parse_header_line`]: consumes one header field line at a time into a
//!   [`Headers`](crate::protocol::Headers) collection
//! - [`HeaderEncoder`]: writes the status line and header or trailer blocks

mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::{find_crlf, parse_header_line, CRLF};
pub(crate) use header_encoder::FastWrite;
pub use header_encoder::HeaderEncoder;
