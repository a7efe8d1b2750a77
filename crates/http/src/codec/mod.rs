//! HTTP codec module for decoding requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestParser`]: resumable state machine for one request
//!   - [`RequestDecoder`]: drives the parser as a `tokio_util` [`Decoder`](tokio_util::codec::Decoder)
//!   - request line, header lines and `Content-Length` bodies are parsed by the
//!     `request_line`, [`header`] and [`body`] modules
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: encodes [`ResponsePart`](crate::protocol::ResponsePart)s
//!     and rejects parts written out of order
//!   - status line and header blocks via [`header`], chunked framing via [`body`]
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use http::StatusCode;
//! use tcp_http::codec::{RequestDecoder, ResponseEncoder};
//! use tcp_http::protocol::{default_headers, ResponsePart};
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
//! let request = decoder.decode(&mut request_buffer).unwrap();
//! assert!(request.is_some());
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let headers = default_headers(0);
//! encoder.encode(ResponsePart::<&[u8]>::StatusLine(StatusCode::OK), &mut response_buffer).unwrap();
//! encoder.encode(ResponsePart::<&[u8]>::Headers(&headers), &mut response_buffer).unwrap();
//! ```

mod body;
mod header;
mod request_decoder;
mod request_line;
mod request_parser;
mod response_encoder;

pub use body::{ChunkedEncoder, LengthDecoder};
pub use header::HeaderEncoder;
pub(crate) use header::parse_header_line;
pub use request_decoder::{RequestDecoder, MAX_BODY_BYTES, MAX_HEADER_BYTES};
pub use request_parser::{ParseState, RequestParser};
pub use response_encoder::ResponseEncoder;
