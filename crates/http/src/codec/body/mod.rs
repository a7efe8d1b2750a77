//! HTTP body framing for request and response payloads
//!
//! - [`LengthDecoder`]: accumulates a request body framed by `Content-Length`
//! - [`ChunkedEncoder`]: frames a response body with chunked transfer encoding
//!
//! Chunked request bodies are not accepted, so there is no chunked decoder.

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::LengthDecoder;
