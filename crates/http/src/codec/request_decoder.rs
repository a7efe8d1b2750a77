//! HTTP request decoder module
//!
//! [`RequestDecoder`] drives a [`RequestParser`] from a [`tokio_util::codec::Decoder`]
//! so a request can be read with `FramedRead`. The decoder owns the buffer
//! bookkeeping: consumed bytes are advanced out of the read buffer, and both the
//! size of the request head and the declared body length are bounded.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use tcp_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/");
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::debug;

use crate::codec::request_parser::{ParseState, RequestParser};
use crate::ensure;
use crate::protocol::{ParseError, Request};

/// Upper bound on the bytes of request line plus header section.
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Upper bound on the `Content-Length` a request may declare.
pub const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

/// A decoder producing one [`Request`] each time a complete request has been read.
///
/// After a request is produced the decoder starts over with a fresh parser, the
/// bytes left in the buffer belong to whatever follows the request.
#[derive(Debug)]
pub struct RequestDecoder {
    parser: RequestParser,
    max_header_bytes: usize,
    max_body_bytes: u64,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that rejects request heads longer than `max_header_bytes`.
    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self::with_limits(max_header_bytes, MAX_BODY_BYTES)
    }

    /// Creates a decoder that rejects request heads longer than `max_header_bytes`
    /// and bodies declared longer than `max_body_bytes`.
    pub fn with_limits(max_header_bytes: usize, max_body_bytes: u64) -> Self {
        Self { parser: RequestParser::new(), max_header_bytes, max_body_bytes }
    }

    /// The phase of the request currently being decoded.
    pub fn state(&self) -> ParseState {
        self.parser.state()
    }

    fn take_request(&mut self) -> Option<Request> {
        mem::take(&mut self.parser).into_request()
    }

    /// Checks the head read so far, plus the partial line still buffered while
    /// the head is incomplete.
    fn check_head_size(&self, buffered: usize) -> Result<(), ParseError> {
        let pending = if self.parser.state().is_head() { buffered } else { 0 };
        let current_size = self.parser.head_len() + pending;
        ensure!(current_size <= self.max_header_bytes, ParseError::too_large_header(current_size, self.max_header_bytes));
        Ok(())
    }

    fn check_body_size(&self) -> Result<(), ParseError> {
        if let Some(declared) = self.parser.content_length() {
            ensure!(declared <= self.max_body_bytes, ParseError::too_large_body(declared, self.max_body_bytes));
        }
        Ok(())
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_header_bytes(MAX_HEADER_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Feeds the buffered bytes to the parser.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request was parsed
    /// - `Ok(None)`: more data is needed
    /// - `Err(_)`: the request is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let was_head = self.parser.state().is_head();
        let consumed = self.parser.feed(src)?;
        src.advance(consumed);

        if was_head {
            self.check_head_size(src.len())?;
            self.check_body_size()?;
        }

        if !self.parser.is_done() {
            return Ok(None);
        }

        Ok(self.take_request())
    }

    /// Applies the end-of-stream policy once the reader is exhausted.
    ///
    /// A stream that ends before any byte of a new request yields `Ok(None)`.
    /// Any bytes left over when the stream ends belong to an incomplete line and
    /// are discarded.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        if self.parser.state() == ParseState::Init && self.parser.head_len() == 0 && src.is_empty() {
            return Ok(None);
        }

        debug!(state = ?self.parser.state(), remaining = src.len(), "stream ended before request was complete");
        self.parser.end_of_stream()?;
        src.clear();
        Ok(self.take_request())
    }
}
