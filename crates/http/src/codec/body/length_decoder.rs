//! Accumulation of request bodies framed by the Content-Length header.
//!
//! See [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// Collects body bytes until the declared content length is reached.
///
/// Every available byte is taken on each call. Only the running total is
/// checked against the declared length, so a body may arrive in any number of
/// pieces, but a total beyond the declaration is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The length declared by the Content-Length header
    length: u64,
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a new `LengthDecoder` expecting exactly `length` bytes.
    pub fn new(length: u64) -> Self {
        Self { length, body: BytesMut::new() }
    }

    /// Appends all of `src` to the body, returning how many bytes were taken.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BodyLengthOverflow`] once the accumulated length
    /// exceeds the declared length.
    pub fn decode(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let total = (self.body.len() + src.len()) as u64;
        ensure!(total <= self.length, ParseError::body_length_overflow(self.length, total));

        self.body.extend_from_slice(src);
        trace!(read = src.len(), total, declared = self.length, "read body bytes");
        Ok(src.len())
    }

    pub fn is_finish(&self) -> bool {
        self.body.len() as u64 == self.length
    }

    pub fn received(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn declared(&self) -> u64 {
        self.length
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}
