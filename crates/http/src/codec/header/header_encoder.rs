//! Serialization of the response head: the status line and header blocks
//!
//! The same block format is used for the header section and for the trailer
//! section of a chunked body: one `name: value\r\n` line per field followed by
//! an empty line.

use crate::protocol::{Headers, SendError};

use bytes::{BufMut, BytesMut};

use http::StatusCode;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Encoder for the status line and for header or trailer blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl Encoder<StatusCode> for HeaderEncoder {
    type Error = SendError;

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// The reason phrase is the canonical one registered for the code, codes
    /// without one get an empty reason phrase.
    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or(""))?;
        Ok(())
    }
}

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for (header_name, header_value) in headers {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Adapts `BytesMut` to `io::Write` so `write!` can format straight into it.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, HeaderValue};

    #[test]
    fn status_lines_use_canonical_reasons() {
        let cases = [
            (StatusCode::OK, "HTTP/1.1 200 OK\r\n"),
            (StatusCode::BAD_REQUEST, "HTTP/1.1 400 Bad Request\r\n"),
            (StatusCode::INTERNAL_SERVER_ERROR, "HTTP/1.1 500 Internal Server Error\r\n"),
        ];

        for (status, expected) in cases {
            let mut dst = BytesMut::new();
            HeaderEncoder.encode(status, &mut dst).unwrap();
            assert_eq!(&dst[..], expected.as_bytes());
        }
    }

    #[test]
    fn unregistered_status_has_empty_reason() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(StatusCode::from_u16(599).unwrap(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"HTTP/1.1 599 \r\n");
    }

    #[test]
    fn header_block_ends_with_empty_line() {
        let mut headers = Headers::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(12_usize));

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&headers, &mut dst).unwrap();

        assert_eq!(&dst[..], b"connection: close\r\ncontent-length: 12\r\n\r\n");
    }

    #[test]
    fn empty_block_is_just_the_terminator() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&Headers::new(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"\r\n");
    }
}
