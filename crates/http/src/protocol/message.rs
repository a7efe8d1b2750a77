use bytes::{Buf, Bytes};
use http::StatusCode;

use crate::protocol::Headers;

/// One piece of an outgoing response, in the order it goes on the wire.
///
/// The generic parameter `D` is the type of body data (defaults to `Bytes`).
#[derive(Debug)]
pub enum ResponsePart<'a, D: Buf = Bytes> {
    /// `HTTP/1.1 <code> <reason>\r\n`
    StatusLine(StatusCode),
    /// The header block, terminated by an empty line
    Headers(&'a Headers),
    /// A fixed-length body written verbatim
    Body(D),
    /// A chunk of a chunked body, or the last-chunk marker
    Chunked(PayloadItem<D>),
    /// The trailer block after the last-chunk marker
    Trailers(&'a Headers),
}

/// Represents an item in a chunked payload stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem<Data: Buf = Bytes> {
    /// A chunk of payload data
    Chunk(Data),
    /// Marks the end of the payload stream
    Eof,
}

impl<D: Buf> ResponsePart<'_, D> {
    /// A short name for the part, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponsePart::StatusLine(_) => "status line",
            ResponsePart::Headers(_) => "headers",
            ResponsePart::Body(_) => "body",
            ResponsePart::Chunked(PayloadItem::Chunk(_)) => "chunk",
            ResponsePart::Chunked(PayloadItem::Eof) => "chunked terminator",
            ResponsePart::Trailers(_) => "trailers",
        }
    }
}
