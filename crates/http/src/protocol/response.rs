//! Response side protocol types.

use http::{header, HeaderValue};

use crate::protocol::Headers;

/// Where a response writer is in the response it is producing.
///
/// The states only move forward:
///
/// ```text
/// Init -> HeadersPhase -> BodyPhase -> Done
///                             |         ^
///                             v         |
///                          TrailersPhase  (chunked bodies only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterState {
    /// Nothing written yet, the status line comes next
    #[default]
    Init,
    /// The status line is out, headers come next
    HeadersPhase,
    /// Headers are out, a body or a sequence of chunks comes next
    BodyPhase,
    /// The last-chunk marker is out, trailers come next
    TrailersPhase,
    /// The response is complete
    Done,
}

/// The baseline header set a handler starts from.
///
/// Produces `connection: close`, `content-type: text/html` and
/// `content-length: <content_length>`. Handlers override entries as needed, for
/// example replacing the content type or removing the length in favour of
/// chunked framing.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    headers
}
