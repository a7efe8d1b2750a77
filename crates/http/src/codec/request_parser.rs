//! Resumable request parser.
//!
//! [`RequestParser`] consumes the bytes of one request as they arrive, in
//! pieces of any size, and moves through a linear set of states:
//!
//! ```text
//! Init -> ParsingHeaders -> ParsingBody -> Done
//! ```
//!
//! Each call to [`RequestParser::feed`] reports how many bytes it consumed. The
//! caller drops exactly that many bytes from the front of its buffer, appends
//! newly read bytes and feeds again. Zero consumed means no complete unit is
//! buffered and more input is needed.

use bytes::Bytes;
use http::header;
use tracing::trace;

use crate::codec::body::LengthDecoder;
use crate::codec::request_line::parse_request_line;
use crate::ensure;
use crate::protocol::{Headers, ParseError, Request, RequestLine};

/// The phase of a [`RequestParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Waiting for the request line
    #[default]
    Init,
    /// Reading header lines until the empty line
    ParsingHeaders,
    /// Collecting `Content-Length` bytes of body
    ParsingBody,
    /// The request is complete
    Done,
}

impl ParseState {
    /// Returns true while the request line or headers are still being read.
    #[inline]
    pub fn is_head(&self) -> bool {
        matches!(self, ParseState::Init | ParseState::ParsingHeaders)
    }
}

/// Incremental parser for a single HTTP/1.1 request.
#[derive(Debug, Default)]
pub struct RequestParser {
    state: ParseState,
    line: Option<RequestLine>,
    headers: Headers,
    body: Option<LengthDecoder>,
    head_len: usize,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// The request line, once it has been parsed.
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.line.as_ref()
    }

    /// The headers parsed so far.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Number of bytes consumed by the request line and header section so far.
    pub fn head_len(&self) -> usize {
        self.head_len
    }

    /// The `Content-Length` of the body, known once the headers are complete.
    pub fn content_length(&self) -> Option<u64> {
        self.body.as_ref().map(LengthDecoder::declared)
    }

    /// Offers the not-yet-consumed bytes to the parser.
    ///
    /// Runs the sub-parser of the current state repeatedly until one reports
    /// that it needs more data or the request is complete, and returns the total
    /// number of bytes consumed from the front of `src`.
    ///
    /// While a `Content-Length` body is being read every available byte is taken,
    /// so a non-zero return in [`ParseState::ParsingBody`] means progress was made
    /// even though the request is not complete yet.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] is fatal to the request. Feeding a parser that is
    /// already [`ParseState::Done`] returns [`ParseError::ParserAlreadyDone`].
    pub fn feed(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        ensure!(!self.is_done(), ParseError::ParserAlreadyDone);

        let mut consumed = 0;
        while !self.is_done() {
            let n = self.parse_single(&src[consumed..])?;
            consumed += n;
            if n == 0 {
                break;
            }
        }

        trace!(consumed, state = ?self.state, "fed request parser");
        Ok(consumed)
    }

    fn parse_single(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Init => {
                let Some((line, n)) = parse_request_line(src)? else {
                    return Ok(0);
                };
                self.line = Some(line);
                self.head_len += n;
                self.state = ParseState::ParsingHeaders;
                Ok(n)
            }
            ParseState::ParsingHeaders => {
                let (n, done) = self.headers.parse(src)?;
                self.head_len += n;
                if done {
                    self.body = content_length(&self.headers)?.map(LengthDecoder::new);
                    self.state = ParseState::ParsingBody;
                }
                Ok(n)
            }
            ParseState::ParsingBody => {
                // no Content-Length: the request has no body
                let Some(body) = self.body.as_mut() else {
                    self.state = ParseState::Done;
                    return Ok(0);
                };

                let n = body.decode(src)?;
                if body.is_finish() {
                    self.state = ParseState::Done;
                }
                Ok(n)
            }
            ParseState::Done => Err(ParseError::ParserAlreadyDone),
        }
    }

    /// Applies the end-of-stream policy to the current state.
    ///
    /// - in [`ParseState::ParsingBody`] the body must have exactly the declared
    ///   length, otherwise the stream ended early
    /// - in [`ParseState::ParsingHeaders`] the request is complete with the headers
    ///   received so far
    /// - in [`ParseState::Init`] there is no request line, so the stream ended early
    pub fn end_of_stream(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParseState::Init => Err(ParseError::unexpected_eof("request line is incomplete")),
            ParseState::ParsingHeaders => {
                self.state = ParseState::Done;
                Ok(())
            }
            ParseState::ParsingBody => match &self.body {
                Some(body) if !body.is_finish() => Err(ParseError::unexpected_eof(format!(
                    "body has {} bytes, but content-length is {}",
                    body.received(),
                    body.declared()
                ))),
                _ => {
                    self.state = ParseState::Done;
                    Ok(())
                }
            },
            ParseState::Done => Ok(()),
        }
    }

    /// Consumes the parser, returning the request if parsing is done.
    pub fn into_request(self) -> Option<Request> {
        if !self.is_done() {
            return None;
        }

        let body = self.body.map(LengthDecoder::into_body).unwrap_or_else(Bytes::new);
        self.line.map(|line| Request::new(line, self.headers, body))
    }
}

/// Reads the `Content-Length` header as a non-negative integer.
fn content_length(headers: &Headers) -> Result<Option<u64>, ParseError> {
    let Some(value) = headers.get_raw(header::CONTENT_LENGTH) else {
        return Ok(None);
    };

    let bytes = value.as_bytes();
    ensure!(
        !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit),
        ParseError::invalid_content_length(format!("value {:?} is not a non-negative integer", String::from_utf8_lossy(bytes)))
    );

    // digits only, so the only possible failure is overflow
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(Some)
        .ok_or_else(|| ParseError::invalid_content_length(format!("value {} is too large", String::from_utf8_lossy(bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Version};
    use indoc::indoc;

    fn parse_whole(src: &[u8]) -> Result<Request, ParseError> {
        let mut parser = RequestParser::new();
        let n = parser.feed(src)?;
        assert_eq!(n, src.len());
        assert!(parser.is_done());
        Ok(parser.into_request().unwrap())
    }

    /// Feeds `src` the way a reader loop does: `chunk_size` new bytes per read,
    /// consumed bytes dropped from the front of the buffer.
    fn parse_in_chunks(src: &[u8], chunk_size: usize) -> Result<Request, ParseError> {
        let mut parser = RequestParser::new();
        let mut buffer = Vec::new();

        for chunk in src.chunks(chunk_size) {
            buffer.extend_from_slice(chunk);
            let n = parser.feed(&buffer)?;
            buffer.drain(..n);
            if parser.is_done() {
                break;
            }
        }

        if !parser.is_done() {
            parser.end_of_stream()?;
        }
        Ok(parser.into_request().unwrap())
    }

    #[test]
    fn request_line_without_headers_or_body() {
        let request = parse_whole(b"GET /path HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/path");
        assert_eq!(request.version(), Version::HTTP_11);
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn standard_headers() {
        let request = parse_whole(
            indoc! {b"
            GET / HTTP/1.1\r
            Host: localhost:42069\r
            User-Agent: curl/7.81.0\r
            Accept: */*\r
            \r
            "},
        )
        .unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[test]
    fn fragmentation_does_not_change_the_result() {
        let raw = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nAccept: a\r\nAccept: b\r\nContent-Length: 13\r\n\r\nhello world!\n";
        let expected = parse_whole(raw).unwrap();

        assert_eq!(expected.headers().get("accept"), Some("a, b"));
        assert_eq!(&expected.body()[..], b"hello world!\n");

        for chunk_size in 1..=raw.len() {
            let request = parse_in_chunks(raw, chunk_size).unwrap();
            assert_eq!(request, expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn partial_line_consumes_nothing() {
        let mut parser = RequestParser::new();

        assert_eq!(parser.feed(b"GET / HT").unwrap(), 0);
        assert_eq!(parser.state(), ParseState::Init);
        assert_eq!(parser.feed(b"GET / HTTP/1.1\r\nHost: loc").unwrap(), 16);
        assert_eq!(parser.state(), ParseState::ParsingHeaders);
        assert_eq!(parser.request_line().map(RequestLine::target), Some("/"));
        assert_eq!(parser.feed(b"Host: localhost\r\n\r\n").unwrap(), 19);
        assert!(parser.is_done());
    }

    #[test]
    fn body_progress_is_reported() {
        let mut parser = RequestParser::new();

        let head = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n";
        assert_eq!(parser.feed(head).unwrap(), head.len());
        assert_eq!(parser.state(), ParseState::ParsingBody);
        assert_eq!(parser.head_len(), head.len());

        assert_eq!(parser.feed(b"ab").unwrap(), 2);
        assert_eq!(parser.state(), ParseState::ParsingBody);

        assert_eq!(parser.feed(b"").unwrap(), 0);
        assert_eq!(parser.feed(b"cde").unwrap(), 3);
        assert!(parser.is_done());

        let request = parser.into_request().unwrap();
        assert_eq!(&request.body()[..], b"abcde");
        assert_eq!(request.content_length(), Some(5));
    }

    #[test]
    fn zero_content_length_completes_without_body_bytes() {
        let request = parse_whole(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.content_length(), Some(0));
    }

    #[test]
    fn body_without_content_length_is_ignored() {
        let mut parser = RequestParser::new();
        let n = parser.feed(b"GET / HTTP/1.1\r\n\r\nignored").unwrap();

        assert_eq!(n, 18);
        assert!(parser.is_done());
        assert!(parser.into_request().unwrap().body().is_empty());
    }

    #[test]
    fn body_longer_than_declared_overflows() {
        let mut parser = RequestParser::new();
        let error = parser.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabcdef").unwrap_err();

        assert!(matches!(error, ParseError::BodyLengthOverflow { declared: 5, actual: 6 }));
    }

    #[test]
    fn overflow_is_detected_across_reads() {
        let mut parser = RequestParser::new();
        parser.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabc").unwrap();

        let error = parser.feed(b"def").unwrap_err();
        assert!(matches!(error, ParseError::BodyLengthOverflow { declared: 5, actual: 6 }));
    }

    #[test]
    fn short_body_at_end_of_stream() {
        let error = parse_in_chunks(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabc", 4).unwrap_err();

        assert!(matches!(error, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn end_of_stream_while_reading_headers_completes_the_request() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET / HTTP/1.1\r\nHost: localhost\r\n").unwrap();
        assert_eq!(parser.state(), ParseState::ParsingHeaders);

        parser.end_of_stream().unwrap();

        let request = parser.into_request().unwrap();
        assert_eq!(request.headers().get("host"), Some("localhost"));
    }

    #[test]
    fn end_of_stream_before_request_line() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET / HT").unwrap();

        assert!(matches!(parser.end_of_stream(), Err(ParseError::UnexpectedEof { .. })));
        assert!(parser.into_request().is_none());
    }

    #[test]
    fn invalid_content_length() {
        for value in ["abc", "-5", "+5", "5, 5", "99999999999999999999999"] {
            let raw = format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\n");
            let error = RequestParser::new().feed(raw.as_bytes()).unwrap_err();
            assert!(matches!(error, ParseError::InvalidContentLength { .. }), "value {value}");
        }
    }

    #[test]
    fn feeding_a_done_parser_fails() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert!(matches!(parser.feed(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::ParserAlreadyDone)));
    }

    #[test]
    fn errors_from_sub_parsers_propagate() {
        assert!(matches!(RequestParser::new().feed(b"GET / HTTP/1.0\r\n\r\n"), Err(ParseError::UnsupportedHttpVersion { .. })));
        assert!(matches!(
            RequestParser::new().feed(b"GET / HTTP/1.1\r\nHost Name: x\r\n\r\n"),
            Err(ParseError::InvalidHeaderSpacing { .. })
        ));
    }

    #[test]
    fn unfinished_parser_has_no_request() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET / HTTP/1.1\r\n").unwrap();

        assert!(parser.into_request().is_none());
    }
}
