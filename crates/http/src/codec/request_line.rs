//! Parsing of the request line: `METHOD SP TARGET SP HTTP/1.1 CRLF`

use http::{Method, Version};
use tracing::trace;

use crate::codec::header::{find_crlf, CRLF};
use crate::ensure;
use crate::protocol::{ParseError, RequestLine};

/// Parses the request line at the front of `src`.
///
/// Returns `Ok(None)` while no CRLF has arrived, otherwise the parsed line and
/// the number of bytes it occupied, CRLF included.
///
/// # Errors
///
/// - [`ParseError::MalformedRequestLine`]: not exactly three single-space separated
///   tokens, an empty target, or bytes that are not UTF-8
/// - [`ParseError::InvalidMethod`]: the method is not made of uppercase ASCII letters
/// - [`ParseError::BadHttpVersion`]: the version token is not `HTTP/<number>`
/// - [`ParseError::UnsupportedHttpVersion`]: any version other than 1.1
pub(crate) fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(src) else {
        return Ok(None);
    };

    let raw = &src[..line_end];
    let line = std::str::from_utf8(raw)
        .map_err(|e| ParseError::malformed_request_line(format!("{} ({e})", String::from_utf8_lossy(raw))))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::malformed_request_line(line));
    };

    ensure!(!method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::invalid_method(method));
    ensure!(!target.is_empty(), ParseError::malformed_request_line(line));

    let version = parse_version(version)?;
    let method = Method::from_bytes(method.as_bytes()).map_err(ParseError::invalid_method)?;

    trace!(%method, request_target = *target, "parsed request line");
    Ok(Some((RequestLine::new(method, (*target).to_string(), version), line_end + CRLF.len())))
}

fn parse_version(token: &str) -> Result<Version, ParseError> {
    let Some((protocol, number)) = token.split_once('/') else {
        return Err(ParseError::bad_http_version(token));
    };

    ensure!(protocol == "HTTP" && !number.contains('/'), ParseError::bad_http_version(token));

    match number {
        "1.1" => Ok(Version::HTTP_11),
        other => Err(ParseError::unsupported_http_version(other)),
    }
}
