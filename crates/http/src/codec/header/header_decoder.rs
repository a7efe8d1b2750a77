//! Incremental parser for HTTP header field lines.
//!
//! Unlike a whole-block parser, this one consumes exactly one CRLF-terminated
//! line per call. The caller drives the loop and interleaves it with the arrival
//! of new bytes, so the complete header section never has to be buffered up
//! front.
//!
//! # Rules
//!
//! - Leading and trailing spaces around the line are ignored
//! - The field name is everything up to the first colon, it must be a non-empty
//!   RFC 9110 token and may not contain spaces
//! - At most one space may follow the colon
//! - Repeated names are folded into one value joined by `", "`

use http::{HeaderName, HeaderValue};
use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError};

pub(crate) const CRLF: &[u8] = b"\r\n";

/// Parses the first header line of `src` into `headers`.
///
/// See [`Headers::parse`] for the meaning of the returned tuple.
pub(crate) fn parse_header_line(headers: &mut Headers, src: &[u8]) -> Result<(usize, bool), ParseError> {
    let Some(line_end) = find_crlf(src) else {
        return Ok((0, false));
    };

    // an empty line terminates the header section
    if line_end == 0 {
        return Ok((CRLF.len(), true));
    }

    let line = trim_spaces(&src[..line_end]);
    let Some(colon) = line.iter().position(|b| *b == b':') else {
        return Err(ParseError::malformed_header_line(format!(
            "expect `field-name: field-value`, but got {:?}",
            String::from_utf8_lossy(line)
        )));
    };

    let (name, value) = (&line[..colon], &line[colon + 1..]);

    ensure!(!name.contains(&b' '), ParseError::invalid_header_spacing("space not allowed in header name"));
    ensure!(!name.is_empty(), ParseError::invalid_header_name(""));
    ensure!(name.iter().copied().all(is_token), ParseError::invalid_header_name(String::from_utf8_lossy(name)));

    let value = value.strip_prefix(b" ").unwrap_or(value);
    ensure!(!value.starts_with(b" "), ParseError::invalid_header_spacing("only one space allowed after the colon"));

    // the token check above guarantees a valid name, `from_bytes` also lower-cases it
    let name = HeaderName::from_bytes(name).map_err(ParseError::invalid_header_name)?;
    let value = HeaderValue::from_bytes(value).map_err(ParseError::malformed_header_line)?;

    trace!(name = %name, value = ?value, "parsed header line");
    headers.append(name, value)?;

    Ok((line_end + CRLF.len(), false))
}

/// Returns the index of the first CRLF in `src`.
pub(crate) fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF.len()).position(|window| window == CRLF)
}

fn trim_spaces(mut bytes: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' '] = bytes {
        bytes = rest;
    }
    bytes
}

/// `tchar` from RFC 9110 section 5.6.2
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_single_header() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"Host: localhost:42069\r\n\r\n").unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(n, 23);
        assert!(!done);
    }

    #[test]
    fn empty_line_ends_the_section() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"\r\n").unwrap();

        assert_eq!(n, 2);
        assert!(done);
        assert!(headers.is_empty());
    }

    #[test]
    fn incomplete_line_needs_more_data() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"Host: localhost:42069").unwrap();

        assert_eq!(n, 0);
        assert!(!done);
        assert!(headers.is_empty());
    }

    #[test]
    fn space_before_colon_is_rejected() {
        let mut headers = Headers::new();
        let result = headers.parse(b"       Host : localhost:42069       \r\n\r\n");

        assert!(matches!(result, Err(ParseError::InvalidHeaderSpacing { .. })));
        assert!(headers.is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"    Host: localhost:42069    \r\n\r\n").unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(n, 31);
        assert!(!done);
    }

    #[test]
    fn consecutive_lines_from_one_buffer() {
        let data = b"    Host: localhost:42069    \r\n    User-Agent: test-agent    \r\n\r\n";
        let mut headers = Headers::new();

        let (first, done) = headers.parse(data).unwrap();
        assert_eq!(first, 31);
        assert!(!done);

        let (second, done) = headers.parse(&data[first..]).unwrap();
        assert_eq!(second, 32);
        assert!(!done);

        let (last, done) = headers.parse(&data[first + second..]).unwrap();
        assert_eq!(last, 2);
        assert!(done);

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(headers.get("user-agent"), Some("test-agent"));
    }

    #[test]
    fn missing_colon_is_malformed() {
        let mut headers = Headers::new();
        let result = headers.parse(b"InvalidHeader\r\n");

        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn space_inside_name_is_rejected() {
        let mut headers = Headers::new();
        let error = headers.parse(b"Host Name: localhost:42069\r\n").unwrap_err();

        assert!(matches!(error, ParseError::InvalidHeaderSpacing { .. }));
        assert_eq!(error.to_string(), "invalid header spacing: space not allowed in header name");
        assert!(headers.is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut headers = Headers::new();
        let result = headers.parse(b": value\r\n");

        assert!(matches!(result, Err(ParseError::InvalidHeaderName { .. })));
    }

    #[test]
    fn later_colons_belong_to_the_value() {
        let mut headers = Headers::new();
        let (n, _) = headers.parse(b"Authorization: Bearer: token:123\r\n").unwrap();

        assert_eq!(headers.get("authorization"), Some("Bearer: token:123"));
        assert_eq!(n, 34);
    }

    #[test]
    fn optional_whitespace_after_colon() {
        let mut headers = Headers::new();

        let (n, _) = headers.parse(b"Content-Type: application/json\r\n").unwrap();
        assert_eq!(n, 32);

        let (n, _) = headers.parse(b"Accept:text/html\r\n").unwrap();
        assert_eq!(n, 18);

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("accept"), Some("text/html"));
    }

    #[test]
    fn two_spaces_after_colon_are_rejected() {
        let mut headers = Headers::new();
        let result = headers.parse(b"Accept:  text/html\r\n");

        assert!(matches!(result, Err(ParseError::InvalidHeaderSpacing { .. })));
    }

    #[test]
    fn empty_value_is_allowed() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"X-Empty:\r\n").unwrap();

        assert_eq!(n, 10);
        assert!(!done);
        assert_eq!(headers.get("x-empty"), Some(""));
    }

    #[test]
    fn non_token_characters_are_rejected() {
        let mut headers = Headers::new();
        let result = headers.parse("H\u{a9}st: localhost:42069\r\n\r\n".as_bytes());

        assert!(matches!(result, Err(ParseError::InvalidHeaderName { .. })));
        assert!(headers.is_empty());
    }

    #[test]
    fn control_characters_in_value_are_rejected() {
        let mut headers = Headers::new();
        let result = headers.parse(b"X-Bell: ding\x07\r\n");

        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn repeated_name_folds_into_existing_value() {
        let mut headers = Headers::new();
        headers.parse(b"Host: localhost:42069\r\n").unwrap();

        let (n, done) = headers.parse(b"Host: localhost:42070\r\n\r\n").unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069, localhost:42070"));
        assert_eq!(n, 23);
        assert!(!done);
    }

    #[test]
    fn repeated_name_folds_across_calls() {
        let data = b"Host: a\r\nHost: b\r\n\r\n";
        let mut headers = Headers::new();
        let mut offset = 0;

        loop {
            let (n, done) = headers.parse(&data[offset..]).unwrap();
            offset += n;
            if done {
                break;
            }
        }

        assert_eq!(offset, data.len());
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("host"), Some("a, b"));
    }

    #[test]
    fn names_are_lower_cased() {
        let mut headers = Headers::new();
        headers.parse(b"X-Request-ID: 42\r\n").unwrap();

        let (name, value) = headers.iter().next().unwrap();
        assert_eq!(name.as_str(), "x-request-id");
        assert_eq!(value, "42");
    }
}
