use std::io;
use thiserror::Error;

use crate::protocol::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors produced while reading a request off the wire.
///
/// Every variant is fatal to the message being parsed: the parser never tries
/// to resynchronize after reporting one.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {line:?}")]
    MalformedRequestLine { line: String },

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("bad http version: {version:?}")]
    BadHttpVersion { version: String },

    #[error("unsupported http version: {version:?}")]
    UnsupportedHttpVersion { version: String },

    #[error("malformed header line: {reason}")]
    MalformedHeaderLine { reason: String },

    #[error("invalid header name: {name:?}")]
    InvalidHeaderName { name: String },

    #[error("invalid header spacing: {reason}")]
    InvalidHeaderSpacing { reason: &'static str },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body length {actual} exceeds content-length {declared}")]
    BodyLengthOverflow { declared: u64, actual: u64 },

    #[error("unexpected end of stream: {reason}")]
    UnexpectedEof { reason: String },

    #[error("request parser is already done")]
    ParserAlreadyDone,

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("body size too large, content-length: {declared} exceed the limit {max_size}")]
    TooLargeBody { declared: u64, max_size: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(line: S) -> Self {
        Self::MalformedRequestLine { line: line.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn bad_http_version<S: ToString>(version: S) -> Self {
        Self::BadHttpVersion { version: version.to_string() }
    }

    pub fn unsupported_http_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedHttpVersion { version: version.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(reason: S) -> Self {
        Self::MalformedHeaderLine { reason: reason.to_string() }
    }

    pub fn invalid_header_name<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string() }
    }

    pub fn invalid_header_spacing(reason: &'static str) -> Self {
        Self::InvalidHeaderSpacing { reason }
    }

    pub fn invalid_content_length<S: ToString>(reason: S) -> Self {
        Self::InvalidContentLength { reason: reason.to_string() }
    }

    pub fn body_length_overflow(declared: u64, actual: u64) -> Self {
        Self::BodyLengthOverflow { declared, actual }
    }

    pub fn unexpected_eof<S: ToString>(reason: S) -> Self {
        Self::UnexpectedEof { reason: reason.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_large_body(declared: u64, max_size: u64) -> Self {
        Self::TooLargeBody { declared, max_size }
    }
}

/// Errors produced while writing a response.
#[derive(Error, Debug)]
pub enum SendError {
    /// A writer operation was called out of order. This is a bug in the caller.
    #[error("invalid writer state: expected {expected:?}, but writer is in {actual:?}")]
    InvalidWriterState { expected: WriterState, actual: WriterState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_writer_state(expected: WriterState, actual: WriterState) -> Self {
        Self::InvalidWriterState { expected, actual }
    }
}
