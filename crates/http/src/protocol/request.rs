//! HTTP request representation.
//!
//! A [`Request`] is produced by the [`RequestParser`](crate::codec::RequestParser)
//! once the request line, the header section and the body declared by
//! `Content-Length` have all been received. It is immutable from then on.

use bytes::Bytes;
use http::{header, Method, Version};

use crate::protocol::Headers;

/// The first line of a request: `METHOD TARGET VERSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: Version,
}

impl RequestLine {
    pub fn new(method: Method, target: String, version: Version) -> Self {
        Self { method, target, version }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as it appeared on the wire, not decoded.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

/// A fully received HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub fn new(line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.line
    }

    pub fn method(&self) -> &Method {
        self.line.method()
    }

    pub fn target(&self) -> &str {
        self.line.target()
    }

    pub fn version(&self) -> Version {
        self.line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body bytes, empty when the request declared no `Content-Length`.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The declared body length, if the request carried a `Content-Length`.
    pub fn content_length(&self) -> Option<u64> {
        self.headers.get(header::CONTENT_LENGTH).and_then(|value| value.parse().ok())
    }
}
