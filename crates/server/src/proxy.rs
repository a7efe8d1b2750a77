//! Forwarding of `/httpbin/<path>` to the upstream as a chunked body.
//!
//! The upstream body is relayed chunk by chunk as it arrives. The response
//! announces two trailers, a SHA-256 digest and the length of the relayed body,
//! which are sent after the last chunk.

use http::{header, HeaderName, HeaderValue, StatusCode};
use sha2::{Digest, Sha256};
use tcp_http::connection::ResponseWriter;
use tcp_http::protocol::{default_headers, Headers, HttpError};
use tokio::io::AsyncWrite;
use tracing::{error, info, warn};

use crate::error::ProxyError;

/// Largest chunk written to the client, bigger upstream reads are split.
pub const MAX_CHUNK_SIZE: usize = 1024;

pub const X_CONTENT_SHA256: HeaderName = HeaderName::from_static("x-content-sha256");
pub const X_CONTENT_LENGTH: HeaderName = HeaderName::from_static("x-content-length");

const FETCH_ERROR_BODY: &[u8] = b"Error fetching httpbin";

#[derive(Debug, Clone)]
pub struct Proxy {
    client: reqwest::Client,
    upstream: String,
}

impl Proxy {
    /// `upstream` is a base URL without a trailing slash, such as `https://httpbin.org`.
    pub fn new<S: Into<String>>(upstream: S) -> Self {
        Self::with_client(upstream, reqwest::Client::new())
    }

    pub fn with_client<S: Into<String>>(upstream: S, client: reqwest::Client) -> Self {
        Self { client, upstream: upstream.into() }
    }

    pub fn upstream_url(&self, path: &str) -> String {
        format!("{}/{}", self.upstream, path)
    }

    async fn fetch(&self, path: &str) -> Result<reqwest::Response, ProxyError> {
        let url = self.upstream_url(path);
        info!(url = %url, "fetching upstream");
        Ok(self.client.get(url).send().await?)
    }

    /// Streams `GET <upstream>/<path>` to `writer` as a chunked response.
    ///
    /// A failed upstream request is answered with `500 Internal Server Error`.
    /// If the upstream fails after the headers went out, the body is ended
    /// early and the trailers describe the bytes that were relayed.
    pub async fn forward<W>(&self, writer: &mut ResponseWriter<W>, path: &str) -> Result<(), HttpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut upstream = match self.fetch(path).await {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, path, "proxy request failed");
                writer.write_status_line(StatusCode::INTERNAL_SERVER_ERROR).await?;
                writer.write_headers(&default_headers(FETCH_ERROR_BODY.len())).await?;
                writer.write_body(FETCH_ERROR_BODY).await?;
                return Ok(());
            }
        };

        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&chunked_headers()).await?;

        let mut digest = BodyDigest::default();
        loop {
            match upstream.chunk().await {
                Ok(Some(bytes)) => {
                    for piece in bytes.chunks(MAX_CHUNK_SIZE) {
                        writer.write_chunked_body_chunk(piece).await?;
                        digest.update(piece);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(cause = %e, relayed = digest.length, "upstream body ended with error");
                    break;
                }
            }
        }

        writer.write_chunked_body_terminator().await?;
        writer.write_trailers(&digest.into_trailers()).await?;
        Ok(())
    }
}

/// Default headers switched to chunked framing with announced trailers.
pub fn chunked_headers() -> Headers {
    let mut headers = default_headers(0);
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    headers.insert(header::TRAILER, HeaderValue::from_static("X-Content-SHA256, X-Content-Length"));
    headers
}

/// Running digest and length of a relayed body.
#[derive(Default)]
struct BodyDigest {
    hasher: Sha256,
    length: usize,
}

impl BodyDigest {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.length += data.len();
    }

    fn into_trailers(self) -> Headers {
        let sha256 = format!("{:x}", self.hasher.finalize());

        let mut trailers = Headers::new();
        // hex digits are always a valid header value
        if let Ok(value) = HeaderValue::from_str(&sha256) {
            trailers.insert(X_CONTENT_SHA256, value);
        }
        trailers.insert(X_CONTENT_LENGTH, HeaderValue::from(self.length));
        trailers
    }
}
