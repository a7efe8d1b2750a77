use std::sync::Arc;

use futures::StreamExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};

use crate::codec::RequestDecoder;
use crate::connection::ResponseWriter;
use crate::handler::Handler;
use crate::protocol::{default_headers, HttpError, ParseError, Request, WriterState};

/// Initial capacity of the read buffer, grown as needed.
pub const INIT_BUFFER_SIZE: usize = 8 * 1024;

/// A single HTTP/1.1 exchange over a reader and a writer.
///
/// The connection reads exactly one request, hands it to the [`Handler`]
/// together with a [`ResponseWriter`] positioned at [`WriterState::Init`], and
/// closes the write half afterwards. Connections are never kept alive.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_decoder(reader, writer, RequestDecoder::new())
    }

    pub fn with_decoder(reader: R, writer: W, decoder: RequestDecoder) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, INIT_BUFFER_SIZE),
            writer: ResponseWriter::new(writer),
        }
    }

    /// Reads one request, lets `handler` respond to it and shuts the writer down.
    ///
    /// A request that fails to parse is answered with `400 Bad Request` carrying
    /// the error text, and the parse error is returned. A handler that fails
    /// before writing anything is answered with `500 Internal Server Error`.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let result = match self.framed_read.next().await {
            Some(Ok(request)) => self.do_process(request, handler.as_ref()).await,

            Some(Err(e)) => {
                error!(cause = %e, "can't parse request");
                self.send_bad_request(&e).await;
                Err(e.into())
            }

            None => {
                info!("connection closed before a request was received");
                Ok(())
            }
        };

        if let Err(e) = self.writer.shutdown().await {
            warn!(cause = %e, "failed to shutdown connection");
        }

        result
    }

    async fn do_process<H>(&mut self, request: Request, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
    {
        info!(method = %request.method(), request_target = request.target(), "received request");

        let result = handler.handle(&mut self.writer, &request).await;
        if let Err(e) = &result {
            error!(cause = %e, request_target = request.target(), "handle request error");
            if self.writer.state() == WriterState::Init {
                let body = StatusCode::INTERNAL_SERVER_ERROR.canonical_reason().unwrap_or_default();
                self.send_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes()).await;
            }
        }
        result
    }

    async fn send_bad_request(&mut self, e: &ParseError) {
        let body = e.to_string();
        self.send_error(StatusCode::BAD_REQUEST, body.as_bytes()).await;
    }

    /// Best effort, the peer may already be gone.
    async fn send_error(&mut self, status: StatusCode, body: &[u8]) {
        let result = async {
            self.writer.write_status_line(status).await?;
            self.writer.write_headers(&default_headers(body.len())).await?;
            self.writer.write_body(body).await
        }
        .await;

        if let Err(e) = result {
            warn!(cause = %e, status = status.as_u16(), "failed to send error response");
        }
    }
}
