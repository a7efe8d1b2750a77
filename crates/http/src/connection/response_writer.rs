use bytes::{Buf, BytesMut};
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

use crate::codec::ResponseEncoder;
use crate::protocol::{Headers, PayloadItem, ResponsePart, SendError, WriterState};

/// Writes one response to an async sink, part by part.
///
/// Each operation is only legal in one [`WriterState`], see [`ResponseEncoder`].
/// A call made out of order fails with [`SendError::InvalidWriterState`] and
/// leaves both the sink and the state untouched. Every successful call is
/// written through and flushed before it returns. The state only advances once
/// the sink accepted the bytes, a call failing with an I/O error leaves it
/// where it was.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 1024)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new() }
    }

    /// Where this writer is in the response.
    #[inline]
    pub fn state(&self) -> WriterState {
        self.encoder.state()
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`. Legal only in [`WriterState::Init`].
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.send(ResponsePart::<&[u8]>::StatusLine(status)).await
    }

    /// Writes the header block. Legal only in [`WriterState::HeadersPhase`].
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.send(ResponsePart::<&[u8]>::Headers(headers)).await
    }

    /// Writes `body` verbatim and completes the response. Legal only in
    /// [`WriterState::BodyPhase`].
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), SendError> {
        self.send(ResponsePart::Body(body)).await
    }

    /// Writes one chunk of a chunked body. May be repeated while in
    /// [`WriterState::BodyPhase`].
    pub async fn write_chunked_body_chunk(&mut self, chunk: &[u8]) -> Result<(), SendError> {
        self.send(ResponsePart::Chunked(PayloadItem::Chunk(chunk))).await
    }

    /// Writes the `0\r\n` last-chunk marker. The trailers written next supply
    /// the final empty line.
    pub async fn write_chunked_body_terminator(&mut self) -> Result<(), SendError> {
        self.send(ResponsePart::<&[u8]>::Chunked(PayloadItem::Eof)).await
    }

    /// Writes the trailer block, completing a chunked response.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.send(ResponsePart::<&[u8]>::Trailers(trailers)).await
    }

    /// Shuts down the underlying sink.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        Ok(self.writer.shutdown().await?)
    }

    async fn send<D: Buf>(&mut self, part: ResponsePart<'_, D>) -> Result<(), SendError> {
        let previous = self.encoder.state();
        self.encoder.encode(part, &mut self.buffer)?;

        if let Err(e) = self.flush().await {
            self.encoder.rollback(previous);
            return Err(e);
        }
        Ok(())
    }

    #[inline]
    async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let result = self.writer.write_all(self.buffer.as_ref()).await;
        self.buffer.clear();
        result?;
        Ok(self.writer.flush().await?)
    }
}
