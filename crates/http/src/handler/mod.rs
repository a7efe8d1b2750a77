//! The seam between a connection and the code answering its request.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::{HttpError, Request};

/// Answers a parsed request.
///
/// The writer is positioned at [`WriterState::Init`](crate::protocol::WriterState::Init).
/// An implementation must call its methods in a legal order: status line,
/// headers, then either a body or a sequence of chunks followed by the chunked
/// terminator and trailers. Out of order calls fail with
/// [`SendError::InvalidWriterState`](crate::protocol::SendError::InvalidWriterState).
///
/// If `handle` fails before anything was written the connection answers with
/// `500 Internal Server Error`.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HttpError>
    where
        W: AsyncWrite + Unpin + Send;
}
