use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::codec::body::ChunkedEncoder;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{PayloadItem, ResponsePart, SendError, WriterState};

/// Encoder enforcing the order in which the parts of a response are written.
///
/// Every [`ResponsePart`] is only accepted in one [`WriterState`]. A part offered
/// in any other state is rejected with [`SendError::InvalidWriterState`] and
/// nothing is written. The state advances only after the part was encoded.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    state: WriterState,
    header_encoder: HeaderEncoder,
    chunked_encoder: ChunkedEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Moves back to `state` when the bytes of an encoded part never reached the sink.
    pub(crate) fn rollback(&mut self, state: WriterState) {
        self.state = state;
    }

    fn expect_state(&self, expected: WriterState, part: &'static str) -> Result<(), SendError> {
        if self.state != expected {
            error!(part, expected = ?expected, actual = ?self.state, "response part written out of order");
            return Err(SendError::invalid_writer_state(expected, self.state));
        }
        Ok(())
    }
}

impl<D: Buf> Encoder<ResponsePart<'_, D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponsePart<'_, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let kind = item.kind();
        match item {
            ResponsePart::StatusLine(status) => {
                self.expect_state(WriterState::Init, kind)?;
                self.header_encoder.encode(status, dst)?;
                self.state = WriterState::HeadersPhase;
            }
            ResponsePart::Headers(headers) => {
                self.expect_state(WriterState::HeadersPhase, kind)?;
                self.header_encoder.encode(headers, dst)?;
                self.state = WriterState::BodyPhase;
            }
            ResponsePart::Body(data) => {
                self.expect_state(WriterState::BodyPhase, kind)?;
                dst.reserve(data.remaining());
                dst.put(data);
                self.state = WriterState::Done;
            }
            ResponsePart::Chunked(item @ PayloadItem::Chunk(_)) => {
                self.expect_state(WriterState::BodyPhase, kind)?;
                self.chunked_encoder.encode(item, dst)?;
            }
            ResponsePart::Chunked(PayloadItem::Eof) => {
                self.expect_state(WriterState::BodyPhase, kind)?;
                self.chunked_encoder.encode(PayloadItem::<D>::Eof, dst)?;
                self.state = WriterState::TrailersPhase;
            }
            ResponsePart::Trailers(trailers) => {
                self.expect_state(WriterState::TrailersPhase, kind)?;
                self.header_encoder.encode(trailers, dst)?;
                self.state = WriterState::Done;
            }
        }
        Ok(())
    }
}
