use crate::codec::header::{FastWrite, CRLF};
use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;

/// Encodes `Transfer-Encoding: chunked` body framing.
///
/// A chunk is written as `<hex-length>\r\n<data>\r\n`. The end of the body is
/// the bare `0\r\n` marker: the trailer block that follows supplies the final
/// empty line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: u64,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }

    /// Total payload bytes sent so far, framing excluded.
    pub fn send_size(&self) -> u64 {
        self.send_size
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(bytes) => {
                // a zero sized chunk would read as the last-chunk marker
                if !bytes.has_remaining() {
                    return Ok(());
                }

                let size = bytes.remaining();
                write!(FastWrite(dst), "{size:x}\r\n")?;
                dst.reserve(size + CRLF.len());
                dst.put(bytes);
                dst.put_slice(CRLF);
                self.send_size += size as u64;
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.put_slice(b"0\r\n");
                Ok(())
            }
        }
    }
}
