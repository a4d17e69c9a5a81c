// ABOUTME: Provides frame-based I/O over a TCP stream for SMPP v3.4 sessions
// ABOUTME: Split into a buffered reader half and a buffered writer half so both can run concurrently

use crate::codec::{CodecError, Frame};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Default read buffer size. Most PDUs are well under 1KB; 4KB keeps a few
/// pipelined PDUs in one read.
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 4 * 1024;

/// Errors surfaced while moving frames over the socket
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed PDU: {0}")]
    Codec(#[from] CodecError),

    /// A complete PDU arrived but could not be decoded. It has been consumed
    /// from the buffer, so the stream stays usable.
    #[error("Undecodable PDU {command_id:#010x} (sequence {sequence_number}): {source}")]
    Malformed {
        command_id: u32,
        sequence_number: u32,
        #[source]
        source: CodecError,
    },

    /// The peer closed the socket while a PDU was only partially received
    #[error("Connection reset by peer")]
    Reset,
}

/// Split a connected stream into its framing halves.
///
/// The session layer gives the reader half to a dedicated task and keeps the
/// writer half behind a lock for callers.
pub fn split(
    socket: TcpStream,
    read_buffer_capacity: usize,
) -> (FrameReader<OwnedReadHalf>, FrameWriter<OwnedWriteHalf>) {
    let (read, write) = socket.into_split();
    (
        FrameReader::with_capacity(read, read_buffer_capacity),
        FrameWriter::new(write),
    )
}

/// Reads whole PDUs from a byte stream.
///
/// Data left in the buffer after a frame is parsed is kept for the next
/// `read_frame` call.
#[derive(Debug)]
pub struct FrameReader<R> {
    stream: R,
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(stream: R) -> Self {
        Self::with_capacity(stream, DEFAULT_READ_BUFFER_CAPACITY)
    }

    pub fn with_capacity(stream: R, capacity: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Read a single `Frame` from the underlying stream.
    ///
    /// Returns `Ok(None)` when the peer closes the stream cleanly between
    /// frames.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, ConnectionError> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(ConnectionError::Reset)
                };
            }
        }
    }

    /// Parse a frame if the buffer holds a complete one. `Ok(None)` means
    /// more data is needed. `Malformed` skips the offending PDU; any other
    /// error leaves the connection unusable.
    fn parse_frame(&mut self) -> Result<Option<Frame>, ConnectionError> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Frame::check(&mut buf) {
            Ok(len) => {
                buf.set_position(0);
                let parsed = Frame::parse(&mut buf);
                let (command_id, sequence_number) = raw_ids(&self.buffer[..len]);
                self.buffer.advance(len);
                parsed
                    .map(Some)
                    .map_err(|source| ConnectionError::Malformed {
                        command_id,
                        sequence_number,
                        source,
                    })
            }
            Err(CodecError::Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// command_id and sequence_number straight from the header octets
fn raw_ids(pdu: &[u8]) -> (u32, u32) {
    let mut header = Cursor::new(pdu);
    header.advance(4);
    let command_id = header.get_u32();
    header.advance(4);
    (command_id, header.get_u32())
}

/// Writes whole PDUs to a byte stream, flushing after each one.
#[derive(Debug)]
pub struct FrameWriter<W> {
    stream: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream: BufWriter::new(stream),
        }
    }

    /// Encode and write a single `Frame`. Encoding failures are reported
    /// before any bytes reach the socket.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), ConnectionError> {
        let bytes = frame.to_bytes()?;
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Shut down the write side of the socket.
    pub async fn shutdown(&mut self) -> Result<(), ConnectionError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encodable;
    use crate::datatypes::{EnquireLink, SubmitSmResponse, Unbind};

    #[tokio::test]
    async fn reads_frames_split_across_writes() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(client);

        let bytes = SubmitSmResponse::new(5, "abc123").to_bytes().unwrap();
        let (head, tail) = bytes.split_at(10);
        server.write_all(head).await.unwrap();

        let pending = tokio::spawn(async move { reader.read_frame().await });
        server.write_all(tail).await.unwrap();

        let frame = pending.await.unwrap().unwrap();
        assert_eq!(
            frame,
            Some(Frame::SubmitSmResp(SubmitSmResponse::new(5, "abc123")))
        );
    }

    #[tokio::test]
    async fn clean_close_between_frames_yields_none() {
        let (client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(client);
        drop(server);

        assert!(reader.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn close_mid_frame_is_reset() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(client);

        let bytes = Unbind::new(1).to_bytes().unwrap();
        server.write_all(&bytes[..8]).await.unwrap();
        drop(server);

        assert!(matches!(reader.read_frame().await, Err(ConnectionError::Reset)));
    }

    #[tokio::test]
    async fn undecodable_pdu_is_skipped() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut reader = FrameReader::new(client);

        let mut unknown = Vec::new();
        unknown.extend_from_slice(&16u32.to_be_bytes());
        unknown.extend_from_slice(&0x0000_0099u32.to_be_bytes());
        unknown.extend_from_slice(&0u32.to_be_bytes());
        unknown.extend_from_slice(&31u32.to_be_bytes());
        server.write_all(&unknown).await.unwrap();
        server
            .write_all(&EnquireLink::new(32).to_bytes().unwrap())
            .await
            .unwrap();

        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Malformed {
                command_id: 0x99,
                sequence_number: 31,
                source: CodecError::InvalidCommandId(0x99),
            }
        ));

        let next = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(next.sequence_number(), 32);
    }

    #[tokio::test]
    async fn writer_and_reader_agree() {
        let (client, server) = tokio::io::duplex(256);
        let mut writer = FrameWriter::new(client);
        let mut reader = FrameReader::new(server);

        writer
            .write_frame(&Frame::EnquireLink(EnquireLink::new(11)))
            .await
            .unwrap();
        writer.write_frame(&Frame::Unbind(Unbind::new(12))).await.unwrap();

        let first = reader.read_frame().await.unwrap().unwrap();
        let second = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(first.sequence_number(), 11);
        assert_eq!(second.sequence_number(), 12);
    }
}
