//! Streaming entry points for unbounded payloads.
//!
//! The core never blocks on I/O: bytes arrive through [`StreamDecoder::feed`]
//! and leave through the flush callback of [`encode_with`]. Backpressure
//! and actual blocking belong to the transport adapter on either side.
//!
//! Decoding is retry-from-the-start: `NeedMoreData` carries no
//! partial-progress checkpoint, so [`StreamDecoder`] retains every
//! not-yet-consumed byte and re-attempts the whole value on each call.
//! Bytes are only discarded once a value decodes completely.

use bytes::{Buf, BytesMut};

use crate::codec::{Decode, Encode};
use crate::cursor::ByteCursor;
use crate::errors::Result;
use crate::format::{ByteOrder, DecodeOptions};
use crate::sink::ByteSink;

/// Encode `value` incrementally through a caller-supplied flush callback.
///
/// The streaming counterpart of [`crate::encode_to_vec`]: bytes go to the
/// transport as they are produced instead of accumulating. A failing
/// flush aborts the encode and propagates unchanged.
pub fn encode_with<T: Encode + ?Sized>(
    value: &T,
    order: ByteOrder,
    mut flush: impl FnMut(&[u8]) -> Result<()>,
) -> Result<()> {
    let mut sink = ByteSink::new(order, &mut flush);
    value.encode(&mut sink)
}

/// Incremental decoder over a growing byte stream.
///
/// Feed arriving bytes with [`feed`](Self::feed); attempt a value with
/// [`try_decode`](Self::try_decode). One decoder owns its buffer
/// exclusively; there is no concurrent decode of a single stream.
#[derive(Debug)]
pub struct StreamDecoder {
    buf: BytesMut,
    opts: DecodeOptions,
}

impl StreamDecoder {
    /// A decoder with default options (big-endian, strict UTF-8).
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default())
    }

    /// A decoder with explicit options, applied to every attempt.
    #[must_use]
    pub fn with_options(opts: DecodeOptions) -> Self {
        Self { buf: BytesMut::new(), opts }
    }

    /// Append newly arrived bytes to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes currently buffered and not yet consumed by a decode.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Attempt to decode one `T` from the front of the buffered bytes.
    ///
    /// - `Ok(Some(value))`: a complete value was decoded; exactly its
    ///   encoding has been consumed, and the next call starts at the
    ///   following byte.
    /// - `Ok(None)`: the buffer holds a strict prefix of an encoding.
    ///   Nothing is consumed; feed more bytes and retry.
    ///
    /// # Errors
    ///
    /// Any failure other than incomplete input: the stream is rejected
    /// and the buffer is left as it was for inspection.
    pub fn try_decode<T: Decode>(&mut self) -> Result<Option<T>> {
        let mut cursor = ByteCursor::with_options(&self.buf[..], self.opts);
        match T::decode(&mut cursor) {
            Ok(value) => {
                let consumed = cursor.position();
                drop(cursor);
                self.buf.advance(consumed);
                Ok(Some(value))
            },
            Err(err) if err.is_incomplete() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
