//! Incremental writer over a caller-supplied flush callback.
//!
//! A [`ByteSink`] owns no storage. Every write converts the value to the
//! wire byte order and hands the bytes to the flush callback, which is the
//! transport adapter's job: append to a growable buffer, write to a
//! socket, whatever. A failing flush propagates unchanged and aborts the
//! current encode.
//!
//! The one place the sink buffers is inside a single length-prefixed
//! write: the body must be fully materialized before its length can be
//! known, because the prefix is always the actual emitted size, never a
//! pre-computed estimate.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::errors::{Result, WireError};
use crate::format::{ByteOrder, PrefixWidth};

/// Flush callback moving bytes out of the sink.
///
/// May be invoked one or more times per write. Returning an error aborts
/// the current encode; the error propagates to the root call unchanged.
pub type FlushFn<'a> = dyn FnMut(&[u8]) -> Result<()> + 'a;

enum Out<'a> {
    /// Production path: bytes leave through the caller's callback.
    Flush(&'a mut FlushFn<'a>),
    /// Local body buffer for a single length-prefixed write.
    Buffer(&'a mut BytesMut),
}

/// Incremental writer with a declared byte order and a flush callback.
///
/// Transient: constructed per encode invocation, stateless beyond its
/// byte order, never persisted across calls.
pub struct ByteSink<'a> {
    order: ByteOrder,
    out: Out<'a>,
}

impl<'a> ByteSink<'a> {
    /// Create a sink that emits through `flush` at the given byte order.
    pub fn new(order: ByteOrder, flush: &'a mut FlushFn<'a>) -> Self {
        Self { order, out: Out::Flush(flush) }
    }

    /// The byte order every multi-byte write uses.
    #[must_use]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.out {
            Out::Flush(flush) => flush(bytes),
            Out::Buffer(buf) => {
                buf.put_slice(bytes);
                Ok(())
            },
        }
    }
}

macro_rules! write_fixed {
    ($($(#[$doc:meta])* $name:ident => $ty:ty),+ $(,)?) => {
        impl<'a> ByteSink<'a> {
            $(
                $(#[$doc])*
                pub fn $name(&mut self, value: $ty) -> Result<()> {
                    let raw = match self.order {
                        ByteOrder::Big => value.to_be_bytes(),
                        ByteOrder::Little => value.to_le_bytes(),
                    };
                    self.emit(&raw)
                }
            )+
        }
    };
}

write_fixed! {
    /// Write one unsigned byte.
    write_u8 => u8,
    /// Write a fixed-width `u16` at the wire byte order.
    write_u16 => u16,
    /// Write a fixed-width `u32` at the wire byte order.
    write_u32 => u32,
    /// Write a fixed-width `u64` at the wire byte order.
    write_u64 => u64,
    /// Write one signed byte.
    write_i8 => i8,
    /// Write a fixed-width `i16` at the wire byte order.
    write_i16 => i16,
    /// Write a fixed-width `i32` at the wire byte order.
    write_i32 => i32,
    /// Write a fixed-width `i64` at the wire byte order.
    write_i64 => i64,
}

impl<'a> ByteSink<'a> {
    /// Write an `f32` as the bit pattern of a `u32`. Bit patterns
    /// round-trip exactly; NaN payloads are preserved.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Write an `f64` as the bit pattern of a `u64`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Write an unsigned length of `width` bytes at the wire byte order.
    ///
    /// The value must already fit the width; framing checks that before
    /// calling this.
    pub fn write_prefix(&mut self, width: PrefixWidth, value: u64) -> Result<()> {
        match width {
            PrefixWidth::U8 => self.write_u8(value as u8),
            PrefixWidth::U16 => self.write_u16(value as u16),
            PrefixWidth::U32 => self.write_u32(value as u32),
            PrefixWidth::U64 => self.write_u64(value),
        }
    }

    /// Flush raw bytes with no framing.
    pub fn write_bytes_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.emit(bytes)
    }

    /// Write a string's UTF-8 bytes with no implicit length prefix.
    ///
    /// Callers compose length-prefixing explicitly when the wire format
    /// calls for it.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.emit(value.as_bytes())
    }

    /// Materialize a body, measure it, then emit `[length][body]`.
    ///
    /// `write_fn` runs against a temporary buffering sink so the body is
    /// fully produced before the prefix is written. The prefix is the
    /// measured size of what was actually emitted.
    ///
    /// # Errors
    ///
    /// - `LengthOverflow` if the measured body length cannot fit in
    ///   `width` bytes. Nothing is flushed in that case.
    /// - Whatever `write_fn` or the flush callback fails with.
    pub fn write_length_prefixed(
        &mut self,
        width: PrefixWidth,
        write_fn: impl FnOnce(&mut ByteSink<'_>) -> Result<()>,
    ) -> Result<()> {
        let mut body = BytesMut::new();
        {
            let mut staged = ByteSink { order: self.order, out: Out::Buffer(&mut body) };
            write_fn(&mut staged)?;
        }
        let length = body.len();
        let max = width.max_value();
        if length as u64 > max {
            return Err(WireError::LengthOverflow { length, max });
        }
        self.write_prefix(width, length as u64)?;
        self.emit(&body)
    }
}

impl fmt::Debug for ByteSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.out {
            Out::Flush(_) => "flush",
            Out::Buffer(_) => "buffer",
        };
        f.debug_struct("ByteSink").field("order", &self.order).field("out", &mode).finish()
    }
}
