//! Incremental zero-copy read cursor.
//!
//! A [`ByteCursor`] borrows an externally owned byte region and consumes it
//! front to back. All validation happens before any bytes are interpreted:
//! a read that needs more bytes than remain fails with
//! [`WireError::NeedMoreData`] and leaves nothing half-consumed to guess
//! about; the caller retries the whole decode once more data arrives.
//!
//! Framed payloads are decoded through bounded sub-cursors
//! ([`ByteCursor::read_slice`]): the sub-cursor's window is carved out of
//! the parent before the inner decoder runs, so a corrupted nested length
//! can never let inner decode read past its allotted region.

use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;
use std::str;

use crate::errors::{Result, WireError};
use crate::format::{ByteOrder, DecodeOptions, PrefixWidth, Utf8Policy};

/// Incremental reader over a borrowed byte region.
///
/// Transient: constructed per decode invocation, never persisted
/// across calls, never the owner of the underlying storage. Sub-cursors
/// borrow from their parent's region and are bound to the call that
/// created them by lifetime.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: u16,
    opts: DecodeOptions,
    release: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over `buf` with default options (big-endian,
    /// strict UTF-8).
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_options(buf, DecodeOptions::default())
    }

    /// Create a cursor over `buf` with explicit decode options.
    #[must_use]
    pub fn with_options(buf: &'a [u8], opts: DecodeOptions) -> Self {
        Self { buf, pos: 0, depth: 0, opts, release: None }
    }

    /// Create a cursor that runs `release` when dropped.
    ///
    /// For cursors wrapping externally allocated memory whose lifetime is
    /// managed elsewhere: the release action runs exactly once, when the
    /// cursor's scope ends. Sub-cursors never inherit it.
    #[must_use]
    pub fn with_release(
        buf: &'a [u8],
        opts: DecodeOptions,
        release: impl FnOnce() + 'a,
    ) -> Self {
        Self { buf, pos: 0, depth: 0, opts, release: Some(Box::new(release)) }
    }

    /// Bytes left in this cursor's window.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True iff every byte of the window has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far within this cursor's window.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The options this cursor (and every sub-cursor it produces) decodes
    /// with.
    #[must_use]
    pub fn options(&self) -> DecodeOptions {
        self.opts
    }

    /// Consume exactly `len` bytes, or fail with `NeedMoreData` without
    /// advancing.
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < len {
            return Err(WireError::NeedMoreData { needed: len, available });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }
}

macro_rules! read_fixed {
    ($($(#[$doc:meta])* $name:ident => $ty:ty),+ $(,)?) => {
        impl<'a> ByteCursor<'a> {
            $(
                $(#[$doc])*
                pub fn $name(&mut self) -> Result<$ty> {
                    let bytes = self.take(size_of::<$ty>())?;
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    Ok(match self.opts.byte_order {
                        ByteOrder::Big => <$ty>::from_be_bytes(raw),
                        ByteOrder::Little => <$ty>::from_le_bytes(raw),
                    })
                }
            )+
        }
    };
}

read_fixed! {
    /// Read one unsigned byte.
    read_u8 => u8,
    /// Read a fixed-width `u16` at the wire byte order.
    read_u16 => u16,
    /// Read a fixed-width `u32` at the wire byte order.
    read_u32 => u32,
    /// Read a fixed-width `u64` at the wire byte order.
    read_u64 => u64,
    /// Read one signed byte.
    read_i8 => i8,
    /// Read a fixed-width `i16` at the wire byte order.
    read_i16 => i16,
    /// Read a fixed-width `i32` at the wire byte order.
    read_i32 => i32,
    /// Read a fixed-width `i64` at the wire byte order.
    read_i64 => i64,
}

impl<'a> ByteCursor<'a> {
    /// Read an `f32` as the bit pattern of a `u32`.
    ///
    /// Bit patterns round-trip exactly; NaN payloads are preserved, never
    /// canonicalized.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an `f64` as the bit pattern of a `u64`.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read an unsigned length of `width` bytes at the wire byte order.
    pub fn read_prefix(&mut self, width: PrefixWidth) -> Result<u64> {
        Ok(match width {
            PrefixWidth::U8 => u64::from(self.read_u8()?),
            PrefixWidth::U16 => u64::from(self.read_u16()?),
            PrefixWidth::U32 => u64::from(self.read_u32()?),
            PrefixWidth::U64 => self.read_u64()?,
        })
    }

    /// Carve a bounded sub-cursor of exactly `length` bytes out of this
    /// cursor's window, advancing past it.
    ///
    /// The sub-cursor can never observe bytes outside its own window; the
    /// parent has already moved past the window regardless of how much of
    /// it the inner decoder consumes.
    ///
    /// # Errors
    ///
    /// `NeedMoreData` if fewer than `length` bytes remain.
    pub fn read_slice(&mut self, length: usize) -> Result<ByteCursor<'a>> {
        let window = self.take(length)?;
        Ok(ByteCursor { buf: window, pos: 0, depth: self.depth, opts: self.opts, release: None })
    }

    /// Read a `width`-byte length, then run `decode_fn` inside a
    /// sub-cursor scoped to exactly that many bytes.
    ///
    /// This is the single framing primitive: every construct whose size
    /// must be knowable without the inner decoder understanding its own
    /// end goes through here.
    ///
    /// # Errors
    ///
    /// - `NeedMoreData` if the prefix itself, or the body it claims, is
    ///   not fully available. A corrupted length claiming more bytes than
    ///   remain surfaces here, before any body byte is touched.
    /// - `DepthLimitExceeded` if framing nests past the configured cap.
    /// - Whatever `decode_fn` fails with.
    pub fn read_length_prefixed<T>(
        &mut self,
        width: PrefixWidth,
        decode_fn: impl FnOnce(&mut ByteCursor<'a>) -> Result<T>,
    ) -> Result<T> {
        if self.depth >= self.opts.max_depth {
            return Err(WireError::DepthLimitExceeded { max: self.opts.max_depth });
        }
        let claimed = self.read_prefix(width)?;
        let available = self.remaining();
        if claimed > available as u64 {
            return Err(WireError::NeedMoreData {
                needed: claimed.min(usize::MAX as u64) as usize,
                available,
            });
        }
        let mut body = self.read_slice(claimed as usize)?;
        body.depth = self.depth + 1;
        decode_fn(&mut body)
    }

    /// Consume exactly `length` raw bytes.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        self.take(length)
    }

    /// Consume exactly `length` bytes as UTF-8 text.
    ///
    /// Under [`Utf8Policy::Strict`] (the default) invalid sequences fail
    /// with `InvalidUtf8` and the text borrows from the underlying
    /// region; under [`Utf8Policy::Lossy`] invalid sequences become
    /// U+FFFD and the result is owned.
    pub fn read_str(&mut self, length: usize) -> Result<Cow<'a, str>> {
        let bytes = self.take(length)?;
        match self.opts.utf8 {
            Utf8Policy::Strict => match str::from_utf8(bytes) {
                Ok(text) => Ok(Cow::Borrowed(text)),
                Err(err) => Err(WireError::InvalidUtf8 { valid_up_to: err.valid_up_to() }),
            },
            Utf8Policy::Lossy => Ok(String::from_utf8_lossy(bytes)),
        }
    }
}

impl fmt::Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteCursor")
            .field("len", &self.buf.len())
            .field("pos", &self.pos)
            .field("depth", &self.depth)
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

impl Drop for ByteCursor<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn fixed_width_reads_advance() {
        let mut cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x0203);
        assert_eq!(cursor.remaining(), 2);
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.read_u16().unwrap(), 0x0405);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn short_read_is_need_more_data_and_does_not_advance() {
        let mut cursor = ByteCursor::new(&[0xAA, 0xBB]);
        assert_eq!(
            cursor.read_u32(),
            Err(WireError::NeedMoreData { needed: 4, available: 2 })
        );
        // Nothing consumed: the same two bytes are still readable.
        assert_eq!(cursor.read_u16().unwrap(), 0xAABB);
    }

    #[test]
    fn little_endian_reads() {
        let opts = DecodeOptions { byte_order: ByteOrder::Little, ..DecodeOptions::default() };
        let mut cursor = ByteCursor::with_options(&[0x01, 0x02, 0x03, 0x04], opts);
        assert_eq!(cursor.read_u32().unwrap(), 0x0403_0201);
    }

    #[test]
    fn signed_reads_preserve_sign() {
        let mut cursor = ByteCursor::new(&[0xFF, 0xFF, 0xFE]);
        assert_eq!(cursor.read_i16().unwrap(), -1);
        assert_eq!(cursor.read_i8().unwrap(), -2);
    }

    #[test]
    fn float_reads_are_bit_exact() {
        let bits: u32 = 0x7FC0_0001; // NaN with payload
        let bytes = bits.to_be_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_f32().unwrap().to_bits(), bits);
    }

    #[test]
    fn sub_cursor_is_bounded() {
        let mut cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04]);
        let mut window = cursor.read_slice(2).unwrap();
        assert_eq!(window.read_u16().unwrap(), 0x0102);
        // The window is spent; it cannot see the parent's remaining bytes.
        assert_eq!(
            window.read_u8(),
            Err(WireError::NeedMoreData { needed: 1, available: 0 })
        );
        // The parent already advanced past the window.
        assert_eq!(cursor.read_u16().unwrap(), 0x0304);
    }

    #[test]
    fn length_prefixed_scopes_the_body() {
        // u16 prefix claiming 3 bytes, then one trailing byte.
        let mut cursor = ByteCursor::new(&[0x00, 0x03, 0xAA, 0xBB, 0xCC, 0xDD]);
        let inner = cursor
            .read_length_prefixed(PrefixWidth::U16, |body| {
                let first = body.read_u8()?;
                // Under-reading the body is tolerated; the parent skips
                // the whole window regardless.
                Ok(first)
            })
            .unwrap();
        assert_eq!(inner, 0xAA);
        assert_eq!(cursor.read_u8().unwrap(), 0xDD);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn corrupt_length_never_reads_past_the_buffer() {
        // Prefix claims 200 bytes; only 2 remain.
        let mut cursor = ByteCursor::new(&[0x00, 0xC8, 0x01, 0x02]);
        assert_eq!(
            cursor.read_length_prefixed(PrefixWidth::U16, |body| body.read_u8()),
            Err(WireError::NeedMoreData { needed: 200, available: 2 })
        );
    }

    #[test]
    fn depth_cap_rejects_hostile_nesting() {
        let opts = DecodeOptions { max_depth: 2, ..DecodeOptions::default() };
        // Three levels of u8-prefixed framing.
        let mut cursor = ByteCursor::with_options(&[0x03, 0x02, 0x01, 0x00], opts);
        let result: Result<()> = cursor.read_length_prefixed(PrefixWidth::U8, |a| {
            a.read_length_prefixed(PrefixWidth::U8, |b| {
                b.read_length_prefixed(PrefixWidth::U8, |_| Ok(()))
            })
        });
        assert_eq!(result, Err(WireError::DepthLimitExceeded { max: 2 }));
    }

    #[test]
    fn strict_utf8_rejects_invalid_sequences() {
        let mut cursor = ByteCursor::new(&[0x61, 0xFF, 0x62]);
        assert_eq!(cursor.read_str(3), Err(WireError::InvalidUtf8 { valid_up_to: 1 }));
    }

    #[test]
    fn lossy_utf8_substitutes() {
        let opts = DecodeOptions { utf8: Utf8Policy::Lossy, ..DecodeOptions::default() };
        let mut cursor = ByteCursor::with_options(&[0x61, 0xFF, 0x62], opts);
        assert_eq!(cursor.read_str(3).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn release_action_runs_on_drop() {
        let released = Cell::new(false);
        {
            let buf = [0u8; 4];
            let mut cursor =
                ByteCursor::with_release(&buf, DecodeOptions::default(), || released.set(true));
            let _ = cursor.read_u16();
            assert!(!released.get());
        }
        assert!(released.get());
    }

    #[test]
    fn sub_cursors_do_not_inherit_release() {
        let count = Cell::new(0u32);
        {
            let buf = [0u8; 4];
            let mut cursor = ByteCursor::with_release(&buf, DecodeOptions::default(), || {
                count.set(count.get() + 1);
            });
            let window = cursor.read_slice(2).unwrap();
            drop(window);
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }
}
