//! The codec capability traits and the primitive/collection impls.
//!
//! [`Encode`] and [`Decode`] are the whole contract between the runtime
//! and the layer that knows a type's structure. How an impl comes to
//! exist (a derive macro, a generator, a hand-written adapter) is not
//! the runtime's business; generic container impls are parameterized over
//! the capability, never over concrete element types.
//!
//! # Wire encodings
//!
//! ```text
//! Integer(N bits)   := N/8 raw bytes, wire byte order
//! Bool              := 1 byte (0x00 | 0x01)
//! Float32 / Float64 := 4 / 8 raw bytes, bit pattern of matching-width unsigned
//! String / Bytes    := u32 length ++ <length> raw bytes (UTF-8 for String)
//! Sequence<T>       := u32 count ++ (count x Encoding(T))
//! ```

use bytes::Bytes;

use crate::cursor::ByteCursor;
use crate::errors::{Result, WireError};
use crate::format::{ByteOrder, DecodeOptions, PrefixWidth};
use crate::sink::ByteSink;

/// Capability to serialize a value into a [`ByteSink`].
///
/// Implementations push bytes in the exact order the matching [`Decode`]
/// impl consumes them; there is no self-description on the wire.
pub trait Encode {
    /// Serialize `self` into `sink`.
    ///
    /// # Errors
    ///
    /// Propagates flush failures and framing overflows unchanged; a
    /// failed field aborts the entire enclosing encode.
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()>;
}

/// Capability to reconstruct a value from a [`ByteCursor`].
pub trait Decode: Sized {
    /// Read one value from the front of `cursor`, consuming exactly its
    /// encoding.
    ///
    /// # Errors
    ///
    /// `NeedMoreData` when the cursor holds a strict prefix of the
    /// encoding; any other error rejects the stream.
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self>;
}

macro_rules! int_codec {
    ($($ty:ty => $read:ident / $write:ident),+ $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
                    sink.$write(*self)
                }
            }

            impl Decode for $ty {
                fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
                    cursor.$read()
                }
            }
        )+
    };
}

int_codec! {
    u8 => read_u8 / write_u8,
    u16 => read_u16 / write_u16,
    u32 => read_u32 / write_u32,
    u64 => read_u64 / write_u64,
    i8 => read_i8 / write_i8,
    i16 => read_i16 / write_i16,
    i32 => read_i32 / write_i32,
    i64 => read_i64 / write_i64,
    f32 => read_f32 / write_f32,
    f64 => read_f64 / write_f64,
}

impl Encode for bool {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        sink.write_u8(u8::from(*self))
    }
}

impl Decode for bool {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        match cursor.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::UnknownValue { value: u64::from(other) }),
        }
    }
}

fn check_u32_length(length: usize) -> Result<u32> {
    let max = PrefixWidth::U32.max_value();
    if length as u64 > max {
        return Err(WireError::LengthOverflow { length, max });
    }
    Ok(length as u32)
}

impl Encode for str {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        sink.write_u32(check_u32_length(self.len())?)?;
        sink.write_str(self)
    }
}

impl Encode for String {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        self.as_str().encode(sink)
    }
}

impl Decode for String {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let length = cursor.read_u32()? as usize;
        Ok(cursor.read_str(length)?.into_owned())
    }
}

impl Encode for Bytes {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        sink.write_u32(check_u32_length(self.len())?)?;
        sink.write_bytes_raw(self)
    }
}

impl Decode for Bytes {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let length = cursor.read_u32()? as usize;
        Ok(Bytes::copy_from_slice(cursor.read_bytes(length)?))
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
        sink.write_u32(check_u32_length(self.len())?)?;
        for item in self {
            item.encode(sink)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let count = cursor.read_u32()? as usize;
        // Preallocation is capped by the bytes actually present: a hostile
        // count cannot reserve more memory than the input could justify.
        let mut items = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            items.push(T::decode(cursor)?);
        }
        Ok(items)
    }
}

/// Encode `value` into a fresh buffer at the default (big-endian) wire
/// order.
///
/// # Errors
///
/// Propagates any encode failure; the partially filled buffer is
/// discarded.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode_to_vec_with(value, ByteOrder::default())
}

/// Encode `value` into a fresh buffer at an explicit wire order.
pub fn encode_to_vec_with<T: Encode + ?Sized>(value: &T, order: ByteOrder) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut flush = |bytes: &[u8]| -> Result<()> {
            out.extend_from_slice(bytes);
            Ok(())
        };
        let mut sink = ByteSink::new(order, &mut flush);
        value.encode(&mut sink)?;
    }
    Ok(out)
}

/// Decode one `T` from the front of `bytes` with default options.
///
/// Trailing bytes after the decoded value are not an error: consecutive
/// values legitimately share one buffer. Callers needing exhaustion use
/// [`ByteCursor`] directly and check [`ByteCursor::is_exhausted`].
///
/// # Errors
///
/// `NeedMoreData` if `bytes` holds a strict prefix of an encoding; any
/// other error rejects the input.
pub fn decode_from_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
    decode_from_slice_with(bytes, DecodeOptions::default())
}

/// Decode one `T` from the front of `bytes` with explicit options.
pub fn decode_from_slice_with<T: Decode>(bytes: &[u8], opts: DecodeOptions) -> Result<T> {
    let mut cursor = ByteCursor::with_options(bytes, opts);
    T::decode(&mut cursor)
}
