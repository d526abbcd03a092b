//! # Vellum Wire Format
//!
//! This crate implements the canonical binary encoding/decoding runtime
//! for Vellum: given a typed data model, it produces a canonical byte
//! representation and reconstructs the original value from bytes, with
//! explicit rules for forward-compatible evolution of tagged unions.
//!
//! ## Runtime Design
//!
//! The runtime is deliberately small and sans-io:
//!
//! - **[`ByteCursor`]**: incremental, zero-copy reader over an externally
//!   owned byte region. Primitive decoders, bounded sub-cursors, and
//!   length-prefixed framing reads. Any short read fails with
//!   [`WireError::NeedMoreData`], which is retryable and never conflated
//!   with malformed input.
//!
//! - **[`ByteSink`]**: incremental writer that moves bytes out through a
//!   caller-supplied flush callback. Buffering only ever happens locally
//!   inside a single length-prefixed write, where the body must be
//!   measured before its prefix can be emitted.
//!
//! - **[`Encode`] / [`Decode`]**: the capability pair every encodable
//!   type implements. How the impl is produced (derive macro,
//!   generator, hand-written adapter) is external to the runtime;
//!   container codecs are generic over the capability, never over
//!   concrete element types.
//!
//! - **[`tagged`]**: the tagged-union protocol. Every case travels as
//!   `[u16 marker][u32 body length][body]`; open unions resolve unknown
//!   markers to a fallback case by skipping the framed body, frozen
//!   unions reject them.
//!
//! ## Wire Format
//!
//! Fixed byte order per deployment (default big-endian), symmetric
//! between encode and decode:
//!
//! ```text
//! Integer(N bits)   := N/8 raw bytes
//! Bool              := 1 byte (0x00 | 0x01)
//! Float32 / Float64 := 4 / 8 raw bytes, bit pattern of matching-width unsigned
//! String / Bytes    := u32 length ++ <length> raw bytes (UTF-8 for String)
//! Sequence<T>       := u32 count ++ (count x Encoding(T))
//! TaggedUnion       := u16 marker ++ u32 bodyLength ++ <bodyLength> bytes
//! Record            := Encoding(field1) ++ Encoding(field2) ++ ... (declared order)
//! ```
//!
//! ## Safety Properties
//!
//! - **Bounded framing**: a framed payload is decoded through a
//!   sub-cursor scoped to exactly its claimed window, so a corrupted
//!   nested length can never let inner decode read past its allotted
//!   region. A length claiming more bytes than remain fails before any
//!   body byte is touched.
//!
//! - **Bounded recursion**: hostile nesting is cut off by a configurable
//!   depth cap ([`DecodeOptions::max_depth`]) before it can threaten the
//!   call stack.
//!
//! - **All-or-nothing composites**: a single field/case/element failure
//!   aborts the entire enclosing encode or decode; composite codecs
//!   never partially apply or silently recover.
//!
//! ## Concurrency
//!
//! Single-threaded, synchronous, non-reentrant: one encode or decode
//! call owns its cursor or sink exclusively for the call's duration, and
//! no blocking I/O occurs inside the core: byte availability and
//! backpressure are the transport adapter's responsibility.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod cursor;
pub mod errors;
pub mod format;
pub mod record;
pub mod sink;
pub mod stream;
pub mod tagged;

pub use codec::{
    decode_from_slice, decode_from_slice_with, encode_to_vec, encode_to_vec_with, Decode, Encode,
};
pub use cursor::ByteCursor;
pub use errors::{Result, WireError};
pub use format::{ByteOrder, DecodeOptions, PrefixWidth, Utf8Policy, MAX_UNION_CASES};
pub use sink::{ByteSink, FlushFn};
pub use stream::{encode_with, StreamDecoder};
