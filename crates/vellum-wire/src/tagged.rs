//! Tagged-union wire protocol: marker, framed body, evolution discipline.
//!
//! Every case travels in the uniform shape
//! `[u16 marker][u32 body length][body]`. The marker is the case's
//! 0-based declaration-order index: a positional index, not a stable
//! identifier. Appending new cases at the end of an open union is
//! non-breaking for old readers precisely because the body is length
//! framed: a reader that does not recognize the marker can skip the body
//! without understanding it. Inserting, reordering, or removing cases
//! renumbers the survivors and is always breaking.
//!
//! Frozen unions opt out of evolution: an unrecognized marker rejects the
//! whole decode.
//!
//! The protocol is stateless; there is no persistent state machine. The
//! derivation layer supplies the resolver closures, one arm per declared
//! case, exactly mirroring the declaration order it was built from.

use crate::cursor::ByteCursor;
use crate::errors::{Result, WireError};
use crate::format::PrefixWidth;
use crate::sink::ByteSink;

/// Encode one union case: marker, then the u32-framed body.
///
/// `body` serializes the case's associated values in declaration order,
/// positionally, with no field labels. A zero-argument case passes a
/// no-op body and still emits an empty frame, so every case has the same
/// shape on the wire.
///
/// # Errors
///
/// `LengthOverflow` if the body measures past `u32::MAX` bytes; flush
/// failures propagate unchanged.
pub fn encode_case(
    sink: &mut ByteSink<'_>,
    marker: u16,
    body: impl FnOnce(&mut ByteSink<'_>) -> Result<()>,
) -> Result<()> {
    sink.write_u16(marker)?;
    sink.write_length_prefixed(PrefixWidth::U32, body)
}

/// Decode a frozen union: an unrecognized marker is fatal.
///
/// `resolve` is called with the marker and a cursor scoped to the framed
/// body; it returns `Ok(None)` when the marker matches no declared case,
/// which this function turns into [`WireError::UnknownValue`]. Frozen
/// types are not forward-compatible by contract: the decode is rejected,
/// never silently mapped to a default case.
///
/// # Errors
///
/// - `NeedMoreData` if the marker, the length, or the body is truncated.
/// - `UnknownValue` for a marker outside the declared case set.
/// - Whatever `resolve` fails with for a recognized case.
pub fn decode_frozen<T>(
    cursor: &mut ByteCursor<'_>,
    resolve: impl FnOnce(u16, &mut ByteCursor<'_>) -> Result<Option<T>>,
) -> Result<T> {
    let marker = cursor.read_u16()?;
    cursor.read_length_prefixed(PrefixWidth::U32, |body| {
        resolve(marker, body)?.ok_or(WireError::UnknownValue { value: u64::from(marker) })
    })
}

/// Decode an open union: an unrecognized marker yields the fallback.
///
/// Like [`decode_frozen`], but a marker that matches no declared case
/// produces `unknown()` instead of failing. The framed body has already
/// been consumed as a window by then, so the cursor sits exactly after
/// the unknown case's bytes and any subsequent sibling data still decodes
/// correctly.
///
/// # Errors
///
/// - `NeedMoreData` if the marker, the length, or the body is truncated.
///   An unknown case with an incomplete body is still incomplete input,
///   not skippable.
/// - Whatever `resolve` fails with for a recognized case.
pub fn decode_open<T>(
    cursor: &mut ByteCursor<'_>,
    resolve: impl FnOnce(u16, &mut ByteCursor<'_>) -> Result<Option<T>>,
    unknown: impl FnOnce() -> T,
) -> Result<T> {
    let marker = cursor.read_u16()?;
    cursor.read_length_prefixed(PrefixWidth::U32, |body| match resolve(marker, body)? {
        Some(value) => Ok(value),
        None => Ok(unknown()),
    })
}
