//! Error types for the Vellum wire format.
//!
//! The one distinction that matters to callers is retryable vs. fatal:
//! [`WireError::NeedMoreData`] means the input is incomplete, every other
//! variant means the stream (or the value being encoded) is rejected. We
//! avoid `std::io::Error` in codec logic to keep errors structured and
//! testable; the `From` impl below exists only for boundary conversion.

use std::io;

use thiserror::Error;

/// Errors that can occur while encoding to or decoding from the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Fewer bytes are available than the format currently requires.
    ///
    /// This is the only retryable error: callers holding a growing buffer
    /// should retain the unconsumed bytes and retry the decode from its
    /// start once more data arrives. It is never produced for malformed
    /// input, only for incomplete input.
    #[error("need more data: required {needed} bytes, only {available} available")]
    NeedMoreData {
        /// Bytes required from the current position
        needed: usize,
        /// Bytes actually remaining
        available: usize,
    },

    /// A frozen union saw an unrecognized marker, or a scalar-backed type
    /// had no matching case for a decoded value.
    #[error("no matching case for value {value}")]
    UnknownValue {
        /// The marker or raw scalar that failed to resolve
        value: u64,
    },

    /// Malformed text where UTF-8 was required and the decode policy is
    /// strict.
    #[error("invalid utf-8 after {valid_up_to} valid bytes")]
    InvalidUtf8 {
        /// Length of the valid prefix, as reported by the validator
        valid_up_to: usize,
    },

    /// Encode-time only: a length-prefixed body's measured size exceeds
    /// what its prefix width can represent.
    #[error("body length {length} exceeds maximum {max} for the prefix width")]
    LengthOverflow {
        /// Measured body length in bytes
        length: usize,
        /// Largest length the prefix can carry
        max: u64,
    },

    /// Nested length-prefixed framing exceeded the configured depth cap.
    ///
    /// A corrupt or hostile payload can claim arbitrarily deep nesting;
    /// the cap bounds decode recursion before the call stack does.
    #[error("nesting depth exceeds limit {max}")]
    DepthLimitExceeded {
        /// The configured maximum depth
        max: u16,
    },

    /// The caller-supplied flush callback failed.
    ///
    /// The current encode is aborted; the message carries whatever the
    /// transport adapter reported.
    #[error("flush failed: {0}")]
    Flush(String),
}

/// Convenient Result type alias for wire operations
pub type Result<T> = std::result::Result<T, WireError>;

impl WireError {
    /// Returns true if this error means "incomplete input, retry later".
    ///
    /// Streaming callers branch on this to wait for more bytes. Every
    /// other variant indicates a rejected, non-retryable stream or a
    /// failed encode.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, WireError::NeedMoreData { .. })
    }
}

/// Convert WireError to io::Error for compatibility with I/O boundaries.
///
/// This is only for boundary conversion - internally we use WireError.
impl From<WireError> for io::Error {
    fn from(err: WireError) -> Self {
        let kind = match &err {
            WireError::NeedMoreData { .. } => io::ErrorKind::UnexpectedEof,
            WireError::UnknownValue { .. }
            | WireError::InvalidUtf8 { .. }
            | WireError::LengthOverflow { .. }
            | WireError::DepthLimitExceeded { .. } => io::ErrorKind::InvalidData,
            WireError::Flush(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn need_more_data_is_incomplete() {
        assert!(WireError::NeedMoreData { needed: 4, available: 1 }.is_incomplete());
    }

    #[test]
    fn parse_failures_are_fatal() {
        assert!(!WireError::UnknownValue { value: 7 }.is_incomplete());
        assert!(!WireError::InvalidUtf8 { valid_up_to: 2 }.is_incomplete());
        assert!(!WireError::LengthOverflow { length: 300, max: 255 }.is_incomplete());
        assert!(!WireError::DepthLimitExceeded { max: 64 }.is_incomplete());
        assert!(!WireError::Flush("socket closed".to_string()).is_incomplete());
    }

    #[test]
    fn io_boundary_conversion_preserves_retryability() {
        let io_err: io::Error = WireError::NeedMoreData { needed: 8, available: 0 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);

        let io_err: io::Error = WireError::UnknownValue { value: 3 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
