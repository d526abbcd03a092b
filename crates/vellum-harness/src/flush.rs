//! Recording flush sink with fault injection.
//!
//! Stands in for the transport adapter on the encode side: records every
//! segment the sink flushes (so tests can assert on flush granularity as
//! well as content) and can be armed to fail after a set number of
//! calls, which is how the abort-on-flush-error contract is proven.

use vellum_wire::{Result, WireError};

/// Test-double flush target.
#[derive(Debug, Default)]
pub struct RecordingFlush {
    segments: Vec<Vec<u8>>,
    fail_after: Option<usize>,
}

impl RecordingFlush {
    /// A sink that accepts every flush.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts `calls` flushes and fails every one after.
    #[must_use]
    pub fn failing_after(calls: usize) -> Self {
        Self { segments: Vec::new(), fail_after: Some(calls) }
    }

    /// The flush callback body: pass `|bytes| recorder.push(bytes)` to
    /// [`vellum_wire::ByteSink::new`] or [`vellum_wire::encode_with`].
    ///
    /// # Errors
    ///
    /// `WireError::Flush` once the armed call budget is spent; the
    /// failing segment is not recorded.
    pub fn push(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(budget) = self.fail_after {
            if self.segments.len() >= budget {
                return Err(WireError::Flush("injected flush failure".to_string()));
            }
        }
        self.segments.push(bytes.to_vec());
        Ok(())
    }

    /// Every segment flushed so far, in order.
    #[must_use]
    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// All flushed bytes, concatenated.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.segments.concat()
    }

    /// Number of successful flush calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_segments_in_order() {
        let mut recorder = RecordingFlush::new();
        recorder.push(&[1, 2]).unwrap();
        recorder.push(&[3]).unwrap();
        assert_eq!(recorder.calls(), 2);
        assert_eq!(recorder.bytes(), [1, 2, 3]);
    }

    #[test]
    fn armed_failure_triggers_after_budget() {
        let mut recorder = RecordingFlush::failing_after(1);
        recorder.push(&[1]).unwrap();
        assert_eq!(
            recorder.push(&[2]),
            Err(WireError::Flush("injected flush failure".to_string()))
        );
        // The failed segment was not recorded.
        assert_eq!(recorder.bytes(), [1]);
    }
}
