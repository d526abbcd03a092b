//! Seeded segmentation of a byte stream into arbitrary chunks.
//!
//! Streaming tests need "the network delivered these bytes in awkward
//! pieces" without flaky randomness: the chunk layout is derived from an
//! explicit seed, so a failing case reproduces from its seed alone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest chunk [`chunk_bytes`] will produce.
pub const MAX_CHUNK: usize = 7;

/// Split `bytes` into non-empty chunks whose sizes are drawn from a
/// ChaCha stream seeded with `seed`.
///
/// Concatenating the chunks always reproduces `bytes` exactly; only the
/// cut points vary by seed. Chunks are deliberately small (at most
/// [`MAX_CHUNK`] bytes) so multi-byte values routinely straddle chunk
/// boundaries.
#[must_use]
pub fn chunk_bytes(bytes: &[u8], seed: u64) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let cap = MAX_CHUNK.min(bytes.len() - pos);
        let take = rng.gen_range(1..=cap);
        chunks.push(bytes[pos..pos + take].to_vec());
        pos += take;
    }
    chunks
}
