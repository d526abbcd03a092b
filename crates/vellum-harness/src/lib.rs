//! Deterministic test harness for the Vellum wire format.
//!
//! The runtime in `vellum-wire` leans on two external collaborators: a
//! derivation layer that produces per-type codec impls, and a transport
//! adapter that supplies arriving bytes and accepts flushed ones. This
//! crate provides deterministic stand-ins for both, plus the integration
//! tests that drive the runtime through them:
//!
//! - [`messages`]: a reference schema with hand-written `Encode`/`Decode`
//!   impls in exactly the shape a derive layer generates, including a
//!   deliberately out-of-date reader for forward-compatibility tests.
//! - [`chunker`]: seeded splitting of a byte stream into awkward chunks,
//!   so `NeedMoreData` retry loops are exercised reproducibly.
//! - [`flush`]: a recording flush sink with fault injection.
//!
//! Everything here is synchronous and seeded: a failing test reproduces
//! from its inputs alone.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chunker;
pub mod flush;
pub mod messages;

pub use chunker::chunk_bytes;
pub use flush::RecordingFlush;
pub use messages::{
    Channel, ClientAction, ClientActionV1, ClientProfile, ClientProfileV1,
};
