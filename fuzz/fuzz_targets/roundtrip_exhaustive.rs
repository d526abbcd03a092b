//! Exhaustive positive-space fuzzer for encode/decode round-trips.
//!
//! Unlike random decoding (decode_arbitrary.rs), this target builds
//! known-valid values from edge-case tables, letting the fuzzer pick the
//! combination, and asserts the full round-trip contract: encode
//! succeeds, decode reproduces the value bit-exactly, and every strict
//! prefix of the encoding reports NeedMoreData.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vellum_harness::messages::{ClientAction, ClientProfile};
use vellum_wire::{decode_from_slice, encode_to_vec, WireError};

// Edge-case values for the u32 version field
const VERSIONS: &[u32] = &[0, 1, 0x1000, u16::MAX as u32, u32::MAX - 1, u32::MAX];

// Edge-case values for u64 message indices
const U64_EDGES: &[u64] = &[0, 1, u32::MAX as u64, u64::MAX / 2, u64::MAX - 1, u64::MAX];

// Usernames covering empty, ASCII, and multi-byte UTF-8
const USERNAMES: &[&str] = &["", "a", "ann", "zo\u{00EB}", "\u{65E5}\u{672C}\u{8A9E}", "\u{1F980}"];

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let version = VERSIONS[data[0] as usize % VERSIONS.len()];
    let username = USERNAMES[data[1] as usize % USERNAMES.len()];
    let index = U64_EDGES[data[2] as usize % U64_EDGES.len()];

    // Remaining input bytes drive the action list, one action per byte.
    let actions: Vec<ClientAction> = data[3..]
        .iter()
        .take(32)
        .map(|byte| match byte % 3 {
            0 => ClientAction::Joined,
            1 => ClientAction::Renamed(username.to_string()),
            _ => ClientAction::Reacted("+1".to_string(), index),
        })
        .collect();

    let profile = ClientProfile {
        app_version: version,
        username: username.to_string(),
        actions,
    };

    // INVARIANT 1: encoding a valid value never fails.
    let wire = encode_to_vec(&profile).expect("encode should never fail for a valid profile");

    // INVARIANT 2: round-trip is identity.
    let decoded: ClientProfile =
        decode_from_slice(&wire).expect("decode should succeed for a valid encoding");
    assert_eq!(decoded, profile);

    // INVARIANT 3: every strict prefix is incomplete, never malformed.
    for cut in [0, 1, wire.len() / 2, wire.len().saturating_sub(1)] {
        if cut < wire.len() {
            match decode_from_slice::<ClientProfile>(&wire[..cut]) {
                Err(WireError::NeedMoreData { .. }) => {},
                other => panic!("prefix of {cut} bytes gave {other:?}"),
            }
        }
    }
});
