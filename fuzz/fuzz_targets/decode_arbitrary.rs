//! Negative-space fuzzer for the decode path.
//!
//! Arbitrary bytes go through every decoder entry point. The invariants:
//! no panic, no out-of-bounds read (the cursor is safe code over slices,
//! so the bounds checks themselves are under test here), and any decode
//! that does succeed must re-encode to bytes that decode to the same
//! value again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vellum_harness::messages::{Channel, ClientAction, ClientProfile};
use vellum_wire::{decode_from_slice, encode_to_vec, StreamDecoder, WireError};

fn contains_unknown(profile: &ClientProfile) -> bool {
    profile.actions.iter().any(|action| matches!(action, ClientAction::Unknown))
}

fuzz_target!(|data: &[u8]| {
    // INVARIANT 1: no decoder panics on arbitrary input.
    let _ = decode_from_slice::<u64>(data);
    let _ = decode_from_slice::<f64>(data);
    let _ = decode_from_slice::<bool>(data);
    let _ = decode_from_slice::<String>(data);
    let _ = decode_from_slice::<Vec<String>>(data);
    let _ = decode_from_slice::<Channel>(data);

    // INVARIANT 2: a successful decode re-encodes losslessly. Profiles
    // holding the unknown fallback are excluded: the skipped payload was
    // never captured, so they are not re-encodable by contract.
    if let Ok(profile) = decode_from_slice::<ClientProfile>(data) {
        if !contains_unknown(&profile) {
            let wire = encode_to_vec(&profile).expect("re-encode should succeed");
            let again: ClientProfile =
                decode_from_slice(&wire).expect("re-encoded bytes should decode");
            assert_eq!(again, profile);
        }
    }

    // INVARIANT 3: the streaming decoder agrees with the one-shot path
    // on whether the input is incomplete, malformed, or a value.
    let mut decoder = StreamDecoder::new();
    decoder.feed(data);
    match (decoder.try_decode::<ClientProfile>(), decode_from_slice::<ClientProfile>(data)) {
        (Ok(Some(streamed)), Ok(direct)) => assert_eq!(streamed, direct),
        (Ok(None), Err(WireError::NeedMoreData { .. })) => {},
        (Err(stream_err), Err(direct_err)) => assert_eq!(stream_err, direct_err),
        (streamed, direct) => {
            panic!("stream/one-shot disagreement: {streamed:?} vs {direct:?}")
        },
    }
});
