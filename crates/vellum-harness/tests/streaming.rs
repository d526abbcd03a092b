//! Streaming behavior: chunked arrival, retry-from-start semantics, and
//! flush-failure abort on the encode side.

use vellum_harness::chunker::chunk_bytes;
use vellum_harness::flush::RecordingFlush;
use vellum_harness::messages::{ClientAction, ClientProfile};
use vellum_wire::{encode_to_vec, encode_with, ByteOrder, StreamDecoder, WireError};

fn sample_profile() -> ClientProfile {
    ClientProfile {
        app_version: 14,
        username: "ann".to_string(),
        actions: vec![
            ClientAction::Joined,
            ClientAction::Renamed("x".to_string()),
            ClientAction::Reacted("+1".to_string(), 42),
        ],
    }
}

#[test]
fn chunked_arrival_reaches_the_one_shot_result() {
    let profile = sample_profile();
    let wire = encode_to_vec(&profile).unwrap();

    for seed in 0..16 {
        let chunks = chunk_bytes(&wire, seed);
        let mut decoder = StreamDecoder::new();
        let mut decoded = None;

        for (index, chunk) in chunks.iter().enumerate() {
            decoder.feed(chunk);
            match decoder.try_decode::<ClientProfile>().unwrap() {
                Some(value) => {
                    // The value completes only once its final byte arrived.
                    assert_eq!(index, chunks.len() - 1, "seed {seed}");
                    decoded = Some(value);
                },
                None => assert!(index < chunks.len() - 1, "seed {seed}"),
            }
        }

        assert_eq!(decoded.as_ref(), Some(&profile), "seed {seed}");
    }
}

#[test]
fn back_to_back_values_drain_in_order() {
    let first = sample_profile();
    let second = ClientProfile {
        app_version: 15,
        username: "bee".to_string(),
        actions: vec![],
    };

    let mut wire = encode_to_vec(&first).unwrap();
    wire.extend(encode_to_vec(&second).unwrap());

    for seed in [3u64, 11, 27] {
        let mut decoder = StreamDecoder::new();
        let mut decoded = Vec::new();
        for chunk in chunk_bytes(&wire, seed) {
            decoder.feed(&chunk);
            while let Some(profile) = decoder.try_decode::<ClientProfile>().unwrap() {
                decoded.push(profile);
            }
        }
        assert_eq!(decoded, vec![first.clone(), second.clone()], "seed {seed}");
        assert_eq!(decoder.buffered(), 0, "seed {seed}");
    }
}

#[test]
fn streamed_encode_matches_buffered_encode() {
    let profile = sample_profile();
    let mut recorder = RecordingFlush::new();
    encode_with(&profile, ByteOrder::Big, |bytes| recorder.push(bytes)).unwrap();
    assert_eq!(recorder.bytes(), encode_to_vec(&profile).unwrap());
    // Incremental: the sink flushed per write, not once at the end.
    assert!(recorder.calls() > 1);
}

#[test]
fn failing_flush_aborts_the_encode() {
    let profile = sample_profile();
    let mut recorder = RecordingFlush::failing_after(2);
    let result = encode_with(&profile, ByteOrder::Big, |bytes| recorder.push(bytes));
    assert_eq!(result, Err(WireError::Flush("injected flush failure".to_string())));
    assert_eq!(recorder.calls(), 2);
}

#[test]
fn rejected_stream_is_not_retryable() {
    // A frame whose body holds invalid UTF-8 where a string is required:
    // feeding more bytes can never fix it.
    let valid = encode_to_vec(&ClientAction::Renamed("ab".to_string())).unwrap();
    let mut corrupted = valid.clone();
    let len = corrupted.len();
    corrupted[len - 2] = 0xFF;

    let mut decoder = StreamDecoder::new();
    decoder.feed(&corrupted);
    let err = decoder.try_decode::<ClientAction>().unwrap_err();
    assert!(!err.is_incomplete());
    assert_eq!(err, WireError::InvalidUtf8 { valid_up_to: 0 });
}
