//! Tagged-union evolution: open forward compatibility, frozen rejection,
//! and framing safety under corrupted lengths.

use vellum_harness::messages::{
    Channel, ClientAction, ClientActionV1, ClientProfile, ClientProfileV1,
};
use vellum_wire::tagged::encode_case;
use vellum_wire::{
    decode_from_slice, encode_to_vec, ByteCursor, ByteOrder, ByteSink, Decode, Result, WireError,
};

#[test]
fn old_reader_survives_appended_case() {
    // The writer knows `Reacted` (marker 2); the V1 reader's definition
    // was fixed before that case existed.
    let profile = ClientProfile {
        app_version: 14,
        username: "ann".to_string(),
        actions: vec![
            ClientAction::Joined,
            ClientAction::Reacted("+1".to_string(), 42),
            ClientAction::Renamed("bee".to_string()),
        ],
    };
    let wire = encode_to_vec(&profile).unwrap();

    let old: ClientProfileV1 = decode_from_slice(&wire).unwrap();
    assert_eq!(old.app_version, 14);
    assert_eq!(old.username, "ann");
    assert_eq!(
        old.actions,
        vec![
            ClientActionV1::Joined,
            ClientActionV1::Unknown,
            ClientActionV1::Renamed("bee".to_string()),
        ]
    );
}

#[test]
fn unknown_case_leaves_cursor_exactly_past_its_body() {
    // An unknown case followed by sibling data: after the fallback, the
    // sibling must still decode, proving the framed body was skipped
    // byte-exactly.
    let mut wire = Vec::new();
    {
        let mut flush = |bytes: &[u8]| -> Result<()> {
            wire.extend_from_slice(bytes);
            Ok(())
        };
        let mut sink = ByteSink::new(ByteOrder::Big, &mut flush);
        encode_case(&mut sink, 57, |body| {
            body.write_u64(0xDEAD_BEEF_DEAD_BEEF)?;
            body.write_str("future payload")
        })
        .unwrap();
        sink.write_u32(0xCAFE_F00D).unwrap();
    }

    let mut cursor = ByteCursor::new(&wire);
    assert_eq!(ClientActionV1::decode(&mut cursor).unwrap(), ClientActionV1::Unknown);
    assert_eq!(cursor.read_u32().unwrap(), 0xCAFE_F00D);
    assert!(cursor.is_exhausted());
}

#[test]
fn frozen_union_rejects_unrecognized_marker() {
    let mut wire = Vec::new();
    {
        let mut flush = |bytes: &[u8]| -> Result<()> {
            wire.extend_from_slice(bytes);
            Ok(())
        };
        let mut sink = ByteSink::new(ByteOrder::Big, &mut flush);
        // A marker Channel never declared.
        encode_case(&mut sink, 7, |_| Ok(())).unwrap();
    }
    assert_eq!(
        decode_from_slice::<Channel>(&wire),
        Err(WireError::UnknownValue { value: 7 })
    );
}

#[test]
fn frozen_union_never_maps_to_a_default_case() {
    // Same bytes as a valid Relayed frame except the marker; the decoder
    // must not fall back to Direct or misparse the body.
    let valid = encode_to_vec(&Channel::Relayed("hub".to_string())).unwrap();
    let mut corrupted = valid.clone();
    corrupted[1] = 9; // marker 1 -> 9
    assert_eq!(
        decode_from_slice::<Channel>(&corrupted),
        Err(WireError::UnknownValue { value: 9 })
    );
}

#[test]
fn corrupted_body_length_is_need_more_data() {
    // A valid Relayed frame whose u32 body length is inflated far past
    // the buffer: the decode must fail before reading any body byte.
    let mut wire = encode_to_vec(&Channel::Relayed("hub".to_string())).unwrap();
    // Bytes 2..6 hold the body length.
    wire[2..6].copy_from_slice(&0x00FF_FFFFu32.to_be_bytes());
    match decode_from_slice::<Channel>(&wire) {
        Err(WireError::NeedMoreData { needed, available }) => {
            assert_eq!(needed, 0x00FF_FFFF);
            assert_eq!(available, wire.len() - 6);
        },
        other => panic!("expected NeedMoreData, got {other:?}"),
    }
}

#[test]
fn truncated_marker_is_need_more_data() {
    assert_eq!(
        decode_from_slice::<ClientAction>(&[0x00]),
        Err(WireError::NeedMoreData { needed: 2, available: 1 })
    );
}
