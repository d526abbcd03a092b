//! Ordered field concatenation: the record codec.
//!
//! A record is its fields' encodings concatenated in declaration order,
//! with no record-level framing and no field labels: field order is the
//! implicit shared schema between encoder and decoder. Two parties that
//! disagree on that order cannot detect the mismatch from the bytes:
//! the decode "succeeds" and silently corrupts data. Keeping encode and
//! decode generated from one declaration is the whole correctness story.
//!
//! The tuple impls below are the canonical shape: encode each position
//! left to right, decode and assign each position left to right. A derive
//! layer (or a hand-written adapter; see the harness crate's message
//! types) produces exactly this pattern for named structs.

use crate::codec::{Decode, Encode};
use crate::cursor::ByteCursor;
use crate::errors::Result;
use crate::sink::ByteSink;

/// The empty record: zero fields, zero bytes.
impl Encode for () {
    fn encode(&self, _sink: &mut ByteSink<'_>) -> Result<()> {
        Ok(())
    }
}

impl Decode for () {
    fn decode(_cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(())
    }
}

macro_rules! record_impls {
    ($( ( $($field:ident . $idx:tt),+ ) ),+ $(,)?) => {
        $(
            impl<$($field: Encode),+> Encode for ($($field,)+) {
                fn encode(&self, sink: &mut ByteSink<'_>) -> Result<()> {
                    $( self.$idx.encode(sink)?; )+
                    Ok(())
                }
            }

            impl<$($field: Decode),+> Decode for ($($field,)+) {
                fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
                    // Tuple expressions evaluate left to right: fields are
                    // decoded and assigned in declaration order.
                    Ok(($( $field::decode(cursor)?, )+))
                }
            }
        )+
    };
}

record_impls! {
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
    (A.0, B.1, C.2, D.3, E.4),
    (A.0, B.1, C.2, D.3, E.4, F.5),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7),
}
