use std::{fmt, io::Read};

use crate::{
    codec::{Decode, Decoder, Encode},
    config::ProtocolParams,
    constants::BYTES_PER_FIELD_ELEMENT,
    errors::SerializationError,
    merkle::{Hash256, TreeHash},
    tree_hash_not_packed,
};

/// The raw 32 byte encoding of one blob field element.
///
/// No range check happens here: whether the bytes are a canonical scalar is
/// only decided when a blob is handed to a commitment scheme.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldElement(pub [u8; BYTES_PER_FIELD_ELEMENT]);

impl FieldElement {
    pub const ZERO: Self = Self([0u8; BYTES_PER_FIELD_ELEMENT]);

    pub const fn as_bytes(&self) -> &[u8; BYTES_PER_FIELD_ELEMENT] {
        &self.0
    }
}

impl From<[u8; BYTES_PER_FIELD_ELEMENT]> for FieldElement {
    fn from(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Reads exactly `count` field elements into `elements`.
///
/// If `elements` can already hold `count` elements its buffer is reused as
/// is. Otherwise a buffer of exactly `count` elements is allocated.
pub fn read_field_elements<R: Read>(
    decoder: &mut Decoder<'_, R>,
    elements: &mut Vec<FieldElement>,
    count: usize,
) -> Result<(), SerializationError> {
    let needed = (count * BYTES_PER_FIELD_ELEMENT) as u64;
    if needed > decoder.scope() {
        return Err(SerializationError::Truncated {
            needed,
            available: decoder.scope(),
        });
    }

    if elements.capacity() >= count {
        elements.resize(count, FieldElement::ZERO);
    } else {
        *elements = vec![FieldElement::ZERO; count];
    }

    for element in elements.iter_mut() {
        decoder.read_bytes(&mut element.0)?;
    }
    Ok(())
}

pub fn write_field_elements(buf: &mut Vec<u8>, elements: &[FieldElement]) {
    buf.reserve(elements.len() * BYTES_PER_FIELD_ELEMENT);
    for element in elements {
        buf.extend_from_slice(&element.0);
    }
}

impl Encode for FieldElement {
    fn is_fixed_len() -> bool {
        true
    }

    fn encoded_len(&self) -> usize {
        BYTES_PER_FIELD_ELEMENT
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }
}

impl Decode for FieldElement {
    fn ssz_fixed_len(_: &ProtocolParams) -> usize {
        BYTES_PER_FIELD_ELEMENT
    }

    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        decoder.read_array().map(Self)
    }
}

impl TreeHash for FieldElement {
    tree_hash_not_packed!(Vector);

    fn tree_hash_root(&self) -> Hash256 {
        Hash256::from(self.0)
    }
}
