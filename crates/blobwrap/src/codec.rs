//! SSZ style binary encoding.
//!
//! Fixed size values are written verbatim. A container writes each fixed
//! field in place and a 4 byte little-endian offset for each variable field,
//! followed by the variable fields themselves in order. Lists carry no length
//! prefix: the number of elements is the size of the list span divided by the
//! encoded size of one element.
//!
//! Decoding is scope bound. A [`Decoder`] knows how many bytes the value it
//! is reading may consume, and every read is checked against that scope
//! before touching the underlying reader.
//!
//! Container offsets are written and checked by [`ssz`]. The element count
//! of a list is derived here, from the scope, so that an oversized list is
//! rejected before any of its elements is read.

use std::io::{self, Read};

pub use ssz::BYTES_PER_LENGTH_OFFSET;
use ssz::{SszDecoder, SszDecoderBuilder, SszEncoder};

use crate::{config::ProtocolParams, errors::SerializationError};

/// The largest value a 4 byte container offset can hold.
pub const MAX_ENCODED_LEN: usize = u32::MAX as usize;

/// A value with a binary encoding.
pub trait Encode {
    /// Returns true if every value of this type encodes to the same number of bytes.
    fn is_fixed_len() -> bool;

    /// The number of bytes [`Encode::encode`] appends.
    fn encoded_len(&self) -> usize;

    fn encode(&self, buf: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf
    }
}

/// A value that can be read back from its binary encoding.
pub trait Decode: Encode + Sized {
    /// The encoded length of a fixed size value, or of an offset for
    /// variable size values.
    fn ssz_fixed_len(_params: &ProtocolParams) -> usize {
        BYTES_PER_LENGTH_OFFSET
    }

    /// Decodes a value that spans the whole scope of `decoder`.
    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError>;

    /// Decodes a value into `self`, reusing any allocations it already owns.
    ///
    /// On error `self` is left in an unspecified but valid state.
    fn decode_into<R: Read>(
        &mut self,
        decoder: &mut Decoder<'_, R>,
    ) -> Result<(), SerializationError> {
        *self = Self::decode(decoder)?;
        Ok(())
    }

    /// Decodes a value that must consume every byte of `bytes`.
    fn from_ssz_bytes(bytes: &[u8], params: &ProtocolParams) -> Result<Self, SerializationError> {
        let mut decoder = Decoder::new(bytes, bytes.len() as u64, params);
        let value = Self::decode(&mut decoder)?;
        decoder.finish()?;
        Ok(value)
    }
}

/// A reader bounded by the number of bytes the current value may consume.
#[derive(Debug)]
pub struct Decoder<'p, R> {
    input: R,
    scope: u64,
    params: &'p ProtocolParams,
}

impl<'p, R: Read> Decoder<'p, R> {
    pub fn new(input: R, scope: u64, params: &'p ProtocolParams) -> Self {
        Self {
            input,
            scope,
            params,
        }
    }

    /// The number of bytes left in scope.
    pub const fn scope(&self) -> u64 {
        self.scope
    }

    pub const fn params(&self) -> &'p ProtocolParams {
        self.params
    }

    /// Fills `buf` from the input.
    ///
    /// Fails with [`SerializationError::Truncated`] without reading anything
    /// if the scope is smaller than `buf`, and also if the reader runs dry
    /// before the scope does.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), SerializationError> {
        let needed = buf.len() as u64;
        if needed > self.scope {
            return Err(SerializationError::Truncated {
                needed,
                available: self.scope,
            });
        }

        self.input.read_exact(buf).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => SerializationError::Truncated {
                needed,
                available: self.scope,
            },
            _ => SerializationError::Io(err),
        })?;
        self.scope -= needed;
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerializationError> {
        let mut bytes = [0u8; N];
        self.read_bytes(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads everything left in scope.
    ///
    /// The buffer grows with the bytes actually read, so a scope larger than
    /// the input does not allocate up front.
    pub fn read_scope(&mut self) -> Result<Vec<u8>, SerializationError> {
        let needed = self.scope;
        let mut bytes = Vec::new();
        (&mut self.input).take(needed).read_to_end(&mut bytes)?;
        if (bytes.len() as u64) < needed {
            return Err(SerializationError::Truncated {
                needed,
                available: bytes.len() as u64,
            });
        }
        self.scope = 0;
        Ok(bytes)
    }

    /// Derives the element count of a list spanning the whole scope.
    ///
    /// Nothing is read. The limit is checked before divisibility so that an
    /// oversized span is reported as such even if it is also misaligned.
    pub fn list_len(&self, element_size: usize, limit: usize) -> Result<usize, SerializationError> {
        let element_size = element_size as u64;
        let invalid_length = SerializationError::ListLengthInvalid {
            span: self.scope,
            element_size,
        };

        let count = self.scope.checked_div(element_size).ok_or(invalid_length)?;
        if count > limit as u64 {
            return Err(SerializationError::ListTooLarge {
                count,
                limit: limit as u64,
            });
        }
        if self.scope % element_size != 0 {
            return Err(SerializationError::ListLengthInvalid {
                span: self.scope,
                element_size,
            });
        }
        // count <= limit, which is a usize
        Ok(count as usize)
    }

    /// Checks that the scope was fully consumed.
    pub fn finish(self) -> Result<(), SerializationError> {
        match self.scope {
            0 => Ok(()),
            remaining => Err(SerializationError::TrailingBytes { remaining }),
        }
    }
}

/// Encoded length contributed by one container field.
pub fn container_field_len<T: Encode>(field: &T) -> usize {
    if T::is_fixed_len() {
        field.encoded_len()
    } else {
        BYTES_PER_LENGTH_OFFSET + field.encoded_len()
    }
}

/// The fixed part length of a container field.
pub fn fixed_part_len<T: Encode>(field: &T) -> usize {
    if T::is_fixed_len() {
        field.encoded_len()
    } else {
        BYTES_PER_LENGTH_OFFSET
    }
}

/// Fails if an encoding of `len` bytes cannot be addressed by container offsets.
pub fn ensure_offset_range(len: usize) -> Result<(), SerializationError> {
    if len > MAX_ENCODED_LEN {
        return Err(SerializationError::EncodingTooLarge {
            len,
            max: MAX_ENCODED_LEN,
        });
    }
    Ok(())
}

/// Writes the fields of a container, deferring variable fields behind offsets.
pub struct ContainerEncoder<'a> {
    encoder: SszEncoder<'a>,
}

impl<'a> ContainerEncoder<'a> {
    /// `fixed_part_len` is the sum over all fields of either their encoded
    /// length, for fixed fields, or [`BYTES_PER_LENGTH_OFFSET`].
    pub fn new(buf: &'a mut Vec<u8>, fixed_part_len: usize) -> Self {
        Self {
            encoder: SszEncoder::container(buf, fixed_part_len),
        }
    }

    pub fn append<T: Encode>(&mut self, field: &T) {
        self.encoder
            .append_parameterized(T::is_fixed_len(), |buf| field.encode(buf));
    }

    pub fn finalize(mut self) {
        self.encoder.finalize();
    }
}

/// Splits the bytes of a container into its fields.
///
/// Every field is declared with [`ContainerDecoder::register`], in order.
/// [`ContainerDecoder::build`] then checks the offsets: the first one must
/// point right after the fixed part, and each one must lie between the
/// previous one and the end of the container.
pub struct ContainerDecoder<'b, 'p> {
    builder: SszDecoderBuilder<'b>,
    params: &'p ProtocolParams,
}

impl<'b, 'p> ContainerDecoder<'b, 'p> {
    pub fn new(bytes: &'b [u8], params: &'p ProtocolParams) -> Self {
        Self {
            builder: SszDecoderBuilder::new(bytes),
            params,
        }
    }

    /// Declares the next field of the container.
    pub fn register<T: Decode>(&mut self) -> Result<(), SerializationError> {
        self.builder
            .register_type_parameterized(T::is_fixed_len(), T::ssz_fixed_len(self.params))?;
        Ok(())
    }

    pub fn build(self) -> Result<ContainerFields<'b, 'p>, SerializationError> {
        Ok(ContainerFields {
            fields: self.builder.build()?,
            params: self.params,
        })
    }
}

/// The fields of a container, decoded one after the other in declaration order.
pub struct ContainerFields<'b, 'p> {
    fields: SszDecoder<'b>,
    params: &'p ProtocolParams,
}

impl<'b> ContainerFields<'b, '_> {
    fn next_span(&mut self) -> Result<&'b [u8], SerializationError> {
        Ok(self.fields.decode_next_with(|span| Ok(span))?)
    }

    /// Decodes the next field, which must consume its whole span.
    pub fn decode_next<T: Decode>(&mut self) -> Result<T, SerializationError> {
        let span = self.next_span()?;
        T::from_ssz_bytes(span, self.params)
    }

    /// Decodes the next field into `value`, reusing its allocations.
    pub fn decode_next_into<T: Decode>(&mut self, value: &mut T) -> Result<(), SerializationError> {
        let span = self.next_span()?;
        let mut decoder = Decoder::new(span, span.len() as u64, self.params);
        value.decode_into(&mut decoder)?;
        decoder.finish()
    }
}

impl Encode for u64 {
    fn is_fixed_len() -> bool {
        true
    }

    fn encoded_len(&self) -> usize {
        8
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }
}

impl Decode for u64 {
    fn ssz_fixed_len(_: &ProtocolParams) -> usize {
        8
    }

    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        decoder.read_array::<8>().map(Self::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A container with a fixed field between two variable ones.
    #[derive(Debug, PartialEq, Eq)]
    struct Pair {
        head: Vec<u8>,
        nonce: u64,
        tail: Vec<u8>,
    }

    impl Encode for Vec<u8> {
        fn is_fixed_len() -> bool {
            false
        }

        fn encoded_len(&self) -> usize {
            self.len()
        }

        fn encode(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(self);
        }
    }

    impl Decode for Vec<u8> {
        fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
            let mut bytes = vec![0u8; decoder.scope() as usize];
            decoder.read_bytes(&mut bytes)?;
            Ok(bytes)
        }
    }

    impl Encode for Pair {
        fn is_fixed_len() -> bool {
            false
        }

        fn encoded_len(&self) -> usize {
            container_field_len(&self.head)
                + container_field_len(&self.nonce)
                + container_field_len(&self.tail)
        }

        fn encode(&self, buf: &mut Vec<u8>) {
            let fixed = fixed_part_len(&self.head)
                + fixed_part_len(&self.nonce)
                + fixed_part_len(&self.tail);
            let mut container = ContainerEncoder::new(buf, fixed);
            container.append(&self.head);
            container.append(&self.nonce);
            container.append(&self.tail);
            container.finalize();
        }
    }

    impl Decode for Pair {
        fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
            let bytes = decoder.read_scope()?;
            let mut container = ContainerDecoder::new(&bytes, decoder.params());
            container.register::<Vec<u8>>()?;
            container.register::<u64>()?;
            container.register::<Vec<u8>>()?;

            let mut fields = container.build()?;
            Ok(Self {
                head: fields.decode_next()?,
                nonce: fields.decode_next()?,
                tail: fields.decode_next()?,
            })
        }
    }

    fn pair() -> Pair {
        Pair {
            head: vec![1, 2, 3],
            nonce: 0x0102_0304,
            tail: vec![9; 5],
        }
    }

    #[test]
    fn container_layout() {
        let bytes = pair().to_bytes();
        assert_eq!(bytes.len(), pair().encoded_len());
        // Fixed part is 4 + 8 + 4 bytes.
        assert_eq!(&bytes[0..4], &16u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &0x0102_0304u64.to_le_bytes());
        assert_eq!(&bytes[12..16], &19u32.to_le_bytes());
        assert_eq!(&bytes[16..19], &[1, 2, 3]);
        assert_eq!(&bytes[19..], &[9; 5]);

        let params = ProtocolParams::minimal();
        assert_eq!(Pair::from_ssz_bytes(&bytes, &params).unwrap(), pair());
    }

    #[test]
    fn rejects_first_offset_inside_fixed_part() {
        let params = ProtocolParams::minimal();
        let mut bytes = pair().to_bytes();
        bytes[0..4].copy_from_slice(&12u32.to_le_bytes());
        assert!(matches!(
            Pair::from_ssz_bytes(&bytes, &params),
            Err(SerializationError::InvalidOffset { offset: 12 })
        ));
    }

    #[test]
    fn rejects_decreasing_offsets() {
        let params = ProtocolParams::minimal();
        let mut bytes = pair().to_bytes();
        bytes[12..16].copy_from_slice(&15u32.to_le_bytes());
        assert!(matches!(
            Pair::from_ssz_bytes(&bytes, &params),
            Err(SerializationError::InvalidOffset { offset: 15 })
        ));
    }

    #[test]
    fn rejects_offset_past_the_end() {
        let params = ProtocolParams::minimal();
        let mut bytes = pair().to_bytes();
        bytes[12..16].copy_from_slice(&100u32.to_le_bytes());
        assert!(matches!(
            Pair::from_ssz_bytes(&bytes, &params),
            Err(SerializationError::InvalidOffset { offset: 100 })
        ));
    }

    #[test]
    fn truncated_offset() {
        let params = ProtocolParams::minimal();
        let bytes = pair().to_bytes();
        assert!(matches!(
            Pair::from_ssz_bytes(&bytes[..2], &params),
            Err(SerializationError::Truncated { needed: 4, available: 2 })
        ));
    }

    #[test]
    fn offsets_split_the_variable_part() {
        let params = ProtocolParams::minimal();
        let mut bytes = pair().to_bytes();
        // One byte of the tail now belongs to the head.
        bytes[12..16].copy_from_slice(&20u32.to_le_bytes());
        let decoded = Pair::from_ssz_bytes(&bytes, &params).unwrap();
        assert_eq!(decoded.head, vec![1, 2, 3, 9]);
        assert_eq!(decoded.tail, vec![9; 4]);
    }

    #[test]
    fn read_scope_takes_the_whole_scope() {
        let params = ProtocolParams::minimal();
        let mut input: &[u8] = &[1, 2, 3, 4, 5];
        let mut decoder = Decoder::new(&mut input, 3, &params);
        assert_eq!(decoder.read_scope().unwrap(), vec![1, 2, 3]);
        assert_eq!(decoder.scope(), 0);
        decoder.finish().unwrap();
        assert_eq!(input, &[4, 5]);

        let mut decoder = Decoder::new(&[1u8, 2][..], 3, &params);
        assert!(matches!(
            decoder.read_scope(),
            Err(SerializationError::Truncated { needed: 3, available: 2 })
        ));
    }

    #[test]
    fn offsets_must_fit_in_four_bytes() {
        ensure_offset_range(MAX_ENCODED_LEN).unwrap();
        assert!(matches!(
            ensure_offset_range(MAX_ENCODED_LEN + 1),
            Err(SerializationError::EncodingTooLarge { len, max })
                if len == MAX_ENCODED_LEN + 1 && max == u32::MAX as usize
        ));
    }

    #[test]
    fn scope_is_checked_before_reading() {
        let params = ProtocolParams::minimal();
        let mut input: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8];
        let mut decoder = Decoder::new(&mut input, 4, &params);
        assert!(matches!(
            u64::decode(&mut decoder),
            Err(SerializationError::Truncated { needed: 8, available: 4 })
        ));
        assert_eq!(input.len(), 8);
    }

    #[test]
    fn short_reader_is_truncated() {
        let params = ProtocolParams::minimal();
        let input: &[u8] = &[1, 2, 3];
        let mut decoder = Decoder::new(input, 8, &params);
        assert!(matches!(
            u64::decode(&mut decoder),
            Err(SerializationError::Truncated { needed: 8, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let params = ProtocolParams::minimal();
        assert!(matches!(
            u64::from_ssz_bytes(&[0u8; 9], &params),
            Err(SerializationError::TrailingBytes { remaining: 1 })
        ));
        assert_eq!(u64::from_ssz_bytes(&7u64.to_le_bytes(), &params).unwrap(), 7);
    }

    #[test]
    fn list_len_checks_limit_first() {
        let params = ProtocolParams::minimal();
        let decoder = Decoder::new(io::empty(), 49, &params);
        assert!(matches!(
            decoder.list_len(48, 0),
            Err(SerializationError::ListTooLarge { count: 1, limit: 0 })
        ));
        assert!(matches!(
            decoder.list_len(48, 1),
            Err(SerializationError::ListLengthInvalid { span: 49, element_size: 48 })
        ));

        let decoder = Decoder::new(io::empty(), 96, &params);
        assert_eq!(decoder.list_len(48, 2).unwrap(), 2);
    }
}
