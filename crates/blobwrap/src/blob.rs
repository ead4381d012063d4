use std::{fmt, io::Read};

use crate::{
    codec::{Decode, Decoder, Encode},
    commitment::KzgCommitment,
    config::ProtocolParams,
    constants::BYTES_PER_FIELD_ELEMENT,
    errors::SerializationError,
    field_element::{read_field_elements, write_field_elements, FieldElement},
    merkle::{merkle_root, Hash256, TreeHash},
    scheme::CommitmentScheme,
    tree_hash_not_packed,
};

/// A blob: a fixed number of field elements, given by the protocol parameters.
///
/// The field elements are the evaluations of the blob polynomial over the
/// domain, in the same order as the Lagrange points of the trusted setup.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob(Vec<FieldElement>);

impl Blob {
    pub fn new(
        elements: Vec<FieldElement>,
        params: &ProtocolParams,
    ) -> Result<Self, SerializationError> {
        if elements.len() != params.field_elements_per_blob {
            return Err(SerializationError::BlobHasInvalidLength {
                length: elements.len() * BYTES_PER_FIELD_ELEMENT,
                expected: params.bytes_per_blob(),
            });
        }
        Ok(Self(elements))
    }

    /// Builds a blob from its raw encoding, which must be exactly one blob long.
    pub fn from_raw_bytes(
        bytes: &[u8],
        params: &ProtocolParams,
    ) -> Result<Self, SerializationError> {
        if bytes.len() != params.bytes_per_blob() {
            return Err(SerializationError::BlobHasInvalidLength {
                length: bytes.len(),
                expected: params.bytes_per_blob(),
            });
        }
        Self::from_ssz_bytes(bytes, params)
    }

    /// A blob of zero field elements, which commits to the identity point.
    pub fn zeroed(params: &ProtocolParams) -> Self {
        Self(vec![FieldElement::ZERO; params.field_elements_per_blob])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field_elements(&self) -> &[FieldElement] {
        &self.0
    }

    /// Mutable access to the field elements. The number of elements is fixed.
    pub fn field_elements_mut(&mut self) -> &mut [FieldElement] {
        &mut self.0
    }

    /// Interprets every field element as a scalar, failing if any is out of range.
    pub fn to_scalars<S: CommitmentScheme>(&self, scheme: &S) -> Option<Vec<S::Scalar>> {
        self.0
            .iter()
            .map(|element| scheme.scalar_from_field_element(element))
            .collect()
    }

    /// Commits to the blob.
    ///
    /// Returns `None` if a field element is not a canonical scalar, or the
    /// blob length does not match the scheme.
    pub fn compute_commitment<S: CommitmentScheme>(&self, scheme: &S) -> Option<KzgCommitment> {
        let scalars = self.to_scalars(scheme)?;
        let point = scheme.commit(&scalars)?;
        Some(scheme.compress(&point))
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("field_elements", &self.0.len())
            .field("root", &hex::encode(self.tree_hash_root()))
            .finish()
    }
}

impl Encode for Blob {
    fn is_fixed_len() -> bool {
        true
    }

    fn encoded_len(&self) -> usize {
        self.0.len() * BYTES_PER_FIELD_ELEMENT
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        write_field_elements(buf, &self.0);
    }
}

impl Decode for Blob {
    fn ssz_fixed_len(params: &ProtocolParams) -> usize {
        params.bytes_per_blob()
    }

    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        let mut blob = Self(Vec::new());
        blob.decode_into(decoder)?;
        Ok(blob)
    }

    fn decode_into<R: Read>(
        &mut self,
        decoder: &mut Decoder<'_, R>,
    ) -> Result<(), SerializationError> {
        let count = decoder.params().field_elements_per_blob;
        read_field_elements(decoder, &mut self.0, count)
    }
}

impl TreeHash for Blob {
    tree_hash_not_packed!(Vector);

    /// Every field element is one leaf.
    fn tree_hash_root(&self) -> Hash256 {
        merkle_root(&self.to_bytes(), self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use ethereum_hashing::hash32_concat;

    use super::*;
    use crate::scheme::mock::MockScheme;

    fn blob(params: &ProtocolParams) -> Blob {
        let elements = (0..params.field_elements_per_blob)
            .map(|i| FieldElement([i as u8 + 1; 32]))
            .collect();
        Blob::new(elements, params).unwrap()
    }

    #[test]
    fn rejects_wrong_length() {
        let params = ProtocolParams::minimal();
        assert!(matches!(
            Blob::new(vec![FieldElement::ZERO; 3], &params),
            Err(SerializationError::BlobHasInvalidLength { length: 96, expected: 128 })
        ));
        assert!(matches!(
            Blob::from_raw_bytes(&[0u8; 129], &params),
            Err(SerializationError::BlobHasInvalidLength { length: 129, expected: 128 })
        ));
        assert_eq!(Blob::from_raw_bytes(&[0u8; 128], &params).unwrap(), Blob::zeroed(&params));
    }

    #[test]
    fn encoding_is_the_concatenated_elements() {
        let params = ProtocolParams::minimal();
        let blob = blob(&params);
        let bytes = blob.to_bytes();
        assert_eq!(bytes.len(), Blob::ssz_fixed_len(&params));
        assert_eq!(&bytes[32..64], &[2u8; 32]);
        assert_eq!(Blob::from_ssz_bytes(&bytes, &params).unwrap(), blob);

        assert!(matches!(
            Blob::from_ssz_bytes(&bytes[..100], &params),
            Err(SerializationError::Truncated { needed: 128, available: 100 })
        ));
    }

    #[test]
    fn decode_into_reuses_the_allocation() {
        let params = ProtocolParams::minimal();
        let bytes = blob(&params).to_bytes();

        let mut target = Blob::zeroed(&params);
        let ptr = target.field_elements().as_ptr();
        let mut decoder = Decoder::new(bytes.as_slice(), bytes.len() as u64, &params);
        target.decode_into(&mut decoder).unwrap();

        assert_eq!(target, blob(&params));
        assert_eq!(target.field_elements().as_ptr(), ptr);
    }

    #[test]
    fn tree_hash_root() {
        let params = ProtocolParams::minimal();
        let blob = blob(&params);
        let pair = |i: u8| hash32_concat(&[i; 32], &[i + 1; 32]);
        let expected = hash32_concat(&pair(1), &pair(3));
        assert_eq!(blob.tree_hash_root(), Hash256::from(expected));
    }

    #[test]
    fn clones_are_independent() {
        let params = ProtocolParams::minimal();
        let original = blob(&params);
        let mut copy = original.clone();
        copy.field_elements_mut()[0] = FieldElement([0x42; 32]);

        assert_eq!(original.field_elements()[0], FieldElement([1; 32]));
        assert_ne!(copy, original);
    }

    #[test]
    fn commitment_requires_canonical_scalars() {
        let params = ProtocolParams::minimal();
        let mut blob = blob(&params);
        assert!(blob.compute_commitment(&MockScheme).is_some());

        blob.field_elements_mut()[2] = FieldElement([0xff; 32]);
        assert!(blob.to_scalars(&MockScheme).is_none());
        assert!(blob.compute_commitment(&MockScheme).is_none());
    }
}
