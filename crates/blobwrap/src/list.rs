use std::{io::Read, ops::Deref, slice};

use crate::{
    blob::Blob,
    codec::{Decode, Decoder, Encode},
    commitment::{KzgCommitment, VersionedHash},
    config::ProtocolParams,
    constants::{
        LIMIT_BLOBS_PER_TX, MAX_TX_WRAP_KZG_COMMITMENTS, MAX_VERSIONED_HASHES_LIST_SIZE,
    },
    errors::{SerializationError, VerifierError},
    merkle::{merkle_root, merkleize, mix_in_length, Hash256, TreeHash, TreeHashType},
    scheme::CommitmentScheme,
    tree_hash_not_packed,
};

/// A list of fixed size elements holding at most `LIMIT` of them.
///
/// The limit bounds decoding and fixes the depth of the Merkle tree. It is
/// not a policy limit: see [`crate::ProtocolParams::max_blobs_per_tx`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct List<T, const LIMIT: usize> {
    items: Vec<T>,
}

pub type CommitmentList = List<KzgCommitment, MAX_TX_WRAP_KZG_COMMITMENTS>;
pub type BlobList = List<Blob, LIMIT_BLOBS_PER_TX>;
pub type VersionedHashList = List<VersionedHash, MAX_VERSIONED_HASHES_LIST_SIZE>;

impl<T, const LIMIT: usize> Default for List<T, LIMIT> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T, const LIMIT: usize> List<T, LIMIT> {
    pub const MAX_LEN: usize = LIMIT;

    pub fn new(items: Vec<T>) -> Result<Self, SerializationError> {
        if items.len() > LIMIT {
            return Err(SerializationError::ListTooLarge {
                count: items.len() as u64,
                limit: LIMIT as u64,
            });
        }
        Ok(Self { items })
    }

    pub fn push(&mut self, item: T) -> Result<(), SerializationError> {
        if self.items.len() >= LIMIT {
            return Err(SerializationError::ListTooLarge {
                count: self.items.len() as u64 + 1,
                limit: LIMIT as u64,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T, const LIMIT: usize> Deref for List<T, LIMIT> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T, const LIMIT: usize> IntoIterator for &'a List<T, LIMIT> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T, const LIMIT: usize> TryFrom<Vec<T>> for List<T, LIMIT> {
    type Error = SerializationError;

    fn try_from(items: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl<T: Encode, const LIMIT: usize> Encode for List<T, LIMIT> {
    fn is_fixed_len() -> bool {
        false
    }

    fn encoded_len(&self) -> usize {
        self.items.iter().map(Encode::encoded_len).sum()
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.encoded_len());
        for item in &self.items {
            item.encode(buf);
        }
    }
}

impl<T: Decode, const LIMIT: usize> Decode for List<T, LIMIT> {
    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        let mut list = Self::default();
        list.decode_into(decoder)?;
        Ok(list)
    }

    /// Decodes the list spanning the whole scope.
    ///
    /// Elements already present are decoded in place, surplus ones are
    /// dropped, and missing ones are appended one at a time so that a lying
    /// span cannot force a large allocation up front.
    fn decode_into<R: Read>(
        &mut self,
        decoder: &mut Decoder<'_, R>,
    ) -> Result<(), SerializationError> {
        let count = decoder.list_len(T::ssz_fixed_len(decoder.params()), LIMIT)?;

        self.items.truncate(count);
        for item in &mut self.items {
            item.decode_into(decoder)?;
        }
        while self.items.len() < count {
            self.items.push(T::decode(decoder)?);
        }
        Ok(())
    }
}

impl<T: TreeHash, const LIMIT: usize> TreeHash for List<T, LIMIT> {
    tree_hash_not_packed!(List);

    /// Basic elements are packed into chunks, other elements contribute
    /// their own root as a leaf.
    fn tree_hash_root(&self) -> Hash256 {
        let root = match T::tree_hash_type() {
            TreeHashType::Basic => {
                let packed: Vec<u8> = self
                    .items
                    .iter()
                    .flat_map(T::tree_hash_packed_encoding)
                    .collect();
                merkle_root(&packed, LIMIT.div_ceil(T::tree_hash_packing_factor()))
            }
            _ => {
                let leaves: Vec<Hash256> =
                    self.items.iter().map(TreeHash::tree_hash_root).collect();
                merkleize(&leaves, LIMIT)
            }
        };
        mix_in_length(&root, self.items.len())
    }
}

impl CommitmentList {
    /// Computes the versioned hash of every commitment.
    pub fn versioned_hashes(&self, params: &ProtocolParams) -> Vec<VersionedHash> {
        self.items
            .iter()
            .map(|commitment| commitment.versioned_hash_for(params))
            .collect()
    }

    /// Decompresses every commitment, reporting the first invalid one.
    pub fn points<S: CommitmentScheme>(
        &self,
        scheme: &S,
    ) -> Result<Vec<S::Point>, VerifierError> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, commitment)| {
                commitment
                    .to_point(scheme)
                    .ok_or(VerifierError::PointInvalid { index })
            })
            .collect()
    }
}

impl BlobList {
    /// Interprets every blob as scalars, reporting the first blob that holds
    /// a non canonical field element.
    pub fn scalars<S: CommitmentScheme>(
        &self,
        scheme: &S,
    ) -> Result<Vec<Vec<S::Scalar>>, VerifierError> {
        self.items
            .iter()
            .enumerate()
            .map(|(blob_index, blob)| {
                blob.to_scalars(scheme)
                    .ok_or(VerifierError::ScalarOutOfRange { blob_index })
            })
            .collect()
    }
}
