use std::io::{Read, Write};

use crate::{
    codec::{
        container_field_len, fixed_part_len, ContainerDecoder, ContainerEncoder, Decode, Decoder,
        Encode,
    },
    commitment::VersionedHash,
    config::ProtocolParams,
    envelope::{encode_typed_parts, BlobTransaction},
    errors::{SerializationError, VerifierError},
    list::{BlobList, CommitmentList},
    merkle::{merkleize, Hash256, TreeHash},
    scheme::CommitmentScheme,
    tree_hash_not_packed,
};

/// The network-only part of a blob transaction: the blobs and their commitments.
///
/// The transaction body binds to the commitments through their versioned
/// hashes. The wrap data is checked against those hashes with
/// [`BlobTxWrapData::verify`] before a wrapper is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlobTxWrapData {
    pub blob_kzgs: CommitmentList,
    pub blobs: BlobList,
}

impl BlobTxWrapData {
    pub const fn new(blob_kzgs: CommitmentList, blobs: BlobList) -> Self {
        Self { blob_kzgs, blobs }
    }

    /// Commits to every blob.
    ///
    /// Fails with [`VerifierError::ScalarOutOfRange`] naming the first blob
    /// that holds a non canonical field element.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(num_blobs = blobs.len()))
    )]
    pub fn from_blobs<S: CommitmentScheme>(
        blobs: BlobList,
        scheme: &S,
    ) -> Result<Self, VerifierError> {
        let commitments = blobs
            .iter()
            .enumerate()
            .map(|(blob_index, blob)| {
                blob.compute_commitment(scheme)
                    .ok_or(VerifierError::ScalarOutOfRange { blob_index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // There is one commitment per blob and both lists share the same limit.
        let blob_kzgs = CommitmentList::new(commitments).map_err(|_| {
            VerifierError::CommitmentsBlobsCountMismatch {
                commitments: blobs.len(),
                blobs: blobs.len(),
            }
        })?;
        Ok(Self { blob_kzgs, blobs })
    }

    /// The versioned hashes a transaction body must declare for this wrap data.
    pub fn versioned_hashes(&self, params: &ProtocolParams) -> Vec<VersionedHash> {
        self.blob_kzgs.versioned_hashes(params)
    }

    /// The number of bytes the wrap data adds to the encoded wrapper.
    ///
    /// This is the two list offsets plus the encoded lists.
    pub fn size_wrap_data(&self) -> usize {
        self.encoded_len()
    }

    /// Checks the wrap data against the versioned hashes declared by a transaction.
    ///
    /// Checks run in order and the first failure is returned:
    ///
    /// 1. at most `max_blobs_per_tx` hashes are declared,
    /// 2. there is one commitment per blob,
    /// 3. there is one commitment per declared hash,
    /// 4. every commitment hashes to the declared hash at the same index,
    /// 5. every commitment decompresses to a valid point,
    /// 6. every blob holds canonical scalars,
    /// 7. the commitments match the blobs, checked as one batch.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(num_blobs = self.blobs.len()))
    )]
    pub fn verify<S: CommitmentScheme>(
        &self,
        versioned_hashes: &[VersionedHash],
        scheme: &S,
        params: &ProtocolParams,
    ) -> Result<(), VerifierError> {
        let result = self.verify_in_order(versioned_hashes, scheme, params);

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(%err, "wrap data rejected");
        }

        result
    }

    fn verify_in_order<S: CommitmentScheme>(
        &self,
        versioned_hashes: &[VersionedHash],
        scheme: &S,
        params: &ProtocolParams,
    ) -> Result<(), VerifierError> {
        if versioned_hashes.len() > params.max_blobs_per_tx {
            return Err(VerifierError::TooManyBlobs {
                num_hashes: versioned_hashes.len(),
                max_blobs_per_tx: params.max_blobs_per_tx,
            });
        }
        if self.blob_kzgs.len() != self.blobs.len() {
            return Err(VerifierError::CommitmentsBlobsCountMismatch {
                commitments: self.blob_kzgs.len(),
                blobs: self.blobs.len(),
            });
        }
        if self.blob_kzgs.len() != versioned_hashes.len() {
            return Err(VerifierError::CommitmentsHashesCountMismatch {
                commitments: self.blob_kzgs.len(),
                hashes: versioned_hashes.len(),
            });
        }

        let declared_hashes = self.blob_kzgs.iter().zip(versioned_hashes);
        for (index, (commitment, declared)) in declared_hashes.enumerate() {
            let computed = commitment.versioned_hash_for(params);
            if computed != *declared {
                return Err(VerifierError::VersionedHashMismatch {
                    index,
                    declared: *declared,
                    computed,
                });
            }
        }

        let points = self.blob_kzgs.points(scheme)?;
        let scalars = self.blobs.scalars(scheme)?;

        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("verify_batch", num_blobs = points.len()).entered();
        if !scheme.verify_batch(&points, &scalars) {
            return Err(VerifierError::PairingVerificationFailed);
        }
        Ok(())
    }

    /// Checks the wrap data against the versioned hashes of `tx`.
    pub fn check_wrapping<T: BlobTransaction, S: CommitmentScheme>(
        &self,
        tx: &T,
        scheme: &S,
        params: &ProtocolParams,
    ) -> Result<(), VerifierError> {
        self.verify(tx.blob_versioned_hashes(), scheme, params)
    }

    /// Writes the typed wrapper envelope of `tx` and this wrap data.
    pub fn encode_typed<T: BlobTransaction, W: Write>(
        &self,
        tx: &T,
        params: &ProtocolParams,
        writer: &mut W,
    ) -> Result<(), SerializationError> {
        encode_typed_parts(tx, self, params, writer)
    }
}

impl Encode for BlobTxWrapData {
    fn is_fixed_len() -> bool {
        false
    }

    fn encoded_len(&self) -> usize {
        container_field_len(&self.blob_kzgs) + container_field_len(&self.blobs)
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        let fixed = fixed_part_len(&self.blob_kzgs) + fixed_part_len(&self.blobs);
        let mut container = ContainerEncoder::new(buf, fixed);
        container.append(&self.blob_kzgs);
        container.append(&self.blobs);
        container.finalize();
    }
}

impl Decode for BlobTxWrapData {
    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        let mut wrap_data = Self::default();
        wrap_data.decode_into(decoder)?;
        Ok(wrap_data)
    }

    fn decode_into<R: Read>(
        &mut self,
        decoder: &mut Decoder<'_, R>,
    ) -> Result<(), SerializationError> {
        let bytes = decoder.read_scope()?;
        let mut container = ContainerDecoder::new(&bytes, decoder.params());
        container.register::<CommitmentList>()?;
        container.register::<BlobList>()?;

        let mut fields = container.build()?;
        fields.decode_next_into(&mut self.blob_kzgs)?;
        fields.decode_next_into(&mut self.blobs)
    }
}

impl TreeHash for BlobTxWrapData {
    tree_hash_not_packed!(Container);

    fn tree_hash_root(&self) -> Hash256 {
        merkleize(
            &[self.blob_kzgs.tree_hash_root(), self.blobs.tree_hash_root()],
            2,
        )
    }
}
