use std::io::{Read, Write};

use crate::{
    codec::{
        container_field_len, ensure_offset_range, fixed_part_len, ContainerDecoder,
        ContainerEncoder, ContainerFields, Decode, Decoder, Encode,
    },
    commitment::VersionedHash,
    config::ProtocolParams,
    errors::{Error, SerializationError, VerifierError},
    list::{BlobList, CommitmentList},
    merkle::{merkleize, Hash256, TreeHash},
    scheme::CommitmentScheme,
    tree_hash_not_packed,
    wrap_data::BlobTxWrapData,
};

/// A transaction body that references blobs through their versioned hashes.
///
/// Only such transactions can be wrapped in a [`BlobTxWrapper`].
pub trait BlobTransaction: Encode + Decode + TreeHash {
    fn blob_versioned_hashes(&self) -> &[VersionedHash];
}

/// A blob transaction together with its wrap data, as sent over the network.
///
/// On the wire this is the transaction type byte followed by the container
/// `(tx, blob_kzgs, blobs)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobTxWrapper<T> {
    pub tx: T,
    pub wrap_data: BlobTxWrapData,
}

impl<T: BlobTransaction> BlobTxWrapper<T> {
    pub const fn new(tx: T, wrap_data: BlobTxWrapData) -> Self {
        Self { tx, wrap_data }
    }

    pub fn into_parts(self) -> (T, BlobTxWrapData) {
        (self.tx, self.wrap_data)
    }

    /// Checks the wrap data against the versioned hashes of the transaction.
    pub fn verify<S: CommitmentScheme>(
        &self,
        scheme: &S,
        params: &ProtocolParams,
    ) -> Result<(), VerifierError> {
        self.wrap_data.check_wrapping(&self.tx, scheme, params)
    }

    pub fn encode_typed<W: Write>(
        &self,
        params: &ProtocolParams,
        writer: &mut W,
    ) -> Result<(), SerializationError> {
        encode_typed_parts(&self.tx, &self.wrap_data, params, writer)
    }

    /// Decodes a typed envelope, which must span all of `bytes`.
    pub fn decode_typed(bytes: &[u8], params: &ProtocolParams) -> Result<Self, SerializationError> {
        let (&found, body) = bytes.split_first().ok_or(SerializationError::Truncated {
            needed: 1,
            available: 0,
        })?;
        if found != params.blob_tx_type {
            return Err(SerializationError::UnexpectedTypeTag {
                expected: params.blob_tx_type,
                found,
            });
        }
        Self::from_ssz_bytes(body, params)
    }

    /// Decodes a typed envelope and checks its wrap data.
    ///
    /// This is how a wrapper received from the network is accepted: a
    /// malformed envelope is a [`Error::Serialization`], well formed wrap
    /// data that does not match the transaction is a [`Error::Verifier`].
    pub fn decode_verified<S: CommitmentScheme>(
        bytes: &[u8],
        scheme: &S,
        params: &ProtocolParams,
    ) -> Result<Self, Error> {
        let wrapper = Self::decode_typed(bytes, params)?;
        wrapper.verify(scheme, params)?;
        Ok(wrapper)
    }
}

/// Writes the type byte and the `(tx, blob_kzgs, blobs)` container.
pub(crate) fn encode_typed_parts<T: BlobTransaction, W: Write>(
    tx: &T,
    wrap_data: &BlobTxWrapData,
    params: &ProtocolParams,
    writer: &mut W,
) -> Result<(), SerializationError> {
    let len = wrapper_len(tx, wrap_data);
    ensure_offset_range(len)?;

    let mut buf = Vec::with_capacity(1 + len);
    buf.push(params.blob_tx_type);
    encode_wrapper(tx, wrap_data, &mut buf);
    writer.write_all(&buf)?;
    Ok(())
}

fn wrapper_len<T: Encode>(tx: &T, wrap_data: &BlobTxWrapData) -> usize {
    container_field_len(tx) + wrap_data.size_wrap_data()
}

fn encode_wrapper<T: Encode>(tx: &T, wrap_data: &BlobTxWrapData, buf: &mut Vec<u8>) {
    let fixed = fixed_part_len(tx)
        + fixed_part_len(&wrap_data.blob_kzgs)
        + fixed_part_len(&wrap_data.blobs);
    let mut container = ContainerEncoder::new(buf, fixed);
    container.append(tx);
    container.append(&wrap_data.blob_kzgs);
    container.append(&wrap_data.blobs);
    container.finalize();
}

impl<T: BlobTransaction> Encode for BlobTxWrapper<T> {
    fn is_fixed_len() -> bool {
        false
    }

    fn encoded_len(&self) -> usize {
        wrapper_len(&self.tx, &self.wrap_data)
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        encode_wrapper(&self.tx, &self.wrap_data, buf);
    }
}

impl<T: BlobTransaction> Decode for BlobTxWrapper<T> {
    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        let bytes = decoder.read_scope()?;
        let mut container = wrapper_fields::<T>(&bytes, decoder.params())?;
        let tx = container.decode_next()?;
        let blob_kzgs = container.decode_next()?;
        let blobs = container.decode_next()?;
        Ok(Self {
            tx,
            wrap_data: BlobTxWrapData::new(blob_kzgs, blobs),
        })
    }

    fn decode_into<R: Read>(
        &mut self,
        decoder: &mut Decoder<'_, R>,
    ) -> Result<(), SerializationError> {
        let bytes = decoder.read_scope()?;
        let mut container = wrapper_fields::<T>(&bytes, decoder.params())?;
        container.decode_next_into(&mut self.tx)?;
        container.decode_next_into(&mut self.wrap_data.blob_kzgs)?;
        container.decode_next_into(&mut self.wrap_data.blobs)
    }
}

fn wrapper_fields<'b, 'p, T: Decode>(
    bytes: &'b [u8],
    params: &'p ProtocolParams,
) -> Result<ContainerFields<'b, 'p>, SerializationError> {
    let mut container = ContainerDecoder::new(bytes, params);
    container.register::<T>()?;
    container.register::<CommitmentList>()?;
    container.register::<BlobList>()?;
    container.build()
}

impl<T: BlobTransaction> TreeHash for BlobTxWrapper<T> {
    tree_hash_not_packed!(Container);

    fn tree_hash_root(&self) -> Hash256 {
        let roots = [
            self.tx.tree_hash_root(),
            self.wrap_data.blob_kzgs.tree_hash_root(),
            self.wrap_data.blobs.tree_hash_root(),
        ];
        merkleize(&roots, roots.len())
    }
}
