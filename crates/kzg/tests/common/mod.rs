#![allow(dead_code)]

use std::io::Read;

use blobwrap::{
    codec::{
        container_field_len, fixed_part_len, ContainerDecoder, ContainerEncoder, Decode, Decoder,
        Encode,
    },
    merkle::{merkleize, Hash256, TreeHash},
    tree_hash_not_packed, Blob, BlobList, BlobTransaction, BlobTxWrapData, FieldElement,
    ProtocolParams, SerializationError, VersionedHash, VersionedHashList,
};
use blobwrap_kzg::Context;
use bls12_381::{traits::*, Scalar};
use rand::{rngs::StdRng, SeedableRng};

/// A minimal blob transaction body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlobTx {
    pub nonce: u64,
    pub max_fee_per_blob_gas: u64,
    pub blob_versioned_hashes: VersionedHashList,
}

impl Encode for BlobTx {
    fn is_fixed_len() -> bool {
        false
    }

    fn encoded_len(&self) -> usize {
        container_field_len(&self.nonce)
            + container_field_len(&self.max_fee_per_blob_gas)
            + container_field_len(&self.blob_versioned_hashes)
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        let fixed = fixed_part_len(&self.nonce)
            + fixed_part_len(&self.max_fee_per_blob_gas)
            + fixed_part_len(&self.blob_versioned_hashes);
        let mut container = ContainerEncoder::new(buf, fixed);
        container.append(&self.nonce);
        container.append(&self.max_fee_per_blob_gas);
        container.append(&self.blob_versioned_hashes);
        container.finalize();
    }
}

impl Decode for BlobTx {
    fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
        let bytes = decoder.read_scope()?;
        let mut container = ContainerDecoder::new(&bytes, decoder.params());
        container.register::<u64>()?;
        container.register::<u64>()?;
        container.register::<VersionedHashList>()?;

        let mut fields = container.build()?;
        Ok(Self {
            nonce: fields.decode_next()?,
            max_fee_per_blob_gas: fields.decode_next()?,
            blob_versioned_hashes: fields.decode_next()?,
        })
    }
}

impl TreeHash for BlobTx {
    tree_hash_not_packed!(Container);

    fn tree_hash_root(&self) -> Hash256 {
        merkleize(
            &[
                self.nonce.tree_hash_root(),
                self.max_fee_per_blob_gas.tree_hash_root(),
                self.blob_versioned_hashes.tree_hash_root(),
            ],
            3,
        )
    }
}

impl BlobTransaction for BlobTx {
    fn blob_versioned_hashes(&self) -> &[VersionedHash] {
        &self.blob_versioned_hashes
    }
}

pub fn minimal_context() -> Context {
    Context::insecure(&ProtocolParams::minimal(), 0x5eed_1234).expect("insecure setup")
}

/// A blob of random canonical scalars.
pub fn random_blob(params: &ProtocolParams, seed: u64) -> Blob {
    let mut rng = StdRng::seed_from_u64(seed);
    let elements = (0..params.field_elements_per_blob)
        .map(|_| FieldElement(Scalar::random(&mut rng).to_bytes_be()))
        .collect();
    Blob::new(elements, params).expect("blob has the right length")
}

/// Honest wrap data for `num_blobs` random blobs, and the hashes it verifies against.
pub fn honest_wrap_data(ctx: &Context, num_blobs: u64) -> (BlobTxWrapData, Vec<VersionedHash>) {
    let blobs = (0..num_blobs).map(|seed| random_blob(ctx.params(), seed)).collect();
    let wrap_data = BlobTxWrapData::from_blobs(BlobList::new(blobs).expect("within limit"), ctx)
        .expect("random scalars are canonical");
    let hashes = wrap_data.versioned_hashes(ctx.params());
    (wrap_data, hashes)
}

pub fn blob_tx(hashes: Vec<VersionedHash>) -> BlobTx {
    BlobTx {
        nonce: 3,
        max_fee_per_blob_gas: 1_000_000_000,
        blob_versioned_hashes: VersionedHashList::new(hashes).expect("within limit"),
    }
}
