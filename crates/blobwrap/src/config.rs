use serde::{Deserialize, Serialize};

use crate::{
    commitment::VersionedHashDigest,
    constants::{
        BLOB_TX_TYPE, BYTES_PER_FIELD_ELEMENT, FIELD_ELEMENTS_PER_BLOB, LIMIT_BLOBS_PER_TX,
        MAX_BLOBS_PER_TX, MINIMAL_FIELD_ELEMENTS_PER_BLOB, VERSIONED_HASH_VERSION_KZG,
    },
    errors::ConfigError,
};

/// Protocol parameters that shape blobs and bound the wrap data checks.
///
/// Missing keys in a json document take their mainnet value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolParams {
    /// Number of field elements in every blob.
    pub field_elements_per_blob: usize,
    /// Maximum number of blobs a single transaction may reference.
    pub max_blobs_per_tx: usize,
    /// Byte written over the first byte of a commitment digest.
    pub versioned_hash_version: u8,
    /// Digest applied to a commitment to get its versioned hash.
    pub versioned_hash_digest: VersionedHashDigest,
    /// Type byte that prefixes a typed blob transaction envelope.
    pub blob_tx_type: u8,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl ProtocolParams {
    pub const fn mainnet() -> Self {
        Self {
            field_elements_per_blob: FIELD_ELEMENTS_PER_BLOB,
            max_blobs_per_tx: MAX_BLOBS_PER_TX,
            versioned_hash_version: VERSIONED_HASH_VERSION_KZG,
            versioned_hash_digest: VersionedHashDigest::Keccak256,
            blob_tx_type: BLOB_TX_TYPE,
        }
    }

    /// Mainnet parameters with tiny blobs, for tests and local networks.
    pub const fn minimal() -> Self {
        Self {
            field_elements_per_blob: MINIMAL_FIELD_ELEMENTS_PER_BLOB,
            ..Self::mainnet()
        }
    }

    /// Parses and validates parameters from json.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_elements_per_blob == 0 {
            return Err(ConfigError::ZeroFieldElementsPerBlob);
        }
        if self.max_blobs_per_tx > LIMIT_BLOBS_PER_TX {
            return Err(ConfigError::MaxBlobsPerTxExceedsLimit {
                max_blobs_per_tx: self.max_blobs_per_tx,
                limit: LIMIT_BLOBS_PER_TX,
            });
        }
        Ok(())
    }

    /// The number of bytes needed to represent a blob.
    pub const fn bytes_per_blob(&self) -> usize {
        self.field_elements_per_blob * BYTES_PER_FIELD_ELEMENT
    }
}
