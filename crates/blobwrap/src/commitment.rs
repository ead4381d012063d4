use std::{fmt, io::Read, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::{
    codec::{Decode, Decoder, Encode},
    config::ProtocolParams,
    constants::{BYTES_PER_COMMITMENT, BYTES_PER_VERSIONED_HASH, VERSIONED_HASH_VERSION_KZG},
    errors::SerializationError,
    merkle::{merkle_root, Hash256, TreeHash},
    scheme::CommitmentScheme,
    tree_hash_not_packed,
};

/// The digest a commitment is hashed with before its version byte is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionedHashDigest {
    #[default]
    Keccak256,
    Sha256,
}

impl VersionedHashDigest {
    pub fn digest(self, bytes: &[u8]) -> [u8; BYTES_PER_VERSIONED_HASH] {
        match self {
            Self::Keccak256 => Keccak256::digest(bytes).into(),
            Self::Sha256 => Sha256::digest(bytes).into(),
        }
    }
}

/// A compressed KZG commitment to a blob.
///
/// The bytes are not checked to be a valid point until they are handed to a
/// commitment scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KzgCommitment([u8; BYTES_PER_COMMITMENT]);

/// The hash a transaction body uses to reference a blob commitment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct VersionedHash([u8; BYTES_PER_VERSIONED_HASH]);

impl KzgCommitment {
    pub const fn new(bytes: [u8; BYTES_PER_COMMITMENT]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; BYTES_PER_COMMITMENT] {
        &self.0
    }

    /// Computes `keccak256(commitment)` with the KZG version byte.
    pub fn versioned_hash(&self) -> VersionedHash {
        self.versioned_hash_with(VersionedHashDigest::Keccak256, VERSIONED_HASH_VERSION_KZG)
    }

    /// Computes the versioned hash the protocol parameters call for.
    pub fn versioned_hash_for(&self, params: &ProtocolParams) -> VersionedHash {
        self.versioned_hash_with(params.versioned_hash_digest, params.versioned_hash_version)
    }

    /// Hashes the commitment with `digest` and replaces the first byte with `version`.
    pub fn versioned_hash_with(&self, digest: VersionedHashDigest, version: u8) -> VersionedHash {
        let mut hash = digest.digest(&self.0);
        hash[0] = version;
        VersionedHash(hash)
    }

    /// Decompresses the commitment with the given scheme.
    pub fn to_point<S: CommitmentScheme>(&self, scheme: &S) -> Option<S::Point> {
        scheme.point_from_compressed(self)
    }
}

impl VersionedHash {
    pub const fn new(bytes: [u8; BYTES_PER_VERSIONED_HASH]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; BYTES_PER_VERSIONED_HASH] {
        &self.0
    }

    pub const fn version(&self) -> u8 {
        self.0[0]
    }
}

impl From<[u8; BYTES_PER_COMMITMENT]> for KzgCommitment {
    fn from(bytes: [u8; BYTES_PER_COMMITMENT]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; BYTES_PER_VERSIONED_HASH]> for VersionedHash {
    fn from(bytes: [u8; BYTES_PER_VERSIONED_HASH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for KzgCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for VersionedHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Parses `N` bytes from exactly `2 * N` hex characters, with an optional
/// `0x` or `0X` prefix.
fn parse_hex<const N: usize>(text: &str) -> Result<[u8; N], SerializationError> {
    let invalid = || SerializationError::TextFormatInvalid {
        text: text.to_owned(),
        expected_len: 2 * N,
    };

    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.len() != 2 * N {
        return Err(invalid());
    }

    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
    Ok(bytes)
}

macro_rules! impl_hex_text {
    ($type:ident) => {
        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($type), self)
            }
        }

        impl FromStr for $type {
            type Err = SerializationError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                parse_hex(text).map(Self)
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

impl_hex_text!(KzgCommitment);
impl_hex_text!(VersionedHash);

macro_rules! impl_fixed_bytes_codec {
    ($type:ident, $len:expr) => {
        impl Encode for $type {
            fn is_fixed_len() -> bool {
                true
            }

            fn encoded_len(&self) -> usize {
                $len
            }

            fn encode(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.0);
            }
        }

        impl Decode for $type {
            fn ssz_fixed_len(_: &ProtocolParams) -> usize {
                $len
            }

            fn decode<R: Read>(decoder: &mut Decoder<'_, R>) -> Result<Self, SerializationError> {
                decoder.read_array().map(Self)
            }
        }
    };
}

impl_fixed_bytes_codec!(KzgCommitment, BYTES_PER_COMMITMENT);
impl_fixed_bytes_codec!(VersionedHash, BYTES_PER_VERSIONED_HASH);

impl TreeHash for KzgCommitment {
    tree_hash_not_packed!(Vector);

    /// A commitment spans two chunks: the first 32 bytes, then the last 16
    /// bytes padded with zeros.
    fn tree_hash_root(&self) -> Hash256 {
        merkle_root(&self.0, 2)
    }
}

impl TreeHash for VersionedHash {
    tree_hash_not_packed!(Vector);

    fn tree_hash_root(&self) -> Hash256 {
        Hash256::from(self.0)
    }
}
