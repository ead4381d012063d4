// Note: Any mention of field elements in this file and in general in the codebase
// refers to the scalar field.

/// The number of bytes needed to represent a field element.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// The number of bytes needed to represent a commitment.
///
/// Note: commitments are compressed G1 elements.
pub const BYTES_PER_COMMITMENT: usize = 48;

/// The number of bytes in a versioned hash.
pub const BYTES_PER_VERSIONED_HASH: usize = 32;

/// The version byte that prefixes the versioned hash of a KZG commitment.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// The maximum number of commitments a wrapper can carry, as an SSZ list limit.
pub const MAX_TX_WRAP_KZG_COMMITMENTS: usize = 1 << 24;

/// The maximum number of blobs a wrapper can carry, as an SSZ list limit.
pub const LIMIT_BLOBS_PER_TX: usize = 1 << 24;

/// The maximum number of versioned hashes a transaction body can carry, as an SSZ list limit.
pub const MAX_VERSIONED_HASHES_LIST_SIZE: usize = 1 << 24;

/// The transaction type byte that prefixes a typed blob transaction envelope.
pub const BLOB_TX_TYPE: u8 = 0x05;

/// The number of field elements in a mainnet blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// The number of field elements in a blob of the minimal preset.
pub const MINIMAL_FIELD_ELEMENTS_PER_BLOB: usize = 4;

/// The number of blobs a single mainnet transaction may reference.
///
/// This is much tighter than the list limits above, which only fix the
/// shape of the Merkle tree.
pub const MAX_BLOBS_PER_TX: usize = 2;
