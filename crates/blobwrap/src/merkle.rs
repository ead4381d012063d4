//! SSZ hash tree roots.
//!
//! Roots are computed with [`tree_hash`]. Blobs, commitments and hashes are
//! vectors of bytes, lists mix their length into the root of their elements,
//! and wrappers are containers of their fields.

pub use tree_hash::{
    merkle_root, mix_in_length, Hash256, PackedEncoding, TreeHash, TreeHashType, BYTES_PER_CHUNK,
};

/// Merkleizes 32 byte leaves into a tree sized for `limit` leaves.
///
/// Missing leaves are zero chunks. Zero subtrees are never materialized, so
/// a large limit with few leaves costs one hash per level.
pub fn merkleize(leaves: &[Hash256], limit: usize) -> Hash256 {
    let bytes: Vec<u8> = leaves.iter().flat_map(|leaf| leaf.0).collect();
    merkle_root(&bytes, limit)
}

/// Implements the packing half of [`TreeHash`] for a type that is never
/// packed into a chunk with its siblings.
#[macro_export]
macro_rules! tree_hash_not_packed {
    ($kind:ident) => {
        fn tree_hash_type() -> $crate::merkle::TreeHashType {
            $crate::merkle::TreeHashType::$kind
        }

        fn tree_hash_packed_encoding(&self) -> $crate::merkle::PackedEncoding {
            unreachable!("only basic types are packed")
        }

        fn tree_hash_packing_factor() -> usize {
            unreachable!("only basic types are packed")
        }
    };
}
