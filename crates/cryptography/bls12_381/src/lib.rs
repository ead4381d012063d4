pub mod lincomb;

// Re-export ff and group, so other crates do not need to directly import (and independently
// version) them
pub use ff;
pub use group;

pub mod traits {
    pub use ff::{Field, PrimeField};
    pub use group::{prime::PrimeCurveAffine, Curve, Group};
}

use traits::*;

/// Affine representation of a point in the BLS12-381 G1 curve group.
pub type G1Point = blstrs::G1Affine;

/// Projective representation of a point in the BLS12-381 G1 curve group.
pub type G1Projective = blstrs::G1Projective;

/// Scalar field element for the BLS12-381 curve.
pub type Scalar = blstrs::Scalar;

/// The number of bytes in a compressed G1 point.
pub const G1_COMPRESSED_SIZE: usize = 48;

/// The number of bytes in a canonically encoded scalar.
pub const SCALAR_SIZE: usize = 32;

/// Parses a big-endian scalar, returning `None` if the value is not
/// strictly less than the scalar field modulus.
pub fn scalar_from_bytes_be(bytes: &[u8; SCALAR_SIZE]) -> Option<Scalar> {
    Scalar::from_bytes_be(bytes).into()
}

/// Decompresses a G1 point.
///
/// Returns `None` if the bytes are not a valid compressed encoding, the point
/// is not on the curve or it is not in the prime order subgroup.
pub fn g1_from_compressed(bytes: &[u8; G1_COMPRESSED_SIZE]) -> Option<G1Point> {
    G1Point::from_compressed(bytes).into()
}

/// Embeds a 128 bit integer into the scalar field.
///
/// Every 128 bit value is smaller than the modulus, so this never reduces.
pub fn scalar_from_u128(value: u128) -> Scalar {
    let two_pow_64 = Scalar::from(u64::MAX) + Scalar::ONE;
    let hi = Scalar::from((value >> 64) as u64);
    let lo = Scalar::from(value as u64);
    hi * two_pow_64 + lo
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::thread_rng;

    use super::*;

    /// BLS12-381 scalar field modulus (r)
    const BLS12_381_R: [u8; 32] = [
        0x73, 0xED, 0xA7, 0x53, 0x29, 0x9D, 0x7D, 0x48, 0x33, 0x39, 0xD8, 0x08, 0x09, 0xA1, 0xD8,
        0x05, 0x53, 0xBD, 0xA4, 0x02, 0xFF, 0xFE, 0x5B, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00,
        0x00, 0x01,
    ];

    #[test]
    fn scalar_parsing_rejects_modulus_and_above() {
        assert_eq!(scalar_from_bytes_be(&[0u8; 32]), Some(Scalar::ZERO));

        let mut r_minus_one = BLS12_381_R;
        r_minus_one[31] -= 1;
        assert_eq!(scalar_from_bytes_be(&r_minus_one), Some(-Scalar::ONE));

        assert!(scalar_from_bytes_be(&BLS12_381_R).is_none());
        assert!(scalar_from_bytes_be(&[0xff; 32]).is_none());
    }

    #[test]
    fn compressed_round_trip() {
        let point: G1Point = G1Projective::random(thread_rng()).into();
        let bytes = point.to_compressed();
        assert_eq!(g1_from_compressed(&bytes), Some(point));
    }

    #[test]
    fn compressed_identity_is_valid() {
        let bytes = G1Point::identity().to_compressed();
        assert_eq!(bytes[0], 0xc0);
        assert_eq!(g1_from_compressed(&bytes), Some(G1Point::identity()));
    }

    #[test]
    fn compressed_rejects_garbage() {
        // Compression flag not set.
        assert!(g1_from_compressed(&[0u8; 48]).is_none());
        // x coordinate larger than the base field modulus.
        let mut bytes = [0xffu8; 48];
        bytes[0] = 0x9f;
        assert!(g1_from_compressed(&bytes).is_none());
    }

    #[test]
    fn u128_embedding() {
        assert_eq!(scalar_from_u128(0), Scalar::ZERO);
        assert_eq!(scalar_from_u128(7), Scalar::from(7u64));
        let big = scalar_from_u128(u128::MAX);
        assert_eq!(big + Scalar::ONE, scalar_from_u128(1 << 64) * scalar_from_u128(1 << 64));
    }

    proptest! {
        #[test]
        fn u128_embedding_matches_big_endian_bytes(value: u128) {
            let mut bytes = [0u8; 32];
            bytes[16..].copy_from_slice(&value.to_be_bytes());
            prop_assert_eq!(scalar_from_bytes_be(&bytes), Some(scalar_from_u128(value)));
        }
    }
}
