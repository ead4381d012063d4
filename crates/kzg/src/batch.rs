use blobwrap::{CommitmentScheme, FieldElement, KzgCommitment};
use bls12_381::{
    g1_from_compressed, lincomb::g1_lincomb, scalar_from_bytes_be, scalar_from_u128, traits::*,
    G1Point, Scalar,
};
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::Context;

/// Domain separator of the batch verification transcript.
const DOMAIN_SEP: &str = "BLOBWRAP_BATCH_V1";

impl CommitmentScheme for Context {
    type Scalar = Scalar;
    type Point = G1Point;

    fn scalar_from_field_element(&self, element: &FieldElement) -> Option<Scalar> {
        scalar_from_bytes_be(element.as_bytes())
    }

    fn commit(&self, scalars: &[Scalar]) -> Option<G1Point> {
        g1_lincomb(self.commit_key(), scalars).map(|commitment| commitment.to_affine())
    }

    fn compress(&self, point: &G1Point) -> KzgCommitment {
        KzgCommitment::new(point.to_compressed())
    }

    fn point_from_compressed(&self, commitment: &KzgCommitment) -> Option<G1Point> {
        g1_from_compressed(commitment.as_bytes())
    }

    /// Checks every commitment against its blob with a single commitment.
    ///
    /// With a random challenge `r`, the commitments `C_i` match the blobs `p_i`
    /// iff `Σ rⁱ·C_i == commit(Σ rⁱ·p_i)`, except with negligible
    /// probability. Committing is linear, so the combined blob can be
    /// committed to directly.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(num_blobs = points.len()))
    )]
    fn verify_batch(&self, points: &[G1Point], blobs: &[Vec<Scalar>]) -> bool {
        let domain_size = self.commit_key().len();
        if points.len() != blobs.len() || blobs.iter().any(|blob| blob.len() != domain_size) {
            return false;
        }
        if points.is_empty() {
            return true;
        }

        let r = compute_batch_challenge(points, blobs);
        let r_powers: Vec<Scalar> = itertools::iterate(Scalar::ONE, |power| power * r)
            .take(points.len())
            .collect();

        let aggregated_polynomial = aggregate_polynomials(blobs, &r_powers, domain_size);
        let (Some(aggregated_commitment), Some(expected)) = (
            g1_lincomb(points, &r_powers),
            g1_lincomb(self.commit_key(), &aggregated_polynomial),
        ) else {
            return false;
        };
        aggregated_commitment == expected
    }
}

/// Computes `Σ rⁱ·p_i`, evaluation by evaluation.
fn aggregate_polynomials(
    blobs: &[Vec<Scalar>],
    r_powers: &[Scalar],
    domain_size: usize,
) -> Vec<Scalar> {
    let combine = |j: usize| -> Scalar {
        blobs
            .iter()
            .zip(r_powers)
            .map(|(blob, power)| blob[j] * power)
            .sum()
    };

    #[cfg(feature = "multithreaded")]
    let aggregated = (0..domain_size).into_par_iter().map(combine).collect();
    #[cfg(not(feature = "multithreaded"))]
    let aggregated = (0..domain_size).map(combine).collect();

    aggregated
}

/// Derives the batch challenge from everything being verified.
///
/// For randomization a 128 bit scalar is enough, see the randomizers section
/// in: https://cr.yp.to/badbatch/badbatch-20120919.pdf
///
/// Taking the first 16 bytes of the digest gives a uniform 128 bit integer
/// that needs no reduction.
pub(crate) fn compute_batch_challenge(points: &[G1Point], blobs: &[Vec<Scalar>]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_SEP.as_bytes());
    hasher.update((points.len() as u64).to_be_bytes());
    for point in points {
        hasher.update(point.to_compressed());
    }
    for blob in blobs {
        for scalar in blob {
            hasher.update(scalar.to_bytes_be());
        }
    }
    let digest: [u8; 32] = hasher.finalize().into();

    let mut challenge = [0u8; 16];
    challenge.copy_from_slice(&digest[..16]);
    scalar_from_u128(u128::from_be_bytes(challenge))
}
