use crate::{commitment::KzgCommitment, field_element::FieldElement};

/// The polynomial commitment scheme that binds blobs to commitments.
///
/// Wrap data verification only needs to interpret field elements as scalars,
/// commit to a blob, move points to and from their compressed form, and check
/// a batch of commitments against their blobs. The BLS12-381 KZG scheme
/// implements this in the `blobwrap-kzg` crate.
pub trait CommitmentScheme {
    type Scalar: Copy;
    type Point: Copy;

    /// Interprets a field element as a scalar. Returns `None` if the bytes are
    /// not a canonical encoding.
    fn scalar_from_field_element(&self, element: &FieldElement) -> Option<Self::Scalar>;

    /// Commits to a blob given in evaluation form.
    ///
    /// Returns `None` if the number of scalars does not match the setup.
    fn commit(&self, scalars: &[Self::Scalar]) -> Option<Self::Point>;

    fn compress(&self, point: &Self::Point) -> KzgCommitment;

    /// Decompresses a commitment. Returns `None` if the bytes are not a
    /// valid encoding of a point in the prime order subgroup.
    fn point_from_compressed(&self, commitment: &KzgCommitment) -> Option<Self::Point>;

    /// Returns true if every point commits to the blob at the same position.
    ///
    /// Returns false if the slices differ in length.
    fn verify_batch(&self, points: &[Self::Point], blobs: &[Vec<Self::Scalar>]) -> bool;
}
