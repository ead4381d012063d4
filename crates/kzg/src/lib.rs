mod batch;
mod errors;

/// Re-exported types
pub use blobwrap::{CommitmentScheme, ProtocolParams};
pub use errors::{ConfigError, Error, VerifierError};
pub use trusted_setup::TrustedSetup;

#[rustfmt::skip]
// Note: adding rustfmt::skip so that `cargo fmt` does not mix the
// public re-exported types with the following private imports.
use blobwrap::{Blob, BlobTxWrapData, KzgCommitment, VersionedHash};
use bls12_381::G1Point;
use trusted_setup::SubgroupCheck;

/// The BLS12-381 KZG commitment scheme for blobs in evaluation form.
///
/// Context holds the Lagrange form commit key, one G1 point per blob field
/// element, and the protocol parameters the blobs were built for.
#[derive(Debug)]
pub struct Context {
    commit_key: Vec<G1Point>,
    params: ProtocolParams,
}

impl Context {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn new(trusted_setup: &TrustedSetup, params: &ProtocolParams) -> Result<Self, Error> {
        params.validate()?;
        if trusted_setup.len() != params.field_elements_per_blob {
            return Err(Error::SetupSizeMismatch {
                setup_size: trusted_setup.len(),
                field_elements_per_blob: params.field_elements_per_blob,
            });
        }

        let commit_key = trusted_setup.g1_lagrange_points(SubgroupCheck::Check)?;
        Ok(Self {
            commit_key,
            params: *params,
        })
    }

    /// Creates a context over a setup generated from a known secret.
    ///
    /// Commitments under this context can be forged by anyone that knows
    /// `secret`. Only use it for tests and local development networks.
    pub fn insecure(params: &ProtocolParams, secret: u64) -> Result<Self, Error> {
        params.validate()?;
        let trusted_setup =
            TrustedSetup::insecure_from_secret(params.field_elements_per_blob, secret)?;
        Self::new(&trusted_setup, params)
    }

    pub const fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// Computes the KZG commitment to a blob.
    ///
    /// Fails with [`Error::FieldElementNotCanonical`] naming the first field
    /// element that is not a canonical scalar.
    pub fn blob_to_kzg_commitment(&self, blob: &Blob) -> Result<KzgCommitment, Error> {
        let length_mismatch = Error::BlobLengthMismatch {
            length: blob.len(),
            expected: self.commit_key.len(),
        };
        if blob.len() != self.commit_key.len() {
            return Err(length_mismatch);
        }

        let scalars = blob
            .field_elements()
            .iter()
            .enumerate()
            .map(|(index, element)| {
                self.scalar_from_field_element(element)
                    .ok_or(Error::FieldElementNotCanonical { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let point = self.commit(&scalars).ok_or(length_mismatch)?;
        Ok(self.compress(&point))
    }

    /// Checks wrap data against the versioned hashes of its transaction,
    /// under the parameters of this context.
    pub fn verify_wrap_data(
        &self,
        wrap_data: &BlobTxWrapData,
        versioned_hashes: &[VersionedHash],
    ) -> Result<(), VerifierError> {
        wrap_data.verify(versioned_hashes, self, &self.params)
    }

    pub(crate) fn commit_key(&self) -> &[G1Point] {
        &self.commit_key
    }
}
