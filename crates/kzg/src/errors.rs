pub use blobwrap::{ConfigError, VerifierError};

/// Errors that can occur while setting up or using a KZG [`crate::Context`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The trusted setup could not be loaded or generated.
    #[error(transparent)]
    TrustedSetup(#[from] trusted_setup::Error),
    /// The protocol parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The trusted setup does not have one point per blob field element.
    #[error(
        "trusted setup has {setup_size} points, but blobs have {field_elements_per_blob} field \
         elements"
    )]
    SetupSizeMismatch {
        setup_size: usize,
        field_elements_per_blob: usize,
    },
    /// A blob was built for different protocol parameters than the context.
    #[error("blob has {length} field elements, the context expects {expected}")]
    BlobLengthMismatch { length: usize, expected: usize },
    /// A blob field element is not a canonical scalar.
    #[error("field element {index} of the blob is not a canonical scalar")]
    FieldElementNotCanonical { index: usize },
    #[error(transparent)]
    Verifier(#[from] VerifierError),
}
