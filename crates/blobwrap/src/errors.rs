use crate::commitment::VersionedHash;

/// Errors that can occur while decoding or verifying blob transaction wrap data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns true if the wrap data was well formed but did not match the transaction.
    pub const fn is_verification_failure(&self) -> bool {
        matches!(self, Self::Verifier(_))
    }
}

/// Errors that can occur while decoding the wire format.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The scope (or the underlying reader) ended before a value was complete.
    #[error("input truncated: {needed} bytes needed, {available} left in scope")]
    Truncated {
        /// Number of bytes the value needed.
        needed: u64,
        /// Number of bytes the enclosing scope still claimed.
        available: u64,
    },
    /// A list span holds more elements than the list limit allows.
    #[error("list of {count} elements exceeds the limit of {limit}")]
    ListTooLarge {
        /// Number of elements implied by the span.
        count: u64,
        /// Maximum number of elements the list type allows.
        limit: u64,
    },
    /// A list span is not a whole number of elements.
    #[error("list span of {span} bytes is not a multiple of the element size {element_size}")]
    ListLengthInvalid {
        /// Length of the list span in bytes.
        span: u64,
        /// Encoded length of one element in bytes.
        element_size: u64,
    },
    /// A container offset points into the fixed part, past the end of the
    /// container, or before the previous offset.
    #[error("invalid container offset {offset}")]
    InvalidOffset {
        /// Offset read from the input.
        offset: u64,
    },
    /// Any other malformed container layout.
    #[error("malformed container: {0:?}")]
    Container(ssz::DecodeError),
    /// An encoding does not fit in the 4 byte offsets of its container.
    #[error("encoding of {len} bytes exceeds the offset range of {max} bytes")]
    EncodingTooLarge { len: usize, max: usize },
    /// A value did not consume all the bytes of its scope.
    #[error("{remaining} trailing bytes after the end of the value")]
    TrailingBytes {
        /// Number of unread bytes in scope.
        remaining: u64,
    },
    /// A blob was built from the wrong number of bytes or field elements.
    #[error("blob has {length} bytes, expected {expected}")]
    BlobHasInvalidLength { length: usize, expected: usize },
    /// The textual form of a commitment or hash was malformed.
    #[error(
        "invalid hex text {text:?}: expected {expected_len} hex characters with an optional 0x \
         prefix"
    )]
    TextFormatInvalid { text: String, expected_len: usize },
    /// A typed envelope started with the wrong transaction type byte.
    #[error("unexpected transaction type {found:#04x}, expected {expected:#04x}")]
    UnexpectedTypeTag { expected: u8, found: u8 },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ssz::DecodeError> for SerializationError {
    fn from(err: ssz::DecodeError) -> Self {
        match err {
            ssz::DecodeError::OffsetIntoFixedPortion(offset)
            | ssz::DecodeError::OffsetSkipsVariableBytes(offset)
            | ssz::DecodeError::OffsetsAreDecreasing(offset)
            | ssz::DecodeError::OffsetOutOfBounds(offset) => Self::InvalidOffset {
                offset: offset as u64,
            },
            ssz::DecodeError::InvalidByteLength { len, expected }
            | ssz::DecodeError::InvalidLengthPrefix { len, expected }
                if len < expected =>
            {
                Self::Truncated {
                    needed: expected as u64,
                    available: len as u64,
                }
            }
            ssz::DecodeError::InvalidByteLength { len, expected } => Self::TrailingBytes {
                remaining: (len - expected) as u64,
            },
            other => Self::Container(other),
        }
    }
}

/// Errors that can occur while checking wrap data against the versioned
/// hashes of a transaction.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("transaction references {num_hashes} blobs, at most {max_blobs_per_tx} are allowed")]
    TooManyBlobs {
        num_hashes: usize,
        max_blobs_per_tx: usize,
    },
    #[error("wrap data has {commitments} commitments but {blobs} blobs")]
    CommitmentsBlobsCountMismatch { commitments: usize, blobs: usize },
    #[error(
        "wrap data has {commitments} commitments but the transaction has {hashes} versioned hashes"
    )]
    CommitmentsHashesCountMismatch { commitments: usize, hashes: usize },
    #[error("versioned hash {index} is {declared}, but the commitment hashes to {computed}")]
    VersionedHashMismatch {
        /// Position of the first mismatching commitment.
        index: usize,
        /// Hash declared by the transaction.
        declared: VersionedHash,
        /// Hash computed from the wrapped commitment.
        computed: VersionedHash,
    },
    /// A commitment is not a valid compressed point in the prime order subgroup.
    #[error("commitment {index} is not a valid point")]
    PointInvalid { index: usize },
    /// A blob holds a field element that is not a canonical scalar.
    #[error("blob {blob_index} contains a field element that is not a canonical scalar")]
    ScalarOutOfRange { blob_index: usize },
    /// The batched commitment check failed.
    #[error("commitments do not match the blobs")]
    PairingVerificationFailed,
}

impl VerifierError {
    /// Returns true if every input was well formed but the commitments do not
    /// match the blobs.
    pub const fn is_proof_invalid(&self) -> bool {
        matches!(self, Self::PairingVerificationFailed)
    }
}

/// Errors that can occur while loading protocol parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse protocol parameters: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field_elements_per_blob must be non zero")]
    ZeroFieldElementsPerBlob,
    #[error("max_blobs_per_tx is {max_blobs_per_tx}, which exceeds the list limit of {limit}")]
    MaxBlobsPerTxExceedsLimit {
        max_blobs_per_tx: usize,
        limit: usize,
    },
}
