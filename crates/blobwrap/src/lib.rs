pub mod codec;
pub mod constants;
pub mod merkle;

mod blob;
mod commitment;
mod config;
mod envelope;
mod errors;
mod field_element;
mod list;
mod scheme;
mod wrap_data;

pub use blob::Blob;
pub use commitment::{KzgCommitment, VersionedHash, VersionedHashDigest};
pub use config::ProtocolParams;
pub use envelope::{BlobTransaction, BlobTxWrapper};
pub use errors::{ConfigError, Error, SerializationError, VerifierError};
pub use field_element::{read_field_elements, write_field_elements, FieldElement};
pub use list::{BlobList, CommitmentList, List, VersionedHashList};
pub use scheme::CommitmentScheme;
pub use wrap_data::BlobTxWrapData;
