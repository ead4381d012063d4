mod common;

use blobwrap::{Blob, FieldElement, KzgCommitment, ProtocolParams};
use blobwrap_kzg::{CommitmentScheme, Context, Error};
use common::{minimal_context, random_blob};
use sha3::{Digest, Keccak256};

#[test]
fn zero_blob_commits_to_the_identity() {
    let ctx = minimal_context();
    let blob = Blob::zeroed(ctx.params());

    let commitment = ctx.blob_to_kzg_commitment(&blob).unwrap();
    let mut identity = [0u8; 48];
    identity[0] = 0xc0;
    assert_eq!(commitment, KzgCommitment::new(identity));

    let hash = commitment.versioned_hash();
    let digest: [u8; 32] = Keccak256::digest(commitment.as_bytes()).into();
    assert_eq!(hash.version(), 0x01);
    assert_eq!(&hash.as_bytes()[1..], &digest[1..]);
    assert_eq!(
        hash.to_string(),
        "0x01624652859a6e98ffc1608e2af0147ca4e86e1ce27672d8d3f3c9d4ffd6ef7e"
    );
}

#[test]
fn commitment_is_deterministic() {
    let ctx = minimal_context();
    let blob = random_blob(ctx.params(), 11);

    let first = ctx.blob_to_kzg_commitment(&blob).unwrap();
    let second = blob.compute_commitment(&ctx).unwrap();
    assert_eq!(first, second);

    let point = ctx.point_from_compressed(&first).unwrap();
    assert_eq!(ctx.compress(&point), first);
}

#[test]
fn commitment_depends_on_the_setup() {
    let params = ProtocolParams::minimal();
    let blob = random_blob(&params, 5);

    let a = Context::insecure(&params, 1111).unwrap();
    let b = Context::insecure(&params, 2222).unwrap();
    assert_ne!(
        a.blob_to_kzg_commitment(&blob).unwrap(),
        b.blob_to_kzg_commitment(&blob).unwrap()
    );
}

#[test]
fn non_canonical_scalar_is_rejected_at_commit_time() {
    let ctx = minimal_context();
    let mut blob = random_blob(ctx.params(), 3);
    blob.field_elements_mut()[1] = FieldElement([0xff; 32]);

    assert!(matches!(
        ctx.blob_to_kzg_commitment(&blob),
        Err(Error::FieldElementNotCanonical { index: 1 })
    ));

    blob.field_elements_mut()[0] = FieldElement([0xff; 32]);
    assert!(matches!(
        ctx.blob_to_kzg_commitment(&blob),
        Err(Error::FieldElementNotCanonical { index: 0 })
    ));
}

#[test]
fn malformed_points_are_rejected() {
    let ctx = minimal_context();
    assert!(ctx.point_from_compressed(&KzgCommitment::new([0u8; 48])).is_none());
    assert!(ctx.point_from_compressed(&KzgCommitment::new([0xff; 48])).is_none());
}
