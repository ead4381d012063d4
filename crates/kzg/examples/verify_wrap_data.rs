use blobwrap::{Blob, BlobList, BlobTxWrapData, FieldElement, KzgCommitment, ProtocolParams};
use blobwrap_kzg::Context;
use bls12_381::Scalar;
use tracing_forest::{util::LevelFilter, ForestLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn dummy_blob(params: &ProtocolParams, offset: u64) -> Blob {
    let elements = (0..params.field_elements_per_blob)
        .map(|i| FieldElement((-Scalar::from(i as u64 + offset)).to_bytes_be()))
        .collect();
    Blob::new(elements, params).expect("blob has the right length")
}

fn main() {
    let params = ProtocolParams::mainnet();
    let ctx = Context::insecure(&params, 0x5eed).expect("failed to build insecure setup");

    let blobs = (0..params.max_blobs_per_tx as u64)
        .map(|offset| dummy_blob(&params, offset))
        .collect();
    let wrap_data = BlobTxWrapData::from_blobs(BlobList::new(blobs).expect("within limit"), &ctx)
        .expect("failed to commit to blobs");
    let hashes = wrap_data.versioned_hashes(&params);

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    ctx.verify_wrap_data(&wrap_data, &hashes)
        .expect("honest wrap data must verify");

    // Swap in a commitment to the wrong blob, with hashes that match it.
    let other = ctx
        .blob_to_kzg_commitment(&dummy_blob(&params, 1000))
        .expect("failed to commit to blob");
    let mut commitments: Vec<KzgCommitment> = wrap_data.blob_kzgs.clone().into_inner();
    commitments[0] = other;
    let forged = BlobTxWrapData::new(
        commitments.try_into().expect("within limit"),
        wrap_data.blobs.clone(),
    );
    let forged_hashes = forged.versioned_hashes(&params);
    let err = ctx
        .verify_wrap_data(&forged, &forged_hashes)
        .expect_err("forged wrap data must not verify");
    println!("rejected forged wrap data: {err}");
}
