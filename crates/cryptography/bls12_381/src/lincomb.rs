use crate::{traits::*, G1Point, G1Projective, Scalar};

/// A multi-scalar multiplication over G1 elements.
///
/// Returns `None` if the points and the scalars are not the same length.
///
/// Points at infinity are filtered out before calling into blst, since blst
/// returns the identity element if any of the input points is the identity.
pub fn g1_lincomb(points: &[G1Point], scalars: &[Scalar]) -> Option<G1Projective> {
    if points.len() != scalars.len() {
        return None;
    }

    let (points_filtered, scalars_filtered): (Vec<G1Projective>, Vec<Scalar>) = points
        .iter()
        .zip(scalars)
        .filter(|(point, _)| !bool::from(point.is_identity()))
        .map(|(point, scalar)| (G1Projective::from(point), *scalar))
        .unzip();

    if points_filtered.is_empty() {
        return Some(G1Projective::identity());
    }

    Some(G1Projective::multi_exp(&points_filtered, &scalars_filtered))
}
