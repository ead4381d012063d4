use std::{fs, path::Path};

use bls12_381::{traits::*, G1Point, G1Projective, Scalar, G1_COMPRESSED_SIZE};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or generating a trusted setup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The setup file could not be read.
    #[error("could not read trusted setup file: {0}")]
    Io(#[from] std::io::Error),
    /// The setup is not valid json in the expected format.
    #[error("could not parse trusted setup json: {0}")]
    Json(#[from] serde_json::Error),
    /// A point was not prefixed with `0x`.
    #[error("g1 point {index} is not prefixed with 0x")]
    MissingHexPrefix {
        /// Position of the point in the setup.
        index: usize,
    },
    /// A point was not valid hex.
    #[error("g1 point {index} is not valid hex: {source}")]
    InvalidHex {
        /// Position of the point in the setup.
        index: usize,
        /// Underlying hex decoding failure.
        source: hex::FromHexError,
    },
    /// A point did not decode to 48 bytes.
    #[error("g1 point {index} has {length} bytes, expected 48")]
    InvalidPointLength {
        /// Position of the point in the setup.
        index: usize,
        /// Number of bytes decoded.
        length: usize,
    },
    /// A point is not a valid compressed point, or not in the prime order subgroup.
    #[error("g1 point {index} is not a valid compressed point")]
    InvalidPoint {
        /// Position of the point in the setup.
        index: usize,
    },
    /// Lagrange setups are defined over a multiplicative subgroup of size 2^k.
    #[error("setup size {size} is not a power of two")]
    SizeNotPowerOfTwo {
        /// Requested number of points.
        size: usize,
    },
    /// The secret evaluates to an element of the domain, which leaves the basis undefined.
    #[error("secret lies in the evaluation domain")]
    SecretInDomain,
}

/// G1 Lagrange points of a KZG structured reference string.
///
/// Only the Lagrange form is held: committing to a blob given in evaluation
/// form, and checking that a commitment matches such a blob, needs nothing else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrustedSetup {
    /// G1 Lagrange represents a list of compressed hex encoded group elements
    /// in the G1 group on the bls12-381 curve, in bit-reversed order.
    ///
    /// The length of this vector is the number of field elements in a blob.
    pub g1_lagrange: Vec<String>,
}

/// An enum used to specify whether to check that the points are in the correct subgroup
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubgroupCheck {
    Check,
    NoCheck,
}

impl TrustedSetup {
    /// Parse a Json string in the format specified by the ethereum trusted setup,
    /// checking every point.
    ///
    /// The file that is being used on mainnet is located here:
    /// <https://github.com/ethereum/consensus-specs/blob/389b2ddfb954731da7ccf4c0ef89fab2d4575b99/presets/mainnet/trusted_setups/trusted_setup_4096.json>
    ///
    /// Keys other than `g1_lagrange` (`g1_monomial`, `g2_monomial`) are ignored.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let trusted_setup = Self::from_json_unchecked(json)?;
        trusted_setup.g1_lagrange_points(SubgroupCheck::Check)?;
        Ok(trusted_setup)
    }

    /// Parse a Json string in the format specified by the ethereum trusted setup.
    ///
    /// This method does not decode the points.
    pub fn from_json_unchecked(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and validates a trusted setup file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the setup to the json format accepted by [`Self::from_json`].
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of points in the setup.
    pub fn len(&self) -> usize {
        self.g1_lagrange.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g1_lagrange.is_empty()
    }

    /// Decodes the G1 Lagrange points.
    pub fn g1_lagrange_points(&self, check: SubgroupCheck) -> Result<Vec<G1Point>, Error> {
        self.g1_lagrange
            .iter()
            .enumerate()
            .map(|(index, hex_str)| deserialize_g1_point(index, hex_str, check))
            .collect()
    }

    /// Generates a setup from a known secret.
    ///
    /// Anyone that knows `secret` can forge commitments, so this must only be
    /// used for tests and local development networks.
    ///
    /// Point `i` is `[L_brp(i)(secret)]G₁` where `L_j` is the `j`-th Lagrange
    /// basis polynomial over the `size`-th roots of unity and `brp` is the
    /// bit-reversal permutation, matching the layout of the mainnet setup.
    pub fn insecure_from_secret(size: usize, secret: u64) -> Result<Self, Error> {
        if !size.is_power_of_two() || size.ilog2() > Scalar::S {
            return Err(Error::SizeNotPowerOfTwo { size });
        }

        let tau = Scalar::from(secret);
        let omega = root_of_unity(size);

        // L_j(τ) = ω^j (τ^n - 1) / (n (τ - ω^j))
        let tau_pow_n_minus_one = tau.pow_vartime([size as u64]) - Scalar::ONE;
        let n_inv = Option::<Scalar>::from(Scalar::from(size as u64).invert())
            .ok_or(Error::SecretInDomain)?;

        let mut omega_j = Scalar::ONE;
        let mut basis = Vec::with_capacity(size);
        for _ in 0..size {
            let denominator: Option<Scalar> = (tau - omega_j).invert().into();
            let denominator = denominator.ok_or(Error::SecretInDomain)?;
            basis.push(omega_j * tau_pow_n_minus_one * n_inv * denominator);
            omega_j *= omega;
        }

        bitreverse_slice(&mut basis);

        let g1_lagrange = basis
            .iter()
            .map(|l| {
                let point = (G1Projective::generator() * l).to_affine();
                format!("0x{}", hex::encode(point.to_compressed()))
            })
            .collect();

        Ok(Self { g1_lagrange })
    }
}

/// Returns a primitive `size`-th root of unity. `size` must be a power of two.
fn root_of_unity(size: usize) -> Scalar {
    let log_size = size.ilog2();
    Scalar::ROOT_OF_UNITY.pow_vartime([1u64 << (Scalar::S - log_size)])
}

fn bitreverse(mut n: u32, l: u32) -> u32 {
    let mut r = 0;
    for _ in 0..l {
        r = (r << 1) | (n & 1);
        n >>= 1;
    }
    r
}

/// Permutes a slice whose length is a power of two into bit-reversed order.
fn bitreverse_slice<T>(a: &mut [T]) {
    if a.len() <= 1 {
        return;
    }

    let n = a.len();
    let log_n = n.ilog2();

    for k in 0..n {
        let rk = bitreverse(k as u32, log_n) as usize;
        if k < rk {
            a.swap(rk, k);
        }
    }
}

fn deserialize_g1_point(
    index: usize,
    hex_str: &str,
    check: SubgroupCheck,
) -> Result<G1Point, Error> {
    let without_prefix = hex_str
        .strip_prefix("0x")
        .ok_or(Error::MissingHexPrefix { index })?;
    let bytes = hex::decode(without_prefix).map_err(|source| Error::InvalidHex { index, source })?;
    let bytes: [u8; G1_COMPRESSED_SIZE] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidPointLength {
            index,
            length: bytes.len(),
        })?;

    let point = match check {
        SubgroupCheck::Check => G1Point::from_compressed(&bytes),
        SubgroupCheck::NoCheck => G1Point::from_compressed_unchecked(&bytes),
    };
    Option::from(point).ok_or(Error::InvalidPoint { index })
}
