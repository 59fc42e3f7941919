//! Elliptic curve operations needed by the key derivation.
//!
//! The derivation only needs a handful of operations on scalars and points;
//! they are gathered in the `Curve` trait so the derivation logic can be
//! exercised against an instrumented curve. `Secp256k1Curve` is the
//! implementation used everywhere else.
//!
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};

use crate::error::{Error, Result};

pub const SCALAR_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 33;

/// order of the secp256k1 group, big endian
pub const CURVE_ORDER: [u8; SCALAR_SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

pub trait Curve {
    /// compressed point `scalar·G`.
    ///
    /// `scalar` is taken modulo the curve order; a scalar congruent to
    /// zero has no public key and gives `Error::ZeroResult`.
    fn public_key(&self, scalar: &[u8; SCALAR_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE]>;

    /// `(tweak + scalar) mod n`
    ///
    /// fails with `Error::ScalarOutOfRange` if `tweak >= n` and with
    /// `Error::ZeroResult` if the sum is zero.
    fn scalar_add(&self, tweak: &[u8; SCALAR_SIZE], scalar: &[u8; SCALAR_SIZE]) -> Result<[u8; SCALAR_SIZE]>;

    /// compressed point `tweak·G + point`
    ///
    /// fails with `Error::ScalarOutOfRange` if `tweak >= n` and with
    /// `Error::ZeroResult` if the sum is the point at infinity.
    fn point_add(&self, tweak: &[u8; SCALAR_SIZE], point: &[u8; PUBLIC_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE]>;

    /// check the given bytes are a compressed point of the curve
    fn check_point(&self, point: &[u8; PUBLIC_KEY_SIZE]) -> Result<()>;
}

/// secp256k1 through libsecp256k1, using its global context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Secp256k1Curve;

impl Curve for Secp256k1Curve {
    fn public_key(&self, scalar: &[u8; SCALAR_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE]> {
        let sk = secret_key(&reduce(scalar))?;
        Ok(PublicKey::from_secret_key(SECP256K1, &sk).serialize())
    }

    fn scalar_add(&self, tweak: &[u8; SCALAR_SIZE], scalar: &[u8; SCALAR_SIZE]) -> Result<[u8; SCALAR_SIZE]> {
        let tweak = Scalar::from_be_bytes(*tweak).map_err(|_| Error::ScalarOutOfRange)?;
        let scalar = reduce(scalar);
        if is_zero(&scalar) {
            // nothing to tweak, the sum is the tweak itself
            return secret_key(&tweak.to_be_bytes()).map(|sk| sk.secret_bytes());
        }
        let sk = secret_key(&scalar)?;
        let sum = sk.add_tweak(&tweak).map_err(|_| Error::ZeroResult)?;
        Ok(sum.secret_bytes())
    }

    fn point_add(&self, tweak: &[u8; SCALAR_SIZE], point: &[u8; PUBLIC_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE]> {
        let tweak = Scalar::from_be_bytes(*tweak).map_err(|_| Error::ScalarOutOfRange)?;
        let pk = PublicKey::from_slice(point)
            .map_err(|_| Error::InvalidKeyData("not a compressed secp256k1 point"))?;
        let sum = pk.add_exp_tweak(SECP256K1, &tweak).map_err(|_| Error::ZeroResult)?;
        Ok(sum.serialize())
    }

    fn check_point(&self, point: &[u8; PUBLIC_KEY_SIZE]) -> Result<()> {
        PublicKey::from_slice(point)
            .map(|_| ())
            .map_err(|_| Error::InvalidKeyData("not a compressed secp256k1 point"))
    }
}

fn secret_key(scalar: &[u8; SCALAR_SIZE]) -> Result<SecretKey> {
    // only fails on zero once the scalar is reduced
    SecretKey::from_slice(scalar).map_err(|_| Error::ZeroResult)
}

fn is_zero(scalar: &[u8; SCALAR_SIZE]) -> bool {
    scalar.iter().all(|b| *b == 0)
}

/// `true` if the big endian `scalar` is strictly below the curve order
pub fn is_below_order(scalar: &[u8; SCALAR_SIZE]) -> bool {
    // lexicographic order on big endian bytes is the numeric order
    scalar[..] < CURVE_ORDER[..]
}

/// reduce a 256 bits big endian integer modulo the curve order.
///
/// Any 256 bits value is below `2n`, one subtraction is enough.
pub fn reduce(scalar: &[u8; SCALAR_SIZE]) -> [u8; SCALAR_SIZE] {
    if is_below_order(scalar) {
        return *scalar;
    }
    let mut out = [0u8; SCALAR_SIZE];
    let mut borrow = 0i16;
    for i in (0..SCALAR_SIZE).rev() {
        let mut r = scalar[i] as i16 - CURVE_ORDER[i] as i16 - borrow;
        if r < 0 {
            r += 256;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out[i] = r as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hex;

    const G: &'static str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const G2: &'static str = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";

    fn scalar(v: u8) -> [u8; SCALAR_SIZE] {
        let mut s = [0u8; SCALAR_SIZE];
        s[SCALAR_SIZE - 1] = v;
        s
    }

    fn order_plus(v: u8) -> [u8; SCALAR_SIZE] {
        let mut s = CURVE_ORDER;
        s[SCALAR_SIZE - 1] += v;
        s
    }

    #[test]
    fn public_key_of_one_is_generator() {
        let pk = Secp256k1Curve.public_key(&scalar(1)).unwrap();
        assert_eq!(hex::encode(&pk), G);
    }

    #[test]
    fn public_key_reduces_modulo_order() {
        let pk = Secp256k1Curve.public_key(&order_plus(2)).unwrap();
        assert_eq!(hex::encode(&pk), G2);
        assert_eq!(Secp256k1Curve.public_key(&CURVE_ORDER), Err(Error::ZeroResult));
        assert_eq!(Secp256k1Curve.public_key(&[0; SCALAR_SIZE]), Err(Error::ZeroResult));
    }

    #[test]
    fn reduce_values() {
        assert_eq!(reduce(&scalar(7)), scalar(7));
        assert_eq!(reduce(&CURVE_ORDER), [0; SCALAR_SIZE]);
        assert_eq!(reduce(&order_plus(5)), scalar(5));
        let max = [0xff; SCALAR_SIZE];
        // 2^256 - 1 - n
        assert_eq!(
            hex::encode(&reduce(&max)),
            "000000000000000000000000000000014551231950b75fc4402da1732fc9bebe"
        );
    }

    #[test]
    fn scalar_add_ok() {
        let sum = Secp256k1Curve.scalar_add(&scalar(1), &scalar(1)).unwrap();
        assert_eq!(sum, scalar(2));
        let wrapped = Secp256k1Curve.scalar_add(&scalar(3), &order_plus(0)).unwrap();
        assert_eq!(wrapped, scalar(3));
    }

    #[test]
    fn scalar_add_wraps_around_order() {
        let mut n_minus_one = CURVE_ORDER;
        n_minus_one[SCALAR_SIZE - 1] -= 1;
        let sum = Secp256k1Curve.scalar_add(&scalar(2), &n_minus_one).unwrap();
        assert_eq!(sum, scalar(1));
    }

    #[test]
    fn scalar_add_rejects_tweak_out_of_range() {
        assert_eq!(
            Secp256k1Curve.scalar_add(&CURVE_ORDER, &scalar(1)),
            Err(Error::ScalarOutOfRange)
        );
        assert_eq!(
            Secp256k1Curve.scalar_add(&[0xff; SCALAR_SIZE], &scalar(1)),
            Err(Error::ScalarOutOfRange)
        );
    }

    #[test]
    fn scalar_add_rejects_zero_sum() {
        let mut n_minus_one = CURVE_ORDER;
        n_minus_one[SCALAR_SIZE - 1] -= 1;
        assert_eq!(
            Secp256k1Curve.scalar_add(&scalar(1), &n_minus_one),
            Err(Error::ZeroResult)
        );
        assert_eq!(
            Secp256k1Curve.scalar_add(&scalar(0), &[0; SCALAR_SIZE]),
            Err(Error::ZeroResult)
        );
    }

    #[test]
    fn point_add_matches_scalar_add() {
        let mut g = [0u8; PUBLIC_KEY_SIZE];
        g.copy_from_slice(&hex::decode(G).unwrap());
        let p = Secp256k1Curve.point_add(&scalar(1), &g).unwrap();
        assert_eq!(hex::encode(&p), G2);
        assert_eq!(Secp256k1Curve.point_add(&CURVE_ORDER, &g), Err(Error::ScalarOutOfRange));
    }

    #[test]
    fn check_point() {
        let mut g = [0u8; PUBLIC_KEY_SIZE];
        g.copy_from_slice(&hex::decode(G).unwrap());
        assert!(Secp256k1Curve.check_point(&g).is_ok());
        g[0] = 0x05;
        assert!(Secp256k1Curve.check_point(&g).is_err());
    }
}
