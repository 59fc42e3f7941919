//! Digests used by BIP32: the double SHA256 of Base58Check and the
//! HASH160 key identifier.
//!
use std::{error, fmt, result};

use cryptoxide::digest::Digest;
use cryptoxide::sha2::Sha256;
use ripemd::{Digest as RipemdDigest, Ripemd160};

use crate::util::hex;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Error {
    InvalidHashSize(usize, usize),
    HexadecimalError(hex::Error),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::InvalidHashSize(expected, sz) => {
                write!(f, "invalid hash size, expected {} but received {} bytes.", expected, sz)
            },
            &Error::HexadecimalError(err) => {
                write!(f, "Invalid hexadecimal input: {}", err)
            }
        }
    }
}
impl error::Error for Error {}
impl From<hex::Error> for Error {
    fn from(e: hex::Error) -> Error { Error::HexadecimalError(e) }
}

pub type Result<T> = result::Result<T, Error>;

pub const SHA256_SIZE : usize = 32;
pub const HASH160_SIZE : usize = 20;

fn sha256(buf: &[u8]) -> [u8;SHA256_SIZE] {
    let mut hasher = Sha256::new();
    let mut out = [0;SHA256_SIZE];
    hasher.input(buf);
    hasher.result(&mut out);
    out
}

/// SHA256(SHA256(data)), the checksum of Base58Check
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct Sha256d([u8;SHA256_SIZE]);
impl AsRef<[u8]> for Sha256d {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}
impl Sha256d {
    pub fn new(buf: &[u8]) -> Self {
        Sha256d(sha256(&sha256(buf)))
    }
}
impl fmt::Debug for Sha256d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..]))
    }
}
impl fmt::Display for Sha256d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..]))
    }
}

/// RIPEMD160(SHA256(data)), the identifier of a public key.
///
/// The first 4 bytes are the key fingerprint.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Hash160([u8;HASH160_SIZE]);
impl AsRef<[u8]> for Hash160 {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}
impl Hash160 {
    pub fn new(buf: &[u8]) -> Self {
        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha256(buf));
        let mut out = [0;HASH160_SIZE];
        out.copy_from_slice(&ripemd.finalize());
        Self::from_bytes(out)
    }

    pub fn from_bytes(bytes :[u8;HASH160_SIZE]) -> Self { Hash160(bytes) }
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HASH160_SIZE { return Err(Error::InvalidHashSize(HASH160_SIZE, bytes.len())); }
        let mut buf = [0;HASH160_SIZE];

        buf[0..HASH160_SIZE].clone_from_slice(bytes);
        Ok(Self::from_bytes(buf))
    }
    pub fn from_hex<S: AsRef<str>>(hex: &S) -> Result<Self> {
        let bytes = hex::decode(hex.as_ref())?;
        Self::from_slice(&bytes)
    }
}
impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..]))
    }
}
impl fmt::Display for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256d_empty() {
        let digest = Sha256d::new(b"");
        assert_eq!(
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456",
            digest.to_string()
        );
    }

    #[test]
    fn sha256d_hello() {
        let digest = Sha256d::new(b"hello");
        assert_eq!(
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50",
            digest.to_string()
        );
    }

    #[test]
    fn hash160_empty() {
        let digest = Hash160::new(b"");
        assert_eq!("b472a266d0bd89c13706a4132ccfb16f7c3b9fcb", digest.to_string());
    }

    #[test]
    fn hash160_compressed_generator() {
        // compressed encoding of the secp256k1 generator, the public key of scalar 1
        let g = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
        let digest = Hash160::new(&g);
        assert_eq!("751e76e8199196d454941c45d1b3a323f1433bd6", digest.to_string());
    }

    #[test]
    fn from_hex() {
        let hash = Hash160::from_hex(&"751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        assert_eq!(hash, Hash160::new(&hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap()));
        assert_eq!(Hash160::from_slice(&[0;19]), Err(Error::InvalidHashSize(HASH160_SIZE, 19)));
    }
}
