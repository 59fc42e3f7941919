//! Root of the key tree
//!
//! The root key is `HMAC-SHA512(key = "Bitcoin seed", data = seed)`: the
//! first 32 bytes are the master private key, the last 32 bytes the master
//! chain code.
//!
//! ```
//! use secp256k1_bip32::master::{Seed, generate_from_seed};
//!
//! let seed = Seed::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
//! let root = generate_from_seed(&seed).unwrap();
//!
//! assert_eq!(root.depth(), 0);
//! assert_eq!(root.fingerprint().to_u32(), 0x3442193e);
//! ```
//!
//! The master private key is not checked against the curve order. A seed
//! whose `IL` is not below the order keeps `IL` as is for its private key,
//! and its public key is the one of `IL mod n`.
//!
use cryptoxide::hmac::Hmac;
use cryptoxide::mac::Mac;
use cryptoxide::sha2::Sha512;

use std::fmt;

use crate::error::{Error, Result};
use crate::hdkey::{ExtendedKey, CHAIN_CODE_SIZE, PRIVATE_KEY_SIZE};
use crate::util::{hex, securemem};

/// personalization key of the master key HMAC
pub const MASTER_SECRET: &'static [u8] = b"Bitcoin seed";

/// Seed bytes the root key is generated from.
///
/// BIP32 recommends 16 to 64 bytes, no length is enforced here.
pub struct Seed(Vec<u8>);
impl Seed {
    /// create a Seed by copying the given slice
    pub fn from_slice(buf: &[u8]) -> Self { Seed(buf.to_vec()) }

    /// create a Seed from its hexadecimal representation
    ///
    /// ```
    /// use secp256k1_bip32::master::Seed;
    ///
    /// assert!(Seed::from_hex("000102").is_ok());
    /// assert!(Seed::from_hex("00010").is_err());
    /// assert!(Seed::from_hex("seed").is_err());
    /// ```
    pub fn from_hex(hex_seed: &str) -> Result<Self> {
        hex::decode(hex_seed).map(Seed).map_err(Error::InvalidSeed)
    }
}
impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] { &self.0 }
}
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Seed(<{} bytes>)", self.0.len())
    }
}
impl Drop for Seed {
    fn drop(&mut self) {
        securemem::zero(&mut self.0);
    }
}

/// generate the root key of the tree from a hexadecimal seed
pub fn from_master_seed(seed_hex: &str) -> Result<ExtendedKey> {
    let seed = Seed::from_hex(seed_hex)?;
    generate_from_seed(&seed)
}

/// generate the root key of the tree.
///
/// Deterministic: the same `Seed` always gives the same key.
pub fn generate_from_seed(seed: &Seed) -> Result<ExtendedKey> {
    let mut mac = Hmac::new(Sha512::new(), MASTER_SECRET);
    mac.input(seed.as_ref());
    let mut out = [0u8; 64];
    mac.raw_result(&mut out);

    let root = root_from_hmac(&out);
    securemem::zero(&mut out);
    let root = root?;
    debug!("generated root key {} from a {} bytes seed", root.fingerprint(), seed.as_ref().len());
    Ok(root)
}

fn root_from_hmac(out: &[u8; 64]) -> Result<ExtendedKey> {
    let mut il = [0u8; PRIVATE_KEY_SIZE];
    let mut ir = [0u8; CHAIN_CODE_SIZE];
    il.copy_from_slice(&out[0..32]);
    ir.copy_from_slice(&out[32..64]);

    let root = ExtendedKey::builder().private_key(il).chain_code(ir).build();
    securemem::zero(&mut il);
    securemem::zero(&mut ir);
    root
}
