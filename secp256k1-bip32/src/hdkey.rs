//! BIP32 Hierarchical Deterministic (HD) keys over secp256k1
//!
//! Supports:
//! * Private (CKDpriv) hard and soft derivation using 32 bits indices
//! * Public (CKDpub) soft derivation of public-only keys
//! * Derivation along a `DerivationPath` (`m/44'/60'/0'/0/0`)
//! * Serialization to and from the `xprv`/`xpub` Base58Check format
//!
//! Keys are immutable: every derivation returns a new `ExtendedKey`.
//!
//! ```
//! use secp256k1_bip32::master::from_master_seed;
//!
//! let root = from_master_seed("000102030405060708090a0b0c0d0e0f").unwrap();
//! let child = root.derive("m/0'/1").unwrap();
//!
//! assert_eq!(child.depth(), 2);
//! assert!(child.public_extended_key().starts_with("xpub"));
//! ```
//!
use cryptoxide::hmac::Hmac;
use cryptoxide::mac::Mac;
use cryptoxide::sha2::Sha512;
use cryptoxide::util::fixed_time_eq;

#[cfg(feature = "generic-serialization")]
use serde;
#[cfg(feature = "generic-serialization")]
use std::result;
use std::{fmt, str::FromStr};

use crate::curve::{is_below_order, Curve, Secp256k1Curve, PUBLIC_KEY_SIZE, SCALAR_SIZE};
use crate::error::{Error, Result};
use crate::hash::Hash160;
use crate::path::{is_hardened, to_type, DerivationIndex, DerivationPath, DerivationType};
use crate::util::{base58, hex, securemem};

pub const PRIVATE_KEY_SIZE: usize = SCALAR_SIZE;
pub const CHAIN_CODE_SIZE: usize = 32;
pub const FINGERPRINT_SIZE: usize = 4;

/// size of the binary extended key, before the Base58Check checksum
pub const SERIALIZED_SIZE: usize = 78;

/// version bytes of a mainnet private extended key (`xprv`)
pub const PRIVATE_VERSION: u32 = 0x0488_ADE4;
/// version bytes of a mainnet public extended key (`xpub`)
pub const PUBLIC_VERSION: u32 = 0x0488_B21E;

/// the depth is serialized on a single byte
pub const MAX_DEPTH: u8 = ::std::u8::MAX;

/// number of consecutive indices tried by `derive_child` before giving up.
///
/// A single invalid child happens with a probability below 2^-127.
pub const MAX_DERIVATION_ATTEMPTS: u32 = 8;

pub type ChainCode = [u8; CHAIN_CODE_SIZE];

/// extended key serialization namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Private,
    Public,
}
impl Version {
    pub fn to_u32(self) -> u32 {
        match self {
            Version::Private => PRIVATE_VERSION,
            Version::Public => PUBLIC_VERSION,
        }
    }

    pub fn from_u32(v: u32) -> Result<Self> {
        match v {
            PRIVATE_VERSION => Ok(Version::Private),
            PUBLIC_VERSION => Ok(Version::Public),
            _ => Err(Error::UnknownVersion(v)),
        }
    }
}

/// first 4 bytes of the HASH160 of a compressed public key.
///
/// The root key has the zero fingerprint as parent fingerprint.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
pub struct Fingerprint([u8; FINGERPRINT_SIZE]);
impl Fingerprint {
    pub fn from_bytes(bytes: [u8; FINGERPRINT_SIZE]) -> Self { Fingerprint(bytes) }

    /// fingerprint of the given compressed public key
    pub fn of(public_key: &[u8]) -> Self {
        let mut out = [0u8; FINGERPRINT_SIZE];
        out.copy_from_slice(&Hash160::new(public_key).as_ref()[..FINGERPRINT_SIZE]);
        Fingerprint(out)
    }

    pub fn to_u32(self) -> u32 { u32::from_be_bytes(self.0) }

    pub fn is_zero(&self) -> bool { self.0 == [0; FINGERPRINT_SIZE] }
}
impl From<u32> for Fingerprint {
    fn from(v: u32) -> Self { Fingerprint(v.to_be_bytes()) }
}
impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] { &self.0 }
}
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Construction of an `ExtendedKey` from its individual fields.
///
/// ```
/// use secp256k1_bip32::hdkey::ExtendedKey;
///
/// let mut secret = [0u8; 32];
/// secret[31] = 1;
///
/// let key = ExtendedKey::builder()
///     .private_key(secret)
///     .chain_code([0u8; 32])
///     .build()
///     .unwrap();
///
/// assert_eq!(key.depth(), 0);
/// assert!(ExtendedKey::builder().private_key(secret).build().is_err());
/// ```
#[derive(Clone, Default)]
pub struct Builder {
    private_key: Option<[u8; PRIVATE_KEY_SIZE]>,
    public_key: Option<[u8; PUBLIC_KEY_SIZE]>,
    chain_code: Option<ChainCode>,
    depth: u8,
    index: DerivationIndex,
    parent_fingerprint: Fingerprint,
}
impl Builder {
    pub fn new() -> Self { Builder::default() }

    /// the private scalar, big endian. The public key is computed from it.
    pub fn private_key(mut self, private_key: [u8; PRIVATE_KEY_SIZE]) -> Self {
        self.private_key = Some(private_key);
        self
    }

    /// the compressed public key. If a private key is given too,
    /// this must be its public key.
    pub fn public_key(mut self, public_key: [u8; PUBLIC_KEY_SIZE]) -> Self {
        self.public_key = Some(public_key);
        self
    }

    pub fn chain_code(mut self, chain_code: ChainCode) -> Self {
        self.chain_code = Some(chain_code);
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn index(mut self, index: DerivationIndex) -> Self {
        self.index = index;
        self
    }

    pub fn parent_fingerprint(mut self, parent_fingerprint: Fingerprint) -> Self {
        self.parent_fingerprint = parent_fingerprint;
        self
    }

    pub fn build(self) -> Result<ExtendedKey> { self.build_with(&Secp256k1Curve) }

    pub fn build_with<C: Curve>(self, curve: &C) -> Result<ExtendedKey> {
        let chain_code = self.chain_code.ok_or(Error::InvalidOptions("missing chain code"))?;
        if self.depth == 0 && (self.index != 0 || !self.parent_fingerprint.is_zero()) {
            return Err(Error::InvalidOptions("root key with a parent fingerprint or a child index"));
        }

        let public_key = match (self.private_key.as_ref(), self.public_key) {
            (None, None) => return Err(Error::InvalidOptions("missing private or public key")),
            (Some(private_key), expected) => {
                let public_key = curve.public_key(private_key)?;
                match expected {
                    Some(ref pk) if !fixed_time_eq(pk, &public_key) => {
                        return Err(Error::InvalidOptions("public key does not match the private key"))
                    }
                    _ => public_key,
                }
            }
            (None, Some(public_key)) => {
                curve.check_point(&public_key)?;
                public_key
            }
        };

        Ok(ExtendedKey {
            depth: self.depth,
            index: self.index,
            private_key: self.private_key,
            public_key: public_key,
            chain_code: chain_code,
            fingerprint: Fingerprint::of(&public_key),
            parent_fingerprint: self.parent_fingerprint,
        })
    }
}

impl Drop for Builder {
    fn drop(&mut self) {
        if let Some(ref mut private_key) = self.private_key {
            securemem::zero(private_key);
        }
        if let Some(ref mut chain_code) = self.chain_code {
            securemem::zero(chain_code);
        }
    }
}

/// A node of the key tree: key material, chain code and position in the tree.
///
/// The private key is absent for keys created from public data only, see
/// `ExtendedKey::neuter`. The fingerprint is always the one of `public_key`.
#[derive(Clone)]
pub struct ExtendedKey {
    depth: u8,
    index: DerivationIndex,
    private_key: Option<[u8; PRIVATE_KEY_SIZE]>,
    public_key: [u8; PUBLIC_KEY_SIZE],
    chain_code: ChainCode,
    fingerprint: Fingerprint,
    parent_fingerprint: Fingerprint,
}
impl ExtendedKey {
    pub fn builder() -> Builder { Builder::new() }

    /// number of derivations from the root, 0 for the root
    pub fn depth(&self) -> u8 { self.depth }

    /// child index used to derive this key from its parent, 0 for the root
    pub fn index(&self) -> DerivationIndex { self.index }

    pub fn is_hardened(&self) -> bool { is_hardened(self.index) }

    pub fn private_key(&self) -> Option<&[u8; PRIVATE_KEY_SIZE]> { self.private_key.as_ref() }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] { &self.public_key }

    pub fn chain_code(&self) -> &ChainCode { &self.chain_code }

    pub fn fingerprint(&self) -> Fingerprint { self.fingerprint }

    pub fn parent_fingerprint(&self) -> Fingerprint { self.parent_fingerprint }

    /// HASH160 of the public key
    pub fn identifier(&self) -> Hash160 { Hash160::new(&self.public_key) }

    /// the namespace this key serializes to by default
    pub fn version(&self) -> Version {
        if self.private_key.is_some() {
            Version::Private
        } else {
            Version::Public
        }
    }

    /// the same node without its private key
    pub fn neuter(&self) -> Self {
        ExtendedKey {
            depth: self.depth,
            index: self.index,
            private_key: None,
            public_key: self.public_key,
            chain_code: self.chain_code,
            fingerprint: self.fingerprint,
            parent_fingerprint: self.parent_fingerprint,
        }
    }

    /// derive the child at the given index.
    ///
    /// Indices from `HARDENED_OFFSET` onward are hardened and need the
    /// private key. If the index gives an invalid key, the next index is
    /// tried instead, so the returned child's `index()` may be greater
    /// than the requested one.
    pub fn derive_child(&self, index: DerivationIndex) -> Result<Self> {
        self.derive_child_with(&Secp256k1Curve, index)
    }

    pub fn derive_child_with<C: Curve>(&self, curve: &C, index: DerivationIndex) -> Result<Self> {
        if self.depth == MAX_DEPTH {
            return Err(Error::DepthOverflow);
        }

        let mut index = index;
        let mut attempts = 0;
        loop {
            attempts += 1;
            match derive_step(self, curve, index) {
                Ok(child) => return Ok(child),
                Err(err @ Error::ScalarOutOfRange) | Err(err @ Error::ZeroResult) => {
                    warn!(
                        "invalid child 0x{:08x} of key {} ({}), skipping to the next index",
                        index, self.fingerprint, err
                    );
                    if attempts >= MAX_DERIVATION_ATTEMPTS {
                        return Err(Error::RetriesExhausted(index));
                    }
                    index = index.checked_add(1).ok_or(Error::RetriesExhausted(index))?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// derive the descendant at the given path, e.g. `m/44'/60'/0'/0/0`.
    ///
    /// The path is relative to this key: `m` returns this key.
    pub fn derive(&self, path: &str) -> Result<Self> {
        let path = path.parse::<DerivationPath>()?;
        self.derive_path(&path)
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        self.derive_path_with(&Secp256k1Curve, path)
    }

    pub fn derive_path_with<C: Curve>(&self, curve: &C, path: &DerivationPath) -> Result<Self> {
        debug!("deriving {} from key {} at depth {}", path, self.fingerprint, self.depth);
        path.iter()
            .try_fold(self.clone(), |key, index| key.derive_child_with(curve, *index))
    }

    /// the `xprv` Base58Check serialization
    pub fn private_extended_key(&self) -> Result<String> {
        let mut bytes = self.serialize(Version::Private)?;
        let encoded = base58::encode_check(&bytes);
        securemem::zero(&mut bytes);
        Ok(encoded)
    }

    /// the `xpub` Base58Check serialization
    pub fn public_extended_key(&self) -> String {
        let mut bytes = [0u8; SERIALIZED_SIZE];
        self.write_header(Version::Public, &mut bytes);
        bytes[45..].copy_from_slice(&self.public_key);
        base58::encode_check(&bytes)
    }

    /// parse an `xprv` or `xpub` Base58Check string
    pub fn from_extended_key(s: &str) -> Result<Self> {
        Self::from_extended_key_with(&Secp256k1Curve, s)
    }

    pub fn from_extended_key_with<C: Curve>(curve: &C, s: &str) -> Result<Self> {
        let mut bytes = base58::decode_check(s)?;
        let key = deserialize(curve, &bytes);
        securemem::zero(&mut bytes);
        key
    }

    fn write_header(&self, version: Version, out: &mut [u8; SERIALIZED_SIZE]) {
        out[0..4].copy_from_slice(&version.to_u32().to_be_bytes());
        out[4] = self.depth;
        out[5..9].copy_from_slice(self.parent_fingerprint.as_ref());
        out[9..13].copy_from_slice(&self.index.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
    }

    fn serialize(&self, version: Version) -> Result<[u8; SERIALIZED_SIZE]> {
        let mut out = [0u8; SERIALIZED_SIZE];
        self.write_header(version, &mut out);
        match version {
            Version::Private => {
                let private_key = self.private_key.as_ref().ok_or(Error::MissingPrivateKey)?;
                out[45] = 0;
                out[46..].copy_from_slice(private_key);
            }
            Version::Public => out[45..].copy_from_slice(&self.public_key),
        }
        Ok(out)
    }
}

/// one CKD step at exactly the given index
fn derive_step<C: Curve>(parent: &ExtendedKey, curve: &C, index: DerivationIndex) -> Result<ExtendedKey> {
    let mut mac = Hmac::new(Sha512::new(), &parent.chain_code);
    match to_type(index) {
        DerivationType::Hard(_) => {
            let private_key = parent.private_key.as_ref().ok_or(Error::MissingPrivateKey)?;
            mac.input(&[0x00]);
            mac.input(private_key);
        }
        DerivationType::Soft(_) => {
            mac.input(&parent.public_key);
        }
    }
    mac.input(&index.to_be_bytes());

    let mut out = [0u8; 64];
    mac.raw_result(&mut out);
    let mut il = [0u8; SCALAR_SIZE];
    let mut ir = [0u8; CHAIN_CODE_SIZE];
    il.copy_from_slice(&out[0..32]);
    ir.copy_from_slice(&out[32..64]);
    securemem::zero(&mut out);

    let builder = Builder::new()
        .chain_code(ir)
        .depth(parent.depth + 1)
        .index(index)
        .parent_fingerprint(parent.fingerprint);
    securemem::zero(&mut ir);

    let builder = match parent.private_key {
        Some(ref private_key) => curve.scalar_add(&il, private_key).map(|k| builder.private_key(k)),
        None => curve.point_add(&il, &parent.public_key).map(|k| builder.public_key(k)),
    };
    securemem::zero(&mut il);

    let child = builder?.build_with(curve)?;
    trace!("derived child 0x{:08x} of {}: {}", index, parent.fingerprint, child.fingerprint);
    Ok(child)
}

fn deserialize<C: Curve>(curve: &C, bytes: &[u8]) -> Result<ExtendedKey> {
    if bytes.len() != SERIALIZED_SIZE {
        return Err(Error::InvalidLength(bytes.len()));
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[0..4]);
    let version = Version::from_u32(u32::from_be_bytes(version))?;

    let mut parent_fingerprint = [0u8; FINGERPRINT_SIZE];
    parent_fingerprint.copy_from_slice(&bytes[5..9]);
    let mut index = [0u8; 4];
    index.copy_from_slice(&bytes[9..13]);
    let mut chain_code = [0u8; CHAIN_CODE_SIZE];
    chain_code.copy_from_slice(&bytes[13..45]);

    let builder = Builder::new()
        .depth(bytes[4])
        .parent_fingerprint(Fingerprint::from_bytes(parent_fingerprint))
        .index(u32::from_be_bytes(index))
        .chain_code(chain_code);
    securemem::zero(&mut chain_code);

    let builder = match version {
        Version::Private => {
            if bytes[45] != 0 {
                return Err(Error::InvalidKeyData("private key not prefixed by 0x00"));
            }
            let mut private_key = [0u8; PRIVATE_KEY_SIZE];
            private_key.copy_from_slice(&bytes[46..]);
            if !is_below_order(&private_key) || private_key == [0u8; PRIVATE_KEY_SIZE] {
                securemem::zero(&mut private_key);
                return Err(Error::InvalidKeyData("private key not in [1, n-1]"));
            }
            let builder = builder.private_key(private_key);
            securemem::zero(&mut private_key);
            builder
        }
        Version::Public => {
            let mut public_key = [0u8; PUBLIC_KEY_SIZE];
            public_key.copy_from_slice(&bytes[45..]);
            builder.public_key(public_key)
        }
    };
    builder.build_with(curve)
}

impl PartialEq for ExtendedKey {
    fn eq(&self, rhs: &ExtendedKey) -> bool {
        let private_eq = match (self.private_key.as_ref(), rhs.private_key.as_ref()) {
            (Some(a), Some(b)) => fixed_time_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        private_eq
            && self.depth == rhs.depth
            && self.index == rhs.index
            && self.public_key[..] == rhs.public_key[..]
            && fixed_time_eq(&self.chain_code, &rhs.chain_code)
            && self.parent_fingerprint == rhs.parent_fingerprint
    }
}
impl Eq for ExtendedKey {}
impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .field("index", &format_args!("0x{:08x}", self.index))
            .field("fingerprint", &self.fingerprint)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("public_key", &format_args!("{}", hex::encode(&self.public_key)))
            .field("has_private_key", &self.private_key.is_some())
            .finish()
    }
}
/// displays the public extended key, never the private one
impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.public_extended_key())
    }
}
impl FromStr for ExtendedKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> { Self::from_extended_key(s) }
}
impl Drop for ExtendedKey {
    fn drop(&mut self) {
        if let Some(ref mut private_key) = self.private_key {
            securemem::zero(private_key);
        }
        securemem::zero(&mut self.chain_code);
    }
}

#[cfg(feature = "generic-serialization")]
impl serde::Serialize for ExtendedKey {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.private_extended_key() {
            Ok(xprv) => serializer.serialize_str(&xprv),
            Err(_) => serializer.serialize_str(&self.public_extended_key()),
        }
    }
}
#[cfg(feature = "generic-serialization")]
impl<'de> serde::Deserialize<'de> for ExtendedKey {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ExtendedKeyVisitor;
        impl<'de> serde::de::Visitor<'de> for ExtendedKeyVisitor {
            type Value = ExtendedKey;

            fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, "Expecting a Base58Check extended key (`xprv...' or `xpub...')")
            }

            fn visit_str<E>(self, v: &str) -> result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ExtendedKey::from_extended_key(v).map_err(|err| E::custom(err))
            }
        }
        deserializer.deserialize_str(ExtendedKeyVisitor)
    }
}



#[cfg(test)]
#[cfg(feature = "generic-serialization")]
mod serde_tests {
    use super::*;
    use crate::master::from_master_seed;
    use serde_json;

    #[test]
    fn extended_key_as_string() {
        let key = from_master_seed("000102030405060708090a0b0c0d0e0f").unwrap().derive("m/0'").unwrap();

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.private_extended_key().unwrap()));
        let decoded: ExtendedKey = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, key);

        let json = serde_json::to_string(&key.neuter()).unwrap();
        assert_eq!(json, format!("\"{}\"", key.public_extended_key()));
        let decoded: ExtendedKey = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, key.neuter());

        assert!(serde_json::from_str::<ExtendedKey>("\"xpub\"").is_err());
    }

    #[test]
    fn path_as_string() {
        let path: DerivationPath = serde_json::from_str("\"m/44'/60'/0'/0/0\"").unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"m/44'/60'/0'/0/0\"");
        assert!(serde_json::from_str::<DerivationPath>("\"44'/0\"").is_err());
    }
}
