use std::{error, fmt, result};

use crate::util::{base58, hex};

/// errors of the key tree: construction, derivation and serialization
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// the fields given to the `Builder` do not describe a valid key node
    InvalidOptions(&'static str),
    /// the derivation path does not start with the root marker `m`.
    /// Contains the given path.
    InvalidPath(String),
    /// a path segment is not a decimal index below the hardened offset.
    /// Contains the faulty segment.
    InvalidIndex(String),
    /// hardened derivation (or private serialization) of a public-only key
    MissingPrivateKey,
    /// `IL` of a derivation step is not below the curve order
    ScalarOutOfRange,
    /// a derivation step, or a key, ends up with the zero scalar (or the
    /// point at infinity)
    ZeroResult,
    /// the seed is not a valid hexadecimal string
    InvalidSeed(hex::Error),
    /// the parent key is already at the maximum depth of 255
    DepthOverflow,
    /// no valid child found while retrying derivation, contains the last
    /// index tried
    RetriesExhausted(u32),
    /// the extended key is not valid Base58Check
    Base58(base58::Error),
    /// the decoded extended key has an invalid length. Contains the length
    /// of the payload.
    InvalidLength(usize),
    /// the decoded extended key has an unknown version
    UnknownVersion(u32),
    /// the key material of a decoded extended key is not valid
    InvalidKeyData(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidOptions(reason) => write!(f, "Invalid options: {}", reason),
            Error::InvalidPath(path) => write!(f, "Invalid path \"{}\", expected to start with \"m\"", path),
            Error::InvalidIndex(segment) => write!(
                f,
                "Invalid index \"{}\", expected a decimal number below 0x80000000 optionally hardened with '",
                segment
            ),
            Error::MissingPrivateKey => write!(f, "Private key required but the key is public only"),
            Error::ScalarOutOfRange => write!(f, "Derived scalar is not below the curve order"),
            Error::ZeroResult => write!(f, "Derived key is zero"),
            Error::InvalidSeed(err) => write!(f, "Invalid seed: {}", err),
            Error::DepthOverflow => write!(f, "Maximum derivation depth reached"),
            Error::RetriesExhausted(index) => {
                write!(f, "No valid child key found, last index tried 0x{:08x}", index)
            }
            Error::Base58(err) => write!(f, "Invalid base58: {}", err),
            Error::InvalidLength(len) => write!(
                f,
                "Invalid extended key length, expected {} bytes but received {} bytes",
                crate::hdkey::SERIALIZED_SIZE,
                len
            ),
            Error::UnknownVersion(version) => write!(f, "Unknown extended key version 0x{:08x}", version),
            Error::InvalidKeyData(reason) => write!(f, "Invalid key data: {}", reason),
        }
    }
}
impl error::Error for Error {}

impl From<base58::Error> for Error {
    fn from(e: base58::Error) -> Error { Error::Base58(e) }
}

pub type Result<T> = result::Result<T, Error>;
