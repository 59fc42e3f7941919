//! BIP32 derivation paths
//!
//! A path is the root marker `m` followed by `/` separated decimal
//! indices, each optionally suffixed by `'` for hardened derivation:
//!
//! ```
//! use secp256k1_bip32::path::{DerivationPath, HARDENED_OFFSET};
//!
//! let path : DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
//!
//! assert_eq!(path.as_ref(), &[HARDENED_OFFSET + 44, HARDENED_OFFSET + 60, HARDENED_OFFSET, 0, 0]);
//! assert_eq!(path.to_string(), "m/44'/60'/0'/0/0");
//! ```
//!
//! The whole paths `m`, `M`, `m'` and `M'` all denote the root itself.
//!
use std::{fmt, ops::Deref, str::FromStr};
#[cfg(feature = "generic-serialization")]
use serde;
#[cfg(feature = "generic-serialization")]
use std::result;

use crate::error::{Error, Result};

/// child indices from this value onward are hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const ROOT_MARKER: &'static str = "m";
const ROOT_ALIASES: [&'static str; 4] = ["m", "M", "m'", "M'"];
const HARDENED_MARKER: char = '\'';

pub type DerivationIndex = u32;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DerivationType {
    Soft(u32),
    Hard(u32),
}

/// classify a raw child index, `Hard` carries the index without the offset
pub fn to_type(index: DerivationIndex) -> DerivationType {
    if is_hardened(index) {
        DerivationType::Hard(index - HARDENED_OFFSET)
    } else {
        DerivationType::Soft(index)
    }
}

pub fn is_hardened(index: DerivationIndex) -> bool {
    index >= HARDENED_OFFSET
}

/// the sequence of child indices from a node to one of its descendants
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Default)]
pub struct DerivationPath(Vec<DerivationIndex>);
impl Deref for DerivationPath {
    type Target = [DerivationIndex];
    fn deref(&self) -> &Self::Target { self.0.deref() }
}
impl AsRef<[DerivationIndex]> for DerivationPath {
    fn as_ref(&self) -> &[DerivationIndex] { self.0.as_ref() }
}
impl From<Vec<DerivationIndex>> for DerivationPath {
    fn from(v: Vec<DerivationIndex>) -> Self { DerivationPath(v) }
}
impl DerivationPath {
    pub fn new(v: Vec<DerivationIndex>) -> Self { DerivationPath(v) }

    /// the empty path, i.e. `m`
    pub fn root() -> Self { DerivationPath(Vec::new()) }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    /// append a child index to the path
    pub fn push(&mut self, index: DerivationIndex) { self.0.push(index) }

    /// return a new path with the given child index appended
    pub fn child(&self, index: DerivationIndex) -> Self {
        let mut path = self.clone();
        path.push(index);
        path
    }

    pub fn iter(&self) -> ::std::slice::Iter<DerivationIndex> { self.0.iter() }
}

fn parse_segment(segment: &str) -> Result<DerivationIndex> {
    let (digits, hardened) = if segment.len() > 1 && segment.ends_with(HARDENED_MARKER) {
        (&segment[..segment.len() - 1], true)
    } else {
        (segment, false)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidIndex(segment.to_owned()));
    }
    let value = match digits.parse::<u32>() {
        Ok(value) if value < HARDENED_OFFSET => value,
        _ => return Err(Error::InvalidIndex(segment.to_owned())),
    };

    if hardened {
        Ok(value + HARDENED_OFFSET)
    } else {
        Ok(value)
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        if ROOT_ALIASES.contains(&path) {
            return Ok(DerivationPath::root());
        }

        let mut segments = path.split('/');
        match segments.next() {
            Some(ROOT_MARKER) => {}
            _ => return Err(Error::InvalidPath(path.to_owned())),
        }

        let indices = segments.map(parse_segment).collect::<Result<Vec<_>>>()?;
        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", ROOT_MARKER)?;
        for index in self.0.iter() {
            match to_type(*index) {
                DerivationType::Soft(i) => write!(f, "/{}", i)?,
                DerivationType::Hard(i) => write!(f, "/{}{}", i, HARDENED_MARKER)?,
            }
        }
        Ok(())
    }
}

#[cfg(feature = "generic-serialization")]
impl serde::Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
#[cfg(feature = "generic-serialization")]
impl<'de> serde::Deserialize<'de> for DerivationPath {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PathVisitor;
        impl<'de> serde::de::Visitor<'de> for PathVisitor {
            type Value = DerivationPath;

            fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, "Expecting a derivation path (`m/44'/0'/0'/0/0')")
            }

            fn visit_str<E>(self, v: &str) -> result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(|err: Error| E::custom(err))
            }
        }
        deserializer.deserialize_str(PathVisitor)
    }
}
