//! BIP44 addressing
//!
//! provides all the logic to create safe sequential addresses
//! using BIP44 specification: `m / 44' / coin_type' / account' / change / index`.
//!
//! # Example
//!
//! ```
//! use secp256k1_bip32::bip44::{Addressing, AddrType, CoinType};
//!
//! let addr = Addressing::new(CoinType::ETHEREUM, 0, AddrType::External, 0).unwrap();
//!
//! assert_eq!(addr.to_path().to_string(), "m/44'/60'/0'/0/0");
//! ```

use crate::path::{DerivationPath, HARDENED_OFFSET};
#[cfg(feature = "generic-serialization")]
use serde;
use std::{error, fmt, result};

/// the BIP44 derivation path has a specific length
pub const BIP44_PATH_LENGTH: usize = 5;
/// the BIP44 derivation path has a specific purpose
pub const BIP44_PURPOSE: u32 = 0x8000002C;

/// the soft derivation is upper bounded
pub const BIP44_SOFT_UPPER_BOUND: u32 = HARDENED_OFFSET;

/// Error relating to `bip44`'s `Addressing` operations
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
pub enum Error {
    /// this means the given `DerivationPath` has an incompatible length
    /// for bip44 derivation. See `BIP44_PATH_LENGTH` and `Addressing::from_path`.
    InvalidLength(usize),

    /// this means the given `DerivationPath` has an incompatible purpose
    /// for bip44 derivation. See `BIP44_PURPOSE` and `Addressing::from_path`.
    InvalidPurpose(u32),

    /// the coin type of the given `DerivationPath` is not a hard derivation.
    InvalidType(u32),

    /// the account is expected to be given as its number, below
    /// `BIP44_SOFT_UPPER_BOUND`, and derived as a hard derivation.
    AccountOutOfBound(u32),

    /// the change is expected to be a soft derivation.
    ChangeOutOfBound(u32),

    /// the index is expected to be a soft derivation.
    IndexOutOfBound(u32),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::InvalidLength(given) => write!(
                f,
                "Invalid length, expecting {} but received {}",
                BIP44_PATH_LENGTH, given
            ),
            &Error::InvalidPurpose(given) => write!(
                f,
                "Invalid purpose, expecting 0x{:x} but received 0x{:x}",
                BIP44_PURPOSE, given
            ),
            &Error::InvalidType(given) => write!(
                f,
                "Invalid coin type, should have a hard derivation but received 0x{:x}",
                given
            ),
            &Error::AccountOutOfBound(given) => write!(
                f,
                "Account out of bound, should have a hard derivation but received 0x{:x}",
                given
            ),
            &Error::ChangeOutOfBound(given) => write!(
                f,
                "Change out of bound, should have a soft derivation but received 0x{:x}",
                given
            ),
            &Error::IndexOutOfBound(given) => write!(
                f,
                "Index out of bound, should have a soft derivation but received 0x{:x}",
                given
            ),
        }
    }
}
impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// registered coin type (SLIP-0044), without the hardened offset
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoinType(u32);
impl CoinType {
    pub const BITCOIN: CoinType = CoinType(0);
    pub const ETHEREUM: CoinType = CoinType(60);

    pub fn new(coin_type: u32) -> Result<Self> {
        if coin_type >= BIP44_SOFT_UPPER_BOUND {
            return Err(Error::InvalidType(coin_type));
        }
        Ok(CoinType(coin_type))
    }

    pub fn get_coin_type(&self) -> u32 {
        self.0
    }
    pub fn get_scheme_value(&self) -> u32 {
        self.0 | HARDENED_OFFSET
    }
}
impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
#[cfg(feature = "generic-serialization")]
impl serde::Serialize for CoinType {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}
#[cfg(feature = "generic-serialization")]
impl<'de> serde::Deserialize<'de> for CoinType {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_u32(SoftVisitor::<CoinType>(CoinType::new, "CoinType"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Account(u32);
impl Account {
    pub fn new(account: u32) -> Result<Self> {
        if account >= BIP44_SOFT_UPPER_BOUND {
            return Err(Error::AccountOutOfBound(account));
        }
        Ok(Account(account))
    }

    pub fn get_account_number(&self) -> u32 {
        self.0
    }
    pub fn get_scheme_value(&self) -> u32 {
        self.0 | HARDENED_OFFSET
    }

    pub fn change(&self, coin_type: CoinType, typ: AddrType) -> Change {
        Change {
            coin_type: coin_type,
            account: *self,
            change: typ,
        }
    }

    pub fn internal(&self, coin_type: CoinType) -> Change {
        self.change(coin_type, AddrType::Internal)
    }
    pub fn external(&self, coin_type: CoinType) -> Change {
        self.change(coin_type, AddrType::External)
    }
}
impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
#[cfg(feature = "generic-serialization")]
impl serde::Serialize for Account {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}
#[cfg(feature = "generic-serialization")]
impl<'de> serde::Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_u32(SoftVisitor::<Account>(Account::new, "Account"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Index(u32);
impl Index {
    pub fn new(index: u32) -> Result<Self> {
        if index >= BIP44_SOFT_UPPER_BOUND {
            return Err(Error::IndexOutOfBound(index));
        }
        Ok(Index(index))
    }
    pub fn get_scheme_value(&self) -> u32 {
        self.0
    }
    pub fn incr(&self, i: u32) -> Result<Self> {
        if i >= BIP44_SOFT_UPPER_BOUND {
            return Err(Error::IndexOutOfBound(i));
        }
        let r = self.0 + i;
        if r >= BIP44_SOFT_UPPER_BOUND {
            return Err(Error::IndexOutOfBound(r));
        }
        Ok(Index(r))
    }

    pub fn decr(&self, i: u32) -> Result<Self> {
        if self.0 < i {
            return Err(Error::IndexOutOfBound(0));
        }
        let r = self.0 - i;
        Ok(Index(r))
    }
}
#[cfg(feature = "generic-serialization")]
impl serde::Serialize for Index {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}
#[cfg(feature = "generic-serialization")]
impl<'de> serde::Deserialize<'de> for Index {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_u32(SoftVisitor::<Index>(Index::new, "Index"))
    }
}

/// visitor of the values given without their hardened offset: `CoinType`,
/// `Account` and `Index`
#[cfg(feature = "generic-serialization")]
struct SoftVisitor<T>(fn(u32) -> Result<T>, &'static str);
#[cfg(feature = "generic-serialization")]
impl<'de, T> serde::de::Visitor<'de> for SoftVisitor<T> {
    type Value = T;

    fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Expecting a valid {} derivation index.", self.1)
    }

    fn visit_u16<E>(self, v: u16) -> result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_u32(v as u32)
    }
    fn visit_u32<E>(self, v: u32) -> result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        (self.0)(v).map_err(|_| {
            E::invalid_value(
                serde::de::Unexpected::Unsigned(v as u64),
                &"from 0 to 0x7fffffff",
            )
        })
    }

    fn visit_u64<E>(self, v: u64) -> result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v > 0xFFFFFFFF {
            return Err(E::invalid_value(
                serde::de::Unexpected::Unsigned(v),
                &"value should fit in 32bit integer",
            ));
        }
        self.visit_u32(v as u32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
pub enum AddrType {
    Internal,
    External,
}
impl AddrType {
    pub fn get_scheme_value(&self) -> u32 {
        match self {
            AddrType::External => 0,
            AddrType::Internal => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    coin_type: CoinType,
    account: Account,
    change: AddrType,
}
impl Change {
    pub fn get_scheme_value(&self) -> u32 {
        self.change.get_scheme_value()
    }

    pub fn index(&self, index: u32) -> Result<Addressing> {
        Ok(Addressing {
            coin_type: self.coin_type,
            account: self.account,
            change: self.change,
            index: Index::new(index)?,
        })
    }
}

/// Bip44 address derivation
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
pub struct Addressing {
    pub coin_type: CoinType,
    pub account: Account,
    pub change: AddrType,
    pub index: Index,
}
impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.coin_type.0,
            self.account.0,
            self.change.get_scheme_value(),
            self.index.0
        )
    }
}

impl Addressing {
    /// create a new `Addressing` for the given coin, account, `AddrType`
    /// and address index.
    ///
    /// # example
    ///
    /// ```
    /// use secp256k1_bip32::bip44::{Addressing, AddrType, CoinType};
    ///
    /// let addr = Addressing::new(CoinType::BITCOIN, 0, AddrType::External, 0).unwrap();
    ///
    /// assert!(Addressing::new(CoinType::BITCOIN, 0x80000000, AddrType::External, 0).is_err());
    /// ```
    pub fn new(coin_type: CoinType, account: u32, typ: AddrType, index: u32) -> Result<Self> {
        Account::new(account)?.change(coin_type, typ).index(index)
    }

    /// return a path ready for derivation
    pub fn to_path(&self) -> DerivationPath {
        DerivationPath::new(vec![
            BIP44_PURPOSE,
            self.coin_type.get_scheme_value(),
            self.account.get_scheme_value(),
            self.change.get_scheme_value(),
            self.index.get_scheme_value(),
        ])
    }

    pub fn address_type(&self) -> AddrType {
        self.change
    }

    pub fn from_path(path: &DerivationPath) -> Result<Self> {
        let len = path.as_ref().len();
        if len != BIP44_PATH_LENGTH {
            return Err(Error::InvalidLength(len));
        }

        let p = path[0];
        if p != BIP44_PURPOSE {
            return Err(Error::InvalidPurpose(p));
        }
        let t = path[1];
        if t < HARDENED_OFFSET {
            return Err(Error::InvalidType(t));
        }
        let a = path[2];
        if a < HARDENED_OFFSET {
            return Err(Error::AccountOutOfBound(a));
        }
        let typ = match path[3] {
            0 => AddrType::External,
            1 => AddrType::Internal,
            c => return Err(Error::ChangeOutOfBound(c)),
        };
        let i = path[4];

        Account::new(a - HARDENED_OFFSET)?
            .change(CoinType(t - HARDENED_OFFSET), typ)
            .index(i)
    }

    /// try to generate a new `Addressing` starting from the given
    /// `Addressing`'s index incremented by the given parameter;
    ///
    /// # Example
    ///
    /// ```
    /// use secp256k1_bip32::bip44::{Addressing, AddrType, CoinType, Index};
    ///
    /// let addr = Addressing::new(CoinType::ETHEREUM, 0, AddrType::External, 0).unwrap();
    ///
    /// let next = addr.incr(32).unwrap().incr(10).unwrap();
    ///
    /// assert!(next.index == Index::new(42).unwrap());
    /// assert!(next.incr(0x80000000).is_err());
    /// ```
    pub fn incr(&self, incr: u32) -> Result<Self> {
        let mut addr = *self;
        addr.index = addr.index.incr(incr)?;
        Ok(addr)
    }

    /// generate a sequence of Addressing from the given
    /// addressing as starting point up to the `chunk_size`.
    ///
    /// the function will return as soon as `chunk_size` is reached
    /// or at the first `Error::IndexOutOfBound`.
    ///
    pub fn next_chunks(&self, chunk_size: usize) -> Result<Vec<Self>> {
        let available = (BIP44_SOFT_UPPER_BOUND - self.index.0) as usize;
        let mut v = Vec::with_capacity(chunk_size.min(available));
        for i in 0..chunk_size {
            match self.incr(i as u32) {
                Err(Error::IndexOutOfBound(_)) => break,
                Err(err) => return Err(err),
                Ok(r) => v.push(r),
            }
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::Wrapper;
    use crate::master::from_master_seed;
    use crate::util::hex;

    #[test]
    fn ethereum_first_address_path() {
        let addr = Addressing::new(CoinType::ETHEREUM, 0, AddrType::External, 0).unwrap();
        assert_eq!(addr.to_path().to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(addr.to_string(), "60.0.0.0");
    }

    #[test]
    fn derive_from_addressing() {
        let seed = "1c607522cd878ab0068f906a57f7490604f491ebc3c0d1036cd9fd678076008b410e7c5a3b3594df3c4352590c644fa3fa634690905e790cb591f0dcce4f68ac";
        let addr = Addressing::new(CoinType::ETHEREUM, 0, AddrType::External, 0).unwrap();
        let key = from_master_seed(seed).unwrap().derive_path(&addr.to_path()).unwrap();
        assert_eq!(
            hex::encode(key.private_key().unwrap()),
            "59152e4e11b735d58ade6f60f9d77259039fd7eb053dd52fbfe9f280f829ffdd"
        );
    }

    #[test]
    fn internal_change() {
        let change = Account::new(3).unwrap().internal(CoinType::BITCOIN);
        assert_eq!(change.get_scheme_value(), 1);
        let addr = change.index(7).unwrap();
        assert_eq!(addr.address_type(), AddrType::Internal);
        assert_eq!(addr.to_path().to_string(), "m/44'/0'/3'/1/7");
    }

    #[test]
    fn bounds() {
        assert_eq!(CoinType::new(0x80000000), Err(Error::InvalidType(0x80000000)));
        assert_eq!(Account::new(0x80000000), Err(Error::AccountOutOfBound(0x80000000)));
        assert_eq!(Index::new(0x80000000), Err(Error::IndexOutOfBound(0x80000000)));
        assert_eq!(Index::new(0x7fffffff).unwrap().incr(1), Err(Error::IndexOutOfBound(0x80000000)));
        assert_eq!(Index::new(1).unwrap().decr(2), Err(Error::IndexOutOfBound(0)));
    }

    #[test]
    fn from_path_errors() {
        let path = |s: &str| s.parse::<DerivationPath>().unwrap();
        assert_eq!(Addressing::from_path(&path("m/44'/60'/0'/0")), Err(Error::InvalidLength(4)));
        assert_eq!(
            Addressing::from_path(&path("m/49'/60'/0'/0/0")),
            Err(Error::InvalidPurpose(0x80000031))
        );
        assert_eq!(Addressing::from_path(&path("m/44'/60/0'/0/0")), Err(Error::InvalidType(60)));
        assert_eq!(Addressing::from_path(&path("m/44'/60'/0/0/0")), Err(Error::AccountOutOfBound(0)));
        assert_eq!(Addressing::from_path(&path("m/44'/60'/0'/2/0")), Err(Error::ChangeOutOfBound(2)));
        assert_eq!(
            Addressing::from_path(&path("m/44'/60'/0'/0/0'")),
            Err(Error::IndexOutOfBound(0x80000000))
        );
    }

    #[test]
    fn next_chunks_stops_at_bound() {
        let addr = Addressing::new(CoinType::BITCOIN, 0, AddrType::External, 0x7ffffffd).unwrap();
        let chunks = addr.next_chunks(10).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].index, Index::new(0x7fffffff).unwrap());

        let chunks = addr.next_chunks(::std::usize::MAX).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], addr);
    }

    #[cfg(feature = "generic-serialization")]
    #[test]
    fn serde_addressing() {
        let addr = Addressing::new(CoinType::ETHEREUM, 1, AddrType::Internal, 5).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, r#"{"coin_type":60,"account":1,"change":"Internal","index":5}"#);
        assert_eq!(serde_json::from_str::<Addressing>(&json).unwrap(), addr);
        assert!(serde_json::from_str::<Account>("2147483648").is_err());
        assert!(serde_json::from_str::<CoinType>("2147483708").is_err());
        assert!(serde_json::from_str::<Addressing>(
            r#"{"coin_type":2147483708,"account":0,"change":"External","index":0}"#
        )
        .is_err());
        assert_eq!(serde_json::from_str::<CoinType>("60").unwrap(), CoinType::ETHEREUM);
        assert!(serde_json::from_str::<Index>("4294967296").is_err());
    }

    quickcheck! {
        fn path_roundtrip(addr: Wrapper<Addressing>) -> bool {
            Addressing::from_path(&addr.to_path()) == Ok(*addr)
        }

        fn next_chunks_are_sequential(addr: Wrapper<Addressing>, size: u8) -> bool {
            let chunks = addr.next_chunks(size as usize).unwrap();
            chunks.iter().enumerate().all(|(i, a)| {
                a.index.get_scheme_value() == addr.index.get_scheme_value() + i as u32
                    && a.account == addr.account
                    && a.change == addr.change
            })
        }
    }
}
