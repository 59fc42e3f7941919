//! BIP32 hierarchical deterministic keys over secp256k1.
//!
//! A root key is generated from a seed, then any descendant is derived
//! along a path such as `m/44'/60'/0'/0/0` and exported in the standard
//! `xprv`/`xpub` Base58Check form.
//!
//! ```
//! use secp256k1_bip32::{from_master_seed, ExtendedKey};
//!
//! let seed = "010f73b01bcbe6d18c5f5f84e421945ec11b98e68a5a2d0cee620c98c0ae476c9b3524f58cd0c2715e2a57eaca26aba7913fbf182414ec44155a2c52e47e86ae";
//! let root = from_master_seed(seed).unwrap();
//! let change = root.derive("m/44'/60'/0'/0").unwrap();
//!
//! assert_eq!(
//!     change.public_extended_key(),
//!     "xpub6Eg5ahu5DUJXTKoMstLF1nK5Zc9svBoiYoVEsLaFGBoCof9ToPLZ1cNC2i7N6QJDiRtWPoXRf732tAi8t33xTFQpYQMa2TxoUYQU6njDXxu"
//! );
//!
//! let xprv = change.private_extended_key().unwrap();
//! let decoded: ExtendedKey = xprv.parse().unwrap();
//! assert_eq!(decoded, change);
//! ```
#![cfg_attr(feature = "with-bench", feature(test))]

#[cfg(feature = "generic-serialization")]
#[macro_use]
extern crate serde_derive;
#[cfg(feature = "generic-serialization")]
extern crate serde;
#[cfg(all(test, feature = "generic-serialization"))]
extern crate serde_json;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

#[cfg(test)]
#[cfg(feature = "with-bench")]
extern crate test;

pub mod util;
pub mod hash;
pub mod error;
pub mod curve;
pub mod path;
pub mod hdkey;
pub mod master;
pub mod bip44;

#[cfg(test)]
mod arbitrary;

pub use crate::error::{Error, Result};
pub use crate::hdkey::{ExtendedKey, Fingerprint, Version};
pub use crate::master::{from_master_seed, Seed};
pub use crate::path::{DerivationPath, HARDENED_OFFSET};
