use quickcheck::{Arbitrary, Gen};
use std::ops::Deref;

use crate::bip44::{AddrType, Addressing, CoinType};
use crate::path::{DerivationPath, HARDENED_OFFSET};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Wrapper<A>(A);
impl<A> Wrapper<A> {
    pub fn unwrap(self) -> A {
        self.0
    }
}
impl<A> Deref for Wrapper<A> {
    type Target = A;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<A> AsRef<A> for Wrapper<A> {
    fn as_ref(&self) -> &A {
        &self.0
    }
}
impl<A> From<A> for Wrapper<A> {
    fn from(a: A) -> Self {
        Wrapper(a)
    }
}

/// paths of at most 6 levels, mixing hard and soft derivations
impl Arbitrary for Wrapper<DerivationPath> {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let len = usize::arbitrary(g) % 7;
        let indices: Vec<u32> = ::std::iter::repeat_with(|| {
            let index = u32::arbitrary(g) % HARDENED_OFFSET;
            if bool::arbitrary(g) {
                index + HARDENED_OFFSET
            } else {
                index
            }
        })
        .take(len)
        .collect();
        Wrapper(DerivationPath::new(indices))
    }
}

impl Arbitrary for Wrapper<AddrType> {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        if Arbitrary::arbitrary(g) {
            Wrapper(AddrType::Internal)
        } else {
            Wrapper(AddrType::External)
        }
    }
}

impl Arbitrary for Wrapper<Addressing> {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let coin_type = CoinType::new(u32::arbitrary(g) % HARDENED_OFFSET).unwrap();
        let account = u32::arbitrary(g) % HARDENED_OFFSET;
        let typ = Wrapper::<AddrType>::arbitrary(g).unwrap();
        let index = u32::arbitrary(g) % HARDENED_OFFSET;
        Wrapper(Addressing::new(coin_type, account, typ, index).unwrap())
    }
}
