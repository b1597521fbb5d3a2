use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const BITCOIN_CURRENCY_CODE: &str = "BTC";
pub const SATOSHIS_PER_BITCOIN: i64 = 100_000_000;

//--------------------------------------     Satoshis       ---------------------------------------------------------
/// An amount of value on chain, or requested by an order, in the smallest indivisible unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Satoshis(i64);

op!(binary Satoshis, Add, add);
op!(binary Satoshis, Sub, sub);
op!(inplace Satoshis, AddAssign, add_assign);
op!(inplace Satoshis, SubAssign, sub_assign);
op!(unary Satoshis, Neg, neg);

impl Mul<i64> for Satoshis {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Satoshis {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Satoshis> for Satoshis {
    fn sum<I: Iterator<Item = &'a Satoshis>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in satoshis: {0}")]
pub struct SatoshisConversionError(String);

impl From<i64> for Satoshis {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Satoshis {
    type Error = SatoshisConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| SatoshisConversionError(format!("{value} is too large to convert to Satoshis")))
    }
}

impl Display for Satoshis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.abs() < 100_000 {
            write!(f, "{} sat", self.0)
        } else {
            let btc = self.0 as f64 / SATOSHIS_PER_BITCOIN as f64;
            write!(f, "{btc:0.5} {BITCOIN_CURRENCY_CODE}")
        }
    }
}

impl Satoshis {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_btc(btc: i64) -> Self {
        Self(btc * SATOSHIS_PER_BITCOIN)
    }

    /// `None` if the sum does not fit in an `i64`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}
