//! Exact rational numbers for atom, charge and nucleon accounting.
//!
//! Backed by [`BigRational`], so values are always stored in lowest terms with a
//! positive denominator and arithmetic never overflows.

use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fraction(BigRational);

impl Fraction {
    /// Builds `numerator / denominator`, reduced. Fails on a zero denominator.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Err(Error::InvalidFraction { numerator });
        }
        Ok(Self(BigRational::new(
            BigInt::from(numerator),
            BigInt::from(denominator),
        )))
    }

    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        Fraction(&self.0 + &other.0)
    }

    pub fn multiply(&self, other: &Fraction) -> Fraction {
        Fraction(&self.0 * &other.0)
    }

    /// Multiplies by an integer factor such as a subscript or compound multiplier.
    pub fn scale(&self, factor: i64) -> Fraction {
        Fraction(&self.0 * BigInt::from(factor))
    }

    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    /// Always positive.
    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// The value as an `i64`, if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.0.numer().to_i64()
        } else {
            None
        }
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<u32> for Fraction {
    fn from(value: u32) -> Self {
        Self::from_integer(i64::from(value))
    }
}

impl<'a> Add<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn add(self, rhs: &'a Fraction) -> Fraction {
        Fraction::add(self, rhs)
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &'a Fraction) -> Fraction {
        self.multiply(rhs)
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction(-self.0)
    }
}

impl Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::zero(), |acc, f| &acc + &f)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for Fraction {
    type Err = Error;

    /// Accepts `"n"` or `"n/d"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFractionLiteral(s.to_string());
        let trimmed = s.trim();
        let (numer, denom) = match trimmed.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (trimmed, "1"),
        };
        let numer = BigInt::from_str(numer).map_err(|_| invalid())?;
        let denom = BigInt::from_str(denom).map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        Ok(Self(BigRational::new(numer, denom)))
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.to_i64() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Integer(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Integer(n) => Ok(Fraction::from_integer(n)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
