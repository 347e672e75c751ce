use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::ModelError;

/// An exact fraction.
///
/// Values are always kept in lowest terms with the sign carried by the
/// numerator, so two equal values have identical numerator and denominator.
/// Comparisons never go through floating point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    /// Create `numerator / denominator`, reduced.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self, ModelError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(ModelError::ZeroDenominator);
        }
        Ok(Self(BigRational::new(numerator.into(), denominator)))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(value.into()))
    }

    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Largest integer not greater than `self`.
    pub fn floor(&self) -> Self {
        Self(self.0.floor())
    }

    /// Fractional part in `[0, 1)`: `r - floor(r)`.
    ///
    /// For negative values this is `1 - frac(|r|)`, e.g. `-5/4` gives `3/4`.
    pub fn fraction(&self) -> Self {
        Self(&self.0 - self.0.floor())
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, rhs: &Rational) -> Option<Self> {
        if rhs.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &rhs.0))
        }
    }

    /// Lossy conversion, for display purposes only.
    pub fn to_f64(&self) -> f64 {
        let numerator = self.numerator().to_f64().unwrap_or(f64::NAN);
        let denominator = self.denominator().to_f64().unwrap_or(f64::NAN);
        numerator / denominator
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(BigRational::one())
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self::integer(value)
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Self::integer(value)
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                Rational(self.0.$method(rhs.0))
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &'a Rational) -> Rational {
                Rational(self.0.$method(&rhs.0))
            }
        }

        impl<'a, 'b> $imp<&'b Rational> for &'a Rational {
            type Output = Rational;

            fn $method(self, rhs: &'b Rational) -> Rational {
                Rational((&self.0).$method(&rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
// Panics on a zero divisor, like every other exact division; see `checked_div`.
forward_binop!(Div, div);

impl AddAssign<&Rational> for Rational {
    fn add_assign(&mut self, rhs: &Rational) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Rational> for Rational {
    fn sub_assign(&mut self, rhs: &Rational) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Rational> for Rational {
    fn mul_assign(&mut self, rhs: &Rational) {
        self.0 *= &rhs.0;
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, r| acc + r)
    }
}

/// Signed rendering: `+3`, `-3`, `0`, `+(1/2)`, `-(1/2)`.
impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "+" };
        if self.is_zero() {
            write!(f, "0")
        } else if self.is_integer() {
            write!(f, "{}{}", sign, self.numerator().abs())
        } else {
            write!(f, "{}({}/{})", sign, self.numerator().abs(), self.denominator())
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use num_bigint::BigInt;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Rational;

    #[derive(Serialize, Deserialize)]
    struct RationalRepr {
        numerator: String,
        denominator: String,
    }

    impl Serialize for Rational {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RationalRepr {
                numerator: self.numerator().to_string(),
                denominator: self.denominator().to_string(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Rational {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = RationalRepr::deserialize(deserializer)?;
            let numerator: BigInt = repr.numerator.parse().map_err(D::Error::custom)?;
            let denominator: BigInt = repr.denominator.parse().map_err(D::Error::custom)?;
            Rational::new(numerator, denominator).map_err(D::Error::custom)
        }
    }
}
