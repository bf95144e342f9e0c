// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Exact fractions, used for interval ratios and multipliers given on the command line.

use std::error::Error;
use std::fmt;
use std::{cmp::Ordering, ops};

/// Underlying integral type for the rational numbers.
type Int = i64;

/// A rational number, always fully normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Rational {
    /// Carries the sign of the fraction.
    num: Int,
    /// Always positive.
    denom: Int,
}

impl Rational {
    pub const ONE: Rational = Rational { num: 1, denom: 1 };

    /// Create a new rational from a potentially unnormalized fraction.
    /// Usable in constant tables.
    ///
    /// # Panic
    ///
    /// Panics if the denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use syn_poly::rational::*;
    ///
    /// assert_eq!(Rational::new(10, 5), Rational::int(2));
    /// assert_eq!(Rational::new(-10, -5), Rational::new(6, 3));
    /// assert_eq!(Rational::new(-6, 8), Rational::new(3, -4));
    /// ```
    pub const fn new(num: Int, denom: Int) -> Rational {
        assert!(denom != 0, "Denominator must not be zero");

        let sign = num.signum() * denom.signum();
        let div = gcd(num, denom);
        Rational {
            num: sign * (num.abs() / div),
            denom: denom.abs() / div,
        }
    }

    pub const fn int(int: Int) -> Rational {
        Rational { num: int, denom: 1 }
    }

    /// # Panic
    ///
    /// Panics if the rational is zero.
    pub fn recip(self) -> Rational {
        Rational::new(self.denom, self.num)
    }

    /// Compute an integer power of the rational by repeated squaring.
    ///
    /// ```
    /// # use syn_poly::rational::*;
    /// assert_eq!(Rational::int(2).powi(0), Rational::ONE);
    /// assert_eq!(Rational::int(2).powi(5), Rational::int(32));
    /// assert_eq!(Rational::int(2).powi(-3), Rational::new(1, 8));
    /// assert_eq!(Rational::new(3, 2).powi(2), Rational::new(9, 4));
    /// ```
    pub fn powi(self, power: Int) -> Rational {
        let mut base = if power < 0 { self.recip() } else { self };
        let mut remaining = power.abs();
        let mut accum = Rational::ONE;
        while remaining > 0 {
            if remaining % 2 == 1 {
                accum *= base;
            }
            remaining /= 2;
            if remaining > 0 {
                base *= base;
            }
        }
        accum
    }

    /// ```
    /// # use syn_poly::rational::*;
    /// assert_eq!(Rational::new(3, 2).to_f64(), 1.5);
    /// assert_eq!(Rational::new(-1, 4).to_f64(), -0.25);
    /// ```
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }

}

impl ops::Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Self::Output {
        // Cross-cancel first to keep the intermediate products small.
        let a = gcd(self.num, rhs.denom);
        let b = gcd(rhs.num, self.denom);
        Rational::new(
            (self.num / a) * (rhs.num / b),
            (self.denom / b) * (rhs.denom / a),
        )
    }
}

impl ops::MulAssign for Rational {
    fn mul_assign(&mut self, rhs: Rational) {
        *self = *self * rhs;
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ```
/// # use syn_poly::rational::*;
/// assert!(Rational::new(16, 15) < Rational::new(9, 8));
/// ```
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // a / b < c / d  <=>  a * d < c * b, since b and d are positive
        let l = self.num as i128 * other.denom as i128;
        let r = other.num as i128 * self.denom as i128;
        l.cmp(&r)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.num)?;
        if self.denom != 1 {
            write!(f, "/{}", self.denom)?;
        }
        Ok(())
    }
}

/// An error which can be returned when parsing a rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRationalError(RationalErrorKind);

impl ParseRationalError {
    pub fn kind(&self) -> RationalErrorKind {
        self.0
    }
}

impl Error for ParseRationalError {}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            RationalErrorKind::InvalidInt => write!(f, "invalid integer literal"),
            RationalErrorKind::Zero => write!(f, "denominator is zero"),
            RationalErrorKind::Malformed => write!(f, "expected <int> or <int>/<int>"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RationalErrorKind {
    /// The numerator or denominator could not be parsed as integer.
    InvalidInt,
    /// The denominator was zero
    Zero,
    /// More than one `/` separator
    Malformed,
}

/// ```
/// # use syn_poly::rational::*;
/// assert_eq!("3/2".parse::<Rational>(), Ok(Rational::new(3, 2)));
/// assert_eq!(" -4 ".parse::<Rational>(), Ok(Rational::int(-4)));
/// assert_eq!("1/0".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::Zero);
/// assert_eq!("1/2/3".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::Malformed);
/// assert_eq!("1.5".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::InvalidInt);
/// ```
impl std::str::FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_int = |part: &str| {
            part.trim()
                .parse::<Int>()
                .map_err(|_| ParseRationalError(RationalErrorKind::InvalidInt))
        };

        let mut parts = s.split('/');
        // `split` always yields at least one part
        let numerator = parse_int(parts.next().unwrap_or(""))?;
        let denominator = match parts.next() {
            Some(part) => parse_int(part)?,
            None => 1,
        };
        if parts.next().is_some() {
            Err(ParseRationalError(RationalErrorKind::Malformed))
        } else if denominator == 0 {
            Err(ParseRationalError(RationalErrorKind::Zero))
        } else {
            Ok(Rational::new(numerator, denominator))
        }
    }
}

/// Computes the greatest common divisor of two numbers using euclids algorithm.
///
/// # Example
///
/// ```
/// # use syn_poly::rational::*;
///
/// assert_eq!(gcd(20, 15), 5);
/// assert_eq!(gcd(20, 19), 1);
/// assert_eq!(gcd(0, 10), 10);
/// assert_eq!(gcd(0, 0), 0);
/// assert_eq!(gcd(10, -10), 10);
/// ```
pub const fn gcd(a: Int, b: Int) -> Int {
    let mut a = a.abs();
    let mut b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
