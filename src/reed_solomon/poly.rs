//! Polynomials with GF(256) coefficients.

use core::fmt;
use core::ops::{Add, Mul, Rem};

use super::gf256;
use crate::bits::BitBuffer;

/// A polynomial over GF(256).
///
/// `terms[i]` is the coefficient of x^i. The highest stored coefficient is
/// never zero, so the zero polynomial has no terms at all.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Poly {
    terms: Vec<u8>,
}

impl Poly {
    /// Builds a polynomial from coefficients in ascending degree order.
    pub fn new(terms: Vec<u8>) -> Self {
        Self { terms }.normalised()
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns `coefficient * x^degree`.
    pub fn monomial(coefficient: u8, degree: usize) -> Self {
        if coefficient == gf256::ZERO {
            return Self::zero();
        }
        let mut terms = vec![gf256::ZERO; degree + 1];
        terms[degree] = coefficient;
        Self { terms }
    }

    /// Interprets the bytes of `data` as coefficients, the first byte being
    /// the highest-degree term and the last byte the constant term.
    pub fn from_data(data: &BitBuffer) -> Self {
        let numbytes = data.len().div_ceil(8);
        let terms: Vec<u8> = (0..numbytes).rev().map(|i| data.byte_at(i * 8)).collect();
        Self::new(terms)
    }

    pub fn terms(&self) -> &[u8] {
        &self.terms
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.terms.len().checked_sub(1)
    }

    /// Returns the coefficients highest degree first, left-padded with zeros
    /// to exactly `numbytes` bytes.
    ///
    /// # Panics
    ///
    /// Panics if the polynomial has more than `numbytes` terms.
    pub fn to_bytes(&self, numbytes: usize) -> Vec<u8> {
        assert!(self.terms.len() <= numbytes, "Polynomial does not fit in {} bytes", numbytes);
        let mut result = vec![0u8; numbytes - self.terms.len()];
        result.extend(self.terms.iter().rev());
        result
    }

    /// Returns the remainder of polynomial long division by `denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is the zero polynomial.
    pub fn remainder(&self, denominator: &Poly) -> Poly {
        assert!(!denominator.is_zero(), "Remainder by zero polynomial");
        let den: &[u8] = &denominator.terms;
        let lead: u8 = den[den.len() - 1];
        let mut terms = self.terms.clone();
        while terms.len() >= den.len() {
            let shift: usize = terms.len() - den.len();
            let coefficient: u8 = gf256::divide(terms[terms.len() - 1], lead);
            // Subtract denominator * coefficient * x^shift; the top term cancels.
            for (i, &d) in den.iter().enumerate() {
                terms[shift + i] = gf256::add(terms[shift + i], gf256::multiply(d, coefficient));
            }
            trim(&mut terms);
        }
        Poly { terms }
    }

    fn normalised(mut self) -> Self {
        trim(&mut self.terms);
        self
    }
}

fn trim(terms: &mut Vec<u8>) {
    while terms.last() == Some(&gf256::ZERO) {
        terms.pop();
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, other: &Poly) -> Poly {
        let numterms = self.terms.len().max(other.terms.len());
        let terms = (0..numterms)
            .map(|i| {
                let a = self.terms.get(i).copied().unwrap_or(gf256::ZERO);
                let b = other.terms.get(i).copied().unwrap_or(gf256::ZERO);
                gf256::add(a, b)
            })
            .collect();
        Poly::new(terms)
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut terms = vec![gf256::ZERO; self.terms.len() + other.terms.len() - 1];
        for (i, &a) in self.terms.iter().enumerate() {
            for (j, &b) in other.terms.iter().enumerate() {
                terms[i + j] = gf256::add(terms[i + j], gf256::multiply(a, b));
            }
        }
        Poly::new(terms)
    }
}

impl Rem for &Poly {
    type Output = Poly;

    fn rem(self, denominator: &Poly) -> Poly {
        self.remainder(denominator)
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut first = true;
        for (i, &c) in self.terms.iter().enumerate().rev() {
            if c == gf256::ZERO {
                continue;
            }
            if !first {
                f.write_str(" + ")?;
            }
            write!(f, "{}x^{}", c, i)?;
            first = false;
        }
        Ok(())
    }
}
