//! Symmetric power basis polynomials.
//!
//! An [`SBasis`] represents `f(x) = sum_i (s_i (1-x) + t_i x) (x(1-x))^i` as
//! a sequence of "linear pairs" `(s_i, t_i)`. Conversion to and from
//! [`crate::bezier::Bezier`] is bijective and exact for finite coefficients.
//!
//! This kernel's `SBasis` always carries an odd-order Bezier internally: an
//! even-order input is elevated by one degree first (a no-op on the curve
//! it represents), so `size()` linear pairs always correspond to exactly
//! `2 * size() - 1` Bernstein coefficients.

use crate::bezier::{binomial_row, Bezier};

/// One linear pair `(s, t)` of an `SBasis` term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearPair {
    pub s: f64,
    pub t: f64,
}

/// A polynomial in symmetric power basis: `k + 1` linear pairs.
///
/// Invariant: `terms.len() >= 1`; the zero polynomial is the single pair
/// `(0, 0)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SBasis {
    terms: Vec<LinearPair>,
}

impl SBasis {
    pub fn new(terms: Vec<LinearPair>) -> Self {
        if terms.is_empty() {
            SBasis::zero()
        } else {
            SBasis { terms }
        }
    }

    pub fn zero() -> Self {
        SBasis { terms: vec![LinearPair { s: 0.0, t: 0.0 }] }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.size() - 1
    }

    #[inline]
    pub fn terms(&self) -> &[LinearPair] {
        &self.terms
    }

    pub fn value_at(&self, x: f64) -> f64 {
        let one_minus_x = 1.0 - x;
        let mut power = 1.0; // (x(1-x))^i
        let mut acc = 0.0;
        for term in &self.terms {
            acc += (term.s * one_minus_x + term.t * x) * power;
            power *= x * one_minus_x;
        }
        acc
    }

    /// Exact, bijective conversion from Bernstein form.
    ///
    /// Peels off one symmetric-power term at a time: `s_i = p(0)`,
    /// `t_i = p(1)` for the current remainder `p`, then divides the
    /// remainder (which vanishes at both endpoints) by `x(1-x)` using the
    /// closed-form Bernstein basis identity
    /// `t(1-t) B_i^{n-2}(t) = [C(n-2,i)/C(n,i+1)] B_{i+1}^n(t)`.
    pub fn from_bezier(b: &Bezier) -> SBasis {
        let mut p = if b.order() % 2 == 0 { b.elevate_degree() } else { b.clone() };
        let mut terms = Vec::with_capacity(p.order() / 2 + 1);
        loop {
            let n = p.order();
            let s = p.coeff(0);
            let t = p.coeff(n);
            terms.push(LinearPair { s, t });
            if n == 0 {
                break;
            }
            // Subtract the linear part, elevated to the current degree.
            let lin = Bezier::new(vec![s, t]).unwrap().elevate_to_degree(n);
            let remainder: Vec<f64> =
                p.coeffs().iter().zip(lin.coeffs().iter()).map(|(a, b)| a - b).collect();
            if n == 1 {
                break;
            }
            // Divide by x(1-x): remainder is degree n, result is degree n-2.
            let c_n = binomial_row(n);
            let c_n2 = binomial_row(n - 2);
            let q: Vec<f64> = (0..=n - 2)
                .map(|i| remainder[i + 1] * c_n[i + 1] / c_n2[i])
                .collect();
            p = Bezier::new(q).unwrap();
        }
        SBasis { terms }
    }

    /// Exact, bijective conversion to Bernstein form: the inverse of
    /// [`SBasis::from_bezier`], built by re-expanding each symmetric term
    /// `(s_i, t_i) * (x(1-x))^i` into Bernstein form and summing.
    pub fn to_bezier(&self) -> Bezier {
        let k = self.order();
        let n = 2 * k + 1;
        let mut acc = Bezier::constant(0.0).elevate_to_degree(n);
        for (i, term) in self.terms.iter().enumerate() {
            let xp = x_one_minus_x_pow(i);
            let lin = Bezier::new(vec![term.s, term.t]).unwrap();
            let term_poly = (&xp * &lin).elevate_to_degree(n);
            acc = &acc + &term_poly;
        }
        acc
    }

    pub fn derivative(&self) -> SBasis {
        self.to_bezier().derivative().to_sbasis()
    }

    pub fn integral(&self) -> SBasis {
        self.to_bezier().integral().to_sbasis()
    }
}

/// `(x(1-x))^i` as an exact degree-`2i` Bernstein polynomial. `x(1-x)` in
/// Bernstein form of degree 2 is `(0, 1/2, 0)`: it vanishes at both
/// endpoints and its midpoint value `f(0.5) = 0.25` fixes the middle
/// control point to `0.5` via `f(0.5) = c1 / 2`.
fn x_one_minus_x_pow(i: usize) -> Bezier {
    let base = Bezier::new(vec![0.0, 0.5, 0.0]).unwrap();
    let mut acc = Bezier::constant(1.0);
    for _ in 0..i {
        acc = &acc * &base;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_bezier_sbasis_odd() {
        let b = Bezier::new(vec![1.0, 2.0, -1.0, 0.5]).unwrap();
        let s = b.to_sbasis();
        let back = s.to_bezier();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((b.value_at(t) - back.value_at(t)).abs() < 1e-9, "t={t}");
        }
    }

    #[test]
    fn round_trip_bezier_sbasis_even() {
        let b = Bezier::new(vec![0.0, 3.0, -2.0]).unwrap(); // quadratic
        let s = b.to_sbasis();
        let back = s.to_bezier();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((b.value_at(t) - back.value_at(t)).abs() < 1e-9, "t={t}");
        }
    }

    #[test]
    fn zero_polynomial() {
        let z = SBasis::zero();
        assert_eq!(z.size(), 1);
        assert_eq!(z.value_at(0.3), 0.0);
    }
}
