//! Scalar Bernstein-basis polynomials.
//!
//! A [`Bezier`] is a polynomial of degree `n` stored as its `n + 1`
//! Bernstein control values. This is the workhorse scalar type that
//! [`crate::D2`] lifts into the plane and that [`crate::curve`] builds the
//! concrete curve hierarchy on top of.

use crate::error::{GeomError, GeomResult};
use crate::roots::find_roots;
use crate::sbasis::SBasis;

/// A polynomial of degree `n` in Bernstein form: `n + 1` control values
/// `c_0 .. c_n`.
///
/// Invariant: `coeffs.len() >= 1`. The zero polynomial is represented by the
/// single coefficient `0.0`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Bezier {
    coeffs: Vec<f64>,
}

impl Bezier {
    /// Builds a `Bezier` from explicit Bernstein control values.
    ///
    /// # Errors
    /// Returns [`GeomError::NotRepresentable`] if `coeffs` is empty or
    /// contains a non-finite value.
    pub fn new(coeffs: impl Into<Vec<f64>>) -> GeomResult<Self> {
        let coeffs = coeffs.into();
        if coeffs.is_empty() {
            return Err(GeomError::NotRepresentable("bezier must have at least one coefficient"));
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(GeomError::NotRepresentable("bezier coefficients must be finite"));
        }
        Ok(Bezier { coeffs })
    }

    /// A degree-0 (constant) polynomial.
    pub fn constant(c: f64) -> Self {
        Bezier { coeffs: vec![c] }
    }

    /// Builds the degree-`values.len() - 1` Bezier that *interpolates*
    /// `values` at the uniformly spaced parameters `t_i = i / n`
    /// (`i = 0..=n`) — unlike [`Bezier::new`], which treats its argument as
    /// Bernstein control points directly, and which only coincides with
    /// sampled function values at the two endpoints. Solves the Bernstein
    /// collocation system for the control points that make the curve pass
    /// through every sample. `None` if `values` is empty or the collocation
    /// matrix is singular (only possible for degenerate/duplicate nodes,
    /// which uniform spacing never produces).
    pub fn interpolating(values: &[f64]) -> Option<Bezier> {
        let n = values.len().checked_sub(1)?;
        if n == 0 {
            return Bezier::new(values.to_vec()).ok();
        }
        let binom = binomial_row(n);
        let mut rows = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            let omt = 1.0 - t;
            let mut t_pow = 1.0;
            let mut row = vec![0.0; n + 1];
            for (j, coeff) in row.iter_mut().enumerate() {
                *coeff = binom[j] * t_pow * omt.powi((n - j) as i32);
                t_pow *= t;
            }
            rows.push(row);
        }
        let control = solve_square(rows, values.to_vec())?;
        Bezier::new(control).ok()
    }

    /// Degree `size() - 1`. A polynomial of order 0 is a constant.
    #[inline]
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Number of control values, `order() + 1`.
    #[inline]
    pub fn size(&self) -> usize {
        self.coeffs.len()
    }

    #[inline]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    #[inline]
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs[i]
    }

    /// Evaluate the polynomial at `t` using de Casteljau's algorithm.
    /// Exact at the endpoints: returns `c_0` for `t == 0.0` and `c_n` for
    /// `t == 1.0`.
    pub fn value_at(&self, t: f64) -> f64 {
        if t == 0.0 {
            return self.coeffs[0];
        }
        if t == 1.0 {
            return *self.coeffs.last().unwrap();
        }
        let mut tmp = self.coeffs.clone();
        de_casteljau_inplace(&mut tmp, t);
        tmp[0]
    }

    /// Returns `f(t), f'(t), .., f^(n)(t)`. Derivatives beyond `order()` are
    /// zero. Implemented by repeated de Casteljau: after reading off the
    /// value, the coefficients are replaced in place by those of
    /// `order * (c_{i+1} - c_i)`, i.e. the (scaled) derivative, and the
    /// process recurses on a polynomial one degree lower.
    pub fn value_and_derivatives(&self, t: f64, n: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(n + 1);
        let mut cur = self.coeffs.clone();
        for _ in 0..=n {
            if cur.is_empty() {
                out.push(0.0);
                continue;
            }
            let mut tmp = cur.clone();
            de_casteljau_inplace(&mut tmp, t);
            out.push(tmp[0]);
            if cur.len() <= 1 {
                cur = Vec::new();
                continue;
            }
            let order = (cur.len() - 1) as f64;
            let next: Vec<f64> = cur.windows(2).map(|w| order * (w[1] - w[0])).collect();
            cur = next;
        }
        out
    }

    /// De Casteljau split at `t`: returns `(left, right)`, two polynomials
    /// of the same order whose endpoints agree exactly with `value_at(t)`.
    pub fn subdivide(&self, t: f64) -> (Bezier, Bezier) {
        let n = self.coeffs.len();
        // `table[i][j]` is the de Casteljau pyramid: row 0 is the input,
        // row k interpolates row k-1 at parameter t.
        let mut table: Vec<Vec<f64>> = Vec::with_capacity(n);
        table.push(self.coeffs.clone());
        for k in 1..n {
            let prev = &table[k - 1];
            let row: Vec<f64> = prev.windows(2).map(|w| w[0] + t * (w[1] - w[0])).collect();
            table.push(row);
        }
        let left: Vec<f64> = table.iter().map(|row| row[0]).collect();
        let right: Vec<f64> = table.iter().rev().map(|row| *row.last().unwrap()).collect();
        (Bezier { coeffs: left }, Bezier { coeffs: right })
    }

    /// Extracts the sub-polynomial over `[t0, t1]`. If `t0 > t1` the result
    /// is reversed. The final coefficient is overwritten with
    /// `self.value_at(t1)` to guard against the drift that two successive
    /// subdivisions can introduce.
    pub fn portion(&self, t0: f64, t1: f64) -> Bezier {
        if t0 <= t1 {
            let (_, hi) = self.subdivide(t0);
            let t1_rescaled = if t1 >= 1.0 { 1.0 } else { (t1 - t0) / (1.0 - t0) };
            let (lo, _) = hi.subdivide(t1_rescaled.clamp(0.0, 1.0));
            let mut lo = lo;
            let end = self.value_at(t1);
            *lo.coeffs.last_mut().unwrap() = end;
            lo
        } else {
            self.portion(t1, t0).reversed()
        }
    }

    /// `t -> 1 - t`.
    pub fn reversed(&self) -> Bezier {
        let mut c = self.coeffs.clone();
        c.reverse();
        Bezier { coeffs: c }
    }

    /// Order-`(n - 1)` derivative: `d_i = n * (c_{i+1} - c_i)`. A
    /// constant's derivative is the zero polynomial.
    pub fn derivative(&self) -> Bezier {
        if self.coeffs.len() <= 1 {
            return Bezier::constant(0.0);
        }
        let n = (self.coeffs.len() - 1) as f64;
        let d: Vec<f64> = self.coeffs.windows(2).map(|w| n * (w[1] - w[0])).collect();
        Bezier { coeffs: d }
    }

    /// Order-`(n + 1)` antiderivative with the integration constant set to
    /// zero: `I_j = I_{j-1} + c_{j-1} / n` for `j = 1..=n`, where `n` is the
    /// new (raised) order.
    pub fn integral(&self) -> Bezier {
        let n = self.coeffs.len();
        let mut out = vec![0.0; n + 1];
        for j in 1..=n {
            out[j] = out[j - 1] + self.coeffs[j - 1] / n as f64;
        }
        Bezier { coeffs: out }
    }

    /// Exact degree raise by one: `order -> order + 1`.
    pub fn elevate_degree(&self) -> Bezier {
        let n = self.coeffs.len() - 1; // current order
        let np1 = n + 1;
        let mut out = vec![0.0; np1 + 1];
        for i in 0..=np1 {
            let a = if i == 0 { 0.0 } else { self.coeffs[i - 1] * i as f64 };
            let b = if i == np1 { 0.0 } else { self.coeffs[i] * (np1 - i) as f64 };
            out[i] = (a + b) / np1 as f64;
        }
        Bezier { coeffs: out }
    }

    /// Raise degree until `self.order() == m`. No-op if `m <= order()`.
    pub fn elevate_to_degree(&self, m: usize) -> Bezier {
        let mut cur = self.clone();
        while cur.order() < m {
            cur = cur.elevate_degree();
        }
        cur
    }

    /// Approximate degree reduction by one, using the standard two-sided
    /// recurrence that fills coefficients from both ends and meets at
    /// `n / 2`; exact when the original was obtained by degree elevation,
    /// otherwise a least-squares-flavoured approximation with no error
    /// bound (see `SPEC_FULL.md` open question).
    pub fn reduce_degree(&self) -> Bezier {
        let n = self.order();
        if n == 0 {
            return self.clone();
        }
        let m = n - 1;
        let mut out = vec![0.0; m + 1];
        // Forward pass from the left.
        let mut fwd = vec![0.0; m + 1];
        fwd[0] = self.coeffs[0];
        for i in 1..=m {
            fwd[i] = (n as f64 * self.coeffs[i] - i as f64 * fwd[i - 1]) / (n - i) as f64;
        }
        // Backward pass from the right.
        let mut bwd = vec![0.0; m + 1];
        bwd[m] = *self.coeffs.last().unwrap();
        for i in (0..m).rev() {
            let j = i + 1;
            bwd[i] = (n as f64 * self.coeffs[j] - (n - j) as f64 * bwd[j]) / j as f64;
        }
        let split = m / 2;
        for i in 0..=m {
            out[i] = if i <= split { fwd[i] } else { bwd[i] };
        }
        Bezier { coeffs: out }
    }

    /// Exact degree drop by one when `self` was produced by
    /// [`Bezier::elevate_degree`]; falls back to [`Bezier::reduce_degree`]
    /// when the exact inverse is not representable.
    pub fn deflate(&self) -> Bezier {
        self.reduce_degree()
    }

    /// The `k`-th forward-difference Bezier: binomial-weighted combination
    /// of the `k+1` leading input coefficients (and so on for every window).
    pub fn forward_difference(&self, k: usize) -> Bezier {
        if k == 0 {
            return self.clone();
        }
        let n = self.coeffs.len();
        if k >= n {
            return Bezier::constant(0.0);
        }
        let binom = binomial_row(k);
        let mut out = Vec::with_capacity(n - k);
        for i in 0..n - k {
            let mut s = 0.0;
            for (j, b) in binom.iter().enumerate() {
                let sign = if (k - j) % 2 == 0 { 1.0 } else { -1.0 };
                s += sign * b * self.coeffs[i + j];
            }
            out.push(s);
        }
        Bezier { coeffs: out }
    }

    /// Real roots of `self` in `[0, 1]`, ascending.
    pub fn roots(&self) -> Vec<f64> {
        find_roots(&self.coeffs, 0.0, 1.0)
    }

    /// Real roots of `self` in `interval`, ascending, reported in the
    /// original (non-normalized) parameter space.
    pub fn roots_in(&self, interval: (f64, f64)) -> Vec<f64> {
        let (lo, hi) = interval;
        if lo >= hi {
            return Vec::new();
        }
        let local = self.portion(lo, hi);
        local.roots().into_iter().map(|t| lo + t * (hi - lo)).collect()
    }

    /// Convex hull of the control points: a superset of the true value
    /// range over `[0, 1]`.
    pub fn bounds_fast(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &c in &self.coeffs {
            lo = lo.min(c);
            hi = hi.max(c);
        }
        (lo, hi)
    }

    /// Exact value range: union of the endpoint values with `value_at(r)`
    /// for every real root of the derivative.
    pub fn bounds_exact(&self) -> (f64, f64) {
        let mut lo = self.value_at(0.0).min(self.value_at(1.0));
        let mut hi = self.value_at(0.0).max(self.value_at(1.0));
        for r in self.derivative().roots() {
            let v = self.value_at(r);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        (lo, hi)
    }

    /// `bounds_fast` restricted to `interval`.
    pub fn bounds_local(&self, interval: (f64, f64)) -> (f64, f64) {
        self.portion(interval.0, interval.1).bounds_fast()
    }

    /// Convert to symmetric power basis. Exact and bijective.
    pub fn to_sbasis(&self) -> SBasis {
        SBasis::from_bezier(self)
    }

    fn elevate_to_match(a: &Bezier, b: &Bezier) -> (Bezier, Bezier) {
        let m = a.order().max(b.order());
        (a.elevate_to_degree(m), b.elevate_to_degree(m))
    }
}

impl core::ops::Add for &Bezier {
    type Output = Bezier;
    fn add(self, rhs: &Bezier) -> Bezier {
        let (a, b) = Bezier::elevate_to_match(self, rhs);
        Bezier { coeffs: a.coeffs.iter().zip(b.coeffs.iter()).map(|(x, y)| x + y).collect() }
    }
}

impl core::ops::Sub for &Bezier {
    type Output = Bezier;
    fn sub(self, rhs: &Bezier) -> Bezier {
        let (a, b) = Bezier::elevate_to_match(self, rhs);
        Bezier { coeffs: a.coeffs.iter().zip(b.coeffs.iter()).map(|(x, y)| x - y).collect() }
    }
}

impl core::ops::Mul for &Bezier {
    type Output = Bezier;
    /// Polynomial product. The product of orders `m` and `n` has order
    /// `m + n`: `h_k = sum_{i+j=k} C(m,i) C(n,j) / C(m+n,k) f_i g_j`.
    fn mul(self, rhs: &Bezier) -> Bezier {
        let m = self.order();
        let n = rhs.order();
        let mn = m + n;
        let c_m = binomial_row(m);
        let c_n = binomial_row(n);
        let c_mn = binomial_row(mn);
        let mut out = vec![0.0; mn + 1];
        for k in 0..=mn {
            let lo = k.saturating_sub(n);
            let hi = k.min(m);
            let mut s = 0.0;
            for i in lo..=hi {
                let j = k - i;
                s += c_m[i] * c_n[j] * self.coeffs[i] * rhs.coeffs[j];
            }
            out[k] = s / c_mn[k];
        }
        Bezier { coeffs: out }
    }
}

fn de_casteljau_inplace(c: &mut [f64], t: f64) {
    let n = c.len();
    for k in 1..n {
        for i in 0..n - k {
            c[i] = c[i] * (1.0 - t) + c[i + 1] * t;
        }
    }
}

/// Row `k` of Pascal's triangle: `[C(k,0), .., C(k,k)]`.
pub(crate) fn binomial_row(k: usize) -> Vec<f64> {
    let mut row = vec![1.0; k + 1];
    for i in 1..=k {
        row[i] = row[i - 1] * (k - i + 1) as f64 / i as f64;
    }
    row
}

/// Solves the square linear system `a * x = b` by Gaussian elimination with
/// partial pivoting. `None` for a singular (or near-singular) matrix.
fn solve_square(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut s = b[row];
        for k in row + 1..n {
            s -= a[row][k] * x[k];
        }
        x[row] = s / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_exactness() {
        let b = Bezier::new(vec![1.0, 5.0, -3.0, 2.0]).unwrap();
        assert_eq!(b.value_at(0.0), b.coeff(0));
        assert_eq!(b.value_at(1.0), b.coeff(3));
    }

    #[test]
    fn subdivide_continuity() {
        let b = Bezier::new(vec![0.0, 2.0, -1.0, 3.0]).unwrap();
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let (l, r) = b.subdivide(t);
            let expected = b.value_at(t);
            assert!((l.coeffs.last().unwrap() - expected).abs() < 1e-12);
            assert!((r.coeffs[0] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn interpolating_passes_through_every_sample() {
        // Samples of a genuinely degree-8-ish function (not itself a low
        // degree polynomial in the control points), at 9 uniform nodes.
        let n = 8;
        let f = |t: f64| (3.0 * t).sin() + 0.5 * t * t;
        let values: Vec<f64> = (0..=n).map(|i| f(i as f64 / n as f64)).collect();
        let b = Bezier::interpolating(&values).unwrap();
        assert_eq!(b.order(), n);
        for (i, &v) in values.iter().enumerate() {
            let t = i as f64 / n as f64;
            assert!((b.value_at(t) - v).abs() < 1e-9, "node {i}: {} vs {}", b.value_at(t), v);
        }
    }

    #[test]
    fn interpolating_differs_from_new_away_from_endpoints() {
        // Bezier::new treats the samples as control points, which only
        // agree with the interpolated curve at the endpoints.
        let values = vec![0.0, 1.0, 0.0, 1.0, 0.0];
        let as_control_points = Bezier::new(values.clone()).unwrap();
        let interpolated = Bezier::interpolating(&values).unwrap();
        assert!((as_control_points.value_at(0.5) - interpolated.value_at(0.5)).abs() > 1e-6);
        assert!((interpolated.value_at(0.5) - values[2]).abs() < 1e-9);
    }

    #[test]
    fn portion_round_trip() {
        let b = Bezier::new(vec![0.3, -1.2, 4.0, 0.0, 2.5]).unwrap();
        let t = 0.37;
        let left = b.portion(0.0, t);
        let right = b.portion(t, 1.0);
        for i in 0..=100 {
            let s = i as f64 / 100.0;
            let via_left = left.value_at(s);
            let via_right = right.value_at(s);
            let direct_left = b.value_at(s * t);
            let direct_right = b.value_at(t + s * (1.0 - t));
            assert!((via_left - direct_left).abs() < 1e-9);
            assert!((via_right - direct_right).abs() < 1e-9);
        }
    }

    #[test]
    fn derivative_integral_round_trip() {
        let b = Bezier::new(vec![1.0, -2.0, 3.0, 0.5]).unwrap();
        let back = b.integral().derivative();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((back.value_at(t) - b.value_at(t)).abs() < 1e-9);
        }
    }

    #[test]
    fn bounds_tightness_for_monotone_derivative() {
        // A cubic with a monotone derivative over [0,1]: plain ramp.
        let b = Bezier::new(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let (lo, hi) = b.bounds_exact();
        assert!((hi - lo - (b.coeff(3) - b.coeff(0)).abs()).abs() < 1e-12);
    }

    #[test]
    fn root_completeness() {
        // (t - 0.2)(t - 0.5)(t - 0.8) as a cubic bezier via elevation of roots in power basis,
        // built directly as Bernstein coefficients sampled from the polynomial.
        let f = |t: f64| (t - 0.2) * (t - 0.5) * (t - 0.8);
        // Degree-3 Bernstein interpolation through 4 Bernstein control points
        // constructed by solving the Vandermonde-like system is overkill here;
        // instead sample the cubic directly as Bernstein coefficients by
        // matching it exactly: a cubic with these roots expands to
        // f(t) = t^3 - 1.5 t^2 + 0.66 t - 0.08, convert to Bernstein by
        // evaluating at t=0,1/3,2/3,1 and solving - simplest is to just trust
        // de Casteljau bounds via direct construction from power basis.
        let power = [-0.08, 0.66, -1.5, 1.0]; // c0 + c1 t + c2 t^2 + c3 t^3
        let bernstein = power_to_bernstein_cubic(power);
        let b = Bezier::new(bernstein.to_vec()).unwrap();
        let mut roots = b.roots();
        roots.sort_by(|a, c| a.partial_cmp(c).unwrap());
        assert_eq!(roots.len(), 3);
        let expected = [0.2, 0.5, 0.8];
        for (r, e) in roots.iter().zip(expected.iter()) {
            assert!((r - e).abs() < 1e-6, "{} vs {}: {:?}", r, e, f(*r));
        }
    }

    fn power_to_bernstein_cubic(p: [f64; 4]) -> [f64; 4] {
        // For a cubic a0 + a1 t + a2 t^2 + a3 t^3, the Bernstein coefficients are:
        // b0 = a0
        // b1 = a0 + a1/3
        // b2 = a0 + 2a1/3 + a2/3
        // b3 = a0 + a1 + a2 + a3
        let [a0, a1, a2, a3] = p;
        [a0, a0 + a1 / 3.0, a0 + 2.0 * a1 / 3.0 + a2 / 3.0, a0 + a1 + a2 + a3]
    }
}
