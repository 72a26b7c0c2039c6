//! Planar lifting of the scalar algebra: `D2<Bezier>` and `D2<SBasis>`.

use crate::affine::Affine;
use crate::bezier::Bezier;
use crate::point::{D2, Point, Vector};
use crate::rect::{OptRect, Rect};
use crate::sbasis::SBasis;

impl D2<Bezier> {
    pub fn value_at(&self, t: f64) -> Point {
        Point::new(self.x.value_at(t), self.y.value_at(t))
    }

    pub fn value_and_derivatives(&self, t: f64, n: usize) -> Vec<Point> {
        let dx = self.x.value_and_derivatives(t, n);
        let dy = self.y.value_and_derivatives(t, n);
        dx.into_iter().zip(dy).map(|(x, y)| Point::new(x, y)).collect()
    }

    pub fn derivative(&self) -> D2<Bezier> {
        D2::new(self.x.derivative(), self.y.derivative())
    }

    pub fn to_sbasis(&self) -> D2<SBasis> {
        D2::new(self.x.to_sbasis(), self.y.to_sbasis())
    }

    pub fn bounds_fast(&self) -> OptRect {
        let (xlo, xhi) = self.x.bounds_fast();
        let (ylo, yhi) = self.y.bounds_fast();
        OptRect::from(Rect::from_points(Point::new(xlo, ylo), Point::new(xhi, yhi)))
    }

    pub fn bounds_exact(&self) -> OptRect {
        let (xlo, xhi) = self.x.bounds_exact();
        let (ylo, yhi) = self.y.bounds_exact();
        OptRect::from(Rect::from_points(Point::new(xlo, ylo), Point::new(xhi, yhi)))
    }

    /// Closed-form transform by an affine, using the six affine entries
    /// directly rather than re-deriving a general matrix product: each
    /// output fragment is a fixed linear combination of the two input
    /// fragments.
    pub fn transformed(&self, m: &Affine) -> D2<Bezier> {
        let x = &(&self.x * &Bezier::constant(m.xx)) + &(&self.y * &Bezier::constant(m.yx));
        let x = &x + &Bezier::constant(m.tx);
        let y = &(&self.x * &Bezier::constant(m.xy)) + &(&self.y * &Bezier::constant(m.yy));
        let y = &y + &Bezier::constant(m.ty);
        D2::new(x, y)
    }

    pub fn reversed(&self) -> D2<Bezier> {
        D2::new(self.x.reversed(), self.y.reversed())
    }

    pub fn portion(&self, t0: f64, t1: f64) -> D2<Bezier> {
        D2::new(self.x.portion(t0, t1), self.y.portion(t0, t1))
    }
}

impl D2<SBasis> {
    pub fn value_at(&self, t: f64) -> Point {
        Point::new(self.x.value_at(t), self.y.value_at(t))
    }

    pub fn to_bezier(&self) -> D2<Bezier> {
        D2::new(self.x.to_bezier(), self.y.to_bezier())
    }

    pub fn derivative(&self) -> D2<SBasis> {
        D2::new(self.x.derivative(), self.y.derivative())
    }
}

/// Shorthand matching the teacher's `point(x, y)` / `vector(x, y)`
/// constructors.
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_matches_pointwise() {
        let d2 = D2::new(
            Bezier::new(vec![0.0, 1.0, 2.0]).unwrap(),
            Bezier::new(vec![0.0, 2.0, 0.0]).unwrap(),
        );
        let m = Affine::rotation(0.4).then(&Affine::translation(1.0, -2.0));
        let transformed = d2.transformed(&m);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let direct = m.transform_point(d2.value_at(t));
            let via = transformed.value_at(t);
            assert!(via.near(&direct, 1e-9));
        }
    }
}
