#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]

//! Scalar and planar curve algebra for a 2D computational-geometry kernel.
//!
//! This crate implements the maths underneath a vector-graphics editor's
//! path model: Bernstein-basis (`Bezier`) and symmetric-power (`SBasis`)
//! scalar polynomials, a Bernstein root finder, the `D2<T>` planar lifting
//! of a scalar fragment type into an `(x, y)` pair, the concrete curve
//! hierarchy (`LineSegment`, `QuadraticBezier`, `CubicBezier`,
//! `EllipticalArc`, the general `SBasisCurve`), and least-squares fitting
//! helpers. The `path` and `algorithms` crates build on top of this one.

mod affine;
mod bezier;
mod curve;
mod d2;
mod error;
mod fit;
mod interval;
mod point;
mod rect;
mod roots;
mod sbasis;

pub use affine::Affine;
pub use bezier::Bezier;
pub use curve::{Curve, CubicBezier, EllipticalArc, LineSegment, QuadraticBezier, SBasisCurve};
pub use d2::{point, vector};
pub use error::{GeomError, GeomResult};
pub use fit::{fit_affine, fit_circle, fit_cubic_bezier, fit_ellipse, Circle, Ellipse};
pub use interval::{Interval, OptInterval};
pub use point::{D2, Point, Vector};
pub use rect::{Align, MeetOrSlice, OptRect, Rect};
pub use roots::find_roots;
pub use sbasis::{LinearPair, SBasis};

/// The kernel-wide tolerance for "close enough to zero" comparisons:
/// degenerate-length vectors, near-singular affines, flattening and root
/// convergence checks that don't carry their own explicit tolerance
/// parameter.
pub const EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_surface_smoke_test() {
        let b = Bezier::new(vec![0.0, 1.0, 0.0]).unwrap();
        assert_eq!(b.order(), 2);
        let s = b.to_sbasis();
        assert!((s.value_at(0.5) - b.value_at(0.5)).abs() < EPSILON);

        let line = Curve::Line(LineSegment::new(point(0.0, 0.0), point(1.0, 1.0)));
        assert!(line.point_at(0.5).near(&point(0.5, 0.5), EPSILON));
    }
}
