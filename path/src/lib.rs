#![deny(unconditional_recursion)]

//! Paths built from the `geom` curve hierarchy: ordered curve sequences and
//! path vectors with total-order time addressing, a sweepline driver, and
//! pairwise curve/path intersection.

mod error;
mod intersection;
mod path;
mod path_vector;
mod sweep;
mod time;

pub use error::{PathError, PathResult};
pub use intersection::{intersect_curves, intersect_line_curve, intersect_lines, LineIntersection};
pub use path::{Path, X, Y};
pub use path_vector::PathVector;
pub use sweep::{sweep_pairs, Bound, Sweep};
pub use time::{Intersection, PVIntersection, PathIntersection, PathTime, PathVectorTime};

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{point, Curve, LineSegment};

    #[test]
    fn public_surface_smoke_test() {
        let p = Path::new(vec![Curve::Line(LineSegment::new(point(0.0, 0.0), point(1.0, 0.0)))]);
        assert_eq!(p.size(), 1);
        let pv = PathVector::new(vec![p]);
        assert_eq!(pv.size(), 1);
    }
}
