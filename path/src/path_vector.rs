//! A vector of paths sharing one global time factoring (component G).

use geom::{Affine, OptRect, Point};

use crate::error::{PathError, PathResult};
use crate::path::Path;
use crate::time::{PVIntersection, PathVectorTime};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct PathVector {
    paths: Vec<Path>,
}

impl PathVector {
    pub fn new(paths: Vec<Path>) -> Self {
        PathVector { paths }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Total curve count across every path, using each path's
    /// [`Path::size_default`].
    pub fn size(&self) -> usize {
        self.paths.iter().map(Path::size_default).sum()
    }

    /// Factors a global parameter `t` in `[0, size()]` into the path it
    /// falls in, in O(number of paths).
    pub fn curve_at(&self, t: f64) -> PathResult<PathVectorTime> {
        let mut remaining = t.max(0.0);
        for (path_index, path) in self.paths.iter().enumerate() {
            let n = path.size_default() as f64;
            if remaining < n || path_index == self.paths.len() - 1 {
                let local = remaining.min(n);
                let pt = path.time_at_coord(local);
                return Ok(PathVectorTime::from_path_time(path_index, pt));
            }
            remaining -= n;
        }
        Err(PathError::RangeError("path vector is empty"))
    }

    pub fn point_at(&self, time: PathVectorTime) -> PathResult<Point> {
        self.paths
            .get(time.path_index)
            .ok_or(PathError::RangeError("path index out of range"))?
            .point_at(time.path_time())
    }

    pub fn bounds_fast(&self) -> OptRect {
        self.paths.iter().fold(OptRect::empty(), |acc, p| acc.union(&p.bounds_fast()))
    }

    pub fn bounds_exact(&self) -> OptRect {
        self.paths.iter().fold(OptRect::empty(), |acc, p| acc.union(&p.bounds_exact()))
    }

    pub fn reversed(&self) -> PathVector {
        PathVector { paths: self.paths.iter().map(Path::reversed).collect() }
    }

    pub fn transformed(&self, m: &Affine) -> PathVector {
        PathVector { paths: self.paths.iter().map(|p| p.transformed(m)).collect() }
    }

    /// Nonzero winding rule across every path in the vector.
    pub fn winding(&self, point: Point) -> i32 {
        self.paths.iter().map(|p| p.winding(point)).sum()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.winding(point) != 0
    }

    /// All pairwise intersections between distinct paths, plus each path's
    /// own self-intersections. Candidate path pairs are reduced first by a
    /// sweep over each path's X-bound before any curve-level work runs.
    pub fn intersect(&self, precision: f64) -> Vec<PVIntersection> {
        let mut out = Vec::new();
        for (i, p) in self.paths.iter().enumerate() {
            for hit in p.self_intersect(precision) {
                out.push(PVIntersection {
                    time_a: PathVectorTime::from_path_time(i, hit.time_a),
                    time_b: PathVectorTime::from_path_time(i, hit.time_b),
                    point: hit.point,
                });
            }
        }

        if self.paths.len() < 2 {
            return out;
        }
        let bounds: Vec<geom::Interval> = self
            .paths
            .iter()
            .map(|p| p.bounds_fast().as_rect().map(|r| r.x).unwrap_or(geom::Interval::new(0.0, 0.0)))
            .collect();
        let indices: Vec<usize> = (0..self.paths.len()).collect();
        let pairs = crate::sweep::sweep_pairs(bounds, indices);
        for (i, j) in pairs {
            for hit in self.paths[i].intersect(&self.paths[j], precision) {
                out.push(PVIntersection {
                    time_a: PathVectorTime::from_path_time(i, hit.time_a),
                    time_b: PathVectorTime::from_path_time(j, hit.time_b),
                    point: hit.point,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{point, Curve, LineSegment};

    fn unit_square() -> Path {
        Path::new_closed(vec![
            Curve::Line(LineSegment::new(point(0.0, 0.0), point(1.0, 0.0))),
            Curve::Line(LineSegment::new(point(1.0, 0.0), point(1.0, 1.0))),
            Curve::Line(LineSegment::new(point(1.0, 1.0), point(0.0, 1.0))),
            Curve::Line(LineSegment::new(point(0.0, 1.0), point(0.0, 0.0))),
        ])
    }

    #[test]
    fn curve_at_factors_across_paths() {
        let pv = PathVector::new(vec![unit_square(), unit_square()]);
        assert_eq!(pv.size(), 8);
        let t = pv.curve_at(5.0).unwrap();
        assert_eq!(t.path_index, 1);
        assert_eq!(t.curve_index, 1);
    }

    #[test]
    fn intersect_crossing_squares() {
        let a = unit_square();
        let b = Path::new_closed(vec![
            Curve::Line(LineSegment::new(point(0.5, 0.5), point(1.5, 0.5))),
            Curve::Line(LineSegment::new(point(1.5, 0.5), point(1.5, 1.5))),
            Curve::Line(LineSegment::new(point(1.5, 1.5), point(0.5, 1.5))),
            Curve::Line(LineSegment::new(point(0.5, 1.5), point(0.5, 0.5))),
        ]);
        let pv = PathVector::new(vec![a, b]);
        let hits = pv.intersect(1e-6);
        assert!(!hits.is_empty());
        for hit in &hits {
            assert_ne!(hit.time_a.path_index, hit.time_b.path_index);
        }
    }

    #[test]
    fn winding_sums_across_paths() {
        let pv = PathVector::new(vec![unit_square(), unit_square()]);
        assert_eq!(pv.winding(point(0.5, 0.5)), 2);
    }
}
