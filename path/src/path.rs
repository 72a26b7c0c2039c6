//! A single path: an ordered sequence of curves, optionally closed
//! (component F).

use geom::{Affine, Curve, CubicBezier, LineSegment, OptRect, Point};

use crate::error::{PathError, PathResult};
use crate::time::{PathIntersection, PathTime};

/// Coordinate dimension selector, matching `Curve::roots`'s `dim` argument.
pub const X: usize = 0;
pub const Y: usize = 1;

/// An ordered sequence of curves. If `closed`, an implicit closing segment
/// connects the last curve's final point back to the first curve's initial
/// point; that segment is counted by [`Path::size_closed`] but not by
/// [`Path::size`] when it has zero length (see `DESIGN.md` for the
/// open-question resolution this follows).
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    curves: Vec<Curve>,
    closed: bool,
}

impl Path {
    pub fn new(curves: Vec<Curve>) -> Self {
        Path { curves, closed: false }
    }

    pub fn new_closed(curves: Vec<Curve>) -> Self {
        Path { curves, closed: true }
    }

    /// Builds a path from curves, verifying that each curve's final point
    /// stitches to the next curve's initial point within `tolerance`.
    pub fn from_stitched(curves: Vec<Curve>, closed: bool, tolerance: f64) -> PathResult<Self> {
        for w in curves.windows(2) {
            if w[0].final_point().distance(&w[1].initial_point()) > tolerance {
                return Err(PathError::NotRepresentable("curve endpoints do not stitch"));
            }
        }
        Ok(Path { curves, closed })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Number of explicit curves; never counts the implicit closing
    /// segment.
    pub fn size(&self) -> usize {
        self.curves.len()
    }

    fn closing_segment(&self) -> Option<LineSegment> {
        if !self.closed || self.curves.is_empty() {
            return None;
        }
        let last = self.curves.last().unwrap().final_point();
        let first = self.curves.first().unwrap().initial_point();
        Some(LineSegment::new(last, first))
    }

    /// Number of curves including a non-degenerate closing segment; a
    /// zero-length closing segment (path already ends where it starts) is
    /// not counted, matching the reference behavior this kernel preserves.
    pub fn size_closed(&self) -> usize {
        match self.closing_segment() {
            Some(seg) if seg.length() > geom::EPSILON => self.curves.len() + 1,
            _ => self.curves.len(),
        }
    }

    pub fn size_default(&self) -> usize {
        if self.closed {
            self.size_closed()
        } else {
            self.size()
        }
    }

    /// The curve at `index`, including the synthetic closing segment at
    /// `index == size()` when it's non-degenerate.
    pub fn curve_at(&self, index: usize) -> PathResult<Curve> {
        if index < self.curves.len() {
            return Ok(self.curves[index].clone());
        }
        if index == self.curves.len() {
            if let Some(seg) = self.closing_segment() {
                if seg.length() > geom::EPSILON {
                    return Ok(Curve::Line(seg));
                }
            }
        }
        Err(PathError::RangeError("curve index out of range"))
    }

    pub fn initial_point(&self) -> PathResult<Point> {
        self.curves.first().map(|c| c.initial_point()).ok_or(PathError::RangeError("path is empty"))
    }

    pub fn final_point(&self) -> PathResult<Point> {
        self.curves.last().map(|c| c.final_point()).ok_or(PathError::RangeError("path is empty"))
    }

    pub fn point_at(&self, time: PathTime) -> PathResult<Point> {
        Ok(self.curve_at(time.curve_index)?.point_at(time.t))
    }

    pub fn value_at(&self, time: PathTime, dim: usize) -> PathResult<f64> {
        let p = self.point_at(time)?;
        Ok(if dim == X { p.x } else { p.y })
    }

    /// Global-parameter addressing: `t` in `[0, size_default()]` is split
    /// into an integral curve index and a local parameter in `[0, 1]`.
    pub fn time_at_coord(&self, t: f64) -> PathTime {
        let n = self.size_default().max(1);
        let clamped = t.clamp(0.0, n as f64);
        let mut index = clamped.floor() as usize;
        let mut local = clamped - index as f64;
        if index >= n {
            index = n - 1;
            local = 1.0;
        }
        PathTime::new(index, local)
    }

    pub fn bounds_fast(&self) -> OptRect {
        let mut bounds = OptRect::empty();
        for i in 0..self.size_default() {
            if let Ok(c) = self.curve_at(i) {
                bounds = bounds.union(&c.bounds_fast());
            }
        }
        bounds
    }

    pub fn bounds_exact(&self) -> OptRect {
        let mut bounds = OptRect::empty();
        for i in 0..self.size_default() {
            if let Ok(c) = self.curve_at(i) {
                bounds = bounds.union(&c.bounds_exact());
            }
        }
        bounds
    }

    pub fn reversed(&self) -> Path {
        let mut curves: Vec<Curve> = self.curves.iter().map(|c| c.reverse()).collect();
        curves.reverse();
        Path { curves, closed: self.closed }
    }

    pub fn transformed(&self, m: &Affine) -> Path {
        Path { curves: self.curves.iter().map(|c| c.transformed(m)).collect(), closed: self.closed }
    }

    pub fn nearest_time(&self, point: Point) -> PathResult<PathTime> {
        let n = self.size_default();
        if n == 0 {
            return Err(PathError::RangeError("path is empty"));
        }
        let mut best = PathTime::new(0, 0.0);
        let mut best_dist = f64::INFINITY;
        for i in 0..n {
            let c = self.curve_at(i)?;
            let t = c.nearest_time(point, 0.0, 1.0);
            let d = c.point_at(t).distance_sq(&point);
            if d < best_dist {
                best_dist = d;
                best = PathTime::new(i, t);
            }
        }
        Ok(best)
    }

    /// Winding number of `point` about this path: a horizontal-ray crossing
    /// count using `Curve::roots(point.y, Y)`, signed by the sweep
    /// direction of each crossing.
    pub fn winding(&self, point: Point) -> i32 {
        let mut winding = 0i32;
        for i in 0..self.size_default() {
            let Ok(c) = self.curve_at(i) else { continue };
            for t in c.roots(point.y, Y) {
                let p = c.point_at(t);
                if p.x <= point.x {
                    continue;
                }
                let derivs = c.point_and_derivatives(t, 1);
                let dy = derivs.get(1).map(|d| d.y).unwrap_or(0.0);
                if dy > 0.0 {
                    winding += 1;
                } else if dy < 0.0 {
                    winding -= 1;
                }
            }
        }
        winding
    }

    pub fn contains(&self, point: Point) -> bool {
        self.winding(point) != 0
    }

    /// Self-intersections: candidate pairs come from the sweepline over
    /// each curve's X-bound, with immediately-adjacent curves (which share
    /// an endpoint and therefore always "intersect" there) skipped.
    pub fn self_intersect(&self, precision: f64) -> Vec<PathIntersection> {
        let n = self.size_default();
        if n < 3 {
            return Vec::new();
        }
        let mut bounds = Vec::with_capacity(n);
        let mut curves = Vec::with_capacity(n);
        for i in 0..n {
            let c = self.curve_at(i).unwrap();
            let b = c.bounds_fast().as_rect().map(|r| r.x).unwrap_or(geom::Interval::new(0.0, 0.0));
            bounds.push(b);
            curves.push(i);
        }
        let pairs = crate::sweep::sweep_pairs(bounds, curves);
        let mut out = Vec::new();
        for (i, j) in pairs {
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let ca = self.curve_at(i).unwrap();
            let cb = self.curve_at(j).unwrap();
            for (ta, tb, point) in crate::intersection::intersect_curves(&ca, &cb, precision) {
                out.push(PathIntersection { time_a: PathTime::new(i, ta), time_b: PathTime::new(j, tb), point });
            }
        }
        out
    }

    /// Pairwise intersection with `other`: every curve of `self` is tested
    /// against every curve of `other` whose X-bounds overlap.
    pub fn intersect(&self, other: &Path, precision: f64) -> Vec<PathIntersection> {
        let mut out = Vec::new();
        for i in 0..self.size_default() {
            let ca = self.curve_at(i).unwrap();
            let Some(ra) = ca.bounds_fast().as_rect() else { continue };
            for j in 0..other.size_default() {
                let cb = other.curve_at(j).unwrap();
                let Some(rb) = cb.bounds_fast().as_rect() else { continue };
                if !ra.intersects(&rb) {
                    continue;
                }
                for (ta, tb, point) in crate::intersection::intersect_curves(&ca, &cb, precision) {
                    out.push(PathIntersection { time_a: PathTime::new(i, ta), time_b: PathTime::new(j, tb), point });
                }
            }
        }
        out
    }

    /// Nudges the path's final point onto its initial point when they are
    /// already within `precision`, turning an almost-closed path into one
    /// whose curves stitch exactly.
    pub fn snap_ends(&mut self, precision: f64) {
        if self.curves.len() < 2 {
            return;
        }
        let first = self.curves.first().unwrap().initial_point();
        let last = self.curves.last().unwrap().final_point();
        if first.distance(&last) <= precision && first != last {
            let n = self.curves.len();
            self.curves[n - 1] = with_final_point(&self.curves[n - 1], first);
        }
    }
}

/// Rebuilds `c` with its final point moved to `p`, for the curve shapes
/// where that's a closed-form edit (Line/Quadratic/Cubic). Arc/General
/// curves are returned unchanged: snapping those exactly would require
/// re-deriving the whole parameterization, not a worthwhile trade for what
/// is meant to be a sub-`precision` nudge.
fn with_final_point(c: &Curve, p: Point) -> Curve {
    match c {
        Curve::Line(l) => Curve::Line(LineSegment::new(l.initial, p)),
        Curve::Quadratic(q) => Curve::Quadratic(geom::QuadraticBezier::new(q.initial, q.control, p)),
        Curve::Cubic(cb) => Curve::Cubic(CubicBezier::new(cb.initial, cb.control1, cb.control2, p)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{point, CubicBezier};

    fn square() -> Path {
        Path::new_closed(vec![
            Curve::Line(LineSegment::new(point(0.0, 0.0), point(10.0, 0.0))),
            Curve::Line(LineSegment::new(point(10.0, 0.0), point(10.0, 10.0))),
            Curve::Line(LineSegment::new(point(10.0, 10.0), point(0.0, 10.0))),
            Curve::Line(LineSegment::new(point(0.0, 10.0), point(0.0, 0.0))),
        ])
    }

    #[test]
    fn size_excludes_zero_length_closing_segment() {
        let sq = square();
        assert_eq!(sq.size(), 4);
        assert_eq!(sq.size_closed(), 4);
        assert_eq!(sq.size_default(), 4);
    }

    #[test]
    fn size_closed_counts_nondegenerate_closing_segment() {
        let open = Path::new_closed(vec![
            Curve::Line(LineSegment::new(point(0.0, 0.0), point(10.0, 0.0))),
            Curve::Line(LineSegment::new(point(10.0, 0.0), point(10.0, 10.0))),
        ]);
        assert_eq!(open.size(), 2);
        assert_eq!(open.size_closed(), 3);
        assert_eq!(open.size_default(), 3);
    }

    #[test]
    fn winding_inside_square_is_nonzero() {
        let sq = square();
        assert_eq!(sq.winding(point(5.0, 5.0)), 1);
        assert_eq!(sq.winding(point(-5.0, 5.0)), 0);
    }

    #[test]
    fn bounds_fast_matches_square_extent() {
        let sq = square();
        let r = sq.bounds_fast().as_rect().unwrap();
        assert!((r.width() - 10.0).abs() < 1e-9);
        assert!((r.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_swaps_endpoints() {
        let p = Path::new(vec![Curve::Line(LineSegment::new(point(0.0, 0.0), point(1.0, 1.0)))]);
        let r = p.reversed();
        assert_eq!(r.initial_point().unwrap(), point(1.0, 1.0));
        assert_eq!(r.final_point().unwrap(), point(0.0, 0.0));
    }

    #[test]
    fn nearest_time_finds_closest_curve() {
        let p = Path::new(vec![
            Curve::Cubic(CubicBezier::new(point(0.0, 0.0), point(3.0, 3.0), point(7.0, 3.0), point(10.0, 0.0))),
        ]);
        let t = p.nearest_time(point(5.0, 10.0)).unwrap();
        let closest = p.point_at(t).unwrap();
        assert!(closest.y > 0.0);
    }
}
